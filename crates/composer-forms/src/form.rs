use crate::bound_field::BoundField;
use crate::field::{EditorField, FieldError, FieldPath};
use crate::fields::ListField;
use crate::rendering::{escape_attr, html_escape, render_errors};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt::Write;

#[derive(Debug, thiserror::Error)]
pub enum FormError {
	#[error("Field error in {field}: {error}")]
	Field { field: String, error: FieldError },
	#[error("Unknown field: {0}")]
	UnknownField(String),
	#[error("Field {0} is not a list")]
	NotAList(String),
	#[error("Index {index} is out of range for {list} ({len} entries)")]
	IndexOutOfRange {
		list: String,
		index: usize,
		len: usize,
	},
	#[error("{list} already holds the maximum of {max} entries")]
	ListFull { list: String, max: usize },
}

pub type FormResult<T> = Result<T, FormError>;

/// One user edit in the property form
#[derive(Debug, Clone, PartialEq)]
pub enum EditorChange {
	/// Replace the value at `path`
	SetField { path: FieldPath, value: Value },
	/// Append a fresh entry to a list field
	AddItem { list: String },
	/// Remove the entry at `index`; later entries keep their relative order
	RemoveItem { list: String, index: usize },
	/// Move an entry from one position to another
	MoveItem { list: String, from: usize, to: usize },
}

impl EditorChange {
	pub fn set(path: FieldPath, value: impl Into<Value>) -> Self {
		Self::SetField {
			path,
			value: value.into(),
		}
	}

	pub fn add_item(list: impl Into<String>) -> Self {
		Self::AddItem { list: list.into() }
	}

	pub fn remove_item(list: impl Into<String>, index: usize) -> Self {
		Self::RemoveItem {
			list: list.into(),
			index,
		}
	}

	pub fn move_item(list: impl Into<String>, from: usize, to: usize) -> Self {
		Self::MoveItem {
			list: list.into(),
			from,
			to,
		}
	}

	/// HTML name of the field this change targets
	pub fn target(&self) -> String {
		match self {
			EditorChange::SetField { path, .. } => path.to_string(),
			EditorChange::AddItem { list }
			| EditorChange::RemoveItem { list, .. }
			| EditorChange::MoveItem { list, .. } => list.clone(),
		}
	}
}

/// Inline validation messages keyed by HTML field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
	errors: BTreeMap<String, Vec<String>>,
}

impl FormErrors {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
		self.errors
			.entry(field.into())
			.or_default()
			.push(message.into());
	}

	pub fn get(&self, field: &str) -> &[String] {
		self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
	}

	pub fn contains(&self, field: &str) -> bool {
		self.errors.contains_key(field)
	}

	pub fn is_empty(&self) -> bool {
		self.errors.is_empty()
	}

	pub fn len(&self) -> usize {
		self.errors.len()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
		self.errors.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
	}

	pub fn remove(&mut self, field: &str) {
		self.errors.remove(field);
	}
}

/// Editor descriptor for one block type: the ordered fields of its payload.
///
/// The form never holds content itself. It operates on the payload it is
/// given and always returns a complete object, so callers never store a
/// partially-shaped value.
#[derive(Default)]
pub struct EditorForm {
	fields: Vec<Box<dyn EditorField>>,
}

impl EditorForm {
	/// Create a new empty form
	///
	/// # Examples
	///
	/// ```
	/// use composer_forms::EditorForm;
	///
	/// let form = EditorForm::new();
	/// assert!(form.fields().is_empty());
	/// ```
	pub fn new() -> Self {
		Self { fields: vec![] }
	}

	/// Builder-style field registration
	pub fn field(mut self, field: impl EditorField + 'static) -> Self {
		self.fields.push(Box::new(field));
		self
	}

	pub fn add_field(&mut self, field: Box<dyn EditorField>) {
		self.fields.push(field);
	}

	pub fn fields(&self) -> &[Box<dyn EditorField>] {
		&self.fields
	}

	pub fn get(&self, name: &str) -> Option<&dyn EditorField> {
		self.fields
			.iter()
			.find(|f| f.name() == name)
			.map(|f| f.as_ref())
	}

	fn list(&self, name: &str) -> FormResult<&ListField> {
		self.get(name)
			.ok_or_else(|| FormError::UnknownField(name.to_string()))?
			.as_list()
			.ok_or_else(|| FormError::NotAList(name.to_string()))
	}

	/// Payload with every field at its empty value
	pub fn initial_content(&self) -> Value {
		let content: Map<String, Value> = self
			.fields
			.iter()
			.map(|f| (f.name().to_string(), f.empty_value()))
			.collect();
		Value::Object(content)
	}

	/// Apply one change and return the complete updated payload.
	///
	/// Fields missing from `content` are filled with their empty value, so the
	/// result always carries every declared field.
	///
	/// # Examples
	///
	/// ```
	/// use composer_forms::{CharField, EditorChange, EditorForm, FieldPath, ListField};
	/// use serde_json::json;
	///
	/// let form = EditorForm::new()
	/// 	.field(CharField::new("title"))
	/// 	.field(ListField::new("items").field(CharField::new("question")));
	///
	/// let content = json!({"title": "FAQ", "items": [{"question": "a"}, {"question": "b"}]});
	/// let updated = form.apply(&content, &EditorChange::remove_item("items", 0)).unwrap();
	/// assert_eq!(updated, json!({"title": "FAQ", "items": [{"question": "b"}]}));
	/// ```
	pub fn apply(&self, content: &Value, change: &EditorChange) -> FormResult<Value> {
		let mut map = self.complete(content);

		match change {
			EditorChange::SetField {
				path: FieldPath::Field(name),
				value,
			} => {
				let field = self
					.get(name)
					.ok_or_else(|| FormError::UnknownField(name.clone()))?;
				let value = field.coerce(value).map_err(|error| FormError::Field {
					field: name.clone(),
					error,
				})?;
				map.insert(name.clone(), value);
			}
			EditorChange::SetField {
				path: path @ FieldPath::Item { list, index, field },
				value,
			} => {
				let list_field = self.list(list)?;
				let sub_field = list_field
					.get(field)
					.ok_or_else(|| FormError::UnknownField(path.to_string()))?;
				let value = sub_field.coerce(value).map_err(|error| FormError::Field {
					field: path.to_string(),
					error,
				})?;
				edit_list(&mut map, list, |items| {
					let len = items.len();
					let item = items
						.get_mut(*index)
						.ok_or_else(|| FormError::IndexOutOfRange {
							list: list.clone(),
							index: *index,
							len,
						})?;
					if let Value::Object(item) = item {
						item.insert(field.clone(), value);
					} else {
						let mut fresh = list_field.new_item();
						if let Value::Object(fresh_map) = &mut fresh {
							fresh_map.insert(field.clone(), value);
						}
						*item = fresh;
					}
					Ok(())
				})?;
			}
			EditorChange::AddItem { list } => {
				let list_field = self.list(list)?;
				edit_list(&mut map, list, |items| {
					if list_field.is_full(items.len()) {
						return Err(FormError::ListFull {
							list: list.clone(),
							max: list_field.max_items.unwrap_or_default(),
						});
					}
					items.push(list_field.new_item());
					Ok(())
				})?;
			}
			EditorChange::RemoveItem { list, index } => {
				self.list(list)?;
				edit_list(&mut map, list, |items| {
					if *index >= items.len() {
						return Err(FormError::IndexOutOfRange {
							list: list.clone(),
							index: *index,
							len: items.len(),
						});
					}
					items.remove(*index);
					Ok(())
				})?;
			}
			EditorChange::MoveItem { list, from, to } => {
				self.list(list)?;
				edit_list(&mut map, list, |items| {
					let len = items.len();
					for index in [*from, *to] {
						if index >= len {
							return Err(FormError::IndexOutOfRange {
								list: list.clone(),
								index,
								len,
							});
						}
					}
					let item = items.remove(*from);
					items.insert(*to, item);
					Ok(())
				})?;
			}
		}

		Ok(Value::Object(map))
	}

	/// Object map holding every declared field; unknown keys are dropped
	fn complete(&self, content: &Value) -> Map<String, Value> {
		let existing = content.as_object();
		self.fields
			.iter()
			.map(|f| {
				let value = existing
					.and_then(|m| m.get(f.name()))
					.cloned()
					.unwrap_or_else(|| f.empty_value());
				(f.name().to_string(), value)
			})
			.collect()
	}

	/// Soft validation of a payload, keyed by HTML field name
	///
	/// # Examples
	///
	/// ```
	/// use composer_forms::{CharField, EditorForm};
	/// use serde_json::json;
	///
	/// let form = EditorForm::new().field(CharField::new("title").required());
	/// let errors = form.validate(&json!({"title": ""}));
	/// assert!(errors.contains("title"));
	/// ```
	pub fn validate(&self, content: &Value) -> FormErrors {
		let mut errors = FormErrors::new();
		let map = content.as_object();
		for field in &self.fields {
			let value = map.and_then(|m| m.get(field.name()));
			if let Err(error) = field.validate(value) {
				errors.add(field.name(), error.to_string());
			}
			if let Some(list) = field.as_list() {
				let items = value.and_then(Value::as_array);
				for (index, item) in items.into_iter().flatten().enumerate() {
					for sub_field in list.fields() {
						let sub_value = item.get(sub_field.name());
						if let Err(error) = sub_field.validate(sub_value) {
							errors.add(
								FieldPath::item(list.name.clone(), index, sub_field.name())
									.to_string(),
								error.to_string(),
							);
						}
					}
				}
			}
		}
		errors
	}

	/// Render the field groups of the form (without the `<form>` element)
	pub fn render(&self, content: &Value, errors: &FormErrors) -> String {
		let map = content.as_object();
		let mut html = String::new();
		for field in &self.fields {
			let value = map.and_then(|m| m.get(field.name()));
			match field.as_list() {
				Some(list) => html.push_str(&render_list(list, value, errors)),
				None => {
					let bound = BoundField::new(field.as_ref(), value, errors.get(field.name()), "");
					html.push_str(&bound.render());
				}
			}
		}
		html
	}
}

/// Run `edit` on the items of `list`; a missing or non-array value counts
/// as an empty list
fn edit_list(
	map: &mut Map<String, Value>,
	list: &str,
	edit: impl FnOnce(&mut Vec<Value>) -> FormResult<()>,
) -> FormResult<()> {
	let mut items = match map.remove(list) {
		Some(Value::Array(items)) => items,
		_ => Vec::new(),
	};
	let result = edit(&mut items);
	map.insert(list.to_string(), Value::Array(items));
	result
}

fn render_list(list: &ListField, value: Option<&Value>, errors: &FormErrors) -> String {
	let name = escape_attr(&list.name);
	let items = value.and_then(Value::as_array).map_or(&[][..], Vec::as_slice);
	let legend = BoundField::new(list, value, &[], "").label();

	let mut html = format!(
		r#"<fieldset class="composer-repeater" data-list="{}"><legend>{}</legend>"#,
		name,
		html_escape(&legend)
	);
	if let Some(help) = list.help_text.as_deref() {
		let _ = write!(
			html,
			r#"<small class="help-text">{}</small>"#,
			html_escape(help)
		);
	}
	html.push_str(&render_errors(errors.get(&list.name)));

	for (index, item) in items.iter().enumerate() {
		let prefix = format!("{}-{}", list.name, index);
		let _ = write!(
			html,
			r#"<div class="composer-repeater-item" data-index="{}"><h4>{} {}</h4>"#,
			index,
			html_escape(&list.item_label),
			index + 1
		);
		for sub_field in list.fields() {
			let path = FieldPath::item(list.name.clone(), index, sub_field.name()).to_string();
			let bound = BoundField::new(
				sub_field.as_ref(),
				item.get(sub_field.name()),
				errors.get(&path),
				&prefix,
			);
			html.push_str(&bound.render());
		}
		let _ = write!(
			html,
			r#"<button type="button" class="btn btn-link" data-action="remove-item" data-list="{}" data-index="{}">Remove {}</button></div>"#,
			name,
			index,
			html_escape(&list.item_label.to_lowercase())
		);
	}

	let disabled = if list.is_full(items.len()) {
		" disabled"
	} else {
		""
	};
	let _ = write!(
		html,
		r#"<button type="button" class="btn btn-secondary" data-action="add-item" data-list="{}"{}>Add {}</button></fieldset>"#,
		name,
		disabled,
		html_escape(&list.item_label.to_lowercase())
	);
	html
}
