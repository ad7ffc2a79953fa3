//! Repeatable sub-form for arrays of nested objects

use crate::field::{EditorField, FieldError, FieldResult, Widget};
use serde_json::{Map, Value};

/// A list of entries that all share the same set of sub-fields.
///
/// Used for testimonial lists, FAQ entries, feature grids and the like. The
/// stored value is a JSON array of objects; every object carries exactly the
/// declared sub-fields.
pub struct ListField {
	pub name: String,
	pub label: Option<String>,
	pub item_label: String,
	pub help_text: Option<String>,
	pub min_items: usize,
	pub max_items: Option<usize>,
	fields: Vec<Box<dyn EditorField>>,
	widget: Widget,
}

impl ListField {
	/// Create an empty list field
	///
	/// # Examples
	///
	/// ```
	/// use composer_forms::{CharField, EditorField, ListField};
	/// use serde_json::json;
	///
	/// let field = ListField::new("items")
	/// 	.field(CharField::new("question").required())
	/// 	.field(CharField::new("answer").textarea());
	///
	/// assert_eq!(field.new_item(), json!({"question": "", "answer": ""}));
	/// assert_eq!(field.empty_value(), json!([]));
	/// ```
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			label: None,
			item_label: "Item".to_string(),
			help_text: None,
			min_items: 0,
			max_items: None,
			fields: Vec::new(),
			widget: Widget::Repeater,
		}
	}
	/// Add a sub-field shown for every entry
	pub fn field(mut self, field: impl EditorField + 'static) -> Self {
		self.fields.push(Box::new(field));
		self
	}
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}
	/// Label used for a single entry ("Testimonial", "Question")
	pub fn with_item_label(mut self, item_label: impl Into<String>) -> Self {
		self.item_label = item_label.into();
		self
	}
	pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
		self.help_text = Some(help_text.into());
		self
	}
	pub fn with_min_items(mut self, min_items: usize) -> Self {
		self.min_items = min_items;
		self
	}
	pub fn with_max_items(mut self, max_items: usize) -> Self {
		self.max_items = Some(max_items);
		self
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

	/// A fresh entry holding every sub-field's empty value
	pub fn new_item(&self) -> Value {
		let item: Map<String, Value> = self
			.fields
			.iter()
			.map(|f| (f.name().to_string(), f.empty_value()))
			.collect();
		Value::Object(item)
	}

	/// Coerces one raw entry; missing sub-fields get their empty value and
	/// unknown keys are rejected.
	pub fn coerce_item(&self, raw: &Value) -> FieldResult<Value> {
		let Value::Object(raw) = raw else {
			return Err(FieldError::InvalidType {
				field: self.name.clone(),
				expected: "object entries".to_string(),
			});
		};
		if let Some(unknown) = raw.keys().find(|k| self.get(k).is_none()) {
			return Err(FieldError::Validation(format!(
				"Unknown field {} in {} entry",
				unknown, self.name
			)));
		}
		let mut item = Map::new();
		for field in &self.fields {
			let value = match raw.get(field.name()) {
				Some(v) => field.coerce(v)?,
				None => field.empty_value(),
			};
			item.insert(field.name().to_string(), value);
		}
		Ok(Value::Object(item))
	}

	pub fn is_full(&self, len: usize) -> bool {
		self.max_items.is_some_and(|max| len >= max)
	}
}

impl EditorField for ListField {
	fn name(&self) -> &str {
		&self.name
	}

	fn label(&self) -> Option<&str> {
		self.label.as_deref()
	}

	fn required(&self) -> bool {
		self.min_items > 0
	}

	fn help_text(&self) -> Option<&str> {
		self.help_text.as_deref()
	}

	fn widget(&self) -> &Widget {
		&self.widget
	}

	fn empty_value(&self) -> Value {
		Value::Array(Vec::new())
	}

	fn coerce(&self, raw: &Value) -> FieldResult<Value> {
		match raw {
			Value::Null => Ok(self.empty_value()),
			Value::Array(items) => items
				.iter()
				.map(|item| self.coerce_item(item))
				.collect::<FieldResult<Vec<_>>>()
				.map(Value::Array),
			_ => Err(FieldError::InvalidType {
				field: self.name.clone(),
				expected: "list".to_string(),
			}),
		}
	}

	fn validate(&self, value: Option<&Value>) -> FieldResult<()> {
		let len = value.and_then(Value::as_array).map_or(0, Vec::len);
		if len < self.min_items {
			if len == 0 {
				return Err(FieldError::Required(self.name.clone()));
			}
			return Err(FieldError::Validation(format!(
				"Add at least {} entries",
				self.min_items
			)));
		}
		if let Some(max) = self.max_items
			&& len > max
		{
			return Err(FieldError::Validation(format!(
				"Use at most {} entries",
				max
			)));
		}
		Ok(())
	}

	fn as_list(&self) -> Option<&ListField> {
		Some(self)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fields::{BooleanField, CharField};
	use rstest::{fixture, rstest};
	use serde_json::json;

	#[fixture]
	fn faq() -> ListField {
		ListField::new("items")
			.with_item_label("Question")
			.with_min_items(1)
			.with_max_items(3)
			.field(CharField::new("question").required())
			.field(CharField::new("answer").textarea())
	}

	#[rstest]
	fn test_list_field_coerce_fills_missing_sub_fields(faq: ListField) {
		// Act
		let value = faq.coerce(&json!([{"question": " Why? "}])).unwrap();

		// Assert
		assert_eq!(value, json!([{"question": "Why?", "answer": ""}]));
	}

	#[rstest]
	fn test_list_field_coerce_rejects_unknown_keys(faq: ListField) {
		let result = faq.coerce(&json!([{"question": "q", "votes": 3}]));
		assert!(matches!(result, Err(FieldError::Validation(_))));
	}

	#[rstest]
	fn test_list_field_coerce_rejects_non_objects(faq: ListField) {
		assert!(faq.coerce(&json!(["plain"])).is_err());
		assert!(faq.coerce(&json!("plain")).is_err());
	}

	#[rstest]
	#[case(json!([]), false)]
	#[case(json!([{}]), true)]
	#[case(json!([{}, {}, {}]), true)]
	#[case(json!([{}, {}, {}, {}]), false)]
	fn test_list_field_bounds(faq: ListField, #[case] value: Value, #[case] ok: bool) {
		assert_eq!(faq.validate(Some(&value)).is_ok(), ok);
	}

	#[rstest]
	fn test_list_field_is_full(faq: ListField) {
		assert!(!faq.is_full(2));
		assert!(faq.is_full(3));
		assert!(!ListField::new("unbounded").is_full(1000));
	}

	#[rstest]
	fn test_list_field_new_item_uses_initials() {
		// Arrange
		let field = ListField::new("fields")
			.field(CharField::new("label").with_initial("Name"))
			.field(BooleanField::new("required").with_initial(true));

		// Act & Assert
		assert_eq!(
			field.new_item(),
			json!({"label": "Name", "required": true})
		);
	}
}
