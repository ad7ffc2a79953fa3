use crate::field::{EditorField, Widget};
use serde_json::Value;

/// BoundField represents a field bound to a block's current content
pub struct BoundField<'a> {
	field: &'a dyn EditorField,
	data: Option<&'a Value>,
	errors: &'a [String],
	prefix: &'a str,
}

impl<'a> BoundField<'a> {
	/// # Examples
	///
	/// ```
	/// use composer_forms::{BoundField, CharField, EditorField};
	///
	/// let field: Box<dyn EditorField> = Box::new(CharField::new("quote"));
	/// let data = serde_json::json!("Great product");
	///
	/// let bound = BoundField::new(field.as_ref(), Some(&data), &[], "items-0");
	/// assert_eq!(bound.html_name(), "items-0-quote");
	/// assert_eq!(bound.value_text(), "Great product");
	/// ```
	pub fn new(
		field: &'a dyn EditorField,
		data: Option<&'a Value>,
		errors: &'a [String],
		prefix: &'a str,
	) -> Self {
		Self {
			field,
			data,
			errors,
			prefix,
		}
	}

	pub fn field(&self) -> &'a dyn EditorField {
		self.field
	}

	pub fn name(&self) -> &str {
		self.field.name()
	}

	/// Get the HTML name attribute (with prefix)
	pub fn html_name(&self) -> String {
		if self.prefix.is_empty() {
			self.field.name().to_string()
		} else {
			format!("{}-{}", self.prefix, self.field.name())
		}
	}

	/// Get the HTML id attribute
	pub fn id_for_label(&self) -> String {
		format!("id_{}", self.html_name())
	}

	/// Declared label, or the field name with underscores replaced and the
	/// first letter capitalized
	///
	/// # Examples
	///
	/// ```
	/// use composer_forms::{BoundField, CharField, EditorField};
	///
	/// let field: Box<dyn EditorField> = Box::new(CharField::new("cta_label"));
	/// let bound = BoundField::new(field.as_ref(), None, &[], "");
	/// assert_eq!(bound.label(), "Cta label");
	/// ```
	pub fn label(&self) -> String {
		match self.field.label() {
			Some(label) => label.to_string(),
			None => {
				let text = self.field.name().replace('_', " ");
				let mut chars = text.chars();
				match chars.next() {
					Some(first) => first.to_uppercase().chain(chars).collect(),
					None => String::new(),
				}
			}
		}
	}

	pub fn value(&self) -> Option<&'a Value> {
		self.data
	}

	/// Current value as text for `value=""` attributes and textareas
	pub fn value_text(&self) -> String {
		match self.data {
			None | Some(Value::Null) => String::new(),
			Some(Value::String(s)) => s.clone(),
			Some(other) => other.to_string(),
		}
	}

	pub fn is_checked(&self) -> bool {
		matches!(self.data, Some(Value::Bool(true)))
	}

	pub fn errors(&self) -> &[String] {
		self.errors
	}

	pub fn has_errors(&self) -> bool {
		!self.errors.is_empty()
	}

	pub fn widget(&self) -> &Widget {
		self.field.widget()
	}

	/// Render the field group as HTML
	pub fn render(&self) -> String {
		crate::rendering::render_bound_field(self)
	}
}
