//! Boolean field rendered as a checkbox

use crate::field::{EditorField, FieldError, FieldResult, Widget};
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct BooleanField {
	pub name: String,
	pub label: Option<String>,
	pub help_text: Option<String>,
	pub initial: bool,
	widget: Widget,
}

impl BooleanField {
	/// Create a new BooleanField (unchecked by default)
	///
	/// # Examples
	///
	/// ```
	/// use composer_forms::{BooleanField, EditorField};
	/// use serde_json::json;
	///
	/// let field = BooleanField::new("required");
	/// assert_eq!(field.coerce(&json!("on")).unwrap(), json!(true));
	/// assert_eq!(field.coerce(&json!("")).unwrap(), json!(false));
	/// ```
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			label: None,
			help_text: None,
			initial: false,
			widget: Widget::CheckboxInput,
		}
	}
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}
	pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
		self.help_text = Some(help_text.into());
		self
	}
	pub fn with_initial(mut self, initial: bool) -> Self {
		self.initial = initial;
		self
	}
}

impl EditorField for BooleanField {
	fn name(&self) -> &str {
		&self.name
	}

	fn label(&self) -> Option<&str> {
		self.label.as_deref()
	}

	// A checkbox always has a value
	fn required(&self) -> bool {
		false
	}

	fn help_text(&self) -> Option<&str> {
		self.help_text.as_deref()
	}

	fn widget(&self) -> &Widget {
		&self.widget
	}

	fn empty_value(&self) -> Value {
		Value::Bool(self.initial)
	}

	fn coerce(&self, raw: &Value) -> FieldResult<Value> {
		let flag = match raw {
			Value::Bool(b) => *b,
			Value::Null => false,
			Value::Number(n) => n.as_i64().is_some_and(|n| n != 0),
			Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
				"true" | "on" | "1" | "yes" => true,
				"false" | "off" | "0" | "no" | "" => false,
				_ => {
					return Err(FieldError::InvalidType {
						field: self.name.clone(),
						expected: "boolean".to_string(),
					});
				}
			},
			_ => {
				return Err(FieldError::InvalidType {
					field: self.name.clone(),
					expected: "boolean".to_string(),
				});
			}
		};
		Ok(Value::Bool(flag))
	}

	fn validate(&self, _value: Option<&Value>) -> FieldResult<()> {
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(json!(true), true)]
	#[case(json!("TRUE"), true)]
	#[case(json!("yes"), true)]
	#[case(json!(1), true)]
	#[case(json!(false), false)]
	#[case(json!("off"), false)]
	#[case(json!(0), false)]
	#[case(Value::Null, false)]
	fn test_boolean_field_coerce(#[case] raw: Value, #[case] expected: bool) {
		let field = BooleanField::new("required");
		assert_eq!(field.coerce(&raw).unwrap(), Value::Bool(expected));
	}

	#[rstest]
	fn test_boolean_field_rejects_garbage() {
		let field = BooleanField::new("required");
		assert!(field.coerce(&json!("maybe")).is_err());
		assert!(field.coerce(&json!([true])).is_err());
	}

	#[rstest]
	fn test_boolean_field_initial() {
		let field = BooleanField::new("required").with_initial(true);
		assert_eq!(field.empty_value(), json!(true));
	}
}
