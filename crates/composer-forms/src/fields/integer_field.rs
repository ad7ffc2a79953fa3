//! Integer field with optional bounds

use crate::field::{EditorField, FieldError, FieldResult, Widget};
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct IntegerField {
	pub name: String,
	pub label: Option<String>,
	pub required: bool,
	pub help_text: Option<String>,
	pub initial: i64,
	pub min_value: Option<i64>,
	pub max_value: Option<i64>,
	widget: Widget,
}

impl IntegerField {
	/// Create a new IntegerField
	///
	/// # Examples
	///
	/// ```
	/// use composer_forms::{EditorField, IntegerField};
	/// use serde_json::json;
	///
	/// let field = IntegerField::new("columns").with_range(2, 4).with_initial(3);
	/// assert_eq!(field.coerce(&json!("4")).unwrap(), json!(4));
	/// assert!(field.validate(Some(&json!(5))).is_err());
	/// ```
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			label: None,
			required: false,
			help_text: None,
			initial: 0,
			min_value: None,
			max_value: None,
			widget: Widget::NumberInput,
		}
	}
	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}
	pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
		self.help_text = Some(help_text.into());
		self
	}
	pub fn with_initial(mut self, initial: i64) -> Self {
		self.initial = initial;
		self
	}
	pub fn with_range(mut self, min: i64, max: i64) -> Self {
		self.min_value = Some(min);
		self.max_value = Some(max);
		self
	}
}

impl EditorField for IntegerField {
	fn name(&self) -> &str {
		&self.name
	}

	fn label(&self) -> Option<&str> {
		self.label.as_deref()
	}

	fn required(&self) -> bool {
		self.required
	}

	fn help_text(&self) -> Option<&str> {
		self.help_text.as_deref()
	}

	fn widget(&self) -> &Widget {
		&self.widget
	}

	fn empty_value(&self) -> Value {
		Value::from(self.initial)
	}

	fn coerce(&self, raw: &Value) -> FieldResult<Value> {
		let invalid = || FieldError::InvalidType {
			field: self.name.clone(),
			expected: "whole number".to_string(),
		};
		match raw {
			Value::Number(n) => n.as_i64().map(Value::from).ok_or_else(invalid),
			Value::String(s) => s
				.trim()
				.parse::<i64>()
				.map(Value::from)
				.map_err(|_| invalid()),
			_ => Err(invalid()),
		}
	}

	fn validate(&self, value: Option<&Value>) -> FieldResult<()> {
		let Some(number) = value.and_then(Value::as_i64) else {
			if self.required {
				return Err(FieldError::Required(self.name.clone()));
			}
			return Ok(());
		};
		if let Some(min) = self.min_value
			&& number < min
		{
			return Err(FieldError::Validation(format!(
				"Ensure this value is greater than or equal to {}",
				min
			)));
		}
		if let Some(max) = self.max_value
			&& number > max
		{
			return Err(FieldError::Validation(format!(
				"Ensure this value is less than or equal to {}",
				max
			)));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_integer_field_coerce() {
		// Arrange
		let field = IntegerField::new("columns");

		// Act & Assert
		assert_eq!(field.coerce(&json!(3)).unwrap(), json!(3));
		assert_eq!(field.coerce(&json!(" 2 ")).unwrap(), json!(2));
		assert!(field.coerce(&json!("three")).is_err());
		assert!(field.coerce(&json!(2.5)).is_err());
		assert!(field.coerce(&Value::Null).is_err());
	}

	#[rstest]
	#[case(1, false)]
	#[case(2, true)]
	#[case(4, true)]
	#[case(5, false)]
	fn test_integer_field_range(#[case] input: i64, #[case] ok: bool) {
		let field = IntegerField::new("columns").with_range(2, 4);
		assert_eq!(field.validate(Some(&json!(input))).is_ok(), ok);
	}

	#[rstest]
	fn test_integer_field_required_missing() {
		let field = IntegerField::new("columns").required();
		assert_eq!(
			field.validate(None),
			Err(FieldError::Required("columns".to_string()))
		);
	}
}
