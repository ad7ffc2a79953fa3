//! Single choice field rendered as a select

use crate::field::{EditorField, FieldError, FieldResult, Widget};
use serde_json::Value;

/// Choice field whose stored value must be one of the declared options.
///
/// The block schemas back choice fields with enums, so an unknown option is a
/// coercion error rather than a soft validation message.
#[derive(Debug, Clone)]
pub struct ChoiceField {
	pub name: String,
	pub label: Option<String>,
	pub help_text: Option<String>,
	pub choices: Vec<(String, String)>,
	pub initial: Option<String>,
	widget: Widget,
}

impl ChoiceField {
	/// Create a new ChoiceField from `(value, label)` pairs
	///
	/// # Examples
	///
	/// ```
	/// use composer_forms::{ChoiceField, EditorField};
	/// use serde_json::json;
	///
	/// let field = ChoiceField::new("align", [("left", "Left"), ("center", "Center")]);
	/// assert_eq!(field.empty_value(), json!("left"));
	/// assert!(field.coerce(&json!("center")).is_ok());
	/// assert!(field.coerce(&json!("justify")).is_err());
	/// ```
	pub fn new<I, V, L>(name: impl Into<String>, choices: I) -> Self
	where
		I: IntoIterator<Item = (V, L)>,
		V: Into<String>,
		L: Into<String>,
	{
		Self {
			name: name.into(),
			label: None,
			help_text: None,
			choices: choices
				.into_iter()
				.map(|(v, l)| (v.into(), l.into()))
				.collect(),
			initial: None,
			widget: Widget::Select,
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
	pub fn with_initial(mut self, initial: impl Into<String>) -> Self {
		self.initial = Some(initial.into());
		self
	}

	fn is_choice(&self, value: &str) -> bool {
		self.choices.iter().any(|(v, _)| v == value)
	}
}

impl EditorField for ChoiceField {
	fn name(&self) -> &str {
		&self.name
	}

	fn label(&self) -> Option<&str> {
		self.label.as_deref()
	}

	// Always holds one of the options
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
		let value = self
			.initial
			.clone()
			.or_else(|| self.choices.first().map(|(v, _)| v.clone()))
			.unwrap_or_default();
		Value::String(value)
	}

	fn coerce(&self, raw: &Value) -> FieldResult<Value> {
		let value = match raw {
			Value::String(s) => s.trim().to_string(),
			Value::Number(n) => n.to_string(),
			_ => {
				return Err(FieldError::InvalidType {
					field: self.name.clone(),
					expected: "choice".to_string(),
				});
			}
		};
		if !self.is_choice(&value) {
			return Err(FieldError::Validation(format!(
				"Select a valid choice. {} is not one of the available choices.",
				value
			)));
		}
		Ok(Value::String(value))
	}

	fn validate(&self, value: Option<&Value>) -> FieldResult<()> {
		match value.and_then(Value::as_str) {
			Some(v) if self.is_choice(v) => Ok(()),
			Some(v) => Err(FieldError::Validation(format!(
				"Select a valid choice. {} is not one of the available choices.",
				v
			))),
			None => Ok(()),
		}
	}

	fn choices(&self) -> &[(String, String)] {
		&self.choices
	}
}
