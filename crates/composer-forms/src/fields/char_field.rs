//! Character field for text, URL and email input

use crate::field::{EditorField, FieldError, FieldResult, Widget};
use crate::validators::{EmailValidator, UrlValidator};
use serde_json::Value;

/// Extra format check applied to non-empty values
#[derive(Debug, Clone)]
enum TextFormat {
	Url(UrlValidator),
	Email(EmailValidator),
}

/// Character field with length and format validation
#[derive(Debug, Clone)]
pub struct CharField {
	pub name: String,
	pub label: Option<String>,
	pub required: bool,
	pub help_text: Option<String>,
	pub widget: Widget,
	pub initial: Option<String>,
	pub max_length: Option<usize>,
	pub strip: bool,
	format: Option<TextFormat>,
}

impl CharField {
	/// Create a new CharField with the given name
	///
	/// # Examples
	///
	/// ```
	/// use composer_forms::CharField;
	///
	/// let field = CharField::new("title");
	/// assert_eq!(field.name, "title");
	/// assert!(!field.required);
	/// assert_eq!(field.max_length, None);
	/// ```
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			label: None,
			required: false,
			help_text: None,
			widget: Widget::TextInput,
			initial: None,
			max_length: None,
			strip: true,
			format: None,
		}
	}
	/// Set the field as required
	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}
	/// Set the maximum length (in characters) for the field
	///
	/// # Examples
	///
	/// ```
	/// use composer_forms::CharField;
	///
	/// let field = CharField::new("title").with_max_length(120);
	/// assert_eq!(field.max_length, Some(120));
	/// ```
	pub fn with_max_length(mut self, max_length: usize) -> Self {
		self.max_length = Some(max_length);
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
	/// Set the value used for new payloads and new list entries
	///
	/// # Examples
	///
	/// ```
	/// use composer_forms::{CharField, EditorField};
	/// use serde_json::json;
	///
	/// let field = CharField::new("submit_label").with_initial("Send");
	/// assert_eq!(field.empty_value(), json!("Send"));
	/// ```
	pub fn with_initial(mut self, initial: impl Into<String>) -> Self {
		self.initial = Some(initial.into());
		self
	}
	/// Keep surrounding whitespace (e.g. for body copy)
	pub fn no_strip(mut self) -> Self {
		self.strip = false;
		self
	}
	/// Render as a multi-line textarea
	pub fn textarea(mut self) -> Self {
		self.widget = Widget::TextArea;
		self
	}
	/// Require an absolute http(s) URL
	pub fn url(mut self) -> Self {
		self.widget = Widget::UrlInput;
		self.format = Some(TextFormat::Url(UrlValidator::new()));
		self
	}
	/// Require an absolute URL, a site-relative path, or an in-page anchor
	pub fn link(mut self) -> Self {
		self.widget = Widget::TextInput;
		self.format = Some(TextFormat::Url(UrlValidator::new().allow_relative()));
		self
	}
	/// Require an email address
	pub fn email(mut self) -> Self {
		self.widget = Widget::EmailInput;
		self.format = Some(TextFormat::Email(EmailValidator::new()));
		self
	}
}

// Note: Default trait is not implemented because CharField requires a name

impl EditorField for CharField {
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
		Value::String(self.initial.clone().unwrap_or_default())
	}

	fn coerce(&self, raw: &Value) -> FieldResult<Value> {
		let text = match raw {
			Value::Null => String::new(),
			Value::String(s) => s.clone(),
			Value::Number(n) => n.to_string(),
			Value::Bool(b) => b.to_string(),
			_ => {
				return Err(FieldError::InvalidType {
					field: self.name.clone(),
					expected: "text".to_string(),
				});
			}
		};
		let text = if self.strip {
			text.trim().to_string()
		} else {
			text
		};
		Ok(Value::String(text))
	}

	fn validate(&self, value: Option<&Value>) -> FieldResult<()> {
		let text = value.and_then(Value::as_str).unwrap_or("");
		let text = if self.strip { text.trim() } else { text };

		if text.is_empty() {
			if self.required {
				return Err(FieldError::Required(self.name.clone()));
			}
			return Ok(());
		}

		// Character count, not byte count, so CJK and emoji count as one each
		let char_count = text.chars().count();
		if let Some(max_length) = self.max_length
			&& char_count > max_length
		{
			return Err(FieldError::Validation(format!(
				"Ensure this value has at most {} characters (it has {})",
				max_length, char_count
			)));
		}

		match &self.format {
			Some(TextFormat::Url(validator)) => validator.validate(text),
			Some(TextFormat::Email(validator)) => validator.validate(text),
			None => Ok(()),
		}
	}
}
