//! Field trait, widgets and field addressing

use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::fields::ListField;

/// Errors produced while coercing or validating a single field value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
	#[error("This field is required: {0}")]
	Required(String),
	#[error("{0}")]
	Validation(String),
	#[error("Invalid value for {field}: expected {expected}")]
	InvalidType { field: String, expected: String },
}

pub type FieldResult<T> = Result<T, FieldError>;

/// Input widget used to render a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Widget {
	TextInput,
	TextArea,
	UrlInput,
	EmailInput,
	NumberInput,
	CheckboxInput,
	Select,
	/// Repeatable sub-form for list fields
	Repeater,
}

impl Widget {
	/// The `type` attribute for `<input>` based widgets
	pub fn input_type(&self) -> Option<&'static str> {
		match self {
			Widget::TextInput => Some("text"),
			Widget::UrlInput => Some("url"),
			Widget::EmailInput => Some("email"),
			Widget::NumberInput => Some("number"),
			Widget::CheckboxInput => Some("checkbox"),
			Widget::TextArea | Widget::Select | Widget::Repeater => None,
		}
	}
}

/// A single editable property of a block's content payload.
///
/// Fields know how to turn raw editor input into the stored JSON type
/// ([`coerce`](EditorField::coerce)) and how to check a stored value against
/// soft constraints ([`validate`](EditorField::validate)). Coercion failures are
/// hard errors because the payload shape would no longer match the schema;
/// validation failures are reported inline and never block a commit.
pub trait EditorField: Send + Sync {
	fn name(&self) -> &str;

	fn label(&self) -> Option<&str>;

	fn required(&self) -> bool;

	fn help_text(&self) -> Option<&str> {
		None
	}

	fn widget(&self) -> &Widget;

	/// Value written into a fresh payload or a freshly added list item
	fn empty_value(&self) -> Value;

	/// Converts raw editor input into the stored representation
	fn coerce(&self, raw: &Value) -> FieldResult<Value>;

	/// Checks a stored value against the field's soft constraints
	fn validate(&self, value: Option<&Value>) -> FieldResult<()>;

	/// `(value, label)` pairs for select widgets
	fn choices(&self) -> &[(String, String)] {
		&[]
	}

	/// Downcast hook for repeatable list fields
	fn as_list(&self) -> Option<&ListField> {
		None
	}
}

/// Address of a field inside a content payload.
///
/// The string form follows the HTML naming convention used by the rendered
/// form: `title` for a top-level field and `items-2-quote` for a field of the
/// third entry of the `items` list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldPath {
	Field(String),
	Item {
		list: String,
		index: usize,
		field: String,
	},
}

impl FieldPath {
	/// Path to a top-level field
	///
	/// # Examples
	///
	/// ```
	/// use composer_forms::FieldPath;
	///
	/// assert_eq!(FieldPath::field("title").to_string(), "title");
	/// ```
	pub fn field(name: impl Into<String>) -> Self {
		Self::Field(name.into())
	}

	/// Path to a field of one list entry
	///
	/// # Examples
	///
	/// ```
	/// use composer_forms::FieldPath;
	///
	/// let path = FieldPath::item("items", 2, "quote");
	/// assert_eq!(path.to_string(), "items-2-quote");
	/// ```
	pub fn item(list: impl Into<String>, index: usize, field: impl Into<String>) -> Self {
		Self::Item {
			list: list.into(),
			index,
			field: field.into(),
		}
	}

	/// Name of the top-level field this path starts at
	pub fn root(&self) -> &str {
		match self {
			FieldPath::Field(name) => name,
			FieldPath::Item { list, .. } => list,
		}
	}
}

impl fmt::Display for FieldPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			FieldPath::Field(name) => write!(f, "{}", name),
			FieldPath::Item { list, index, field } => write!(f, "{}-{}-{}", list, index, field),
		}
	}
}

impl FromStr for FieldPath {
	type Err = FieldError;

	fn from_str(s: &str) -> FieldResult<Self> {
		if s.is_empty() {
			return Err(FieldError::Validation("Empty field path".to_string()));
		}
		let parts: Vec<&str> = s.splitn(3, '-').collect();
		match parts.as_slice() {
			[name] => Ok(FieldPath::Field((*name).to_string())),
			[list, index, field] if !list.is_empty() && !field.is_empty() => {
				let index = index.parse::<usize>().map_err(|_| {
					FieldError::Validation(format!("Invalid list index in field path: {}", s))
				})?;
				Ok(FieldPath::item(*list, index, *field))
			}
			_ => Err(FieldError::Validation(format!("Invalid field path: {}", s))),
		}
	}
}
