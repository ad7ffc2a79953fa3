//! URL and email validators for editor fields

use crate::field::{FieldError, FieldResult};
use regex::Regex;
use std::sync::LazyLock;

// HTTP/HTTPS URL pattern.
//
// Validates URLs with:
// - http or https scheme only
// - Valid domain labels (no leading/trailing hyphens)
// - Optional port number (1-5 digits)
// - Optional path, query string, and fragment
static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(
		r"^https?://[a-zA-Z0-9]([a-zA-Z0-9\-]{0,61}[a-zA-Z0-9])?(\.[a-zA-Z0-9]([a-zA-Z0-9\-]*[a-zA-Z0-9])?)*(:[0-9]{1,5})?(/[^\s?#]*)?(\?[^\s#]*)?(#[^\s]*)?$",
	)
	.expect("URL_REGEX: invalid regex pattern")
});

// Site-relative reference: `/path`, `/path?q#frag` or an in-page anchor `#frag`.
static RELATIVE_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^(/[^\s/?#][^\s?#]*|/)(\?[^\s#]*)?(#[^\s]*)?$|^#[^\s]+$")
		.expect("RELATIVE_URL_REGEX: invalid regex pattern")
});

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9]([a-zA-Z0-9\-]{0,61}[a-zA-Z0-9])?(\.[a-zA-Z0-9]([a-zA-Z0-9\-]{0,61}[a-zA-Z0-9])?)+$")
		.expect("EMAIL_REGEX: invalid regex pattern")
});

/// Validates that a string value is a well-formed HTTP or HTTPS URL.
///
/// With [`allow_relative`](UrlValidator::allow_relative) site-relative paths
/// (`/contact`) and in-page anchors (`#pricing`) are accepted as well, which
/// is what call-to-action buttons usually point at.
///
/// # Examples
///
/// ```
/// use composer_forms::UrlValidator;
///
/// let validator = UrlValidator::new();
/// assert!(validator.validate("https://example.com").is_ok());
/// assert!(validator.validate("http://localhost:8080/path").is_ok());
/// assert!(validator.validate("ftp://example.com").is_err());
/// assert!(validator.validate("/contact").is_err());
///
/// let relative = UrlValidator::new().allow_relative();
/// assert!(relative.validate("/contact").is_ok());
/// assert!(relative.validate("#pricing").is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct UrlValidator {
	message: Option<String>,
	allow_relative: bool,
}

impl UrlValidator {
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets a custom error message returned on validation failure.
	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = Some(message.into());
		self
	}

	/// Accepts site-relative paths and in-page anchors.
	pub fn allow_relative(mut self) -> Self {
		self.allow_relative = true;
		self
	}

	pub fn validate(&self, value: &str) -> FieldResult<()> {
		if URL_REGEX.is_match(value) || (self.allow_relative && RELATIVE_URL_REGEX.is_match(value))
		{
			Ok(())
		} else {
			let msg = self.message.as_deref().unwrap_or("Enter a valid URL");
			Err(FieldError::Validation(msg.to_string()))
		}
	}
}

/// Validates that a string value is a plausible email address.
///
/// # Examples
///
/// ```
/// use composer_forms::EmailValidator;
///
/// let validator = EmailValidator::new();
/// assert!(validator.validate("sales@example.com").is_ok());
/// assert!(validator.validate("not-an-email").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct EmailValidator {
	message: Option<String>,
}

impl EmailValidator {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = Some(message.into());
		self
	}

	pub fn validate(&self, value: &str) -> FieldResult<()> {
		if EMAIL_REGEX.is_match(value) {
			Ok(())
		} else {
			let msg = self
				.message
				.as_deref()
				.unwrap_or("Enter a valid email address");
			Err(FieldError::Validation(msg.to_string()))
		}
	}
}
