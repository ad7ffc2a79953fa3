//! HTML helpers shared by the block renderers

use std::borrow::Cow;
use std::fmt::Write;

pub use composer_forms::rendering::{escape_attr, html_escape};

const UNSAFE_SCHEMES: [&str; 3] = ["javascript:", "data:", "vbscript:"];

/// Make a user supplied URL safe for `href`/`src` attributes.
///
/// Script-capable schemes are replaced with `#`. The scheme check ignores
/// case and embedded whitespace or control characters, which browsers also
/// ignore when parsing the attribute. The result is attribute-escaped.
///
/// # Examples
///
/// ```
/// use composer_blocks::html::sanitize_url;
///
/// assert_eq!(sanitize_url("https://example.com/?a=1&b=2"), "https://example.com/?a=1&amp;b=2");
/// assert_eq!(sanitize_url(" JavaScript:alert(1)"), "#");
/// assert_eq!(sanitize_url("java\tscript:alert(1)"), "#");
/// assert_eq!(sanitize_url("/pricing"), "/pricing");
/// ```
pub fn sanitize_url(url: &str) -> Cow<'_, str> {
	let trimmed = url.trim();
	let normalized: String = trimmed
		.chars()
		.filter(|c| !c.is_whitespace() && !c.is_control())
		.take(16)
		.collect::<String>()
		.to_ascii_lowercase();
	if UNSAFE_SCHEMES.iter().any(|s| normalized.starts_with(s)) {
		return Cow::Borrowed("#");
	}
	match html_escape(trimmed) {
		Cow::Borrowed(s) if !s.contains(['\n', '\r']) => Cow::Borrowed(s),
		_ => Cow::Owned(escape_attr(trimmed)),
	}
}

/// Escape a multi-line text and turn line breaks into `<br />`
pub fn text_with_breaks(text: &str) -> String {
	html_escape(text.trim()).replace("\r\n", "\n").replace('\n', "<br />")
}

/// Render `<p>` elements, one per blank-line separated paragraph
pub fn paragraphs(text: &str) -> String {
	let mut html = String::new();
	for paragraph in text
		.split("\n\n")
		.map(str::trim)
		.filter(|p| !p.is_empty())
	{
		let _ = write!(html, "<p>{}</p>", text_with_breaks(paragraph));
	}
	html
}
