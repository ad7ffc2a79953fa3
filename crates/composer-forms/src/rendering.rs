//! HTML rendering for editor fields
//!
//! Server-side rendering of the property form. The composer front end binds
//! to the `name` attributes (see [`FieldPath`](crate::FieldPath)) and to the
//! `data-action` attributes of the repeater buttons.

use crate::bound_field::BoundField;
use crate::field::Widget;
use std::borrow::Cow;
use std::fmt::Write;

/// Escapes HTML special characters in a string.
///
/// This function replaces the following characters:
/// - `&` → `&amp;`
/// - `<` → `&lt;`
/// - `>` → `&gt;`
/// - `"` → `&quot;`
/// - `'` → `&#x27;`
///
/// Returns a borrowed reference if no escaping is needed,
/// or an owned string if any characters were escaped.
///
/// # Examples
///
/// ```
/// use composer_forms::rendering::html_escape;
///
/// assert_eq!(html_escape("plain"), "plain");
/// assert_eq!(html_escape("<b>\"hi\"</b>"), "&lt;b&gt;&quot;hi&quot;&lt;/b&gt;");
/// ```
pub fn html_escape(s: &str) -> Cow<'_, str> {
	if s.contains(['&', '<', '>', '"', '\'']) {
		let mut escaped = String::with_capacity(s.len() + 8);
		for c in s.chars() {
			match c {
				'&' => escaped.push_str("&amp;"),
				'<' => escaped.push_str("&lt;"),
				'>' => escaped.push_str("&gt;"),
				'"' => escaped.push_str("&quot;"),
				'\'' => escaped.push_str("&#x27;"),
				_ => escaped.push(c),
			}
		}
		Cow::Owned(escaped)
	} else {
		Cow::Borrowed(s)
	}
}

/// Escape for attribute values; additionally encodes line breaks
pub fn escape_attr(s: &str) -> String {
	html_escape(s).replace('\n', "&#10;").replace('\r', "&#13;")
}

/// Render the `<ul class="errorlist">` block for a field
pub fn render_errors(errors: &[String]) -> String {
	if errors.is_empty() {
		return String::new();
	}
	let mut html = String::from(r#"<ul class="errorlist">"#);
	for error in errors {
		let _ = write!(html, "<li>{}</li>", html_escape(error));
	}
	html.push_str("</ul>");
	html
}

/// Render the input element of a scalar field
pub fn render_widget(bound: &BoundField<'_>) -> String {
	let name = escape_attr(&bound.html_name());
	let id = escape_attr(&bound.id_for_label());
	let required = if bound.field().required() {
		" required"
	} else {
		""
	};
	let invalid = if bound.has_errors() {
		r#" aria-invalid="true""#
	} else {
		""
	};

	match bound.widget() {
		Widget::TextArea => format!(
			r#"<textarea id="{}" name="{}" class="form-control" rows="4"{}{}>{}</textarea>"#,
			id,
			name,
			required,
			invalid,
			html_escape(&bound.value_text())
		),
		Widget::CheckboxInput => format!(
			r#"<input type="checkbox" id="{}" name="{}" class="form-check-input"{}{} />"#,
			id,
			name,
			if bound.is_checked() { " checked" } else { "" },
			invalid
		),
		Widget::Select => {
			let current = bound.value_text();
			let mut html = format!(
				r#"<select id="{}" name="{}" class="form-select"{}>"#,
				id, name, invalid
			);
			for (value, label) in bound.field().choices() {
				let _ = write!(
					html,
					r#"<option value="{}"{}>{}</option>"#,
					escape_attr(value),
					if *value == current { " selected" } else { "" },
					html_escape(label)
				);
			}
			html.push_str("</select>");
			html
		}
		widget => format!(
			r#"<input type="{}" id="{}" name="{}" value="{}" class="form-control"{}{} />"#,
			widget.input_type().unwrap_or("text"),
			id,
			name,
			escape_attr(&bound.value_text()),
			required,
			invalid
		),
	}
}

/// Render a scalar field group: label, input, help text and inline errors
pub fn render_bound_field(bound: &BoundField<'_>) -> String {
	let mut html = format!(
		r#"<div class="form-group{}" data-field="{}">"#,
		if bound.has_errors() { " has-error" } else { "" },
		escape_attr(&bound.html_name())
	);
	let _ = write!(
		html,
		r#"<label for="{}">{}</label>"#,
		escape_attr(&bound.id_for_label()),
		html_escape(&bound.label())
	);
	html.push_str(&render_widget(bound));
	if let Some(help) = bound.field().help_text() {
		let _ = write!(
			html,
			r#"<small class="help-text">{}</small>"#,
			html_escape(help)
		);
	}
	html.push_str(&render_errors(bound.errors()));
	html.push_str("</div>");
	html
}
