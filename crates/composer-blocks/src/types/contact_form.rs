use crate::html::{escape_attr, html_escape};
use crate::schema::{BlockCategory, BlockSchema};
use composer_forms::{BooleanField, CharField, ChoiceField, EditorForm, ListField};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactFieldKind {
	#[default]
	Text,
	Email,
	Textarea,
	Phone,
}

impl ContactFieldKind {
	pub const ALL: [ContactFieldKind; 4] = [
		ContactFieldKind::Text,
		ContactFieldKind::Email,
		ContactFieldKind::Textarea,
		ContactFieldKind::Phone,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			ContactFieldKind::Text => "text",
			ContactFieldKind::Email => "email",
			ContactFieldKind::Textarea => "textarea",
			ContactFieldKind::Phone => "phone",
		}
	}

	pub fn label(&self) -> &'static str {
		match self {
			ContactFieldKind::Text => "Single line",
			ContactFieldKind::Email => "Email address",
			ContactFieldKind::Textarea => "Multi-line",
			ContactFieldKind::Phone => "Phone number",
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContactField {
	pub label: String,
	pub kind: ContactFieldKind,
	pub required: bool,
}

/// Visitor contact form; the preview is inert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContactForm {
	pub title: String,
	pub description: String,
	pub submit_label: String,
	pub recipient_email: String,
	pub fields: Vec<ContactField>,
}

impl Default for ContactForm {
	fn default() -> Self {
		let field = |label: &str, kind, required| ContactField {
			label: label.to_string(),
			kind,
			required,
		};
		Self {
			title: "Contact us".to_string(),
			description: String::new(),
			submit_label: "Send".to_string(),
			recipient_email: String::new(),
			fields: vec![
				field("Name", ContactFieldKind::Text, true),
				field("Email", ContactFieldKind::Email, true),
				field("Message", ContactFieldKind::Textarea, false),
			],
		}
	}
}

impl BlockSchema for ContactForm {
	const TYPE: &'static str = "contact_form";
	const LABEL: &'static str = "Contact form";
	const DESCRIPTION: &'static str = "A form visitors use to send you a message";
	const CATEGORY: BlockCategory = BlockCategory::Forms;

	fn editor() -> EditorForm {
		EditorForm::new()
			.field(CharField::new("title"))
			.field(CharField::new("description").textarea())
			.field(CharField::new("submit_label").required().with_label("Button label"))
			.field(
				CharField::new("recipient_email")
					.email()
					.with_help_text("Submissions are forwarded to this address"),
			)
			.field(
				ListField::new("fields")
					.with_label("Form fields")
					.with_item_label("Field")
					.with_max_items(20)
					.field(CharField::new("label").required())
					.field(ChoiceField::new(
						"kind",
						ContactFieldKind::ALL.iter().map(|k| (k.as_str(), k.label())),
					))
					.field(BooleanField::new("required")),
			)
	}

	fn render(&self) -> String {
		let mut html = String::from(r#"<div class="composer-contact-form">"#);
		if !self.title.is_empty() {
			let _ = write!(html, "<h2>{}</h2>", html_escape(&self.title));
		}
		if !self.description.is_empty() {
			let _ = write!(html, "<p>{}</p>", html_escape(&self.description));
		}
		html.push_str(r#"<form onsubmit="return false;">"#);
		for (index, field) in self.fields.iter().enumerate() {
			let id = format!("contact-{}", index);
			let required = if field.required { " required" } else { "" };
			let marker = if field.required {
				r#" <span class="required">*</span>"#
			} else {
				""
			};
			let _ = write!(
				html,
				r#"<div class="form-group"><label for="{}">{}{}</label>"#,
				id,
				html_escape(&field.label),
				marker
			);
			let _ = match field.kind {
				ContactFieldKind::Textarea => write!(
					html,
					r#"<textarea id="{}" name="{}" rows="4"{}></textarea>"#,
					id,
					escape_attr(&field.label),
					required
				),
				kind => write!(
					html,
					r#"<input type="{}" id="{}" name="{}"{} />"#,
					match kind {
						ContactFieldKind::Email => "email",
						ContactFieldKind::Phone => "tel",
						_ => "text",
					},
					id,
					escape_attr(&field.label),
					required
				),
			};
			html.push_str("</div>");
		}
		let _ = write!(
			html,
			r#"<button type="submit" class="btn btn-primary">{}</button></form></div>"#,
			html_escape(&self.submit_label)
		);
		html
	}
}
