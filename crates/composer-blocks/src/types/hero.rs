use super::Alignment;
use crate::html::{html_escape, sanitize_url};
use crate::schema::{BlockCategory, BlockSchema};
use composer_forms::{CharField, EditorForm};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Full-width banner at the top of a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Hero {
	pub title: String,
	pub subtitle: String,
	pub background_image: String,
	pub cta_label: String,
	pub cta_url: String,
	pub align: Alignment,
}

impl Default for Hero {
	fn default() -> Self {
		Self {
			title: "Welcome to our site".to_string(),
			subtitle: "Tell visitors what you do in one sentence.".to_string(),
			background_image: String::new(),
			cta_label: String::new(),
			cta_url: String::new(),
			align: Alignment::Center,
		}
	}
}

impl BlockSchema for Hero {
	const TYPE: &'static str = "hero";
	const LABEL: &'static str = "Hero banner";
	const DESCRIPTION: &'static str = "Large headline with subtitle, background image and call-to-action button";
	const CATEGORY: BlockCategory = BlockCategory::Sections;

	fn editor() -> EditorForm {
		EditorForm::new()
			.field(CharField::new("title").required().with_max_length(120))
			.field(CharField::new("subtitle").textarea())
			.field(
				CharField::new("background_image")
					.url()
					.with_label("Background image URL"),
			)
			.field(CharField::new("cta_label").with_label("Button label"))
			.field(CharField::new("cta_url").link().with_label("Button link"))
			.field(Alignment::field("align").with_initial("center"))
	}

	fn render(&self) -> String {
		let mut html = String::from(r#"<div class="composer-hero"#);
		if self.background_image.trim().is_empty() {
			html.push('"');
		} else {
			let _ = write!(
				html,
				r#" composer-hero--image" style="background-image: url('{}')""#,
				sanitize_url(&self.background_image)
			);
		}
		let _ = write!(
			html,
			r#"><div class="composer-hero-inner {}"><h1>{}</h1>"#,
			self.align.class(),
			html_escape(&self.title)
		);
		if !self.subtitle.is_empty() {
			let _ = write!(html, r#"<p class="lead">{}</p>"#, html_escape(&self.subtitle));
		}
		// A button needs both a label and a target
		if !self.cta_label.is_empty() && !self.cta_url.is_empty() {
			let _ = write!(
				html,
				r#"<a class="btn btn-primary" href="{}">{}</a>"#,
				sanitize_url(&self.cta_url),
				html_escape(&self.cta_label)
			);
		}
		html.push_str("</div></div>");
		html
	}
}
