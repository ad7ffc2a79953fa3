use crate::html::{html_escape, paragraphs, sanitize_url};
use crate::schema::{BlockCategory, BlockSchema};
use composer_forms::{CharField, EditorForm};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Prompt with a single button
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CallToAction {
	pub title: String,
	pub body: String,
	pub button_label: String,
	pub button_url: String,
}

impl Default for CallToAction {
	fn default() -> Self {
		Self {
			title: "Ready to get started?".to_string(),
			body: String::new(),
			button_label: "Get started".to_string(),
			button_url: "#".to_string(),
		}
	}
}

impl BlockSchema for CallToAction {
	const TYPE: &'static str = "call_to_action";
	const LABEL: &'static str = "Call to action";
	const DESCRIPTION: &'static str = "A short prompt with one prominent button";
	const CATEGORY: BlockCategory = BlockCategory::Sections;

	fn editor() -> EditorForm {
		EditorForm::new()
			.field(CharField::new("title").required())
			.field(CharField::new("body").textarea().no_strip())
			.field(CharField::new("button_label").required())
			.field(
				CharField::new("button_url")
					.link()
					.with_label("Button link")
					.with_initial("#"),
			)
	}

	fn render(&self) -> String {
		let mut html = format!(
			r#"<div class="composer-cta"><h2>{}</h2>"#,
			html_escape(&self.title)
		);
		html.push_str(&paragraphs(&self.body));
		if !self.button_label.is_empty() {
			let target = if self.button_url.trim().is_empty() {
				"#".into()
			} else {
				sanitize_url(&self.button_url)
			};
			let _ = write!(
				html,
				r#"<a class="btn btn-primary" href="{}">{}</a>"#,
				target,
				html_escape(&self.button_label)
			);
		}
		html.push_str("</div>");
		html
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_cta_renders_button() {
		let html = CallToAction::default().render();
		assert!(html.contains("<h2>Ready to get started?</h2>"));
		assert!(html.contains(r##"<a class="btn btn-primary" href="#">Get started</a>"##));
	}

	#[rstest]
	fn test_cta_empty_url_falls_back_to_anchor() {
		let cta = CallToAction {
			button_url: "  ".to_string(),
			..CallToAction::default()
		};
		assert!(cta.render().contains(r##"href="#""##));
	}
}
