use crate::html::{html_escape, paragraphs};
use crate::schema::{BlockCategory, BlockSchema};
use composer_forms::{CharField, EditorForm, ListField};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FaqItem {
	pub question: String,
	pub answer: String,
}

/// Frequently asked questions, rendered as disclosure widgets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Faq {
	pub title: String,
	pub items: Vec<FaqItem>,
}

impl Default for Faq {
	fn default() -> Self {
		Self {
			title: "Frequently asked questions".to_string(),
			items: vec![FaqItem {
				question: "How does it work?".to_string(),
				answer: "Explain the answer here.".to_string(),
			}],
		}
	}
}

impl BlockSchema for Faq {
	const TYPE: &'static str = "faq";
	const LABEL: &'static str = "FAQ";
	const DESCRIPTION: &'static str = "Questions and answers that expand on click";
	const CATEGORY: BlockCategory = BlockCategory::SocialProof;

	fn editor() -> EditorForm {
		EditorForm::new().field(CharField::new("title")).field(
			ListField::new("items")
				.with_label("Questions")
				.with_item_label("Question")
				.field(CharField::new("question").required())
				.field(CharField::new("answer").required().textarea().no_strip()),
		)
	}

	fn render(&self) -> String {
		let mut html = String::from(r#"<div class="composer-faq">"#);
		if !self.title.is_empty() {
			let _ = write!(html, "<h2>{}</h2>", html_escape(&self.title));
		}
		for item in &self.items {
			let _ = write!(
				html,
				"<details><summary>{}</summary>{}</details>",
				html_escape(&item.question),
				paragraphs(&item.answer)
			);
		}
		html.push_str("</div>");
		html
	}
}
