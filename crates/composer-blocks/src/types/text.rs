use super::Alignment;
use crate::html::paragraphs;
use crate::schema::{BlockCategory, BlockSchema};
use composer_forms::{CharField, EditorForm};
use serde::{Deserialize, Serialize};

/// Free-form paragraphs of text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Text {
	pub body: String,
	pub align: Alignment,
}

impl Default for Text {
	fn default() -> Self {
		Self {
			body: "Start writing here.".to_string(),
			align: Alignment::default(),
		}
	}
}

impl BlockSchema for Text {
	const TYPE: &'static str = "text";
	const LABEL: &'static str = "Text";
	const DESCRIPTION: &'static str = "Paragraphs of body text";
	const CATEGORY: BlockCategory = BlockCategory::Basic;

	fn editor() -> EditorForm {
		EditorForm::new()
			.field(
				CharField::new("body")
					.required()
					.textarea()
					.no_strip()
					.with_help_text("Separate paragraphs with an empty line"),
			)
			.field(Alignment::field("align"))
	}

	fn render(&self) -> String {
		format!(
			r#"<div class="composer-text {}">{}</div>"#,
			self.align.class(),
			paragraphs(&self.body)
		)
	}
}
