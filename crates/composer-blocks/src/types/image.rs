use crate::html::{escape_attr, html_escape, sanitize_url};
use crate::schema::{BlockCategory, BlockSchema};
use composer_forms::{CharField, EditorForm};
use serde::{Deserialize, Serialize};

/// A single image with optional caption
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Image {
	pub src: String,
	pub alt: String,
	pub caption: String,
}

impl BlockSchema for Image {
	const TYPE: &'static str = "image";
	const LABEL: &'static str = "Image";
	const DESCRIPTION: &'static str = "A picture with alternative text and an optional caption";
	const CATEGORY: BlockCategory = BlockCategory::Media;

	fn editor() -> EditorForm {
		EditorForm::new()
			.field(
				CharField::new("src")
					.required()
					.url()
					.with_label("Image URL"),
			)
			.field(
				CharField::new("alt")
					.with_label("Alternative text")
					.with_help_text("Describes the image for screen readers"),
			)
			.field(CharField::new("caption"))
	}

	fn render(&self) -> String {
		if self.src.trim().is_empty() {
			return r#"<figure class="composer-image composer-image--empty"><div class="composer-image-placeholder">No image selected</div></figure>"#.to_string();
		}
		let mut html = format!(
			r#"<figure class="composer-image"><img src="{}" alt="{}" loading="lazy" />"#,
			sanitize_url(&self.src),
			escape_attr(&self.alt)
		);
		if !self.caption.is_empty() {
			html.push_str(&format!(
				"<figcaption>{}</figcaption>",
				html_escape(&self.caption)
			));
		}
		html.push_str("</figure>");
		html
	}
}
