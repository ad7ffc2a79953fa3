use crate::html::html_escape;
use crate::schema::{BlockCategory, BlockSchema};
use composer_forms::{CharField, EditorForm, IntegerField, ListField};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

const MIN_COLUMNS: i64 = 2;
const MAX_COLUMNS: i64 = 4;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeatureItem {
	pub icon: String,
	pub title: String,
	pub description: String,
}

/// Grid of feature cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Features {
	pub title: String,
	pub columns: i64,
	pub items: Vec<FeatureItem>,
}

impl Default for Features {
	fn default() -> Self {
		let item = |title: &str| FeatureItem {
			icon: "star".to_string(),
			title: title.to_string(),
			description: "Describe this feature.".to_string(),
		};
		Self {
			title: "Features".to_string(),
			columns: 3,
			items: vec![item("Fast"), item("Reliable"), item("Secure")],
		}
	}
}

impl BlockSchema for Features {
	const TYPE: &'static str = "features";
	const LABEL: &'static str = "Feature grid";
	const DESCRIPTION: &'static str = "Cards with an icon, title and short description";
	const CATEGORY: BlockCategory = BlockCategory::Sections;

	fn editor() -> EditorForm {
		EditorForm::new()
			.field(CharField::new("title"))
			.field(
				IntegerField::new("columns")
					.with_range(MIN_COLUMNS, MAX_COLUMNS)
					.with_initial(3),
			)
			.field(
				ListField::new("items")
					.with_label("Features")
					.with_item_label("Feature")
					.with_max_items(12)
					.field(CharField::new("icon").with_help_text("Icon name, e.g. star"))
					.field(CharField::new("title").required())
					.field(CharField::new("description").textarea()),
			)
	}

	fn render(&self) -> String {
		let columns = self.columns.clamp(MIN_COLUMNS, MAX_COLUMNS);
		let mut html = String::from(r#"<div class="composer-features">"#);
		if !self.title.is_empty() {
			let _ = write!(html, "<h2>{}</h2>", html_escape(&self.title));
		}
		let _ = write!(html, r#"<div class="composer-grid columns-{}">"#, columns);
		for item in &self.items {
			html.push_str(r#"<div class="composer-feature">"#);
			if !item.icon.is_empty() {
				let _ = write!(
					html,
					r#"<span class="icon icon-{}" aria-hidden="true"></span>"#,
					html_escape(&item.icon)
				);
			}
			let _ = write!(
				html,
				"<h3>{}</h3><p>{}</p></div>",
				html_escape(&item.title),
				html_escape(&item.description)
			);
		}
		html.push_str("</div></div>");
		html
	}
}
