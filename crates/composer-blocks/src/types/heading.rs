use super::Alignment;
use crate::html::html_escape;
use crate::schema::{BlockCategory, BlockSchema};
use composer_forms::{CharField, ChoiceField, EditorForm};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingLevel {
	H1,
	#[default]
	H2,
	H3,
	H4,
	H5,
	H6,
}

impl HeadingLevel {
	pub const ALL: [HeadingLevel; 6] = [
		HeadingLevel::H1,
		HeadingLevel::H2,
		HeadingLevel::H3,
		HeadingLevel::H4,
		HeadingLevel::H5,
		HeadingLevel::H6,
	];

	/// Tag name, also the stored value
	pub fn as_str(&self) -> &'static str {
		match self {
			HeadingLevel::H1 => "h1",
			HeadingLevel::H2 => "h2",
			HeadingLevel::H3 => "h3",
			HeadingLevel::H4 => "h4",
			HeadingLevel::H5 => "h5",
			HeadingLevel::H6 => "h6",
		}
	}

	pub fn label(&self) -> &'static str {
		match self {
			HeadingLevel::H1 => "Heading 1",
			HeadingLevel::H2 => "Heading 2",
			HeadingLevel::H3 => "Heading 3",
			HeadingLevel::H4 => "Heading 4",
			HeadingLevel::H5 => "Heading 5",
			HeadingLevel::H6 => "Heading 6",
		}
	}
}

/// A standalone section heading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Heading {
	pub text: String,
	pub level: HeadingLevel,
	pub align: Alignment,
}

impl Default for Heading {
	fn default() -> Self {
		Self {
			text: "Heading".to_string(),
			level: HeadingLevel::default(),
			align: Alignment::default(),
		}
	}
}

impl BlockSchema for Heading {
	const TYPE: &'static str = "heading";
	const LABEL: &'static str = "Heading";
	const DESCRIPTION: &'static str = "A section title from H1 to H6";
	const CATEGORY: BlockCategory = BlockCategory::Basic;

	fn editor() -> EditorForm {
		EditorForm::new()
			.field(CharField::new("text").required().with_max_length(200))
			.field(
				ChoiceField::new(
					"level",
					HeadingLevel::ALL.iter().map(|l| (l.as_str(), l.label())),
				)
				.with_initial(HeadingLevel::default().as_str()),
			)
			.field(Alignment::field("align"))
	}

	fn render(&self) -> String {
		format!(
			r#"<{tag} class="composer-heading {align}">{text}</{tag}>"#,
			tag = self.level.as_str(),
			align = self.align.class(),
			text = html_escape(&self.text)
		)
	}
}
