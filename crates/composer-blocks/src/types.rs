//! Built-in block types
//!
//! Each module defines one closed content record and implements
//! [`BlockSchema`](crate::schema::BlockSchema) for it.

pub mod call_to_action;
pub mod contact_form;
pub mod faq;
pub mod features;
pub mod heading;
pub mod hero;
pub mod image;
pub mod testimonials;
pub mod text;

pub use call_to_action::CallToAction;
pub use contact_form::{ContactField, ContactFieldKind, ContactForm};
pub use faq::{Faq, FaqItem};
pub use features::{FeatureItem, Features};
pub use heading::{Heading, HeadingLevel};
pub use hero::Hero;
pub use image::Image;
pub use testimonials::{Testimonial, Testimonials};
pub use text::Text;

use crate::schema::BlockTypeDescriptor;
use composer_forms::ChoiceField;
use serde::{Deserialize, Serialize};

/// Descriptors of every built-in type, in picker order
pub fn builtin() -> Vec<BlockTypeDescriptor> {
	vec![
		BlockTypeDescriptor::of::<Heading>(),
		BlockTypeDescriptor::of::<Text>(),
		BlockTypeDescriptor::of::<Image>(),
		BlockTypeDescriptor::of::<Hero>(),
		BlockTypeDescriptor::of::<Features>(),
		BlockTypeDescriptor::of::<CallToAction>(),
		BlockTypeDescriptor::of::<Testimonials>(),
		BlockTypeDescriptor::of::<Faq>(),
		BlockTypeDescriptor::of::<ContactForm>(),
	]
}

/// Horizontal text alignment shared by several block types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
	#[default]
	Left,
	Center,
	Right,
}

impl Alignment {
	pub const ALL: [Alignment; 3] = [Alignment::Left, Alignment::Center, Alignment::Right];

	pub fn as_str(&self) -> &'static str {
		match self {
			Alignment::Left => "left",
			Alignment::Center => "center",
			Alignment::Right => "right",
		}
	}

	pub fn label(&self) -> &'static str {
		match self {
			Alignment::Left => "Left",
			Alignment::Center => "Center",
			Alignment::Right => "Right",
		}
	}

	/// CSS class applied by renderers
	pub fn class(&self) -> String {
		format!("text-{}", self.as_str())
	}

	pub(crate) fn field(name: &str) -> ChoiceField {
		ChoiceField::new(name, Self::ALL.iter().map(|a| (a.as_str(), a.label())))
			.with_label("Alignment")
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use composer_forms::EditorField;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_builtin_tags_are_unique() {
		let descriptors = builtin();
		let mut tags: Vec<&str> = descriptors.iter().map(|d| d.block_type().as_str()).collect();
		tags.sort();
		tags.dedup();
		assert_eq!(tags.len(), descriptors.len());
	}

	#[rstest]
	fn test_editor_covers_exactly_the_schema() {
		for descriptor in builtin() {
			// Arrange
			let initial = descriptor.editor().initial_content();

			// Act
			let mut form_keys: Vec<&String> = initial.as_object().unwrap().keys().collect();
			let mut schema_keys: Vec<&String> =
				descriptor.default_content().as_object().unwrap().keys().collect();
			form_keys.sort();
			schema_keys.sort();

			// Assert
			assert_eq!(form_keys, schema_keys, "{}", descriptor.block_type());
			assert!(
				descriptor.conform(&initial).is_ok(),
				"initial form content of {} must conform",
				descriptor.block_type()
			);
		}
	}

	#[rstest]
	fn test_new_list_items_conform() {
		for descriptor in builtin() {
			let editor = descriptor.editor();
			for field in editor.fields() {
				let Some(list) = field.as_list() else {
					continue;
				};
				// Arrange
				let mut content = descriptor.default_content().clone();
				content[field.name()] = json!([list.new_item()]);

				// Act & Assert
				assert!(
					descriptor.conform(&content).is_ok(),
					"new {} entry of {} must conform",
					field.name(),
					descriptor.block_type()
				);
			}
		}
	}

	#[rstest]
	fn test_default_content_renders() {
		for descriptor in builtin() {
			let html = descriptor.render(descriptor.default_content()).unwrap();
			assert!(!html.is_empty(), "{}", descriptor.block_type());
		}
	}

	#[rstest]
	fn test_alignment_serde() {
		assert_eq!(serde_json::to_value(Alignment::Center).unwrap(), json!("center"));
		let field = Alignment::field("align");
		assert_eq!(field.empty_value(), json!("left"));
	}
}
