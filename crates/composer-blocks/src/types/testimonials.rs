use crate::html::{escape_attr, html_escape, sanitize_url};
use crate::schema::{BlockCategory, BlockSchema};
use composer_forms::{CharField, EditorForm, ListField};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Testimonial {
	pub quote: String,
	pub author: String,
	pub role: String,
	pub avatar_url: String,
}

/// Quotes from customers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Testimonials {
	pub title: String,
	pub items: Vec<Testimonial>,
}

impl Default for Testimonials {
	fn default() -> Self {
		Self {
			title: "What our customers say".to_string(),
			items: vec![Testimonial {
				quote: "It changed the way we work.".to_string(),
				author: "Jane Doe".to_string(),
				role: "CEO, Example Inc.".to_string(),
				avatar_url: String::new(),
			}],
		}
	}
}

impl BlockSchema for Testimonials {
	const TYPE: &'static str = "testimonials";
	const LABEL: &'static str = "Testimonials";
	const DESCRIPTION: &'static str = "Customer quotes with name, role and photo";
	const CATEGORY: BlockCategory = BlockCategory::SocialProof;

	fn editor() -> EditorForm {
		EditorForm::new()
			.field(CharField::new("title"))
			.field(
				ListField::new("items")
					.with_label("Testimonials")
					.with_item_label("Testimonial")
					.field(CharField::new("quote").required().textarea())
					.field(CharField::new("author").required())
					.field(CharField::new("role"))
					.field(CharField::new("avatar_url").url().with_label("Photo URL")),
			)
	}

	fn render(&self) -> String {
		let mut html = String::from(r#"<div class="composer-testimonials">"#);
		if !self.title.is_empty() {
			let _ = write!(html, "<h2>{}</h2>", html_escape(&self.title));
		}
		for item in &self.items {
			let _ = write!(
				html,
				r#"<blockquote class="composer-testimonial"><p>{}</p><footer>"#,
				html_escape(&item.quote)
			);
			if !item.avatar_url.trim().is_empty() {
				let _ = write!(
					html,
					r#"<img class="avatar" src="{}" alt="{}" />"#,
					sanitize_url(&item.avatar_url),
					escape_attr(&item.author)
				);
			}
			let _ = write!(html, "<cite>{}</cite>", html_escape(&item.author));
			if !item.role.is_empty() {
				let _ = write!(html, r#"<span class="role">{}</span>"#, html_escape(&item.role));
			}
			html.push_str("</footer></blockquote>");
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
	fn test_testimonials_render_each_quote() {
		// Arrange
		let block = Testimonials {
			title: String::new(),
			items: vec![
				Testimonial {
					quote: "<3".to_string(),
					author: "Ada".to_string(),
					..Testimonial::default()
				},
				Testimonial {
					quote: "Great".to_string(),
					author: "Linus".to_string(),
					role: "Maintainer".to_string(),
					avatar_url: "https://example.com/l.png".to_string(),
				},
			],
		};

		// Act
		let html = block.render();

		// Assert
		assert!(!html.contains("<h2>"));
		assert_eq!(html.matches("<blockquote").count(), 2);
		assert!(html.contains("<p>&lt;3</p>"));
		assert!(html.contains(r#"<img class="avatar" src="https://example.com/l.png" alt="Linus" />"#));
		assert!(html.contains(r#"<span class="role">Maintainer</span>"#));
	}
}
