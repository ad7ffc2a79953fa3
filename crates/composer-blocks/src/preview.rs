//! Read-only preview rendering
//!
//! The renderer never fails: a block whose type is not registered, or whose
//! content does not match its schema, renders as a marked placeholder so one
//! bad block cannot blank the whole page.

use crate::block::Block;
use crate::html::{escape_attr, html_escape};
use crate::registry::BlockRegistry;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Presentation switches for the preview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewOptions {
	/// Wrap each block in a `<section class="composer-block">` element
	pub wrap_sections: bool,
	/// Emit `data-block-id`, `data-block-type` and `data-order-index` on the
	/// section wrapper
	pub data_attributes: bool,
}

impl Default for PreviewOptions {
	fn default() -> Self {
		Self {
			wrap_sections: true,
			data_attributes: true,
		}
	}
}

impl PreviewOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_wrap_sections(mut self, wrap_sections: bool) -> Self {
		self.wrap_sections = wrap_sections;
		self
	}

	pub fn with_data_attributes(mut self, data_attributes: bool) -> Self {
		self.data_attributes = data_attributes;
		self
	}
}

/// Renders blocks through their registered renderers
#[derive(Debug, Clone)]
pub struct PreviewRenderer<'a> {
	registry: &'a BlockRegistry,
	options: PreviewOptions,
}

impl<'a> PreviewRenderer<'a> {
	pub fn new(registry: &'a BlockRegistry) -> Self {
		Self {
			registry,
			options: PreviewOptions::default(),
		}
	}

	pub fn with_options(mut self, options: PreviewOptions) -> Self {
		self.options = options;
		self
	}

	pub fn options(&self) -> &PreviewOptions {
		&self.options
	}

	/// Render every block in `order_index` order inside the preview container
	///
	/// # Examples
	///
	/// ```
	/// use composer_blocks::{Block, BlockRegistry, PageId, PreviewRenderer};
	/// use serde_json::json;
	///
	/// let registry = BlockRegistry::builtin();
	/// let page = PageId::new();
	/// let blocks = vec![
	/// 	Block::new(page, "text", json!({"body": "Second"}), 1),
	/// 	Block::new(page, "heading", json!({"text": "First"}), 0),
	/// ];
	///
	/// let html = PreviewRenderer::new(&registry).render(&blocks);
	/// assert!(html.find("First").unwrap() < html.find("Second").unwrap());
	/// ```
	pub fn render<'b, I>(&self, blocks: I) -> String
	where
		I: IntoIterator<Item = &'b Block>,
	{
		let mut ordered: Vec<&Block> = blocks.into_iter().collect();
		ordered.sort_by_key(|b| b.order_index());

		let mut html = String::from(r#"<div class="composer-preview">"#);
		for block in ordered {
			html.push_str(&self.render_block(block));
		}
		html.push_str("</div>");
		html
	}

	/// Render one block, wrapped according to the options
	pub fn render_block(&self, block: &Block) -> String {
		self.wrap(block, &self.render_inner(block), "")
	}

	/// Render a block's body without the section wrapper
	pub fn render_inner(&self, block: &Block) -> String {
		let descriptor = match self.registry.get_descriptor(block.block_type().as_str()) {
			Ok(descriptor) => descriptor,
			Err(_) => {
				tracing::warn!(
					block_id = %block.id(),
					block_type = %block.block_type(),
					"Rendering placeholder for unregistered block type"
				);
				return placeholder(block, "This block type is not available");
			}
		};
		match descriptor.render(block.content()) {
			Ok(html) => html,
			Err(e) => {
				tracing::warn!(
					block_id = %block.id(),
					block_type = %block.block_type(),
					error = %e,
					"Rendering placeholder for block with invalid content"
				);
				placeholder(block, "This block could not be displayed")
			}
		}
	}

	/// Wrap rendered markup in the block's section element. `extra_class` is
	/// appended to the class list when non-empty.
	pub fn wrap(&self, block: &Block, inner: &str, extra_class: &str) -> String {
		if !self.options.wrap_sections {
			return inner.to_string();
		}
		let mut html = format!(
			r#"<section class="composer-block composer-block--{}"#,
			escape_attr(block.block_type().as_str())
		);
		if !extra_class.is_empty() {
			let _ = write!(html, " {}", escape_attr(extra_class));
		}
		html.push('"');
		if self.options.data_attributes {
			let _ = write!(
				html,
				r#" data-block-id="{}" data-block-type="{}" data-order-index="{}""#,
				block.id(),
				escape_attr(block.block_type().as_str()),
				block.order_index()
			);
		}
		let _ = write!(html, ">{}</section>", inner);
		html
	}
}

/// Visibly marked stand-in for a block that cannot be rendered
pub fn placeholder(block: &Block, message: &str) -> String {
	format!(
		r#"<div class="composer-block-placeholder" role="note"><strong>{}</strong> <code>{}</code></div>"#,
		html_escape(message),
		html_escape(block.block_type().as_str())
	)
}
