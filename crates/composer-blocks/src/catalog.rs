//! Type picker over the registry catalog

use crate::block::BlockType;
use crate::error::BlockResult;
use crate::html::{escape_attr, html_escape};
use crate::registry::{BlockRegistry, CategoryGroup};
use std::fmt::Write;

/// Categorized, filterable view of the registry used to choose a block type
///
/// # Examples
///
/// ```
/// use composer_blocks::{BlockRegistry, TypePicker};
///
/// let registry = BlockRegistry::builtin();
/// let picker = TypePicker::new(&registry).with_filter("QUOTE");
///
/// let groups = picker.groups();
/// assert_eq!(groups.len(), 1);
/// assert_eq!(groups[0].entries[0].block_type.as_str(), "testimonials");
/// ```
#[derive(Debug, Clone)]
pub struct TypePicker<'a> {
	registry: &'a BlockRegistry,
	filter: String,
}

impl<'a> TypePicker<'a> {
	pub fn new(registry: &'a BlockRegistry) -> Self {
		Self {
			registry,
			filter: String::new(),
		}
	}

	pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
		self.filter = filter.into();
		self
	}

	pub fn set_filter(&mut self, filter: impl Into<String>) {
		self.filter = filter.into();
	}

	pub fn filter(&self) -> &str {
		&self.filter
	}

	/// Groups whose entries match the current filter; empty groups are dropped
	pub fn groups(&self) -> Vec<CategoryGroup> {
		self.registry
			.list_categories()
			.into_iter()
			.filter_map(|mut group| {
				group.entries.retain(|entry| entry.matches(&self.filter));
				(!group.entries.is_empty()).then_some(group)
			})
			.collect()
	}

	/// Number of entries visible under the current filter
	pub fn visible_count(&self) -> usize {
		self.groups().iter().map(|g| g.entries.len()).sum()
	}

	/// Resolve a picked tag; only registered tags can be chosen
	pub fn choose(&self, block_type: &str) -> BlockResult<BlockType> {
		self.registry
			.get_descriptor(block_type)
			.map(|d| d.block_type().clone())
	}

	/// Render the picker listing. Each entry is a button carrying its tag in
	/// `data-block-type`.
	pub fn render(&self) -> String {
		let mut html = format!(
			r#"<div class="composer-type-picker"><input type="search" class="form-control" name="block-filter" placeholder="Search blocks" value="{}" />"#,
			escape_attr(&self.filter)
		);
		let groups = self.groups();
		if groups.is_empty() {
			html.push_str(r#"<p class="composer-type-picker-empty">No block types match</p>"#);
		}
		for group in groups {
			let _ = write!(
				html,
				r#"<section class="composer-type-group"><h4>{}</h4><ul>"#,
				html_escape(group.category.label())
			);
			for entry in group.entries {
				let _ = write!(
					html,
					r#"<li><button type="button" data-block-type="{}"><strong>{}</strong><small>{}</small></button></li>"#,
					escape_attr(entry.block_type.as_str()),
					html_escape(&entry.label),
					html_escape(&entry.description)
				);
			}
			html.push_str("</ul></section>");
		}
		html.push_str("</div>");
		html
	}
}
