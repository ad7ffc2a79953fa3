//! Registry of available block types
//!
//! The registry is assembled once at startup and never mutated afterwards.
//! Every lookup goes through a map keyed by type tag; the descriptor list
//! keeps registration order for the picker.

use crate::block::BlockType;
use crate::error::{BlockError, BlockResult};
use crate::schema::{BlockCategory, BlockSchema, BlockTypeDescriptor};
use crate::types;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One picker entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
	pub block_type: BlockType,
	pub label: String,
	pub description: String,
}

impl CatalogEntry {
	/// Case-insensitive substring match against label or description
	pub fn matches(&self, query: &str) -> bool {
		let query = query.trim().to_lowercase();
		query.is_empty()
			|| self.label.to_lowercase().contains(&query)
			|| self.description.to_lowercase().contains(&query)
	}
}

/// Picker entries of one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGroup {
	pub category: BlockCategory,
	pub entries: Vec<CatalogEntry>,
}

/// Closed set of block types keyed by tag
#[derive(Debug, Default)]
pub struct BlockRegistry {
	descriptors: Vec<BlockTypeDescriptor>,
	index: HashMap<BlockType, usize>,
}

impl BlockRegistry {
	/// Registry holding every built-in block type
	///
	/// # Examples
	///
	/// ```
	/// use composer_blocks::BlockRegistry;
	///
	/// let registry = BlockRegistry::builtin();
	/// assert!(registry.contains("hero"));
	/// assert!(registry.get_descriptor("unknown_widget").is_err());
	/// ```
	pub fn builtin() -> Self {
		let mut registry = Self::default();
		for descriptor in types::builtin() {
			// Built-in tags are distinct constants
			registry
				.index
				.insert(descriptor.block_type().clone(), registry.descriptors.len());
			registry.descriptors.push(descriptor);
		}
		registry
	}

	/// Start an empty registry for a custom closed set of types
	pub fn builder() -> BlockRegistryBuilder {
		BlockRegistryBuilder::default()
	}

	/// O(1) lookup of a type's descriptor
	pub fn get_descriptor(&self, block_type: &str) -> BlockResult<&BlockTypeDescriptor> {
		self.index
			.get(block_type)
			.map(|&i| &self.descriptors[i])
			.ok_or_else(|| BlockError::UnknownBlockType(block_type.to_string()))
	}

	pub fn contains(&self, block_type: &str) -> bool {
		self.index.contains_key(block_type)
	}

	pub fn len(&self) -> usize {
		self.descriptors.len()
	}

	pub fn is_empty(&self) -> bool {
		self.descriptors.is_empty()
	}

	/// Tags in registration order
	pub fn type_tags(&self) -> Vec<&BlockType> {
		self.descriptors.iter().map(|d| d.block_type()).collect()
	}

	pub fn descriptors(&self) -> impl Iterator<Item = &BlockTypeDescriptor> {
		self.descriptors.iter()
	}

	/// Catalog grouped by category for the type picker.
	///
	/// Categories follow [`BlockCategory`] declaration order, entries keep
	/// registration order and categories without entries are omitted.
	pub fn list_categories(&self) -> Vec<CategoryGroup> {
		BlockCategory::ALL
			.iter()
			.filter_map(|&category| {
				let entries: Vec<CatalogEntry> = self
					.descriptors
					.iter()
					.filter(|d| d.category() == category)
					.map(BlockTypeDescriptor::catalog_entry)
					.collect();
				(!entries.is_empty()).then_some(CategoryGroup { category, entries })
			})
			.collect()
	}
}

/// Builder for [`BlockRegistry`]
#[derive(Default)]
pub struct BlockRegistryBuilder {
	descriptors: Vec<BlockTypeDescriptor>,
}

impl BlockRegistryBuilder {
	/// Register a typed content record
	pub fn register<T: BlockSchema>(self) -> Self {
		self.descriptor(BlockTypeDescriptor::of::<T>())
	}

	pub fn descriptor(mut self, descriptor: BlockTypeDescriptor) -> Self {
		self.descriptors.push(descriptor);
		self
	}

	/// Add every built-in type
	pub fn with_builtin_types(mut self) -> Self {
		self.descriptors.extend(types::builtin());
		self
	}

	/// Build the registry; a tag registered twice is rejected
	///
	/// # Examples
	///
	/// ```
	/// use composer_blocks::{BlockError, BlockRegistry};
	/// use composer_blocks::types::{Faq, Heading};
	///
	/// let registry = BlockRegistry::builder()
	/// 	.register::<Heading>()
	/// 	.register::<Faq>()
	/// 	.build()
	/// 	.unwrap();
	/// assert_eq!(registry.len(), 2);
	///
	/// let duplicate = BlockRegistry::builder()
	/// 	.register::<Heading>()
	/// 	.register::<Heading>()
	/// 	.build();
	/// assert!(matches!(duplicate, Err(BlockError::DuplicateBlockType(_))));
	/// ```
	pub fn build(self) -> BlockResult<BlockRegistry> {
		let mut registry = BlockRegistry::default();
		for descriptor in self.descriptors {
			let tag = descriptor.block_type().clone();
			if registry.index.contains_key(&tag) {
				return Err(BlockError::DuplicateBlockType(tag.to_string()));
			}
			registry.index.insert(tag, registry.descriptors.len());
			registry.descriptors.push(descriptor);
		}
		Ok(registry)
	}
}
