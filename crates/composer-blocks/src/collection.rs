//! In-memory ordered block list of one page
//!
//! The collection keeps its blocks in a `Vec` whose positions always equal
//! the blocks' `order_index`, so indices stay contiguous from zero after
//! every operation. Nothing here performs I/O.

use crate::block::{Block, BlockId, OrderEntry, PageId};
use crate::error::{BlockError, BlockResult};
use crate::registry::BlockRegistry;
use serde_json::Value as JsonValue;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct BlockCollection {
	page_id: PageId,
	registry: Arc<BlockRegistry>,
	blocks: Vec<Block>,
}

impl BlockCollection {
	/// Empty collection for a page
	pub fn new(page_id: PageId, registry: Arc<BlockRegistry>) -> Self {
		Self {
			page_id,
			registry,
			blocks: Vec::new(),
		}
	}

	/// Build a collection from a store listing.
	///
	/// Blocks are sorted by stored index (ties broken by id) and re-indexed
	/// from zero. Content of known types is conformed to its schema; blocks
	/// of unknown types, or whose content no longer conforms, are kept as
	/// stored and render as placeholders.
	pub fn hydrate(
		page_id: PageId,
		registry: Arc<BlockRegistry>,
		blocks: Vec<Block>,
	) -> BlockResult<Self> {
		let mut seen = HashSet::with_capacity(blocks.len());
		let mut blocks = blocks;
		for block in &mut blocks {
			if block.page_id() != page_id {
				return Err(BlockError::PageMismatch {
					block: block.id(),
					expected: page_id,
					found: block.page_id(),
				});
			}
			if !seen.insert(block.id()) {
				return Err(BlockError::DuplicateBlock(block.id()));
			}
			let Ok(descriptor) = registry.get_descriptor(block.block_type().as_str()) else {
				tracing::warn!(
					block_id = %block.id(),
					block_type = %block.block_type(),
					"Hydrated block has an unregistered type"
				);
				continue;
			};
			match descriptor.conform(block.content()) {
				Ok(content) => {
					block.replace_content(content);
				}
				Err(e) => {
					tracing::warn!(
						block_id = %block.id(),
						block_type = %block.block_type(),
						error = %e,
						"Hydrated block content does not conform to its schema"
					);
				}
			}
		}
		blocks.sort_by_key(|b| (b.order_index(), b.id()));

		let mut collection = Self {
			page_id,
			registry,
			blocks,
		};
		collection.normalize();
		Ok(collection)
	}

	pub fn page_id(&self) -> PageId {
		self.page_id
	}

	pub fn registry(&self) -> &Arc<BlockRegistry> {
		&self.registry
	}

	/// Append a block of `block_type` holding the type's default content
	///
	/// # Examples
	///
	/// ```
	/// use composer_blocks::{BlockCollection, BlockError, BlockRegistry, PageId};
	/// use std::sync::Arc;
	///
	/// let mut collection = BlockCollection::new(PageId::new(), Arc::new(BlockRegistry::builtin()));
	/// let block = collection.add("heading").unwrap();
	/// assert_eq!(block.order_index(), 0);
	///
	/// let result = collection.add("unknown_widget");
	/// assert!(matches!(result, Err(BlockError::UnknownBlockType(_))));
	/// assert_eq!(collection.len(), 1);
	/// ```
	pub fn add(&mut self, block_type: &str) -> BlockResult<Block> {
		let descriptor = self.registry.get_descriptor(block_type)?;
		let block = Block::new(
			self.page_id,
			descriptor.block_type().clone(),
			descriptor.default_content().clone(),
			self.blocks.len(),
		);
		self.blocks.push(block.clone());
		Ok(block)
	}

	/// Replace a block's content with its conformed form and return the
	/// previous content
	pub fn update_content(&mut self, id: BlockId, content: &JsonValue) -> BlockResult<JsonValue> {
		let position = self.position(id).ok_or(BlockError::BlockNotFound(id))?;
		let block = &mut self.blocks[position];
		let descriptor = self
			.registry
			.get_descriptor(block.block_type().as_str())?;
		let content = descriptor.conform(content)?;
		Ok(block.replace_content(content))
	}

	/// Put previously stored content back as is, without conforming it.
	///
	/// Used to undo an edit; the content may predate the block's current
	/// schema.
	pub fn restore_content(&mut self, id: BlockId, content: JsonValue) -> BlockResult<JsonValue> {
		let position = self.position(id).ok_or(BlockError::BlockNotFound(id))?;
		Ok(self.blocks[position].replace_content(content))
	}

	/// Remove a block and close the gap; absent ids are a no-op
	pub fn remove(&mut self, id: BlockId) -> Option<Block> {
		let position = self.position(id)?;
		let removed = self.blocks.remove(position);
		self.normalize();
		Some(removed)
	}

	/// Assign `order_index = position in ids`.
	///
	/// `ids` must be a permutation of the current ids; anything else leaves
	/// the order untouched.
	pub fn reorder(&mut self, ids: &[BlockId]) -> BlockResult<()> {
		if ids.len() != self.blocks.len() {
			return Err(BlockError::InvalidReorder(format!(
				"expected {} ids, got {}",
				self.blocks.len(),
				ids.len()
			)));
		}
		let mut target: HashMap<BlockId, usize> = HashMap::with_capacity(ids.len());
		for (position, id) in ids.iter().enumerate() {
			if !self.contains(*id) {
				return Err(BlockError::InvalidReorder(format!(
					"{} is not part of this page",
					id
				)));
			}
			if target.insert(*id, position).is_some() {
				return Err(BlockError::InvalidReorder(format!("{} appears twice", id)));
			}
		}
		self.blocks.sort_by_key(|b| target[&b.id()]);
		self.normalize();
		Ok(())
	}

	/// Re-insert a block at `index` (clamped to the current length)
	pub fn insert_at(&mut self, block: Block, index: usize) -> BlockResult<()> {
		if block.page_id() != self.page_id {
			return Err(BlockError::PageMismatch {
				block: block.id(),
				expected: self.page_id,
				found: block.page_id(),
			});
		}
		if self.contains(block.id()) {
			return Err(BlockError::DuplicateBlock(block.id()));
		}
		let index = index.min(self.blocks.len());
		self.blocks.insert(index, block);
		self.normalize();
		Ok(())
	}

	/// Sort blocks by their position in `reference`; ids missing from it
	/// keep their relative order at the end
	pub fn restore_order(&mut self, reference: &[BlockId]) {
		let rank: HashMap<BlockId, usize> = reference
			.iter()
			.enumerate()
			.map(|(position, id)| (*id, position))
			.collect();
		// Stable sort keeps the relative order of unranked blocks
		self.blocks
			.sort_by_key(|b| rank.get(&b.id()).copied().unwrap_or(usize::MAX));
		self.normalize();
	}

	pub fn get(&self, id: BlockId) -> Option<&Block> {
		self.blocks.iter().find(|b| b.id() == id)
	}

	pub fn position(&self, id: BlockId) -> Option<usize> {
		self.blocks.iter().position(|b| b.id() == id)
	}

	pub fn contains(&self, id: BlockId) -> bool {
		self.position(id).is_some()
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Block> {
		self.blocks.iter()
	}

	pub fn blocks(&self) -> &[Block] {
		&self.blocks
	}

	/// Ids in order
	pub fn ids(&self) -> Vec<BlockId> {
		self.blocks.iter().map(Block::id).collect()
	}

	pub fn len(&self) -> usize {
		self.blocks.len()
	}

	pub fn is_empty(&self) -> bool {
		self.blocks.is_empty()
	}

	/// `{id, order_index}` of every block, for bulk persistence
	pub fn order_entries(&self) -> Vec<OrderEntry> {
		self.blocks.iter().map(Block::order_entry).collect()
	}

	fn normalize(&mut self) {
		for (index, block) in self.blocks.iter_mut().enumerate() {
			block.set_order_index(index);
		}
	}
}

impl<'a> IntoIterator for &'a BlockCollection {
	type Item = &'a Block;
	type IntoIter = std::slice::Iter<'a, Block>;

	fn into_iter(self) -> Self::IntoIter {
		self.blocks.iter()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};
	use serde_json::json;

	#[fixture]
	fn collection() -> BlockCollection {
		BlockCollection::new(PageId::new(), Arc::new(BlockRegistry::builtin()))
	}

	fn indices(collection: &BlockCollection) -> Vec<usize> {
		collection.iter().map(Block::order_index).collect()
	}

	#[rstest]
	fn test_add_appends_with_default_content(mut collection: BlockCollection) {
		// Act
		let heading = collection.add("heading").unwrap();
		let text = collection.add("text").unwrap();

		// Assert
		assert_eq!(heading.order_index(), 0);
		assert_eq!(text.order_index(), 1);
		assert_eq!(heading.content()["text"], json!("Heading"));
		assert_eq!(heading.page_id(), collection.page_id());
		assert_eq!(collection.ids(), vec![heading.id(), text.id()]);
	}

	#[rstest]
	fn test_update_content_returns_previous(mut collection: BlockCollection) {
		// Arrange
		let block = collection.add("heading").unwrap();

		// Act
		let previous = collection
			.update_content(block.id(), &json!({"text": "New", "level": "h1"}))
			.unwrap();

		// Assert
		assert_eq!(previous, *block.content());
		let stored = collection.get(block.id()).unwrap();
		assert_eq!(
			stored.content(),
			&json!({"text": "New", "level": "h1", "align": "left"})
		);
		assert_eq!(stored.order_index(), 0);
		assert_eq!(stored.block_type(), block.block_type());
	}

	#[rstest]
	fn test_update_content_rejects_invalid_payload(mut collection: BlockCollection) {
		// Arrange
		let block = collection.add("heading").unwrap();

		// Act
		let result = collection.update_content(block.id(), &json!({"body": "wrong type"}));

		// Assert
		assert!(matches!(result, Err(BlockError::InvalidContent { .. })));
		assert_eq!(collection.get(block.id()).unwrap().content(), block.content());
	}

	#[rstest]
	fn test_update_content_missing_block(mut collection: BlockCollection) {
		let id = BlockId::new();
		let result = collection.update_content(id, &json!({}));
		assert!(matches!(result, Err(BlockError::BlockNotFound(missing)) if missing == id));
	}

	#[rstest]
	fn test_restore_content_skips_schema(mut collection: BlockCollection) {
		// Arrange
		let block = collection.add("heading").unwrap();
		let legacy = json!({"text": "Old", "color": "red"});

		// Act
		let previous = collection.restore_content(block.id(), legacy.clone()).unwrap();

		// Assert
		assert_eq!(previous, *block.content());
		assert_eq!(collection.get(block.id()).unwrap().content(), &legacy);
		assert!(matches!(
			collection.restore_content(BlockId::new(), json!({})),
			Err(BlockError::BlockNotFound(_))
		));
	}

	#[rstest]
	fn test_remove_renormalizes(mut collection: BlockCollection) {
		// Arrange
		let a = collection.add("heading").unwrap();
		let b = collection.add("text").unwrap();
		let c = collection.add("image").unwrap();

		// Act
		let removed = collection.remove(b.id()).unwrap();

		// Assert
		assert_eq!(removed.id(), b.id());
		assert_eq!(collection.ids(), vec![a.id(), c.id()]);
		assert_eq!(indices(&collection), vec![0, 1]);
	}

	#[rstest]
	fn test_remove_is_idempotent(mut collection: BlockCollection) {
		// Arrange
		let a = collection.add("heading").unwrap();
		collection.add("text").unwrap();
		collection.remove(a.id());
		let after_once = collection.ids();

		// Act
		let second = collection.remove(a.id());

		// Assert
		assert!(second.is_none());
		assert_eq!(collection.ids(), after_once);
	}

	#[rstest]
	fn test_reorder_applies_permutation(mut collection: BlockCollection) {
		// Arrange
		let a = collection.add("heading").unwrap();
		let b = collection.add("text").unwrap();
		let c = collection.add("hero").unwrap();

		// Act
		collection.reorder(&[c.id(), a.id(), b.id()]).unwrap();

		// Assert
		assert_eq!(collection.ids(), vec![c.id(), a.id(), b.id()]);
		assert_eq!(indices(&collection), vec![0, 1, 2]);
	}

	#[rstest]
	#[case::missing_id(|ids: &[BlockId]| vec![ids[0], ids[1]])]
	#[case::duplicate_id(|ids: &[BlockId]| vec![ids[0], ids[0], ids[1]])]
	#[case::foreign_id(|ids: &[BlockId]| vec![ids[0], ids[1], BlockId::new()])]
	#[case::extra_id(|ids: &[BlockId]| vec![ids[0], ids[1], ids[2], BlockId::new()])]
	fn test_reorder_rejects_non_permutations(
		mut collection: BlockCollection,
		#[case] make: fn(&[BlockId]) -> Vec<BlockId>,
	) {
		// Arrange
		collection.add("heading").unwrap();
		collection.add("text").unwrap();
		collection.add("hero").unwrap();
		let before = collection.ids();

		// Act
		let result = collection.reorder(&make(&before));

		// Assert
		assert!(matches!(result, Err(BlockError::InvalidReorder(_))));
		assert_eq!(collection.ids(), before);
	}

	#[rstest]
	fn test_insert_at_restores_position(mut collection: BlockCollection) {
		// Arrange
		let a = collection.add("heading").unwrap();
		let b = collection.add("text").unwrap();
		let c = collection.add("hero").unwrap();
		let removed = collection.remove(b.id()).unwrap();

		// Act
		collection.insert_at(removed, 1).unwrap();

		// Assert
		assert_eq!(collection.ids(), vec![a.id(), b.id(), c.id()]);
		assert_eq!(indices(&collection), vec![0, 1, 2]);
	}

	#[rstest]
	fn test_insert_at_clamps_and_rejects(mut collection: BlockCollection) {
		// Arrange
		let a = collection.add("heading").unwrap();
		let foreign = Block::new(PageId::new(), "text", json!({}), 0);
		let local = Block::new(collection.page_id(), "text", json!({}), 7);

		// Act & Assert
		assert!(matches!(
			collection.insert_at(foreign, 0),
			Err(BlockError::PageMismatch { .. })
		));
		assert!(matches!(
			collection.insert_at(a.clone(), 0),
			Err(BlockError::DuplicateBlock(_))
		));
		collection.insert_at(local.clone(), 99).unwrap();
		assert_eq!(collection.get(local.id()).unwrap().order_index(), 1);
	}

	#[rstest]
	fn test_restore_order_keeps_unknown_at_end(mut collection: BlockCollection) {
		// Arrange
		let a = collection.add("heading").unwrap();
		let b = collection.add("text").unwrap();
		let c = collection.add("hero").unwrap();
		let d = collection.add("faq").unwrap();
		collection.reorder(&[d.id(), c.id(), b.id(), a.id()]).unwrap();

		// Act
		collection.restore_order(&[a.id(), c.id()]);

		// Assert
		assert_eq!(collection.ids(), vec![a.id(), c.id(), d.id(), b.id()]);
		assert_eq!(indices(&collection), vec![0, 1, 2, 3]);
	}

	#[rstest]
	fn test_hydrate_sorts_and_normalizes() {
		// Arrange
		let page_id = PageId::new();
		let registry = Arc::new(BlockRegistry::builtin());
		let first = Block::new(page_id, "text", json!({"body": "first"}), 4);
		let second = Block::new(page_id, "legacy_slider", json!({"slides": 3}), 9);
		let zeroth = Block::new(page_id, "heading", json!({"text": "Top"}), 2);

		// Act
		let collection = BlockCollection::hydrate(
			page_id,
			registry,
			vec![first.clone(), second.clone(), zeroth.clone()],
		)
		.unwrap();

		// Assert
		assert_eq!(collection.ids(), vec![zeroth.id(), first.id(), second.id()]);
		assert_eq!(indices(&collection), vec![0, 1, 2]);
		assert_eq!(
			collection.get(zeroth.id()).unwrap().content(),
			&json!({"text": "Top", "level": "h2", "align": "left"})
		);
		// Unknown types are kept verbatim
		assert_eq!(
			collection.get(second.id()).unwrap().content(),
			&json!({"slides": 3})
		);
	}

	#[rstest]
	fn test_hydrate_rejects_foreign_and_duplicate_blocks() {
		// Arrange
		let page_id = PageId::new();
		let registry = Arc::new(BlockRegistry::builtin());
		let block = Block::new(page_id, "text", json!({}), 0);
		let foreign = Block::new(PageId::new(), "text", json!({}), 1);

		// Act
		let mismatch =
			BlockCollection::hydrate(page_id, registry.clone(), vec![block.clone(), foreign]);
		let duplicate = BlockCollection::hydrate(page_id, registry, vec![block.clone(), block]);

		// Assert
		assert!(matches!(mismatch, Err(BlockError::PageMismatch { .. })));
		assert!(matches!(duplicate, Err(BlockError::DuplicateBlock(_))));
	}

	#[rstest]
	fn test_order_entries(mut collection: BlockCollection) {
		let a = collection.add("heading").unwrap();
		let b = collection.add("text").unwrap();
		assert_eq!(
			collection.order_entries(),
			vec![OrderEntry::new(a.id(), 0), OrderEntry::new(b.id(), 1)]
		);
	}
}
