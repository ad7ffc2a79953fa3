//! In-memory content store

use crate::backend::ContentStore;
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use composer_blocks::{Block, BlockId, BlockType, OrderEntry, PageId};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::{HashMap, HashSet};

/// One stored block plus bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredBlock {
	pub id: BlockId,
	pub page_id: PageId,
	pub block_type: BlockType,
	pub content: JsonValue,
	pub order_index: usize,
	/// Incremented on every write to the record
	pub revision: u64,
	pub updated_at: DateTime<Utc>,
}

impl StoredBlock {
	fn new(block: &Block) -> Self {
		Self {
			id: block.id(),
			page_id: block.page_id(),
			block_type: block.block_type().clone(),
			content: block.content().clone(),
			order_index: block.order_index(),
			revision: 1,
			updated_at: Utc::now(),
		}
	}

	fn touch(&mut self) {
		self.revision += 1;
		self.updated_at = Utc::now();
	}

	pub fn to_block(&self) -> Block {
		Block::from_parts(
			self.id,
			self.page_id,
			self.block_type.clone(),
			self.content.clone(),
			self.order_index,
		)
	}
}

/// Reference [`ContentStore`] keeping every record behind one lock.
///
/// A single lock makes `bulk_reorder` atomic: all ids are validated before
/// any record changes.
#[derive(Debug, Default)]
pub struct InMemoryContentStore {
	records: RwLock<HashMap<BlockId, StoredBlock>>,
}

impl InMemoryContentStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_config(config: &StoreConfig) -> Self {
		Self {
			records: RwLock::new(HashMap::with_capacity(config.page_capacity)),
		}
	}

	/// Store blocks directly, replacing records with the same id
	pub fn seed(&self, blocks: impl IntoIterator<Item = Block>) {
		let mut records = self.records.write();
		for block in blocks {
			records.insert(block.id(), StoredBlock::new(&block));
		}
	}

	pub fn get(&self, id: BlockId) -> Option<StoredBlock> {
		self.records.read().get(&id).cloned()
	}

	pub fn contains(&self, id: BlockId) -> bool {
		self.records.read().contains_key(&id)
	}

	pub fn len(&self) -> usize {
		self.records.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.read().is_empty()
	}

	/// Synchronous variant of [`ContentStore::list_by_page`]
	pub fn blocks_for(&self, page_id: PageId) -> Vec<Block> {
		let records = self.records.read();
		let mut stored: Vec<&StoredBlock> =
			records.values().filter(|r| r.page_id == page_id).collect();
		stored.sort_by_key(|r| (r.order_index, r.id));
		stored.into_iter().map(StoredBlock::to_block).collect()
	}
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
	async fn create(&self, block: &Block) -> StoreResult<()> {
		let mut records = self.records.write();
		if records.contains_key(&block.id()) {
			return Err(StoreError::Conflict(format!(
				"block {} already exists",
				block.id()
			)));
		}
		records.insert(block.id(), StoredBlock::new(block));
		tracing::debug!(
			block_id = %block.id(),
			page_id = %block.page_id(),
			block_type = %block.block_type(),
			"Stored new block"
		);
		Ok(())
	}

	async fn update(&self, id: BlockId, content: &JsonValue) -> StoreResult<()> {
		let mut records = self.records.write();
		let record = records.get_mut(&id).ok_or(StoreError::NotFound(id))?;
		record.content = content.clone();
		record.touch();
		tracing::debug!(block_id = %id, revision = record.revision, "Updated block content");
		Ok(())
	}

	async fn delete(&self, id: BlockId) -> StoreResult<()> {
		let removed = self.records.write().remove(&id);
		tracing::debug!(block_id = %id, existed = removed.is_some(), "Deleted block");
		Ok(())
	}

	async fn bulk_reorder(&self, entries: &[OrderEntry]) -> StoreResult<()> {
		let mut records = self.records.write();

		let mut seen = HashSet::with_capacity(entries.len());
		for entry in entries {
			if !records.contains_key(&entry.id) {
				return Err(StoreError::NotFound(entry.id));
			}
			if !seen.insert(entry.id) {
				return Err(StoreError::Conflict(format!(
					"block {} appears twice in reorder",
					entry.id
				)));
			}
		}

		for entry in entries {
			if let Some(record) = records.get_mut(&entry.id)
				&& record.order_index != entry.order_index
			{
				record.order_index = entry.order_index;
				record.touch();
			}
		}
		tracing::debug!(entries = entries.len(), "Applied bulk reorder");
		Ok(())
	}

	async fn list_by_page(&self, page_id: PageId) -> StoreResult<Vec<Block>> {
		Ok(self.blocks_for(page_id))
	}
}
