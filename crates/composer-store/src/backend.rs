//! Content store trait definition.

use crate::StoreResult;
use async_trait::async_trait;
use composer_blocks::{Block, BlockId, OrderEntry, PageId};
use serde_json::Value as JsonValue;

/// Durable home of a page's blocks.
///
/// Implementations must be safe to call from concurrently running tasks. The
/// composer never issues two overlapping writes for the same block and runs
/// structural writes (create, delete, bulk reorder) one at a time.
///
/// # Examples
///
/// ```rust,no_run
/// use composer_store::{ContentStore, StoreResult};
/// use composer_blocks::PageId;
///
/// async fn count_blocks(store: &dyn ContentStore, page: PageId) -> StoreResult<usize> {
/// 	Ok(store.list_by_page(page).await?.len())
/// }
/// ```
#[async_trait]
pub trait ContentStore: Send + Sync {
	/// Persist a newly created block.
	///
	/// # Errors
	///
	/// Returns `StoreError::Conflict` if a block with the same id exists.
	async fn create(&self, block: &Block) -> StoreResult<()>;

	/// Replace the content of a stored block.
	///
	/// # Errors
	///
	/// Returns `StoreError::NotFound` if the block is not stored.
	async fn update(&self, id: BlockId, content: &JsonValue) -> StoreResult<()>;

	/// Delete a block. Deleting an absent block succeeds.
	async fn delete(&self, id: BlockId) -> StoreResult<()>;

	/// Apply every `{id, order_index}` pair, or none of them.
	///
	/// # Errors
	///
	/// Returns `StoreError::NotFound` if any entry names an unknown block and
	/// `StoreError::Conflict` if an id appears twice. Nothing is written in
	/// either case.
	async fn bulk_reorder(&self, entries: &[OrderEntry]) -> StoreResult<()>;

	/// All blocks of a page, ordered by index.
	async fn list_by_page(&self, page_id: PageId) -> StoreResult<Vec<Block>>;
}
