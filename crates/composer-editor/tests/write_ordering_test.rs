//! Ordering of background writes relative to each other

use composer_blocks::{Block, BlockId, BlockRegistry, OrderEntry, PageId};
use composer_editor::{ComposerConfig, PageComposer, SyncState};
use composer_store::testing::{ScriptedStore, StoreCall, StoreOperation};
use rstest::rstest;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

async fn open(store: &Arc<ScriptedStore>, page: PageId) -> PageComposer {
	PageComposer::open(
		page,
		Arc::new(BlockRegistry::builtin()),
		store.clone(),
		ComposerConfig::default(),
	)
	.await
	.unwrap()
}

fn texts(page: PageId, count: usize) -> Vec<Block> {
	(0..count)
		.map(|i| Block::new(page, "text", json!({"body": format!("Block {}", i)}), i))
		.collect()
}

/// Calls after the initial page load
fn writes(store: &ScriptedStore) -> Vec<StoreCall> {
	store
		.calls()
		.into_iter()
		.filter(|call| call.operation() != StoreOperation::ListByPage)
		.collect()
}

#[rstest]
#[tokio::test]
async fn test_update_waits_for_create() {
	// Arrange
	let store = ScriptedStore::shared();
	let composer = open(&store, PageId::new()).await;
	store.hold(StoreOperation::Create);

	// Act
	let add = composer.add_block("heading").unwrap();
	let id = add.block_id().unwrap();
	let update = composer.update_block(id, &json!({"text": "Early edit"})).unwrap();
	store.wait_for_calls(StoreOperation::Create, 1).await;
	tokio::task::yield_now().await;
	let update_started = !store.calls_of(StoreOperation::Update).is_empty();
	store.release(StoreOperation::Create);
	add.await.unwrap();
	update.await.unwrap();

	// Assert
	assert!(!update_started);
	assert_eq!(writes(&store)[0], StoreCall::Create(id));
	assert!(matches!(&writes(&store)[1], StoreCall::Update(updated, _) if *updated == id));
	assert_eq!(store.inner().get(id).unwrap().content["text"], "Early edit");
}

#[rstest]
#[tokio::test]
async fn test_create_persists_content_at_run_time() {
	// Arrange
	let store = ScriptedStore::shared();
	let composer = open(&store, PageId::new()).await;

	// Act
	let add = composer.add_block("text").unwrap();
	let id = add.block_id().unwrap();
	let update = composer.update_block(id, &json!({"body": "Edited"})).unwrap();
	let created = add.await.unwrap();
	update.await.unwrap();

	// Assert
	assert_eq!(created.content()["body"], "Edited");
	assert_eq!(store.inner().get(id).unwrap().content["body"], "Edited");
}

#[rstest]
#[tokio::test]
async fn test_updates_to_one_block_are_fifo() {
	// Arrange
	let page = PageId::new();
	let store = ScriptedStore::shared();
	let block = texts(page, 1).remove(0);
	store.seed([block.clone()]);
	let composer = open(&store, page).await;
	store.hold(StoreOperation::Update);

	// Act
	let pending: Vec<_> = ["1", "2", "3"]
		.into_iter()
		.map(|body| composer.update_block(block.id(), &json!({"body": body})).unwrap())
		.collect();
	store.wait_for_calls(StoreOperation::Update, 1).await;
	tokio::task::yield_now().await;
	let in_flight = store.calls_of(StoreOperation::Update).len();
	store.release(StoreOperation::Update);
	for write in pending {
		write.await.unwrap();
	}

	// Assert
	assert_eq!(in_flight, 1);
	let bodies: Vec<String> = store
		.calls_of(StoreOperation::Update)
		.into_iter()
		.filter_map(|call| match call {
			StoreCall::Update(_, content) => content["body"].as_str().map(str::to_string),
			_ => None,
		})
		.collect();
	assert_eq!(bodies, vec!["1", "2", "3"]);
	assert_eq!(store.inner().get(block.id()).unwrap().content["body"], "3");
}

#[rstest]
#[tokio::test]
async fn test_independent_blocks_write_concurrently() {
	// Arrange
	let page = PageId::new();
	let store = ScriptedStore::shared();
	let blocks = texts(page, 2);
	store.seed(blocks.clone());
	let composer = open(&store, page).await;
	store.hold(StoreOperation::Update);

	// Act
	let first = composer.update_block(blocks[0].id(), &json!({"body": "a"})).unwrap();
	let second = composer.update_block(blocks[1].id(), &json!({"body": "b"})).unwrap();
	let both_in_flight = tokio::time::timeout(
		Duration::from_secs(1),
		store.wait_for_calls(StoreOperation::Update, 2),
	)
	.await;
	store.release(StoreOperation::Update);

	// Assert
	assert!(both_in_flight.is_ok());
	first.await.unwrap();
	second.await.unwrap();
}

#[rstest]
#[tokio::test]
async fn test_delete_waits_for_pending_update() {
	// Arrange
	let page = PageId::new();
	let store = ScriptedStore::shared();
	let block = texts(page, 1).remove(0);
	store.seed([block.clone()]);
	let composer = open(&store, page).await;
	store.hold(StoreOperation::Update);

	// Act
	let update = composer.update_block(block.id(), &json!({"body": "Last words"})).unwrap();
	let delete = composer.delete_block(block.id());
	store.wait_for_calls(StoreOperation::Update, 1).await;
	tokio::task::yield_now().await;
	let delete_started = !store.calls_of(StoreOperation::Delete).is_empty();
	store.release(StoreOperation::Update);
	update.await.unwrap();
	delete.await.unwrap();

	// Assert
	assert!(!delete_started);
	assert_eq!(writes(&store).last(), Some(&StoreCall::Delete(block.id())));
	assert!(!store.inner().contains(block.id()));
	assert_eq!(composer.sync_state(block.id()), SyncState::Absent);
}

#[rstest]
#[tokio::test]
async fn test_add_then_delete_never_reaches_store() {
	// Arrange
	let store = ScriptedStore::shared();
	let composer = open(&store, PageId::new()).await;

	// Act
	let add = composer.add_block("hero").unwrap();
	let id = add.block_id().unwrap();
	let delete = composer.delete_block(id);
	let added = add.await;
	let deleted = delete.await;

	// Assert
	assert!(added.is_ok());
	assert!(deleted.is_ok());
	assert!(writes(&store).is_empty());
	assert!(composer.is_empty());
}

#[rstest]
#[tokio::test]
async fn test_delete_compacts_survivors() {
	// Arrange
	let page = PageId::new();
	let store = ScriptedStore::shared();
	let blocks = texts(page, 3);
	store.seed(blocks.clone());
	let composer = open(&store, page).await;

	// Act
	composer.delete_block(blocks[0].id()).await.unwrap();

	// Assert
	assert_eq!(
		writes(&store),
		vec![
			StoreCall::Delete(blocks[0].id()),
			StoreCall::BulkReorder(vec![
				OrderEntry::new(blocks[1].id(), 0),
				OrderEntry::new(blocks[2].id(), 1),
			]),
		]
	);
	assert_eq!(store.inner().get(blocks[2].id()).unwrap().order_index, 1);
}

#[rstest]
#[tokio::test]
async fn test_delete_of_last_block_needs_no_compaction() {
	let page = PageId::new();
	let store = ScriptedStore::shared();
	let blocks = texts(page, 2);
	store.seed(blocks.clone());
	let composer = open(&store, page).await;
	composer.delete_block(blocks[1].id()).await.unwrap();
	assert!(store.calls_of(StoreOperation::BulkReorder).is_empty());
}

#[rstest]
#[tokio::test]
async fn test_dropped_add_still_persists() {
	// Arrange
	let store = ScriptedStore::shared();
	let composer = open(&store, PageId::new()).await;

	// Act
	let pending = composer.add_block("features").unwrap();
	let id = pending.block_id().unwrap();
	drop(pending);
	composer.settle().await;

	// Assert
	assert!(store.inner().contains(id));
	assert_eq!(composer.sync_state(id), SyncState::Saved);
}

#[rstest]
#[tokio::test]
async fn test_reorder_runs_after_pending_create() {
	// Arrange
	let page = PageId::new();
	let store = ScriptedStore::shared();
	let existing = texts(page, 1).remove(0);
	store.seed([existing.clone()]);
	let composer = open(&store, page).await;

	// Act
	let add = composer.add_block("heading").unwrap();
	let id = add.block_id().unwrap();
	let reorder = composer.reorder_blocks(&[id, existing.id()]).unwrap();
	add.await.unwrap();
	reorder.await.unwrap();

	// Assert
	let stored: Vec<BlockId> = store.inner().blocks_for(page).iter().map(Block::id).collect();
	assert_eq!(stored, vec![id, existing.id()]);
	assert_eq!(writes(&store)[0], StoreCall::Create(id));
}

#[rstest]
#[tokio::test]
async fn test_reorders_are_serialized() {
	// Arrange
	let store = ScriptedStore::shared();
	let page = PageId::new();
	let blocks = texts(page, 3);
	store.seed(blocks.clone());
	let composer = open(&store, page).await;
	let (a, b, c) = (blocks[0].id(), blocks[1].id(), blocks[2].id());
	store.hold(StoreOperation::BulkReorder);

	// Act
	let first = composer.reorder_blocks(&[c, b, a]).unwrap();
	let second = composer.reorder_blocks(&[b, c, a]).unwrap();
	store.wait_for_calls(StoreOperation::BulkReorder, 1).await;
	tokio::time::sleep(Duration::from_millis(20)).await;
	let in_flight = store.calls_of(StoreOperation::BulkReorder).len();
	store.release_one(StoreOperation::BulkReorder);
	first.await.unwrap();
	store.wait_for_calls(StoreOperation::BulkReorder, 2).await;
	store.release(StoreOperation::BulkReorder);
	second.await.unwrap();

	// Assert
	assert_eq!(in_flight, 1);
	assert_eq!(store.calls_of(StoreOperation::BulkReorder).len(), 2);
	assert_eq!(composer.ids(), vec![b, c, a]);
	for (index, id) in [b, c, a].into_iter().enumerate() {
		assert_eq!(store.inner().get(id).unwrap().order_index, index);
	}
}
