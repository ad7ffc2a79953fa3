//! Rollback of optimistic changes when the store rejects a write

use composer_blocks::{Block, BlockError, BlockId, BlockRegistry, PageId};
use composer_editor::{
	ComposerConfig, ComposerError, NotificationLevel, Operation, PageComposer, SyncState,
};
use composer_store::testing::{ScriptedStore, StoreCall, StoreOperation};
use composer_store::StoreError;
use rstest::{fixture, rstest};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

struct Page {
	id: PageId,
	blocks: Vec<Block>,
}

#[fixture]
fn page() -> Page {
	let id = PageId::new();
	let blocks = vec![
		Block::new(id, "heading", json!({"text": "Title", "level": "h1", "align": "left"}), 0),
		Block::new(id, "text", json!({"body": "Intro", "align": "left"}), 1),
		Block::new(id, "call_to_action", json!({"title": "Join"}), 2),
	];
	Page { id, blocks }
}

async fn open(store: &Arc<ScriptedStore>, page: PageId, config: ComposerConfig) -> PageComposer {
	PageComposer::open(page, Arc::new(BlockRegistry::builtin()), store.clone(), config)
		.await
		.unwrap()
}

async fn open_seeded(page: &Page) -> (Arc<ScriptedStore>, PageComposer) {
	let store = ScriptedStore::shared();
	store.seed(page.blocks.clone());
	let composer = open(&store, page.id, ComposerConfig::default()).await;
	(store, composer)
}

fn ids(page: &Page) -> Vec<BlockId> {
	page.blocks.iter().map(Block::id).collect()
}

#[rstest]
#[tokio::test]
async fn test_failed_update_restores_durable_content(page: Page) {
	// Arrange
	let (store, composer) = open_seeded(&page).await;
	let heading = page.blocks[0].id();
	store.fail_next(StoreOperation::Update);

	// Act
	let pending = composer
		.update_block(heading, &json!({"text": "Draft", "level": "h1", "align": "left"}))
		.unwrap();
	let optimistic = composer.block(heading).unwrap();
	let result = pending.await;

	// Assert
	assert_eq!(optimistic.content()["text"], "Draft");
	assert!(matches!(
		result,
		Err(ComposerError::PersistenceFailed {
			operation: Operation::Update,
			block_id: Some(id),
			source: StoreError::Unavailable(_),
		}) if id == heading
	));
	assert_eq!(composer.block(heading).unwrap().content()["text"], "Title");
	assert_eq!(store.inner().get(heading).unwrap().content["text"], "Title");

	let notifications = composer.take_notifications();
	assert_eq!(notifications.len(), 1);
	assert_eq!(notifications[0].level, NotificationLevel::Error);
	assert_eq!(notifications[0].block_id, Some(heading));
	assert!(composer.take_notifications().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_failed_update_keeps_later_edit(page: Page) {
	// Arrange
	let (store, composer) = open_seeded(&page).await;
	let text = page.blocks[1].id();
	store.fail_next(StoreOperation::Update);

	// Act
	let first = composer.update_block(text, &json!({"body": "One"})).unwrap();
	let second = composer.update_block(text, &json!({"body": "Two"})).unwrap();
	let first = first.await;
	let second = second.await;

	// Assert
	assert!(first.is_err());
	assert!(second.is_ok());
	assert_eq!(composer.block(text).unwrap().content()["body"], "Two");
	assert_eq!(store.inner().get(text).unwrap().content["body"], "Two");
	assert_eq!(composer.sync_state(text), SyncState::Saved);
	let notifications = composer.take_notifications();
	assert_eq!(notifications.len(), 1);
	assert!(notifications[0].message.contains("newer changes are still being saved"));
}

#[rstest]
#[tokio::test]
async fn test_failed_create_removes_block() {
	// Arrange
	let store = ScriptedStore::shared();
	let composer = open(&store, PageId::new(), ComposerConfig::default()).await;
	let kept = composer.add_block("heading").unwrap().await.unwrap();
	store.fail_next(StoreOperation::Create);

	// Act
	let pending = composer.add_block("image").unwrap();
	let id = pending.block_id().unwrap();
	let staged = composer.sync_state(id);
	composer.select_block(id).unwrap();
	let result = pending.await;

	// Assert
	assert_eq!(staged, SyncState::Unsaved);
	assert!(matches!(
		result,
		Err(ComposerError::PersistenceFailed { operation: Operation::Create, .. })
	));
	assert_eq!(composer.sync_state(id), SyncState::Absent);
	assert_eq!(composer.ids(), vec![kept.id()]);
	assert_eq!(composer.selected(), None);
	assert!(!store.inner().contains(id));
	assert_eq!(composer.take_notifications().len(), 1);
}

#[rstest]
#[tokio::test]
async fn test_update_after_failed_create_is_not_persisted() {
	// Arrange
	let store = ScriptedStore::shared();
	let composer = open(&store, PageId::new(), ComposerConfig::default()).await;
	store.fail_next(StoreOperation::Create);

	// Act
	let add = composer.add_block("heading").unwrap();
	let id = add.block_id().unwrap();
	let update = composer.update_block(id, &json!({"text": "Orphan"})).unwrap();
	let add = add.await;
	let update = update.await;

	// Assert
	assert!(add.is_err());
	assert!(matches!(
		update,
		Err(ComposerError::Block(BlockError::BlockNotFound(missing))) if missing == id
	));
	assert!(store.calls_of(StoreOperation::Update).is_empty());
	assert!(composer.is_empty());
}

#[rstest]
#[tokio::test]
async fn test_failed_delete_reinserts_at_prior_index(page: Page) {
	// Arrange
	let (store, composer) = open_seeded(&page).await;
	let middle = page.blocks[1].id();
	composer.select_block(middle).unwrap();
	store.fail_next(StoreOperation::Delete);

	// Act
	let pending = composer.delete_block(middle);
	let optimistic = composer.ids();
	let result = pending.await;

	// Assert
	assert_eq!(optimistic, vec![page.blocks[0].id(), page.blocks[2].id()]);
	assert!(matches!(
		result,
		Err(ComposerError::PersistenceFailed { operation: Operation::Delete, .. })
	));
	assert_eq!(composer.ids(), ids(&page));
	assert_eq!(composer.block(middle).unwrap().order_index(), 1);
	assert_eq!(composer.sync_state(middle), SyncState::Saved);
	assert!(store.inner().contains(middle));
	assert!(store.calls_of(StoreOperation::BulkReorder).is_empty());
}

#[rstest]
#[tokio::test]
async fn test_failed_reorder_restores_durable_order(page: Page) {
	// Arrange
	let (store, composer) = open_seeded(&page).await;
	let [a, b, c] = [page.blocks[0].id(), page.blocks[1].id(), page.blocks[2].id()];
	store.fail_next(StoreOperation::BulkReorder);

	// Act
	let pending = composer.reorder_blocks(&[c, a, b]).unwrap();
	let optimistic = composer.ids();
	let result = pending.await;

	// Assert
	assert_eq!(optimistic, vec![c, a, b]);
	assert!(matches!(
		result,
		Err(ComposerError::PersistenceFailed { operation: Operation::Reorder, block_id: None, .. })
	));
	assert_eq!(composer.ids(), vec![a, b, c]);
	let stored: Vec<BlockId> = store.inner().blocks_for(page.id).iter().map(Block::id).collect();
	assert_eq!(stored, vec![a, b, c]);
}

#[rstest]
#[tokio::test]
async fn test_failed_reorder_yields_to_later_reorder(page: Page) {
	// Arrange
	let (store, composer) = open_seeded(&page).await;
	let [a, b, c] = [page.blocks[0].id(), page.blocks[1].id(), page.blocks[2].id()];
	store.fail_next(StoreOperation::BulkReorder);

	// Act
	let first = composer.reorder_blocks(&[c, a, b]).unwrap();
	let second = composer.reorder_blocks(&[b, c, a]).unwrap();
	let first = first.await;
	let second = second.await;

	// Assert
	assert!(first.is_err());
	assert!(second.is_ok());
	assert_eq!(composer.ids(), vec![b, c, a]);
	let stored: Vec<BlockId> = store.inner().blocks_for(page.id).iter().map(Block::id).collect();
	assert_eq!(stored, vec![b, c, a]);
}

#[rstest]
#[tokio::test]
async fn test_timed_out_write_is_rolled_back_until_it_lands(page: Page) {
	// Arrange
	let store = ScriptedStore::shared();
	store.seed(page.blocks.clone());
	let config = ComposerConfig::new().with_persistence_timeout(Duration::from_millis(50));
	let composer = open(&store, page.id, config).await;
	let text = page.blocks[1].id();
	store.hold(StoreOperation::Update);

	// Act
	let result = composer
		.update_block(text, &json!({"body": "Slow"}))
		.unwrap()
		.await;
	let rolled_back = composer.block(text).unwrap();
	let still_pending = composer.has_pending_writes();
	store.release(StoreOperation::Update);
	composer.settle().await;

	// Assert
	match result {
		Err(ComposerError::PersistenceFailed {
			source: StoreError::Unavailable(message),
			..
		}) => assert!(message.contains("timed out")),
		other => panic!("expected a timeout, got {:?}", other),
	}
	assert_eq!(rolled_back.content()["body"], "Intro");
	assert!(still_pending);
	assert_eq!(composer.block(text).unwrap().content()["body"], "Slow");
	assert_eq!(store.inner().get(text).unwrap().content["body"], "Slow");
	let levels: Vec<NotificationLevel> = composer
		.take_notifications()
		.into_iter()
		.map(|n| n.level)
		.collect();
	assert_eq!(levels, vec![NotificationLevel::Error, NotificationLevel::Info]);
}

#[rstest]
#[tokio::test]
async fn test_timed_out_update_keeps_block_lane(page: Page) {
	// Arrange
	let store = ScriptedStore::shared();
	store.seed(page.blocks.clone());
	let config = ComposerConfig::new().with_persistence_timeout(Duration::from_millis(50));
	let composer = open(&store, page.id, config).await;
	let text = page.blocks[1].id();
	store.hold(StoreOperation::Update);

	// Act
	let first = composer
		.update_block(text, &json!({"body": "v1"}))
		.unwrap()
		.await;
	let second = composer.update_block(text, &json!({"body": "v2"})).unwrap();
	tokio::time::sleep(Duration::from_millis(100)).await;
	let calls_while_held = store.calls_of(StoreOperation::Update).len();
	store.release(StoreOperation::Update);
	let second = second.await;
	composer.settle().await;

	// Assert
	assert!(first.is_err());
	assert!(second.is_ok());
	assert_eq!(calls_while_held, 1);
	let bodies: Vec<String> = store
		.completed()
		.into_iter()
		.filter_map(|call| match call {
			StoreCall::Update(_, content) => content["body"].as_str().map(str::to_string),
			_ => None,
		})
		.collect();
	assert_eq!(bodies, vec!["v1", "v2"]);
	assert_eq!(composer.block(text).unwrap().content()["body"], "v2");
	assert_eq!(store.inner().get(text).unwrap().content["body"], "v2");
	assert_eq!(composer.sync_state(text), SyncState::Saved);
}

#[rstest]
#[tokio::test]
async fn test_failed_update_restores_content_outside_schema() {
	// Arrange
	let page = PageId::new();
	let legacy = json!({"text": "Old", "color": "red"});
	let heading = Block::new(page, "heading", legacy.clone(), 0);
	let store = ScriptedStore::shared();
	store.seed([heading.clone()]);
	let composer = open(&store, page, ComposerConfig::default()).await;
	store.fail_next(StoreOperation::Update);

	// Act
	let result = composer
		.update_block(heading.id(), &json!({"text": "Unsaved edit"}))
		.unwrap()
		.await;

	// Assert
	assert!(result.is_err());
	assert_eq!(composer.block(heading.id()).unwrap().content(), &legacy);
	assert_eq!(store.inner().get(heading.id()).unwrap().content, legacy);
	assert_eq!(composer.sync_state(heading.id()), SyncState::Saved);
}

#[rstest]
#[tokio::test]
async fn test_dropped_write_still_rolls_back(page: Page) {
	// Arrange
	let (store, composer) = open_seeded(&page).await;
	let heading = page.blocks[0].id();
	store.fail_next(StoreOperation::Update);

	// Act
	drop(
		composer
			.update_block(heading, &json!({"text": "Gone"}))
			.unwrap(),
	);
	composer.settle().await;

	// Assert
	assert_eq!(composer.block(heading).unwrap().content()["text"], "Title");
	assert_eq!(composer.take_notifications().len(), 1);
	assert!(!composer.has_pending_writes());
}

#[rstest]
#[tokio::test]
async fn test_notification_capacity_drops_oldest(page: Page) {
	// Arrange
	let store = ScriptedStore::shared();
	store.seed(page.blocks.clone());
	let config = ComposerConfig::new().with_notification_capacity(2);
	let composer = open(&store, page.id, config).await;
	store.fail_always(StoreOperation::Update);

	// Act
	for block in &page.blocks {
		let _ = composer.update_block(block.id(), block.content()).unwrap().await;
	}

	// Assert
	let notifications = composer.take_notifications();
	assert_eq!(notifications.len(), 2);
	assert_eq!(notifications[0].block_id, Some(page.blocks[1].id()));
	assert_eq!(notifications[1].block_id, Some(page.blocks[2].id()));
}

#[rstest]
#[tokio::test]
async fn test_failed_hydration() {
	let store = ScriptedStore::shared();
	store.fail_next(StoreOperation::ListByPage);
	let page = PageId::new();
	let result = PageComposer::open(
		page,
		Arc::new(BlockRegistry::builtin()),
		store.clone(),
		ComposerConfig::default(),
	)
	.await;
	assert!(matches!(
		result,
		Err(ComposerError::Hydration { page_id, .. }) if page_id == page
	));
}
