//! Page composition controller
//!
//! [`PageComposer`] owns the in-memory model of one page and keeps it in
//! sync with a [`ContentStore`]. Every mutation is applied to the model
//! when it is called, so previews update immediately, and its store call
//! runs in a background task. When the store call fails the model is
//! rolled back to the last durable state and a [`Notification`] is queued.
//!
//! Store calls are ordered through lanes: content
//! writes to one block are FIFO, and create, delete, reorder and compaction
//! are FIFO with each other. A write to a block never runs before that
//! block's create has settled.
//!
//! A store call that outlives `persistence_timeout` is reported as failed
//! and rolled back, but it is not abandoned: its lane stays held until the
//! call settles, and a late success is folded back into the model.

use crate::config::ComposerConfig;
use crate::error::{ComposerError, ComposerResult, Operation};
use crate::lanes::{LaneKey, LaneTicket, Lanes};
use crate::notifications::{Notification, NotificationQueue};
use crate::property_editor::PropertyEditor;
use crate::workspace::render_workspace;
use composer_blocks::{
	Block, BlockCollection, BlockError, BlockId, BlockRegistry, OrderEntry, PageId,
	PreviewRenderer, TypePicker,
};
use composer_forms::{EditorChange, FormErrors};
use composer_store::{ContentStore, StoreError, StoreResult};
use parking_lot::Mutex;
use serde_json::Value as JsonValue;
use futures::future::{BoxFuture, FutureExt};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Persistence status of a block as seen by the composer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncState {
	/// In the model, create not yet confirmed by the store
	Unsaved,
	/// In the model and known to the store
	Saved,
	/// Not in the model
	Absent,
}

/// Background store write started by a mutation.
///
/// Awaiting it yields the write's outcome. Dropping it does not cancel the
/// write: the task keeps running and rollback still happens on failure.
pub struct PendingWrite<T> {
	block_id: Option<BlockId>,
	state: PendingState<T>,
}

enum PendingState<T> {
	Running(JoinHandle<ComposerResult<T>>),
	Ready(Option<ComposerResult<T>>),
}

// Neither variant is ever pinned structurally
impl<T> Unpin for PendingWrite<T> {}

impl<T> PendingWrite<T> {
	fn running(block_id: Option<BlockId>, handle: JoinHandle<ComposerResult<T>>) -> Self {
		Self {
			block_id,
			state: PendingState::Running(handle),
		}
	}

	fn ready(block_id: Option<BlockId>, result: ComposerResult<T>) -> Self {
		Self {
			block_id,
			state: PendingState::Ready(Some(result)),
		}
	}

	/// Block the write concerns; `None` for page-wide writes such as reorder
	pub fn block_id(&self) -> Option<BlockId> {
		self.block_id
	}

	pub fn is_finished(&self) -> bool {
		match &self.state {
			PendingState::Running(handle) => handle.is_finished(),
			PendingState::Ready(_) => true,
		}
	}
}

impl<T> Future for PendingWrite<T> {
	type Output = ComposerResult<T>;

	fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		match &mut self.get_mut().state {
			PendingState::Running(handle) => match Pin::new(handle).poll(cx) {
				Poll::Ready(Ok(result)) => Poll::Ready(result),
				Poll::Ready(Err(e)) => Poll::Ready(Err(ComposerError::Task(e.to_string()))),
				Poll::Pending => Poll::Pending,
			},
			PendingState::Ready(result) => Poll::Ready(
				result
					.take()
					.unwrap_or_else(|| Err(ComposerError::Task("write already awaited".to_string()))),
			),
		}
	}
}

impl<T> fmt::Debug for PendingWrite<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PendingWrite")
			.field("block_id", &self.block_id)
			.field("finished", &self.is_finished())
			.finish()
	}
}

/// Last state the store confirmed for a block
#[derive(Debug, Clone)]
struct DurableBlock {
	content: JsonValue,
	order_index: usize,
}

struct ComposerState {
	model: BlockCollection,
	selection: Option<BlockId>,
	durable: HashMap<BlockId, DurableBlock>,
	/// Bumped by every local reorder
	order_version: u64,
	notifications: NotificationQueue,
}

impl ComposerState {
	fn sync_state(&self, id: BlockId) -> SyncState {
		match (self.model.contains(id), self.durable.contains_key(&id)) {
			(false, _) => SyncState::Absent,
			(true, true) => SyncState::Saved,
			(true, false) => SyncState::Unsaved,
		}
	}

	/// Saved blocks in model order, at their model index
	fn saved_order(&self) -> Vec<OrderEntry> {
		self.model
			.iter()
			.filter(|b| self.durable.contains_key(&b.id()))
			.map(Block::order_entry)
			.collect()
	}

	fn order_drifted(&self, entries: &[OrderEntry]) -> bool {
		entries.iter().any(|entry| {
			self.durable
				.get(&entry.id)
				.is_some_and(|d| d.order_index != entry.order_index)
		})
	}

	fn record_order(&mut self, entries: &[OrderEntry]) {
		for entry in entries {
			if let Some(durable) = self.durable.get_mut(&entry.id) {
				durable.order_index = entry.order_index;
			}
		}
	}

	/// Saved ids sorted by their durable index
	fn durable_order(&self) -> Vec<BlockId> {
		let mut ids: Vec<(usize, BlockId)> = self
			.durable
			.iter()
			.map(|(id, d)| (d.order_index, *id))
			.collect();
		ids.sort();
		ids.into_iter().map(|(_, id)| id).collect()
	}

	fn deselect(&mut self, id: BlockId) {
		if self.selection == Some(id) {
			self.selection = None;
		}
	}

	/// Put back the durable content of `id` unless the model was edited
	/// again after `written`
	fn restore_content(&mut self, id: BlockId, written: &JsonValue) -> bool {
		let Some(durable) = self.durable.get(&id).map(|d| d.content.clone()) else {
			return false;
		};
		if !self.model.get(id).is_some_and(|b| b.content() == written) {
			return false;
		}
		match self.model.restore_content(id, durable) {
			Ok(_) => true,
			Err(e) => {
				warn!(block_id = %id, error = %e, "Could not restore durable content");
				false
			}
		}
	}

	/// Take over content that reached the store after its write timed out.
	/// The model follows only if it still shows the rolled back content.
	fn adopt_content(&mut self, id: BlockId, written: JsonValue) -> bool {
		let Some(durable) = self.durable.get_mut(&id) else {
			return false;
		};
		let rolled_back = self
			.model
			.get(id)
			.is_some_and(|b| b.content() == &durable.content);
		durable.content = written.clone();
		rolled_back && self.model.restore_content(id, written).is_ok()
	}

	/// Re-insert a block whose delete failed at its previous position
	fn restore_block(&mut self, removed: &Block, index: usize) {
		let content = self
			.durable
			.get(&removed.id())
			.map_or_else(|| removed.content().clone(), |d| d.content.clone());
		let block = Block::from_parts(
			removed.id(),
			removed.page_id(),
			removed.block_type().clone(),
			content,
			index,
		);
		if let Err(e) = self.model.insert_at(block, index) {
			warn!(block_id = %removed.id(), error = %e, "Could not restore deleted block");
		}
	}
}

struct Inner {
	page_id: PageId,
	registry: Arc<BlockRegistry>,
	store: Arc<dyn ContentStore>,
	config: ComposerConfig,
	runtime: Handle,
	lanes: Lanes,
	state: Mutex<ComposerState>,
}

/// Controller for editing one page.
///
/// Cloning yields another handle to the same page.
///
/// # Examples
///
/// ```
/// use composer_blocks::{BlockRegistry, PageId};
/// use composer_editor::{ComposerConfig, PageComposer, SyncState};
/// use composer_store::InMemoryContentStore;
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = Arc::new(InMemoryContentStore::new());
/// let composer = PageComposer::open(
/// 	PageId::new(),
/// 	Arc::new(BlockRegistry::builtin()),
/// 	store.clone(),
/// 	ComposerConfig::default(),
/// )
/// .await?;
///
/// let pending = composer.add_block("heading")?;
/// let id = pending.block_id().unwrap();
/// assert_eq!(composer.len(), 1);
///
/// pending.await?;
/// assert_eq!(composer.sync_state(id), SyncState::Saved);
/// assert!(store.contains(id));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct PageComposer {
	inner: Arc<Inner>,
}

impl PageComposer {
	/// Load a page from `store` and build its model.
	///
	/// Must be called from within a Tokio runtime; background writes are
	/// spawned on it. If the stored indices have gaps or ties, a compaction
	/// is queued right away.
	pub async fn open(
		page_id: PageId,
		registry: Arc<BlockRegistry>,
		store: Arc<dyn ContentStore>,
		config: ComposerConfig,
	) -> ComposerResult<Self> {
		let runtime = Handle::try_current().map_err(|e| ComposerError::Task(e.to_string()))?;

		let stored = with_timeout(config.persistence_timeout(), store.list_by_page(page_id))
			.await
			.map_err(|source| ComposerError::Hydration { page_id, source })?;
		let stored_indices: HashMap<BlockId, usize> = stored
			.iter()
			.map(|b| (b.id(), b.order_index()))
			.collect();

		let model = BlockCollection::hydrate(page_id, registry.clone(), stored)?;
		let durable = model
			.iter()
			.map(|b| {
				let order_index = stored_indices
					.get(&b.id())
					.copied()
					.unwrap_or(b.order_index());
				let durable = DurableBlock {
					content: b.content().clone(),
					order_index,
				};
				(b.id(), durable)
			})
			.collect();

		let state = ComposerState {
			model,
			selection: None,
			durable,
			order_version: 0,
			notifications: NotificationQueue::new(config.notification_capacity),
		};
		let drifted = state.order_drifted(&state.saved_order());
		info!(page_id = %page_id, blocks = state.model.len(), "Opened page");

		let composer = Self {
			inner: Arc::new(Inner {
				page_id,
				registry,
				store,
				config,
				runtime,
				lanes: Lanes::new(),
				state: Mutex::new(state),
			}),
		};
		if drifted {
			debug!(page_id = %page_id, "Stored order has gaps; compacting");
			composer.schedule_compaction();
		}
		Ok(composer)
	}

	pub fn page_id(&self) -> PageId {
		self.inner.page_id
	}

	pub fn registry(&self) -> &Arc<BlockRegistry> {
		&self.inner.registry
	}

	pub fn config(&self) -> &ComposerConfig {
		&self.inner.config
	}

	/// Append a block of `block_type` with its default content.
	///
	/// Unknown types fail immediately and leave the model untouched. The
	/// returned write resolves to the persisted block.
	pub fn add_block(&self, block_type: &str) -> ComposerResult<PendingWrite<Block>> {
		let (block, ticket) = {
			let mut state = self.inner.state.lock();
			let block = state.model.add(block_type)?;
			let ticket = self
				.inner
				.lanes
				.enqueue(&[LaneKey::Structure, LaneKey::Block(block.id())]);
			(block, ticket)
		};
		let id = block.id();
		debug!(
			page_id = %self.inner.page_id,
			block_id = %id,
			block_type = %block.block_type(),
			order_index = block.order_index(),
			"Added block"
		);
		Ok(self.spawn_write(Some(id), ticket, move |inner, late| async move {
			inner.persist_create(block, &late).await
		}))
	}

	/// Replace a block's content. The payload is conformed to the block's
	/// schema first; a payload that does not fit is rejected without any
	/// change.
	pub fn update_block(&self, id: BlockId, content: &JsonValue) -> ComposerResult<PendingWrite<()>> {
		let (written, ticket) = {
			let mut state = self.inner.state.lock();
			self.stage_update(&mut state, id, content)?
		};
		Ok(self.spawn_write(Some(id), ticket, move |inner, late| async move {
			inner.persist_update(id, written, &late).await
		}))
	}

	/// Remove a block. Deleting an absent id is a no-op that resolves
	/// successfully.
	pub fn delete_block(&self, id: BlockId) -> PendingWrite<()> {
		let (removed, ticket) = {
			let mut state = self.inner.state.lock();
			let Some(removed) = state.model.remove(id) else {
				return PendingWrite::ready(Some(id), Ok(()));
			};
			state.deselect(id);
			let ticket = self
				.inner
				.lanes
				.enqueue(&[LaneKey::Structure, LaneKey::Block(id)]);
			(removed, ticket)
		};
		debug!(page_id = %self.inner.page_id, block_id = %id, "Deleted block");
		self.spawn_write(Some(id), ticket, move |inner, late| async move {
			inner.persist_delete(removed, &late).await
		})
	}

	/// Reorder the page. `ids` must list every block exactly once.
	pub fn reorder_blocks(&self, ids: &[BlockId]) -> ComposerResult<PendingWrite<()>> {
		let (version, ticket) = {
			let mut state = self.inner.state.lock();
			state.model.reorder(ids)?;
			state.order_version += 1;
			(state.order_version, self.inner.lanes.enqueue(&[LaneKey::Structure]))
		};
		debug!(page_id = %self.inner.page_id, blocks = ids.len(), "Reordered blocks");
		Ok(self.spawn_write(None, ticket, move |inner, late| async move {
			inner.persist_reorder(version, &late).await
		}))
	}

	pub fn select_block(&self, id: BlockId) -> ComposerResult<()> {
		let mut state = self.inner.state.lock();
		if !state.model.contains(id) {
			return Err(BlockError::BlockNotFound(id).into());
		}
		state.selection = Some(id);
		Ok(())
	}

	pub fn clear_selection(&self) {
		self.inner.state.lock().selection = None;
	}

	pub fn selected(&self) -> Option<BlockId> {
		self.inner.state.lock().selection
	}

	/// Inline validation messages for the selected block
	pub fn selected_errors(&self) -> ComposerResult<FormErrors> {
		let state = self.inner.state.lock();
		let id = state.selection.ok_or(ComposerError::NoSelection)?;
		let block = state.model.get(id).ok_or(BlockError::BlockNotFound(id))?;
		Ok(PropertyEditor::new(&self.inner.registry, block)?.errors())
	}

	/// Apply a property form change to the selected block and persist it
	pub fn edit_selected(&self, change: &EditorChange) -> ComposerResult<PendingWrite<()>> {
		let (id, written, ticket) = {
			let mut state = self.inner.state.lock();
			let id = state.selection.ok_or(ComposerError::NoSelection)?;
			let block = state.model.get(id).ok_or(BlockError::BlockNotFound(id))?;
			let content = PropertyEditor::new(&self.inner.registry, block)?.apply(change)?;
			let (written, ticket) = self.stage_update(&mut state, id, &content)?;
			(id, written, ticket)
		};
		Ok(self.spawn_write(Some(id), ticket, move |inner, late| async move {
			inner.persist_update(id, written, &late).await
		}))
	}

	pub fn blocks(&self) -> Vec<Block> {
		self.inner.state.lock().model.blocks().to_vec()
	}

	pub fn block(&self, id: BlockId) -> Option<Block> {
		self.inner.state.lock().model.get(id).cloned()
	}

	pub fn ids(&self) -> Vec<BlockId> {
		self.inner.state.lock().model.ids()
	}

	pub fn len(&self) -> usize {
		self.inner.state.lock().model.len()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.state.lock().model.is_empty()
	}

	pub fn sync_state(&self, id: BlockId) -> SyncState {
		self.inner.state.lock().sync_state(id)
	}

	/// Whether any store write is queued or running
	pub fn has_pending_writes(&self) -> bool {
		!self.inner.lanes.is_idle()
	}

	/// Wait until every write queued so far has settled
	pub async fn settle(&self) {
		while !self.inner.lanes.is_idle() {
			self.inner.lanes.idle().await;
		}
	}

	/// Read-only preview of the current model
	pub fn render_preview(&self) -> String {
		let state = self.inner.state.lock();
		PreviewRenderer::new(&self.inner.registry)
			.with_options(self.inner.config.preview.clone())
			.render(&state.model)
	}

	/// Preview with the selected block replaced by its property form
	pub fn render_workspace(&self) -> String {
		let state = self.inner.state.lock();
		render_workspace(&state.model, &self.inner.config.preview, state.selection)
	}

	pub fn type_picker(&self) -> TypePicker<'_> {
		TypePicker::new(&self.inner.registry)
	}

	/// Drain queued notifications, oldest first
	pub fn take_notifications(&self) -> Vec<Notification> {
		self.inner.state.lock().notifications.drain()
	}

	fn stage_update(
		&self,
		state: &mut ComposerState,
		id: BlockId,
		content: &JsonValue,
	) -> ComposerResult<(JsonValue, LaneTicket)> {
		state.model.update_content(id, content)?;
		let written = state
			.model
			.get(id)
			.map(|b| b.content().clone())
			.ok_or(BlockError::BlockNotFound(id))?;
		let ticket = self.inner.lanes.enqueue(&[LaneKey::Block(id)]);
		debug!(block_id = %id, "Updated block content");
		Ok((written, ticket))
	}

	fn spawn_write<T, F, Fut>(
		&self,
		block_id: Option<BlockId>,
		mut ticket: LaneTicket,
		write: F,
	) -> PendingWrite<T>
	where
		T: Send + 'static,
		F: FnOnce(Arc<Inner>, LateCalls) -> Fut + Send + 'static,
		Fut: Future<Output = ComposerResult<T>> + Send + 'static,
	{
		let inner = self.inner.clone();
		let handle = self.inner.runtime.spawn(async move {
			ticket.ready().await;
			let late = LateCalls::default();
			let result = write(inner.clone(), late.clone()).await;
			// Later writes in the lane start only after rollback is done
			inner.release_after(late, ticket);
			result
		});
		PendingWrite::running(block_id, handle)
	}

	fn schedule_compaction(&self) {
		let mut ticket = self.inner.lanes.enqueue(&[LaneKey::Structure]);
		let inner = self.inner.clone();
		self.inner.runtime.spawn(async move {
			ticket.ready().await;
			let late = LateCalls::default();
			inner.compact(&late).await;
			inner.release_after(late, ticket);
		});
	}
}

impl fmt::Debug for PageComposer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PageComposer")
			.field("page_id", &self.inner.page_id)
			.field("blocks", &self.len())
			.field("pending_writes", &self.has_pending_writes())
			.finish_non_exhaustive()
	}
}

/// A store write, kept so it can be replayed against the model if it
/// settles after its timeout
#[derive(Debug, Clone)]
enum StoreWrite {
	Create(Block),
	Update { id: BlockId, written: JsonValue },
	Delete(Block),
	Reorder { entries: Vec<OrderEntry>, version: u64 },
	Compact(Vec<OrderEntry>),
}

impl StoreWrite {
	fn operation(&self) -> Operation {
		match self {
			StoreWrite::Create(_) => Operation::Create,
			StoreWrite::Update { .. } => Operation::Update,
			StoreWrite::Delete(_) => Operation::Delete,
			StoreWrite::Reorder { .. } => Operation::Reorder,
			StoreWrite::Compact(_) => Operation::Compact,
		}
	}

	fn call(&self, store: Arc<dyn ContentStore>) -> BoxFuture<'static, StoreResult<()>> {
		match self.clone() {
			StoreWrite::Create(block) => async move { store.create(&block).await }.boxed(),
			StoreWrite::Update { id, written } => {
				async move { store.update(id, &written).await }.boxed()
			}
			StoreWrite::Delete(block) => async move { store.delete(block.id()).await }.boxed(),
			StoreWrite::Reorder { entries, .. } | StoreWrite::Compact(entries) => {
				async move { store.bulk_reorder(&entries).await }.boxed()
			}
		}
	}
}

/// Store calls that timed out but are still running
#[derive(Clone, Default)]
struct LateCalls(Arc<Mutex<VecDeque<(StoreWrite, JoinHandle<StoreResult<()>>)>>>);

impl LateCalls {
	fn push(&self, write: StoreWrite, call: JoinHandle<StoreResult<()>>) {
		self.0.lock().push_back((write, call));
	}

	fn pop(&self) -> Option<(StoreWrite, JoinHandle<StoreResult<()>>)> {
		self.0.lock().pop_front()
	}

	fn is_empty(&self) -> bool {
		self.0.lock().is_empty()
	}
}

impl Inner {
	/// Run `write` on its own task. Past the timeout the caller sees a
	/// failure while the call itself is parked in `late`.
	async fn call_write(&self, late: &LateCalls, write: StoreWrite) -> StoreResult<()> {
		let timeout = self.config.persistence_timeout();
		let mut call = self.runtime.spawn(write.call(self.store.clone()));
		match tokio::time::timeout(timeout, &mut call).await {
			Ok(joined) => joined.unwrap_or_else(|e| Err(StoreError::Unavailable(e.to_string()))),
			Err(_) => {
				warn!(
					operation = %write.operation(),
					timeout_ms = timeout.as_millis() as u64,
					"Store call timed out; waiting for it in the background"
				);
				late.push(write, call);
				Err(timed_out(timeout))
			}
		}
	}

	/// Drop `ticket` once every late call has settled
	fn release_after(self: Arc<Self>, late: LateCalls, ticket: LaneTicket) {
		if late.is_empty() {
			drop(ticket);
			return;
		}
		let runtime = self.runtime.clone();
		runtime.spawn(async move {
			while let Some((write, call)) = late.pop() {
				let result = call
					.await
					.unwrap_or_else(|e| Err(StoreError::Unavailable(e.to_string())));
				self.settle_late(write, result, &late).await;
			}
			drop(ticket);
		});
	}

	/// Fold the outcome of a timed out call back into the model. A failure
	/// needs nothing: the rollback already happened.
	async fn settle_late(&self, write: StoreWrite, result: StoreResult<()>, late: &LateCalls) {
		let operation = write.operation();
		if let Err(e) = result {
			debug!(operation = %operation, error = %e, "Late store call failed");
			if matches!(write, StoreWrite::Create(_)) {
				self.compact(late).await;
			}
			return;
		}
		info!(operation = %operation, "Late store call succeeded");

		let compact = {
			let mut state = self.state.lock();
			match write {
				StoreWrite::Create(block) => {
					let id = block.id();
					state.durable.insert(
						id,
						DurableBlock {
							content: block.content().clone(),
							order_index: block.order_index(),
						},
					);
					let index = block.order_index();
					let block_type = block.block_type().clone();
					if let Err(e) = state.model.insert_at(block, index) {
						warn!(block_id = %id, error = %e, "Could not restore late block");
					}
					state.notifications.push(
						Notification::info(format!(
							"The new {} block was saved after all",
							block_type
						))
						.for_block(id),
					);
					true
				}
				StoreWrite::Update { id, written } => {
					if state.adopt_content(id, written) {
						state.notifications.push(
							Notification::info("Changes to the block were saved after all")
								.for_block(id),
						);
					}
					false
				}
				StoreWrite::Delete(block) => {
					let id = block.id();
					state.durable.remove(&id);
					state.model.remove(id);
					state.deselect(id);
					state.notifications.push(
						Notification::info(format!(
							"The {} block was deleted after all",
							block.block_type()
						))
						.for_block(id),
					);
					true
				}
				StoreWrite::Reorder { entries, version } => {
					state.record_order(&entries);
					if state.order_version == version {
						let order: Vec<BlockId> = entries.iter().map(|e| e.id).collect();
						state.model.restore_order(&order);
					}
					false
				}
				StoreWrite::Compact(entries) => {
					state.record_order(&entries);
					false
				}
			}
		};
		if compact {
			self.compact(late).await;
		}
	}

	fn notify(&self, notification: Notification) {
		self.state.lock().notifications.push(notification);
	}

	async fn persist_create(&self, staged: Block, late: &LateCalls) -> ComposerResult<Block> {
		let id = staged.id();
		// Persist the block as it is now, not as it was when added
		let current = self.state.lock().model.get(id).cloned();
		let Some(block) = current else {
			debug!(block_id = %id, "Block removed before its create ran");
			return Ok(staged);
		};

		match self
			.call_write(late, StoreWrite::Create(block.clone()))
			.await
		{
			Ok(()) => {
				let durable = DurableBlock {
					content: block.content().clone(),
					order_index: block.order_index(),
				};
				self.state.lock().durable.insert(id, durable);
				debug!(block_id = %id, "Persisted new block");
				Ok(block)
			}
			Err(source) => {
				warn!(block_id = %id, error = %source, "Create failed; removing block");
				let drifted = {
					let mut state = self.state.lock();
					state.model.remove(id);
					state.deselect(id);
					state.notifications.push(
						Notification::error(format!(
							"Could not save the new {} block",
							block.block_type()
						))
						.for_block(id),
					);
					state.order_drifted(&state.saved_order())
				};
				// A create still in flight compacts once it settles
				if drifted && late.is_empty() {
					self.compact(late).await;
				}
				Err(ComposerError::PersistenceFailed {
					operation: Operation::Create,
					block_id: Some(id),
					source,
				})
			}
		}
	}

	async fn persist_update(
		&self,
		id: BlockId,
		written: JsonValue,
		late: &LateCalls,
	) -> ComposerResult<()> {
		let saved = self.state.lock().durable.contains_key(&id);
		if !saved {
			// The block's create failed; there is nothing to update
			debug!(block_id = %id, "Skipping update of unsaved block");
			return Err(BlockError::BlockNotFound(id).into());
		}

		let write = StoreWrite::Update {
			id,
			written: written.clone(),
		};
		let result = self.call_write(late, write).await;
		let mut state = self.state.lock();
		match result {
			Ok(()) => {
				if let Some(durable) = state.durable.get_mut(&id) {
					durable.content = written;
				}
				Ok(())
			}
			Err(source) => {
				let restored = state.restore_content(id, &written);
				warn!(block_id = %id, restored, error = %source, "Update failed");
				let message = if restored {
					"Could not save changes to the block; reverted to the last saved version"
				} else {
					"Could not save earlier changes to the block; newer changes are still being saved"
				};
				state
					.notifications
					.push(Notification::error(message).for_block(id));
				Err(ComposerError::PersistenceFailed {
					operation: Operation::Update,
					block_id: Some(id),
					source,
				})
			}
		}
	}

	async fn persist_delete(&self, removed: Block, late: &LateCalls) -> ComposerResult<()> {
		let id = removed.id();
		let saved = self.state.lock().durable.contains_key(&id);
		if !saved {
			debug!(block_id = %id, "Block was never saved; nothing to delete");
			return Ok(());
		}

		match self
			.call_write(late, StoreWrite::Delete(removed.clone()))
			.await
		{
			Ok(()) => {
				self.state.lock().durable.remove(&id);
				debug!(block_id = %id, "Persisted delete");
				self.compact(late).await;
				Ok(())
			}
			Err(source) => {
				warn!(block_id = %id, error = %source, "Delete failed; restoring block");
				{
					let mut state = self.state.lock();
					state.restore_block(&removed, removed.order_index());
					state.notifications.push(
						Notification::error(format!(
							"Could not delete the {} block; it has been restored",
							removed.block_type()
						))
						.for_block(id),
					);
				}
				Err(ComposerError::PersistenceFailed {
					operation: Operation::Delete,
					block_id: Some(id),
					source,
				})
			}
		}
	}

	/// Persist the current order of saved blocks. On failure the durable
	/// order comes back only if no reorder was issued after `version`.
	async fn persist_reorder(&self, version: u64, late: &LateCalls) -> ComposerResult<()> {
		let entries = self.state.lock().saved_order();
		if entries.is_empty() {
			return Ok(());
		}

		let write = StoreWrite::Reorder {
			entries: entries.clone(),
			version,
		};
		let result = self.call_write(late, write).await;
		let mut state = self.state.lock();
		match result {
			Ok(()) => {
				state.record_order(&entries);
				debug!(entries = entries.len(), "Persisted block order");
				Ok(())
			}
			Err(source) => {
				// A later reorder owns the order now and persists it itself
				let restored = state.order_version == version;
				if restored {
					let durable_order = state.durable_order();
					state.model.restore_order(&durable_order);
				}
				warn!(restored, error = %source, "Reorder failed");
				state.notifications.push(Notification::error(
					"Could not save the new block order; reverted to the last saved order",
				));
				Err(ComposerError::PersistenceFailed {
					operation: Operation::Reorder,
					block_id: None,
					source,
				})
			}
		}
	}

	/// Rewrite stored indices of saved blocks that no longer match the model
	async fn compact(&self, late: &LateCalls) {
		let entries = {
			let state = self.state.lock();
			let entries = state.saved_order();
			if !state.order_drifted(&entries) {
				return;
			}
			entries
		};

		match self
			.call_write(late, StoreWrite::Compact(entries.clone()))
			.await
		{
			Ok(()) => {
				self.state.lock().record_order(&entries);
				debug!(entries = entries.len(), "Compacted block order");
			}
			Err(source) => {
				// Relative order is still intact; the next reorder rewrites it
				warn!(operation = %Operation::Compact, error = %source, "Compaction failed");
				self.notify(Notification::warning(
					"Block order could not be tidied up; it will be saved with the next reorder",
				));
			}
		}
	}
}

fn timed_out(timeout: Duration) -> StoreError {
	StoreError::Unavailable(format!(
		"store call timed out after {} ms",
		timeout.as_millis()
	))
}

async fn with_timeout<T>(
	timeout: Duration,
	call: impl Future<Output = StoreResult<T>>,
) -> StoreResult<T> {
	tokio::time::timeout(timeout, call)
		.await
		.unwrap_or_else(|_| Err(timed_out(timeout)))
}
