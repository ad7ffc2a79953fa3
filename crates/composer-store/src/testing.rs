//! Scriptable content store for tests
//!
//! [`ScriptedStore`] forwards to an [`InMemoryContentStore`] and lets a test
//! inject failures, record every call and hold calls in flight until the
//! test releases them.

use crate::backend::ContentStore;
use crate::backends::memory::InMemoryContentStore;
use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use composer_blocks::{Block, BlockId, OrderEntry, PageId};
use parking_lot::Mutex;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, Semaphore};

/// Store operation selector for scripting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
	Create,
	Update,
	Delete,
	BulkReorder,
	ListByPage,
}

/// A call as it reached the store
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
	Create(BlockId),
	Update(BlockId, JsonValue),
	Delete(BlockId),
	BulkReorder(Vec<OrderEntry>),
	ListByPage(PageId),
}

impl StoreCall {
	pub fn operation(&self) -> StoreOperation {
		match self {
			StoreCall::Create(_) => StoreOperation::Create,
			StoreCall::Update(..) => StoreOperation::Update,
			StoreCall::Delete(_) => StoreOperation::Delete,
			StoreCall::BulkReorder(_) => StoreOperation::BulkReorder,
			StoreCall::ListByPage(_) => StoreOperation::ListByPage,
		}
	}
}

#[derive(Debug, Clone, Copy)]
enum Failure {
	Times(usize),
	Always,
}

#[derive(Debug, Default)]
struct Script {
	failures: HashMap<StoreOperation, Failure>,
	gates: HashMap<StoreOperation, Arc<Semaphore>>,
	calls: Vec<StoreCall>,
	completed: Vec<StoreCall>,
}

/// Content store with failure injection, call recording and gates
///
/// # Examples
///
/// ```
/// use composer_store::ContentStore;
/// use composer_store::testing::{ScriptedStore, StoreOperation};
/// use composer_blocks::{Block, PageId};
/// use serde_json::json;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let store = ScriptedStore::new();
/// store.fail_next(StoreOperation::Create);
///
/// let block = Block::new(PageId::new(), "text", json!({}), 0);
/// assert!(store.create(&block).await.is_err());
/// assert!(store.create(&block).await.is_ok());
/// assert_eq!(store.calls().len(), 2);
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ScriptedStore {
	inner: InMemoryContentStore,
	script: Mutex<Script>,
	latency: Mutex<Option<Duration>>,
	call_made: Notify,
}

impl ScriptedStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Shared handle, the form the composer takes
	pub fn shared() -> Arc<Self> {
		Arc::new(Self::new())
	}

	/// The backing store, for assertions on durable state
	pub fn inner(&self) -> &InMemoryContentStore {
		&self.inner
	}

	pub fn seed(&self, blocks: impl IntoIterator<Item = Block>) {
		self.inner.seed(blocks);
	}

	/// Fail the next call of `operation`
	pub fn fail_next(&self, operation: StoreOperation) {
		self.fail_times(operation, 1);
	}

	pub fn fail_times(&self, operation: StoreOperation, times: usize) {
		self.script
			.lock()
			.failures
			.insert(operation, Failure::Times(times));
	}

	pub fn fail_always(&self, operation: StoreOperation) {
		self.script
			.lock()
			.failures
			.insert(operation, Failure::Always);
	}

	/// Stop injecting failures for `operation`
	pub fn recover(&self, operation: StoreOperation) {
		self.script.lock().failures.remove(&operation);
	}

	/// Delay every call by `latency`
	pub fn set_latency(&self, latency: Duration) {
		*self.latency.lock() = Some(latency);
	}

	/// Hold calls of `operation` in flight until released
	pub fn hold(&self, operation: StoreOperation) {
		self.script
			.lock()
			.gates
			.entry(operation)
			.or_insert_with(|| Arc::new(Semaphore::new(0)));
	}

	/// Let exactly one held call of `operation` proceed
	pub fn release_one(&self, operation: StoreOperation) {
		if let Some(gate) = self.script.lock().gates.get(&operation) {
			gate.add_permits(1);
		}
	}

	/// Open the gate of `operation` for every held and future call
	pub fn release(&self, operation: StoreOperation) {
		if let Some(gate) = self.script.lock().gates.remove(&operation) {
			gate.close();
		}
	}

	/// Calls in the order they reached the store
	pub fn calls(&self) -> Vec<StoreCall> {
		self.script.lock().calls.clone()
	}

	pub fn calls_of(&self, operation: StoreOperation) -> Vec<StoreCall> {
		self.script
			.lock()
			.calls
			.iter()
			.filter(|c| c.operation() == operation)
			.cloned()
			.collect()
	}

	/// Calls that were applied to the backing store
	pub fn completed(&self) -> Vec<StoreCall> {
		self.script.lock().completed.clone()
	}

	/// Wait until at least `count` calls of `operation` reached the store
	pub async fn wait_for_calls(&self, operation: StoreOperation, count: usize) {
		loop {
			let notified = self.call_made.notified();
			if self.calls_of(operation).len() >= count {
				return;
			}
			notified.await;
		}
	}

	async fn enter(&self, call: StoreCall) -> StoreResult<()> {
		let operation = call.operation();
		let gate = {
			let mut script = self.script.lock();
			script.calls.push(call);
			script.gates.get(&operation).cloned()
		};
		self.call_made.notify_waiters();

		if let Some(gate) = gate {
			// A closed gate lets everything through
			if let Ok(permit) = gate.acquire().await {
				permit.forget();
			}
		}
		let latency = *self.latency.lock();
		if let Some(latency) = latency {
			tokio::time::sleep(latency).await;
		}

		let mut script = self.script.lock();
		let fail = match script.failures.get_mut(&operation) {
			Some(Failure::Always) => true,
			Some(Failure::Times(remaining)) if *remaining > 0 => {
				*remaining -= 1;
				true
			}
			_ => false,
		};
		if fail {
			tracing::debug!(?operation, "Injected store failure");
			return Err(StoreError::Unavailable(format!(
				"injected {:?} failure",
				operation
			)));
		}
		Ok(())
	}

	fn complete(&self, call: StoreCall) {
		self.script.lock().completed.push(call);
	}
}

#[async_trait]
impl ContentStore for ScriptedStore {
	async fn create(&self, block: &Block) -> StoreResult<()> {
		self.enter(StoreCall::Create(block.id())).await?;
		self.inner.create(block).await?;
		self.complete(StoreCall::Create(block.id()));
		Ok(())
	}

	async fn update(&self, id: BlockId, content: &JsonValue) -> StoreResult<()> {
		self.enter(StoreCall::Update(id, content.clone())).await?;
		self.inner.update(id, content).await?;
		self.complete(StoreCall::Update(id, content.clone()));
		Ok(())
	}

	async fn delete(&self, id: BlockId) -> StoreResult<()> {
		self.enter(StoreCall::Delete(id)).await?;
		self.inner.delete(id).await?;
		self.complete(StoreCall::Delete(id));
		Ok(())
	}

	async fn bulk_reorder(&self, entries: &[OrderEntry]) -> StoreResult<()> {
		self.enter(StoreCall::BulkReorder(entries.to_vec())).await?;
		self.inner.bulk_reorder(entries).await?;
		self.complete(StoreCall::BulkReorder(entries.to_vec()));
		Ok(())
	}

	async fn list_by_page(&self, page_id: PageId) -> StoreResult<Vec<Block>> {
		self.enter(StoreCall::ListByPage(page_id)).await?;
		let blocks = self.inner.list_by_page(page_id).await?;
		self.complete(StoreCall::ListByPage(page_id));
		Ok(blocks)
	}
}
