//! FIFO ordering of background store calls
//!
//! Each block has its own lane for content writes, and the page has one
//! structure lane shared by create, delete, reorder and compaction. A write
//! takes a [`LaneTicket`] synchronously at call time, so its position in
//! every lane it joins matches call order. The ticket resolves once every
//! earlier write in those lanes has settled, and settles its own slot when
//! dropped, even if the task panicked.

use composer_blocks::BlockId;
use futures::future::{BoxFuture, FutureExt, Shared, join_all};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::oneshot;

type Settled = Shared<BoxFuture<'static, ()>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum LaneKey {
	Structure,
	Block(BlockId),
}

struct Tail {
	settled: Settled,
	generation: u64,
}

#[derive(Default)]
struct LaneTable {
	tails: HashMap<LaneKey, Tail>,
	next_generation: u64,
}

#[derive(Clone, Default)]
pub(crate) struct Lanes {
	table: Arc<Mutex<LaneTable>>,
}

impl Lanes {
	pub(crate) fn new() -> Self {
		Self::default()
	}

	/// Join the end of every lane in `keys`
	pub(crate) fn enqueue(&self, keys: &[LaneKey]) -> LaneTicket {
		let (done, settled) = oneshot::channel::<()>();
		let settled: Settled = settled.map(|_| ()).boxed().shared();

		let mut table = self.table.lock();
		table.next_generation += 1;
		let generation = table.next_generation;

		let mut waits = Vec::with_capacity(keys.len());
		for key in keys {
			let tail = Tail {
				settled: settled.clone(),
				generation,
			};
			if let Some(previous) = table.tails.insert(*key, tail) {
				waits.push(previous.settled);
			}
		}

		LaneTicket {
			lanes: self.clone(),
			keys: keys.to_vec(),
			generation,
			waits,
			done: Some(done),
		}
	}

	/// Whether no write is queued or running in any lane
	pub(crate) fn is_idle(&self) -> bool {
		self.table.lock().tails.is_empty()
	}

	/// Whether any write is queued or running in `key`
	#[cfg(test)]
	pub(crate) fn is_busy(&self, key: LaneKey) -> bool {
		self.table.lock().tails.contains_key(&key)
	}

	/// Resolves when every write queued so far has settled
	pub(crate) fn idle(&self) -> impl Future<Output = ()> + Send + 'static {
		let tails: Vec<Settled> = self
			.table
			.lock()
			.tails
			.values()
			.map(|tail| tail.settled.clone())
			.collect();
		join_all(tails).map(|_| ())
	}
}

/// A reserved slot in one or more lanes
pub(crate) struct LaneTicket {
	lanes: Lanes,
	keys: Vec<LaneKey>,
	generation: u64,
	waits: Vec<Settled>,
	done: Option<oneshot::Sender<()>>,
}

impl LaneTicket {
	/// Wait for every earlier write in this ticket's lanes
	pub(crate) async fn ready(&mut self) {
		join_all(self.waits.iter().cloned()).await;
		self.waits.clear();
	}
}

impl Drop for LaneTicket {
	fn drop(&mut self) {
		{
			let mut table = self.lanes.table.lock();
			for key in &self.keys {
				// Only the last ticket in a lane removes it
				if table
					.tails
					.get(key)
					.is_some_and(|tail| tail.generation == self.generation)
				{
					table.tails.remove(key);
				}
			}
		}
		if let Some(done) = self.done.take() {
			let _ = done.send(());
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[tokio::test]
	async fn test_same_lane_runs_in_call_order() {
		// Arrange
		let lanes = Lanes::new();
		let key = LaneKey::Block(BlockId::new());
		let log = Arc::new(Mutex::new(Vec::new()));
		let (gate_tx, gate_rx) = oneshot::channel::<()>();

		let mut first = lanes.enqueue(&[key]);
		let mut second = lanes.enqueue(&[key]);

		// Act
		let second_task = tokio::spawn({
			let log = log.clone();
			async move {
				second.ready().await;
				log.lock().push("second");
			}
		});
		let first_task = tokio::spawn({
			let log = log.clone();
			async move {
				first.ready().await;
				let _ = gate_rx.await;
				log.lock().push("first");
			}
		});
		tokio::task::yield_now().await;
		assert!(log.lock().is_empty());
		gate_tx.send(()).unwrap();
		first_task.await.unwrap();
		second_task.await.unwrap();

		// Assert
		assert_eq!(*log.lock(), vec!["first", "second"]);
		assert!(!lanes.is_busy(key));
	}

	#[rstest]
	#[tokio::test]
	async fn test_independent_lanes_do_not_wait() {
		// Arrange
		let lanes = Lanes::new();
		let _held = lanes.enqueue(&[LaneKey::Block(BlockId::new())]);
		let mut other = lanes.enqueue(&[LaneKey::Block(BlockId::new())]);

		// Act
		let result = tokio::time::timeout(std::time::Duration::from_secs(1), other.ready()).await;

		// Assert
		assert!(result.is_ok());
	}

	#[rstest]
	#[tokio::test]
	async fn test_multi_lane_ticket_waits_for_both() {
		// Arrange
		let lanes = Lanes::new();
		let block = LaneKey::Block(BlockId::new());
		let structure_ticket = lanes.enqueue(&[LaneKey::Structure]);
		let block_ticket = lanes.enqueue(&[block]);
		let mut both = lanes.enqueue(&[LaneKey::Structure, block]);

		// Act
		drop(structure_ticket);
		let pending = tokio::time::timeout(std::time::Duration::from_millis(20), both.ready()).await;

		// Assert
		assert!(pending.is_err());
		drop(block_ticket);
		both.ready().await;
	}

	#[rstest]
	#[tokio::test]
	async fn test_idle_waits_for_all_lanes() {
		// Arrange
		let lanes = Lanes::new();
		let ticket = lanes.enqueue(&[LaneKey::Structure]);
		let idle = tokio::spawn(lanes.idle());

		// Act
		tokio::task::yield_now().await;
		assert!(!idle.is_finished());
		drop(ticket);

		// Assert
		idle.await.unwrap();
		assert!(!lanes.is_busy(LaneKey::Structure));
	}

	#[rstest]
	fn test_lane_kept_while_later_ticket_pending() {
		let lanes = Lanes::new();
		let first = lanes.enqueue(&[LaneKey::Structure]);
		let second = lanes.enqueue(&[LaneKey::Structure]);
		drop(first);
		assert!(lanes.is_busy(LaneKey::Structure));
		drop(second);
		assert!(!lanes.is_busy(LaneKey::Structure));
	}
}
