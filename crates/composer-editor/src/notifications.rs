//! User-facing notifications raised by background persistence

use chrono::{DateTime, Utc};
use composer_blocks::BlockId;
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
	Info,
	Warning,
	Error,
}

impl fmt::Display for NotificationLevel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			NotificationLevel::Info => "info",
			NotificationLevel::Warning => "warning",
			NotificationLevel::Error => "error",
		})
	}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
	pub level: NotificationLevel,
	pub message: String,
	pub block_id: Option<BlockId>,
	pub created_at: DateTime<Utc>,
}

impl Notification {
	pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
		Self {
			level,
			message: message.into(),
			block_id: None,
			created_at: Utc::now(),
		}
	}

	pub fn info(message: impl Into<String>) -> Self {
		Self::new(NotificationLevel::Info, message)
	}

	pub fn error(message: impl Into<String>) -> Self {
		Self::new(NotificationLevel::Error, message)
	}

	pub fn warning(message: impl Into<String>) -> Self {
		Self::new(NotificationLevel::Warning, message)
	}

	pub fn for_block(mut self, block_id: BlockId) -> Self {
		self.block_id = Some(block_id);
		self
	}
}

impl fmt::Display for Notification {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "[{}] {}", self.level, self.message)
	}
}

/// Bounded FIFO; pushing past capacity drops the oldest entry
#[derive(Debug, Clone)]
pub(crate) struct NotificationQueue {
	entries: VecDeque<Notification>,
	capacity: usize,
}

impl NotificationQueue {
	pub(crate) fn new(capacity: usize) -> Self {
		Self {
			entries: VecDeque::with_capacity(capacity.min(64)),
			capacity,
		}
	}

	pub(crate) fn push(&mut self, notification: Notification) {
		if self.capacity == 0 {
			return;
		}
		while self.entries.len() >= self.capacity {
			self.entries.pop_front();
		}
		self.entries.push_back(notification);
	}

	pub(crate) fn drain(&mut self) -> Vec<Notification> {
		self.entries.drain(..).collect()
	}

	#[cfg(test)]
	pub(crate) fn len(&self) -> usize {
		self.entries.len()
	}
}
