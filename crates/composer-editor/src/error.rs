use composer_blocks::{BlockError, BlockId, PageId};
use composer_store::StoreError;
use std::fmt;

/// Persistence step that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
	Create,
	Update,
	Delete,
	Reorder,
	/// Closing index gaps after a delete or a failed create
	Compact,
}

impl fmt::Display for Operation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Operation::Create => "create",
			Operation::Update => "update",
			Operation::Delete => "delete",
			Operation::Reorder => "reorder",
			Operation::Compact => "compact",
		})
	}
}

#[derive(Debug, thiserror::Error)]
pub enum ComposerError {
	/// Structural error raised by the block model
	#[error(transparent)]
	Block(#[from] BlockError),

	/// Store call failed; the local change was rolled back
	#[error("Failed to {operation} block: {source}")]
	PersistenceFailed {
		operation: Operation,
		block_id: Option<BlockId>,
		#[source]
		source: StoreError,
	},

	#[error("Failed to load page {page_id}: {source}")]
	Hydration {
		page_id: PageId,
		#[source]
		source: StoreError,
	},

	#[error("No block is selected")]
	NoSelection,

	#[error("Configuration error: {0}")]
	Config(String),

	/// Background persistence task did not finish
	#[error("Persistence task failed: {0}")]
	Task(String),
}

impl ComposerError {
	/// Whether the error came from the store rather than from the request
	pub fn is_persistence(&self) -> bool {
		matches!(self, ComposerError::PersistenceFailed { .. })
	}
}

pub type ComposerResult<T> = Result<T, ComposerError>;
