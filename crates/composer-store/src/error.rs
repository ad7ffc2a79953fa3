//! Error types for content store operations.

use composer_blocks::BlockId;

/// Errors reported by a [`ContentStore`](crate::ContentStore)
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
	/// Backend could not be reached or refused the call
	#[error("Store unavailable: {0}")]
	Unavailable(String),

	/// Block not found in the store
	#[error("Block not found in store: {0}")]
	NotFound(BlockId),

	/// Write conflicts with the stored state
	#[error("Conflict: {0}")]
	Conflict(String),

	/// Configuration error
	#[error("Configuration error: {0}")]
	Config(String),

	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
