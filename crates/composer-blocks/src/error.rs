use crate::block::{BlockId, PageId};
use composer_forms::FormError;

/// Errors raised by the block model and registry
#[derive(Debug, thiserror::Error)]
pub enum BlockError {
	/// Block type not registered
	#[error("Block type not registered: {0}")]
	UnknownBlockType(String),

	/// Operation referenced an id that is not in the collection
	#[error("Block not found: {0}")]
	BlockNotFound(BlockId),

	/// Reorder input was not a permutation of the current ids
	#[error("Invalid reorder: {0}")]
	InvalidReorder(String),

	/// Payload does not match the schema of its block type
	#[error("Invalid content for {block_type}: {reason}")]
	InvalidContent { block_type: String, reason: String },

	/// Two descriptors were registered under the same tag
	#[error("Block type registered twice: {0}")]
	DuplicateBlockType(String),

	#[error("Block {block} belongs to page {found}, not {expected}")]
	PageMismatch {
		block: BlockId,
		expected: PageId,
		found: PageId,
	},

	#[error("Block already present in the collection: {0}")]
	DuplicateBlock(BlockId),

	/// Editor change could not be applied
	#[error(transparent)]
	Form(#[from] FormError),
}

pub type BlockResult<T> = Result<T, BlockError>;
