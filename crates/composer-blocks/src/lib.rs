//! Content blocks for the Reinhardt page composer
//!
//! A page is an ordered sequence of typed blocks. This crate holds the parts
//! of the engine that never touch I/O:
//!
//! - [`Block`] and its identifiers
//! - [`BlockRegistry`]: the closed set of block types, each carrying its
//!   payload schema, editor form and renderer
//! - [`BlockCollection`]: the in-memory ordered list of one page's blocks
//! - [`TypePicker`]: the categorized, filterable catalog of types
//! - [`PreviewRenderer`]: read-only HTML rendering of a collection
//!
//! ## Example
//!
//! ```
//! use composer_blocks::prelude::*;
//! use std::sync::Arc;
//!
//! let registry = Arc::new(BlockRegistry::builtin());
//! let mut collection = BlockCollection::new(PageId::new(), registry.clone());
//!
//! let heading = collection.add("heading").unwrap();
//! let text = collection.add("text").unwrap();
//! collection.reorder(&[text.id(), heading.id()]).unwrap();
//!
//! assert_eq!(collection.ids(), vec![text.id(), heading.id()]);
//!
//! let html = PreviewRenderer::new(&registry).render(&collection);
//! assert!(html.contains("<h2"));
//! ```

pub mod block;
pub mod catalog;
pub mod collection;
pub mod error;
pub mod html;
pub mod preview;
pub mod registry;
pub mod schema;
pub mod types;

pub use block::{Block, BlockId, BlockType, OrderEntry, PageId};
pub use catalog::TypePicker;
pub use collection::BlockCollection;
pub use error::{BlockError, BlockResult};
pub use preview::{PreviewOptions, PreviewRenderer};
pub use registry::{BlockRegistry, BlockRegistryBuilder, CatalogEntry, CategoryGroup};
pub use schema::{BlockCategory, BlockSchema, BlockTypeDescriptor};

/// Re-export commonly used types
pub mod prelude {
	pub use crate::block::{Block, BlockId, BlockType, OrderEntry, PageId};
	pub use crate::catalog::TypePicker;
	pub use crate::collection::BlockCollection;
	pub use crate::error::{BlockError, BlockResult};
	pub use crate::preview::{PreviewOptions, PreviewRenderer};
	pub use crate::registry::{BlockRegistry, CategoryGroup};
	pub use crate::schema::{BlockCategory, BlockSchema, BlockTypeDescriptor};
}
