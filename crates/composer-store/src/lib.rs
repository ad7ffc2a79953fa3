//! Content store boundary for the page composer
//!
//! The composer keeps the in-memory copy of a page; a [`ContentStore`] owns
//! the durable one. This crate defines that boundary and ships an in-memory
//! reference backend.
//!
//! ## Example
//!
//! ```
//! use composer_store::{ContentStore, InMemoryContentStore};
//! use composer_blocks::{Block, PageId};
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> composer_store::StoreResult<()> {
//! let store = InMemoryContentStore::new();
//! let page = PageId::new();
//! let block = Block::new(page, "text", json!({"body": "Hello"}), 0);
//!
//! store.create(&block).await?;
//! store.update(block.id(), &json!({"body": "Hello again"})).await?;
//!
//! let blocks = store.list_by_page(page).await?;
//! assert_eq!(blocks[0].content()["body"], "Hello again");
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod backends;
pub mod config;
pub mod error;
pub mod factory;
#[cfg(all(feature = "memory", any(test, feature = "testing")))]
pub mod testing;

pub use backend::ContentStore;
#[cfg(feature = "memory")]
pub use backends::memory::{InMemoryContentStore, StoredBlock};
pub use config::{StoreBackendKind, StoreConfig};
pub use error::{StoreError, StoreResult};
pub use factory::create_store;
