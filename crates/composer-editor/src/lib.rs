//! Page composition controller for the Reinhardt page composer
//!
//! [`PageComposer`] ties the block model to a content store:
//!
//! - Optimistic mutations: add, update, delete and reorder apply to the
//!   model at once and persist in the background as a [`PendingWrite`]
//! - Rollback to the last durable state when a store call fails or times out
//! - Ordered persistence: writes to one block, and structural writes to the
//!   page, reach the store in call order
//! - Selection and property editing through [`PropertyEditor`]
//! - Preview and workspace rendering
//!
//! ## Example
//!
//! ```
//! use composer_editor::prelude::*;
//! use composer_store::InMemoryContentStore;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(InMemoryContentStore::new());
//! let page = PageId::new();
//! let composer =
//! 	PageComposer::open(page, Arc::new(BlockRegistry::builtin()), store.clone(), ComposerConfig::default())
//! 		.await?;
//!
//! let heading = composer.add_block("heading")?.await?;
//! composer
//! 	.update_block(heading.id(), &json!({"text": "Welcome"}))?
//! 	.await?;
//!
//! assert!(composer.render_preview().contains("Welcome"));
//! assert_eq!(store.get(heading.id()).unwrap().content["text"], "Welcome");
//! # Ok(())
//! # }
//! ```

pub mod composer;
pub mod config;
pub mod error;
mod lanes;
pub mod notifications;
pub mod property_editor;
pub mod workspace;

pub use composer::{PageComposer, PendingWrite, SyncState};
pub use config::ComposerConfig;
pub use error::{ComposerError, ComposerResult, Operation};
pub use notifications::{Notification, NotificationLevel};
pub use property_editor::PropertyEditor;
pub use workspace::render_workspace;

/// Re-export commonly used types
pub mod prelude {
	pub use crate::composer::{PageComposer, PendingWrite, SyncState};
	pub use crate::config::ComposerConfig;
	pub use crate::error::{ComposerError, ComposerResult};
	pub use crate::notifications::{Notification, NotificationLevel};
	pub use crate::property_editor::PropertyEditor;
	pub use composer_blocks::{Block, BlockId, BlockRegistry, PageId};
	pub use composer_forms::{EditorChange, FieldPath};
}
