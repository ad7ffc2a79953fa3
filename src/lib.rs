//! # Reinhardt Composer
//!
//! A visual page composition engine: pages are ordered sequences of typed
//! content blocks, edited through generated property forms, previewed live
//! and persisted optimistically.
//!
//! ## Crates
//!
//! - [`forms`] - Editor form descriptors, list editing and soft validation
//! - [`blocks`] - Block model, type registry, type picker and preview rendering
//! - [`store`] - The content store boundary and its in-memory backend
//! - [`editor`] - [`PageComposer`], the controller tying them together
//!
//! ## Feature Flags
//!
//! - `memory-store` (default) - In-memory reference content store
//! - `testing` - Scriptable content store with failure injection
//! - `full` - All features enabled
//!
//! ## Quick Example
//!
//! ```
//! use composer::prelude::*;
//! use composer::store::InMemoryContentStore;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let composer = PageComposer::open(
//! 	PageId::new(),
//! 	Arc::new(BlockRegistry::builtin()),
//! 	Arc::new(InMemoryContentStore::new()),
//! 	ComposerConfig::default(),
//! )
//! .await?;
//!
//! let hero = composer.add_block("hero")?.await?;
//! composer.select_block(hero.id())?;
//! composer
//! 	.edit_selected(&EditorChange::set(FieldPath::field("title"), "Launch day"))?
//! 	.await?;
//!
//! assert!(composer.render_preview().contains("Launch day"));
//! # Ok(())
//! # }
//! ```

pub mod blocks;
pub mod editor;
pub mod forms;
pub mod store;

// Re-export the types most pages need
pub use composer_blocks::{
	Block, BlockCategory, BlockError, BlockId, BlockRegistry, BlockSchema, BlockType, PageId,
	PreviewOptions, PreviewRenderer, TypePicker,
};
pub use composer_editor::{
	ComposerConfig, ComposerError, ComposerResult, Notification, NotificationLevel, PageComposer,
	PendingWrite, PropertyEditor, SyncState,
};
pub use composer_forms::{EditorChange, EditorForm, FieldPath, FormErrors};
pub use composer_store::{ContentStore, StoreConfig, StoreError, create_store};

/// Re-export commonly used types
pub mod prelude {
	pub use composer_blocks::prelude::*;
	pub use composer_editor::{
		ComposerConfig, ComposerError, ComposerResult, Notification, NotificationLevel,
		PageComposer, PendingWrite, PropertyEditor, SyncState,
	};
	pub use composer_forms::{EditorChange, FieldPath, FormErrors};
	pub use composer_store::{ContentStore, StoreConfig, create_store};
}
