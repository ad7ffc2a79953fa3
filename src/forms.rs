//! Editor form descriptors.
//!
//! Fields describe how a block's content payload is edited; an
//! [`EditorForm`] applies changes and renders the property form.
//!
//! # Examples
//!
//! ```
//! use composer::forms::{CharField, EditorForm};
//!
//! let form = EditorForm::new().field(CharField::new("title").required());
//! assert!(form.get("title").is_some());
//! ```

pub use composer_forms::*;
