//! Content store boundary.
//!
//! # Examples
//!
//! ```
//! use composer::store::{StoreConfig, create_store};
//!
//! let store = create_store(StoreConfig::default()).unwrap();
//! # let _ = store;
//! ```

pub use composer_store::*;
