//! Factory function for creating content stores.

use crate::{ContentStore, StoreConfig, StoreResult};
use std::sync::Arc;

/// Create a content store from configuration.
///
/// # Examples
///
/// ```
/// use composer_store::{StoreConfig, create_store};
///
/// let store = create_store(StoreConfig::default()).unwrap();
/// ```
pub fn create_store(config: StoreConfig) -> StoreResult<Arc<dyn ContentStore>> {
	match config.backend {
		#[cfg(feature = "memory")]
		crate::StoreBackendKind::Memory => {
			tracing::debug!(page_capacity = config.page_capacity, "Creating in-memory content store");
			Ok(Arc::new(crate::InMemoryContentStore::from_config(&config)))
		}
		#[allow(unreachable_patterns)]
		backend => Err(crate::StoreError::Config(format!(
			"Store backend not enabled: {}",
			backend
		))),
	}
}
