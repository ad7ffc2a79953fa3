//! Configuration types for content store backends.

use crate::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Default number of records pre-allocated by the in-memory backend
pub const DEFAULT_PAGE_CAPACITY: usize = 64;

/// Content store backend type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackendKind {
	/// Process-local store, lost on exit
	#[default]
	Memory,
}

impl std::fmt::Display for StoreBackendKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			StoreBackendKind::Memory => write!(f, "memory"),
		}
	}
}

impl FromStr for StoreBackendKind {
	type Err = StoreError;

	fn from_str(s: &str) -> StoreResult<Self> {
		match s.trim().to_lowercase().as_str() {
			"memory" | "in-memory" => Ok(StoreBackendKind::Memory),
			_ => Err(StoreError::Config(format!("Invalid store backend: {}", s))),
		}
	}
}

/// Content store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
	pub backend: StoreBackendKind,
	/// Expected number of blocks, used to pre-size backend structures
	pub page_capacity: usize,
}

impl Default for StoreConfig {
	fn default() -> Self {
		Self {
			backend: StoreBackendKind::default(),
			page_capacity: DEFAULT_PAGE_CAPACITY,
		}
	}
}

impl StoreConfig {
	pub fn new(backend: StoreBackendKind) -> Self {
		Self {
			backend,
			..Self::default()
		}
	}

	pub fn with_page_capacity(mut self, page_capacity: usize) -> Self {
		self.page_capacity = page_capacity;
		self
	}

	/// Load configuration from environment variables.
	///
	/// # Environment Variables
	///
	/// - `COMPOSER_STORE_BACKEND`: Backend type ("memory"); defaults to memory
	/// - `COMPOSER_STORE_PAGE_CAPACITY`: Capacity hint (optional)
	pub fn from_env() -> StoreResult<Self> {
		let backend = match env::var("COMPOSER_STORE_BACKEND") {
			Ok(value) => value.parse::<StoreBackendKind>()?,
			Err(_) => StoreBackendKind::default(),
		};

		let page_capacity = match env::var("COMPOSER_STORE_PAGE_CAPACITY") {
			Ok(value) => value.trim().parse::<usize>().map_err(|_| {
				StoreError::Config(format!(
					"COMPOSER_STORE_PAGE_CAPACITY must be a positive integer, got {}",
					value
				))
			})?,
			Err(_) => DEFAULT_PAGE_CAPACITY,
		};

		Ok(Self {
			backend,
			page_capacity,
		})
	}
}
