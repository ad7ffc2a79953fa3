//! Composer configuration

use crate::error::{ComposerError, ComposerResult};
use composer_blocks::PreviewOptions;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Default upper bound for a single store call
pub const DEFAULT_PERSISTENCE_TIMEOUT_MS: u64 = 10_000;

/// Default number of undelivered notifications kept
pub const DEFAULT_NOTIFICATION_CAPACITY: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
	/// A store call running longer than this counts as failed and is rolled back
	pub persistence_timeout_ms: u64,
	/// Oldest notifications are dropped beyond this many
	pub notification_capacity: usize,
	pub preview: PreviewOptions,
}

impl Default for ComposerConfig {
	fn default() -> Self {
		Self {
			persistence_timeout_ms: DEFAULT_PERSISTENCE_TIMEOUT_MS,
			notification_capacity: DEFAULT_NOTIFICATION_CAPACITY,
			preview: PreviewOptions::default(),
		}
	}
}

impl ComposerConfig {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_persistence_timeout(mut self, timeout: Duration) -> Self {
		self.persistence_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
		self
	}

	pub fn with_notification_capacity(mut self, capacity: usize) -> Self {
		self.notification_capacity = capacity;
		self
	}

	pub fn with_preview(mut self, preview: PreviewOptions) -> Self {
		self.preview = preview;
		self
	}

	pub fn persistence_timeout(&self) -> Duration {
		Duration::from_millis(self.persistence_timeout_ms)
	}

	/// Load configuration from environment variables.
	///
	/// # Environment Variables
	///
	/// - `COMPOSER_PERSIST_TIMEOUT_MS`: Store call timeout in milliseconds
	/// - `COMPOSER_NOTIFICATION_CAPACITY`: Notification queue bound
	/// - `COMPOSER_PREVIEW_WRAP`: Wrap preview blocks in sections ("true"/"false")
	pub fn from_env() -> ComposerResult<Self> {
		let mut config = Self::default();

		if let Ok(value) = env::var("COMPOSER_PERSIST_TIMEOUT_MS") {
			config.persistence_timeout_ms = value
				.trim()
				.parse::<u64>()
				.ok()
				.filter(|ms| *ms > 0)
				.ok_or_else(|| {
					ComposerError::Config(format!(
						"COMPOSER_PERSIST_TIMEOUT_MS must be a positive integer, got {}",
						value
					))
				})?;
		}

		if let Ok(value) = env::var("COMPOSER_NOTIFICATION_CAPACITY") {
			config.notification_capacity = value.trim().parse::<usize>().map_err(|_| {
				ComposerError::Config(format!(
					"COMPOSER_NOTIFICATION_CAPACITY must be an integer, got {}",
					value
				))
			})?;
		}

		if let Ok(value) = env::var("COMPOSER_PREVIEW_WRAP") {
			config.preview.wrap_sections = parse_flag(&value).ok_or_else(|| {
				ComposerError::Config(format!(
					"COMPOSER_PREVIEW_WRAP must be true or false, got {}",
					value
				))
			})?;
		}

		Ok(config)
	}
}

fn parse_flag(value: &str) -> Option<bool> {
	match value.trim().to_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Some(true),
		"0" | "false" | "no" | "off" => Some(false),
		_ => None,
	}
}
