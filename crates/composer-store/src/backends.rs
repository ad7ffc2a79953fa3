//! Content store backend implementations

#[cfg(feature = "memory")]
pub mod memory;
