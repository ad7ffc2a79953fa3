//! Block model, type registry and preview rendering.

pub use composer_blocks::*;
