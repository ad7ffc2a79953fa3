//! Page composition controller.

pub use composer_editor::*;
