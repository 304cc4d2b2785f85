//! This module is separated into its own crate to enable simple dynamic linking for `dcc-rs`, and should not be used directly.

/// `use dcc_rs::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export dcc_types for convenience
pub use dcc_types;

// Re-export commonly used types at crate root
pub use dcc_types::file::{DccError, DccFile, DccFileBuilder, DccLayout, ErrorKind, Palette};
