//! Prelude module for `dcc_types`.
//!
//! This module provides a convenient way to import commonly used types, traits, and constants.
//!
//! # Examples
//!
//! ```no_run
//! use dcc_types::prelude::*;
//!
//! let data = std::fs::read("BAHDLITTNHTH.DCC").unwrap();
//! let layout = DccLayout::parse(&data).unwrap();
//! let direction = layout.decode_direction(0).unwrap();
//! println!("{}", direction.bounds());
//! ```

// File module types
#[doc(inline)]
pub use crate::file::{
	// Bitstream errors
	BitstreamError,

	// Palette types
	Color,
	CompressionFlags,

	// DCC types
	DccDirection,
	DccDirectionBuilder,
	DccError,
	DccFile,
	DccFileBuilder,
	DccFrame,
	DccHeader,
	DccLayout,

	ErrorKind,
	Palette,
	Rect,
	SourceFrame,
	Stream,
};

#[doc(inline)]
pub use crate::file::dcc::constants::{SIGNATURE, direction_order};

// Re-export the file module for advanced usage
#[doc(inline)]
pub use crate::file;
