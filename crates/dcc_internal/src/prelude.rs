//! Prelude module for `dcc_internal`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```rust
//! use dcc_internal::prelude::*;
//!
//! # fn main() -> Result<(), DccError> {
//! let frame = SourceFrame::new(2, 2, 0, 1, vec![3, 3, 0, 3])?;
//! let mut builder = DccFileBuilder::new(1)?;
//! builder.set_direction(0, DccDirectionBuilder::new().with_frame(frame))?;
//!
//! let dcc = DccFile::from_bytes(&builder.build()?)?;
//! assert_eq!(dcc.direction(0)?.frames()[0].cropped_pixels(), vec![3, 3, 0, 3]);
//! # Ok(())
//! # }
//! ```

// Re-export everything from dcc_types::prelude
#[doc(inline)]
pub use dcc_types::prelude::*;

// Re-export the entire dcc_types module for advanced usage
#[doc(inline)]
pub use dcc_types;
