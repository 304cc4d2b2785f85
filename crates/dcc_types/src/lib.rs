//! This crate provides the DCC directional sprite codec for the `dcc-rs` project.
//!
//! # File Formats
//!
//! - **DCC**: Compressed multi-direction sprite animations, decoded into
//!   palette-index frames and encoded back from them
//! - **Palette**: 256-color `.dat` palettes used to turn indices into RGBA
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```no_run
//! use dcc_types::prelude::*;
//!
//! # fn main() -> Result<(), DccError> {
//! let dcc = DccFile::open("BAHDLITTNHTH.DCC")?;
//! let palette = Palette::from_file("pal.dat")?;
//!
//! let first = &dcc.direction(0)?.frames()[0];
//! let rgba = first.to_rgba(&palette);
//! # Ok(())
//! # }
//! ```
//!
//! Or use explicit paths:
//!
//! ```no_run
//! use dcc_types::file::dcc::{Layout, constants::SIGNATURE};
//!
//! let data = std::fs::read("BAHDLITTNHTH.DCC").unwrap();
//! assert_eq!(data[0], SIGNATURE);
//! let layout = Layout::parse(&data).unwrap();
//! ```

pub mod file;

/// `use dcc_types::prelude::*;` to import commonly used items.
pub mod prelude;
