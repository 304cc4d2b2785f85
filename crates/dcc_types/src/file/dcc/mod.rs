//! Directional sprite (`.DCC`) support for `dcc-rs` project.
//!
//! DCC files hold animated sprites drawn from several compass directions.
//! Every direction is an independent, heavily bit-packed stream: frames are
//! cut into 4×4 cells which are either repeated from the previous frame or
//! rebuilt from a stack of at most four palette indices.
//!
//! # File Structure
//!
//! - Header (15 bytes): signature `0x74`, version, direction count, frames per
//!   direction, the constant `1` and a total coded size
//! - Direction offset table: one little-endian `u32` per direction, in a fixed
//!   storage order that depends on the direction count
//! - Direction bitstreams, read least-significant bit first:
//!   - coded size, compression flags and seven field width codes
//!   - one header per frame
//!   - the lengths of the equal-cells, pixel-mask, encoding-type and
//!     raw-pixel-codes streams, then the 256-bit palette-index table
//!   - the four streams back to back, then the shared pixel code stream
//!
//! # Decoding
//!
//! Decoding runs in fixed passes: header parsing, cell geometry, pixel-buffer
//! reconstruction and frame materialization. Frames come out as palette-index
//! grids the size of their direction's bounding box.
//!
//! # Examples
//!
//! ```no_run
//! use dcc_types::file::dcc::{File, Layout};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // decode everything
//! let dcc = File::open("BAHDLITTNHTH.DCC")?;
//! for direction in &dcc {
//!     let (width, height) = direction.frame_bounds();
//!     println!("direction {}: {} frames up to {width}x{height}", direction.index(), direction.frame_count());
//! }
//!
//! // or a single direction of a buffer already in memory
//! let data = std::fs::read("BAHDLITTNHTH.DCC")?;
//! let layout = Layout::parse(&data)?;
//! let south = layout.decode_direction(0)?;
//! println!("{south}");
//! # Ok(())
//! # }
//! ```

mod cell;
mod direction;
mod encode;
mod file;
mod frame;
mod materialize;
mod pixel_buffer;
mod types;

/// Constants used in `.DCC` files
pub mod constants;

pub use self::cell::{Cell, CellGrid, CellLayout};
pub use self::direction::Direction;
pub use self::encode::{DirectionBuilder, FileBuilder, SourceFrame};
pub use self::file::{File, Header, Layout};
pub use self::frame::{Frame, FrameHeader};
pub use self::pixel_buffer::{PixelBuffer, PixelBufferEntry};
pub use self::types::{CompressionFlags, FieldWidths, Rect, StreamSizes, width_code};
