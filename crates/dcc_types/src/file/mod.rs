//! File format support for `dcc-rs` project.

mod error;
mod palette;

/// Bit-granular reader and writer
pub mod bitstream;

pub mod dcc;

pub use error::{BitstreamError, DccError, ErrorKind, Stream};
pub use palette::{Color, Palette};

pub use dcc::{
	CompressionFlags, Direction as DccDirection, DirectionBuilder as DccDirectionBuilder, File as DccFile,
	FileBuilder as DccFileBuilder, Frame as DccFrame, Header as DccHeader, Layout as DccLayout, Rect,
	SourceFrame,
};
