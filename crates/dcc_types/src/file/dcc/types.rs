//! Data type definitions shared by the DCC decoder and encoder.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::file::BitstreamError;
use crate::file::bitstream::{BitReader, BitWriter};

use super::constants::{FIELD_WIDTH_TABLE, STREAM_SIZE_BITS};

/// Axis-aligned rectangle in sprite space.
///
/// `right()` and `bottom()` are inclusive: a rectangle of width 1 has
/// `right() == left`. Edge arithmetic saturates at the `i32` limits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
	/// Leftmost column
	pub left: i32,
	/// Topmost row
	pub top: i32,
	/// Width in pixels
	pub width: i32,
	/// Height in pixels
	pub height: i32,
}

impl Rect {
	/// Creates a new rectangle.
	pub const fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
		Self {
			left,
			top,
			width,
			height,
		}
	}

	/// Last column covered by the rectangle.
	#[inline]
	pub const fn right(&self) -> i32 {
		self.left.saturating_add(self.width).saturating_sub(1)
	}

	/// Last row covered by the rectangle.
	#[inline]
	pub const fn bottom(&self) -> i32 {
		self.top.saturating_add(self.height).saturating_sub(1)
	}

	/// Number of pixels covered.
	#[inline]
	pub fn area(&self) -> usize {
		self.width.max(0) as usize * self.height.max(0) as usize
	}

	/// Smallest rectangle containing both `self` and `other`.
	pub fn union(&self, other: &Rect) -> Rect {
		let left = self.left.min(other.left);
		let top = self.top.min(other.top);
		let right = self.right().max(other.right());
		let bottom = self.bottom().max(other.bottom());
		Rect::new(
			left,
			top,
			right.saturating_sub(left).saturating_add(1),
			bottom.saturating_sub(top).saturating_add(1),
		)
	}

	/// Union of every rectangle yielded by `rects`, or `None` if it is empty.
	pub fn union_all<'a>(rects: impl IntoIterator<Item = &'a Rect>) -> Option<Rect> {
		rects.into_iter().fold(None, |acc: Option<Rect>, rect| match acc {
			Some(bounds) => Some(bounds.union(rect)),
			None => Some(*rect),
		})
	}

	/// This rectangle translated so that `origin`'s top-left corner is (0, 0).
	pub const fn relative_to(&self, origin: &Rect) -> Rect {
		Rect::new(
			self.left.saturating_sub(origin.left),
			self.top.saturating_sub(origin.top),
			self.width,
			self.height,
		)
	}
}

impl Display for Rect {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}x{} at ({}, {})", self.width, self.height, self.left, self.top)
	}
}

/// Two-bit compression flags of a direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompressionFlags(u8);

impl CompressionFlags {
	/// Encoding-type and raw-pixel-codes streams are present
	pub const RAW_PIXEL_CODES: u8 = 0x01;

	/// Equal-cells stream is present
	pub const EQUAL_CELLS: u8 = 0x02;

	/// Creates flags from the two low bits of `bits`.
	pub const fn new(bits: u8) -> Self {
		Self(bits & 0x03)
	}

	/// Flags with both streams enabled.
	pub const fn all() -> Self {
		Self(Self::RAW_PIXEL_CODES | Self::EQUAL_CELLS)
	}

	/// Raw flag bits.
	pub const fn bits(&self) -> u8 {
		self.0
	}

	/// Whether the equal-cells stream length is stored.
	pub const fn has_equal_cells(&self) -> bool {
		self.0 & Self::EQUAL_CELLS != 0
	}

	/// Whether the encoding-type and raw-pixel-codes stream lengths are stored.
	pub const fn has_raw_pixel_codes(&self) -> bool {
		self.0 & Self::RAW_PIXEL_CODES != 0
	}
}

impl Display for CompressionFlags {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"0b{:02b} (equal cells: {}, raw pixel codes: {})",
			self.0,
			self.has_equal_cells(),
			self.has_raw_pixel_codes()
		)
	}
}

/// Returns the 4-bit code selecting the narrowest table width holding `bits` bits.
pub fn width_code(bits: u32) -> u32 {
	FIELD_WIDTH_TABLE.iter().position(|&width| width >= bits).unwrap_or(FIELD_WIDTH_TABLE.len() - 1)
		as u32
}

/// Per-field bit widths of the frame headers of one direction.
///
/// Each width is stored in the file as a 4-bit code into
/// [`FIELD_WIDTH_TABLE`]; the values held here are already translated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldWidths {
	/// Leading field with no known meaning
	pub variable0: u32,
	/// Frame width
	pub width: u32,
	/// Frame height
	pub height: u32,
	/// Signed horizontal offset
	pub x_offset: u32,
	/// Signed vertical offset
	pub y_offset: u32,
	/// Optional data length
	pub optional_data: u32,
	/// Coded bytes length
	pub coded_bytes: u32,
}

impl FieldWidths {
	pub(crate) fn read(reader: &mut BitReader<'_>) -> Result<Self, BitstreamError> {
		let mut next = || -> Result<u32, BitstreamError> {
			let code = reader.read_bits(4)?;
			Ok(FIELD_WIDTH_TABLE[code as usize])
		};

		Ok(Self {
			variable0: next()?,
			width: next()?,
			height: next()?,
			x_offset: next()?,
			y_offset: next()?,
			optional_data: next()?,
			coded_bytes: next()?,
		})
	}

	/// Writes the seven width codes. Widths that are not table values are
	/// rounded up to the next one.
	pub(crate) fn write(&self, writer: &mut BitWriter) -> Result<(), BitstreamError> {
		for width in [
			self.variable0,
			self.width,
			self.height,
			self.x_offset,
			self.y_offset,
			self.optional_data,
			self.coded_bytes,
		] {
			writer.write_bits(width_code(width), 4)?;
		}
		Ok(())
	}
}

/// Declared bit lengths of the four length-delimited sub-streams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StreamSizes {
	/// Equal-cells stream
	pub equal_cells: usize,
	/// Pixel-mask stream
	pub pixel_mask: usize,
	/// Encoding-type stream
	pub encoding_type: usize,
	/// Raw-pixel-codes stream
	pub raw_pixel_codes: usize,
}

impl StreamSizes {
	pub(crate) fn read(
		reader: &mut BitReader<'_>,
		flags: CompressionFlags,
	) -> Result<Self, BitstreamError> {
		let mut sizes = Self::default();

		if flags.has_equal_cells() {
			sizes.equal_cells = reader.read_bits(STREAM_SIZE_BITS)? as usize;
		}

		sizes.pixel_mask = reader.read_bits(STREAM_SIZE_BITS)? as usize;

		if flags.has_raw_pixel_codes() {
			sizes.encoding_type = reader.read_bits(STREAM_SIZE_BITS)? as usize;
			sizes.raw_pixel_codes = reader.read_bits(STREAM_SIZE_BITS)? as usize;
		}

		Ok(sizes)
	}

	pub(crate) fn write(
		&self,
		writer: &mut BitWriter,
		flags: CompressionFlags,
	) -> Result<(), BitstreamError> {
		if flags.has_equal_cells() {
			writer.write_bits(self.equal_cells as u32, STREAM_SIZE_BITS)?;
		}

		writer.write_bits(self.pixel_mask as u32, STREAM_SIZE_BITS)?;

		if flags.has_raw_pixel_codes() {
			writer.write_bits(self.encoding_type as u32, STREAM_SIZE_BITS)?;
			writer.write_bits(self.raw_pixel_codes as u32, STREAM_SIZE_BITS)?;
		}
		Ok(())
	}

	/// Sum of all declared lengths.
	pub fn total(&self) -> usize {
		self.equal_cells + self.pixel_mask + self.encoding_type + self.raw_pixel_codes
	}
}

impl Display for StreamSizes {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"equal cells: {} bits, pixel mask: {} bits, encoding type: {} bits, raw pixel codes: {} bits",
			self.equal_cells, self.pixel_mask, self.encoding_type, self.raw_pixel_codes
		)
	}
}
