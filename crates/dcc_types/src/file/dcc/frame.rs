//! DCC frame headers and decoded frames.

use std::fmt;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::file::bitstream::{BitReader, BitWriter};
use crate::file::{BitstreamError, Palette};

use super::constants::MAX_DIMENSION;
use super::types::{FieldWidths, Rect};

/// Per-frame header stored at the start of a direction.
///
/// The offsets anchor the frame at its bottom-left corner: the frame covers
/// rows `y_offset - height + 1` through `y_offset`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameHeader {
	/// Leading field with no known meaning
	pub variable0: u32,

	/// Frame width in pixels
	pub width: u32,

	/// Frame height in pixels
	pub height: u32,

	/// Left edge of the frame
	pub x_offset: i32,

	/// Bottom edge of the frame
	pub y_offset: i32,

	/// Length of the optional trailing data in bytes
	pub optional_bytes: u32,

	/// Coded size of the frame in bytes
	pub coded_bytes: u32,

	/// Frame rows are stored bottom-up
	pub bottom_up: bool,
}

impl FrameHeader {
	pub(crate) fn read(reader: &mut BitReader<'_>, widths: &FieldWidths) -> Result<Self, BitstreamError> {
		let header = Self {
			variable0: reader.read_bits(widths.variable0)?,
			width: reader.read_bits(widths.width)?,
			height: reader.read_bits(widths.height)?,
			x_offset: reader.read_signed_bits(widths.x_offset)?,
			y_offset: reader.read_signed_bits(widths.y_offset)?,
			optional_bytes: reader.read_bits(widths.optional_data)?,
			coded_bytes: reader.read_bits(widths.coded_bytes)?,
			bottom_up: reader.read_bit()? == 1,
		};

		trace!(
			"frame header: {}x{} at ({}, {}), {} coded bytes",
			header.width, header.height, header.x_offset, header.y_offset, header.coded_bytes
		);

		Ok(header)
	}

	pub(crate) fn write(&self, writer: &mut BitWriter, widths: &FieldWidths) -> Result<(), BitstreamError> {
		writer.write_bits(self.variable0, widths.variable0)?;
		writer.write_bits(self.width, widths.width)?;
		writer.write_bits(self.height, widths.height)?;
		writer.write_signed_bits(self.x_offset, widths.x_offset)?;
		writer.write_signed_bits(self.y_offset, widths.y_offset)?;
		writer.write_bits(self.optional_bytes, widths.optional_data)?;
		writer.write_bits(self.coded_bytes, widths.coded_bytes)?;
		writer.write_bit(self.bottom_up);
		Ok(())
	}

	/// Frame rectangle in sprite space, or `None` if it is too large to decode.
	pub fn bounds(&self) -> Option<Rect> {
		let width = i64::from(self.width);
		let height = i64::from(self.height);
		if width > MAX_DIMENSION || height > MAX_DIMENSION {
			return None;
		}

		let top = i64::from(self.y_offset) - height + 1;
		Some(Rect::new(self.x_offset, i32::try_from(top).ok()?, width as i32, height as i32))
	}
}

/// A decoded frame.
///
/// The pixel grid has the size of the direction's bounding box, so every frame
/// of a direction can be drawn at the same origin. Pixels outside the frame's
/// own rectangle are 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
	header: FrameHeader,
	bounds: Rect,
	direction_bounds: Rect,
	pixels: Vec<u8>,
}

impl Frame {
	pub(crate) fn new(header: FrameHeader, bounds: Rect, direction_bounds: Rect, pixels: Vec<u8>) -> Self {
		Self {
			header,
			bounds,
			direction_bounds,
			pixels,
		}
	}

	/// Header this frame was decoded from.
	#[inline]
	pub fn header(&self) -> &FrameHeader {
		&self.header
	}

	/// Frame width in pixels.
	#[inline]
	pub fn width(&self) -> u32 {
		self.header.width
	}

	/// Frame height in pixels.
	#[inline]
	pub fn height(&self) -> u32 {
		self.header.height
	}

	/// Left edge of the frame in sprite space.
	#[inline]
	pub fn x_offset(&self) -> i32 {
		self.header.x_offset
	}

	/// Bottom edge of the frame in sprite space.
	#[inline]
	pub fn y_offset(&self) -> i32 {
		self.header.y_offset
	}

	/// Frame rectangle in sprite space.
	#[inline]
	pub fn bounds(&self) -> Rect {
		self.bounds
	}

	/// Frame rectangle relative to the top-left corner of the direction box.
	#[inline]
	pub fn box_in_direction(&self) -> Rect {
		self.bounds.relative_to(&self.direction_bounds)
	}

	/// Width of the pixel grid (the direction box width).
	#[inline]
	pub fn stride(&self) -> usize {
		self.direction_bounds.width.max(0) as usize
	}

	/// Palette indices of the whole direction box, row-major.
	#[inline]
	pub fn pixels(&self) -> &[u8] {
		&self.pixels
	}

	/// Palette index at (`x`, `y`) within the frame rectangle.
	pub fn pixel(&self, x: u32, y: u32) -> Option<u8> {
		if x >= self.header.width || y >= self.header.height {
			return None;
		}

		let origin = self.box_in_direction();
		let column = origin.left as usize + x as usize;
		let row = origin.top as usize + y as usize;
		self.pixels.get(row * self.stride() + column).copied()
	}

	/// Palette indices of the frame rectangle only, row-major.
	pub fn cropped_pixels(&self) -> Vec<u8> {
		let origin = self.box_in_direction();
		let width = self.header.width as usize;
		let stride = self.stride();

		let mut cropped = Vec::with_capacity(width * self.header.height as usize);
		for row in 0..self.header.height as usize {
			let start = (origin.top as usize + row) * stride + origin.left as usize;
			cropped.extend_from_slice(&self.pixels[start..start + width]);
		}
		cropped
	}

	/// Converts the frame rectangle to RGBA bytes.
	///
	/// Index 0 is transparent; every other index takes its palette color.
	pub fn to_rgba(&self, palette: &Palette) -> Vec<u8> {
		palette.to_rgba(&self.cropped_pixels())
	}
}

impl fmt::Display for Frame {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}×{} at ({}, {})", self.width(), self.height(), self.x_offset(), self.y_offset())
	}
}
