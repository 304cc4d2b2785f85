//! Direction decoding.
//!
//! A direction is a self-contained bitstream: a header with compression flags
//! and field widths, one header per frame, the lengths of four sub-streams, a
//! palette-index table and finally the sub-streams themselves, followed by the
//! shared pixel code stream whose length is only known once it has been read.

use std::fmt;

use log::debug;

use crate::file::bitstream::BitReader;
use crate::file::{BitstreamError, DccError, Stream};

use super::cell::CellLayout;
use super::constants::{MAX_DIMENSION, PALETTE_ENTRIES};
use super::frame::{Frame, FrameHeader};
use super::materialize::materialize;
use super::pixel_buffer::PixelBuffer;
use super::types::{CompressionFlags, FieldWidths, Rect, StreamSizes};

/// Independent cursors over the sub-streams of a direction.
#[derive(Debug, Clone)]
pub(crate) struct SubStreams<'a> {
	pub(crate) sizes: StreamSizes,
	pub(crate) equal_cells: BitReader<'a>,
	pub(crate) pixel_mask: BitReader<'a>,
	pub(crate) encoding_type: BitReader<'a>,
	pub(crate) raw_pixel_codes: BitReader<'a>,
	pub(crate) pixel_codes: BitReader<'a>,
}

impl<'a> SubStreams<'a> {
	/// Forks one cursor per sub-stream, skipping `reader` over each declared
	/// length in turn. The last cursor starts where the four sized streams end.
	pub(crate) fn carve(reader: &mut BitReader<'a>, sizes: StreamSizes) -> Result<Self, BitstreamError> {
		let equal_cells = reader.fork();
		reader.skip_bits(sizes.equal_cells)?;
		let pixel_mask = reader.fork();
		reader.skip_bits(sizes.pixel_mask)?;
		let encoding_type = reader.fork();
		reader.skip_bits(sizes.encoding_type)?;
		let raw_pixel_codes = reader.fork();
		reader.skip_bits(sizes.raw_pixel_codes)?;
		let pixel_codes = reader.fork();

		Ok(Self {
			sizes,
			equal_cells,
			pixel_mask,
			encoding_type,
			raw_pixel_codes,
			pixel_codes,
		})
	}

	/// Checks that each sized stream was consumed exactly.
	pub(crate) fn verify(&self, direction: usize) -> Result<(), DccError> {
		let checks = [
			(Stream::EqualCells, self.sizes.equal_cells, &self.equal_cells),
			(Stream::PixelMask, self.sizes.pixel_mask, &self.pixel_mask),
			(Stream::EncodingType, self.sizes.encoding_type, &self.encoding_type),
			(Stream::RawPixelCodes, self.sizes.raw_pixel_codes, &self.raw_pixel_codes),
		];

		for (stream, expected, reader) in checks {
			if reader.bits_read() != expected {
				return Err(DccError::StreamMismatch {
					direction,
					stream,
					expected,
					actual: reader.bits_read(),
				});
			}
		}
		Ok(())
	}
}

/// A decoded direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Direction {
	index: usize,
	out_size_coded: u32,
	compression: CompressionFlags,
	field_widths: FieldWidths,
	stream_sizes: StreamSizes,
	palette_indices: Vec<u8>,
	bounds: Rect,
	cell_columns: usize,
	cell_rows: usize,
	pixel_code_bits: usize,
	frames: Vec<Frame>,
}

impl Direction {
	/// Decodes the direction starting at the cursor of `reader`.
	///
	/// On success `reader` is left right after the direction's last bit.
	///
	/// # Arguments
	///
	/// * `reader` - Cursor positioned at the start of the direction
	/// * `frames_per_direction` - Frame count from the file header
	/// * `index` - Logical direction index, used in error reports
	pub fn decode(
		reader: &mut BitReader<'_>,
		frames_per_direction: usize,
		index: usize,
	) -> Result<Self, DccError> {
		Self::decode_inner(reader, frames_per_direction, index).map_err(|err| err.in_direction(index))
	}

	fn decode_inner(
		reader: &mut BitReader<'_>,
		frames_per_direction: usize,
		index: usize,
	) -> Result<Self, DccError> {
		let out_size_coded = reader.read_u32()?;
		let compression = CompressionFlags::new(reader.read_bits(2)? as u8);
		let field_widths = FieldWidths::read(reader)?;

		// every frame header takes at least its bottom-up bit
		let mut headers = Vec::with_capacity(frames_per_direction.min(reader.remaining_bits()));
		for frame in 0..frames_per_direction {
			let header = FrameHeader::read(reader, &field_widths)?;
			if header.bottom_up {
				return Err(DccError::BottomUpFrame {
					direction: index,
					frame,
				});
			}
			headers.push(header);
		}

		let frame_bounds = headers
			.iter()
			.map(|header| {
				header.bounds().ok_or(DccError::DimensionTooLarge {
					direction: index,
					width: i64::from(header.width),
					height: i64::from(header.height),
				})
			})
			.collect::<Result<Vec<_>, _>>()?;
		let bounds = direction_bounds(&frame_bounds, index)?;

		if field_widths.optional_data > 0 {
			return Err(DccError::OptionalDataUnsupported {
				direction: index,
				bits: field_widths.optional_data,
			});
		}

		let stream_sizes = StreamSizes::read(reader, compression)?;

		let mut palette = [0u8; PALETTE_ENTRIES];
		let mut palette_len = 0;
		for value in 0..PALETTE_ENTRIES {
			if reader.read_bit()? == 1 {
				palette[palette_len] = value as u8;
				palette_len += 1;
			}
		}

		let layout = CellLayout::new(&bounds, frame_bounds.iter());
		if let Some(frame) = layout.frame_outside_grid() {
			return Err(DccError::FrameOutsideBox {
				direction: index,
				frame,
			});
		}
		debug!(
			"direction {index}: box {bounds}, {}x{} cells, flags {compression}, {stream_sizes}",
			layout.direction().columns(),
			layout.direction().rows()
		);

		let mut streams = SubStreams::carve(reader, stream_sizes)?;
		let buffer = PixelBuffer::reconstruct(&layout, &mut streams, &palette)?;
		debug!("direction {index}: {} pixel buffer entries", buffer.len());

		let grids = materialize(&bounds, &layout, buffer, &mut streams.pixel_codes)?;
		streams.verify(index)?;

		let pixel_code_bits = streams.pixel_codes.bits_read();
		reader.skip_bits(pixel_code_bits)?;

		let frames = headers
			.into_iter()
			.zip(frame_bounds)
			.zip(grids)
			.map(|((header, frame_box), pixels)| Frame::new(header, frame_box, bounds, pixels))
			.collect();

		Ok(Self {
			index,
			out_size_coded,
			compression,
			field_widths,
			stream_sizes,
			palette_indices: palette[..palette_len].to_vec(),
			bounds,
			cell_columns: layout.direction().columns(),
			cell_rows: layout.direction().rows(),
			pixel_code_bits,
			frames,
		})
	}

	/// Logical direction index.
	#[inline]
	pub fn index(&self) -> usize {
		self.index
	}

	/// Coded size stored in the direction header.
	#[inline]
	pub fn out_size_coded(&self) -> u32 {
		self.out_size_coded
	}

	/// Compression flags.
	#[inline]
	pub fn compression(&self) -> CompressionFlags {
		self.compression
	}

	/// Bit widths of the frame header fields.
	#[inline]
	pub fn field_widths(&self) -> &FieldWidths {
		&self.field_widths
	}

	/// Declared sub-stream lengths.
	#[inline]
	pub fn stream_sizes(&self) -> &StreamSizes {
		&self.stream_sizes
	}

	/// Bits consumed from the shared pixel code stream.
	#[inline]
	pub fn pixel_code_bits(&self) -> usize {
		self.pixel_code_bits
	}

	/// Palette indices flagged valid, in ascending order.
	///
	/// Raw decoded value `k` stands for `palette_indices()[k]`.
	#[inline]
	pub fn palette_indices(&self) -> &[u8] {
		&self.palette_indices
	}

	/// Bounding box of all frames, in sprite space.
	#[inline]
	pub fn bounds(&self) -> Rect {
		self.bounds
	}

	/// Number of cell columns of the direction grid.
	#[inline]
	pub fn cell_columns(&self) -> usize {
		self.cell_columns
	}

	/// Number of cell rows of the direction grid.
	#[inline]
	pub fn cell_rows(&self) -> usize {
		self.cell_rows
	}

	/// Decoded frames.
	#[inline]
	pub fn frames(&self) -> &[Frame] {
		&self.frames
	}

	/// Gets a frame by index.
	#[inline]
	pub fn frame(&self, index: usize) -> Option<&Frame> {
		self.frames.get(index)
	}

	/// Number of frames.
	#[inline]
	pub fn frame_count(&self) -> usize {
		self.frames.len()
	}

	/// Largest frame width and height in this direction.
	pub fn frame_bounds(&self) -> (u32, u32) {
		self.frames
			.iter()
			.fold((0, 0), |(width, height), frame| (width.max(frame.width()), height.max(frame.height())))
	}
}

impl fmt::Display for Direction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "Direction {}:", self.index)?;
		writeln!(f, "  Box: {}", self.bounds)?;
		writeln!(f, "  Cells: {}x{}", self.cell_columns, self.cell_rows)?;
		writeln!(f, "  Compression: {}", self.compression)?;
		writeln!(f, "  Streams: {}", self.stream_sizes)?;
		writeln!(f, "  Pixel codes: {} bits", self.pixel_code_bits)?;
		writeln!(f, "  Palette entries: {}", self.palette_indices.len())?;
		write!(f, "  Frames: {}", self.frames.len())
	}
}

/// Union of the frame rectangles, rejecting boxes larger than the decoder accepts.
pub(crate) fn direction_bounds(frames: &[Rect], direction: usize) -> Result<Rect, DccError> {
	let Some(first) = frames.first() else {
		return Ok(Rect::default());
	};

	let mut left = i64::from(first.left);
	let mut top = i64::from(first.top);
	let mut right = left + i64::from(first.width) - 1;
	let mut bottom = top + i64::from(first.height) - 1;
	for frame in &frames[1..] {
		left = left.min(i64::from(frame.left));
		top = top.min(i64::from(frame.top));
		right = right.max(i64::from(frame.left) + i64::from(frame.width) - 1);
		bottom = bottom.max(i64::from(frame.top) + i64::from(frame.height) - 1);
	}

	let width = right - left + 1;
	let height = bottom - top + 1;
	if width > MAX_DIMENSION || height > MAX_DIMENSION {
		return Err(DccError::DimensionTooLarge {
			direction,
			width,
			height,
		});
	}

	Ok(Rect::new(left as i32, top as i32, width as i32, height as i32))
}
