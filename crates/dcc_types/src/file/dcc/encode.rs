//! DCC encoding.
//!
//! Builds DCC files from palette-index frames. Every cell that carries new
//! data uses a full pixel mask, so one cell holds at most four distinct
//! indices, 0 included. Cells that repeat what their direction cell last
//! showed are coded through the equal-cells stream when the direction enables
//! it.
//!
//! # Examples
//!
//! ```
//! use dcc_types::file::dcc::{DirectionBuilder, FileBuilder, SourceFrame};
//! use dcc_types::file::DccFile;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let frame = SourceFrame::new(4, 4, 0, 3, vec![7; 16])?;
//! let mut builder = FileBuilder::new(1)?;
//! builder.set_direction(0, DirectionBuilder::new().with_frame(frame))?;
//!
//! let dcc = DccFile::from_bytes(&builder.build()?)?;
//! assert_eq!(dcc.direction(0)?.frames()[0].cropped_pixels(), vec![7; 16]);
//! # Ok(())
//! # }
//! ```

use log::debug;

use crate::file::bitstream::{BitWriter, signed_width, unsigned_width};
use crate::file::{DccError, Stream};

use super::cell::{Cell, CellLayout};
use super::constants::{
	DEFAULT_VERSION, DIRECTION_OFFSET_SIZE, FIELD_WIDTH_TABLE, HEADER_SIZE, MAX_STREAM_BITS,
	PALETTE_ENTRIES, direction_order,
};
use super::direction::direction_bounds;
use super::file::{File, Header};
use super::frame::{Frame, FrameHeader};
use super::materialize::Canvas;
use super::types::{CompressionFlags, FieldWidths, StreamSizes, width_code};

/// Cells whose largest index reaches this value use raw pixel codes when the
/// direction allows them.
const RAW_CODE_THRESHOLD: u8 = 64;

/// Narrowest table width holding `bits` bits.
fn fitted_width(bits: u32) -> u32 {
	FIELD_WIDTH_TABLE[width_code(bits) as usize]
}

/// A frame to encode: palette indices of its own rectangle, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFrame {
	header: FrameHeader,
	pixels: Vec<u8>,
}

impl SourceFrame {
	/// Creates a frame of `width × height` pixels whose bottom-left corner is
	/// at (`x_offset`, `y_offset`).
	pub fn new(
		width: u32,
		height: u32,
		x_offset: i32,
		y_offset: i32,
		pixels: Vec<u8>,
	) -> Result<Self, DccError> {
		let expected = (width as usize).checked_mul(height as usize);
		if expected != Some(pixels.len()) {
			return Err(DccError::InvalidFrame {
				width,
				height,
				expected: expected.unwrap_or(usize::MAX),
				actual: pixels.len(),
			});
		}

		Ok(Self {
			header: FrameHeader {
				width,
				height,
				x_offset,
				y_offset,
				..Default::default()
			},
			pixels,
		})
	}

	/// Takes the placement and cropped pixels of a decoded frame.
	pub fn from_frame(frame: &Frame) -> Self {
		Self {
			header: FrameHeader {
				variable0: frame.header().variable0,
				width: frame.width(),
				height: frame.height(),
				x_offset: frame.x_offset(),
				y_offset: frame.y_offset(),
				..Default::default()
			},
			pixels: frame.cropped_pixels(),
		}
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

	/// Palette indices, row-major.
	#[inline]
	pub fn pixels(&self) -> &[u8] {
		&self.pixels
	}
}

/// Bits produced for the sub-streams of one direction.
#[derive(Debug, Default)]
struct StreamWriters {
	equal_cells: BitWriter,
	pixel_mask: BitWriter,
	encoding_type: BitWriter,
	raw_pixel_codes: BitWriter,
	displacements: BitWriter,
	pixel_codes: BitWriter,
}

impl StreamWriters {
	fn sizes(&self) -> Result<StreamSizes, DccError> {
		let checked = |stream: Stream, writer: &BitWriter| {
			let bits = writer.len_bits();
			if bits > MAX_STREAM_BITS {
				return Err(DccError::StreamTooLarge {
					stream,
					bits,
				});
			}
			Ok(bits)
		};

		Ok(StreamSizes {
			equal_cells: checked(Stream::EqualCells, &self.equal_cells)?,
			pixel_mask: checked(Stream::PixelMask, &self.pixel_mask)?,
			encoding_type: checked(Stream::EncodingType, &self.encoding_type)?,
			raw_pixel_codes: checked(Stream::RawPixelCodes, &self.raw_pixel_codes)?,
		})
	}
}

/// Frames and compression settings of one direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectionBuilder {
	frames: Vec<SourceFrame>,
	compression: CompressionFlags,
}

impl DirectionBuilder {
	/// Creates an empty direction with no compression flags set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the compression flags.
	pub fn with_compression(mut self, compression: CompressionFlags) -> Self {
		self.compression = compression;
		self
	}

	/// Appends a frame.
	pub fn with_frame(mut self, frame: SourceFrame) -> Self {
		self.frames.push(frame);
		self
	}

	/// Appends a frame.
	pub fn push_frame(&mut self, frame: SourceFrame) {
		self.frames.push(frame);
	}

	/// Frames added so far.
	#[inline]
	pub fn frames(&self) -> &[SourceFrame] {
		&self.frames
	}

	/// Compression flags.
	#[inline]
	pub fn compression(&self) -> CompressionFlags {
		self.compression
	}

	/// Encodes the direction into a byte-aligned bitstream.
	///
	/// `index` is the logical direction index, used in error reports.
	pub fn encode(&self, index: usize) -> Result<Vec<u8>, DccError> {
		self.encode_with(index, self.compression)
	}

	fn encode_with(&self, index: usize, compression: CompressionFlags) -> Result<Vec<u8>, DccError> {
		let headers: Vec<FrameHeader> = self.frames.iter().map(|frame| frame.header).collect();
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
		let layout = CellLayout::new(&bounds, frame_bounds.iter());
		if let Some(frame) = layout.frame_outside_grid() {
			return Err(DccError::FrameOutsideBox {
				direction: index,
				frame,
			});
		}

		// raw value k stands for the k-th used index; 0 always maps to itself
		let mut used = [false; PALETTE_ENTRIES];
		used[0] = true;
		for frame in &self.frames {
			for &pixel in &frame.pixels {
				used[pixel as usize] = true;
			}
		}
		let mut rank = [0u8; PALETTE_ENTRIES];
		for (next, (value, _)) in used.iter().enumerate().filter(|(_, flag)| **flag).enumerate() {
			rank[value] = next as u8;
		}

		let targets: Vec<Canvas> = self
			.frames
			.iter()
			.zip(&frame_bounds)
			.map(|(frame, frame_box)| {
				let mut canvas = Canvas::new(&bounds);
				let origin = frame_box.relative_to(&bounds);
				let width = frame.header.width as usize;
				for (row, line) in frame.pixels.chunks(width.max(1)).enumerate() {
					let start = (origin.top as usize + row) * canvas.stride + origin.left as usize;
					for (target, &pixel) in canvas.pixels[start..start + line.len()].iter_mut().zip(line) {
						*target = rank[pixel as usize];
					}
				}
				canvas
			})
			.collect();

		let mut streams = StreamWriters::default();
		let mut scratch = Canvas::new(&bounds);
		let columns = layout.direction().columns();
		let mut last_painted: Vec<Option<Cell>> = vec![None; layout.direction().len()];

		for (frame, (grid, target)) in layout.frames().iter().zip(&targets).enumerate() {
			for (frame_cell, cell) in grid.cells().iter().enumerate() {
				let slot = cell.direction_index(columns);

				if let Some(previous) = last_painted[slot] {
					if compression.has_equal_cells() {
						if repeats(&scratch, &previous, cell, target) {
							streams.equal_cells.write_bit(true);
							if previous.same_size(cell) {
								scratch.copy_cell(&previous, cell);
							} else {
								scratch.fill(cell, 0);
							}
							last_painted[slot] = Some(*cell);
							continue;
						}
						streams.equal_cells.write_bit(false);
					}
					streams.pixel_mask.write_bits(0x0F, 4)?;
				}

				encode_cell(&mut streams, &mut scratch, target, cell, compression)
					.map_err(|err| err.at_cell(frame, frame_cell))?;
				last_painted[slot] = Some(*cell);
			}
		}

		let stream_sizes = streams.sizes()?;
		let field_widths = FieldWidths {
			variable0: fitted_width(headers.iter().map(|h| unsigned_width(h.variable0)).max().unwrap_or(0)),
			width: fitted_width(headers.iter().map(|h| unsigned_width(h.width)).max().unwrap_or(0)),
			height: fitted_width(headers.iter().map(|h| unsigned_width(h.height)).max().unwrap_or(0)),
			x_offset: fitted_width(headers.iter().map(|h| signed_width(h.x_offset)).max().unwrap_or(0)),
			y_offset: fitted_width(headers.iter().map(|h| signed_width(h.y_offset)).max().unwrap_or(0)),
			optional_data: 0,
			coded_bytes: 0,
		};

		let mut writer = BitWriter::new();
		// patched with the final size below
		writer.write_u32(0);
		writer.write_bits(u32::from(compression.bits()), 2)?;
		field_widths.write(&mut writer)?;
		for header in &headers {
			header.write(&mut writer, &field_widths)?;
		}
		stream_sizes.write(&mut writer, compression)?;
		for &valid in &used {
			writer.write_bit(valid);
		}

		writer.append(&streams.equal_cells);
		writer.append(&streams.pixel_mask);
		writer.append(&streams.encoding_type);
		writer.append(&streams.raw_pixel_codes);
		writer.append(&streams.displacements);
		writer.append(&streams.pixel_codes);
		writer.align_to_byte();

		let mut bytes = writer.into_bytes();
		let size = bytes.len() as u32;
		bytes[..4].copy_from_slice(&size.to_le_bytes());

		debug!(
			"encoded direction {index}: {} frames, box {bounds}, {size} bytes, {stream_sizes}",
			self.frames.len()
		);

		Ok(bytes)
	}
}

/// Whether an equal-cell decision reproduces `target` in `cell`.
///
/// A same-size repeat copies the region last painted; overlapping copies are
/// never chosen since their result depends on the copy order.
fn repeats(scratch: &Canvas, previous: &Cell, cell: &Cell, target: &Canvas) -> bool {
	if !previous.same_size(cell) {
		return target.region_is(cell, 0);
	}
	if previous != cell && previous.overlaps(cell) {
		return false;
	}

	(0..cell.height).all(|y| {
		(0..cell.width)
			.all(|x| scratch.pixels[scratch.index(previous, x, y)] == target.pixels[target.index(cell, x, y)])
	})
}

/// Writes the color stack and pixel codes of a new cell and paints it.
fn encode_cell(
	streams: &mut StreamWriters,
	scratch: &mut Canvas,
	target: &Canvas,
	cell: &Cell,
	compression: CompressionFlags,
) -> Result<(), DccError> {
	let mut present = [false; PALETTE_ENTRIES];
	for y in 0..cell.height {
		for x in 0..cell.width {
			present[target.pixels[target.index(cell, x, y)] as usize] = true;
		}
	}

	let has_zero = present[0];
	let colors: Vec<u8> = (1..PALETTE_ENTRIES).filter(|&value| present[value]).map(|value| value as u8).collect();
	if colors.len() > 4 || (colors.len() == 4 && has_zero) {
		return Err(DccError::TooManyColors {
			frame: 0,
			cell: 0,
			colors: colors.len() + usize::from(has_zero),
		});
	}

	// a repeated value ends a stack shorter than four
	let terminated = colors.len() < 4;
	let largest = colors.last().copied().unwrap_or(0);
	let raw = compression.has_raw_pixel_codes() && largest >= RAW_CODE_THRESHOLD;
	if compression.has_raw_pixel_codes() {
		streams.encoding_type.write_bit(raw);
	}

	if raw {
		for &color in &colors {
			streams.raw_pixel_codes.write_u8(color);
		}
		if terminated {
			streams.raw_pixel_codes.write_u8(largest);
		}
	} else {
		let mut last = 0u8;
		for &color in &colors {
			let mut displacement = color - last;
			while displacement >= 15 {
				streams.displacements.write_bits(15, 4)?;
				displacement -= 15;
			}
			streams.displacements.write_bits(u32::from(displacement), 4)?;
			last = color;
		}
		if terminated {
			streams.displacements.write_bits(0, 4)?;
		}
	}

	// highest index in slot 0, unfilled slots hold 0
	let mut values = [0u8; 4];
	for (slot, &color) in values.iter_mut().zip(colors.iter().rev()) {
		*slot = color;
	}

	if values[0] == values[1] {
		scratch.fill(cell, values[0]);
		return Ok(());
	}

	let bits = if values[1] == values[2] { 1 } else { 2 };
	for y in 0..cell.height {
		for x in 0..cell.width {
			let color = target.pixels[target.index(cell, x, y)];
			let code = values.iter().position(|&value| value == color).unwrap_or(0);
			streams.pixel_codes.write_bits(code as u32, bits)?;

			let index = scratch.index(cell, x, y);
			scratch.pixels[index] = color;
		}
	}
	Ok(())
}

/// Assembles a complete DCC file from per-direction builders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBuilder {
	version: u8,
	compression: Option<CompressionFlags>,
	directions: Vec<DirectionBuilder>,
}

impl FileBuilder {
	/// Creates a builder for `direction_count` empty directions.
	pub fn new(direction_count: u8) -> Result<Self, DccError> {
		let order = direction_order(direction_count).ok_or(DccError::UnsupportedDirectionCount(direction_count))?;

		Ok(Self {
			version: DEFAULT_VERSION,
			compression: None,
			directions: vec![DirectionBuilder::new(); order.len()],
		})
	}

	/// Creates a builder holding the frames of a decoded file.
	pub fn from_file(file: &File) -> Self {
		let directions = file
			.iter()
			.map(|direction| DirectionBuilder {
				frames: direction.frames().iter().map(SourceFrame::from_frame).collect(),
				compression: direction.compression(),
			})
			.collect();

		Self {
			version: file.version(),
			compression: None,
			directions,
		}
	}

	/// Sets the version byte.
	pub fn with_version(mut self, version: u8) -> Self {
		self.version = version;
		self
	}

	/// Uses `compression` for every direction, overriding their own flags.
	pub fn with_compression(mut self, compression: CompressionFlags) -> Self {
		self.compression = Some(compression);
		self
	}

	/// Replaces a logical direction.
	pub fn set_direction(&mut self, index: usize, direction: DirectionBuilder) -> Result<&mut Self, DccError> {
		let count = self.directions.len();
		let slot = self.directions.get_mut(index).ok_or(DccError::DirectionOutOfRange {
			index,
			count,
		})?;
		*slot = direction;
		Ok(self)
	}

	/// Gets a logical direction for modification.
	pub fn direction_mut(&mut self, index: usize) -> Option<&mut DirectionBuilder> {
		self.directions.get_mut(index)
	}

	/// Encodes the file.
	///
	/// Every direction must hold the same number of frames.
	pub fn build(&self) -> Result<Vec<u8>, DccError> {
		let direction_count = self.directions.len() as u8;
		let order =
			direction_order(direction_count).ok_or(DccError::UnsupportedDirectionCount(direction_count))?;

		let frames_per_direction = self.directions.first().map_or(0, |direction| direction.frames.len());
		for (index, direction) in self.directions.iter().enumerate() {
			if direction.frames.len() != frames_per_direction {
				return Err(DccError::FrameCountMismatch {
					direction: index,
					expected: frames_per_direction,
					actual: direction.frames.len(),
				});
			}
		}

		let mut header = Header {
			version: self.version,
			direction_count,
			frames_per_direction: frames_per_direction as u32,
			total_size_coded: 0,
		};
		let table_end = header.table_end();
		let mut data = vec![0u8; table_end];

		for (storage, &logical) in order.iter().enumerate() {
			let direction = &self.directions[logical as usize];
			let compression = self.compression.unwrap_or(direction.compression);
			let bytes = direction.encode_with(logical as usize, compression)?;

			let offset = data.len() as u32;
			let entry = HEADER_SIZE + storage * DIRECTION_OFFSET_SIZE;
			data[entry..entry + DIRECTION_OFFSET_SIZE].copy_from_slice(&offset.to_le_bytes());
			data.extend_from_slice(&bytes);
		}

		header.total_size_coded = (data.len() - table_end) as u32;
		data[..HEADER_SIZE].copy_from_slice(&header.to_bytes());
		Ok(data)
	}
}
