//! Frame materialization.
//!
//! Replays the cell walk of the pixel-buffer reconstruction and paints every
//! frame. A scratch grid the size of the direction box holds the most recent
//! pixels of each region, so cells declared equal can be copied from wherever
//! their direction cell was last painted.

use crate::file::BitstreamError;
use crate::file::bitstream::BitReader;

use super::cell::{Cell, CellLayout};
use super::pixel_buffer::{PixelBuffer, PixelBufferEntry};
use super::types::Rect;

/// Direction-sized pixel grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Canvas {
	pub(crate) stride: usize,
	pub(crate) pixels: Vec<u8>,
}

impl Canvas {
	pub(crate) fn new(bounds: &Rect) -> Self {
		Self {
			stride: bounds.width.max(0) as usize,
			pixels: vec![0; bounds.area()],
		}
	}

	#[inline]
	pub(crate) fn index(&self, cell: &Cell, x: usize, y: usize) -> usize {
		(cell.y + y) * self.stride + cell.x + x
	}

	pub(crate) fn fill(&mut self, cell: &Cell, value: u8) {
		for y in 0..cell.height {
			let start = self.index(cell, 0, y);
			self.pixels[start..start + cell.width].fill(value);
		}
	}

	/// Copies the region `from` onto `to` pixel by pixel, row-major.
	///
	/// The regions may overlap; pixels already rewritten by this copy are read
	/// back as rewritten.
	pub(crate) fn copy_cell(&mut self, from: &Cell, to: &Cell) {
		for y in 0..to.height {
			for x in 0..to.width {
				let source = self.index(from, x, y);
				let target = self.index(to, x, y);
				self.pixels[target] = self.pixels[source];
			}
		}
	}

	fn decode_cell(
		&mut self,
		cell: &Cell,
		entry: &PixelBufferEntry,
		pixel_codes: &mut BitReader<'_>,
	) -> Result<(), BitstreamError> {
		let values = entry.values;
		if values[0] == values[1] {
			self.fill(cell, values[0]);
			return Ok(());
		}

		let bits = if values[1] == values[2] { 1 } else { 2 };
		for y in 0..cell.height {
			for x in 0..cell.width {
				let code = pixel_codes.read_bits(bits)?;
				let index = self.index(cell, x, y);
				self.pixels[index] = values[code as usize];
			}
		}
		Ok(())
	}

	/// Returns `true` if every pixel of `cell` equals `value`.
	pub(crate) fn region_is(&self, cell: &Cell, value: u8) -> bool {
		(0..cell.height).all(|y| {
			let start = self.index(cell, 0, y);
			self.pixels[start..start + cell.width].iter().all(|&pixel| pixel == value)
		})
	}

	fn blit_into(&self, cell: &Cell, target: &mut [u8]) {
		for y in 0..cell.height {
			let start = self.index(cell, 0, y);
			target[start..start + cell.width].copy_from_slice(&self.pixels[start..start + cell.width]);
		}
	}
}

/// Paints every frame of a direction.
///
/// Returns one direction-sized grid per frame. Pixel codes are read from
/// `pixel_codes`, which must be positioned right after the displacement codes
/// consumed by the reconstruction.
pub(crate) fn materialize(
	bounds: &Rect,
	layout: &CellLayout,
	buffer: PixelBuffer,
	pixel_codes: &mut BitReader<'_>,
) -> Result<Vec<Vec<u8>>, BitstreamError> {
	let columns = layout.direction().columns();
	let mut scratch = Canvas::new(bounds);
	let mut last_painted: Vec<Option<Cell>> = vec![None; layout.direction().len()];
	let mut entries = buffer.into_entries().into_iter().peekable();
	let mut grids = Vec::with_capacity(layout.frames().len());

	for (frame, grid) in layout.frames().iter().enumerate() {
		let mut pixels = vec![0u8; scratch.pixels.len()];

		for (frame_cell, cell) in grid.cells().iter().enumerate() {
			let slot = cell.direction_index(columns);

			match entries.next_if(|entry| entry.is_for(frame, frame_cell)) {
				Some(entry) => {
					scratch.decode_cell(cell, &entry, pixel_codes)?;
					scratch.blit_into(cell, &mut pixels);
				}
				None => match last_painted[slot] {
					Some(previous) if previous.same_size(cell) => {
						scratch.copy_cell(&previous, cell);
						scratch.blit_into(cell, &mut pixels);
					}
					_ => scratch.fill(cell, 0),
				},
			}

			last_painted[slot] = Some(*cell);
		}

		grids.push(pixels);
	}

	Ok(grids)
}
