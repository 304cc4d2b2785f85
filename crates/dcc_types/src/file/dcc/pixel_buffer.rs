//! Pixel-buffer reconstruction.
//!
//! Walks every frame cell in decode order and rebuilds the four-color stack of
//! each cell that carries new data. A direction-grid cell that already has an
//! occupant may be declared equal to it (no entry is produced), or may replace
//! only some of the occupant's colors through a 4-bit pixel mask.

use crate::file::BitstreamError;

use super::cell::CellLayout;
use super::constants::{PALETTE_ENTRIES, PIXEL_MASK_LOOKUP};
use super::direction::SubStreams;

/// Color stack of one frame cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PixelBufferEntry {
	/// Up to four palette indices; pixel codes select among them
	pub values: [u8; 4],

	/// Frame that produced the entry
	pub frame: usize,

	/// Cell index within that frame's grid
	pub frame_cell: usize,
}

impl PixelBufferEntry {
	#[inline]
	pub(crate) fn is_for(&self, frame: usize, frame_cell: usize) -> bool {
		self.frame == frame && self.frame_cell == frame_cell
	}
}

/// Entries produced for one direction, in decode order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PixelBuffer {
	entries: Vec<PixelBufferEntry>,
}

impl PixelBuffer {
	/// Rebuilds the pixel buffer of a direction.
	///
	/// Reads the equal-cells, pixel-mask, encoding-type and raw-pixel-codes
	/// streams, plus the displacement codes at the head of the shared pixel
	/// code stream. Every resolved value is finally remapped through
	/// `palette`, the direction's palette-index table.
	pub(crate) fn reconstruct(
		layout: &CellLayout,
		streams: &mut SubStreams<'_>,
		palette: &[u8; PALETTE_ENTRIES],
	) -> Result<Self, BitstreamError> {
		let columns = layout.direction().columns();
		let has_equal_cells = streams.sizes.equal_cells > 0;
		let has_encoding_type = streams.sizes.encoding_type > 0;

		// index into `entries` of the current occupant of each direction cell
		let mut occupants: Vec<Option<usize>> = vec![None; layout.direction().len()];
		let mut entries: Vec<PixelBufferEntry> = Vec::with_capacity(layout.frame_cell_count());

		for (frame, grid) in layout.frames().iter().enumerate() {
			for (frame_cell, cell) in grid.cells().iter().enumerate() {
				let slot = cell.direction_index(columns);
				let occupant = occupants[slot];

				let mask = match occupant {
					None => 0x0F,
					Some(_) => {
						if has_equal_cells && streams.equal_cells.read_bit()? == 1 {
							continue;
						}
						streams.pixel_mask.read_bits(4)?
					}
				};

				let pixel_bits = PIXEL_MASK_LOOKUP[mask as usize];
				let raw = pixel_bits != 0 && has_encoding_type && streams.encoding_type.read_bit()? == 1;

				let mut stack = [0u32; 4];
				let mut decoded = 0;
				let mut last = 0u32;
				for _ in 0..pixel_bits {
					let value = if raw {
						streams.raw_pixel_codes.read_bits(8)?
					} else {
						let mut value = last;
						loop {
							let displacement = streams.pixel_codes.read_bits(4)?;
							value = value.wrapping_add(displacement);
							if displacement != 15 {
								break;
							}
						}
						value
					};

					if value == last {
						break;
					}
					stack[decoded] = value;
					last = value;
					decoded += 1;
				}

				let previous = occupant.map(|index| entries[index].values).unwrap_or_default();
				let mut values = [0u8; 4];
				for (bit, value) in values.iter_mut().enumerate() {
					*value = if mask & (1 << bit) == 0 {
						previous[bit]
					} else if decoded > 0 {
						decoded -= 1;
						stack[decoded] as u8
					} else {
						0
					};
				}

				occupants[slot] = Some(entries.len());
				entries.push(PixelBufferEntry {
					values,
					frame,
					frame_cell,
				});
			}
		}

		for entry in &mut entries {
			for value in &mut entry.values {
				*value = palette[*value as usize];
			}
		}

		Ok(Self {
			entries,
		})
	}

	/// Number of entries.
	#[inline]
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns `true` if no cell produced an entry.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Entries in decode order.
	#[inline]
	pub fn entries(&self) -> &[PixelBufferEntry] {
		&self.entries
	}

	pub(crate) fn into_entries(self) -> Vec<PixelBufferEntry> {
		self.entries
	}
}
