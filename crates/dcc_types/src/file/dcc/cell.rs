//! Cell geometry.
//!
//! A direction's bounding box is cut into a grid of 4×4 cells, the last
//! column and row taking whatever is left over. Frames are cut along the same
//! grid lines, so the first column/row of a frame may be narrower than four
//! pixels and every frame cell maps onto exactly one direction cell.

use super::constants::CELL_SIZE;
use super::types::Rect;

/// Rectangular tile of a direction's pixel grid.
///
/// Offsets are measured from the top-left corner of the direction's bounding
/// box, for frame cells as well as for direction cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Cell {
	/// Horizontal offset in pixels
	pub x: usize,
	/// Vertical offset in pixels
	pub y: usize,
	/// Width in pixels
	pub width: usize,
	/// Height in pixels
	pub height: usize,
}

impl Cell {
	/// Index of the direction cell this cell belongs to.
	#[inline]
	pub fn direction_index(&self, columns: usize) -> usize {
		self.x / CELL_SIZE + (self.y / CELL_SIZE) * columns
	}

	/// Returns `true` if both cells have the same dimensions.
	#[inline]
	pub fn same_size(&self, other: &Cell) -> bool {
		self.width == other.width && self.height == other.height
	}

	/// Returns `true` if the two cells share at least one pixel.
	pub fn overlaps(&self, other: &Cell) -> bool {
		self.x < other.x + other.width
			&& other.x < self.x + self.width
			&& self.y < other.y + other.height
			&& other.y < self.y + self.height
	}
}

/// Row-major grid of cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellGrid {
	columns: usize,
	rows: usize,
	cells: Vec<Cell>,
}

impl CellGrid {
	/// Grid covering a direction's bounding box.
	pub fn for_direction(bounds: &Rect) -> Self {
		let widths = direction_spans(bounds.width.max(0) as usize);
		let heights = direction_spans(bounds.height.max(0) as usize);
		Self::from_spans(0, 0, &widths, &heights)
	}

	/// Grid covering a frame, aligned to the grid of the direction box `direction`.
	///
	/// `frame` must lie inside `direction`.
	pub fn for_frame(frame: &Rect, direction: &Rect) -> Self {
		let origin = frame.relative_to(direction);
		let x = origin.left.max(0) as usize;
		let y = origin.top.max(0) as usize;

		let widths = frame_spans(x, frame.width.max(0) as usize);
		let heights = frame_spans(y, frame.height.max(0) as usize);
		Self::from_spans(x, y, &widths, &heights)
	}

	fn from_spans(x: usize, y: usize, widths: &[usize], heights: &[usize]) -> Self {
		let mut cells = Vec::with_capacity(widths.len() * heights.len());

		let mut offset_y = y;
		for &height in heights {
			let mut offset_x = x;
			for &width in widths {
				cells.push(Cell {
					x: offset_x,
					y: offset_y,
					width,
					height,
				});
				offset_x += width;
			}
			offset_y += height;
		}

		Self {
			columns: widths.len(),
			rows: heights.len(),
			cells,
		}
	}

	/// Number of cell columns.
	#[inline]
	pub fn columns(&self) -> usize {
		self.columns
	}

	/// Number of cell rows.
	#[inline]
	pub fn rows(&self) -> usize {
		self.rows
	}

	/// Total number of cells.
	#[inline]
	pub fn len(&self) -> usize {
		self.cells.len()
	}

	/// Returns `true` if the grid has no cells.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.cells.is_empty()
	}

	/// Cells in row-major order.
	#[inline]
	pub fn cells(&self) -> &[Cell] {
		&self.cells
	}
}

/// Cell widths along one axis of a direction box: `1 + (size - 1) / 4`
/// spans, all four pixels except the last.
fn direction_spans(size: usize) -> Vec<usize> {
	let count = if size == 0 {
		1
	} else {
		1 + (size - 1) / CELL_SIZE
	};

	let mut spans = vec![CELL_SIZE; count];
	spans[count - 1] = size - CELL_SIZE * (count - 1);
	spans
}

/// Cell widths along one axis of a frame starting `offset` pixels into the
/// direction box.
///
/// The first span runs up to the next direction grid line. A frame that
/// crosses that line by a single pixel keeps one span, and the last span
/// absorbs a trailing single pixel, so spans may be up to five pixels wide.
fn frame_spans(offset: usize, size: usize) -> Vec<usize> {
	let first = CELL_SIZE - offset % CELL_SIZE;

	if size <= first + 1 {
		return vec![size];
	}

	let rest = size - first - 1;
	let mut count = 2 + rest / CELL_SIZE;
	if rest % CELL_SIZE == 0 {
		count -= 1;
	}

	let mut spans = vec![CELL_SIZE; count];
	spans[0] = first;
	spans[count - 1] = size - first - CELL_SIZE * (count - 2);
	spans
}

/// Cell grids of a direction and of each of its frames.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellLayout {
	direction: CellGrid,
	frames: Vec<CellGrid>,
}

impl CellLayout {
	/// Computes the grids for a direction box and the boxes of its frames.
	pub fn new<'a>(bounds: &Rect, frames: impl IntoIterator<Item = &'a Rect>) -> Self {
		Self {
			direction: CellGrid::for_direction(bounds),
			frames: frames.into_iter().map(|frame| CellGrid::for_frame(frame, bounds)).collect(),
		}
	}

	/// Grid of the direction box.
	#[inline]
	pub fn direction(&self) -> &CellGrid {
		&self.direction
	}

	/// Grids of each frame, in frame order.
	#[inline]
	pub fn frames(&self) -> &[CellGrid] {
		&self.frames
	}

	/// Index of the first frame with a cell past the last column or row of
	/// the direction grid.
	///
	/// Only empty frames can get there: a zero-width or zero-height frame
	/// adds nothing to the direction box, so its origin may sit on the far
	/// edge of the box.
	pub fn frame_outside_grid(&self) -> Option<usize> {
		let columns = self.direction.columns();
		let rows = self.direction.rows();
		self.frames.iter().position(|grid| {
			grid.cells().iter().any(|cell| cell.x / CELL_SIZE >= columns || cell.y / CELL_SIZE >= rows)
		})
	}

	/// Sum of the cell counts of every frame.
	pub fn frame_cell_count(&self) -> usize {
		self.frames.iter().map(CellGrid::len).sum()
	}
}
