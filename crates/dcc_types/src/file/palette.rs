//! Color palette support.
//!
//! DCC frames store palette indices only. Turning them into colors needs a
//! separately supplied 256-entry table, usually a `.dat` palette: 256 colors of
//! three bytes each, stored in B, G, R order.

use std::fmt;
use std::io::Read;
use std::path::Path;

use crate::file::DccError;

/// RGBA color representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
	/// Red component (0-255)
	pub r: u8,
	/// Green component (0-255)
	pub g: u8,
	/// Blue component (0-255)
	pub b: u8,
	/// Alpha component (0-255)
	pub a: u8,
}

impl Color {
	/// Creates a new RGBA color.
	pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
		Self {
			r,
			g,
			b,
			a,
		}
	}

	/// Creates a new RGB color with full opacity.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self::new(r, g, b, 255)
	}

	/// Creates a new grayscale color.
	pub const fn gray(value: u8) -> Self {
		Self::rgb(value, value, value)
	}

	/// Creates a transparent black color.
	pub const fn transparent() -> Self {
		Self::new(0, 0, 0, 0)
	}

	/// Returns the components as `[r, g, b, a]`.
	pub const fn to_array(&self) -> [u8; 4] {
		[self.r, self.g, self.b, self.a]
	}
}

impl Default for Color {
	fn default() -> Self {
		Self::transparent()
	}
}

impl fmt::Display for Color {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "RGBA({}, {}, {}, {})", self.r, self.g, self.b, self.a)
	}
}

/// 256-color palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
	colors: [Color; 256],
}

impl Palette {
	/// Number of colors in a palette
	pub const PALETTE_SIZE: usize = 256;

	/// Size of a `.dat` palette in bytes (256 colors × 3 bytes)
	pub const DAT_FILE_SIZE: usize = Self::PALETTE_SIZE * 3;

	/// Creates a new palette with all colors set to transparent black.
	pub fn new() -> Self {
		Self {
			colors: [Color::transparent(); 256],
		}
	}

	/// Loads a `.dat` palette from disk.
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DccError> {
		let data = std::fs::read(path)?;
		Self::from_dat_bytes(&data)
	}

	/// Loads a palette from the bytes of a `.dat` file.
	///
	/// # Arguments
	///
	/// * `data` - Raw palette data (must be at least 768 bytes)
	///
	/// # Returns
	///
	/// A palette with every color fully opaque.
	pub fn from_dat_bytes(data: &[u8]) -> Result<Self, DccError> {
		if data.len() < Self::DAT_FILE_SIZE {
			return Err(DccError::InsufficientData {
				expected: Self::DAT_FILE_SIZE,
				actual: data.len(),
			});
		}

		let mut reader = std::io::Cursor::new(data);
		Self::from_reader(&mut reader)
	}

	/// Reads a `.dat` palette from a reader.
	pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, DccError> {
		let mut palette = Self::new();

		for color in &mut palette.colors {
			let mut bgr = [0u8; 3];
			reader.read_exact(&mut bgr)?;
			*color = Color::rgb(bgr[2], bgr[1], bgr[0]);
		}

		Ok(palette)
	}

	/// Creates a palette where every index maps to the gray level of the same value.
	pub fn grayscale() -> Self {
		let mut palette = Self::new();
		for (i, color) in palette.colors.iter_mut().enumerate() {
			*color = Color::gray(i as u8);
		}
		palette
	}

	/// Gets a color by index.
	#[inline]
	pub fn get(&self, index: u8) -> Color {
		self.colors[index as usize]
	}

	/// Sets a color at the specified index.
	#[inline]
	pub fn set(&mut self, index: u8, color: Color) {
		self.colors[index as usize] = color;
	}

	/// Returns a reference to the color array.
	#[inline]
	pub fn colors(&self) -> &[Color; 256] {
		&self.colors
	}

	/// Converts palette indices to RGBA bytes, four per index.
	///
	/// Index 0 is transparent; every other index takes its palette color.
	pub fn to_rgba(&self, indices: &[u8]) -> Vec<u8> {
		indices
			.iter()
			.flat_map(|&index| match index {
				0 => [0, 0, 0, 0],
				_ => self.get(index).to_array(),
			})
			.collect()
	}

	/// Converts the palette to `.dat` bytes.
	pub fn to_dat_bytes(&self) -> Vec<u8> {
		let mut data = Vec::with_capacity(Self::DAT_FILE_SIZE);
		for color in &self.colors {
			data.extend_from_slice(&[color.b, color.g, color.r]);
		}
		data
	}
}

impl Default for Palette {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Display for Palette {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let opaque = self.colors.iter().filter(|color| color.a != 0).count();
		write!(f, "Palette: {} colors, {} opaque", Self::PALETTE_SIZE, opaque)
	}
}

impl std::ops::Index<u8> for Palette {
	type Output = Color;

	fn index(&self, index: u8) -> &Self::Output {
		&self.colors[index as usize]
	}
}
