//! Benchmark helper utilities for dcc-rs
//!
//! This module provides generators for synthetic DCC sprites and the common
//! benchmark sizes used across the suite.
//!
//! # Synthetic Sprites
//!
//! Real DCC files are game assets and are not shipped with the repository.
//! The generators below build sprites with the crate's own encoder instead,
//! using a pattern that keeps every cell within the four colors a cell can
//! hold, so both the equal-cell path and fresh cells are exercised.

use dcc_types::file::dcc::{CompressionFlags, DirectionBuilder, FileBuilder, SourceFrame};

/// Palette index of `(x, y)` in sprite space for one direction and frame.
///
/// Any 5×5 window holds at most two non-zero indices plus 0.
pub fn sprite_pixel(direction: usize, frame: usize, x: i32, y: i32) -> u8 {
	if (x + y).rem_euclid(3) == 0 {
		return 0;
	}
	let band = (x.div_euclid(8) + y.div_euclid(8) + frame as i32).rem_euclid(2) as u8;
	16 + (direction as u8 % 32) * 4 + band
}

/// Generates one frame of a walking sprite.
///
/// Frames shift right by one pixel each, so consecutive frames share most
/// cells but never align perfectly.
pub fn generate_frame(direction: usize, frame: usize, width: u32, height: u32) -> SourceFrame {
	let x_offset = frame as i32 - (width / 2) as i32;
	let y_offset = height as i32 - 1;
	let top = y_offset - height as i32 + 1;

	let pixels = (0..height as i32)
		.flat_map(|row| (0..width as i32).map(move |column| (row, column)))
		.map(|(row, column)| sprite_pixel(direction, frame, x_offset + column, top + row))
		.collect();

	SourceFrame::new(width, height, x_offset, y_offset, pixels).expect("pixel count matches the frame size")
}

/// Generates a complete DCC file with synthetic frames.
pub fn generate_test_dcc_data(
	direction_count: u8,
	frames: usize,
	(width, height): (u32, u32),
	compression: CompressionFlags,
) -> Vec<u8> {
	let mut builder = FileBuilder::new(direction_count).expect("supported direction count");
	for direction in 0..direction_count as usize {
		let mut frames_builder = DirectionBuilder::new().with_compression(compression);
		for frame in 0..frames {
			frames_builder.push_frame(generate_frame(direction, frame, width, height));
		}
		builder.set_direction(direction, frames_builder).expect("direction in range");
	}
	builder.build().expect("synthetic sprite encodes")
}

/// Common benchmark sizes for synthetic sprites
pub mod sizes {
	/// Tiny sprite: 16x16
	pub const TINY: (u32, u32) = (16, 16);
	/// Small sprite: 64x64, a typical monster part
	pub const SMALL: (u32, u32) = (64, 64);
	/// Medium sprite: 128x128
	pub const MEDIUM: (u32, u32) = (128, 128);
	/// Large sprite: 256x256, an oversized overlay
	pub const LARGE: (u32, u32) = (256, 256);
}

#[cfg(test)]
mod tests {
	use super::*;
	use dcc_types::file::DccFile;

	#[test]
	fn test_sprite_pixel_fits_in_cells() {
		for y in -10..10 {
			for x in -10..10 {
				let mut colors: Vec<u8> = (0..5)
					.flat_map(|dy| (0..5).map(move |dx| sprite_pixel(3, 1, x + dx, y + dy)))
					.collect();
				colors.sort_unstable();
				colors.dedup();
				assert!(colors.len() <= 3, "window at ({x}, {y}) holds {colors:?}");
			}
		}
	}

	#[test]
	fn test_generate_test_dcc_data() {
		let data = generate_test_dcc_data(8, 3, sizes::TINY, CompressionFlags::all());

		// Signature, version and direction count
		assert_eq!(&data[0..3], &[0x74, 6, 8]);

		let dcc = DccFile::from_bytes(&data).unwrap();
		assert_eq!(dcc.direction_count(), 8);
		assert_eq!(dcc.frames_per_direction(), 3);

		let frame = &dcc.direction(5).unwrap().frames()[2];
		let expected = generate_frame(5, 2, 16, 16);
		assert_eq!(frame.cropped_pixels(), expected.pixels());
	}

	#[test]
	fn test_sizes_constants() {
		assert_eq!(sizes::TINY, (16, 16));
		assert_eq!(sizes::SMALL, (64, 64));
		assert_eq!(sizes::MEDIUM, (128, 128));
		assert_eq!(sizes::LARGE, (256, 256));
	}
}
