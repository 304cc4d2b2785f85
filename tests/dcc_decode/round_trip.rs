//! Encoding and decoding agree on every frame

use dcc_rs::prelude::*;
use rand::{SeedableRng, rngs::SmallRng};

use crate::common::{FrameSpec, assert_matches, direction_of, random_animation};

#[test_log::test]
fn random_animations_under_every_compression() {
	for seed in 0..16u64 {
		for bits in 0..4u8 {
			let mut rng = SmallRng::seed_from_u64(seed);
			let specs = random_animation(&mut rng, 12);

			let mut builder = DccFileBuilder::new(1).unwrap();
			builder.set_direction(0, direction_of(&specs, CompressionFlags::new(bits))).unwrap();
			let data = builder.build().unwrap();

			let dcc = DccFile::from_bytes(&data).unwrap_or_else(|err| panic!("seed {seed}, flags {bits}: {err}"));
			let direction = dcc.direction(0).unwrap();
			assert_eq!(direction.compression().bits(), bits);
			assert_matches(direction, &specs);
		}
	}
}

#[test_log::test]
fn repeated_frames_use_equal_cells() {
	let first = FrameSpec::solid(8, 8, 0, 7, 5);
	let specs = vec![first.clone(), first.clone(), first];

	let mut builder = DccFileBuilder::new(1).unwrap();
	builder.set_direction(0, direction_of(&specs, CompressionFlags::new(CompressionFlags::EQUAL_CELLS))).unwrap();
	let dcc = DccFile::from_bytes(&builder.build().unwrap()).unwrap();

	let direction = dcc.direction(0).unwrap();
	// four cells, revisited twice
	assert_eq!(direction.stream_sizes().equal_cells, 8);
	assert_eq!(direction.stream_sizes().pixel_mask, 0);
	assert_matches(direction, &specs);
}

#[test_log::test]
fn equal_cells_shrink_still_animations() {
	let mut rng = SmallRng::seed_from_u64(7);
	let first = FrameSpec::random(&mut rng);
	let specs = vec![first; 10];

	let size_with = |bits: u8| {
		let mut builder = DccFileBuilder::new(1).unwrap();
		builder.set_direction(0, direction_of(&specs, CompressionFlags::new(bits))).unwrap();
		builder.build().unwrap().len()
	};
	assert!(size_with(CompressionFlags::EQUAL_CELLS) < size_with(0));
}

#[test_log::test]
fn smaller_blank_frame_is_an_equal_cell() {
	let specs = vec![FrameSpec::solid(4, 4, 0, 3, 9), FrameSpec::solid(2, 2, 0, 1, 0)];

	let mut builder = DccFileBuilder::new(1).unwrap();
	builder.set_direction(0, direction_of(&specs, CompressionFlags::all())).unwrap();
	let dcc = DccFile::from_bytes(&builder.build().unwrap()).unwrap();

	let direction = dcc.direction(0).unwrap();
	assert_eq!(direction.stream_sizes().equal_cells, 1);
	assert_matches(direction, &specs);
	assert!(direction.frames()[1].pixels().iter().all(|&pixel| pixel == 0));
}

#[test_log::test]
fn wide_palettes_use_raw_pixel_codes() {
	// 96 distinct indices, so late frames rank past the displacement range
	let specs: Vec<FrameSpec> = (0..48u8)
		.map(|frame| {
			let colors = [2 * frame + 1, 2 * frame + 2];
			FrameSpec {
				width: 4,
				height: 4,
				x_offset: 0,
				y_offset: 3,
				pixels: (0..16).map(|pixel| colors[pixel % 2]).collect(),
			}
		})
		.collect();

	let mut builder = DccFileBuilder::new(1).unwrap();
	builder
		.set_direction(0, direction_of(&specs, CompressionFlags::new(CompressionFlags::RAW_PIXEL_CODES)))
		.unwrap();
	let dcc = DccFile::from_bytes(&builder.build().unwrap()).unwrap();

	let direction = dcc.direction(0).unwrap();
	assert_eq!(direction.palette_indices().len(), 97);
	assert!(direction.stream_sizes().raw_pixel_codes > 0);
	assert_eq!(direction.stream_sizes().encoding_type, 48);
	assert_matches(direction, &specs);
}

#[test_log::test]
fn re_encoding_a_decoded_file_is_stable() {
	let mut rng = SmallRng::seed_from_u64(42);
	let mut builder = DccFileBuilder::new(4).unwrap();
	for direction in 0..4 {
		let specs = random_animation(&mut rng, 6);
		builder.set_direction(direction, direction_of(&specs, CompressionFlags::all())).unwrap();
	}
	let data = builder.build().unwrap();

	let decoded = DccFile::from_bytes(&data).unwrap();
	let rebuilt = DccFileBuilder::from_file(&decoded).build().unwrap();
	assert_eq!(rebuilt, data);
}
