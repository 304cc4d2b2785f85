//! Properties every decoded direction satisfies

use std::thread;

use dcc_rs::prelude::*;
use rand::{SeedableRng, rngs::SmallRng};

use crate::common::{direction_of, random_animation};

fn random_file(seed: u64, directions: u8) -> Vec<u8> {
	let mut rng = SmallRng::seed_from_u64(seed);
	let mut builder = DccFileBuilder::new(directions).unwrap();
	for direction in 0..directions as usize {
		let specs = random_animation(&mut rng, 8);
		builder.set_direction(direction, direction_of(&specs, CompressionFlags::all())).unwrap();
	}
	builder.build().unwrap()
}

#[test_log::test]
fn direction_box_is_union_of_frame_boxes() {
	for seed in 0..8 {
		let dcc = DccFile::from_bytes(&random_file(seed, 4)).unwrap();
		for direction in &dcc {
			let boxes: Vec<Rect> = direction.frames().iter().map(|frame| frame.bounds()).collect();
			assert_eq!(Some(direction.bounds()), Rect::union_all(&boxes));
		}
	}
}

#[test_log::test]
fn cell_grid_covers_the_box() {
	for seed in 0..8 {
		let dcc = DccFile::from_bytes(&random_file(seed, 1)).unwrap();
		let direction = dcc.direction(0).unwrap();
		let bounds = direction.bounds();

		assert_eq!(direction.cell_columns(), 1 + (bounds.width as usize - 1) / 4);
		assert_eq!(direction.cell_rows(), 1 + (bounds.height as usize - 1) / 4);
	}
}

#[test_log::test]
fn pixels_come_from_the_palette_table() {
	for seed in 0..8 {
		let dcc = DccFile::from_bytes(&random_file(seed, 1)).unwrap();
		let direction = dcc.direction(0).unwrap();
		let valid = direction.palette_indices();

		for frame in direction.frames() {
			assert_eq!(frame.pixels().len(), direction.bounds().area());
			assert!(frame.pixels().iter().all(|pixel| *pixel == 0 || valid.contains(pixel)));
		}
	}
}

#[test_log::test]
fn pixels_outside_the_frame_are_transparent() {
	let dcc = DccFile::from_bytes(&random_file(3, 1)).unwrap();
	let direction = dcc.direction(0).unwrap();

	for frame in direction.frames() {
		let inner = frame.box_in_direction();
		for (index, &pixel) in frame.pixels().iter().enumerate() {
			let x = (index % frame.stride()) as i32;
			let y = (index / frame.stride()) as i32;
			let inside = x >= inner.left && x <= inner.right() && y >= inner.top && y <= inner.bottom();
			if !inside {
				assert_eq!(pixel, 0, "({x}, {y}) outside {inner}");
			}
		}
	}
}

#[test_log::test]
fn decoding_is_repeatable() {
	let data = random_file(11, 8);
	let first = DccFile::from_bytes(&data).unwrap();
	let second = DccFile::from_reader(data.as_slice()).unwrap();
	assert_eq!(first, second);
}

#[test_log::test]
fn decoding_is_thread_independent() {
	let data = random_file(5, 8);
	let reference = DccFile::from_bytes(&data).unwrap();

	let decoded: Vec<DccFile> = thread::scope(|scope| {
		let handles: Vec<_> = (0..4).map(|_| scope.spawn(|| DccFile::from_bytes(&data).unwrap())).collect();
		handles.into_iter().map(|handle| handle.join().unwrap()).collect()
	});

	for file in decoded {
		assert_eq!(file, reference);
	}
}

#[test_log::test]
fn rgba_conversion_uses_palette() {
	let mut palette = Palette::new();
	palette.set(9, Color::rgb(10, 20, 30));

	let mut builder = DccFileBuilder::new(1).unwrap();
	let frame = SourceFrame::new(2, 1, 0, 0, vec![9, 0]).unwrap();
	builder.set_direction(0, DccDirectionBuilder::new().with_frame(frame)).unwrap();
	let dcc = DccFile::from_bytes(&builder.build().unwrap()).unwrap();

	let rgba = dcc.direction(0).unwrap().frames()[0].to_rgba(&palette);
	assert_eq!(rgba, vec![10, 20, 30, 255, 0, 0, 0, 0]);
}
