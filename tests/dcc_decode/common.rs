//! Shared sprite generators

use dcc_rs::prelude::*;
use rand::{Rng, rngs::SmallRng};

/// Geometry and pixels of a generated frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FrameSpec {
	pub width: u32,
	pub height: u32,
	pub x_offset: i32,
	pub y_offset: i32,
	pub pixels: Vec<u8>,
}

impl FrameSpec {
	pub(crate) fn solid(width: u32, height: u32, x_offset: i32, y_offset: i32, color: u8) -> Self {
		Self {
			width,
			height,
			x_offset,
			y_offset,
			pixels: vec![color; (width * height) as usize],
		}
	}

	/// Random frame whose pixels use 0 plus two colors.
	pub(crate) fn random(rng: &mut SmallRng) -> Self {
		let width = rng.random_range(1..=24);
		let height = rng.random_range(1..=24);
		let colors = [0, rng.random_range(1..=255), rng.random_range(1..=255)];
		let pixels = (0..width * height).map(|_| colors[rng.random_range(0..3)]).collect();

		Self {
			width,
			height,
			x_offset: rng.random_range(-16..16),
			y_offset: rng.random_range(-8..24),
			pixels,
		}
	}

	/// Same pixels moved by (`dx`, `dy`).
	pub(crate) fn shifted(&self, dx: i32, dy: i32) -> Self {
		Self {
			x_offset: self.x_offset + dx,
			y_offset: self.y_offset + dy,
			..self.clone()
		}
	}

	pub(crate) fn to_source(&self) -> SourceFrame {
		SourceFrame::new(self.width, self.height, self.x_offset, self.y_offset, self.pixels.clone()).unwrap()
	}
}

/// A sequence of frames where later frames often repeat or move earlier ones.
pub(crate) fn random_animation(rng: &mut SmallRng, frames: usize) -> Vec<FrameSpec> {
	let mut specs: Vec<FrameSpec> = Vec::with_capacity(frames);
	for _ in 0..frames {
		let next = match specs.last() {
			Some(previous) if rng.random_bool(0.3) => previous.clone(),
			Some(previous) if rng.random_bool(0.3) => previous.shifted(rng.random_range(-3..=3), rng.random_range(-3..=3)),
			_ => FrameSpec::random(rng),
		};
		specs.push(next);
	}
	specs
}

pub(crate) fn direction_of(specs: &[FrameSpec], compression: CompressionFlags) -> DccDirectionBuilder {
	let mut builder = DccDirectionBuilder::new().with_compression(compression);
	for spec in specs {
		builder.push_frame(spec.to_source());
	}
	builder
}

/// Asserts that a decoded direction reproduces `specs` exactly.
pub(crate) fn assert_matches(direction: &DccDirection, specs: &[FrameSpec]) {
	assert_eq!(direction.frame_count(), specs.len());
	for (index, (frame, spec)) in direction.frames().iter().zip(specs).enumerate() {
		assert_eq!(frame.width(), spec.width, "frame {index} width");
		assert_eq!(frame.height(), spec.height, "frame {index} height");
		assert_eq!(frame.x_offset(), spec.x_offset, "frame {index} x offset");
		assert_eq!(frame.y_offset(), spec.y_offset, "frame {index} y offset");
		assert_eq!(frame.cropped_pixels(), spec.pixels, "frame {index} pixels");
	}
}
