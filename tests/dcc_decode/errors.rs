//! Malformed input and encoder limits

use std::path::PathBuf;

use dcc_rs::prelude::*;

use crate::common::{FrameSpec, direction_of};

fn sample_file() -> Vec<u8> {
	let specs = vec![FrameSpec::solid(6, 5, -1, 4, 3), FrameSpec::solid(6, 5, 0, 4, 4)];
	let mut builder = DccFileBuilder::new(1).unwrap();
	builder.set_direction(0, direction_of(&specs, CompressionFlags::all())).unwrap();
	builder.build().unwrap()
}

fn temp_path(name: &str) -> PathBuf {
	std::env::temp_dir().join(format!("dcc-rs-{}-{name}", std::process::id()))
}

#[test_log::test]
fn wrong_signature() {
	let mut data = sample_file();
	data[0] = 0x00;

	let err = DccFile::from_bytes(&data).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::FormatViolation);
	assert!(matches!(err, DccError::InvalidSignature { actual: 0x00, .. }));
}

#[test_log::test]
fn every_truncation_fails_cleanly() {
	let data = sample_file();
	for len in 0..data.len() {
		let err = DccFile::from_bytes(&data[..len]).unwrap_err();
		assert!(
			matches!(err.kind(), ErrorKind::FormatViolation | ErrorKind::BoundsViolation),
			"length {len}: {err}"
		);
	}
}

#[test_log::test]
fn truncated_stream_is_a_bounds_violation() {
	let data = sample_file();
	let err = DccFile::from_bytes(&data[..data.len() - 1]).unwrap_err();

	assert_eq!(err.kind(), ErrorKind::BoundsViolation);
	assert!(err.to_string().starts_with("Direction 0: "), "{err}");
}

#[test_log::test]
fn too_many_colors_in_one_cell() {
	let frame = SourceFrame::new(4, 1, 0, 0, vec![1, 2, 3, 0]).unwrap();
	let ok = DccDirectionBuilder::new().with_frame(frame).encode(0);
	assert!(ok.is_ok());

	// second cell holds four colors next to a transparent pixel
	let mut pixels = vec![0, 0, 0, 0, 1, 2, 3, 4];
	pixels.extend([0; 8]);
	let frame = SourceFrame::new(8, 2, 0, 1, pixels).unwrap();
	let err = DccDirectionBuilder::new().with_frame(frame).encode(0).unwrap_err();
	assert!(matches!(
		err,
		DccError::TooManyColors {
			frame: 0,
			cell: 1,
			colors: 5,
		}
	));
	assert_eq!(err.kind(), ErrorKind::Encoding);
}

#[test_log::test]
fn oversized_direction_box() {
	let specs = vec![FrameSpec::solid(1, 1, -3000, 0, 1), FrameSpec::solid(1, 1, 3000, 0, 1)];
	let err = direction_of(&specs, CompressionFlags::default()).encode(2).unwrap_err();
	assert!(matches!(
		err,
		DccError::DimensionTooLarge {
			direction: 2,
			width: 6001,
			height: 1,
		}
	));
}

#[test_log::test]
fn open_reports_the_path() {
	let path = temp_path("missing.dcc");
	let err = DccFile::open(&path).unwrap_err();

	assert_eq!(err.kind(), ErrorKind::Io);
	assert!(matches!(&err, DccError::Asset { path: reported, .. } if *reported == path));
	assert!(err.to_string().contains("missing.dcc"));
}

#[test_log::test]
fn open_reads_files_from_disk() {
	let path = temp_path("sample.dcc");
	std::fs::write(&path, sample_file()).unwrap();

	let dcc = DccFile::open(&path);
	std::fs::remove_file(&path).unwrap();
	assert_eq!(dcc.unwrap(), DccFile::from_bytes(&sample_file()).unwrap());
}

#[test_log::test]
fn palette_dat_files() {
	let path = temp_path("gray.dat");
	let gray = Palette::grayscale();
	std::fs::write(&path, gray.to_dat_bytes()).unwrap();

	let loaded = Palette::from_file(&path);
	std::fs::remove_file(&path).unwrap();
	assert_eq!(loaded.unwrap(), gray);

	let err = Palette::from_dat_bytes(&[0; 100]).unwrap_err();
	assert!(matches!(
		err,
		DccError::InsufficientData {
			expected: 768,
			actual: 100,
		}
	));
}
