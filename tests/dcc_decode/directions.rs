//! Direction tables and logical ordering

use dcc_rs::prelude::*;

use crate::common::{FrameSpec, assert_matches, direction_of};

fn one_color_per_direction(count: u8) -> (Vec<u8>, Vec<Vec<FrameSpec>>) {
	let mut builder = DccFileBuilder::new(count).unwrap();
	let mut expected = Vec::new();
	for direction in 0..count {
		let specs = vec![
			FrameSpec::solid(5, 3, -2, 1, direction + 1),
			FrameSpec::solid(6, 4, -3, 2, direction + 1),
		];
		builder.set_direction(direction as usize, direction_of(&specs, CompressionFlags::all())).unwrap();
		expected.push(specs);
	}
	(builder.build().unwrap(), expected)
}

#[test_log::test]
fn every_direction_count_decodes_in_logical_order() {
	for count in [1u8, 4, 8, 16, 32] {
		let (data, expected) = one_color_per_direction(count);
		let dcc = DccFile::from_bytes(&data).unwrap();

		assert_eq!(dcc.direction_count(), count as usize);
		assert_eq!(dcc.frames_per_direction(), 2);
		for (index, direction) in dcc.iter().enumerate() {
			assert_eq!(direction.index(), index);
			assert_eq!(direction.palette_indices(), &[0, index as u8 + 1]);
			assert_matches(direction, &expected[index]);
		}
	}
}

#[test_log::test]
fn offsets_follow_storage_order() {
	for count in [4u8, 8, 16, 32] {
		let (data, _) = one_color_per_direction(count);
		let layout = DccLayout::parse(&data).unwrap();
		let order = direction_order(count).unwrap();

		let offsets: Vec<u32> = order.iter().map(|&logical| layout.direction_offset(logical as usize).unwrap()).collect();
		assert!(offsets.windows(2).all(|pair| pair[0] < pair[1]), "{count} directions: {offsets:?}");
		assert_eq!(offsets[0] as usize, layout.header().table_end());
	}
}

#[test_log::test]
fn eight_direction_table() {
	assert_eq!(direction_order(8).unwrap(), &[4, 0, 5, 1, 6, 2, 7, 3]);
	assert_eq!(direction_order(1).unwrap(), &[0]);
	assert!(direction_order(2).is_none());

	let (data, _) = one_color_per_direction(8);
	// slot 0 of the table holds logical direction 4
	let first = u32::from_le_bytes([data[15], data[16], data[17], data[18]]);
	assert_eq!(DccLayout::parse(&data).unwrap().direction_offset(4), Some(first));
}

#[test_log::test]
fn single_direction_decodes_without_the_others() {
	let (data, expected) = one_color_per_direction(16);
	let layout = DccLayout::parse(&data).unwrap();

	let direction = layout.decode_direction(11).unwrap();
	assert_eq!(direction.index(), 11);
	assert_matches(&direction, &expected[11]);

	let err = layout.decode_direction(16).unwrap_err();
	assert!(matches!(
		err,
		DccError::DirectionOutOfRange {
			index: 16,
			count: 16,
		}
	));
	assert!(DccFile::from_bytes(&data).unwrap().direction(16).is_err());
}

#[test_log::test]
fn header_fields() {
	let (data, _) = one_color_per_direction(4);
	let header = DccHeader::from_bytes(&data).unwrap();

	assert_eq!(header.version, 6);
	assert_eq!(header.direction_count, 4);
	assert_eq!(header.frames_per_direction, 2);
	assert_eq!(header.total_size_coded as usize, data.len() - header.table_end());
	assert_eq!(&header.to_bytes()[..], &data[..15]);
}
