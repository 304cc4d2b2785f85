//! Constants used in `.DCC` files

/// Signature byte at the start of every DCC file
pub const SIGNATURE: u8 = 0x74;

/// Version written by the encoder
pub const DEFAULT_VERSION: u8 = 6;

/// Value of the fixed header field following the frame count
pub const HEADER_TAG: u32 = 1;

/// Size of the fixed file header in bytes
pub const HEADER_SIZE: usize = 15;

/// Size of one entry of the direction offset table in bytes
pub const DIRECTION_OFFSET_SIZE: usize = 4;

/// Nominal cell edge in pixels
pub const CELL_SIZE: usize = 4;

/// Width of each sub-stream length field in bits
pub const STREAM_SIZE_BITS: u32 = 20;

/// Largest sub-stream length that fits its length field
pub const MAX_STREAM_BITS: usize = (1 << STREAM_SIZE_BITS) - 1;

/// Number of entries in the per-direction palette-index table
pub const PALETTE_ENTRIES: usize = 256;

/// Largest direction bounding box edge the decoder accepts
pub const MAX_DIMENSION: i64 = 0x1000;

/// Field widths selectable by the 4-bit width codes of a direction header
pub const FIELD_WIDTH_TABLE: [u32; 16] = [0, 1, 2, 4, 6, 8, 10, 12, 14, 16, 20, 24, 26, 28, 30, 32];

/// Number of set bits for every 4-bit pixel mask
pub const PIXEL_MASK_LOOKUP: [usize; 16] = [0, 1, 1, 2, 1, 2, 2, 3, 1, 2, 2, 3, 2, 3, 3, 4];

/// Storage order of a 4-direction file
pub const DIRECTIONS_4: [u8; 4] = [0, 1, 2, 3];

/// Storage order of an 8-direction file
pub const DIRECTIONS_8: [u8; 8] = [4, 0, 5, 1, 6, 2, 7, 3];

/// Storage order of a 16-direction file
pub const DIRECTIONS_16: [u8; 16] = [4, 8, 0, 9, 5, 10, 1, 11, 6, 12, 2, 13, 7, 14, 3, 15];

/// Storage order of a 32-direction file
pub const DIRECTIONS_32: [u8; 32] = [
	4, 16, 8, 17, 0, 18, 9, 19, 5, 20, 10, 21, 1, 22, 11, 23, 6, 24, 12, 25, 2, 26, 13, 27, 7, 28,
	14, 29, 3, 30, 15, 31,
];

/// Returns the logical direction stored at each position of the offset table.
///
/// `None` for a direction count the format does not define.
pub fn direction_order(count: u8) -> Option<&'static [u8]> {
	match count {
		1 => Some(&[0]),
		4 => Some(&DIRECTIONS_4),
		8 => Some(&DIRECTIONS_8),
		16 => Some(&DIRECTIONS_16),
		32 => Some(&DIRECTIONS_32),
		_ => None,
	}
}
