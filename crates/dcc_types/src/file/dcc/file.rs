//! Core file operations for DCC files.
//!
//! [`Layout`] parses the fixed header and the direction offset table and can
//! decode single directions on demand. [`File`] decodes every direction up
//! front.

use std::fmt;
use std::io::Read;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::file::DccError;
use crate::file::bitstream::BitReader;

use super::constants::{DIRECTION_OFFSET_SIZE, HEADER_SIZE, HEADER_TAG, SIGNATURE, direction_order};
use super::direction::Direction;

#[inline]
fn le_u32(data: &[u8], at: usize) -> u32 {
	u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}

/// Fixed 15-byte header of a DCC file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Header {
	/// Format version
	pub version: u8,

	/// Number of directions (1, 4, 8, 16 or 32)
	pub direction_count: u8,

	/// Number of frames in every direction
	pub frames_per_direction: u32,

	/// Total coded size; not used for decoding
	pub total_size_coded: u32,
}

impl Header {
	/// Parses the header from the start of `data`.
	///
	/// The signature is checked before anything else is read.
	pub fn from_bytes(data: &[u8]) -> Result<Self, DccError> {
		let Some(&signature) = data.first() else {
			return Err(DccError::InsufficientData {
				expected: HEADER_SIZE,
				actual: 0,
			});
		};
		if signature != SIGNATURE {
			return Err(DccError::InvalidSignature {
				expected: SIGNATURE,
				actual: signature,
			});
		}

		if data.len() < HEADER_SIZE {
			return Err(DccError::InsufficientData {
				expected: HEADER_SIZE,
				actual: data.len(),
			});
		}

		let version = data[1];
		let direction_count = data[2];
		let frames_per_direction = le_u32(data, 3);

		let tag = le_u32(data, 7);
		if tag != HEADER_TAG {
			return Err(DccError::InvalidConstant {
				expected: HEADER_TAG,
				actual: tag,
			});
		}

		if direction_order(direction_count).is_none() {
			return Err(DccError::UnsupportedDirectionCount(direction_count));
		}

		Ok(Self {
			version,
			direction_count,
			frames_per_direction,
			total_size_coded: le_u32(data, 11),
		})
	}

	/// Serializes the header into its 15-byte form.
	pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
		let mut bytes = [0u8; HEADER_SIZE];
		bytes[0] = SIGNATURE;
		bytes[1] = self.version;
		bytes[2] = self.direction_count;
		bytes[3..7].copy_from_slice(&self.frames_per_direction.to_le_bytes());
		bytes[7..11].copy_from_slice(&HEADER_TAG.to_le_bytes());
		bytes[11..15].copy_from_slice(&self.total_size_coded.to_le_bytes());
		bytes
	}

	/// Size of the header plus the direction offset table in bytes.
	pub fn table_end(&self) -> usize {
		HEADER_SIZE + self.direction_count as usize * DIRECTION_OFFSET_SIZE
	}
}

impl fmt::Display for Header {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "DCC Header:")?;
		writeln!(f, "  Version: {}", self.version)?;
		writeln!(f, "  Directions: {}", self.direction_count)?;
		writeln!(f, "  Frames per direction: {}", self.frames_per_direction)?;
		write!(f, "  Total size coded: {}", self.total_size_coded)
	}
}

/// Header and direction offsets of a DCC buffer, decoding directions lazily.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout<'a> {
	data: &'a [u8],
	header: Header,
	/// Byte offset of each logical direction
	offsets: Vec<u32>,
}

impl<'a> Layout<'a> {
	/// Parses the header and the direction offset table of `data`.
	pub fn parse(data: &'a [u8]) -> Result<Self, DccError> {
		let header = Header::from_bytes(data)?;

		let table_end = header.table_end();
		if data.len() < table_end {
			return Err(DccError::InsufficientData {
				expected: table_end,
				actual: data.len(),
			});
		}

		let order = direction_order(header.direction_count)
			.ok_or(DccError::UnsupportedDirectionCount(header.direction_count))?;

		let mut offsets = vec![0u32; order.len()];
		for (storage, &logical) in order.iter().enumerate() {
			let offset = le_u32(data, HEADER_SIZE + storage * DIRECTION_OFFSET_SIZE);
			if offset as usize >= data.len() {
				return Err(DccError::InvalidDirectionOffset {
					direction: storage,
					offset,
					size: data.len(),
				});
			}
			offsets[logical as usize] = offset;
		}

		debug!(
			"DCC v{}: {} directions, {} frames each, {} bytes",
			header.version,
			header.direction_count,
			header.frames_per_direction,
			data.len()
		);

		Ok(Self {
			data,
			header,
			offsets,
		})
	}

	/// File header.
	#[inline]
	pub fn header(&self) -> &Header {
		&self.header
	}

	/// Number of directions.
	#[inline]
	pub fn direction_count(&self) -> usize {
		self.offsets.len()
	}

	/// Byte offset of a logical direction.
	pub fn direction_offset(&self, index: usize) -> Option<u32> {
		self.offsets.get(index).copied()
	}

	/// Decodes one logical direction.
	pub fn decode_direction(&self, index: usize) -> Result<Direction, DccError> {
		let offset = self.direction_offset(index).ok_or(DccError::DirectionOutOfRange {
			index,
			count: self.offsets.len(),
		})?;

		let mut reader = BitReader::at_bit(self.data, offset as usize * 8);
		Direction::decode(&mut reader, self.header.frames_per_direction as usize, index)
	}

	/// Decodes every direction in logical order.
	pub fn decode_all(&self) -> Result<Vec<Direction>, DccError> {
		(0..self.direction_count()).map(|index| self.decode_direction(index)).collect()
	}
}

/// Fully decoded `.DCC` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
	header: Header,
	/// Directions in logical order
	directions: Vec<Direction>,
}

impl File {
	/// Decodes a DCC file from a byte slice.
	pub fn from_bytes(data: &[u8]) -> Result<Self, DccError> {
		let layout = Layout::parse(data)?;
		let directions = layout.decode_all()?;

		Ok(Self {
			header: *layout.header(),
			directions,
		})
	}

	/// Reads and decodes a DCC file from a reader.
	pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, DccError> {
		let mut data = Vec::new();
		reader.read_to_end(&mut data)?;
		Self::from_bytes(&data)
	}

	/// Opens and decodes a DCC file from disk.
	///
	/// Any failure is reported together with the path of the file.
	///
	/// # Examples
	///
	/// ```no_run
	/// use dcc_types::file::DccFile;
	///
	/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
	/// let dcc = DccFile::open("data/global/chars/ba/hd/bahdlittnhth.dcc")?;
	///
	/// for direction in dcc.iter() {
	///     println!("direction {}: box {}", direction.index(), direction.bounds());
	/// }
	/// # Ok(())
	/// # }
	/// ```
	pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DccError> {
		let path = path.as_ref();
		std::fs::read(path).map_err(DccError::from).and_then(|data| Self::from_bytes(&data)).map_err(
			|source| DccError::Asset {
				path: path.to_path_buf(),
				source: Box::new(source),
			},
		)
	}

	/// File header.
	#[inline]
	pub fn header(&self) -> &Header {
		&self.header
	}

	/// Format version.
	#[inline]
	pub fn version(&self) -> u8 {
		self.header.version
	}

	/// Number of frames in every direction.
	#[inline]
	pub fn frames_per_direction(&self) -> usize {
		self.header.frames_per_direction as usize
	}

	/// Directions in logical order.
	#[inline]
	pub fn directions(&self) -> &[Direction] {
		&self.directions
	}

	/// Gets a direction by logical index.
	pub fn direction(&self, index: usize) -> Result<&Direction, DccError> {
		self.directions.get(index).ok_or(DccError::DirectionOutOfRange {
			index,
			count: self.directions.len(),
		})
	}

	/// Number of directions.
	#[inline]
	pub fn direction_count(&self) -> usize {
		self.directions.len()
	}

	/// Iterates over the directions in logical order.
	pub fn iter(&self) -> std::slice::Iter<'_, Direction> {
		self.directions.iter()
	}
}

impl<'a> IntoIterator for &'a File {
	type Item = &'a Direction;
	type IntoIter = std::slice::Iter<'a, Direction>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

impl fmt::Display for File {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "{}", self.header)?;
		for direction in &self.directions {
			writeln!(f, "{direction}")?;
		}
		Ok(())
	}
}
