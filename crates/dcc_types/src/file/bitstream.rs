//! Bit-granular reading and writing for packed formats.
//!
//! DCC data is not byte aligned: fields of arbitrary width follow each other
//! without padding, and several logical sub-streams are interleaved in one
//! physical buffer. [`BitReader`] reads such data least-significant bit first
//! and can be [forked](BitReader::fork) into independent cursors over the same
//! bytes. [`BitWriter`] produces data in the same bit order.
//!
//! # Bit order
//!
//! Bit `n` of the stream is bit `n % 8` of byte `n / 8`, and a multi-bit field
//! is assembled with its first bit as the least significant bit:
//!
//! ```
//! use dcc_types::file::bitstream::BitReader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = [0b1011_0110, 0xFF];
//! let mut reader = BitReader::new(&data);
//!
//! assert_eq!(reader.read_bits(3)?, 0b110);
//! assert_eq!(reader.read_bits(5)?, 0b10110);
//! assert_eq!(reader.read_signed_bits(4)?, -1);
//! assert_eq!(reader.bits_read(), 12);
//! # Ok(())
//! # }
//! ```

use crate::file::BitstreamError;

const BYTE_BITS: usize = 8;

#[inline]
const fn field_mask(bits: u32) -> u32 {
	if bits >= 32 {
		u32::MAX
	} else {
		(1u32 << bits) - 1
	}
}

/// Sequential reader over a byte buffer, addressable at bit granularity.
///
/// The reader only borrows the buffer and owns its cursor, so cloning it is
/// cheap and yields a fully independent cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitReader<'a> {
	data: &'a [u8],
	position: usize,
	bits_read: usize,
}

impl<'a> BitReader<'a> {
	/// Creates a reader positioned at the first bit of `data`.
	pub fn new(data: &'a [u8]) -> Self {
		Self::at_bit(data, 0)
	}

	/// Creates a reader positioned at an absolute bit offset of `data`.
	pub fn at_bit(data: &'a [u8], bit_offset: usize) -> Self {
		Self {
			data,
			position: bit_offset,
			bits_read: 0,
		}
	}

	/// Returns an independent cursor at the current position with its
	/// consumed-bit counter reset to zero.
	pub fn fork(&self) -> Self {
		Self {
			data: self.data,
			position: self.position,
			bits_read: 0,
		}
	}

	/// Absolute bit position of the cursor.
	#[inline]
	pub fn position(&self) -> usize {
		self.position
	}

	/// Number of bits consumed (read or skipped) since this cursor was created.
	#[inline]
	pub fn bits_read(&self) -> usize {
		self.bits_read
	}

	/// Number of bits left before the end of the buffer.
	#[inline]
	pub fn remaining_bits(&self) -> usize {
		(self.data.len() * BYTE_BITS).saturating_sub(self.position)
	}

	fn ensure(&self, bits: usize) -> Result<(), BitstreamError> {
		let available = self.remaining_bits();
		if bits > available {
			return Err(BitstreamError::OutOfBounds {
				requested: bits,
				position: self.position,
				available,
			});
		}
		Ok(())
	}

	/// Reads a single bit.
	#[inline]
	pub fn read_bit(&mut self) -> Result<u32, BitstreamError> {
		self.read_bits(1)
	}

	/// Reads `bits` bits (0 to 32) as an unsigned value.
	pub fn read_bits(&mut self, bits: u32) -> Result<u32, BitstreamError> {
		if bits > 32 {
			return Err(BitstreamError::InvalidWidth(bits));
		}
		self.ensure(bits as usize)?;

		let mut value = 0u32;
		let mut filled = 0u32;
		while filled < bits {
			let byte = self.data[self.position / BYTE_BITS];
			let shift = (self.position % BYTE_BITS) as u32;
			let take = (8 - shift).min(bits - filled);
			let chunk = (u32::from(byte) >> shift) & field_mask(take);
			value |= chunk << filled;

			filled += take;
			self.position += take as usize;
		}

		self.bits_read += bits as usize;
		Ok(value)
	}

	/// Reads `bits` bits and sign-extends them using bit `bits - 1` as the sign.
	///
	/// A zero-width read yields `0`; a one-bit read yields `0` or `-1`.
	pub fn read_signed_bits(&mut self, bits: u32) -> Result<i32, BitstreamError> {
		let value = self.read_bits(bits)?;
		if bits == 0 || bits == 32 {
			return Ok(value as i32);
		}

		if value & (1 << (bits - 1)) != 0 {
			Ok((value | !field_mask(bits)) as i32)
		} else {
			Ok(value as i32)
		}
	}

	/// Reads 8 bits.
	pub fn read_u8(&mut self) -> Result<u8, BitstreamError> {
		Ok(self.read_bits(8)? as u8)
	}

	/// Reads 32 bits as an unsigned value.
	pub fn read_u32(&mut self) -> Result<u32, BitstreamError> {
		self.read_bits(32)
	}

	/// Reads 32 bits as a signed value.
	pub fn read_i32(&mut self) -> Result<i32, BitstreamError> {
		self.read_signed_bits(32)
	}

	/// Reads `count` bytes, each assembled from the next 8 bits.
	///
	/// The cursor does not need to be byte aligned.
	pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>, BitstreamError> {
		let bits = count.checked_mul(BYTE_BITS).ok_or(BitstreamError::OutOfBounds {
			requested: usize::MAX,
			position: self.position,
			available: self.remaining_bits(),
		})?;
		self.ensure(bits)?;
		(0..count).map(|_| self.read_u8()).collect()
	}

	/// Advances the cursor without materializing a value.
	pub fn skip_bits(&mut self, bits: usize) -> Result<(), BitstreamError> {
		self.ensure(bits)?;
		self.position += bits;
		self.bits_read += bits;
		Ok(())
	}
}

/// Growable bit buffer producing data in [`BitReader`] order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitWriter {
	bytes: Vec<u8>,
	len: usize,
}

impl BitWriter {
	/// Creates an empty writer.
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of bits written so far.
	#[inline]
	pub fn len_bits(&self) -> usize {
		self.len
	}

	/// Returns `true` if nothing has been written.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Appends a single bit.
	pub fn write_bit(&mut self, bit: bool) {
		let shift = self.len % BYTE_BITS;
		if shift == 0 {
			self.bytes.push(0);
		}
		if bit && let Some(last) = self.bytes.last_mut() {
			*last |= 1 << shift;
		}
		self.len += 1;
	}

	/// Appends the low `bits` bits of `value`.
	///
	/// Fails if `value` does not fit in `bits` bits.
	pub fn write_bits(&mut self, value: u32, bits: u32) -> Result<(), BitstreamError> {
		if bits > 32 {
			return Err(BitstreamError::InvalidWidth(bits));
		}
		if value & !field_mask(bits) != 0 {
			return Err(BitstreamError::FieldOverflow {
				value: i64::from(value),
				bits,
			});
		}

		for bit in 0..bits {
			self.write_bit((value >> bit) & 1 != 0);
		}
		Ok(())
	}

	/// Appends `value` as a two's complement field of `bits` bits.
	pub fn write_signed_bits(&mut self, value: i32, bits: u32) -> Result<(), BitstreamError> {
		if bits > 32 {
			return Err(BitstreamError::InvalidWidth(bits));
		}
		if signed_width(value) > bits {
			return Err(BitstreamError::FieldOverflow {
				value: i64::from(value),
				bits,
			});
		}
		self.write_bits(value as u32 & field_mask(bits), bits)
	}

	/// Appends one byte.
	pub fn write_u8(&mut self, value: u8) {
		for bit in 0..8 {
			self.write_bit((value >> bit) & 1 != 0);
		}
	}

	/// Appends a 32-bit value.
	pub fn write_u32(&mut self, value: u32) {
		for bit in 0..32 {
			self.write_bit((value >> bit) & 1 != 0);
		}
	}

	/// Appends every bit written to `other`.
	pub fn append(&mut self, other: &BitWriter) {
		for index in 0..other.len {
			let byte = other.bytes[index / BYTE_BITS];
			self.write_bit((byte >> (index % BYTE_BITS)) & 1 != 0);
		}
	}

	/// Pads with zero bits up to the next byte boundary.
	pub fn align_to_byte(&mut self) {
		self.len = self.bytes.len() * BYTE_BITS;
	}

	/// Returns the written bytes; the last byte is zero-padded.
	pub fn as_bytes(&self) -> &[u8] {
		&self.bytes
	}

	/// Consumes the writer and returns the written bytes.
	pub fn into_bytes(self) -> Vec<u8> {
		self.bytes
	}
}

/// Smallest field width able to hold `value` as an unsigned number.
pub fn unsigned_width(value: u32) -> u32 {
	32 - value.leading_zeros()
}

/// Smallest field width able to hold `value` in two's complement.
///
/// Zero needs no bits at all, since a zero-width signed read yields `0`.
pub fn signed_width(value: i32) -> u32 {
	match value {
		0 => 0,
		v if v > 0 => 33 - v.leading_zeros(),
		v => 33 - (!v).leading_zeros(),
	}
}
