//! Error types for file format parsing and manipulation.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the bit-level reader and writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BitstreamError {
	/// A read or skip went past the end of the buffer
	#[error(
		"Bitstream overrun: {requested} bits requested at bit {position}, but only {available} bits available"
	)]
	OutOfBounds {
		/// Number of bits requested
		requested: usize,
		/// Bit position of the cursor when the request was made
		position: usize,
		/// Number of bits left in the buffer
		available: usize,
	},

	/// More than 32 bits requested from a single read
	#[error("Invalid field width: {0} bits (maximum is 32)")]
	InvalidWidth(u32),

	/// A value does not fit the requested field width
	#[error("Value {value} does not fit in {bits} bits")]
	FieldOverflow {
		/// Value that was written
		value: i64,
		/// Width of the field
		bits: u32,
	},
}

/// Length-delimited sub-streams of a DCC direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
	/// Equal-cells decisions (one bit per previously occupied cell)
	EqualCells,
	/// 4-bit pixel masks
	PixelMask,
	/// Raw/displacement selector bits
	EncodingType,
	/// 8-bit raw palette codes
	RawPixelCodes,
}

impl fmt::Display for Stream {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Stream::EqualCells => write!(f, "equal-cells"),
			Stream::PixelMask => write!(f, "pixel-mask"),
			Stream::EncodingType => write!(f, "encoding-type"),
			Stream::RawPixelCodes => write!(f, "raw-pixel-codes"),
		}
	}
}

/// Broad classification of a [`DccError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// The data breaks a structural rule of the format
	FormatViolation,
	/// A sub-stream consumed a different number of bits than declared
	StreamAccounting,
	/// A read went past the end of the buffer
	BoundsViolation,
	/// The encoder was given input it cannot represent
	Encoding,
	/// Underlying I/O failure
	Io,
}

/// Errors that can occur when decoding or encoding DCC files
#[derive(Debug, Error)]
pub enum DccError {
	/// Not enough data to parse
	#[error("Insufficient data: expected at least {expected} bytes, got {actual} bytes")]
	InsufficientData {
		/// Expected number of bytes
		expected: usize,
		/// Actual number of bytes
		actual: usize,
	},

	/// Signature byte mismatch
	#[error("Invalid signature: expected 0x{expected:02X}, got 0x{actual:02X}")]
	InvalidSignature {
		/// Expected signature
		expected: u8,
		/// Signature found in the data
		actual: u8,
	},

	/// A fixed header field holds an unexpected value
	#[error("Invalid header constant: expected {expected}, got {actual}")]
	InvalidConstant {
		/// Expected value
		expected: u32,
		/// Value found in the data
		actual: u32,
	},

	/// Direction count is not one of 1, 4, 8, 16 or 32
	#[error("Unsupported direction count: {0}")]
	UnsupportedDirectionCount(u8),

	/// Requested direction does not exist
	#[error("Direction {index} out of range (total directions: {count})")]
	DirectionOutOfRange {
		/// Requested logical direction
		index: usize,
		/// Number of directions in the file
		count: usize,
	},

	/// A direction offset points outside the file
	#[error("Direction {direction} starts at byte {offset}, past the end of a {size}-byte file")]
	InvalidDirectionOffset {
		/// Storage index of the direction
		direction: usize,
		/// Offset read from the table
		offset: u32,
		/// File size in bytes
		size: usize,
	},

	/// Frame is stored bottom-up
	#[error("Direction {direction}, frame {frame}: bottom-up frames are not supported")]
	BottomUpFrame {
		/// Logical direction index
		direction: usize,
		/// Frame index within the direction
		frame: usize,
	},

	/// Direction declares optional per-frame data
	#[error("Direction {direction}: optional frame data ({bits}-bit field) is not supported")]
	OptionalDataUnsupported {
		/// Logical direction index
		direction: usize,
		/// Width of the optional-data field
		bits: u32,
	},

	/// Direction bounding box is larger than the decoder accepts
	#[error("Direction {direction}: bounding box {width}x{height} exceeds the supported size")]
	DimensionTooLarge {
		/// Logical direction index
		direction: usize,
		/// Box width in pixels
		width: i64,
		/// Box height in pixels
		height: i64,
	},

	/// Frame does not map onto the cell grid of its direction box
	#[error("Direction {direction}, frame {frame}: frame lies outside the direction box")]
	FrameOutsideBox {
		/// Logical direction index
		direction: usize,
		/// Frame index within the direction
		frame: usize,
	},

	/// A sub-stream consumed a different number of bits than declared
	#[error("Direction {direction}: {stream} stream read {actual} bits, but {expected} were declared")]
	StreamMismatch {
		/// Logical direction index
		direction: usize,
		/// Sub-stream that went out of sync
		stream: Stream,
		/// Declared length in bits
		expected: usize,
		/// Bits actually consumed
		actual: usize,
	},

	/// Bit-level read or write failure
	#[error("{}{source}", direction_prefix(.direction))]
	Bitstream {
		/// Logical direction index, when the failure happened inside a direction
		direction: Option<usize>,
		/// Underlying bitstream error
		#[source]
		source: BitstreamError,
	},

	/// Cell holds more colors than a pixel-buffer entry can carry
	#[error("Frame {frame}, cell {cell}: {colors} distinct colors do not fit in one cell")]
	TooManyColors {
		/// Frame index within the direction
		frame: usize,
		/// Cell index within the frame
		cell: usize,
		/// Number of distinct colors found
		colors: usize,
	},

	/// Encoded sub-stream does not fit its 20-bit length field
	#[error("Encoded {stream} stream is {bits} bits long, larger than the format allows")]
	StreamTooLarge {
		/// Sub-stream that overflowed
		stream: Stream,
		/// Length in bits
		bits: usize,
	},

	/// Directions of one file must hold the same number of frames
	#[error("Direction {direction} has {actual} frames, expected {expected}")]
	FrameCountMismatch {
		/// Logical direction index
		direction: usize,
		/// Frames per direction of the file
		expected: usize,
		/// Frames supplied for this direction
		actual: usize,
	},

	/// Frame pixel data does not match its dimensions
	#[error("Invalid frame: {width}x{height} needs {expected} pixels, got {actual}")]
	InvalidFrame {
		/// Frame width
		width: u32,
		/// Frame height
		height: u32,
		/// Expected pixel count
		expected: usize,
		/// Pixel count supplied
		actual: usize,
	},

	/// Failure while reading a file from disk
	#[error("{}: {source}", .path.display())]
	Asset {
		/// Path of the asset
		path: PathBuf,
		/// Underlying error
		#[source]
		source: Box<DccError>,
	},

	/// IO error
	#[error(transparent)]
	IOError(#[from] std::io::Error),
}

fn direction_prefix(direction: &Option<usize>) -> String {
	match direction {
		Some(index) => format!("Direction {index}: "),
		None => String::new(),
	}
}

impl From<BitstreamError> for DccError {
	fn from(source: BitstreamError) -> Self {
		DccError::Bitstream {
			direction: None,
			source,
		}
	}
}

impl DccError {
	/// Returns the broad category of this error.
	pub fn kind(&self) -> ErrorKind {
		match self {
			DccError::InsufficientData {
				..
			}
			| DccError::InvalidSignature {
				..
			}
			| DccError::InvalidConstant {
				..
			}
			| DccError::UnsupportedDirectionCount(_)
			| DccError::DirectionOutOfRange {
				..
			}
			| DccError::InvalidDirectionOffset {
				..
			}
			| DccError::BottomUpFrame {
				..
			}
			| DccError::OptionalDataUnsupported {
				..
			}
			| DccError::DimensionTooLarge {
				..
			}
			| DccError::FrameOutsideBox {
				..
			} => ErrorKind::FormatViolation,
			DccError::StreamMismatch {
				..
			} => ErrorKind::StreamAccounting,
			DccError::Bitstream {
				source,
				..
			} => match source {
				BitstreamError::OutOfBounds {
					..
				} => ErrorKind::BoundsViolation,
				BitstreamError::InvalidWidth(_) => ErrorKind::FormatViolation,
				BitstreamError::FieldOverflow {
					..
				} => ErrorKind::Encoding,
			},
			DccError::TooManyColors {
				..
			}
			| DccError::StreamTooLarge {
				..
			}
			| DccError::FrameCountMismatch {
				..
			}
			| DccError::InvalidFrame {
				..
			} => ErrorKind::Encoding,
			DccError::Asset {
				source,
				..
			} => source.kind(),
			DccError::IOError(_) => ErrorKind::Io,
		}
	}

	/// Attaches the position of the offending cell to a [`DccError::TooManyColors`].
	pub(crate) fn at_cell(self, frame: usize, cell: usize) -> Self {
		match self {
			DccError::TooManyColors {
				colors,
				..
			} => DccError::TooManyColors {
				frame,
				cell,
				colors,
			},
			other => other,
		}
	}

	/// Attaches a direction index to a bitstream error raised inside that direction.
	pub(crate) fn in_direction(self, index: usize) -> Self {
		match self {
			DccError::Bitstream {
				direction: None,
				source,
			} => DccError::Bitstream {
				direction: Some(index),
				source,
			},
			other => other,
		}
	}
}
