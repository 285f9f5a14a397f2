//! Error types for point cloud encoding and decoding.

use thiserror::Error;

/// Errors that can occur when encoding or decoding point cloud messages
#[derive(Debug, Error)]
pub enum PccError {
	/// Bit-level cursor moved past the end of its buffer
	#[error("Bit cursor out of bounds: {requested} bits requested at bit {offset}, buffer holds {capacity} bits")]
	OutOfBounds {
		/// Bit offset the cursor was at
		offset: usize,
		/// Number of bits requested
		requested: usize,
		/// Total buffer capacity in bits
		capacity: usize,
	},

	/// Not enough data to parse
	#[error("Insufficient data: expected {expected} bytes, got {actual} bytes")]
	InsufficientData {
		/// Expected number of bytes
		expected: usize,
		/// Actual number of bytes
		actual: usize,
	},

	/// Global header flag byte is neither 0 nor 1
	#[error("Invalid entropy flag byte: {0:#04X}")]
	InvalidHeaderFlag(u8),

	/// Uncompressed size recorded although entropy coding is disabled
	#[error("Uncompressed size {0} recorded but entropy coding is disabled")]
	UnexpectedUncompressedSize(u64),

	/// Grid dimensions contain a zero axis
	#[error("Invalid grid dimensions: {x}x{y}x{z}")]
	InvalidDimensions {
		/// Cell count along the x axis
		x: u8,
		/// Cell count along the y axis
		y: u8,
		/// Cell count along the z axis
		z: u8,
	},

	/// Component bit width exceeds the supported maximum
	#[error("Component bit width {0} exceeds the supported maximum of {max}", max = crate::codec::MAX_COMPONENT_BITS)]
	InvalidBitCount(u8),

	/// Blacklist longer than the total cell count
	#[error("Blacklist holds {count} entries but the grid only has {cell_count} cells")]
	BlacklistOverflow {
		/// Number of blacklist entries
		count: usize,
		/// Total number of grid cells
		cell_count: usize,
	},

	/// Blacklist entry does not name a grid cell
	#[error("Blacklist entry {index} out of range (cell count: {cell_count})")]
	BlacklistOutOfRange {
		/// Offending cell index
		index: u32,
		/// Total number of grid cells
		cell_count: usize,
	},

	/// Blacklist entries are not strictly ascending
	#[error("Blacklist not sorted: entry {current} follows {previous}")]
	BlacklistUnsorted {
		/// Entry preceding the offending one
		previous: u32,
		/// Offending entry
		current: u32,
	},

	/// Per-cell precision record count does not match the grid
	#[error("Precision record count mismatch: grid has {expected} cells, got {actual} records")]
	PrecisionCountMismatch {
		/// Number of cells in the grid
		expected: usize,
		/// Number of precision records supplied
		actual: usize,
	},

	/// Entropy decompression produced a different length than recorded
	#[error("Entropy stage size mismatch: header records {expected} bytes, inflated {actual}")]
	EntropySizeMismatch {
		/// Byte length recorded in the global header
		expected: usize,
		/// Byte length actually produced
		actual: usize,
	},

	/// Entropy compressor or decompressor reported a failure
	#[error("Entropy stage failed: {0}")]
	Entropy(#[from] std::io::Error),

	/// Caller tried to write more bytes than the appendix holds
	#[error("Appendix overflow: {requested} bytes exceed the {capacity} byte appendix")]
	AppendixOverflow {
		/// Number of bytes the caller tried to write
		requested: usize,
		/// Appendix capacity in bytes
		capacity: usize,
	},
}
