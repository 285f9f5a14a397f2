//! Per-call codec statistics.
//!
//! Populated as a side effect of every encode and decode and exposed through
//! read-only accessors on the codec. Useful for tuning grid resolution and
//! judging whether the entropy stage pays for itself on a given cloud.

use std::fmt::Display;
use std::time::Duration;

/// Statistics from the most recent encode call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodeLog {
	/// Points accepted into the message
	pub point_count: usize,
	/// Points dropped for lying outside the bounding box
	pub dropped_points: usize,
	/// Cells with no points, omitted from the payload
	pub blacklisted_cells: usize,
	/// Grid header bytes
	pub grid_header_bytes: usize,
	/// Blacklist bytes
	pub blacklist_bytes: usize,
	/// Total cell header bytes
	pub cell_header_bytes: usize,
	/// Total bit-packed payload bytes
	pub payload_bytes: usize,
	/// Serialized body size before the entropy stage
	pub raw_bytes: usize,
	/// Body size on the wire (equals `raw_bytes` when entropy is off)
	pub compressed_bytes: usize,
	/// Full message size including global header and appendix
	pub message_bytes: usize,
	/// Wall time of the whole encode call
	pub encode_time: Duration,
	/// Wall time spent in the entropy stage
	pub entropy_time: Duration,
}

impl Display for EncodeLog {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"EncodeLog:\n\
			- Points: {} ({} dropped)\n\
			- Blacklisted Cells: {}\n\
			- Sections: grid header {} B, blacklist {} B, cell headers {} B, payload {} B\n\
			- Body: {} B raw, {} B on wire\n\
			- Message: {} B\n\
			- Time: {:?} total, {:?} entropy",
			self.point_count,
			self.dropped_points,
			self.blacklisted_cells,
			self.grid_header_bytes,
			self.blacklist_bytes,
			self.cell_header_bytes,
			self.payload_bytes,
			self.raw_bytes,
			self.compressed_bytes,
			self.message_bytes,
			self.encode_time,
			self.entropy_time,
		)
	}
}

/// Statistics from the most recent decode call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeLog {
	/// Points reconstructed from the message
	pub point_count: usize,
	/// Cells listed in the blacklist
	pub blacklisted_cells: usize,
	/// Body size after entropy decompression
	pub raw_bytes: usize,
	/// Body size on the wire
	pub compressed_bytes: usize,
	/// Full message size including global header and appendix
	pub message_bytes: usize,
	/// Wall time of the whole decode call
	pub decode_time: Duration,
	/// Wall time spent in the entropy stage
	pub entropy_time: Duration,
}

impl Display for DecodeLog {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"DecodeLog:\n\
			- Points: {}\n\
			- Blacklisted Cells: {}\n\
			- Body: {} B on wire, {} B raw\n\
			- Message: {} B\n\
			- Time: {:?} total, {:?} entropy",
			self.point_count,
			self.blacklisted_cells,
			self.compressed_bytes,
			self.raw_bytes,
			self.message_bytes,
			self.decode_time,
			self.entropy_time,
		)
	}
}
