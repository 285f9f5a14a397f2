//! Codec configuration.

use serde::{Deserialize, Serialize};

use super::PccError;
use super::types::{BoundingBox, CellPrecision, GridDimensions, GridPrecision};

/// Everything a [`super::Codec`] needs to know besides the points themselves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodingSettings {
	/// Grid geometry and per-cell quantization widths
	pub grid: GridPrecision,

	/// Emit per-call summaries through the logging facade
	///
	/// Diagnostics only; the flag is not part of the wire format.
	#[serde(default)]
	pub verbose: bool,

	/// Advisory worker count for the per-cell encode and decode fan-out
	///
	/// `1` forces the serial path, `0` lets the thread pool pick. Both paths
	/// produce bit-identical output.
	#[serde(default)]
	pub num_threads: usize,

	/// Advisory statistics-gathering pre-filter
	///
	/// The filter itself lives outside the codec; this build passes all
	/// points through unchanged.
	#[serde(default)]
	pub irrelevance_coding: bool,

	/// Run the serialized body through the zlib entropy stage
	#[serde(default)]
	pub entropy_coding: bool,

	/// Number of user-payload bytes reserved at the tail of every message
	#[serde(default)]
	pub appendix_size: u64,
}

impl EncodingSettings {
	/// Creates settings with one uniform precision for every cell and all
	/// optional features disabled
	pub fn uniform(
		bounds: BoundingBox,
		dims: GridDimensions,
		position_bits: u8,
		color_bits: u8,
	) -> Result<Self, PccError> {
		Ok(Self {
			grid: GridPrecision::uniform(
				bounds,
				dims,
				CellPrecision::symmetric(position_bits, color_bits),
			)?,
			verbose: false,
			num_threads: 1,
			irrelevance_coding: false,
			entropy_coding: false,
			appendix_size: 0,
		})
	}
}

impl Default for EncodingSettings {
	fn default() -> Self {
		let bounds = BoundingBox::new([0.0; 3], [1.0; 3]);
		let dims = GridDimensions::new(1, 1, 1);
		Self {
			grid: GridPrecision::uniform(bounds, dims, CellPrecision::symmetric(8, 8))
				.unwrap_or_else(|_| unreachable!("8-bit uniform precision is always valid")),
			verbose: false,
			num_threads: 1,
			irrelevance_coding: false,
			entropy_coding: false,
			appendix_size: 0,
		}
	}
}
