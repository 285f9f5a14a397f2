//! Prelude module for `pcstream_types`.
//!
//! This module provides a convenient way to import commonly used types and
//! constants.
//!
//! # Examples
//!
//! ```rust
//! use pcstream_types::prelude::*;
//!
//! let bounds = BoundingBox::new([0.0; 3], [1.0; 3]);
//! let dims = GridDimensions::new(1, 1, 1);
//! let settings = EncodingSettings::uniform(bounds, dims, 8, 8).unwrap();
//! let codec = Codec::new(settings);
//! ```

#[doc(inline)]
pub use crate::codec::{
	// Constants
	MAX_COMPONENT_BITS,

	// Geometry and precision types
	BoundingBox,
	CellPrecision,
	GridDimensions,
	GridPrecision,

	// Codec types
	Codec,
	EncodingSettings,
	PccError,

	// Grid types
	GridCell,
	PointCloudGrid,
	Voxel,

	// Statistics
	DecodeLog,
	EncodeLog,
};

// Re-export the codec module for advanced usage
#[doc(inline)]
pub use crate::codec;
