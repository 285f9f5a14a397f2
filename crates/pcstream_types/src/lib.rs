//! Core data types and codec support for the `pcstream-rs` project.
//!
//! The crate implements a lossy compression scheme for colored 3D point
//! clouds: a bounded region is partitioned into a regular grid of cells, the
//! points inside each cell are quantized to a cell-local integer lattice with
//! per-cell configurable bit-widths, and the result is serialized as a
//! compact bitstream, optionally post-processed by a zlib entropy pass.
//!
//! # Examples
//!
//! ```rust
//! use pcstream_types::prelude::*;
//!
//! let bounds = BoundingBox::new([0.0; 3], [10.0; 3]);
//! let dims = GridDimensions::new(4, 4, 4);
//! let settings = EncodingSettings::uniform(bounds, dims, 10, 8).unwrap();
//!
//! let cloud = vec![
//!     Voxel::new([1.0, 2.0, 3.0], [200, 100, 50]),
//!     Voxel::new([9.0, 8.0, 7.0], [10, 20, 30]),
//! ];
//!
//! let mut codec = Codec::new(settings);
//! let message = codec.encode(&cloud, None).unwrap();
//! let decoded = codec.decode(&message).unwrap();
//! assert_eq!(decoded.len(), cloud.len());
//! ```

pub mod codec;

/// `use pcstream_types::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export commonly used types at crate root for convenience
pub use codec::{
	BoundingBox, CellPrecision, Codec, DecodeLog, EncodeLog, EncodingSettings, GridCell,
	GridDimensions, GridPrecision, MAX_COMPONENT_BITS, PccError, PointCloudGrid, Voxel,
};
