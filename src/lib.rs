//! `pcstream-rs` compresses and decompresses colored 3D point clouds for
//! transport over a message-bus connection.
//!
//! The heavy lifting lives in the [`pcstream_types`] crate; this facade
//! re-exports it so applications depend on a single package.
//!
//! # Examples
//!
//! ```rust
//! use pcstream_rs::prelude::*;
//!
//! let bounds = BoundingBox::new([0.0; 3], [1.0; 3]);
//! let dims = GridDimensions::new(2, 2, 2);
//! let settings = EncodingSettings::uniform(bounds, dims, 8, 8).unwrap();
//! let mut codec = Codec::new(settings);
//!
//! let cloud = vec![Voxel::new([0.25, 0.5, 0.75], [255, 0, 0])];
//! let message = codec.encode(&cloud, None).unwrap();
//! let decoded = codec.decode(&message).unwrap();
//! assert_eq!(decoded.len(), 1);
//! ```

pub use pcstream_types::*;
