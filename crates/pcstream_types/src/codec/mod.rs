//! Grid-based point cloud codec.
//!
//! A point cloud message is laid out as follows, from byte 0. All multi-byte
//! integers and floats are little-endian.
//!
//! | Section       | Size                     | Notes                                  |
//! |---------------|--------------------------|----------------------------------------|
//! | Global header | 17 bytes                 | Always plaintext                       |
//! | Grid header   | 31 bytes                 | Entropy-compressed when enabled        |
//! | Blacklist     | 4 bytes per empty cell   | Ascending `u32` cell indices           |
//! | Cells         | variable                 | Header + bit-packed payload per cell   |
//! | Appendix      | `appendix_size` bytes    | Always plaintext, zero-filled by encode|
//!
//! When entropy coding is enabled the grid header, blacklist and cell
//! sections are concatenated, run through zlib, and replaced on the wire by
//! the compressed bytes; the global header records the original length so
//! the decoder can allocate exactly.

mod bitio;
mod cell;
mod entropy;
mod error;
mod grid;
mod message;
mod quant;
mod settings;
mod stats;
mod types;


pub use bitio::{BitReader, BitWriter};
pub use cell::CellHeader;
pub use error::PccError;
pub use grid::{GridCell, PointCloudGrid};
pub use message::{Codec, GlobalHeader, GridHeader};
pub use quant::{dequantize, quantize, step_size};
pub use settings::EncodingSettings;
pub use stats::{DecodeLog, EncodeLog};
pub use types::{BoundingBox, CellPrecision, GridDimensions, GridPrecision, Voxel};

/// Maximum number of bits a single quantized component may occupy on the wire.
pub const MAX_COMPONENT_BITS: u8 = 16;
