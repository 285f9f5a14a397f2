//! Geometry and precision types for the point cloud codec.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::{MAX_COMPONENT_BITS, PccError};

/// A single point with position and color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Voxel {
	/// Position in world coordinates
	pub position: [f32; 3],
	/// RGB color, one byte per channel
	pub color: [u8; 3],
}

impl Voxel {
	/// Creates a voxel from a position and an RGB color
	pub fn new(position: [f32; 3], color: [u8; 3]) -> Self {
		Self {
			position,
			color,
		}
	}
}

/// Axis-aligned bounding box delimiting the encodable region
///
/// `min[i] <= max[i]` must hold per axis; points outside the box are dropped
/// during grid construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
	/// Minimum corner
	pub min: [f32; 3],
	/// Maximum corner
	pub max: [f32; 3],
}

impl BoundingBox {
	/// Creates a bounding box from two corner points
	pub fn new(min: [f32; 3], max: [f32; 3]) -> Self {
		debug_assert!(
			min.iter().zip(max.iter()).all(|(lo, hi)| lo <= hi),
			"bounding box corners are swapped"
		);
		Self {
			min,
			max,
		}
	}

	/// Returns the edge lengths of the box
	pub fn extent(&self) -> [f32; 3] {
		[
			self.max[0] - self.min[0],
			self.max[1] - self.min[1],
			self.max[2] - self.min[2],
		]
	}

	/// Returns the edge lengths of a single grid cell
	pub fn cell_extent(&self, dims: GridDimensions) -> [f32; 3] {
		let extent = self.extent();
		[
			extent[0] / f32::from(dims.x),
			extent[1] / f32::from(dims.y),
			extent[2] / f32::from(dims.z),
		]
	}

	/// Returns `true` if the point lies inside the box (inclusive on both ends)
	pub fn contains(&self, point: [f32; 3]) -> bool {
		(0..3).all(|axis| point[axis] >= self.min[axis] && point[axis] <= self.max[axis])
	}
}

impl Display for BoundingBox {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"[{}, {}, {}] .. [{}, {}, {}]",
			self.min[0], self.min[1], self.min[2], self.max[0], self.max[1], self.max[2]
		)
	}
}

/// Number of grid cells along each axis
///
/// Each count must be at least 1. Cells are addressed by a linear index
/// `i = x + dx * (y + dy * z)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridDimensions {
	/// Cell count along the x axis
	pub x: u8,
	/// Cell count along the y axis
	pub y: u8,
	/// Cell count along the z axis
	pub z: u8,
}

impl GridDimensions {
	/// Creates grid dimensions from per-axis cell counts
	pub fn new(x: u8, y: u8, z: u8) -> Self {
		debug_assert!(x >= 1 && y >= 1 && z >= 1, "grid dimensions must be at least 1");
		Self {
			x,
			y,
			z,
		}
	}

	/// Total number of cells in the grid
	pub fn cell_count(&self) -> usize {
		usize::from(self.x) * usize::from(self.y) * usize::from(self.z)
	}

	/// Linear index of the cell at the given per-axis coordinates
	pub fn linear_index(&self, x: usize, y: usize, z: usize) -> usize {
		x + usize::from(self.x) * (y + usize::from(self.y) * z)
	}

	/// Per-axis coordinates of the cell with the given linear index
	pub fn cell_coords(&self, index: usize) -> (usize, usize, usize) {
		let dx = usize::from(self.x);
		let dy = usize::from(self.y);
		(index % dx, (index / dx) % dy, index / (dx * dy))
	}
}

impl Display for GridDimensions {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}x{}x{}", self.x, self.y, self.z)
	}
}

/// Per-cell quantization bit widths
///
/// Six values in `[0, 16]`: three for the position components, three for the
/// color channels. A width of 0 omits the component from the wire entirely;
/// the decoder substitutes the cell-box midpoint (position) or 128 (color).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CellPrecision {
	/// Bit widths for the x, y and z position components
	pub position: [u8; 3],
	/// Bit widths for the r, g and b color channels
	pub color: [u8; 3],
}

impl CellPrecision {
	/// Creates a precision record using one width for all position components
	/// and one for all color channels
	pub fn symmetric(position_bits: u8, color_bits: u8) -> Self {
		Self {
			position: [position_bits; 3],
			color: [color_bits; 3],
		}
	}

	/// Total number of payload bits one point occupies under this precision
	pub fn bits_per_point(&self) -> u32 {
		self.position.iter().chain(self.color.iter()).map(|&b| u32::from(b)).sum()
	}

	/// Checks that every component width fits the wire format
	pub fn validate(&self) -> Result<(), PccError> {
		for &bits in self.position.iter().chain(self.color.iter()) {
			if bits > MAX_COMPONENT_BITS {
				return Err(PccError::InvalidBitCount(bits));
			}
		}
		Ok(())
	}
}

/// Bounding box, grid dimensions and one precision record per cell
///
/// This is the full description of how a cloud is partitioned and quantized;
/// everything the encoder needs besides the points themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridPrecision {
	/// Region covered by the grid
	pub bounds: BoundingBox,
	/// Number of cells along each axis
	pub dims: GridDimensions,
	cells: Vec<CellPrecision>,
}

impl GridPrecision {
	/// Creates a descriptor using the same precision for every cell
	pub fn uniform(
		bounds: BoundingBox,
		dims: GridDimensions,
		precision: CellPrecision,
	) -> Result<Self, PccError> {
		precision.validate()?;
		Ok(Self {
			bounds,
			dims,
			cells: vec![precision; dims.cell_count()],
		})
	}

	/// Creates a descriptor from one precision record per cell, in linear
	/// cell index order
	pub fn per_cell(
		bounds: BoundingBox,
		dims: GridDimensions,
		cells: Vec<CellPrecision>,
	) -> Result<Self, PccError> {
		if cells.len() != dims.cell_count() {
			return Err(PccError::PrecisionCountMismatch {
				expected: dims.cell_count(),
				actual: cells.len(),
			});
		}
		for precision in &cells {
			precision.validate()?;
		}
		Ok(Self {
			bounds,
			dims,
			cells,
		})
	}

	/// Precision record of the cell with the given linear index
	pub fn cell(&self, index: usize) -> CellPrecision {
		self.cells[index]
	}

	/// All precision records in linear cell index order
	pub fn cell_precisions(&self) -> &[CellPrecision] {
		&self.cells
	}
}
