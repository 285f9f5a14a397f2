//! Grid partitioning of a point cloud.
//!
//! The bounding box is split into `dx * dy * dz` axis-aligned cells. Each
//! cell stores its points after quantization against the cell-local
//! coordinate frame, as parallel arrays of quantized positions and colors in
//! insertion order. The inverse operation adds the cell origin back onto the
//! dequantized local coordinates.

use log::trace;

use super::quant::{dequantize, quantize};
use super::types::{BoundingBox, CellPrecision, GridDimensions, GridPrecision, Voxel};

/// One axis-aligned sub-box of the grid with its quantized points
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridCell {
	precision: CellPrecision,
	positions: Vec<[u16; 3]>,
	colors: Vec<[u16; 3]>,
}

impl GridCell {
	/// Creates an empty cell with the given precision
	pub fn new(precision: CellPrecision) -> Self {
		Self {
			precision,
			positions: Vec::new(),
			colors: Vec::new(),
		}
	}

	/// Creates an empty cell with room for `capacity` points
	pub fn with_capacity(precision: CellPrecision, capacity: usize) -> Self {
		Self {
			precision,
			positions: Vec::with_capacity(capacity),
			colors: Vec::with_capacity(capacity),
		}
	}

	/// Quantization bit widths in effect for this cell
	pub fn precision(&self) -> CellPrecision {
		self.precision
	}

	/// Number of points stored in the cell
	pub fn len(&self) -> usize {
		self.positions.len()
	}

	/// Returns `true` if the cell holds no points
	pub fn is_empty(&self) -> bool {
		self.positions.is_empty()
	}

	/// Appends a quantized point
	pub fn push(&mut self, position: [u16; 3], color: [u16; 3]) {
		self.positions.push(position);
		self.colors.push(color);
	}

	/// Iterates over the quantized points in insertion order
	pub fn iter(&self) -> impl Iterator<Item = (&[u16; 3], &[u16; 3])> {
		self.positions.iter().zip(self.colors.iter())
	}

	/// Number of payload bytes the cell occupies on the wire
	pub fn payload_size(&self) -> usize {
		(self.len() * self.precision.bits_per_point() as usize).div_ceil(8)
	}
}

/// The ordered vector of grid cells plus the geometry that produced them
///
/// Rebuilt from scratch on every encode and repopulated from the wire on
/// every decode; owned exclusively by the codec instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloudGrid {
	bounds: Option<BoundingBox>,
	dims: Option<GridDimensions>,
	cells: Vec<GridCell>,
}

impl PointCloudGrid {
	/// Creates a grid of empty cells
	pub fn empty(bounds: BoundingBox, dims: GridDimensions) -> Self {
		Self {
			bounds: Some(bounds),
			dims: Some(dims),
			cells: vec![GridCell::default(); dims.cell_count()],
		}
	}

	/// Partitions and quantizes a cloud according to the precision descriptor
	///
	/// Points whose position falls outside the bounding box are dropped; the
	/// second return value counts them.
	pub fn build(voxels: &[Voxel], precision: &GridPrecision) -> (Self, usize) {
		let bounds = precision.bounds;
		let dims = precision.dims;
		let extent = bounds.cell_extent(dims);
		let per_axis = [usize::from(dims.x), usize::from(dims.y), usize::from(dims.z)];

		let mut cells: Vec<GridCell> =
			(0..dims.cell_count()).map(|i| GridCell::new(precision.cell(i))).collect();
		let mut dropped = 0usize;

		'voxels: for voxel in voxels {
			let mut coords = [0usize; 3];
			for axis in 0..3 {
				let relative = voxel.position[axis] - bounds.min[axis];
				let slot = if extent[axis] > 0.0 {
					(relative / extent[axis]).floor()
				} else if relative == 0.0 {
					0.0
				} else {
					-1.0
				};
				if slot < 0.0 || slot >= per_axis[axis] as f32 {
					dropped += 1;
					continue 'voxels;
				}
				coords[axis] = slot as usize;
			}

			let index = dims.linear_index(coords[0], coords[1], coords[2]);
			let cell_precision = precision.cell(index);
			let mut position = [0u16; 3];
			let mut color = [0u16; 3];
			for axis in 0..3 {
				let origin = bounds.min[axis] + coords[axis] as f32 * extent[axis];
				let local = voxel.position[axis] - origin;
				position[axis] = quantize(local, 0.0, extent[axis], cell_precision.position[axis]);
			}
			for channel in 0..3 {
				color[channel] = quantize(
					f32::from(voxel.color[channel]),
					0.0,
					255.0,
					cell_precision.color[channel],
				);
			}
			cells[index].push(position, color);
		}

		if dropped > 0 {
			trace!("dropped {dropped} points outside the bounding box");
		}

		(
			Self {
				bounds: Some(bounds),
				dims: Some(dims),
				cells,
			},
			dropped,
		)
	}

	/// Replaces the cell at the given linear index
	pub fn set_cell(&mut self, index: usize, cell: GridCell) {
		self.cells[index] = cell;
	}

	/// Bounding box of the grid, if it has been populated
	pub fn bounds(&self) -> Option<BoundingBox> {
		self.bounds
	}

	/// Dimensions of the grid, if it has been populated
	pub fn dims(&self) -> Option<GridDimensions> {
		self.dims
	}

	/// All cells in linear index order
	pub fn cells(&self) -> &[GridCell] {
		&self.cells
	}

	/// Total number of points across all cells
	pub fn point_count(&self) -> usize {
		self.cells.iter().map(GridCell::len).sum()
	}

	/// Reconstructs absolute voxels from the quantized cells
	///
	/// Output is ordered by ascending cell index, insertion order within a
	/// cell; the original cross-cell input order is not preserved.
	pub fn to_voxels(&self) -> Vec<Voxel> {
		let (Some(bounds), Some(dims)) = (self.bounds, self.dims) else {
			return Vec::new();
		};
		let extent = bounds.cell_extent(dims);

		let mut voxels = Vec::with_capacity(self.point_count());
		for (index, cell) in self.cells.iter().enumerate() {
			let (cx, cy, cz) = dims.cell_coords(index);
			let coords = [cx, cy, cz];
			let precision = cell.precision();
			for (q_position, q_color) in cell.iter() {
				let mut position = [0f32; 3];
				let mut color = [0u8; 3];
				for axis in 0..3 {
					let origin = bounds.min[axis] + coords[axis] as f32 * extent[axis];
					position[axis] = origin
						+ dequantize(
							q_position[axis],
							0.0,
							extent[axis],
							precision.position[axis],
						);
				}
				for channel in 0..3 {
					color[channel] = dequantize(
						q_color[channel],
						0.0,
						255.0,
						precision.color[channel],
					)
					.round()
					.clamp(0.0, 255.0) as u8;
				}
				voxels.push(Voxel::new(position, color));
			}
		}
		voxels
	}
}
