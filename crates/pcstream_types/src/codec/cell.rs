//! Per-cell wire encoding.
//!
//! Each non-empty cell contributes a fixed 10-byte header followed by its
//! bit-packed payload:
//!
//! | Offset | Size | Field          | Description                          |
//! |--------|------|----------------|--------------------------------------|
//! | 0      | 1    | `px`           | Bit width of the x position component|
//! | 1      | 1    | `py`           | Bit width of the y position component|
//! | 2      | 1    | `pz`           | Bit width of the z position component|
//! | 3      | 1    | `cx`           | Bit width of the r color channel     |
//! | 4      | 1    | `cy`           | Bit width of the g color channel     |
//! | 5      | 1    | `cz`           | Bit width of the b color channel     |
//! | 6      | 4    | `num_elements` | Point count, little-endian `u32`     |
//!
//! The payload holds `num_elements` records of `px+py+pz+cx+cy+cz` bits,
//! components in header order, zero-width components omitted. The stream
//! rounds up to the next byte boundary after the payload, so every cell
//! starts byte-aligned. The cell index is not on the wire; it is implied by
//! the blacklist-adjusted position of the cell in the message.

use super::bitio::{BitReader, BitWriter};
use super::grid::GridCell;
use super::types::CellPrecision;
use super::{MAX_COMPONENT_BITS, PccError};

/// Fixed-size header preceding each non-empty cell on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellHeader {
	/// Quantization bit widths of the cell
	pub precision: CellPrecision,
	/// Number of points in the cell payload
	pub num_elements: u32,
}

impl CellHeader {
	/// Size of the header in bytes
	pub const SIZE: usize = 10;

	/// Total number of payload bits one point occupies
	pub fn bits_per_point(&self) -> u32 {
		self.precision.bits_per_point()
	}

	/// Number of payload bytes following the header, rounded up to whole bytes
	pub fn payload_size(&self) -> usize {
		(self.num_elements as usize * self.bits_per_point() as usize).div_ceil(8)
	}

	/// Number of bytes header and payload occupy together
	pub fn encoded_size(&self) -> usize {
		Self::SIZE + self.payload_size()
	}

	/// Converts the header to its wire representation
	pub fn to_bytes(&self) -> [u8; Self::SIZE] {
		let mut bytes = [0u8; Self::SIZE];
		bytes[0..3].copy_from_slice(&self.precision.position);
		bytes[3..6].copy_from_slice(&self.precision.color);
		bytes[6..10].copy_from_slice(&self.num_elements.to_le_bytes());
		bytes
	}

	/// Parses a header from the start of the given byte slice
	pub fn from_bytes(data: &[u8]) -> Result<Self, PccError> {
		if data.len() < Self::SIZE {
			return Err(PccError::InsufficientData {
				expected: Self::SIZE,
				actual: data.len(),
			});
		}
		for &bits in &data[0..6] {
			if bits > MAX_COMPONENT_BITS {
				return Err(PccError::InvalidBitCount(bits));
			}
		}
		Ok(Self {
			precision: CellPrecision {
				position: [data[0], data[1], data[2]],
				color: [data[3], data[4], data[5]],
			},
			num_elements: u32::from_le_bytes([data[6], data[7], data[8], data[9]]),
		})
	}
}

/// Serializes one cell into an exactly-sized buffer of header plus payload
pub fn encode_cell(cell: &GridCell) -> Result<Vec<u8>, PccError> {
	let header = CellHeader {
		precision: cell.precision(),
		num_elements: cell.len() as u32,
	};
	let precision = cell.precision();
	let mut buf = vec![0u8; header.encoded_size()];
	let mut writer = BitWriter::new(&mut buf);
	writer.write_bytes(&header.to_bytes())?;
	for (position, color) in cell.iter() {
		for axis in 0..3 {
			writer.write_bits(u64::from(position[axis]), u32::from(precision.position[axis]))?;
		}
		for channel in 0..3 {
			writer.write_bits(u64::from(color[channel]), u32::from(precision.color[channel]))?;
		}
	}
	Ok(buf)
}

/// Reconstructs a cell from its parsed header and payload bytes
pub fn decode_cell(header: &CellHeader, payload: &[u8]) -> Result<GridCell, PccError> {
	let precision = header.precision;
	let mut cell = GridCell::with_capacity(precision, header.num_elements as usize);
	let mut reader = BitReader::new(payload);
	for _ in 0..header.num_elements {
		let mut position = [0u16; 3];
		let mut color = [0u16; 3];
		for axis in 0..3 {
			position[axis] = reader.read_bits(u32::from(precision.position[axis]))? as u16;
		}
		for channel in 0..3 {
			color[channel] = reader.read_bits(u32::from(precision.color[channel]))? as u16;
		}
		cell.push(position, color);
	}
	Ok(cell)
}
