//! Message assembly and the codec driver.
//!
//! ## Message layout
//!
//! | Offset | Size | Section       | Description                             |
//! |--------|------|---------------|-----------------------------------------|
//! | 0x00   | 17   | Global header | Entropy flag, body length, appendix size|
//! | 0x11   | var  | Body          | Grid header, blacklist, cells           |
//! | tail   | var  | Appendix      | `appendix_size` reserved user bytes     |
//!
//! ### Global header (always plaintext)
//!
//! | Offset | Size | Field               | Description                        |
//! |--------|------|---------------------|------------------------------------|
//! | 0x00   | 1    | `entropy_coding`    | 0 or 1                             |
//! | 0x01   | 8    | `uncompressed_size` | Body length before compression, or 0|
//! | 0x09   | 8    | `appendix_size`     | Reserved tail bytes                |
//!
//! ### Grid header
//!
//! | Offset | Size | Field           | Description                           |
//! |--------|------|-----------------|---------------------------------------|
//! | 0x00   | 3    | `dx, dy, dz`    | Cells per axis, each at least 1       |
//! | 0x03   | 12   | `min`           | Bounding box minimum, three `f32`     |
//! | 0x0F   | 12   | `max`           | Bounding box maximum, three `f32`     |
//! | 0x1B   | 4    | `num_blacklist` | Empty cell count, `u32`               |
//!
//! The blacklist follows as `num_blacklist` ascending `u32` cell indices,
//! then one header and bit-packed payload per surviving cell in ascending
//! cell index order (see the cell module for their layout).

use std::borrow::Cow;
use std::time::{Duration, Instant};

use log::{debug, info};
use rayon::prelude::*;

use super::bitio::BitWriter;
use super::cell::{self, CellHeader};
use super::grid::{GridCell, PointCloudGrid};
use super::settings::EncodingSettings;
use super::stats::{DecodeLog, EncodeLog};
use super::types::{BoundingBox, GridDimensions, Voxel};
use super::{PccError, entropy};

/// Plaintext header at byte 0 of every message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalHeader {
	/// Whether the body went through the entropy stage
	pub entropy_coding: bool,
	/// Body length before compression; 0 when `entropy_coding` is false
	pub uncompressed_size: u64,
	/// Number of user-payload bytes reserved at the message tail
	pub appendix_size: u64,
}

impl GlobalHeader {
	/// Size of the header in bytes
	pub const SIZE: usize = 17;

	/// Converts the header to its wire representation
	pub fn to_bytes(&self) -> [u8; Self::SIZE] {
		let mut bytes = [0u8; Self::SIZE];
		bytes[0] = u8::from(self.entropy_coding);
		bytes[1..9].copy_from_slice(&self.uncompressed_size.to_le_bytes());
		bytes[9..17].copy_from_slice(&self.appendix_size.to_le_bytes());
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
		let entropy_coding = match data[0] {
			0 => false,
			1 => true,
			flag => return Err(PccError::InvalidHeaderFlag(flag)),
		};
		Ok(Self {
			entropy_coding,
			uncompressed_size: u64::from_le_bytes([
				data[1], data[2], data[3], data[4], data[5], data[6], data[7], data[8],
			]),
			appendix_size: u64::from_le_bytes([
				data[9], data[10], data[11], data[12], data[13], data[14], data[15], data[16],
			]),
		})
	}
}

/// First section of the message body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridHeader {
	/// Number of cells along each axis
	pub dims: GridDimensions,
	/// Region covered by the grid
	pub bounds: BoundingBox,
	/// Number of blacklist entries following the header
	pub num_blacklist: u32,
}

impl GridHeader {
	/// Size of the header in bytes
	pub const SIZE: usize = 31;

	/// Converts the header to its wire representation
	pub fn to_bytes(&self) -> [u8; Self::SIZE] {
		let mut bytes = [0u8; Self::SIZE];
		bytes[0] = self.dims.x;
		bytes[1] = self.dims.y;
		bytes[2] = self.dims.z;
		for axis in 0..3 {
			let offset = 3 + axis * 4;
			bytes[offset..offset + 4].copy_from_slice(&self.bounds.min[axis].to_le_bytes());
		}
		for axis in 0..3 {
			let offset = 15 + axis * 4;
			bytes[offset..offset + 4].copy_from_slice(&self.bounds.max[axis].to_le_bytes());
		}
		bytes[27..31].copy_from_slice(&self.num_blacklist.to_le_bytes());
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
		if data[0] == 0 || data[1] == 0 || data[2] == 0 {
			return Err(PccError::InvalidDimensions {
				x: data[0],
				y: data[1],
				z: data[2],
			});
		}
		let mut min = [0f32; 3];
		let mut max = [0f32; 3];
		for axis in 0..3 {
			let offset = 3 + axis * 4;
			min[axis] = f32::from_le_bytes([
				data[offset],
				data[offset + 1],
				data[offset + 2],
				data[offset + 3],
			]);
			let offset = 15 + axis * 4;
			max[axis] = f32::from_le_bytes([
				data[offset],
				data[offset + 1],
				data[offset + 2],
				data[offset + 3],
			]);
		}
		Ok(Self {
			dims: GridDimensions::new(data[0], data[1], data[2]),
			bounds: BoundingBox {
				min,
				max,
			},
			num_blacklist: u32::from_le_bytes([data[27], data[28], data[29], data[30]]),
		})
	}
}

/// Grid-based point cloud codec
///
/// Owns the grid and statistics of the most recent call. `encode` and
/// `decode` are blocking; one call at a time per instance (enforced by
/// `&mut self`).
#[derive(Debug, Default)]
pub struct Codec {
	settings: EncodingSettings,
	grid: PointCloudGrid,
	encode_log: EncodeLog,
	decode_log: DecodeLog,
}

impl Codec {
	/// Creates a codec from the given settings
	pub fn new(settings: EncodingSettings) -> Self {
		Self {
			settings,
			grid: PointCloudGrid::default(),
			encode_log: EncodeLog::default(),
			decode_log: DecodeLog::default(),
		}
	}

	/// Settings the codec was constructed with
	pub fn settings(&self) -> &EncodingSettings {
		&self.settings
	}

	/// Read-only view of the grid produced by the last encode or decode
	pub fn grid(&self) -> &PointCloudGrid {
		&self.grid
	}

	/// Statistics from the most recent encode call
	pub fn encode_log(&self) -> &EncodeLog {
		&self.encode_log
	}

	/// Statistics from the most recent decode call
	pub fn decode_log(&self) -> &DecodeLog {
		&self.decode_log
	}

	/// Compresses a cloud into a message
	///
	/// `num_points` limits encoding to the first n voxels; `None` encodes
	/// them all. Points outside the bounding box are dropped silently (the
	/// encode log counts them). Fails only if the entropy stage does.
	pub fn encode(
		&mut self,
		voxels: &[Voxel],
		num_points: Option<usize>,
	) -> Result<Vec<u8>, PccError> {
		let started = Instant::now();
		let taken = match num_points {
			Some(n) if n < voxels.len() => &voxels[..n],
			_ => voxels,
		};
		if self.settings.irrelevance_coding {
			debug!("irrelevance pre-filter requested; passing all {} points through", taken.len());
		}

		let (grid, dropped) = PointCloudGrid::build(taken, &self.settings.grid);
		self.grid = grid;

		// Sweep the cells once to size the body exactly before any write
		let mut blacklist: Vec<u32> = Vec::new();
		let mut point_count = 0usize;
		let mut cell_header_bytes = 0usize;
		let mut payload_bytes = 0usize;
		for (index, grid_cell) in self.grid.cells().iter().enumerate() {
			if grid_cell.is_empty() {
				blacklist.push(index as u32);
			} else {
				point_count += grid_cell.len();
				cell_header_bytes += CellHeader::SIZE;
				payload_bytes += grid_cell.payload_size();
			}
		}
		let blacklist_bytes = blacklist.len() * 4;
		let raw_size = GridHeader::SIZE + blacklist_bytes + cell_header_bytes + payload_bytes;

		let mut body = vec![0u8; raw_size];
		{
			let grid_header = GridHeader {
				dims: self.settings.grid.dims,
				bounds: self.settings.grid.bounds,
				num_blacklist: blacklist.len() as u32,
			};
			let mut writer = BitWriter::new(&mut body);
			writer.write_bytes(&grid_header.to_bytes())?;
			for index in &blacklist {
				writer.write_bytes(&index.to_le_bytes())?;
			}
			let occupied: Vec<&GridCell> =
				self.grid.cells().iter().filter(|c| !c.is_empty()).collect();
			for encoded in self.encode_cells(&occupied)? {
				writer.write_bytes(&encoded)?;
			}
		}

		let entropy_started = Instant::now();
		let (payload, uncompressed_size, entropy_time) = if self.settings.entropy_coding {
			let compressed = entropy::deflate(&body)?;
			(compressed, raw_size as u64, entropy_started.elapsed())
		} else {
			(body, 0u64, Duration::ZERO)
		};

		let appendix_size = self.settings.appendix_size as usize;
		let global_header = GlobalHeader {
			entropy_coding: self.settings.entropy_coding,
			uncompressed_size,
			appendix_size: self.settings.appendix_size,
		};
		let mut message = vec![0u8; GlobalHeader::SIZE + payload.len() + appendix_size];
		message[..GlobalHeader::SIZE].copy_from_slice(&global_header.to_bytes());
		message[GlobalHeader::SIZE..GlobalHeader::SIZE + payload.len()].copy_from_slice(&payload);
		// The appendix region stays zero-filled for the caller to overwrite

		self.encode_log = EncodeLog {
			point_count,
			dropped_points: dropped,
			blacklisted_cells: blacklist.len(),
			grid_header_bytes: GridHeader::SIZE,
			blacklist_bytes,
			cell_header_bytes,
			payload_bytes,
			raw_bytes: raw_size,
			compressed_bytes: payload.len(),
			message_bytes: message.len(),
			encode_time: started.elapsed(),
			entropy_time,
		};
		if self.settings.verbose {
			info!("{}", self.encode_log);
		} else {
			debug!(
				"encoded {point_count} points into {} bytes ({} cells blacklisted)",
				message.len(),
				blacklist.len()
			);
		}
		Ok(message)
	}

	/// Decompresses a message back into a cloud
	///
	/// Any parse error, size mismatch, entropy failure or blacklist
	/// inconsistency fails the whole call; no partial output is produced.
	pub fn decode(&mut self, message: &[u8]) -> Result<Vec<Voxel>, PccError> {
		let started = Instant::now();
		let global_header = GlobalHeader::from_bytes(message)?;
		let appendix_size = global_header.appendix_size as usize;
		let minimum = GlobalHeader::SIZE + appendix_size;
		if message.len() < minimum {
			return Err(PccError::InsufficientData {
				expected: minimum,
				actual: message.len(),
			});
		}
		let wire_body = &message[GlobalHeader::SIZE..message.len() - appendix_size];

		let entropy_started = Instant::now();
		let (body, entropy_time): (Cow<'_, [u8]>, Duration) = if global_header.entropy_coding {
			let inflated = entropy::inflate(wire_body, global_header.uncompressed_size as usize)?;
			(Cow::Owned(inflated), entropy_started.elapsed())
		} else {
			if global_header.uncompressed_size != 0 {
				return Err(PccError::UnexpectedUncompressedSize(global_header.uncompressed_size));
			}
			(Cow::Borrowed(wire_body), Duration::ZERO)
		};

		let grid_header = GridHeader::from_bytes(body.as_ref())?;
		let dims = grid_header.dims;
		let cell_count = dims.cell_count();
		let num_blacklist = grid_header.num_blacklist as usize;
		if num_blacklist > cell_count {
			return Err(PccError::BlacklistOverflow {
				count: num_blacklist,
				cell_count,
			});
		}

		let blacklist_end = GridHeader::SIZE + num_blacklist * 4;
		if body.len() < blacklist_end {
			return Err(PccError::InsufficientData {
				expected: blacklist_end,
				actual: body.len(),
			});
		}
		let mut blacklist: Vec<u32> = Vec::with_capacity(num_blacklist);
		for entry in 0..num_blacklist {
			let offset = GridHeader::SIZE + entry * 4;
			let index = u32::from_le_bytes([
				body[offset],
				body[offset + 1],
				body[offset + 2],
				body[offset + 3],
			]);
			if index as usize >= cell_count {
				return Err(PccError::BlacklistOutOfRange {
					index,
					cell_count,
				});
			}
			if let Some(&previous) = blacklist.last() {
				if index <= previous {
					return Err(PccError::BlacklistUnsorted {
						previous,
						current: index,
					});
				}
			}
			blacklist.push(index);
		}

		// Walk the surviving cells: headers are sequential, so collect the
		// payload slices first and decode them out of line
		let mut offset = blacklist_end;
		let mut pending: Vec<(usize, CellHeader, &[u8])> =
			Vec::with_capacity(cell_count - num_blacklist);
		let mut next_blacklisted = blacklist.iter().copied().peekable();
		for index in 0..cell_count {
			if next_blacklisted.peek() == Some(&(index as u32)) {
				next_blacklisted.next();
				continue;
			}
			let header = CellHeader::from_bytes(body.get(offset..).unwrap_or_default())?;
			offset += CellHeader::SIZE;
			let payload_size = header.payload_size();
			if body.len() < offset + payload_size {
				return Err(PccError::InsufficientData {
					expected: offset + payload_size,
					actual: body.len(),
				});
			}
			pending.push((index, header, &body[offset..offset + payload_size]));
			offset += payload_size;
		}

		let decoded_cells = self.decode_cells(&pending)?;
		let mut grid = PointCloudGrid::empty(grid_header.bounds, dims);
		for ((index, _, _), decoded) in pending.iter().zip(decoded_cells) {
			grid.set_cell(*index, decoded);
		}
		let voxels = grid.to_voxels();
		self.grid = grid;

		self.decode_log = DecodeLog {
			point_count: voxels.len(),
			blacklisted_cells: num_blacklist,
			raw_bytes: body.len(),
			compressed_bytes: wire_body.len(),
			message_bytes: message.len(),
			decode_time: started.elapsed(),
			entropy_time,
		};
		if self.settings.verbose {
			info!("{}", self.decode_log);
		} else {
			debug!("decoded {} points from {} bytes", voxels.len(), message.len());
		}
		Ok(voxels)
	}

	/// Copies user bytes into the reserved appendix region of a message
	///
	/// The message is left untouched when `data` exceeds the configured
	/// appendix size.
	pub fn write_appendix(&self, message: &mut [u8], data: &[u8]) -> Result<(), PccError> {
		let capacity = self.settings.appendix_size as usize;
		if data.len() > capacity {
			return Err(PccError::AppendixOverflow {
				requested: data.len(),
				capacity,
			});
		}
		let minimum = GlobalHeader::SIZE + capacity;
		if message.len() < minimum {
			return Err(PccError::InsufficientData {
				expected: minimum,
				actual: message.len(),
			});
		}
		let offset = message.len() - capacity;
		message[offset..offset + data.len()].copy_from_slice(data);
		Ok(())
	}

	/// Writes a string into the appendix region
	pub fn write_appendix_str(&self, message: &mut [u8], text: &str) -> Result<(), PccError> {
		self.write_appendix(message, text.as_bytes())
	}

	/// Returns a copy of the appendix region of a message
	pub fn read_appendix(&self, message: &[u8]) -> Result<Vec<u8>, PccError> {
		let capacity = self.settings.appendix_size as usize;
		let minimum = GlobalHeader::SIZE + capacity;
		if message.len() < minimum {
			return Err(PccError::InsufficientData {
				expected: minimum,
				actual: message.len(),
			});
		}
		Ok(message[message.len() - capacity..].to_vec())
	}

	/// Returns the appendix region as a string, truncated at the first NUL
	pub fn read_appendix_string(&self, message: &[u8]) -> Result<String, PccError> {
		let appendix = self.read_appendix(message)?;
		let end = appendix.iter().position(|&b| b == 0).unwrap_or(appendix.len());
		Ok(String::from_utf8_lossy(&appendix[..end]).into_owned())
	}

	fn encode_cells(&self, occupied: &[&GridCell]) -> Result<Vec<Vec<u8>>, PccError> {
		if self.settings.num_threads == 1 || occupied.len() < 2 {
			return occupied.iter().map(|grid_cell| cell::encode_cell(grid_cell)).collect();
		}
		let run = || occupied.par_iter().map(|grid_cell| cell::encode_cell(grid_cell)).collect();
		match rayon::ThreadPoolBuilder::new().num_threads(self.settings.num_threads).build() {
			Ok(pool) => pool.install(run),
			Err(_) => run(),
		}
	}

	fn decode_cells(
		&self,
		pending: &[(usize, CellHeader, &[u8])],
	) -> Result<Vec<GridCell>, PccError> {
		if self.settings.num_threads == 1 || pending.len() < 2 {
			return pending
				.iter()
				.map(|(_, header, payload)| cell::decode_cell(header, payload))
				.collect();
		}
		let run = || {
			pending
				.par_iter()
				.map(|(_, header, payload)| cell::decode_cell(header, payload))
				.collect()
		};
		match rayon::ThreadPoolBuilder::new().num_threads(self.settings.num_threads).build() {
			Ok(pool) => pool.install(run),
			Err(_) => run(),
		}
	}
}
