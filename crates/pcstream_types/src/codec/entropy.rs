//! Optional zlib entropy stage.
//!
//! The grid header, blacklist and cell sections of a message can be run
//! through a general-purpose deflate pass after serialization. The stage is a
//! thin facade; a compressor or decompressor failure is fatal to the whole
//! encode or decode call.

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

use super::PccError;

/// Compresses the serialized message body
pub fn deflate(data: &[u8]) -> Result<Vec<u8>, PccError> {
	let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 2), Compression::default());
	encoder.write_all(data)?;
	Ok(encoder.finish()?)
}

/// Decompresses a message body into exactly `expected_len` bytes
pub fn inflate(data: &[u8], expected_len: usize) -> Result<Vec<u8>, PccError> {
	let mut out = Vec::with_capacity(expected_len);
	ZlibDecoder::new(data).read_to_end(&mut out)?;
	if out.len() != expected_len {
		return Err(PccError::EntropySizeMismatch {
			expected: expected_len,
			actual: out.len(),
		});
	}
	Ok(out)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_round_trip() {
		let data: Vec<u8> = (0..2048u32).map(|i| (i % 7) as u8).collect();
		let compressed = deflate(&data).unwrap();
		assert!(compressed.len() < data.len());
		assert_eq!(inflate(&compressed, data.len()).unwrap(), data);
	}

	#[test]
	fn test_length_mismatch_is_an_error() {
		let compressed = deflate(&[1, 2, 3]).unwrap();
		assert!(matches!(
			inflate(&compressed, 5),
			Err(PccError::EntropySizeMismatch {
				expected: 5,
				actual: 3
			})
		));
	}

	#[test]
	fn test_garbage_input_fails() {
		assert!(inflate(&[0xDE, 0xAD, 0xBE, 0xEF], 16).is_err());
	}
}
