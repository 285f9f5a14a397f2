//! Scalar quantization against a known interval.
//!
//! Positions are quantized against their cell-local interval `[0, extent]`,
//! colors always against `[0, 255]`. Reconstruction uses the midpoint of the
//! selected quantization bin, so the per-component error is bounded by
//! `(hi - lo) / 2^bits`.

use super::MAX_COMPONENT_BITS;

/// Maps a value in `[lo, hi]` to an unsigned integer of the given bit width
///
/// Values outside the interval clamp to the nearest representable level. A
/// width of 0 always produces 0 (the component is omitted from the wire).
pub fn quantize(value: f32, lo: f32, hi: f32, bits: u8) -> u16 {
	debug_assert!(bits <= MAX_COMPONENT_BITS);
	if bits == 0 {
		return 0;
	}
	let span = hi - lo;
	if span <= 0.0 {
		return 0;
	}
	let levels = 1u32 << bits;
	let scaled = ((value - lo) / span * levels as f32).floor();
	(scaled as i64).clamp(0, i64::from(levels) - 1) as u16
}

/// Inverse of [`quantize`]: midpoint of the selected quantization bin
///
/// A width of 0 reconstructs to the interval midpoint regardless of `q`.
pub fn dequantize(q: u16, lo: f32, hi: f32, bits: u8) -> f32 {
	debug_assert!(bits <= MAX_COMPONENT_BITS);
	let span = hi - lo;
	if bits == 0 {
		return lo + span * 0.5;
	}
	let levels = (1u32 << bits) as f32;
	lo + (f32::from(q) + 0.5) / levels * span
}

/// Width of one quantization bin, the per-component reconstruction loss bound
pub fn step_size(lo: f32, hi: f32, bits: u8) -> f32 {
	debug_assert!(bits <= MAX_COMPONENT_BITS);
	if bits == 0 {
		return (hi - lo) * 0.5;
	}
	(hi - lo) / (1u32 << bits) as f32
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_round_trip_error_bound() {
		let (lo, hi, bits) = (-2.0f32, 6.0f32, 10u8);
		let step = step_size(lo, hi, bits);
		for i in 0..=100 {
			let value = lo + (hi - lo) * (i as f32 / 100.0);
			let reconstructed = dequantize(quantize(value, lo, hi, bits), lo, hi, bits);
			assert!((reconstructed - value).abs() <= step, "value {value} off by more than {step}");
		}
	}

	#[test]
	fn test_clamps_at_interval_ends() {
		assert_eq!(quantize(1.0, 0.0, 1.0, 8), 255);
		assert_eq!(quantize(2.5, 0.0, 1.0, 8), 255);
		assert_eq!(quantize(-0.5, 0.0, 1.0, 8), 0);
	}

	#[test]
	fn test_zero_width_uses_midpoint() {
		assert_eq!(quantize(0.7, 0.0, 1.0, 0), 0);
		assert_eq!(dequantize(0, 0.0, 1.0, 0), 0.5);
		assert_eq!(dequantize(0, 0.0, 255.0, 0), 127.5);
	}

	#[test]
	fn test_degenerate_interval() {
		assert_eq!(quantize(3.0, 3.0, 3.0, 8), 0);
		let reconstructed = dequantize(0, 3.0, 3.0, 8);
		assert_eq!(reconstructed, 3.0);
	}

	#[test]
	fn test_sixteen_bit_range() {
		assert_eq!(quantize(1.0, 0.0, 1.0, 16), u16::MAX);
		let step = step_size(0.0, 1.0, 16);
		let reconstructed = dequantize(u16::MAX, 0.0, 1.0, 16);
		assert!((reconstructed - 1.0).abs() <= step);
	}

	#[test]
	fn test_color_channel_identity() {
		// An 8-bit channel quantized with 8 bits survives the round trip
		for channel in [0u8, 1, 127, 128, 254, 255] {
			let q = quantize(f32::from(channel), 0.0, 255.0, 8);
			let reconstructed = dequantize(q, 0.0, 255.0, 8).round().clamp(0.0, 255.0) as u8;
			assert_eq!(reconstructed, channel);
		}
	}
}
