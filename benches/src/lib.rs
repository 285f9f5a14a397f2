//! Benchmark helper utilities for pcstream-rs
//!
//! This module provides synthetic point cloud generation and common settings
//! for the benchmark suite. Clouds are seeded so every run measures the same
//! workload.

use pcstream_types::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Edge length of the cubic region benchmark clouds fill
pub const REGION_EXTENT: f32 = 10.0;

/// Generates a reproducible random cloud with the given point count
pub fn generate_cloud(count: usize, seed: u64) -> Vec<Voxel> {
	let mut rng = SmallRng::seed_from_u64(seed);
	(0..count)
		.map(|_| {
			Voxel::new(
				[
					rng.random_range(0.0..REGION_EXTENT),
					rng.random_range(0.0..REGION_EXTENT),
					rng.random_range(0.0..REGION_EXTENT),
				],
				[rng.random(), rng.random(), rng.random()],
			)
		})
		.collect()
}

/// Uniform codec settings over the benchmark region
pub fn bench_settings(dims: GridDimensions, entropy_coding: bool) -> EncodingSettings {
	let bounds = BoundingBox::new([0.0; 3], [REGION_EXTENT; 3]);
	let mut settings = EncodingSettings::uniform(bounds, dims, 10, 8)
		.unwrap_or_else(|_| unreachable!("10-bit uniform precision is always valid"));
	settings.entropy_coding = entropy_coding;
	settings
}

/// Common cloud sizes for the benchmark suite
pub mod sizes {
	/// Tiny cloud: 1,000 points
	pub const TINY: usize = 1_000;
	/// Small cloud: 10,000 points
	pub const SMALL: usize = 10_000;
	/// Medium cloud: 100,000 points, a typical sensor frame
	pub const MEDIUM: usize = 100_000;
	/// Large cloud: 500,000 points
	pub const LARGE: usize = 500_000;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_generate_cloud_is_reproducible() {
		let a = generate_cloud(128, 7);
		let b = generate_cloud(128, 7);
		assert_eq!(a, b);
		assert_eq!(a.len(), 128);
	}
}
