//! End-to-end round-trip properties on randomized clouds.

use pcstream_rs::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const BOX_MAX: f32 = 10.0;

fn random_cloud(rng: &mut SmallRng, count: usize) -> Vec<Voxel> {
	(0..count)
		.map(|_| {
			Voxel::new(
				[
					rng.random_range(0.0..BOX_MAX),
					rng.random_range(0.0..BOX_MAX),
					rng.random_range(0.0..BOX_MAX),
				],
				[rng.random(), rng.random(), rng.random()],
			)
		})
		.collect()
}

fn test_settings(dims: GridDimensions, position_bits: u8) -> EncodingSettings {
	let bounds = BoundingBox::new([0.0; 3], [BOX_MAX; 3]);
	EncodingSettings::uniform(bounds, dims, position_bits, 8).unwrap()
}

#[test]
fn reconstruction_error_stays_within_the_quantization_step() {
	let mut rng = SmallRng::seed_from_u64(7);
	let cloud = random_cloud(&mut rng, 2000);
	let dims = GridDimensions::new(8, 8, 8);
	let position_bits = 10;
	let mut codec = Codec::new(test_settings(dims, position_bits));

	let message = codec.encode(&cloud, None).unwrap();
	let decoded = codec.decode(&message).unwrap();
	assert_eq!(decoded.len(), cloud.len());

	// Per-axis bound: cell extent divided by the quantization levels
	let step = (BOX_MAX / 8.0) / (1u32 << position_bits) as f32;
	for original in &cloud {
		let chebyshev = |candidate: &Voxel| {
			(0..3)
				.map(|axis| (candidate.position[axis] - original.position[axis]).abs())
				.fold(0.0f32, f32::max)
		};
		let best = decoded.iter().map(chebyshev).fold(f32::INFINITY, f32::min);
		assert!(best <= step, "no reconstruction within {step} of {:?}", original.position);
	}
}

#[test]
fn out_of_box_points_are_dropped_and_the_rest_conserved() {
	let mut rng = SmallRng::seed_from_u64(11);
	let mut cloud = random_cloud(&mut rng, 500);
	for i in 0..50 {
		let mut stray = cloud[i];
		stray.position[i % 3] += BOX_MAX * 2.0;
		cloud.push(stray);
	}

	let mut codec = Codec::new(test_settings(GridDimensions::new(4, 4, 4), 8));
	let message = codec.encode(&cloud, None).unwrap();
	assert_eq!(codec.encode_log().point_count, 500);
	assert_eq!(codec.encode_log().dropped_points, 50);

	let decoded = codec.decode(&message).unwrap();
	assert_eq!(decoded.len(), 500);
	let bounds = BoundingBox::new([0.0; 3], [BOX_MAX; 3]);
	assert!(decoded.iter().all(|v| bounds.contains(v.position)));
}

#[test]
fn empty_cells_and_only_empty_cells_are_blacklisted() {
	let mut rng = SmallRng::seed_from_u64(13);
	// A sparse cloud so plenty of cells stay empty
	let cloud = random_cloud(&mut rng, 30);
	let mut encoder = Codec::new(test_settings(GridDimensions::new(6, 6, 6), 8));
	let message = encoder.encode(&cloud, None).unwrap();

	let mut decoder = Codec::new(EncodingSettings::default());
	decoder.decode(&message).unwrap();

	let encoded_empty: Vec<bool> = encoder.grid().cells().iter().map(GridCell::is_empty).collect();
	let decoded_empty: Vec<bool> = decoder.grid().cells().iter().map(GridCell::is_empty).collect();
	assert_eq!(encoded_empty, decoded_empty);
	assert_eq!(
		encoder.encode_log().blacklisted_cells,
		encoded_empty.iter().filter(|&&e| e).count()
	);
}

#[test]
fn entropy_coding_changes_the_wire_but_not_the_cloud() {
	let mut rng = SmallRng::seed_from_u64(17);
	let cloud = random_cloud(&mut rng, 1500);

	let mut plain = Codec::new(test_settings(GridDimensions::new(4, 4, 4), 12));
	let mut entropy_settings = test_settings(GridDimensions::new(4, 4, 4), 12);
	entropy_settings.entropy_coding = true;
	let mut compressed = Codec::new(entropy_settings);

	let plain_message = plain.encode(&cloud, None).unwrap();
	let compressed_message = compressed.encode(&cloud, None).unwrap();
	assert_eq!(
		plain.decode(&plain_message).unwrap(),
		compressed.decode(&compressed_message).unwrap()
	);
	assert!(compressed.encode_log().raw_bytes > 0);
	assert_eq!(compressed.encode_log().raw_bytes, plain.encode_log().compressed_bytes);
}

#[test]
fn parallel_and_serial_codecs_agree_bit_for_bit() {
	let mut rng = SmallRng::seed_from_u64(19);
	let cloud = random_cloud(&mut rng, 3000);

	let mut serial = Codec::new(test_settings(GridDimensions::new(5, 5, 5), 10));
	let mut threaded_settings = test_settings(GridDimensions::new(5, 5, 5), 10);
	threaded_settings.num_threads = 0; // let the pool decide
	let mut threaded = Codec::new(threaded_settings);

	let serial_message = serial.encode(&cloud, None).unwrap();
	let threaded_message = threaded.encode(&cloud, None).unwrap();
	assert_eq!(serial_message, threaded_message);
	assert_eq!(
		serial.decode(&serial_message).unwrap(),
		threaded.decode(&threaded_message).unwrap()
	);
}

#[test]
fn encoding_is_idempotent_over_a_decode() {
	let mut rng = SmallRng::seed_from_u64(23);
	let cloud = random_cloud(&mut rng, 400);
	let mut codec = Codec::new(test_settings(GridDimensions::new(3, 3, 3), 9));

	let first = codec.encode(&cloud, None).unwrap();
	let decoded = codec.decode(&first).unwrap();
	let second = codec.encode(&decoded, None).unwrap();
	assert_eq!(first, second);
}
