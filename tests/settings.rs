//! Settings round-trip through their JSON representation.

use pcstream_rs::prelude::*;

#[test]
fn settings_survive_a_json_round_trip() {
	let bounds = BoundingBox::new([-1.0, 0.0, 2.5], [1.0, 4.0, 3.5]);
	let dims = GridDimensions::new(3, 2, 5);
	let mut settings = EncodingSettings::uniform(bounds, dims, 11, 6).unwrap();
	settings.entropy_coding = true;
	settings.appendix_size = 64;

	let json = serde_json::to_string_pretty(&settings).unwrap();
	let restored: EncodingSettings = serde_json::from_str(&json).unwrap();
	assert_eq!(restored, settings);
}

#[test]
fn restored_settings_produce_identical_messages() {
	let bounds = BoundingBox::new([0.0; 3], [2.0; 3]);
	let dims = GridDimensions::new(2, 2, 2);
	let settings = EncodingSettings::uniform(bounds, dims, 9, 8).unwrap();
	let restored: EncodingSettings =
		serde_json::from_str(&serde_json::to_string(&settings).unwrap()).unwrap();

	let cloud = vec![
		Voxel::new([0.3, 1.1, 1.9], [250, 1, 128]),
		Voxel::new([1.5, 0.2, 0.4], [9, 90, 200]),
	];
	let mut original = Codec::new(settings);
	let mut rebuilt = Codec::new(restored);
	assert_eq!(
		original.encode(&cloud, None).unwrap(),
		rebuilt.encode(&cloud, None).unwrap()
	);
}

#[test]
fn optional_settings_default_off_when_absent() {
	let json = r#"{
		"grid": {
			"bounds": { "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 1.0] },
			"dims": { "x": 1, "y": 1, "z": 1 },
			"cells": [{ "position": [8, 8, 8], "color": [8, 8, 8] }]
		}
	}"#;
	let settings: EncodingSettings = serde_json::from_str(json).unwrap();
	assert!(!settings.entropy_coding);
	assert!(!settings.irrelevance_coding);
	assert_eq!(settings.appendix_size, 0);
	assert_eq!(settings.num_threads, 0);
}
