//! Benchmark suite for point cloud encoding and decoding
//!
//! Measures the grid build, bit-packing and entropy stages across cloud
//! sizes, and decode throughput on the resulting messages.
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use pcstream_benches::{bench_settings, generate_cloud, sizes};
use pcstream_types::prelude::*;
use std::hint::black_box;

fn bench_encode(c: &mut Criterion) {
	let mut group = c.benchmark_group("encode");

	for &count in &[sizes::TINY, sizes::SMALL, sizes::MEDIUM] {
		let cloud = generate_cloud(count, 42);
		group.throughput(Throughput::Elements(count as u64));

		group.bench_with_input(BenchmarkId::new("plain", count), &cloud, |b, cloud| {
			let mut codec = Codec::new(bench_settings(GridDimensions::new(8, 8, 8), false));
			b.iter(|| {
				let message = codec.encode(black_box(cloud), None).unwrap();
				black_box(message)
			});
		});

		group.bench_with_input(BenchmarkId::new("entropy", count), &cloud, |b, cloud| {
			let mut codec = Codec::new(bench_settings(GridDimensions::new(8, 8, 8), true));
			b.iter(|| {
				let message = codec.encode(black_box(cloud), None).unwrap();
				black_box(message)
			});
		});
	}

	group.finish();
}

fn bench_decode(c: &mut Criterion) {
	let mut group = c.benchmark_group("decode");

	for &count in &[sizes::TINY, sizes::SMALL, sizes::MEDIUM] {
		let cloud = generate_cloud(count, 42);
		let mut codec = Codec::new(bench_settings(GridDimensions::new(8, 8, 8), false));
		let message = codec.encode(&cloud, None).unwrap();

		group.throughput(Throughput::Elements(count as u64));
		group.bench_with_input(BenchmarkId::new("plain", count), &message, |b, message| {
			let mut codec = Codec::new(bench_settings(GridDimensions::new(8, 8, 8), false));
			b.iter(|| {
				let cloud = codec.decode(black_box(message)).unwrap();
				black_box(cloud)
			});
		});
	}

	group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
