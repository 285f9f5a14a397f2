//! Point Cloud Codec CLI Utility
//!
//! A command-line tool for generating, encoding, decoding and verifying
//! compressed point cloud messages.
//!
//! # Usage
//!
//! ```bash
//! # Generate a synthetic cloud
//! cargo run --example pcc_utils generate --count 10000 -o cloud.json
//!
//! # Encode it into a message
//! cargo run --example pcc_utils encode -i cloud.json -o cloud.pcc --grid 4x4x4 --entropy
//!
//! # Decode a message back into a cloud
//! cargo run --example pcc_utils decode -i cloud.pcc -o decoded.json
//!
//! # Round-trip a cloud in memory and report the reconstruction error
//! cargo run --example pcc_utils verify -i cloud.json --grid 8x8x8 --position-bits 12
//!
//! # Dump the headers and statistics of a message
//! cargo run --example pcc_utils info -i cloud.pcc
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use pcstream_rs::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

#[derive(Parser)]
#[command(name = "pcc_utils")]
#[command(author = "pcstream-rs project")]
#[command(version = "1.0")]
#[command(about = "Point cloud codec utility - generate, encode, decode and verify", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

/// Encoding options shared by the encode and verify subcommands
#[derive(clap::Args)]
struct EncodeOptions {
	/// Grid dimensions as DXxDYxDZ, e.g. 4x4x4
	#[arg(long, default_value = "4x4x4", value_parser = parse_dims)]
	grid: GridDimensions,

	/// Bit width for each position component
	#[arg(long, default_value_t = 10)]
	position_bits: u8,

	/// Bit width for each color channel
	#[arg(long, default_value_t = 8)]
	color_bits: u8,

	/// Run the message body through the zlib entropy stage
	#[arg(long)]
	entropy: bool,

	/// Bytes reserved at the message tail for user payload
	#[arg(long, default_value_t = 0)]
	appendix_size: u64,

	/// Worker threads for the per-cell fan-out (1 = serial, 0 = automatic)
	#[arg(long, default_value_t = 1)]
	threads: usize,
}

#[derive(Subcommand)]
enum Commands {
	/// Generate a synthetic point cloud as JSON
	Generate {
		/// Number of points to generate
		#[arg(long, default_value_t = 10_000)]
		count: usize,

		/// Edge length of the cubic region the points fill
		#[arg(long, default_value_t = 10.0)]
		extent: f32,

		/// Seed for the random generator
		#[arg(long, default_value_t = 42)]
		seed: u64,

		/// Output JSON file path
		#[arg(short, long, value_name = "OUTPUT_JSON")]
		output: PathBuf,
	},

	/// Encode a JSON cloud into a compressed message file
	Encode {
		/// Input JSON file path
		#[arg(short, long, value_name = "INPUT_JSON")]
		input: PathBuf,

		/// Output message file path
		#[arg(short, long, value_name = "OUTPUT_PCC")]
		output: PathBuf,

		#[command(flatten)]
		options: EncodeOptions,

		/// Show verbose output
		#[arg(short, long)]
		verbose: bool,
	},

	/// Decode a message file back into a JSON cloud
	Decode {
		/// Input message file path
		#[arg(short, long, value_name = "INPUT_PCC")]
		input: PathBuf,

		/// Output JSON file path
		#[arg(short, long, value_name = "OUTPUT_JSON")]
		output: PathBuf,

		/// Show verbose output
		#[arg(short, long)]
		verbose: bool,
	},

	/// Encode and decode a cloud in memory and report reconstruction errors
	Verify {
		/// Input JSON file path
		#[arg(short, long, value_name = "INPUT_JSON")]
		input: PathBuf,

		#[command(flatten)]
		options: EncodeOptions,
	},

	/// Print headers and statistics of a message file
	Info {
		/// Input message file path
		#[arg(short, long, value_name = "INPUT_PCC")]
		input: PathBuf,
	},
}

fn parse_dims(value: &str) -> Result<GridDimensions, String> {
	let parts: Vec<&str> = value.split('x').collect();
	if parts.len() != 3 {
		return Err(format!("expected DXxDYxDZ, got '{value}'"));
	}
	let mut dims = [0u8; 3];
	for (slot, part) in dims.iter_mut().zip(parts.iter()) {
		*slot = part.parse::<u8>().map_err(|e| format!("bad dimension '{part}': {e}"))?;
		if *slot == 0 {
			return Err("grid dimensions must be at least 1".to_string());
		}
	}
	Ok(GridDimensions::new(dims[0], dims[1], dims[2]))
}

/// Fits a bounding box around a cloud, padded so no point sits on the max face
fn bounds_from_cloud(cloud: &[Voxel]) -> BoundingBox {
	let mut min = [f32::MAX; 3];
	let mut max = [f32::MIN; 3];
	for voxel in cloud {
		for axis in 0..3 {
			min[axis] = min[axis].min(voxel.position[axis]);
			max[axis] = max[axis].max(voxel.position[axis]);
		}
	}
	for axis in 0..3 {
		let pad = ((max[axis] - min[axis]) * 1e-4).max(1e-3);
		max[axis] += pad;
	}
	BoundingBox::new(min, max)
}

fn load_cloud(path: &PathBuf) -> Result<Vec<Voxel>> {
	let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
	serde_json::from_slice(&data).with_context(|| format!("parsing {}", path.display()))
}

fn build_settings(cloud: &[Voxel], options: &EncodeOptions, verbose: bool) -> Result<EncodingSettings> {
	let bounds = bounds_from_cloud(cloud);
	let mut settings =
		EncodingSettings::uniform(bounds, options.grid, options.position_bits, options.color_bits)?;
	settings.entropy_coding = options.entropy;
	settings.appendix_size = options.appendix_size;
	settings.num_threads = options.threads;
	settings.verbose = verbose;
	Ok(settings)
}

fn main() -> Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
	let cli = Cli::parse();

	match cli.command {
		Commands::Generate {
			count,
			extent,
			seed,
			output,
		} => {
			let mut rng = SmallRng::seed_from_u64(seed);
			let cloud: Vec<Voxel> = (0..count)
				.map(|_| {
					Voxel::new(
						[
							rng.random_range(0.0..extent),
							rng.random_range(0.0..extent),
							rng.random_range(0.0..extent),
						],
						[rng.random(), rng.random(), rng.random()],
					)
				})
				.collect();
			fs::write(&output, serde_json::to_vec(&cloud)?)
				.with_context(|| format!("writing {}", output.display()))?;
			info!("wrote {count} points to {}", output.display());
		}

		Commands::Encode {
			input,
			output,
			options,
			verbose,
		} => {
			let cloud = load_cloud(&input)?;
			let settings = build_settings(&cloud, &options, verbose)?;
			let mut codec = Codec::new(settings);
			let message = codec.encode(&cloud, None)?;
			fs::write(&output, &message)
				.with_context(|| format!("writing {}", output.display()))?;
			let log = codec.encode_log();
			info!(
				"encoded {} points into {} bytes ({} raw, {} cells blacklisted)",
				log.point_count,
				message.len(),
				log.raw_bytes,
				log.blacklisted_cells
			);
		}

		Commands::Decode {
			input,
			output,
			verbose,
		} => {
			let message = fs::read(&input).with_context(|| format!("reading {}", input.display()))?;
			let settings = EncodingSettings {
				verbose,
				..EncodingSettings::default()
			};
			let mut codec = Codec::new(settings);
			let cloud = codec.decode(&message)?;
			fs::write(&output, serde_json::to_vec(&cloud)?)
				.with_context(|| format!("writing {}", output.display()))?;
			info!("decoded {} points to {}", cloud.len(), output.display());
		}

		Commands::Verify {
			input,
			options,
		} => {
			let cloud = load_cloud(&input)?;
			let settings = build_settings(&cloud, &options, false)?;
			let cell_extent = settings.grid.bounds.cell_extent(settings.grid.dims);
			let mut codec = Codec::new(settings);

			let message = codec.encode(&cloud, None)?;
			let decoded = codec.decode(&message)?;
			println!("{}", codec.encode_log());
			println!("{}", codec.decode_log());

			let mut worst = 0.0f32;
			for original in &cloud {
				let best = decoded
					.iter()
					.map(|candidate| {
						(0..3)
							.map(|axis| {
								(candidate.position[axis] - original.position[axis]).abs()
							})
							.fold(0.0f32, f32::max)
					})
					.fold(f32::INFINITY, f32::min);
				worst = worst.max(best);
			}
			let bound = (0..3)
				.map(|axis| pcstream_rs::codec::step_size(0.0, cell_extent[axis], options.position_bits))
				.fold(0.0f32, f32::max);
			println!("worst reconstruction error: {worst:.6} (bound {bound:.6})");
			let ratio = message.len() as f64 / (cloud.len() * 15).max(1) as f64;
			println!("message: {} bytes for {} points ({ratio:.3} of raw)", message.len(), cloud.len());
		}

		Commands::Info {
			input,
		} => {
			let message = fs::read(&input).with_context(|| format!("reading {}", input.display()))?;
			let mut codec = Codec::new(EncodingSettings::default());
			codec.decode(&message)?;
			let grid = codec.grid();
			if let (Some(dims), Some(bounds)) = (grid.dims(), grid.bounds()) {
				println!("grid: {dims} over {bounds}");
			}
			println!("{}", codec.decode_log());
		}
	}
	Ok(())
}
