//! DCC sprite utility.
//!
//! Provides four subcommands:
//! - `info`: print the header, every direction box, stream sizes and frames.
//! - `unpack`: write every frame as a PNG plus a `metadata.json` describing them.
//! - `verify`: decode twice, re-encode, decode again and compare all pixels.
//! - `batch`: decode every `.dcc` file under a directory on worker threads.
//!
//! # Palette
//!
//! Frames hold palette indices. `unpack` converts them through a 768-byte
//! `.dat` palette given with `--palette` or the `DCC_PALETTE` environment
//! variable; without one it writes the raw indices as grayscale images.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example dcc_utils -- info BAHDLITTNHTH.DCC --frames
//! cargo run --example dcc_utils -- unpack BAHDLITTNHTH.DCC -p pal.dat -o frames/
//! cargo run --example dcc_utils -- verify BAHDLITTNHTH.DCC
//! cargo run --example dcc_utils -- batch data/global/chars --jobs 8
//! ```

use std::{
	fs,
	path::{Path, PathBuf},
	sync::Mutex,
	thread,
};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use dcc_rs::prelude::*;
use image::{GrayImage, RgbaImage};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

fn main() -> Result<()> {
	// Initialize logger with default level set to info if RUST_LOG is not set
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	match cli.command {
		Command::Info(args) => run_info(args),
		Command::Unpack(args) => run_unpack(args),
		Command::Verify(args) => run_verify(args),
		Command::Batch(args) => run_batch(args),
	}
}

#[derive(Parser)]
#[command(name = "dcc_utils")]
#[command(author = "dcc-rs project")]
#[command(version)]
#[command(about = "Inspect, unpack and verify DCC directional sprites", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Display information about a DCC file
	Info(InfoArgs),
	/// Unpack every frame of a DCC file to PNG images
	Unpack(UnpackArgs),
	/// Check that decoding is repeatable and survives re-encoding
	Verify(VerifyArgs),
	/// Decode every .dcc file under a directory
	Batch(BatchArgs),
}

#[derive(Args)]
struct InfoArgs {
	/// Input DCC file path
	#[arg(value_name = "INPUT_DCC")]
	input: PathBuf,

	/// Show one line per frame
	#[arg(short, long, default_value_t = false)]
	frames: bool,
}

#[derive(Args)]
struct UnpackArgs {
	/// Input DCC file path
	#[arg(value_name = "INPUT_DCC")]
	input: PathBuf,

	/// Output directory (defaults to `<input>_frames/`)
	#[arg(short, long, value_name = "OUTPUT_DIR")]
	output: Option<PathBuf>,

	/// Path to a 768-byte `.dat` palette
	#[arg(short, long, value_name = "PALETTE", env = "DCC_PALETTE")]
	palette: Option<PathBuf>,

	/// Only unpack this logical direction
	#[arg(short, long, value_name = "INDEX")]
	direction: Option<usize>,

	/// Export direction-sized images instead of cropping each frame
	#[arg(long, default_value_t = false)]
	full_box: bool,
}

#[derive(Args)]
struct VerifyArgs {
	/// Input DCC file path
	#[arg(value_name = "INPUT_DCC")]
	input: PathBuf,
}

#[derive(Args)]
struct BatchArgs {
	/// Directory to scan
	#[arg(value_name = "DIR")]
	root: PathBuf,

	/// Number of worker threads
	#[arg(short, long, default_value_t = 4)]
	jobs: usize,

	/// Also re-encode every file and compare frames
	#[arg(long, default_value_t = false)]
	verify: bool,
}

/// Frame metadata for JSON serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FrameMetadata {
	/// Frame index within the direction
	index: usize,
	/// Frame width in pixels
	width: u32,
	/// Frame height in pixels
	height: u32,
	/// Horizontal offset of the left edge
	x_offset: i32,
	/// Vertical offset of the bottom row
	y_offset: i32,
	/// Frame rectangle relative to the direction box
	box_in_direction: Rect,
	/// PNG filename
	filename: String,
}

/// Direction metadata for JSON serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DirectionMetadata {
	/// Logical direction index
	index: usize,
	/// Bounding box of all frames
	bounds: Rect,
	/// Frames of this direction
	frames: Vec<FrameMetadata>,
}

/// Complete unpack metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DccMetadata {
	/// File header
	header: DccHeader,
	/// Whether images are cropped to their frame or cover the direction box
	full_box: bool,
	/// Unpacked directions
	directions: Vec<DirectionMetadata>,
}

fn run_info(args: InfoArgs) -> Result<()> {
	let dcc = DccFile::open(&args.input)?;

	println!("{}", dcc.header());
	for direction in &dcc {
		println!("{direction}");
		if args.frames {
			for (index, frame) in direction.frames().iter().enumerate() {
				println!("    [{index:3}] {frame}, box {}", frame.box_in_direction());
			}
		}
	}
	Ok(())
}

fn run_unpack(args: UnpackArgs) -> Result<()> {
	let output_dir = args.output.clone().unwrap_or_else(|| {
		let mut dir = args.input.clone();
		dir.set_extension("");
		let name = format!("{}_frames", dir.file_name().map(|n| n.to_string_lossy()).unwrap_or_default());
		dir.with_file_name(name)
	});

	let palette = match &args.palette {
		Some(path) => Some(
			Palette::from_file(path).with_context(|| format!("Failed to load palette {}", path.display()))?,
		),
		None => {
			warn!("No palette given, writing palette indices as grayscale");
			None
		}
	};

	let dcc = DccFile::open(&args.input)?;
	fs::create_dir_all(&output_dir)
		.with_context(|| format!("Failed to create {}", output_dir.display()))?;

	let directions: Vec<&DccDirection> = match args.direction {
		Some(index) => vec![dcc.direction(index)?],
		None => dcc.iter().collect(),
	};

	let mut metadata = DccMetadata {
		header: *dcc.header(),
		full_box: args.full_box,
		directions: Vec::with_capacity(directions.len()),
	};

	for direction in directions {
		let mut frames = Vec::with_capacity(direction.frame_count());
		for (index, frame) in direction.frames().iter().enumerate() {
			let filename = format!("d{:02}_f{:03}.png", direction.index(), index);
			save_frame_png(frame, palette.as_ref(), args.full_box, &output_dir.join(&filename))?;

			frames.push(FrameMetadata {
				index,
				width: frame.width(),
				height: frame.height(),
				x_offset: frame.x_offset(),
				y_offset: frame.y_offset(),
				box_in_direction: frame.box_in_direction(),
				filename,
			});
		}

		info!("Direction {:2}: {} frames, box {}", direction.index(), frames.len(), direction.bounds());
		metadata.directions.push(DirectionMetadata {
			index: direction.index(),
			bounds: direction.bounds(),
			frames,
		});
	}

	let metadata_path = output_dir.join("metadata.json");
	fs::write(&metadata_path, serde_json::to_string_pretty(&metadata)?)
		.with_context(|| format!("Failed to write {}", metadata_path.display()))?;
	info!("Unpacked {} into {}", args.input.display(), output_dir.display());
	Ok(())
}

/// Saves a frame as RGBA through `palette`, or as grayscale indices without one.
fn save_frame_png(frame: &DccFrame, palette: Option<&Palette>, full_box: bool, path: &Path) -> Result<()> {
	let (width, height) = if full_box {
		let stride = frame.stride();
		(stride as u32, (frame.pixels().len() / stride.max(1)) as u32)
	} else {
		(frame.width(), frame.height())
	};

	if width == 0 || height == 0 {
		warn!("Skipping empty frame {}", path.display());
		return Ok(());
	}

	match (palette, full_box) {
		(Some(palette), true) => save_rgba(width, height, palette.to_rgba(frame.pixels()), path),
		(Some(palette), false) => save_rgba(width, height, frame.to_rgba(palette), path),
		(None, true) => save_gray(width, height, frame.pixels().to_vec(), path),
		(None, false) => save_gray(width, height, frame.cropped_pixels(), path),
	}
}

fn save_rgba(width: u32, height: u32, rgba: Vec<u8>, path: &Path) -> Result<()> {
	let image = RgbaImage::from_raw(width, height, rgba).context("Frame size does not match its pixels")?;
	image.save(path)?;
	Ok(())
}

fn save_gray(width: u32, height: u32, indices: Vec<u8>, path: &Path) -> Result<()> {
	let image = GrayImage::from_raw(width, height, indices).context("Frame size does not match its pixels")?;
	image.save(path)?;
	Ok(())
}

/// Decodes `data` twice, re-encodes it and decodes the result.
///
/// Returns the number of frames compared.
fn verify_bytes(data: &[u8]) -> Result<usize> {
	let first = DccFile::from_bytes(data)?;
	let second = DccFile::from_bytes(data)?;
	if first != second {
		bail!("Decoding the same bytes twice gave different frames");
	}

	let rebuilt = DccFileBuilder::from_file(&first).build().context("Re-encoding failed")?;
	let third = DccFile::from_bytes(&rebuilt).context("Re-encoded file does not decode")?;

	let mut compared = 0;
	for (original, copy) in first.iter().zip(&third) {
		for (index, (a, b)) in original.frames().iter().zip(copy.frames()).enumerate() {
			if a.cropped_pixels() != b.cropped_pixels() || a.bounds() != b.bounds() {
				bail!("Direction {}, frame {index}: re-encoded frame differs", original.index());
			}
			compared += 1;
		}
	}
	Ok(compared)
}

fn run_verify(args: VerifyArgs) -> Result<()> {
	let data = fs::read(&args.input).with_context(|| format!("Failed to read {}", args.input.display()))?;
	let frames = verify_bytes(&data).with_context(|| format!("Verification failed for {}", args.input.display()))?;
	info!("{}: {frames} frames verified", args.input.display());
	Ok(())
}

fn run_batch(args: BatchArgs) -> Result<()> {
	if !args.root.is_dir() {
		bail!("{} is not a directory", args.root.display());
	}

	let files: Vec<PathBuf> = WalkDir::new(&args.root)
		.into_iter()
		.filter_map(|entry| entry.ok())
		.filter(|entry| entry.file_type().is_file())
		.map(|entry| entry.into_path())
		.filter(|path| path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("dcc")))
		.collect();

	if files.is_empty() {
		warn!("No .dcc files under {}", args.root.display());
		return Ok(());
	}

	let jobs = args.jobs.clamp(1, files.len());
	let failures = Mutex::new(Vec::new());
	let chunk_size = files.len().div_ceil(jobs);

	thread::scope(|scope| {
		for chunk in files.chunks(chunk_size) {
			let failures = &failures;
			scope.spawn(move || {
				for path in chunk {
					let result = if args.verify {
						fs::read(path).map_err(anyhow::Error::from).and_then(|data| verify_bytes(&data)).map(|_| ())
					} else {
						DccFile::open(path).map(|_| ()).map_err(anyhow::Error::from)
					};

					if let Err(err) = result {
						error!("{}: {err:#}", path.display());
						if let Ok(mut failures) = failures.lock() {
							failures.push(path.clone());
						}
					}
				}
			});
		}
	});

	let failures = failures.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner());
	info!("{} files, {} failed", files.len(), failures.len());
	if !failures.is_empty() {
		bail!("Batch finished with {} failures", failures.len());
	}
	Ok(())
}
