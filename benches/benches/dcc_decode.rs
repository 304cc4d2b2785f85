//! Benchmark suite for DCC decoding
//!
//! This benchmark measures the cost of each decoding pass on synthetic
//! sprites, plus encoding and palette conversion.
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml
//!
//! Set `DCC_BENCH_FILE` to a real sprite to include it in the suite.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use dcc_benches::{generate_test_dcc_data, sizes};
use dcc_types::file::dcc::{CompressionFlags, File, FileBuilder, Header, Layout};
use dcc_types::file::Palette;
use std::{env, fs, hint::black_box};

/// Benchmark full decoding of synthetic sprites of growing size
fn bench_decode_synthetic(c: &mut Criterion) {
	let mut group = c.benchmark_group("dcc_decode_synthetic");

	for (name, size) in [("tiny", sizes::TINY), ("small", sizes::SMALL), ("medium", sizes::MEDIUM)] {
		let data = generate_test_dcc_data(8, 8, size, CompressionFlags::all());
		let pixels = u64::from(size.0) * u64::from(size.1) * 64;

		group.throughput(Throughput::Elements(pixels));
		group.bench_with_input(BenchmarkId::new("decode", name), &data, |b, data| {
			b.iter(|| {
				let result = File::from_bytes(black_box(data));
				black_box(result)
			});
		});
	}

	group.finish();
}

/// Benchmark the effect of the compression flags on decoding
fn bench_decode_compression(c: &mut Criterion) {
	let mut group = c.benchmark_group("dcc_decode_compression");

	for bits in 0..4u8 {
		let data = generate_test_dcc_data(1, 16, sizes::SMALL, CompressionFlags::new(bits));
		group.throughput(Throughput::Bytes(data.len() as u64));
		group.bench_with_input(BenchmarkId::new("flags", bits), &data, |b, data| {
			b.iter(|| {
				let result = File::from_bytes(black_box(data));
				black_box(result)
			});
		});
	}

	group.finish();
}

/// Benchmark header and offset table parsing separately
fn bench_header_parsing(c: &mut Criterion) {
	let mut group = c.benchmark_group("dcc_header");
	let data = generate_test_dcc_data(32, 1, sizes::TINY, CompressionFlags::all());

	group.bench_function("parse_header", |b| {
		b.iter(|| {
			let result = Header::from_bytes(black_box(&data));
			black_box(result)
		});
	});

	group.bench_function("parse_layout", |b| {
		b.iter(|| {
			let result = Layout::parse(black_box(&data));
			black_box(result)
		});
	});

	group.finish();
}

/// Benchmark decoding one direction on demand against decoding all of them
fn bench_single_direction(c: &mut Criterion) {
	let mut group = c.benchmark_group("dcc_single_direction");
	let data = generate_test_dcc_data(16, 8, sizes::SMALL, CompressionFlags::all());
	let layout = Layout::parse(&data).unwrap();

	group.bench_function("decode_one", |b| {
		b.iter(|| {
			let result = layout.decode_direction(black_box(7));
			black_box(result)
		});
	});

	group.bench_function("decode_all", |b| {
		b.iter(|| {
			let result = layout.decode_all();
			black_box(result)
		});
	});

	group.finish();
}

/// Benchmark re-encoding a decoded sprite
fn bench_encode(c: &mut Criterion) {
	let mut group = c.benchmark_group("dcc_encode");
	let data = generate_test_dcc_data(8, 8, sizes::SMALL, CompressionFlags::all());
	let builder = FileBuilder::from_file(&File::from_bytes(&data).unwrap());

	group.throughput(Throughput::Bytes(data.len() as u64));
	group.bench_function("build", |b| {
		b.iter(|| {
			let result = black_box(&builder).build();
			black_box(result)
		});
	});

	group.finish();
}

/// Benchmark palette application (indexed to RGBA conversion)
fn bench_palette_application(c: &mut Criterion) {
	let mut group = c.benchmark_group("dcc_palette_apply");
	let data = generate_test_dcc_data(1, 1, sizes::LARGE, CompressionFlags::all());
	let dcc = File::from_bytes(&data).unwrap();
	let frame = &dcc.direction(0).unwrap().frames()[0];
	let palette = Palette::grayscale();

	group.throughput(Throughput::Elements(u64::from(frame.width()) * u64::from(frame.height())));
	group.bench_function("to_rgba", |b| {
		b.iter(|| {
			let result = frame.to_rgba(black_box(&palette));
			black_box(result)
		});
	});

	group.finish();
}

/// Full decode of a real sprite, when one is provided
fn bench_real_file(c: &mut Criterion) {
	let Ok(path) = env::var("DCC_BENCH_FILE") else {
		return;
	};

	let data = match fs::read(&path) {
		Ok(d) => d,
		Err(_) => {
			eprintln!("Warning: Could not read benchmark file: {}", path);
			return;
		}
	};

	let mut group = c.benchmark_group("dcc_real");
	group.throughput(Throughput::Bytes(data.len() as u64));
	group.sample_size(50);
	group.bench_function("full_decode_pipeline", |b| {
		b.iter(|| {
			let result = File::from_bytes(black_box(&data));
			black_box(result)
		});
	});
	group.finish();
}

criterion_group!(
	benches,
	bench_decode_synthetic,
	bench_decode_compression,
	bench_header_parsing,
	bench_single_direction,
	bench_encode,
	bench_palette_application,
	bench_real_file,
);

criterion_main!(benches);
