//! Benchmarks for the render path.
//!
//! Run with: cargo bench
//!
//! Everything here runs on the audio thread in a real host, so it has to
//! finish well inside the block deadline.
//!
//! Reference timing at 48kHz sample rate:
//!   - 64 samples  = 1.33ms deadline
//!   - 128 samples = 2.67ms deadline
//!   - 256 samples = 5.33ms deadline
//!   - 512 samples = 10.67ms deadline
//!
//! Benchmark groups:
//!   - dsp/*        Mixdown and event decoding on their own
//!   - scenarios/*  Whole blocks through the pipeline and reference engine

use criterion::{criterion_group, criterion_main};

mod dsp;
mod scenarios;

/// Common buffer sizes used in audio applications.
pub const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];

criterion_group!(
    benches,
    dsp::bench_mix,
    dsp::bench_decode,
    scenarios::bench_pipeline,
    scenarios::bench_harmonic,
);
criterion_main!(benches);
