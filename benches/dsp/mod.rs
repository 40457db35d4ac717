//! Benchmarks for low-level primitives.

mod decode;
mod mix;

pub use decode::bench_decode;
pub use mix::bench_mix;
