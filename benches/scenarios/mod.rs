//! Whole-block benchmarks.
//!
//! These drive the pipeline the way a host does: a fresh event list and
//! seed every block, buffers already sized.

mod harmonic;
mod pipeline;

pub use harmonic::bench_harmonic;
pub use pipeline::bench_pipeline;
