//! Low-level DSP primitives.
//!
//! Allocation-free and realtime-safe: the mixdown and gain curve used by the
//! render pipeline, and the envelope used by the reference engine.

/// Attack/decay/sustain/release envelope generator.
pub mod envelope;
/// Decibel-to-linear gain conversion.
pub mod gain;
/// Voice summing and gain-scaled mixdown.
pub mod mix;

pub use envelope::{Envelope, EnvelopeStage};
pub use gain::{db_to_gain, MUTE_FLOOR_DB};
pub use mix::mix_voices;

/// Shortest stage time accepted by the envelope, in seconds.
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
