//! Error kinds raised by the render pipeline and its engine boundary.
//!
//! Three kinds map onto the three ways a block can go wrong:
//!
//! - [`EngineConfigError`]: construction parameters rejected. Fatal during
//!   instantiation/activation, recoverable during hot reconfiguration.
//! - [`EngineRuntimeError`]: the engine refused an event or failed a block.
//!   Per-event failures are absorbed, per-block failures silence one block.
//! - [`AllocationFailure`]: buffer growth could not be satisfied.
//!
//! Malformed or unsupported MIDI is not an error at all; the decoder skips it.

use thiserror::Error;

/// Invalid engine or plugin construction parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineConfigError {
    #[error("voice count must be at least 1")]
    ZeroVoices,

    #[error("voice count {requested} exceeds the configured maximum of {max}")]
    TooManyVoices { requested: usize, max: usize },

    #[error("sample rate must be positive and finite, got {0}")]
    InvalidSampleRate(f64),

    #[error("channel count must be at least 1")]
    ZeroChannels,

    #[error("block length must be at least 1 sample")]
    ZeroBlockLength,

    /// The engine factory refused the configuration for its own reasons.
    #[error("engine rejected configuration: {0}")]
    Rejected(String),

    #[error(transparent)]
    Allocation(#[from] AllocationFailure),
}

/// Failure reported by the synthesis engine while running.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineRuntimeError {
    #[error("note {pitch} on channel {channel} rejected: {reason}")]
    NoteRejected {
        channel: u8,
        pitch: i8,
        reason: &'static str,
    },

    #[error("controller {controller} on channel {channel} rejected: {reason}")]
    ControlRejected {
        channel: u8,
        controller: u8,
        reason: &'static str,
    },

    #[error("no free voice for note {pitch}")]
    NoFreeVoice { pitch: i8 },

    #[error("engine expects {expected} voice buffers, got {actual}")]
    VoiceCountMismatch { expected: usize, actual: usize },

    #[error("engine advance failed: {0}")]
    Advance(&'static str),

    #[error("engine render failed: {0}")]
    Render(&'static str),
}

/// Buffer growth could not be satisfied by the allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("failed to allocate {voices} voice buffers of {samples} samples")]
pub struct AllocationFailure {
    pub voices: usize,
    pub samples: usize,
}

/// Per-block and lifecycle failures returned by the render pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("pipeline is not configured")]
    NotConfigured,

    #[error("operation `{operation}` is not valid in state {state:?}")]
    InvalidState {
        operation: &'static str,
        state: crate::pipeline::PipelineState,
    },

    #[error("seed input has {actual} samples, block needs {expected}")]
    InputLength { expected: usize, actual: usize },

    #[error(transparent)]
    Config(#[from] EngineConfigError),

    #[error(transparent)]
    Engine(#[from] EngineRuntimeError),

    #[error(transparent)]
    Allocation(#[from] AllocationFailure),
}

pub type Result<T> = std::result::Result<T, RenderError>;
