pub mod buffer; // Per-voice sample buffers
pub mod config;
pub mod dsp; // Gain, mixdown, envelope
pub mod engine; // Synthesis engine contract and adapter
pub mod error;
pub mod io; // Host events and decoding
pub mod pipeline; // Per-block orchestration
pub mod plugin; // Host lifecycle and ports
pub mod synth; // Reference harmonic engine

#[cfg(test)]
mod testing;

/// Voice buffer capacity before the host announces a block size.
pub const DEFAULT_BLOCK_SIZE: usize = 1024;
/// Voices built at instantiation.
pub const DEFAULT_VOICE_COUNT: usize = 4;

pub use config::PluginConfig;
pub use engine::{EngineConfig, EngineFactory, SynthEngine};
pub use error::{AllocationFailure, EngineConfigError, EngineRuntimeError, RenderError};
pub use io::{MidiEvent, TimedEvent};
pub use pipeline::{BlockInputs, BlockReport, PipelineState, RenderPipeline};
pub use plugin::{BlockStatus, CantinaPlugin, PortIndex, RunPorts};
pub use synth::HarmonicEngine;
