//! Boundary to the external synthesis engine.
//!
//! The engine itself (oscillators, harmonic generation, envelopes) lives
//! behind [`SynthEngine`]. This module defines what the render pipeline needs
//! from it and the adapter that feeds it decoded events once per block.

pub mod adapter;
pub mod clock;
pub mod factory;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::buffer::VoiceBlock;
use crate::error::{EngineConfigError, EngineRuntimeError};

pub use adapter::EngineAdapter;
pub use clock::BlockClock;
pub use factory::EngineFactory;

/// Construction parameters for one engine instance.
///
/// An engine lives for exactly one configuration; changing the voice count
/// builds a new engine.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub voice_count: usize,
    pub sample_rate: f64,
    pub channel_count: usize,
}

impl EngineConfig {
    pub fn new(voice_count: usize, sample_rate: f64, channel_count: usize) -> Self {
        Self {
            voice_count,
            sample_rate,
            channel_count,
        }
    }

    pub fn validate(&self) -> Result<(), EngineConfigError> {
        if self.voice_count == 0 {
            return Err(EngineConfigError::ZeroVoices);
        }
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(EngineConfigError::InvalidSampleRate(self.sample_rate));
        }
        if self.channel_count == 0 {
            return Err(EngineConfigError::ZeroChannels);
        }
        Ok(())
    }
}

/// Note input as the engine receives it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteInput {
    pub channel: u8,
    pub pitch: i8,
    pub velocity: i8,
    /// `true` for note-on messages, `false` for note-off.
    pub on: bool,
}

impl NoteInput {
    /// Note-off, or note-on with velocity 0.
    pub fn is_release(&self) -> bool {
        !self.on || self.velocity == 0
    }
}

/// Control-change input as the engine receives it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlInput {
    pub channel: u8,
    pub controller: u8,
    pub value: u8,
}

/// Contract the render pipeline requires from a synthesis engine.
///
/// Per block the pipeline calls, in order: any number of `receive_note` /
/// `receive_control`, then `advance` exactly once, then `render` exactly once.
pub trait SynthEngine: Send {
    /// Install the time source the engine consults between blocks.
    fn set_clock_source(&mut self, clock: BlockClock);

    fn receive_note(&mut self, note: NoteInput) -> Result<(), EngineRuntimeError>;

    fn receive_control(&mut self, control: ControlInput) -> Result<(), EngineRuntimeError>;

    /// Step internal state once all of the block's events are in.
    fn advance(&mut self) -> Result<(), EngineRuntimeError>;

    /// Synthesize `voices.len()` samples into every voice of `voices`.
    ///
    /// `seed` holds at least `voices.len()` samples. Every sample of every
    /// voice must be written; the buffers hold the previous block's output
    /// on entry.
    fn render(&mut self, seed: &[f32], voices: &mut VoiceBlock<'_>) -> Result<(), EngineRuntimeError>;

    /// Number of output buffers the engine renders into.
    fn voice_count(&self) -> usize;

    fn harmonic_count(&self) -> usize {
        self.voice_count()
    }
}

/// Allow boxed engines to be used as engines (for dynamic dispatch)
impl SynthEngine for Box<dyn SynthEngine> {
    fn set_clock_source(&mut self, clock: BlockClock) {
        (**self).set_clock_source(clock)
    }

    fn receive_note(&mut self, note: NoteInput) -> Result<(), EngineRuntimeError> {
        (**self).receive_note(note)
    }

    fn receive_control(&mut self, control: ControlInput) -> Result<(), EngineRuntimeError> {
        (**self).receive_control(control)
    }

    fn advance(&mut self) -> Result<(), EngineRuntimeError> {
        (**self).advance()
    }

    fn render(&mut self, seed: &[f32], voices: &mut VoiceBlock<'_>) -> Result<(), EngineRuntimeError> {
        (**self).render(seed, voices)
    }

    fn voice_count(&self) -> usize {
        (**self).voice_count()
    }

    fn harmonic_count(&self) -> usize {
        (**self).harmonic_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_validation() {
        assert!(EngineConfig::new(4, 48_000.0, 1).validate().is_ok());
        assert_eq!(
            EngineConfig::new(0, 48_000.0, 1).validate(),
            Err(EngineConfigError::ZeroVoices)
        );
        assert_eq!(
            EngineConfig::new(4, 0.0, 1).validate(),
            Err(EngineConfigError::InvalidSampleRate(0.0))
        );
        assert!(EngineConfig::new(4, f64::NAN, 1).validate().is_err());
        assert_eq!(
            EngineConfig::new(4, 44_100.0, 0).validate(),
            Err(EngineConfigError::ZeroChannels)
        );
    }

    #[test]
    fn zero_velocity_note_on_is_a_release() {
        let note = NoteInput {
            channel: 0,
            pitch: 60,
            velocity: 0,
            on: true,
        };
        assert!(note.is_release());
        assert!(!NoteInput { velocity: 1, ..note }.is_release());
    }
}
