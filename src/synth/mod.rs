// Reference engine: additive harmonics behind the SynthEngine contract.
// The pipeline does not depend on it; hosts may inject any engine.

pub mod harmonic;
pub mod voice;

pub use harmonic::{AdsrTimes, HarmonicEngine, NOTE_SLOTS};
pub use voice::{midi_to_hz, NoteSlot, SlotState};
