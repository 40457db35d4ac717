// Purpose - host-facing event formats and decoding

pub mod decoder;
pub mod midi;
#[cfg(feature = "rtrb")]
pub mod queue;

pub use decoder::{decode, EventDecoder};
pub use midi::{EventProtocol, MidiEvent, TimedEvent};
