#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Status high nibble for note-off messages.
pub const NOTE_OFF: u8 = 0x80;
/// Status high nibble for note-on messages.
pub const NOTE_ON: u8 = 0x90;
/// Status high nibble for control-change messages.
pub const CONTROLLER: u8 = 0xB0;

/// Decoded event handed to the engine adapter.
///
/// Note fields are signed to match the engine's note input; control fields are
/// unsigned. Both are always in `0..=127` after decoding.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, pitch: i8, velocity: i8 },
    NoteOff { channel: u8, pitch: i8, velocity: i8 },
    Control { channel: u8, controller: u8, value: u8 },
}

impl MidiEvent {
    pub fn channel(&self) -> u8 {
        match *self {
            MidiEvent::NoteOn { channel, .. }
            | MidiEvent::NoteOff { channel, .. }
            | MidiEvent::Control { channel, .. } => channel,
        }
    }

    /// Encode back into the three-byte wire form.
    pub fn to_bytes(&self) -> [u8; 3] {
        match *self {
            MidiEvent::NoteOn {
                channel,
                pitch,
                velocity,
            } => [NOTE_ON | (channel & 0x0F), pitch as u8, velocity as u8],
            MidiEvent::NoteOff {
                channel,
                pitch,
                velocity,
            } => [NOTE_OFF | (channel & 0x0F), pitch as u8, velocity as u8],
            MidiEvent::Control {
                channel,
                controller,
                value,
            } => [CONTROLLER | (channel & 0x0F), controller, value],
        }
    }
}

/// Payload protocol of a host event.
///
/// Hosts deliver mixed event streams; only [`EventProtocol::Midi`] payloads
/// are decoded. Other tags carry the host's type identifier through untouched.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventProtocol {
    Midi,
    Other(u32),
}

/// Raw host event: frame offset within the block plus up to three bytes.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedEvent {
    /// Frame offset inside the current block.
    pub frame: u32,
    pub protocol: EventProtocol,
    pub data: [u8; 3],
    /// Number of valid bytes in `data`.
    pub len: u8,
}

impl TimedEvent {
    /// A complete three-byte MIDI message.
    pub fn midi(frame: u32, data: [u8; 3]) -> Self {
        Self {
            frame,
            protocol: EventProtocol::Midi,
            data,
            len: 3,
        }
    }

    /// A MIDI message of fewer than three bytes (program change, truncated data).
    pub fn midi_short(frame: u32, bytes: &[u8]) -> Self {
        let mut data = [0u8; 3];
        let len = bytes.len().min(3);
        data[..len].copy_from_slice(&bytes[..len]);
        Self {
            frame,
            protocol: EventProtocol::Midi,
            data,
            len: len as u8,
        }
    }

    /// An event with a non-MIDI payload type.
    pub fn other(frame: u32, type_id: u32) -> Self {
        Self {
            frame,
            protocol: EventProtocol::Other(type_id),
            data: [0; 3],
            len: 0,
        }
    }

    pub fn from_event(frame: u32, event: MidiEvent) -> Self {
        Self::midi(frame, event.to_bytes())
    }

    /// The valid bytes of the payload.
    pub fn bytes(&self) -> &[u8] {
        &self.data[..usize::from(self.len.min(3))]
    }
}
