use crate::io::midi::{EventProtocol, MidiEvent, TimedEvent, CONTROLLER, NOTE_OFF, NOTE_ON};

/*
Event Decoding
==============

Hosts hand us a time-ordered stream of raw events. Only MIDI payloads are
interesting, and of those only three message kinds reach the engine:

  status    kind           data 1             data 2
  ------    ----           ------             ------
  0x8n      note off       pitch   (0-127)    velocity (0-127)
  0x9n      note on        pitch   (0-127)    velocity (0-127)
  0xBn      control        controller (0-127) value    (0-127)

  n = channel (0-15)

Everything else is skipped without a trace:

  - non-MIDI payloads (patch messages, time position, ...)
  - other channel messages (aftertouch, program change, pitch bend)
  - system messages (0xF0 and above)
  - short messages or data bytes with bit 7 set (malformed)

Skipping is a defined no-op, not an error. A stray byte from a flaky host
must never stall the block or shift the events around it.

Order is preserved exactly. No reordering, no coalescing of note-on with
velocity 0 into note-off, no deduplication. The engine sees what the host
sent, minus what it cannot understand.
*/

/// Decode one raw event, returning `None` for anything unsupported.
#[inline]
pub fn decode(event: &TimedEvent) -> Option<MidiEvent> {
    if event.protocol != EventProtocol::Midi {
        return None;
    }

    let &[status, data1, data2] = event.bytes() else {
        return None;
    };

    if status < 0x80 || status >= 0xF0 || data1 > 0x7F || data2 > 0x7F {
        return None;
    }

    let channel = status & 0x0F;
    match status & 0xF0 {
        NOTE_ON => Some(MidiEvent::NoteOn {
            channel,
            pitch: data1 as i8,
            velocity: data2 as i8,
        }),
        NOTE_OFF => Some(MidiEvent::NoteOff {
            channel,
            pitch: data1 as i8,
            velocity: data2 as i8,
        }),
        CONTROLLER => Some(MidiEvent::Control {
            channel,
            controller: data1,
            value: data2,
        }),
        _ => None,
    }
}

/// Streaming decoder over one block's events.
///
/// Yields decoded events in arrival order and counts what it skipped.
pub struct EventDecoder<'a> {
    events: std::slice::Iter<'a, TimedEvent>,
    skipped: usize,
}

impl<'a> EventDecoder<'a> {
    pub fn new(events: &'a [TimedEvent]) -> Self {
        Self {
            events: events.iter(),
            skipped: 0,
        }
    }

    /// Events dropped so far as unsupported or malformed.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl Iterator for EventDecoder<'_> {
    type Item = MidiEvent;

    fn next(&mut self) -> Option<Self::Item> {
        for raw in self.events.by_ref() {
            match decode(raw) {
                Some(event) => return Some(event),
                None => self.skipped += 1,
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.events.len()))
    }
}
