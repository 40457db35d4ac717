use crate::dsp::envelope::Envelope;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Free,      // Available for allocation
    Active,    // Key held, envelope in attack/decay/sustain
    Releasing, // Key released, envelope in release phase
}

/// MIDI note number to frequency in Hz (A4 = 69 = 440 Hz).
#[inline]
pub fn midi_to_hz(note: u8) -> f64 {
    440.0 * 2.0_f64.powf((f64::from(note) - 69.0) / 12.0)
}

/// One sounding note and everything needed to render its partials.
///
/// The phase is the fundamental's, in cycles. Partial `n` reads it as
/// `frac(phase * n)`, so all partials of a note stay phase-locked.
#[derive(Debug, Clone)]
pub struct NoteSlot {
    channel: u8,
    pitch: u8,
    amplitude: f32,
    state: SlotState,
    age: u64,
    phase: f64,
    increment: f64,
    envelope: Envelope,
}

impl NoteSlot {
    pub fn new(envelope: Envelope) -> Self {
        Self {
            channel: 0,
            pitch: 0,
            amplitude: 0.0,
            state: SlotState::Free,
            age: 0,
            phase: 0.0,
            increment: 0.0,
            envelope,
        }
    }

    /// Start `pitch` from phase zero. `velocity` is 1..=127.
    pub fn start(&mut self, channel: u8, pitch: u8, velocity: u8, age: u64, sample_rate: f64) {
        self.channel = channel;
        self.pitch = pitch;
        self.amplitude = f32::from(velocity) / 127.0;
        self.state = SlotState::Active;
        self.age = age;
        self.phase = 0.0;
        self.increment = midi_to_hz(pitch) / sample_rate;
        self.envelope.note_on();
    }

    pub fn release(&mut self) {
        if self.state == SlotState::Active {
            self.state = SlotState::Releasing;
            self.envelope.note_off();
        }
    }

    /// Held (not yet released) note on `channel` with `pitch`.
    pub fn holds(&self, channel: u8, pitch: u8) -> bool {
        self.state == SlotState::Active && self.channel == channel && self.pitch == pitch
    }

    /// Advance one sample. Returns the fundamental's phase for this sample
    /// and the note's amplitude (velocity times envelope).
    #[inline]
    pub fn tick(&mut self) -> (f64, f32) {
        let phase = self.phase;
        let level = self.envelope.next_sample() * self.amplitude;

        self.phase += self.increment;
        self.phase -= self.phase.floor();

        (phase, level)
    }

    /// Fundamental frequency over sample rate.
    pub fn increment(&self) -> f64 {
        self.increment
    }

    /// Return to `Free` once a released note's envelope has run out.
    pub fn reap(&mut self) {
        if self.state == SlotState::Releasing && !self.envelope.is_active() {
            self.free();
        }
    }

    pub fn free(&mut self) {
        self.state = SlotState::Free;
        self.envelope.reset();
    }

    pub fn is_free(&self) -> bool {
        self.state == SlotState::Free
    }

    pub fn is_sounding(&self) -> bool {
        matches!(self.state, SlotState::Active | SlotState::Releasing)
    }

    pub fn pitch(&self) -> u8 {
        self.pitch
    }

    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn state(&self) -> SlotState {
        self.state
    }
}
