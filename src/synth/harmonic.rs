use std::f64::consts::TAU;

use crate::buffer::VoiceBlock;
use crate::dsp::envelope::Envelope;
use crate::engine::{BlockClock, ControlInput, EngineConfig, NoteInput, SynthEngine};
use crate::error::{EngineConfigError, EngineRuntimeError};
use crate::synth::voice::{NoteSlot, SlotState};

/*
Harmonic Voices
===============

Each output voice is one partial. Voice v carries harmonic v + 1 of every
sounding note:

    voice[v][i] = Σ_notes  env(i) × vel/127 × 1/(v+1) × sin(2π × frac((v+1) × φ(i)))
                  × mod(i) × level

    mod(i) = 1 - depth + depth × seed[i]

With depth 0 the seed is ignored. With depth 1 the seed is a pure amplitude
modulator and a silent seed silences the engine.

Partials at or above Nyquist alias back down as inharmonic junk, so a note
contributes only to voices whose partial fits under sample_rate / 2. A high
note lights up fewer voices than a low one.

Notes live in a fixed pool of slots allocated at construction. Allocation
takes a free slot first, then steals the oldest releasing one. If every slot
is held the note is refused.

Controllers: 1 sets modulation depth, 7 sets level, 123 releases every note.
Anything else is accepted and ignored.
*/

/// Number of simultaneous notes.
pub const NOTE_SLOTS: usize = 16;

const CC_MOD_WHEEL: u8 = 1;
const CC_VOLUME: u8 = 7;
const CC_ALL_NOTES_OFF: u8 = 123;

/// Envelope times in seconds and sustain level in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdsrTimes {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
}

impl Default for AdsrTimes {
    fn default() -> Self {
        Self {
            attack: 0.005,
            decay: 0.12,
            sustain: 0.7,
            release: 0.3,
        }
    }
}

pub struct HarmonicEngine {
    partials: usize,
    sample_rate: f64,
    slots: Vec<NoteSlot>,
    clock: Option<BlockClock>,
    frames: u64,
    depth: f32,
    level: f32,
}

impl HarmonicEngine {
    /// Build with the default envelope. Usable directly as an engine factory.
    pub fn new(config: &EngineConfig) -> Result<Self, EngineConfigError> {
        Self::with_envelope(config, AdsrTimes::default())
    }

    pub fn with_envelope(config: &EngineConfig, times: AdsrTimes) -> Result<Self, EngineConfigError> {
        config.validate()?;

        let envelope = Envelope::adsr(
            config.sample_rate as f32,
            times.attack,
            times.decay,
            times.sustain,
            times.release,
        );
        let slots = (0..NOTE_SLOTS)
            .map(|_| NoteSlot::new(envelope.clone()))
            .collect();

        Ok(Self {
            partials: config.voice_count,
            sample_rate: config.sample_rate,
            slots,
            clock: None,
            frames: 0,
            depth: 0.0,
            level: 1.0,
        })
    }

    /// Notes currently sounding (held or releasing).
    pub fn sounding(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_sounding()).count()
    }

    /// Frame index of the current block's first sample, as seen by `advance`.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn slots(&self) -> &[NoteSlot] {
        &self.slots
    }

    fn allocate(&mut self) -> Option<&mut NoteSlot> {
        // First pass: free slot
        if let Some(idx) = self.slots.iter().position(NoteSlot::is_free) {
            return Some(&mut self.slots[idx]);
        }

        // Second pass: steal oldest releasing slot
        let steal_idx = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.state() == SlotState::Releasing)
            .min_by_key(|(_, slot)| slot.age())
            .map(|(idx, _)| idx);

        steal_idx.map(|idx| &mut self.slots[idx])
    }
}

impl SynthEngine for HarmonicEngine {
    fn set_clock_source(&mut self, clock: BlockClock) {
        self.clock = Some(clock);
    }

    fn receive_note(&mut self, note: NoteInput) -> Result<(), EngineRuntimeError> {
        let (Ok(pitch), Ok(velocity)) = (u8::try_from(note.pitch), u8::try_from(note.velocity)) else {
            return Err(EngineRuntimeError::NoteRejected {
                channel: note.channel,
                pitch: note.pitch,
                reason: "pitch and velocity must be in 0..=127",
            });
        };

        if note.is_release() {
            for slot in self.slots.iter_mut().filter(|slot| slot.holds(note.channel, pitch)) {
                slot.release();
            }
            return Ok(());
        }

        let age = self.frames;
        let sample_rate = self.sample_rate;
        let slot = self
            .allocate()
            .ok_or(EngineRuntimeError::NoFreeVoice { pitch: note.pitch })?;
        slot.start(note.channel, pitch, velocity, age, sample_rate);
        Ok(())
    }

    fn receive_control(&mut self, control: ControlInput) -> Result<(), EngineRuntimeError> {
        match control.controller {
            CC_MOD_WHEEL => self.depth = f32::from(control.value) / 127.0,
            CC_VOLUME => self.level = f32::from(control.value) / 127.0,
            CC_ALL_NOTES_OFF => self.slots.iter_mut().for_each(NoteSlot::release),
            _ => {}
        }
        Ok(())
    }

    fn advance(&mut self) -> Result<(), EngineRuntimeError> {
        // The clock reports the previous block, so this lands on the first
        // frame of the block about to render.
        if let Some(clock) = &self.clock {
            self.frames += clock.last_block_len() as u64;
        }
        Ok(())
    }

    fn render(&mut self, seed: &[f32], voices: &mut VoiceBlock<'_>) -> Result<(), EngineRuntimeError> {
        if seed.len() < voices.len() {
            return Err(EngineRuntimeError::Render("seed shorter than block"));
        }

        voices.fill(0.0);

        let partials = self.partials.min(voices.voice_count());
        let depth = self.depth;
        let level = self.level;

        for slot in self.slots.iter_mut().filter(|slot| slot.is_sounding()) {
            // Highest partial below Nyquist: increment × n < 0.5
            let audible = ((0.5 / slot.increment()).ceil() as usize).saturating_sub(1);
            let partials = partials.min(audible);

            for (i, &seed_sample) in seed.iter().enumerate().take(voices.len()) {
                let (phase, amplitude) = slot.tick();
                let gain = amplitude * level * (1.0 - depth + depth * seed_sample);
                if gain == 0.0 {
                    continue;
                }

                for v in 0..partials {
                    let harmonic = (v + 1) as f64;
                    let cycle = (phase * harmonic).fract();
                    let sample = (TAU * cycle).sin() as f32 * gain / harmonic as f32;
                    voices.voice_mut(v)[i] += sample;
                }
            }

            slot.reap();
        }

        Ok(())
    }

    fn voice_count(&self) -> usize {
        self.partials
    }
}
