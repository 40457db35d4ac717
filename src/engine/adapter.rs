use crate::buffer::VoiceBlock;
use crate::engine::{BlockClock, ControlInput, EngineConfig, EngineFactory, NoteInput, SynthEngine};
use crate::error::{EngineConfigError, EngineRuntimeError};
use crate::io::midi::MidiEvent;

/// Owns one engine instance and the clock it was built with.
///
/// Replaced wholesale when the voice count changes; never resized in place.
pub struct EngineAdapter<E: SynthEngine> {
    engine: E,
    clock: BlockClock,
    config: EngineConfig,
}

impl<E: SynthEngine> EngineAdapter<E> {
    /// Validate `config`, build an engine with `factory` and install its clock.
    pub fn new<F>(factory: &F, config: EngineConfig) -> Result<Self, EngineConfigError>
    where
        F: EngineFactory<Engine = E>,
    {
        config.validate()?;

        let mut engine = factory.create(&config)?;
        if engine.voice_count() == 0 {
            return Err(EngineConfigError::ZeroVoices);
        }

        let clock = BlockClock::new(config.sample_rate);
        engine.set_clock_source(clock.clone());

        log::info!(
            "engine built: {} voices, {} harmonics, {} Hz, {} channel(s)",
            engine.voice_count(),
            engine.harmonic_count(),
            config.sample_rate,
            config.channel_count
        );

        Ok(Self {
            engine,
            clock,
            config,
        })
    }

    /// Route a decoded event to the engine's note or control input.
    pub fn dispatch(&mut self, event: MidiEvent) -> Result<(), EngineRuntimeError> {
        match event {
            MidiEvent::NoteOn {
                channel,
                pitch,
                velocity,
            } => self.engine.receive_note(NoteInput {
                channel,
                pitch,
                velocity,
                on: true,
            }),
            MidiEvent::NoteOff {
                channel,
                pitch,
                velocity,
            } => self.engine.receive_note(NoteInput {
                channel,
                pitch,
                velocity,
                on: false,
            }),
            MidiEvent::Control {
                channel,
                controller,
                value,
            } => self.engine.receive_control(ControlInput {
                channel,
                controller,
                value,
            }),
        }
    }

    #[inline]
    pub fn advance(&mut self) -> Result<(), EngineRuntimeError> {
        self.engine.advance()
    }

    /// Render one block into `voices`.
    ///
    /// `seed` must hold at least `voices.len()` samples.
    pub fn render(
        &mut self,
        seed: &[f32],
        voices: &mut VoiceBlock<'_>,
    ) -> Result<(), EngineRuntimeError> {
        let expected = self.engine.voice_count();
        if voices.voice_count() != expected {
            return Err(EngineRuntimeError::VoiceCountMismatch {
                expected,
                actual: voices.voice_count(),
            });
        }
        self.engine.render(&seed[..voices.len()], voices)
    }

    /// Record the length of the block just rendered for the engine's clock.
    #[inline]
    pub fn finish_block(&self, block_len: usize) {
        self.clock.record_block(block_len);
    }

    #[inline]
    pub fn voice_count(&self) -> usize {
        self.engine.voice_count()
    }

    #[inline]
    pub fn harmonic_count(&self) -> usize {
        self.engine.harmonic_count()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn clock(&self) -> &BlockClock {
        &self.clock
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }
}
