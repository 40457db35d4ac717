//! Stub engines shared by the unit tests.

use crate::buffer::VoiceBlock;
use crate::engine::{BlockClock, ControlInput, EngineConfig, NoteInput, SynthEngine};
use crate::error::{EngineConfigError, EngineRuntimeError};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Note(NoteInput),
    Control(ControlInput),
    Advance { clock: f64 },
    Render { len: usize },
}

/// Records every call and fills voice `v` with `v + 1`.
///
/// Notes with negative pitch and controller 127 are rejected. `fail_render`
/// makes the next render fail after writing garbage.
pub struct RecordingEngine {
    pub voices: usize,
    pub clock: Option<BlockClock>,
    pub calls: Vec<Call>,
    pub fail_render: bool,
    pub panic_on_render: bool,
}

impl RecordingEngine {
    pub fn new(voices: usize) -> Self {
        Self {
            voices,
            clock: None,
            calls: Vec::new(),
            fail_render: false,
            panic_on_render: false,
        }
    }
}

impl SynthEngine for RecordingEngine {
    fn set_clock_source(&mut self, clock: BlockClock) {
        self.clock = Some(clock);
    }

    fn receive_note(&mut self, note: NoteInput) -> Result<(), EngineRuntimeError> {
        if note.pitch < 0 {
            return Err(EngineRuntimeError::NoteRejected {
                channel: note.channel,
                pitch: note.pitch,
                reason: "negative pitch",
            });
        }
        self.calls.push(Call::Note(note));
        Ok(())
    }

    fn receive_control(&mut self, control: ControlInput) -> Result<(), EngineRuntimeError> {
        if control.controller == 127 {
            return Err(EngineRuntimeError::ControlRejected {
                channel: control.channel,
                controller: control.controller,
                reason: "reserved controller",
            });
        }
        self.calls.push(Call::Control(control));
        Ok(())
    }

    fn advance(&mut self) -> Result<(), EngineRuntimeError> {
        let clock = self.clock.as_ref().map_or(0.0, BlockClock::elapsed);
        self.calls.push(Call::Advance { clock });
        Ok(())
    }

    fn render(&mut self, _seed: &[f32], voices: &mut VoiceBlock<'_>) -> Result<(), EngineRuntimeError> {
        self.calls.push(Call::Render { len: voices.len() });
        if self.panic_on_render {
            panic!("engine exploded");
        }
        if self.fail_render {
            voices.fill(9.0);
            return Err(EngineRuntimeError::Render("forced failure"));
        }
        for (v, voice) in voices.iter_mut().enumerate() {
            voice.fill((v + 1) as f32);
        }
        Ok(())
    }

    fn voice_count(&self) -> usize {
        self.voices
    }
}

pub fn recording_factory(
) -> impl Fn(&EngineConfig) -> Result<RecordingEngine, EngineConfigError> + Send + Clone {
    |config: &EngineConfig| Ok(RecordingEngine::new(config.voice_count))
}
