//! Benchmarks for pipeline overhead around a trivial engine.

use std::hint::black_box;

use cantina_render::buffer::VoiceBlock;
use cantina_render::engine::{BlockClock, ControlInput, EngineConfig, NoteInput, SynthEngine};
use cantina_render::error::{EngineConfigError, EngineRuntimeError};
use cantina_render::{BlockInputs, RenderPipeline, TimedEvent};
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

/// Writes a constant into every voice; measures everything but synthesis.
struct FlatEngine {
    voices: usize,
}

impl SynthEngine for FlatEngine {
    fn set_clock_source(&mut self, _clock: BlockClock) {}

    fn receive_note(&mut self, _note: NoteInput) -> Result<(), EngineRuntimeError> {
        Ok(())
    }

    fn receive_control(&mut self, _control: ControlInput) -> Result<(), EngineRuntimeError> {
        Ok(())
    }

    fn advance(&mut self) -> Result<(), EngineRuntimeError> {
        Ok(())
    }

    fn render(&mut self, _seed: &[f32], voices: &mut VoiceBlock<'_>) -> Result<(), EngineRuntimeError> {
        voices.fill(0.25);
        Ok(())
    }

    fn voice_count(&self) -> usize {
        self.voices
    }
}

fn flat_engine(config: &EngineConfig) -> Result<FlatEngine, EngineConfigError> {
    Ok(FlatEngine {
        voices: config.voice_count,
    })
}

pub fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/pipeline");

    let events = [
        TimedEvent::midi(0, [0x90, 60, 100]),
        TimedEvent::midi(0, [0xB0, 1, 64]),
        TimedEvent::midi(0, [0x80, 60, 0]),
    ];

    for &size in BLOCK_SIZES {
        let seed = vec![0.5f32; size];
        let mut output = vec![0.0f32; size];

        for voices in [4usize, 32] {
            let mut pipeline = RenderPipeline::new(flat_engine);
            pipeline
                .configure(voices, 48_000.0, size)
                .expect("bench pipeline configures");

            group.bench_with_input(
                BenchmarkId::new(format!("render_block/{voices}"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        let report = pipeline.render_block(
                            BlockInputs {
                                seed: black_box(&seed),
                                events: black_box(&events),
                                gain_db: -6.0,
                            },
                            black_box(&mut output),
                        );
                        black_box(report)
                    })
                },
            );
        }
    }

    group.finish();
}
