//! Benchmarks for full blocks through the reference harmonic engine.

use std::hint::black_box;

use cantina_render::{BlockInputs, HarmonicEngine, RenderPipeline, TimedEvent};
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

pub fn bench_harmonic(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/harmonic");

    // Four-note chord held across every iteration
    let chord: Vec<TimedEvent> = [48u8, 55, 60, 64]
        .iter()
        .map(|&pitch| TimedEvent::midi(0, [0x90, pitch, 100]))
        .collect();

    for &size in BLOCK_SIZES {
        let seed: Vec<f32> = (0..size).map(|i| 0.5 + 0.5 * (i as f32 * 0.01).sin()).collect();
        let mut output = vec![0.0f32; size];

        for harmonics in [4usize, 16] {
            let mut pipeline = RenderPipeline::new(HarmonicEngine::new);
            pipeline
                .configure(harmonics, 48_000.0, size)
                .expect("bench pipeline configures");
            pipeline
                .render_block(
                    BlockInputs {
                        seed: &seed,
                        events: &chord,
                        gain_db: 0.0,
                    },
                    &mut output,
                )
                .expect("chord starts");

            group.bench_with_input(
                BenchmarkId::new(format!("chord/{harmonics}"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        let report = pipeline.render_block(
                            BlockInputs {
                                seed: black_box(&seed),
                                events: &[],
                                gain_db: -12.0,
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
