//! Benchmarks for voice mixdown.

use std::hint::black_box;

use cantina_render::dsp::mix;
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

const VOICE_COUNTS: &[usize] = &[4, 16, 64];

pub fn bench_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/mix");

    for &size in BLOCK_SIZES {
        let signal_a: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin()).collect();
        let signal_b: Vec<f32> = (0..size).map(|i| (i as f32 * 0.15).cos()).collect();

        // Sum in-place
        let mut buffer_a = signal_a.clone();
        group.bench_with_input(BenchmarkId::new("sum_in_place", size), &size, |b, _| {
            b.iter(|| {
                buffer_a.copy_from_slice(&signal_a);
                mix::sum_in_place(black_box(&mut buffer_a), black_box(&signal_b));
            })
        });

        // Full mixdown: zero, sum N voices, apply gain
        for &voices in VOICE_COUNTS {
            let buffers: Vec<Vec<f32>> = (0..voices)
                .map(|v| (0..size).map(|i| ((i + v) as f32 * 0.07).sin()).collect())
                .collect();
            let mut output = vec![0.0f32; size];

            group.bench_with_input(
                BenchmarkId::new(format!("mix_voices/{voices}"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        mix::mix_voices(
                            black_box(buffers.iter().map(Vec::as_slice)),
                            black_box(-6.0),
                            black_box(&mut output),
                        );
                    })
                },
            );
        }
    }

    group.finish();
}
