//! Benchmarks for event decoding.

use std::hint::black_box;

use cantina_render::io::{EventDecoder, TimedEvent};
use criterion::{BenchmarkId, Criterion};

const EVENT_COUNTS: &[usize] = &[8, 64, 512];

pub fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/decode");

    for &count in EVENT_COUNTS {
        // Note on/off pairs and controllers, with a foreign event every 8th
        let events: Vec<TimedEvent> = (0..count)
            .map(|i| {
                let frame = i as u32;
                match i % 8 {
                    7 => TimedEvent::other(frame, 42),
                    n if n % 2 == 0 => TimedEvent::midi(frame, [0x90, 60 + n as u8, 100]),
                    n => TimedEvent::midi(frame, [0xB0, n as u8, 64]),
                }
            })
            .collect();

        group.bench_with_input(BenchmarkId::new("mixed", count), &count, |b, _| {
            b.iter(|| {
                let mut decoder = EventDecoder::new(black_box(&events));
                let decoded = decoder.by_ref().count();
                black_box((decoded, decoder.skipped()))
            })
        });
    }

    group.finish();
}
