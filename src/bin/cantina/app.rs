//! Cantina - demo builder and audio runner

use std::f32::consts::TAU;
use std::time::Duration;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::Producer;

use cantina_render::{
    io::queue::event_queue, BlockStatus, CantinaPlugin, HarmonicEngine, MidiEvent,
    PluginConfig, RunPorts, TimedEvent,
};

/// Largest chunk handed to the plugin per `run` call.
const MAX_CHUNK: usize = 512;
/// Seed LFO rate in Hz.
const SEED_RATE: f32 = 3.0;

pub struct Cantina {
    bpm: f64,
    harmonics: i32,
    gain_db: f32,
    notes: Vec<u8>,
    bars: usize,
}

impl Cantina {
    pub fn new() -> Self {
        Self {
            bpm: 120.0,
            harmonics: 4,
            gain_db: 0.0,
            notes: vec![60, 64, 67, 72],
            bars: 2,
        }
    }

    pub fn bpm(mut self, bpm: f64) -> Self {
        self.bpm = bpm;
        self
    }

    /// Voices requested through the harmonic-count port.
    pub fn harmonics(mut self, count: i32) -> Self {
        self.harmonics = count;
        self
    }

    pub fn gain_db(mut self, db: f32) -> Self {
        self.gain_db = db;
        self
    }

    /// Notes played as sixteenths, cycled.
    pub fn arpeggio(mut self, notes: &[u8]) -> Self {
        self.notes = notes.to_vec();
        self
    }

    pub fn bars(mut self, bars: usize) -> Self {
        self.bars = bars;
        self
    }

    /// Play through the default output device, then return.
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;

        println!("=== Cantina ===");
        println!("BPM: {}", self.bpm);
        println!("Harmonics: {}", self.harmonics);
        println!("Sample rate: {} Hz", sample_rate);
        println!("Channels: {}", channels);
        println!();

        let mut plugin = CantinaPlugin::instantiate(
            HarmonicEngine::new,
            f64::from(sample_rate),
            plugin_config(self.harmonics)?,
        )
        .wrap_err("failed to instantiate renderer")?;
        plugin
            .activate(MAX_CHUNK)
            .wrap_err("failed to activate renderer")?;

        let (mut tx, mut queue) = event_queue(256);

        let harmonics = self.harmonics;
        let gain_db = self.gain_db;
        let mut seed = vec![0.0f32; MAX_CHUNK];
        let mut mono = vec![0.0f32; MAX_CHUNK];
        let mut seed_phase = 0.0f32;
        let seed_step = SEED_RATE / sample_rate;

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                let total_frames = data.len() / channels;
                let mut events = queue.drain();
                let mut frames_written = 0;

                while frames_written < total_frames {
                    let frames = (total_frames - frames_written).min(MAX_CHUNK);

                    let seed_block = &mut seed[..frames];
                    for s in seed_block.iter_mut() {
                        *s = 0.5 + 0.5 * (TAU * seed_phase).sin();
                        seed_phase = (seed_phase + seed_step).fract();
                    }

                    let out = &mut mono[..frames];
                    let status = plugin.run(RunPorts {
                        control: events,
                        harmonic_count: Some(harmonics),
                        gain: Some(gain_db),
                        input: seed_block,
                        output: out,
                    });
                    if let BlockStatus::Rendered(report) = status {
                        if report.grew {
                            log::warn!("renderer grew its buffers on the audio thread");
                        }
                    }
                    // Events go to the first chunk only
                    events = &[];

                    // Copy to output (mono to all channels)
                    let out_off = frames_written * channels;
                    for (i, &s) in mono[..frames].iter().enumerate() {
                        for ch in 0..channels {
                            data[out_off + i * channels + ch] = s;
                        }
                    }

                    frames_written += frames;
                }
            },
            |err| log::error!("audio stream error: {err}"),
            None,
        )?;

        stream.play()?;
        println!("Playing {} bars...", self.bars);

        let step = Duration::from_secs_f64(60.0 / self.bpm / 4.0);
        let gate = step.mul_f64(0.8);

        // Half modulation depth so the seed breathes without choking the notes
        send(
            &mut tx,
            MidiEvent::Control {
                channel: 0,
                controller: 1,
                value: 64,
            },
        );

        for &pitch in self.notes.iter().cycle().take(self.bars * 16) {
            let pitch = pitch as i8;
            send(
                &mut tx,
                MidiEvent::NoteOn {
                    channel: 0,
                    pitch,
                    velocity: 100,
                },
            );
            std::thread::sleep(gate);

            send(
                &mut tx,
                MidiEvent::NoteOff {
                    channel: 0,
                    pitch,
                    velocity: 0,
                },
            );
            std::thread::sleep(step - gate);
        }

        // Let the last release ring out
        std::thread::sleep(Duration::from_millis(500));
        drop(stream);
        println!("Done.");
        Ok(())
    }
}

impl Default for Cantina {
    fn default() -> Self {
        Self::new()
    }
}

/// Start with as many voices as the harmonic-count port will request, so
/// the first callback doesn't rebuild the engine on the audio thread.
fn plugin_config(harmonics: i32) -> EyreResult<PluginConfig> {
    let voices = usize::try_from(harmonics)
        .map_err(|_| eyre!("harmonic count must not be negative, got {harmonics}"))?;
    let config = PluginConfig::default().with_default_voice_count(voices);
    config.validate().wrap_err("invalid harmonic count")?;
    Ok(config)
}

/// Queue an event for the next callback. Returns `false` if it was dropped.
fn send(tx: &mut Producer<TimedEvent>, event: MidiEvent) -> bool {
    match tx.push(TimedEvent::from_event(0, event)) {
        Ok(()) => true,
        Err(_) => {
            log::warn!("event queue full, dropping {event:?}");
            false
        }
    }
}
