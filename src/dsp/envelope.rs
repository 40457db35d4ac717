use crate::dsp::MIN_TIME;

/*
Linear ADSR
===========

Four stages after a gate: ramp 0 → 1 (attack), fall 1 → S (decay),
hold S while the key is down (sustain), then fall to 0 once it is released
(release).

Stage times are converted to per-sample steps once, when the envelope is
built for a sample rate:

    step = level_change / (seconds × sample_rate)

The sample rate is fixed for the engine's lifetime, so there is nothing to
invalidate later.

note_off releases from wherever the level currently is (attack, decay or
sustain), never from the sustain level, so an early release does not click.
Release interpolates from the snapshot level down to exactly 0.0.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
}

#[derive(Debug, Clone)]
pub struct Envelope {
    attack_step: f32,
    decay_samples: f32,
    sustain_level: f32,
    release_samples: u32,

    stage: EnvelopeStage,
    level: f32,

    release_start_level: f32,
    release_elapsed: u32,
}

impl Envelope {
    /// Build an envelope with times in seconds for `sample_rate`.
    pub fn adsr(sample_rate: f32, attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        let samples = |seconds: f32| (seconds.max(MIN_TIME) * sample_rate).max(1.0);

        Self {
            attack_step: 1.0 / samples(attack),
            decay_samples: samples(decay),
            sustain_level: sustain.clamp(0.0, 1.0),
            release_samples: samples(release).round() as u32,

            stage: EnvelopeStage::Idle,
            level: 0.0,
            release_start_level: 0.0,
            release_elapsed: 0,
        }
    }

    /// Gate high: restart the attack from zero.
    pub fn note_on(&mut self) {
        self.level = 0.0;
        self.stage = EnvelopeStage::Attack;
        self.release_elapsed = 0;
    }

    /// Gate low: release from the current level.
    pub fn note_off(&mut self) {
        if self.stage == EnvelopeStage::Idle {
            return;
        }
        self.release_start_level = self.level;
        self.release_elapsed = 0;
        self.stage = EnvelopeStage::Release;
    }

    /// Advance one sample and return the new level.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        match self.stage {
            EnvelopeStage::Idle => self.level = 0.0,

            EnvelopeStage::Attack => {
                self.level += self.attack_step;
                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.stage = EnvelopeStage::Decay;
                }
            }

            EnvelopeStage::Decay => {
                self.level -= (1.0 - self.sustain_level) / self.decay_samples;
                if self.level <= self.sustain_level {
                    self.level = self.sustain_level;
                    self.stage = EnvelopeStage::Sustain;
                }
            }

            EnvelopeStage::Sustain => self.level = self.sustain_level,

            EnvelopeStage::Release => {
                let progress = self.release_elapsed as f32 / self.release_samples as f32;
                self.level = (self.release_start_level * (1.0 - progress)).max(0.0);

                self.release_elapsed = self.release_elapsed.saturating_add(1);
                if self.release_elapsed >= self.release_samples {
                    self.level = 0.0;
                    self.stage = EnvelopeStage::Idle;
                }
            }
        }

        debug_assert!((0.0..=1.0).contains(&self.level));
        self.level
    }

    /// True until the release has run out.
    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeStage::Idle
    }

    pub fn reset(&mut self) {
        self.stage = EnvelopeStage::Idle;
        self.level = 0.0;
        self.release_start_level = 0.0;
        self.release_elapsed = 0;
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 1_000.0;

    fn run(env: &mut Envelope, samples: usize) {
        for _ in 0..samples {
            env.next_sample();
        }
    }

    #[test]
    fn attack_reaches_full_level() {
        let mut env = Envelope::adsr(SAMPLE_RATE, 0.01, 0.1, 0.7, 0.2);

        env.note_on();
        run(&mut env, 11);

        assert!(env.level() > 0.99, "expected attack to reach full level");
        assert_ne!(env.stage(), EnvelopeStage::Attack);
    }

    #[test]
    fn sustain_holds_target_level() {
        let mut env = Envelope::adsr(SAMPLE_RATE, 0.01, 0.05, 0.6, 0.2);

        env.note_on();
        run(&mut env, 65);

        assert_eq!(env.stage(), EnvelopeStage::Sustain);
        assert!((env.level() - 0.6).abs() < 0.05, "sustain level should be held");
    }

    #[test]
    fn release_falls_back_to_idle() {
        let mut env = Envelope::adsr(SAMPLE_RATE, 0.01, 0.05, 0.5, 0.03);

        env.note_on();
        run(&mut env, 20);
        env.note_off();
        run(&mut env, 32);

        assert_eq!(env.level(), 0.0);
        assert!(!env.is_active());
    }

    #[test]
    fn note_off_while_idle_is_ignored() {
        let mut env = Envelope::adsr(SAMPLE_RATE, 0.01, 0.05, 0.5, 0.03);
        env.note_off();
        assert_eq!(env.stage(), EnvelopeStage::Idle);
    }
}
