//! Voice summing and mixdown.

/*
Voice Mixdown
=============

Every voice renders into its own buffer. The host wants one channel. The
mixdown adds the voices sample by sample, then scales the sum once:

    output[i] = gain × (voice_0[i] + voice_1[i] + ... + voice_n[i])

Order matters for bit-exact results: the output is zeroed, voices are added
in index order, and the gain is applied last. Floating-point addition is not
associative, so a different order gives a (very slightly) different answer.


Clipping Risk
-------------

Summing is unweighted. Three voices each peaking at 1.0 sum to 3.0, well
outside [-1.0, +1.0]:

    voice 0:  [ 1.0,  0.5, -0.5]
    voice 1:  [ 1.0,  0.8,  0.2]
    voice 2:  [ 1.0,  0.2, -0.9]
    sum:      [ 3.0,  1.5, -1.2]  ← exceeds ±1.0!

Headroom is the engine's job (harmonic voices fall off as 1/n) and the
user's (the gain control). The mixer does not limit.
*/

use crate::dsp::gain::{apply_gain, db_to_gain};

/// Add signal B into signal A in-place (summing).
///
/// ⚠️ WARNING: Can exceed [-1.0, +1.0] range!
#[inline]
pub fn sum_in_place(a: &mut [f32], b: &[f32]) {
    debug_assert_eq!(a.len(), b.len());

    for (sa, &sb) in a.iter_mut().zip(b.iter()) {
        *sa += sb;
    }
}

/// Sum `voices` into `out` and scale by the gain for `gain_db`.
///
/// `out` is fully overwritten. Each voice must be exactly `out.len()`
/// samples long.
pub fn mix_voices<'v, I>(voices: I, gain_db: f32, out: &mut [f32])
where
    I: IntoIterator<Item = &'v [f32]>,
{
    out.fill(0.0);
    for voice in voices {
        sum_in_place(out, voice);
    }
    apply_gain(out, db_to_gain(gain_db));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_can_exceed_one() {
        let mut a = [1.0, 0.5];
        sum_in_place(&mut a, &[1.0, 0.8]);

        assert_eq!(a[0], 2.0); // Exceeds 1.0!
        assert_eq!(a[1], 1.3);
    }

    #[test]
    fn mix_three_constant_voices_at_unity() {
        let voices: [&[f32]; 3] = [&[1.0; 4], &[2.0; 4], &[3.0; 4]];
        let mut out = [f32::NAN; 4];

        mix_voices(voices, 0.0, &mut out);

        assert_eq!(out, [6.0; 4]);
    }

    #[test]
    fn mix_at_floor_is_silent() {
        let voices: [&[f32]; 2] = [&[0.7, -0.2], &[0.1, 0.4]];
        let mut out = [1.0; 2];

        mix_voices(voices, -90.0, &mut out);

        assert_eq!(out, [0.0; 2]);
    }

    #[test]
    fn mix_applies_gain_after_summing() {
        let a = [0.1f32, -0.3, 0.25];
        let b = [0.2f32, 0.6, -0.05];
        let gain_db = -6.0;
        let mut out = [0.0; 3];

        mix_voices([&a[..], &b[..]], gain_db, &mut out);

        let coef = db_to_gain(gain_db);
        for i in 0..3 {
            assert_eq!(out[i], coef * (0.0 + a[i] + b[i]));
        }
    }

    #[test]
    fn no_voices_gives_silence() {
        let mut out = [0.5; 3];
        mix_voices(std::iter::empty::<&[f32]>(), 0.0, &mut out);
        assert_eq!(out, [0.0; 3]);
    }
}
