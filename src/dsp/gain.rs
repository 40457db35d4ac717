//! Decibel gain primitives.

/*
Decibels to Amplitude
=====================

The host hands us output gain in decibels. Samples need a linear factor.

    amplitude = 10 ^ (dB / 20)  =  10 ^ (dB × 0.05)

Common reference points:
    +6 dB  →  ×2.0   (double amplitude)
     0 dB  →  ×1.0   (unity, no change)
    -6 dB  →  ×0.5   (half amplitude)
   -20 dB  →  ×0.1
   -40 dB  →  ×0.01  (barely audible)

The curve never reaches zero: -120 dB is still ×0.000001. Somewhere down
there the signal is inaudible, and `powf` on huge negative exponents starts
producing denormals and precision noise. So we cut it off:

    dB >  -90  →  10 ^ (dB × 0.05)
    dB <= -90  →  0.0   (hard mute)

Above the floor the curve is strictly increasing; at and below it the output
is exactly zero. NaN compares false against the floor and mutes as well.

The factor is recomputed every block from the current control value. It is
cheap, and caching it would only add a place for stale gain to hide.
*/

/// Gain at or below this level is a hard mute.
pub const MUTE_FLOOR_DB: f32 = -90.0;

/// Convert decibels to a linear amplitude factor.
///
/// Returns exactly `0.0` for `db <= MUTE_FLOOR_DB` (and NaN).
#[inline]
pub fn db_to_gain(db: f32) -> f32 {
    if db > MUTE_FLOOR_DB {
        10.0_f32.powf(db * 0.05)
    } else {
        0.0
    }
}

/// Multiply a signal by a constant gain factor (in-place).
#[inline]
pub fn apply_gain(signal: &mut [f32], gain: f32) {
    for sample in signal.iter_mut() {
        *sample *= gain;
    }
}
