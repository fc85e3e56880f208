//! Wiener/MMSE spectral gain
//!
//! `xi = |X|² / (noise + 1e-10)`, `G = xi / (xi + 1)` clipped to [0, 1].
//! Low-SNR bins are attenuated with a smooth transition to pass-through.

/// Regularizer on the noise power denominator
pub const GAIN_EPSILON: f32 = 1e-10;

/// Per-bin gain from magnitude and noise power
pub fn wiener_gain(magnitude: &[f32], noise_power: &[f32], gain: &mut [f32]) {
    for ((g, &mag), &noise) in gain.iter_mut().zip(magnitude).zip(noise_power) {
        let xi = mag * mag / (noise + GAIN_EPSILON);
        *g = (xi / (xi + 1.0)).clamp(0.0, 1.0);
    }
}

/// Denoised magnitude `G * |X|`
pub fn apply_gain(magnitude: &[f32], gain: &[f32], out: &mut [f32]) {
    for ((o, &mag), &g) in out.iter_mut().zip(magnitude).zip(gain) {
        *o = g * mag;
    }
}
