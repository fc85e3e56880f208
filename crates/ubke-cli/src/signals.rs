//! Reproducible test signals

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::f64::consts::PI;

/// Standard normal samples (Box-Muller) from a seeded generator
pub fn gaussian(len: usize, seed: u64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len)
        .map(|_| {
            let u1 = rng.random::<f64>().max(f64::MIN_POSITIVE);
            let u2 = rng.random::<f64>();
            (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
        })
        .collect()
}

/// Sine at `freq` Hz
pub fn sine(len: usize, freq: f64, sample_rate: u32, amplitude: f64) -> Vec<f64> {
    (0..len)
        .map(|i| amplitude * (2.0 * PI * freq * i as f64 / sample_rate as f64).sin())
        .collect()
}

/// Two-tone "clean" signal and its noisy version under a slowly pulsing
/// noise envelope
#[derive(Debug, Clone)]
pub struct DemoSignal {
    pub clean: Vec<f32>,
    pub noisy: Vec<f32>,
}

/// Build the demo signal: `0.1 sin(220 Hz) + 0.05 sin(440 Hz)` plus
/// `0.06 n(t) env(t)` with `env = 0.2 + 0.8 sin²(2π 0.7 t)`
pub fn demo_signal(sample_rate: u32, seconds: f64, seed: u64) -> DemoSignal {
    let len = (sample_rate as f64 * seconds) as usize;
    let low = sine(len, 220.0, sample_rate, 0.1);
    let high = sine(len, 440.0, sample_rate, 0.05);
    let noise = gaussian(len, seed);

    let mut clean = Vec::with_capacity(len);
    let mut noisy = Vec::with_capacity(len);
    for i in 0..len {
        let t = i as f64 / sample_rate as f64;
        let env = 0.2 + 0.8 * (2.0 * PI * 0.7 * t).sin().powi(2);
        let c = low[i] + high[i];
        clean.push(c as f32);
        noisy.push((c + 0.06 * noise[i] * env) as f32);
    }

    DemoSignal { clean, noisy }
}
