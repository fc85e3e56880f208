//! Framewise log-spectral distance
//!
//! Both signals are cut to their common length and framed with a symmetric
//! Hann window. Per frame, the RMS difference of natural-log magnitudes is
//! taken across bins; the result is the mean over frames. Identical signals
//! score 0, larger is worse.

use crate::error::{MetricsError, MetricsResult};
use realfft::RealFftPlanner;
use rustfft::num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Framing parameters for [`lsd_framewise`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LsdParams {
    /// FFT size; segments are zero-padded or truncated to it
    pub n_fft: usize,
    /// Frame advance
    pub hop: usize,
    /// Window length
    pub win: usize,
    /// Added to magnitudes before the log
    pub eps: f64,
}

impl Default for LsdParams {
    fn default() -> Self {
        Self {
            n_fft: 512,
            hop: 256,
            win: 512,
            eps: 1e-8,
        }
    }
}

impl LsdParams {
    /// Reject sizes that cannot frame a signal
    pub fn validate(&self) -> MetricsResult<()> {
        if self.n_fft == 0 || self.hop == 0 || self.win == 0 {
            return Err(MetricsError::InvalidParams(format!(
                "n_fft, hop and win must be positive (got {}, {}, {})",
                self.n_fft, self.hop, self.win
            )));
        }
        if !(self.eps.is_finite() && self.eps > 0.0) {
            return Err(MetricsError::InvalidParams(format!(
                "eps must be positive, got {}",
                self.eps
            )));
        }
        Ok(())
    }
}

/// Symmetric Hann window (zero at both ends)
pub fn symmetric_hann(len: usize) -> Vec<f64> {
    match len {
        0 => Vec::new(),
        1 => vec![1.0],
        _ => {
            let denom = (len - 1) as f64;
            (0..len)
                .map(|i| 0.5 - 0.5 * (2.0 * std::f64::consts::PI * i as f64 / denom).cos())
                .collect()
        }
    }
}

/// Magnitude frames of a signal, frame-major
fn magnitude_frames(signal: &[f32], params: &LsdParams, window: &[f64]) -> Vec<Vec<f64>> {
    let mut padded = signal.to_vec();
    if padded.len() < params.win {
        padded.resize(params.win, 0.0);
    }
    let num_frames = 1 + (padded.len() - params.win) / params.hop;

    let mut planner = RealFftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(params.n_fft);
    let mut input = fft.make_input_vec();
    let mut spectrum: Vec<Complex64> = fft.make_output_vec();

    (0..num_frames)
        .map(|t| {
            let start = t * params.hop;
            let segment = &padded[start..start + params.win];

            input.fill(0.0);
            for ((dst, &x), &w) in input.iter_mut().zip(segment).zip(window) {
                *dst = x as f64 * w;
            }
            fft.process(&mut input, &mut spectrum).ok();

            spectrum.iter().map(|c| c.norm()).collect()
        })
        .collect()
}

/// Framewise LSD between a reference and an estimate
pub fn lsd_framewise(clean: &[f32], estimate: &[f32], params: &LsdParams) -> MetricsResult<f64> {
    params.validate()?;

    let n = clean.len().min(estimate.len());
    let window = symmetric_hann(params.win);

    let reference = magnitude_frames(&clean[..n], params, &window);
    let degraded = magnitude_frames(&estimate[..n], params, &window);

    let per_frame: Vec<f64> = reference
        .iter()
        .zip(&degraded)
        .map(|(c, e)| {
            let mean_sq = c
                .iter()
                .zip(e)
                .map(|(&a, &b)| {
                    let d = (a + params.eps).ln() - (b + params.eps).ln();
                    d * d
                })
                .sum::<f64>()
                / c.len() as f64;
            mean_sq.sqrt()
        })
        .collect();

    Ok(per_frame.iter().sum::<f64>() / per_frame.len() as f64)
}
