//! UBKE enhancement orchestration
//!
//! Per frame, strictly in time order:
//! 1. Wiener gain from the current noise power
//! 2. Kalman tracking of the denoised magnitude
//! 3. Variance-optimal fusion of both magnitudes
//! 4. Original phase reattached
//! 5. Noise power updated from the unprocessed magnitude

use crate::config::UbkeConfig;
use crate::error::CoreResult;
use crate::fusion::variance_optimal_fusion;
use crate::gain::{apply_gain, wiener_gain};
use crate::kalman::KalmanBank;
use crate::noise::NoisePowerTracker;
use crate::stft::{Spectrogram, Stft};
use rustfft::num_complex::Complex32;
use std::time::{Duration, Instant};

/// Shortest audio duration used as the RTF denominator
const MIN_AUDIO_SECONDS: f64 = 1e-9;

/// Processing time divided by audio duration
pub fn real_time_factor(proc_seconds: f64, audio_seconds: f64) -> f64 {
    proc_seconds / audio_seconds.max(MIN_AUDIO_SECONDS)
}

/// Per-frame enhancement state: noise power, Kalman bank and work buffers
#[derive(Debug, Clone)]
pub struct FrameProcessor {
    noise: NoisePowerTracker,
    tracker: KalmanBank,
    epsilon: f32,
    magnitude: Vec<f32>,
    gain: Vec<f32>,
    mmse: Vec<f32>,
    kalman: Vec<f32>,
    fused: Vec<f32>,
}

impl FrameProcessor {
    /// Fresh tracker state around a seeded noise estimate
    pub fn new(config: &UbkeConfig, noise: NoisePowerTracker) -> Self {
        let bins = config.audio.num_bins();
        Self {
            noise,
            tracker: KalmanBank::from_config(config),
            epsilon: config.ubke.epsilon,
            magnitude: vec![0.0; bins],
            gain: vec![0.0; bins],
            mmse: vec![0.0; bins],
            kalman: vec![0.0; bins],
            fused: vec![0.0; bins],
        }
    }

    /// Enhance one spectrum in place and return its fusion weight
    pub fn process_frame(&mut self, spectrum: &mut [Complex32]) -> f32 {
        for (m, c) in self.magnitude.iter_mut().zip(spectrum.iter()) {
            *m = c.norm();
        }

        wiener_gain(&self.magnitude, self.noise.power(), &mut self.gain);
        apply_gain(&self.magnitude, &self.gain, &mut self.mmse);

        self.tracker.step(&self.mmse, &mut self.kalman);

        let alpha = variance_optimal_fusion(&self.mmse, &self.kalman, self.epsilon, &mut self.fused);

        for (c, &mag) in spectrum.iter_mut().zip(&self.fused) {
            *c = Complex32::from_polar(mag, c.arg());
        }

        self.noise.update(&self.magnitude);

        alpha
    }

    /// Noise power tracker
    pub fn noise(&self) -> &NoisePowerTracker {
        &self.noise
    }

    /// Temporal tracker
    pub fn tracker(&self) -> &KalmanBank {
        &self.tracker
    }

    /// Spectral gain of the last processed frame
    pub fn gain(&self) -> &[f32] {
        &self.gain
    }

    /// Gain-estimator magnitude of the last processed frame
    pub fn mmse_magnitude(&self) -> &[f32] {
        &self.mmse
    }

    /// Tracker magnitude of the last processed frame
    pub fn kalman_magnitude(&self) -> &[f32] {
        &self.kalman
    }
}

/// Result of one enhancement call
#[derive(Debug, Clone)]
pub struct Enhancement {
    /// Enhanced waveform, `(T - 1) * hop + win` samples
    pub samples: Vec<f32>,
    /// Processing time over audio duration
    pub real_time_factor: f64,
    /// Mean per-frame fusion weight
    pub mean_alpha: f32,
    /// Per-frame fusion weights
    pub alphas: Vec<f32>,
    /// Number of STFT frames processed
    pub frames: usize,
    /// Time spent in the frame loop and synthesis
    pub elapsed: Duration,
}

/// Reusable enhancer: a validated configuration and its planned STFT.
///
/// Every call starts from fresh noise and tracker state, so one enhancer can
/// serve any number of independent inputs.
pub struct UbkeEnhancer {
    config: UbkeConfig,
    stft: Stft,
}

impl UbkeEnhancer {
    /// Validate the configuration and plan the transform
    pub fn new(config: UbkeConfig) -> CoreResult<Self> {
        config.validate()?;
        let stft = Stft::from_config(&config.audio);
        Ok(Self { config, stft })
    }

    /// Configuration in use
    pub fn config(&self) -> &UbkeConfig {
        &self.config
    }

    /// Planned transform
    pub fn stft(&self) -> &Stft {
        &self.stft
    }

    /// Seed the noise tracker from the leading frames (clamped to `[1, T]`)
    pub fn seed_noise(&self, spectrogram: &Spectrogram) -> NoisePowerTracker {
        let init_frames = self
            .config
            .ubke
            .noise_update
            .init_frames
            .clamp(1, spectrogram.num_frames().max(1));

        NoisePowerTracker::from_frames(
            spectrogram.frames().take(init_frames),
            spectrogram.num_bins(),
            self.config.ubke.noise_update.alpha,
        )
    }

    /// Enhance a mono waveform at the configured sample rate
    pub fn process(&self, samples: &[f32]) -> Enhancement {
        let mut spectrogram = self.stft.forward(samples);
        let num_frames = spectrogram.num_frames();

        let noise = self.seed_noise(&spectrogram);
        let mut processor = FrameProcessor::new(&self.config, noise);
        let mut alphas = Vec::with_capacity(num_frames);

        let start = Instant::now();

        for t in 0..num_frames {
            alphas.push(processor.process_frame(spectrogram.frame_mut(t)));
        }
        let enhanced = self.stft.inverse(&spectrogram);

        let elapsed = start.elapsed();

        let audio_seconds = samples.len() as f64 / self.config.audio.sample_rate as f64;
        let rtf = real_time_factor(elapsed.as_secs_f64(), audio_seconds);
        let mean_alpha = if alphas.is_empty() {
            0.0
        } else {
            (alphas.iter().map(|&a| a as f64).sum::<f64>() / alphas.len() as f64) as f32
        };

        log::debug!(
            "Enhanced {} samples in {} frames: rtf={:.4}, mean_alpha={:.4}",
            samples.len(),
            num_frames,
            rtf,
            mean_alpha
        );

        Enhancement {
            samples: enhanced,
            real_time_factor: rtf,
            mean_alpha,
            alphas,
            frames: num_frames,
            elapsed,
        }
    }
}

/// One-shot enhancement: `(enhanced, rtf, mean_alpha)` plus diagnostics
pub fn enhance(samples: &[f32], config: &UbkeConfig) -> CoreResult<Enhancement> {
    Ok(UbkeEnhancer::new(config.clone())?.process(samples))
}
