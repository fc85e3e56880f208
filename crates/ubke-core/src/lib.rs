//! UBKE Speech Enhancement Core
//!
//! Causal single-channel noise suppression on short-time spectra:
//!
//! ## Spectral Transform
//! - Periodic analysis windows (Hann by default)
//! - One-sided real FFT per frame
//! - Window-squared normalized overlap-add synthesis
//!
//! ## Noise Power Tracking
//! - Seeded from the leading frames
//! - Single-pole smoothing of instantaneous bin power
//!
//! ## Spectral Gain
//! - Wiener/MMSE gain from the a-priori SNR
//!
//! ## Temporal Tracking
//! - Per-bin scalar Kalman filters over the denoised magnitude
//! - Suppresses musical-noise flicker between frames
//!
//! ## Fusion
//! - One variance-optimal weight per frame between the two branches
//!
//! ## Example
//!
//! ```rust,ignore
//! use ubke_core::{enhance, UbkeConfig};
//!
//! let config = UbkeConfig::load("configs/ubke_default.yaml")?;
//! let result = enhance(&samples, &config)?;
//! println!("RTF {:.3}, mean alpha {:.3}", result.real_time_factor, result.mean_alpha);
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod enhance;
pub mod fusion;
pub mod gain;
pub mod kalman;
pub mod noise;
pub mod stft;
pub mod streaming;
pub mod window;

mod error;

pub use config::{AudioConfig, KalmanConfig, NoiseUpdateConfig, UbkeConfig, UbkeParams};
pub use enhance::{Enhancement, FrameProcessor, UbkeEnhancer, enhance, real_time_factor};
pub use error::{CoreError, CoreResult};
pub use kalman::{KalmanBank, TrackerState};
pub use noise::NoisePowerTracker;
pub use stft::{Spectrogram, Stft};
pub use streaming::UbkeStream;
pub use window::WindowKind;

/// Block-based processor for live audio
pub trait BlockProcessor: Send + Sync {
    /// Process audio block
    fn process(&mut self, input: &[f32], output: &mut [f32]) -> CoreResult<()>;

    /// Reset internal state
    fn reset(&mut self);

    /// Get latency in samples
    fn latency_samples(&self) -> usize;

    /// Get processing name
    fn name(&self) -> &str;
}
