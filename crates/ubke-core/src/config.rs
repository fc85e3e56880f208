//! Enhancement configuration
//!
//! Mirrors the YAML layout used by the command-line tools:
//!
//! ```yaml
//! audio:
//!   sample_rate: 16000
//!   n_fft: 512
//!   win_length: 512
//!   hop_length: 256
//!   window: hann
//! ubke:
//!   epsilon: 1.0e-6
//!   ar_order_p: 2
//!   noise_update:
//!     alpha: 0.98
//!     init_frames: 6
//! kalman:
//!   process_var: 1.0e-3
//!   meas_var: 1.0e-2
//! ```
//!
//! Unknown top-level sections (for example `metrics`) are ignored so one file
//! can drive both enhancement and evaluation.

use crate::error::{CoreError, CoreResult};
use crate::window::WindowKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Sample rate and STFT geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Sample rate in Hz (used for RTF normalization and I/O validation)
    pub sample_rate: u32,
    /// FFT size
    pub n_fft: usize,
    /// Analysis/synthesis window length
    pub win_length: usize,
    /// Frame advance in samples
    pub hop_length: usize,
    /// Window function
    #[serde(default)]
    pub window: WindowKind,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            n_fft: 512,
            win_length: 512,
            hop_length: 256,
            window: WindowKind::Hann,
        }
    }
}

impl AudioConfig {
    /// Number of one-sided frequency bins
    pub fn num_bins(&self) -> usize {
        self.n_fft / 2 + 1
    }
}

/// Noise power tracker settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseUpdateConfig {
    /// Single-pole smoothing factor (0.0-1.0, higher = slower)
    pub alpha: f32,
    /// Leading frames averaged to seed the noise power
    pub init_frames: usize,
}

impl Default for NoiseUpdateConfig {
    fn default() -> Self {
        Self {
            alpha: 0.98,
            init_frames: 6,
        }
    }
}

/// Fusion and tracker-order settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UbkeParams {
    /// Fusion regularizer added to the variance sum
    pub epsilon: f32,
    /// Autoregressive order of the magnitude tracker.
    ///
    /// Stored and reported only: the tracker predicts with identity dynamics
    /// whatever the value.
    pub ar_order_p: usize,
    /// Noise power tracker
    pub noise_update: NoiseUpdateConfig,
}

impl Default for UbkeParams {
    fn default() -> Self {
        Self {
            epsilon: 1e-6,
            ar_order_p: 2,
            noise_update: NoiseUpdateConfig::default(),
        }
    }
}

fn default_process_var() -> f32 {
    1e-3
}

fn default_meas_var() -> f32 {
    1e-2
}

/// Per-bin Kalman variances, shared by every bin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KalmanConfig {
    /// Process variance Q
    #[serde(default = "default_process_var")]
    pub process_var: f32,
    /// Measurement variance R
    #[serde(default = "default_meas_var")]
    pub meas_var: f32,
}

impl Default for KalmanConfig {
    fn default() -> Self {
        Self {
            process_var: default_process_var(),
            meas_var: default_meas_var(),
        }
    }
}

/// Complete enhancement configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UbkeConfig {
    /// Sample rate and transform parameters
    pub audio: AudioConfig,
    /// Fusion and noise tracking
    pub ubke: UbkeParams,
    /// Temporal tracker variances
    #[serde(default)]
    pub kalman: KalmanConfig,
}

impl UbkeConfig {
    /// Parse and validate a YAML configuration
    pub fn from_yaml_str(text: &str) -> CoreResult<Self> {
        let config: Self = serde_yml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CoreError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_yaml_str(&text)?;
        log::debug!(
            "Loaded configuration {}: {} Hz, n_fft={}, win={}, hop={}, window={}",
            path.display(),
            config.audio.sample_rate,
            config.audio.n_fft,
            config.audio.win_length,
            config.audio.hop_length,
            config.audio.window
        );
        Ok(config)
    }

    /// Serialize to YAML
    pub fn to_yaml_string(&self) -> CoreResult<String> {
        Ok(serde_yml::to_string(self)?)
    }

    /// Check every field the enhancer divides by or clamps against
    pub fn validate(&self) -> CoreResult<()> {
        let audio = &self.audio;
        if audio.sample_rate == 0 {
            return Err(CoreError::InvalidConfig("sample_rate must be positive".into()));
        }
        if audio.n_fft < 2 {
            return Err(CoreError::InvalidConfig(format!(
                "n_fft must be at least 2, got {}",
                audio.n_fft
            )));
        }
        if audio.win_length == 0 {
            return Err(CoreError::InvalidConfig("win_length must be positive".into()));
        }
        if audio.hop_length == 0 {
            return Err(CoreError::InvalidConfig("hop_length must be positive".into()));
        }

        let alpha = self.ubke.noise_update.alpha;
        if !(0.0..=1.0).contains(&alpha) {
            return Err(CoreError::InvalidConfig(format!(
                "noise_update.alpha must be within [0, 1], got {}",
                alpha
            )));
        }

        let eps = self.ubke.epsilon;
        if !eps.is_finite() || eps < 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "epsilon must be finite and non-negative, got {}",
                eps
            )));
        }

        let KalmanConfig {
            process_var,
            meas_var,
        } = self.kalman;
        if !process_var.is_finite() || process_var < 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "kalman.process_var must be finite and non-negative, got {}",
                process_var
            )));
        }
        if !meas_var.is_finite() || meas_var < 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "kalman.meas_var must be finite and non-negative, got {}",
                meas_var
            )));
        }
        if process_var == 0.0 && meas_var == 0.0 {
            return Err(CoreError::InvalidConfig(
                "kalman.process_var and kalman.meas_var cannot both be zero".into(),
            ));
        }

        Ok(())
    }

    /// Builder pattern: set STFT geometry
    pub fn with_stft(mut self, n_fft: usize, win_length: usize, hop_length: usize) -> Self {
        self.audio.n_fft = n_fft;
        self.audio.win_length = win_length;
        self.audio.hop_length = hop_length;
        self
    }

    /// Builder pattern: set window function
    pub fn with_window(mut self, window: WindowKind) -> Self {
        self.audio.window = window;
        self
    }

    /// Builder pattern: set noise tracker smoothing and seed length
    pub fn with_noise_update(mut self, alpha: f32, init_frames: usize) -> Self {
        self.ubke.noise_update = NoiseUpdateConfig { alpha, init_frames };
        self
    }

    /// Builder pattern: set Kalman variances
    pub fn with_kalman(mut self, process_var: f32, meas_var: f32) -> Self {
        self.kalman = KalmanConfig {
            process_var,
            meas_var,
        };
        self
    }
}
