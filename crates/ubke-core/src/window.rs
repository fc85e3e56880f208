//! Analysis/synthesis window functions
//!
//! All windows are generated in the periodic (FFT) convention: a symmetric
//! window of `len + 1` points with the last point dropped.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Window function used by the STFT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum WindowKind {
    /// Raised cosine, zero at both ends
    #[default]
    Hann,
    /// Raised cosine on a 0.08 pedestal
    Hamming,
    /// Three-term Blackman
    Blackman,
    /// Triangular
    Bartlett,
    /// Rectangular (no tapering)
    Boxcar,
}

impl WindowKind {
    /// Canonical name as used in configuration files
    pub fn name(&self) -> &'static str {
        match self {
            WindowKind::Hann => "hann",
            WindowKind::Hamming => "hamming",
            WindowKind::Blackman => "blackman",
            WindowKind::Bartlett => "bartlett",
            WindowKind::Boxcar => "boxcar",
        }
    }

    /// Generate a periodic window of `len` samples.
    ///
    /// A single-sample window is `[1.0]` for every kind.
    pub fn periodic(&self, len: usize) -> Vec<f32> {
        if len == 1 {
            return vec![1.0];
        }
        let n = len as f64;
        (0..len)
            .map(|i| {
                let x = i as f64 / n;
                let w = match self {
                    WindowKind::Hann => 0.5 - 0.5 * (2.0 * PI * x).cos(),
                    WindowKind::Hamming => 0.54 - 0.46 * (2.0 * PI * x).cos(),
                    WindowKind::Blackman => {
                        0.42 - 0.5 * (2.0 * PI * x).cos() + 0.08 * (4.0 * PI * x).cos()
                    }
                    WindowKind::Bartlett => 1.0 - (2.0 * x - 1.0).abs(),
                    WindowKind::Boxcar => 1.0,
                };
                w as f32
            })
            .collect()
    }
}

impl FromStr for WindowKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hann" | "hanning" => Ok(WindowKind::Hann),
            "hamming" => Ok(WindowKind::Hamming),
            "blackman" => Ok(WindowKind::Blackman),
            "bartlett" | "triangular" => Ok(WindowKind::Bartlett),
            "boxcar" | "rectangular" | "rect" | "ones" => Ok(WindowKind::Boxcar),
            _ => Err(CoreError::UnknownWindow(s.to_string())),
        }
    }
}

impl TryFrom<String> for WindowKind {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WindowKind> for String {
    fn from(kind: WindowKind) -> Self {
        kind.name().to_string()
    }
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_periodic_hann_shape() {
        let w = WindowKind::Hann.periodic(8);
        assert_eq!(w.len(), 8);
        assert_abs_diff_eq!(w[0], 0.0, epsilon = 1e-7);
        assert_abs_diff_eq!(w[4], 1.0, epsilon = 1e-7);
        // Periodic: w[i] == w[len - i]
        assert_abs_diff_eq!(w[1], w[7], epsilon = 1e-7);
        assert_abs_diff_eq!(w[3], w[5], epsilon = 1e-7);
    }

    #[test]
    fn test_hann_cola_at_half_overlap() {
        let w = WindowKind::Hann.periodic(512);
        for i in 0..256 {
            assert_abs_diff_eq!(w[i] + w[i + 256], 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("hann".parse::<WindowKind>().unwrap(), WindowKind::Hann);
        assert_eq!("Hamming".parse::<WindowKind>().unwrap(), WindowKind::Hamming);
        assert_eq!("rectangular".parse::<WindowKind>().unwrap(), WindowKind::Boxcar);
        assert!("kaiser".parse::<WindowKind>().is_err());
    }

    #[test]
    fn test_single_sample_window_is_unity() {
        for kind in [
            WindowKind::Hann,
            WindowKind::Hamming,
            WindowKind::Blackman,
            WindowKind::Bartlett,
            WindowKind::Boxcar,
        ] {
            assert_eq!(kind.periodic(1), vec![1.0], "{}", kind);
        }
        assert!(WindowKind::Hann.periodic(0).is_empty());
    }

    #[test]
    fn test_boxcar_is_flat() {
        assert!(WindowKind::Boxcar.periodic(16).iter().all(|&w| w == 1.0));
    }
}
