//! Evaluation configuration

use crate::error::MetricsResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Audio section of the evaluation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalAudioConfig {
    /// Rate every clean and enhanced file must have
    pub sample_rate: u32,
}

impl Default for EvalAudioConfig {
    fn default() -> Self {
        Self { sample_rate: 16000 }
    }
}

/// Which metrics to compute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Log-spectral distance
    #[serde(default = "default_true")]
    pub compute_lsd: bool,

    /// Short-time objective intelligibility
    #[serde(default = "default_true")]
    pub compute_stoi: bool,

    /// Perceptual speech quality
    #[serde(default)]
    pub compute_pesq: bool,

    /// PESQ band mode ("wb" or "nb")
    #[serde(default = "default_pesq_mode")]
    pub pesq_mode: String,
}

fn default_true() -> bool {
    true
}

fn default_pesq_mode() -> String {
    "wb".into()
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            compute_lsd: true,
            compute_stoi: true,
            compute_pesq: false,
            pesq_mode: default_pesq_mode(),
        }
    }
}

impl MetricsConfig {
    /// CSV metric columns in output order
    pub fn columns(&self) -> Vec<&'static str> {
        let mut columns = Vec::new();
        if self.compute_lsd {
            columns.push("lsd");
        }
        if self.compute_stoi {
            columns.push("stoi");
        }
        if self.compute_pesq {
            columns.push("pesq");
        }
        columns
    }
}

/// Evaluation configuration (`configs/eval.yaml`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Expected audio format
    #[serde(default)]
    pub audio: EvalAudioConfig,

    /// Metric selection
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl EvalConfig {
    /// Parse from YAML text
    pub fn from_yaml_str(yaml: &str) -> MetricsResult<Self> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Load from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> MetricsResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&text)?;
        log::debug!("Loaded evaluation config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_eval_yaml() {
        let yaml = r#"
audio:
  sample_rate: 16000
metrics:
  compute_pesq: true
  compute_stoi: true
  compute_lsd: true
  pesq_mode: nb
"#;
        let config = EvalConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.audio.sample_rate, 16000);
        assert!(config.metrics.compute_pesq);
        assert_eq!(config.metrics.pesq_mode, "nb");
        assert_eq!(config.metrics.columns(), vec!["lsd", "stoi", "pesq"]);
    }

    #[test]
    fn test_metric_defaults() {
        let config = EvalConfig::from_yaml_str("audio:\n  sample_rate: 8000\nmetrics: {}\n").unwrap();
        assert_eq!(config.audio.sample_rate, 8000);
        assert_eq!(config.metrics, MetricsConfig::default());
        assert_eq!(config.metrics.columns(), vec!["lsd", "stoi"]);
    }

    #[test]
    fn test_malformed_yaml() {
        assert!(EvalConfig::from_yaml_str("audio: [1, 2").is_err());
    }
}
