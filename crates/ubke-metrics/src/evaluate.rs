//! Scoring clean/enhanced pairs

use crate::config::{EvalConfig, MetricsConfig};
use crate::error::MetricsResult;
use crate::lsd::{LsdParams, lsd_framewise};
use crate::table::{MetricsRow, MetricsTable};
use std::path::{Path, PathBuf};
use ubke_file::{list_wavs, read_mono};

/// Requested metrics with no implementation; their cells stay empty
pub fn unavailable_metrics(config: &MetricsConfig) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if config.compute_stoi {
        missing.push("stoi");
    }
    if config.compute_pesq {
        missing.push("pesq");
    }
    missing
}

/// One line naming the requested metrics that are not implemented
pub fn unavailable_notice(config: &MetricsConfig) -> Option<String> {
    let missing = unavailable_metrics(config);
    if missing.is_empty() {
        return None;
    }
    Some(format!(
        "{} not implemented; column(s) left empty",
        missing.join(", ").to_uppercase()
    ))
}

/// Score one pair after cutting both signals to their common length
pub fn score_pair(
    file: &str,
    clean: &[f32],
    enhanced: &[f32],
    config: &MetricsConfig,
) -> MetricsResult<MetricsRow> {
    let n = clean.len().min(enhanced.len());
    let (clean, enhanced) = (&clean[..n], &enhanced[..n]);

    let mut row = MetricsRow::new(file);
    if config.compute_lsd {
        row.lsd = Some(lsd_framewise(clean, enhanced, &LsdParams::default())?);
    }

    Ok(row)
}

/// Outcome of scoring a directory pair
#[derive(Debug, Clone)]
pub struct DirectoryEvaluation {
    /// One row per matched file
    pub table: MetricsTable,
    /// Clean files with no same-named enhanced file
    pub skipped: Vec<PathBuf>,
}

/// Score every clean WAV against the same-named file in `enhanced_dir`.
///
/// Both files must be at the configured sample rate. Clean files without a
/// counterpart are skipped and reported.
pub fn evaluate_dirs(
    clean_dir: &Path,
    enhanced_dir: &Path,
    config: &EvalConfig,
) -> MetricsResult<DirectoryEvaluation> {
    let sample_rate = config.audio.sample_rate;
    let mut table = MetricsTable::new(&config.metrics);
    let mut skipped = Vec::new();

    for clean_path in list_wavs(clean_dir)? {
        let Some(name) = clean_path.file_name() else {
            continue;
        };
        let enhanced_path = enhanced_dir.join(name);
        if !enhanced_path.is_file() {
            log::warn!("No enhanced file for {}, skipping", clean_path.display());
            skipped.push(clean_path);
            continue;
        }

        let clean = read_mono(&clean_path, sample_rate)?;
        let enhanced = read_mono(&enhanced_path, sample_rate)?;

        let name = name.to_string_lossy();
        let row = score_pair(&name, &clean.samples, &enhanced.samples, &config.metrics)?;
        log::info!("{}: lsd={:?}", name, row.lsd);
        table.push(row);
    }

    Ok(DirectoryEvaluation { table, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_pair_respects_selection() {
        let clean: Vec<f32> = (0..2000).map(|i| (i as f32 * 0.1).sin()).collect();
        let noisy: Vec<f32> = clean.iter().map(|s| s * 0.5).collect();

        let row = score_pair("a.wav", &clean, &noisy, &MetricsConfig::default()).unwrap();
        assert_eq!(row.file, "a.wav");
        assert!(row.lsd.unwrap() > 0.0);
        assert_eq!(row.stoi, None);

        let lsd_off = MetricsConfig {
            compute_lsd: false,
            ..MetricsConfig::default()
        };
        assert_eq!(score_pair("a.wav", &clean, &noisy, &lsd_off).unwrap().lsd, None);
    }

    #[test]
    fn test_unavailable_metrics() {
        assert_eq!(unavailable_metrics(&MetricsConfig::default()), vec!["stoi"]);
        let all = MetricsConfig {
            compute_pesq: true,
            ..MetricsConfig::default()
        };
        assert_eq!(unavailable_metrics(&all), vec!["stoi", "pesq"]);
    }

    #[test]
    fn test_unavailable_notice_is_one_line() {
        assert_eq!(
            unavailable_notice(&MetricsConfig::default()).as_deref(),
            Some("STOI not implemented; column(s) left empty")
        );
        let all = MetricsConfig {
            compute_pesq: true,
            ..MetricsConfig::default()
        };
        let notice = unavailable_notice(&all).unwrap();
        assert_eq!(notice, "STOI, PESQ not implemented; column(s) left empty");
        assert!(!notice.contains("build"));

        let none = MetricsConfig {
            compute_stoi: false,
            ..MetricsConfig::default()
        };
        assert_eq!(unavailable_notice(&none), None);
    }
}
