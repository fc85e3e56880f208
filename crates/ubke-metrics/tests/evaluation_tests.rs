//! Evaluation Pipeline Integration Tests
//!
//! Directory scoring against enhanced output, then summary tables.

use approx::assert_relative_eq;
use std::path::Path;
use tempfile::TempDir;
use ubke_core::{UbkeConfig, enhance};
use ubke_file::write_wav;
use ubke_metrics::{
    CsvTable, EvalConfig, MetricsError, Summary, evaluate_dirs, lsd_framewise, LsdParams,
};

fn speechlike(len: usize, seed: usize) -> Vec<f32> {
    (0..len)
        .map(|i| {
            let t = i as f32 / 16000.0;
            let env = 0.5 + 0.5 * (2.0 * std::f32::consts::PI * 3.0 * t).sin();
            let voiced = (2.0 * std::f32::consts::PI * (150.0 + seed as f32 * 10.0) * t).sin();
            0.2 * env * voiced
        })
        .collect()
}

fn hiss(len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| ((((i * 2654435761) >> 7) % 2001) as f32 / 1000.0 - 1.0) * 0.03)
        .collect()
}

fn write_pair(clean_dir: &Path, enhanced_dir: &Path, name: &str, seed: usize) {
    let clean = speechlike(16000, seed);
    let noisy: Vec<f32> = clean.iter().zip(hiss(16000)).map(|(c, n)| c + n).collect();
    let enhanced = enhance(&noisy, &UbkeConfig::default()).unwrap();
    write_wav(clean_dir.join(name), &clean, 16000).unwrap();
    write_wav(enhanced_dir.join(name), &enhanced.samples, 16000).unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════════
// DIRECTORY EVALUATION
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_evaluate_dirs_pairs_by_name() {
    let root = TempDir::new().unwrap();
    let clean_dir = root.path().join("clean");
    let enhanced_dir = root.path().join("enhanced");

    write_pair(&clean_dir, &enhanced_dir, "utt_a.wav", 0);
    write_pair(&clean_dir, &enhanced_dir, "utt_b.wav", 1);
    write_wav(clean_dir.join("orphan.wav"), &speechlike(8000, 2), 16000).unwrap();

    let config = EvalConfig::default();
    let evaluation = evaluate_dirs(&clean_dir, &enhanced_dir, &config).unwrap();

    assert_eq!(evaluation.skipped.len(), 1);
    assert!(evaluation.skipped[0].ends_with("orphan.wav"));

    let rows = evaluation.table.rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].file, "utt_a.wav");
    assert!(rows.iter().all(|r| r.lsd.is_some_and(|v| v.is_finite() && v > 0.0)));
    assert!(rows.iter().all(|r| r.stoi.is_none() && r.pesq.is_none()));

    let csv = evaluation.table.to_csv();
    assert!(csv.starts_with("file,lsd,stoi\nutt_a.wav,"));
}

#[test]
fn test_evaluate_dirs_rate_mismatch() {
    let root = TempDir::new().unwrap();
    let clean_dir = root.path().join("clean");
    let enhanced_dir = root.path().join("enhanced");
    write_wav(clean_dir.join("x.wav"), &speechlike(4000, 0), 8000).unwrap();
    write_wav(enhanced_dir.join("x.wav"), &speechlike(4000, 0), 8000).unwrap();

    let result = evaluate_dirs(&clean_dir, &enhanced_dir, &EvalConfig::default());
    assert!(matches!(result, Err(MetricsError::File(_))));
}

#[test]
fn test_lsd_orders_degradation() {
    let clean = speechlike(16000, 0);
    let slightly: Vec<f32> = clean.iter().zip(hiss(16000)).map(|(c, n)| c + 0.1 * n).collect();
    let heavily: Vec<f32> = clean.iter().zip(hiss(16000)).map(|(c, n)| c + 3.0 * n).collect();

    let params = LsdParams::default();
    let low = lsd_framewise(&clean, &slightly, &params).unwrap();
    let high = lsd_framewise(&clean, &heavily, &params).unwrap();
    assert!(low < high, "lsd {} vs {}", low, high);
}

// ═══════════════════════════════════════════════════════════════════════════════
// TABLES
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_summary_tables_from_metrics_csv() {
    let dir = TempDir::new().unwrap();
    let metrics_csv = dir.path().join("metrics.csv");
    std::fs::write(
        &metrics_csv,
        "file,lsd,stoi\na.wav,1.0,\nb.wav,2.0,\nc.wav,4.0,\n",
    )
    .unwrap();

    let summary = Summary::from_csv(&metrics_csv).unwrap();
    let out_dir = dir.path().join("tables");
    let written = summary.write_tables(&out_dir).unwrap();
    assert_eq!(written.len(), 3);

    let stats = CsvTable::load(out_dir.join("summary_stats.csv")).unwrap();
    assert_eq!(
        stats.headers,
        vec!["", "count", "mean", "std", "min", "25%", "50%", "75%", "max"]
    );
    assert_eq!(stats.rows[0][0], "lsd");
    assert_eq!(stats.rows[0][1], "3");
    assert_relative_eq!(stats.rows[0][2].parse::<f64>().unwrap(), 7.0 / 3.0);
    assert_relative_eq!(stats.rows[0][5].parse::<f64>().unwrap(), 1.5);
    assert_relative_eq!(stats.rows[0][7].parse::<f64>().unwrap(), 3.0);
    assert_eq!(stats.rows[1][1], "0");

    let means = std::fs::read_to_string(out_dir.join("means.csv")).unwrap();
    assert!(means.starts_with(",mean\nlsd,2.333"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out_dir.join("summary.json")).unwrap())
            .unwrap();
    assert_eq!(json["files"], 3);
    assert!(json["columns"][1]["mean"].is_null());
}

#[test]
fn test_shipped_eval_config() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../configs/eval.yaml");
    let config = EvalConfig::load(path).unwrap();
    assert_eq!(config, EvalConfig::default());
}
