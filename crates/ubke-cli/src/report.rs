//! Summary tables from a metrics CSV

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use ubke_metrics::Summary;

/// Write `summary_stats.csv`, `means.csv` and `summary.json` for a metrics CSV
pub fn make_tables(metrics_csv: &Path, out_dir: &Path) -> Result<Vec<PathBuf>> {
    let summary = Summary::from_csv(metrics_csv)
        .with_context(|| format!("Failed to summarize {}", metrics_csv.display()))?;

    for stats in &summary.columns {
        match stats.mean {
            Some(mean) => log::info!("{}: mean {:.4} over {} files", stats.column, mean, stats.count),
            None => log::warn!("{}: no values", stats.column),
        }
    }

    let written = summary
        .write_tables(out_dir)
        .with_context(|| format!("Failed to write tables to {}", out_dir.display()))?;
    log::info!("Wrote tables to {}", out_dir.display());

    Ok(written)
}
