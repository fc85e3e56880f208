//! # ubke-metrics
//!
//! Objective evaluation of enhanced speech:
//!
//! - **LSD**: framewise log-spectral distance against a clean reference
//! - **RTF**: real-time factor rows from the enhancement run
//! - **Tables**: per-file metric CSVs and their summary statistics
//!
//! ## Example
//!
//! ```rust,ignore
//! use ubke_metrics::{EvalConfig, MetricsTable, score_pair};
//!
//! let config = EvalConfig::load("configs/eval.yaml")?;
//! let mut table = MetricsTable::new(&config.metrics);
//! table.push(score_pair("utt.wav", &clean, &enhanced, &config.metrics)?);
//! table.save("results/metrics.csv")?;
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod evaluate;
pub mod lsd;
pub mod summary;
pub mod table;

mod error;

pub use config::{EvalAudioConfig, EvalConfig, MetricsConfig};
pub use error::{MetricsError, MetricsResult};
pub use evaluate::{
    DirectoryEvaluation, evaluate_dirs, score_pair, unavailable_metrics, unavailable_notice,
};
pub use lsd::{LsdParams, lsd_framewise};
pub use summary::{ColumnStats, Summary};
pub use table::{CsvTable, MetricsRow, MetricsTable, RtfRow, RtfTable};
pub use ubke_core::real_time_factor;
