//! Descriptive statistics over a metrics table
//!
//! Every column except `file` is numeric. Empty cells are missing values and
//! are left out of the statistics. Quantiles interpolate linearly between
//! order statistics and the standard deviation uses n - 1.

use crate::error::{MetricsError, MetricsResult};
use crate::table::{CsvTable, escape_field};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Statistics of one metric column; `None` where undefined
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    /// Column name
    pub column: String,
    /// Non-empty values
    pub count: usize,
    /// Arithmetic mean
    pub mean: Option<f64>,
    /// Sample standard deviation
    pub std: Option<f64>,
    /// Smallest value
    pub min: Option<f64>,
    /// First quartile
    pub q25: Option<f64>,
    /// Second quartile
    pub median: Option<f64>,
    /// Third quartile
    pub q75: Option<f64>,
    /// Largest value
    pub max: Option<f64>,
}

/// Linear-interpolation quantile of sorted values
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let pos = q * last as f64;
    let lo = pos.floor() as usize;
    let hi = (lo + 1).min(last);
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

impl ColumnStats {
    /// Describe a set of values
    pub fn describe(column: impl Into<String>, values: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let mean = (count > 0).then(|| sorted.iter().sum::<f64>() / count as f64);
        let std = mean.filter(|_| count > 1).map(|m| {
            let ss: f64 = sorted.iter().map(|v| (v - m) * (v - m)).sum();
            (ss / (count - 1) as f64).sqrt()
        });

        Self {
            column: column.into(),
            count,
            mean,
            std,
            min: sorted.first().copied(),
            q25: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q75: quantile(&sorted, 0.75),
            max: sorted.last().copied(),
        }
    }
}

/// Per-column statistics of a metrics table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Rows in the source table
    pub files: usize,
    /// One entry per metric column, in table order
    pub columns: Vec<ColumnStats>,
}

impl Summary {
    /// Summarize every column other than `file`
    pub fn from_table(table: &CsvTable, source: &Path) -> MetricsResult<Self> {
        let mut columns = Vec::new();

        for (index, name) in table.headers.iter().enumerate() {
            if name == "file" {
                continue;
            }

            let mut values = Vec::with_capacity(table.rows.len());
            for (row, record) in table.rows.iter().enumerate() {
                let cell = record[index].trim();
                if cell.is_empty() {
                    continue;
                }
                let value = cell.parse::<f64>().map_err(|_| MetricsError::Csv {
                    path: PathBuf::from(source),
                    line: table.line(row),
                    message: format!("non-numeric value {:?} in column {}", cell, name),
                })?;
                if !value.is_nan() {
                    values.push(value);
                }
            }

            columns.push(ColumnStats::describe(name.as_str(), &values));
        }

        Ok(Self {
            files: table.rows.len(),
            columns,
        })
    }

    /// Load a metrics CSV and summarize it
    pub fn from_csv<P: AsRef<Path>>(path: P) -> MetricsResult<Self> {
        let path = path.as_ref();
        Self::from_table(&CsvTable::load(path)?, path)
    }

    /// `summary_stats.csv`: one row per column with count, mean, std, min,
    /// quartiles and max
    pub fn stats_csv(&self) -> String {
        let mut output = String::from(",count,mean,std,min,25%,50%,75%,max\n");
        for stats in &self.columns {
            let cells = [
                stats.mean,
                stats.std,
                stats.min,
                stats.q25,
                stats.median,
                stats.q75,
                stats.max,
            ];
            output.push_str(&escape_field(&stats.column));
            output.push(',');
            output.push_str(&stats.count.to_string());
            for cell in cells {
                output.push(',');
                if let Some(v) = cell {
                    output.push_str(&v.to_string());
                }
            }
            output.push('\n');
        }
        output
    }

    /// `means.csv`: column name and mean
    pub fn means_csv(&self) -> String {
        let mut output = String::from(",mean\n");
        for stats in &self.columns {
            output.push_str(&escape_field(&stats.column));
            output.push(',');
            if let Some(mean) = stats.mean {
                output.push_str(&mean.to_string());
            }
            output.push('\n');
        }
        output
    }

    /// Write `summary_stats.csv`, `means.csv` and `summary.json` into `out_dir`
    pub fn write_tables<P: AsRef<Path>>(&self, out_dir: P) -> MetricsResult<Vec<PathBuf>> {
        let out_dir = out_dir.as_ref();
        std::fs::create_dir_all(out_dir)?;

        let outputs = [
            ("summary_stats.csv", self.stats_csv()),
            ("means.csv", self.means_csv()),
            ("summary.json", serde_json::to_string_pretty(self)?),
        ];

        let mut written = Vec::with_capacity(outputs.len());
        for (name, content) in outputs {
            let path = out_dir.join(name);
            std::fs::write(&path, content)?;
            written.push(path);
        }
        Ok(written)
    }
}
