//! CSV tables: per-file metrics, per-file RTF, and a minimal reader
//!
//! Writers quote a field only when it contains a comma, a quote or a line
//! break. The reader accepts the same dialect, including quoted line breaks.

use crate::config::MetricsConfig;
use crate::error::{MetricsError, MetricsResult};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Quote a CSV field if needed
pub fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn write_file(path: &Path, content: &str) -> MetricsResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// METRICS TABLE
// ═══════════════════════════════════════════════════════════════════════════════

/// Metrics for one clean/enhanced pair; `None` is written as an empty cell
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsRow {
    /// File name shared by the clean and enhanced file
    pub file: String,
    /// Log-spectral distance
    pub lsd: Option<f64>,
    /// Intelligibility score
    pub stoi: Option<f64>,
    /// Quality score
    pub pesq: Option<f64>,
}

impl MetricsRow {
    /// Row with no scores yet
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            ..Self::default()
        }
    }

    fn value(&self, column: &str) -> Option<f64> {
        match column {
            "lsd" => self.lsd,
            "stoi" => self.stoi,
            "pesq" => self.pesq,
            _ => None,
        }
    }
}

/// Per-file metrics with the enabled metric columns
#[derive(Debug, Clone)]
pub struct MetricsTable {
    columns: Vec<&'static str>,
    rows: Vec<MetricsRow>,
}

impl MetricsTable {
    /// Empty table with one column per enabled metric
    pub fn new(config: &MetricsConfig) -> Self {
        Self {
            columns: config.columns(),
            rows: Vec::new(),
        }
    }

    /// Append a row
    pub fn push(&mut self, row: MetricsRow) {
        self.rows.push(row);
    }

    /// Metric columns, without `file`
    pub fn columns(&self) -> &[&'static str] {
        &self.columns
    }

    /// Rows in insertion order
    pub fn rows(&self) -> &[MetricsRow] {
        &self.rows
    }

    /// Render as CSV text
    pub fn to_csv(&self) -> String {
        let mut output = String::from("file");
        for column in &self.columns {
            output.push(',');
            output.push_str(column);
        }
        output.push('\n');

        for row in &self.rows {
            output.push_str(&escape_field(&row.file));
            for column in &self.columns {
                output.push(',');
                output.push_str(&optional(row.value(column)));
            }
            output.push('\n');
        }

        output
    }

    /// Write CSV, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> MetricsResult<()> {
        write_file(path.as_ref(), &self.to_csv())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RTF TABLE
// ═══════════════════════════════════════════════════════════════════════════════

/// Timing and fusion summary for one enhanced file
#[derive(Debug, Clone, PartialEq)]
pub struct RtfRow {
    /// File name
    pub file: String,
    /// Real-time factor
    pub rtf: f64,
    /// Mean per-frame fusion weight
    pub mean_alpha: f32,
}

/// `file,rtf,mean_alpha` table with six-decimal values
#[derive(Debug, Clone, Default)]
pub struct RtfTable {
    rows: Vec<RtfRow>,
}

impl RtfTable {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row
    pub fn push(&mut self, row: RtfRow) {
        self.rows.push(row);
    }

    /// Rows in insertion order
    pub fn rows(&self) -> &[RtfRow] {
        &self.rows
    }

    /// Mean RTF over all rows
    pub fn mean_rtf(&self) -> Option<f64> {
        if self.rows.is_empty() {
            return None;
        }
        Some(self.rows.iter().map(|r| r.rtf).sum::<f64>() / self.rows.len() as f64)
    }

    /// Render as CSV text
    pub fn to_csv(&self) -> String {
        let mut output = String::from("file,rtf,mean_alpha\n");
        for row in &self.rows {
            let _ = writeln!(
                output,
                "{},{:.6},{:.6}",
                escape_field(&row.file),
                row.rtf,
                row.mean_alpha
            );
        }
        output
    }

    /// Write CSV, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> MetricsResult<()> {
        write_file(path.as_ref(), &self.to_csv())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// READER
// ═══════════════════════════════════════════════════════════════════════════════

/// Parsed CSV: a header row and string cells
#[derive(Debug, Clone, PartialEq)]
pub struct CsvTable {
    /// Column names
    pub headers: Vec<String>,
    /// Data rows, each as long as `headers`
    pub rows: Vec<Vec<String>>,
    /// Source line each row starts on, parallel to `rows`
    pub lines: Vec<usize>,
}

impl CsvTable {
    /// Read and parse a CSV file
    pub fn load<P: AsRef<Path>>(path: P) -> MetricsResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text, path)
    }

    /// Parse CSV text; `source` only labels errors
    pub fn parse(text: &str, source: &Path) -> MetricsResult<Self> {
        let csv_error = |line: usize, message: &str| MetricsError::Csv {
            path: PathBuf::from(source),
            line,
            message: message.to_string(),
        };

        let mut records = parse_records(text).map_err(|line| csv_error(line, "unterminated quote"))?;
        if records.is_empty() {
            return Err(csv_error(1, "missing header row"));
        }

        let (_, headers) = records.remove(0);
        let mut rows = Vec::with_capacity(records.len());
        let mut lines = Vec::with_capacity(records.len());
        for (line, record) in records {
            if record.len() != headers.len() {
                return Err(csv_error(
                    line,
                    &format!("expected {} fields, found {}", headers.len(), record.len()),
                ));
            }
            rows.push(record);
            lines.push(line);
        }

        Ok(Self {
            headers,
            rows,
            lines,
        })
    }

    /// Source line of data row `row`
    pub fn line(&self, row: usize) -> usize {
        self.lines.get(row).copied().unwrap_or(row + 2)
    }

    /// Index of a named column
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Split text into records tagged with their starting line; blank lines are
/// skipped. An unterminated quote reports the line it opened on.
fn parse_records(text: &str) -> Result<Vec<(usize, Vec<String>)>, usize> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut quote_line = 0;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => {
                in_quotes = true;
                quote_line = line;
            }
            ',' => record.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                if !record.is_empty() || !field.is_empty() {
                    record.push(std::mem::take(&mut field));
                    records.push((record_line, std::mem::take(&mut record)));
                }
                line += 1;
                record_line = line;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(quote_line);
    }
    if !record.is_empty() || !field.is_empty() {
        record.push(field);
        records.push((record_line, record));
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("plain.wav"), "plain.wav");
        assert_eq!(escape_field("a,b.wav"), "\"a,b.wav\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_metrics_csv_columns() {
        let mut table = MetricsTable::new(&MetricsConfig::default());
        table.push(MetricsRow {
            file: "a.wav".into(),
            lsd: Some(1.5),
            stoi: None,
            pesq: Some(9.0),
        });

        // pesq is disabled by default, so its value is not written
        assert_eq!(table.to_csv(), "file,lsd,stoi\na.wav,1.5,\n");
    }

    #[test]
    fn test_rtf_csv_format() {
        let mut table = RtfTable::new();
        table.push(RtfRow {
            file: "x.wav".into(),
            rtf: 0.0123456789,
            mean_alpha: 0.5,
        });
        assert_eq!(table.to_csv(), "file,rtf,mean_alpha\nx.wav,0.012346,0.500000\n");
        assert_eq!(table.mean_rtf(), Some(0.0123456789));
        assert_eq!(RtfTable::new().mean_rtf(), None);
    }

    #[test]
    fn test_parse_quoted_fields() {
        let text = "file,lsd\r\n\"a,b.wav\",1.0\n\"multi\nline\",2\n\n";
        let table = CsvTable::parse(text, Path::new("m.csv")).unwrap();
        assert_eq!(table.headers, vec!["file", "lsd"]);
        assert_eq!(table.rows[0], vec!["a,b.wav", "1.0"]);
        assert_eq!(table.rows[1], vec!["multi\nline", "2"]);
        assert_eq!(table.lines, vec![2, 3]);
        assert_eq!(table.column("lsd"), Some(1));
        assert_eq!(table.column("pesq"), None);
    }

    #[test]
    fn test_parse_errors() {
        let source = Path::new("bad.csv");
        assert!(matches!(
            CsvTable::parse("", source),
            Err(MetricsError::Csv { line: 1, .. })
        ));
        assert!(matches!(
            CsvTable::parse("file,lsd\na.wav\n", source),
            Err(MetricsError::Csv { line: 2, .. })
        ));
        assert!(matches!(
            CsvTable::parse("file\n\"open\n", source),
            Err(MetricsError::Csv { line: 2, .. })
        ));
    }

    #[test]
    fn test_writer_reader_agree() {
        let mut table = MetricsTable::new(&MetricsConfig::default());
        table.push(MetricsRow {
            file: "odd, name.wav".into(),
            lsd: Some(0.25),
            ..MetricsRow::default()
        });
        let parsed = CsvTable::parse(&table.to_csv(), Path::new("t.csv")).unwrap();
        assert_eq!(parsed.rows, vec![vec!["odd, name.wav", "0.25", ""]]);
    }
}
