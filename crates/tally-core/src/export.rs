//! Export serializers.
//!
//! Export rows are turned into bytes by a `RowWriter`. Several
//! interchangeable writers exist; which one is used is decided once, at
//! startup, through `ExportBackend`, and the rest of the program only sees
//! the trait.

use std::fmt;
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TallyError};
use crate::summary::ExportRow;

/// Column header shared by every CSV writer.
pub const CSV_HEADER: [&str; 4] = ["date", "category", "amount", "note"];

/// Serializes export rows to a byte sink.
pub trait RowWriter {
    /// The backend this writer implements.
    fn backend(&self) -> ExportBackend;

    /// Write all rows (and any header) to `out`, returning the row count.
    fn write_rows(&self, rows: &[ExportRow], out: &mut dyn Write) -> Result<usize>;
}

/// Available export serializers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportBackend {
    /// CSV through the `csv` crate
    #[default]
    Csv,
    /// CSV written by hand with standard quoting
    ManualCsv,
    /// One JSON object per line
    Jsonl,
}

impl ExportBackend {
    pub const ALL: [ExportBackend; 3] = [
        ExportBackend::Csv,
        ExportBackend::ManualCsv,
        ExportBackend::Jsonl,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportBackend::Csv => "csv",
            ExportBackend::ManualCsv => "manual-csv",
            ExportBackend::Jsonl => "jsonl",
        }
    }

    /// File extension for exported files.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportBackend::Csv | ExportBackend::ManualCsv => "csv",
            ExportBackend::Jsonl => "jsonl",
        }
    }

    /// Build the writer for this backend.
    pub fn writer(&self) -> Box<dyn RowWriter> {
        match self {
            ExportBackend::Csv => Box::new(CsvCrateWriter),
            ExportBackend::ManualCsv => Box::new(ManualCsvWriter),
            ExportBackend::Jsonl => Box::new(JsonLinesWriter),
        }
    }
}

impl fmt::Display for ExportBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportBackend {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        ExportBackend::ALL
            .into_iter()
            .find(|backend| backend.as_str() == wanted)
            .ok_or_else(|| {
                TallyError::Validation(format!(
                    "Unsupported export format: {} (use csv, manual-csv, or jsonl)",
                    s
                ))
            })
    }
}

/// CSV writer backed by the `csv` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvCrateWriter;

impl RowWriter for CsvCrateWriter {
    fn backend(&self) -> ExportBackend {
        ExportBackend::Csv
    }

    fn write_rows(&self, rows: &[ExportRow], out: &mut dyn Write) -> Result<usize> {
        // Header is written explicitly so that an empty export still has one.
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(out);
        writer.write_record(CSV_HEADER)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(rows.len())
    }
}

/// Hand-rolled CSV writer. Produces the same bytes as `CsvCrateWriter`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualCsvWriter;

impl ManualCsvWriter {
    /// Quote a field if it contains a delimiter, quote, or line break.
    fn escape(field: &str) -> String {
        if field.contains([',', '"', '\n', '\r']) {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    fn write_line(out: &mut dyn Write, fields: &[&str]) -> std::io::Result<()> {
        let line: Vec<String> = fields.iter().map(|f| Self::escape(f)).collect();
        out.write_all(line.join(",").as_bytes())?;
        out.write_all(b"\n")
    }
}

impl RowWriter for ManualCsvWriter {
    fn backend(&self) -> ExportBackend {
        ExportBackend::ManualCsv
    }

    fn write_rows(&self, rows: &[ExportRow], out: &mut dyn Write) -> Result<usize> {
        Self::write_line(out, &CSV_HEADER)?;
        for row in rows {
            let date = row.date.to_string();
            let amount = row.amount.to_string();
            Self::write_line(out, &[&date, &row.category, &amount, &row.note])?;
        }
        out.flush()?;
        Ok(rows.len())
    }
}

/// JSON Lines writer: one object per row, no header.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLinesWriter;

impl RowWriter for JsonLinesWriter {
    fn backend(&self) -> ExportBackend {
        ExportBackend::Jsonl
    }

    fn write_rows(&self, rows: &[ExportRow], out: &mut dyn Write) -> Result<usize> {
        for row in rows {
            serde_json::to_writer(&mut *out, row)?;
            out.write_all(b"\n")?;
        }
        out.flush()?;
        Ok(rows.len())
    }
}

/// Parse CSV produced by either CSV writer back into rows.
pub fn read_csv_rows<R: Read>(reader: R) -> Result<Vec<ExportRow>> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

/// Serialize `rows` with `writer` and atomically write them to `path`.
pub fn write_export_file(path: &Path, rows: &[ExportRow], writer: &dyn RowWriter) -> Result<usize> {
    let mut buffer = Vec::new();
    let count = writer.write_rows(rows, &mut buffer)?;
    crate::fs::write_atomic(path, &buffer)?;
    debug!(count, backend = %writer.backend(), path = %path.display(), "wrote export file");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::amount::Amount;

    fn row(date: &str, category: &str, minor: i64, note: &str) -> ExportRow {
        ExportRow {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            category: category.to_string(),
            amount: Amount::from_minor(minor),
            note: note.to_string(),
        }
    }

    fn tricky_rows() -> Vec<ExportRow> {
        vec![
            row("2024-02-01", "Rent", 4000, ""),
            row("2024-01-20", "Food", 725, "coffee, large"),
            row("2024-01-05", "Food", 1250, "said \"hi\"\nto barista"),
        ]
    }

    fn render(backend: ExportBackend, rows: &[ExportRow]) -> String {
        let mut out = Vec::new();
        backend.writer().write_rows(rows, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_csv_header_and_fixed_point_amounts() {
        let text = render(ExportBackend::Csv, &[row("2024-02-01", "Rent", 4000, "")]);
        assert_eq!(text, "date,category,amount,note\n2024-02-01,Rent,40.00,\n");
    }

    #[test]
    fn test_empty_export_still_has_header() {
        assert_eq!(render(ExportBackend::Csv, &[]), "date,category,amount,note\n");
        assert_eq!(render(ExportBackend::ManualCsv, &[]), "date,category,amount,note\n");
        assert_eq!(render(ExportBackend::Jsonl, &[]), "");
    }

    #[test]
    fn test_manual_writer_quotes_like_csv_crate() {
        let rows = tricky_rows();
        assert_eq!(
            render(ExportBackend::ManualCsv, &rows),
            render(ExportBackend::Csv, &rows)
        );
    }

    #[test]
    fn test_csv_round_trip_preserves_rows_and_order() {
        let rows = tricky_rows();
        for backend in [ExportBackend::Csv, ExportBackend::ManualCsv] {
            let text = render(backend, &rows);
            let parsed = read_csv_rows(text.as_bytes()).unwrap();
            assert_eq!(parsed, rows, "round trip through {}", backend);
        }
    }

    #[test]
    fn test_jsonl_one_object_per_line() {
        let text = render(ExportBackend::Jsonl, &tricky_rows());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["amount"], "40.00");
        assert_eq!(first["date"], "2024-02-01");
    }

    #[test]
    fn test_backend_parsing() {
        assert_eq!("csv".parse::<ExportBackend>().unwrap(), ExportBackend::Csv);
        assert_eq!(
            " Manual-CSV ".parse::<ExportBackend>().unwrap(),
            ExportBackend::ManualCsv
        );
        assert_eq!("jsonl".parse::<ExportBackend>().unwrap(), ExportBackend::Jsonl);
        assert!("xlsx".parse::<ExportBackend>().unwrap_err().is_validation());
    }

    #[test]
    fn test_writer_reports_backend() {
        for backend in ExportBackend::ALL {
            assert_eq!(backend.writer().backend(), backend);
        }
    }

    #[test]
    fn test_write_export_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let rows = tricky_rows();
        let count = write_export_file(&path, &rows, &CsvCrateWriter).unwrap();
        assert_eq!(count, 3);
        let parsed = read_csv_rows(std::fs::File::open(&path).unwrap()).unwrap();
        assert_eq!(parsed, rows);
    }
}
