//! CSV export of the result log
//!
//! Rows come from the session's structured entries or, for logs saved as
//! plain text, from [`parser::parse`]. Both paths agree for every log the
//! engine builds.

pub mod parser;

use crate::error::Result;
use crate::session::ResultLog;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use parser::parse;

/// Header row of every exported file
pub const CSV_HEADER: [&str; 2] = ["host", "message"];

/// One exported row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    pub host: String,
    pub message: String,
}

impl ExportRow {
    pub fn new(host: impl Into<String>, message: impl Into<String>) -> Self {
        Self { host: host.into(), message: message.into() }
    }
}

/// Result of an export request, rendered as the status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportStatus {
    /// The log is empty
    Empty,
    /// The text holds no line in a recognised shape
    NoRows,
    Written { path: PathBuf, rows: usize },
    Failed(String),
}

impl ExportStatus {
    pub fn summary(&self) -> String {
        match self {
            ExportStatus::Empty => "No hay resultados para exportar.".to_string(),
            ExportStatus::NoRows => "No se encontraron líneas válidas para exportar.".to_string(),
            ExportStatus::Written { path, .. } => format!("Resultados exportados a: {}", path.display()),
            ExportStatus::Failed(reason) => format!("Error al exportar CSV: {}", reason),
        }
    }

    pub fn is_written(&self) -> bool {
        matches!(self, ExportStatus::Written { .. })
    }
}

/// Write `rows` under the `host,message` header, replacing any existing file
pub fn write_csv(path: &Path, rows: &[ExportRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(CSV_HEADER)?;
    for row in rows {
        wtr.write_record([&row.host, &row.message])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Render rows as CSV text
pub fn to_csv_string(rows: &[ExportRow]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(CSV_HEADER)?;
    for row in rows {
        wtr.write_record([&row.host, &row.message])?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| crate::error::AppError::export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| crate::error::AppError::export(e.to_string()))
}

/// Export the structured rows of `log`
pub fn export_log(log: &ResultLog, path: &Path) -> ExportStatus {
    if log.is_empty() {
        return ExportStatus::Empty;
    }
    write_rows(path, log.export_rows())
}

/// Export rows parsed from saved log text
pub fn export_text(text: &str, path: &Path) -> ExportStatus {
    if text.trim().is_empty() {
        return ExportStatus::Empty;
    }
    let rows = parse(text);
    if rows.is_empty() {
        return ExportStatus::NoRows;
    }
    write_rows(path, rows)
}

fn write_rows(path: &Path, rows: Vec<ExportRow>) -> ExportStatus {
    match write_csv(path, &rows) {
        Ok(()) => ExportStatus::Written { path: path.to_path_buf(), rows: rows.len() },
        Err(e) => ExportStatus::Failed(e.message().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_csv_quotes_delimiters() {
        let rows = vec![
            ExportRow::new("8.8.8.8", "Ping exitoso: el host respondió."),
            ExportRow::new("https://a.b", "Detalle: uno, dos \"tres\""),
        ];
        let csv = to_csv_string(&rows).unwrap();
        assert_eq!(
            csv,
            "host,message\n8.8.8.8,Ping exitoso: el host respondió.\nhttps://a.b,\"Detalle: uno, dos \"\"tres\"\"\"\n"
        );
    }

    #[test]
    fn test_export_text_writes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");

        let status = export_text("10.0.0.1 → Ping fallido: el host no respondió.\n", &path);
        assert_eq!(status, ExportStatus::Written { path: path.clone(), rows: 1 });
        assert_eq!(status.summary(), format!("Resultados exportados a: {}", path.display()));

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "host,message\n10.0.0.1,Ping fallido: el host no respondió.\n");
    }

    #[test]
    fn test_nothing_to_export_writes_no_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");

        let status = export_text("   \n", &path);
        assert_eq!(status.summary(), "No hay resultados para exportar.");
        assert!(!path.exists());

        let status = export_log(&ResultLog::new(), &path);
        assert_eq!(status, ExportStatus::Empty);
        assert!(!path.exists());
    }

    #[test]
    fn test_unrecognised_text_reports_no_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");

        let status = export_text("solo ruido\n", &path);
        assert_eq!(status.summary(), "No se encontraron líneas válidas para exportar.");
        assert!(!path.exists());
    }

    #[test]
    fn test_unwritable_destination_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.csv");

        let status = export_text("1.1.1.1 → ok", &path);
        assert!(matches!(status, ExportStatus::Failed(_)));
        assert!(status.summary().starts_with("Error al exportar CSV: "));
    }
}
