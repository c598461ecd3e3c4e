//! Per-user session state: the result log and the last status line

pub mod log;

pub use log::{LogEntry, LogLine, LogTag, ResultLog};

use crate::export::{self, ExportStatus};
use std::path::Path;
use uuid::Uuid;

/// Status line shown after the log is cleared
pub const CLEARED_MESSAGE: &str = "Resultados limpiados. Ingresa una dirección y ejecuta una nueva prueba.";

/// Owns everything that survives between probes
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    log: ResultLog,
    summary: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            log: ResultLog::new(),
            summary: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn log(&self) -> &ResultLog {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut ResultLog {
        &mut self.log
    }

    /// Latest one-line status, if any
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn set_summary(&mut self, summary: impl Into<String>) {
        self.summary = Some(summary.into());
    }

    /// Empty the log and post the cleared status
    pub fn clear(&mut self) -> &str {
        self.log.clear();
        self.summary.insert(CLEARED_MESSAGE.to_string())
    }

    /// Export the log's structured rows to `path` and post the status
    pub fn export(&mut self, path: &Path) -> ExportStatus {
        let status = export::export_log(&self.log, path);
        self.summary = Some(status.summary());
        status
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OutcomeCategory, ProbeOutcome};
    use tempfile::TempDir;

    #[test]
    fn test_clear_posts_message() {
        let mut session = Session::new();
        session.log_mut().append(LogEntry::from_outcome(ProbeOutcome::ping(
            "1.1.1.1",
            OutcomeCategory::Reachable,
            "Ping exitoso: el host respondió.",
        )));

        assert_eq!(session.clear(), CLEARED_MESSAGE);
        assert!(session.log().is_empty());
        assert_eq!(session.summary(), Some(CLEARED_MESSAGE));
    }

    #[test]
    fn test_export_of_empty_session() {
        let dir = TempDir::new().unwrap();
        let mut session = Session::new();

        let status = session.export(&dir.path().join("out.csv"));
        assert_eq!(status, ExportStatus::Empty);
        assert_eq!(session.summary(), Some("No hay resultados para exportar."));
    }

    #[test]
    fn test_sessions_have_distinct_ids() {
        assert_ne!(Session::new().id(), Session::new().id());
    }
}
