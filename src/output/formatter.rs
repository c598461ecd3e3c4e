//! Core formatting trait and the plain text implementation

use crate::{
    error::{AppError, Result},
    session::{LogEntry, LogLine, ResultLog},
};
use std::fmt::Write as _;

/// Shown instead of an empty log
pub const EMPTY_LOG_MESSAGE: &str = "El registro está vacío.";

/// Main trait for output formatting
pub trait OutputFormatter: Send + Sync {
    /// Format one log line according to its tag
    fn format_line(&self, line: &LogLine) -> Result<String>;

    /// Format every line of an entry, one per row
    fn format_entry(&self, entry: &LogEntry) -> Result<String> {
        let lines = entry
            .lines()
            .iter()
            .map(|line| self.format_line(line))
            .collect::<Result<Vec<_>>>()?;
        Ok(lines.join("\n"))
    }

    /// Format the whole log
    fn format_log(&self, log: &ResultLog) -> Result<String> {
        if log.is_empty() {
            return self.format_summary(EMPTY_LOG_MESSAGE);
        }

        let mut output = String::new();
        for (index, entry) in log.entries().iter().enumerate() {
            if index > 0 {
                writeln!(output).map_err(|e| AppError::io(format!("Failed to format log: {}", e)))?;
            }
            write!(output, "{}", self.format_entry(entry)?)
                .map_err(|e| AppError::io(format!("Failed to format log: {}", e)))?;
        }
        Ok(output)
    }

    /// Format the one-line status of the last action
    fn format_summary(&self, summary: &str) -> Result<String>;

    /// Format error messages
    fn format_error(&self, error: &str) -> Result<String>;

    /// Format warning messages
    fn format_warning(&self, warning: &str) -> Result<String>;

    /// Format success messages
    fn format_success(&self, message: &str) -> Result<String>;
}

/// Plain text formatter; output equals the log text
#[derive(Debug, Clone, Default)]
pub struct PlainFormatter;

impl PlainFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl OutputFormatter for PlainFormatter {
    fn format_line(&self, line: &LogLine) -> Result<String> {
        Ok(line.text.clone())
    }

    fn format_summary(&self, summary: &str) -> Result<String> {
        Ok(format!("» {}", summary))
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("Error: {}", error))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("Warning: {}", warning))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OutcomeCategory, ProbeOutcome};
    use crate::types::TcpService;

    fn sample_log() -> ResultLog {
        let mut log = ResultLog::new();
        log.append(LogEntry::from_outcome(ProbeOutcome::ping(
            "8.8.8.8",
            OutcomeCategory::Reachable,
            "Ping exitoso: el host respondió.",
        )));
        log.append(LogEntry::from_outcome(ProbeOutcome::tcp(
            "example.com",
            TcpService::Ftp,
            OutcomeCategory::Unreachable,
            "Puerto 21 cerrado o inaccesible.",
        )));
        log
    }

    #[test]
    fn test_plain_log_matches_log_text() {
        let log = sample_log();
        let formatted = PlainFormatter::new().format_log(&log).unwrap();

        assert_eq!(format!("{}\n", formatted), log.all_text());
    }

    #[test]
    fn test_plain_entry_keeps_both_block_lines() {
        let log = sample_log();
        let entry = PlainFormatter::new().format_entry(&log.entries()[1]).unwrap();

        assert_eq!(
            entry,
            "Host: example.com\nServicio: FTP | Puerto: 21 | Resultado: Puerto 21 cerrado o inaccesible."
        );
    }

    #[test]
    fn test_empty_log_message() {
        let formatted = PlainFormatter::new().format_log(&ResultLog::new()).unwrap();
        assert_eq!(formatted, format!("» {}", EMPTY_LOG_MESSAGE));
    }

    #[test]
    fn test_plain_messages() {
        let formatter = PlainFormatter::new();
        assert_eq!(formatter.format_error("boom").unwrap(), "Error: boom");
        assert_eq!(formatter.format_warning("careful").unwrap(), "Warning: careful");
        assert_eq!(formatter.format_summary("done").unwrap(), "» done");
    }
}
