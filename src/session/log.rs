//! Append-only result log
//!
//! Every outcome is rendered through one of three fixed line shapes:
//!
//! ```text
//! 8.8.8.8 → Ping exitoso: el host respondió.            (arrow)
//! Host: example.com                                      (host block)
//! Servicio: SSH | Puerto: 22 | Resultado: Puerto 22 ...
//! URL: https://example.com                               (URL block)
//! Método: HTTPS | Código: 200 | Detalle: ...
//! ```
//!
//! The export parser in `crate::export::parser` reads these shapes back.

use crate::export::ExportRow;
use crate::models::{OutcomeContext, ProbeOutcome};
use serde::Serialize;

/// Display tag of a log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LogTag {
    Ok,
    Fail,
}

impl LogTag {
    pub fn for_success(success: bool) -> Self {
        if success {
            LogTag::Ok
        } else {
            LogTag::Fail
        }
    }
}

/// One rendered line; context lines carry no tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogLine {
    pub text: String,
    pub tag: Option<LogTag>,
}

impl LogLine {
    fn tagged(text: String, success: bool) -> Self {
        Self { text, tag: Some(LogTag::for_success(success)) }
    }

    fn context(text: String) -> Self {
        Self { text, tag: None }
    }
}

/// A logged outcome together with its rendered lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    outcome: ProbeOutcome,
    lines: Vec<LogLine>,
}

impl LogEntry {
    /// Render `outcome` in the line shape of its probe kind
    pub fn from_outcome(outcome: ProbeOutcome) -> Self {
        let success = outcome.success();
        let lines = match outcome.context() {
            OutcomeContext::Ping { host } => {
                vec![LogLine::tagged(format!("{} → {}", host, outcome.detail()), success)]
            }
            OutcomeContext::Tcp { host, service, port } => vec![
                LogLine::context(format!("Host: {}", host)),
                LogLine::tagged(
                    format!("Servicio: {} | Puerto: {} | Resultado: {}", service.label(), port, outcome.detail()),
                    success,
                ),
            ],
            OutcomeContext::Http { url, .. } => vec![
                LogLine::context(format!("URL: {}", url)),
                LogLine::tagged(outcome.detail().to_string(), success),
            ],
        };
        Self { outcome, lines }
    }

    pub fn outcome(&self) -> &ProbeOutcome {
        &self.outcome
    }

    pub fn lines(&self) -> &[LogLine] {
        &self.lines
    }

    /// Row this entry contributes to an export
    pub fn export_row(&self) -> ExportRow {
        ExportRow::new(self.outcome.export_host().trim(), self.outcome.detail().trim())
    }
}

/// Ordered log of everything probed in a session
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResultLog {
    entries: Vec<LogEntry>,
}

impl ResultLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry; returns a reference to it for progressive display
    pub fn append(&mut self, entry: LogEntry) -> &LogEntry {
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    /// Remove every entry. Idempotent.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The whole log as text, one `\n` after every line
    pub fn all_text(&self) -> String {
        self.lines()
            .map(|line| format!("{}\n", line.text))
            .collect()
    }

    /// Every line in order, with its tag
    pub fn lines(&self) -> impl Iterator<Item = &LogLine> {
        self.entries.iter().flat_map(|entry| entry.lines.iter())
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Structured export rows, one per entry
    pub fn export_rows(&self) -> Vec<ExportRow> {
        self.entries.iter().map(LogEntry::export_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OutcomeCategory;
    use crate::probe::classify::StatusClass;
    use crate::types::{HttpScheme, TcpService};

    fn ping_ok() -> ProbeOutcome {
        ProbeOutcome::ping("8.8.8.8", OutcomeCategory::Reachable, "Ping exitoso: el host respondió.")
    }

    #[test]
    fn test_ping_entry_is_one_tagged_arrow_line() {
        let mut log = ResultLog::new();
        log.append(LogEntry::from_outcome(ping_ok()));

        assert_eq!(log.all_text(), "8.8.8.8 → Ping exitoso: el host respondió.\n");
        let lines: Vec<_> = log.lines().collect();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].tag, Some(LogTag::Ok));
    }

    #[test]
    fn test_tcp_entry_has_untagged_host_line() {
        let outcome = ProbeOutcome::tcp(
            "example.com",
            TcpService::Telnet,
            OutcomeCategory::Unreachable,
            "Puerto 23 cerrado o inaccesible.",
        );
        let entry = LogEntry::from_outcome(outcome);

        assert_eq!(entry.lines()[0], LogLine { text: "Host: example.com".to_string(), tag: None });
        assert_eq!(
            entry.lines()[1].text,
            "Servicio: TELNET | Puerto: 23 | Resultado: Puerto 23 cerrado o inaccesible."
        );
        assert_eq!(entry.lines()[1].tag, Some(LogTag::Fail));
        assert_eq!(entry.export_row(), ExportRow::new("example.com", "Puerto 23 cerrado o inaccesible."));
    }

    #[test]
    fn test_http_entry_is_url_block() {
        let outcome = ProbeOutcome::http(
            "https://example.com",
            HttpScheme::Https,
            OutcomeCategory::Responded { code: 200, class: StatusClass::Success },
            "Método: HTTPS | Código: 200 | Detalle: Éxito: el sitio respondió correctamente.",
        );
        let mut log = ResultLog::new();
        log.append(LogEntry::from_outcome(outcome));

        assert_eq!(
            log.all_text(),
            "URL: https://example.com\nMétodo: HTTPS | Código: 200 | Detalle: Éxito: el sitio respondió correctamente.\n"
        );
    }

    #[test]
    fn test_entries_accumulate_and_clear_is_idempotent() {
        let mut log = ResultLog::new();
        log.append(LogEntry::from_outcome(ping_ok()));
        log.append(LogEntry::from_outcome(ping_ok()));
        assert_eq!(log.len(), 2);
        assert_eq!(log.export_rows().len(), 2);

        log.clear();
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.all_text(), "");
    }
}
