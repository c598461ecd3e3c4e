//! Classified probe outcomes

use crate::probe::classify::StatusClass;
use crate::types::{HttpScheme, TcpService};
use serde::Serialize;

/// Classification of a finished probe attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum OutcomeCategory {
    /// The server answered with a non-error status
    Responded { code: u16, class: StatusClass },
    /// The server answered, but the transport surfaced the status as an error (4xx/5xx)
    ProtocolError { code: u16, class: StatusClass },
    /// DNS failure, timeout or refused connection
    ConnectFailure { reason: String },
    /// Echo reply received or TCP handshake completed
    Reachable,
    /// No echo reply, or the port refused / timed out
    Unreachable,
    /// The external ping utility is not installed
    ToolMissing,
    /// Anything else; carries the raw error text
    Unexpected { reason: String },
}

impl OutcomeCategory {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Responded { .. } | Self::Reachable)
    }

    /// Short machine-friendly name used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            Self::Responded { .. } => "responded",
            Self::ProtocolError { .. } => "protocol_error",
            Self::ConnectFailure { .. } => "connect_failure",
            Self::Reachable => "reachable",
            Self::Unreachable => "unreachable",
            Self::ToolMissing => "tool_missing",
            Self::Unexpected { .. } => "unexpected",
        }
    }
}

/// What was probed, in the terms the log renders it with
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum OutcomeContext {
    Ping { host: String },
    Tcp { host: String, service: TcpService, port: u16 },
    Http { url: String, scheme: HttpScheme },
}

/// The classified result of one probe attempt. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeOutcome {
    target: String,
    success: bool,
    category: OutcomeCategory,
    detail: String,
    context: OutcomeContext,
}

impl ProbeOutcome {
    /// Outcome of a single ping; `detail` is the arrow-form message
    pub fn ping(host: &str, category: OutcomeCategory, detail: impl Into<String>) -> Self {
        let host = log_target(host);
        Self::new(host.clone(), category, detail.into(), OutcomeContext::Ping { host })
    }

    /// Outcome of a TCP connect; `detail` is the text after `Resultado:`
    pub fn tcp(host: &str, service: TcpService, category: OutcomeCategory, detail: impl Into<String>) -> Self {
        let port = service.port();
        let host = log_target(host);
        Self::new(
            format!("{}:{}", host, port),
            category,
            detail.into(),
            OutcomeContext::Tcp { host, service, port },
        )
    }

    /// Outcome of an HTTP(S) fetch; `detail` is the line following `URL:`
    pub fn http(url: &str, scheme: HttpScheme, category: OutcomeCategory, detail: impl Into<String>) -> Self {
        let url = log_target(url);
        Self::new(url.clone(), category, detail.into(), OutcomeContext::Http { url, scheme })
    }

    fn new(target: String, category: OutcomeCategory, detail: String, context: OutcomeContext) -> Self {
        Self {
            target,
            success: category.is_success(),
            category,
            // Log shapes are line based; raw error text must stay on one line.
            detail: single_line(&detail),
            context,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn category(&self) -> &OutcomeCategory {
        &self.category
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn context(&self) -> &OutcomeContext {
        &self.context
    }

    /// Host column of the export row: host for ping/TCP, URL for HTTP
    pub fn export_host(&self) -> &str {
        match &self.context {
            OutcomeContext::Ping { host } | OutcomeContext::Tcp { host, .. } => host,
            OutcomeContext::Http { url, .. } => url,
        }
    }

    /// One-line human summary for the status area
    pub fn summary(&self) -> String {
        match &self.context {
            OutcomeContext::Ping { host } => format!("{} → {}", host, self.detail),
            OutcomeContext::Tcp { host, service, port } => {
                format!("{}:{} ({}) → {}", host, port, service.label(), self.detail)
            }
            OutcomeContext::Http { url, .. } => match &self.category {
                OutcomeCategory::Responded { code, class } => {
                    format!("{} → {} ({})", url, code, class.message())
                }
                OutcomeCategory::ProtocolError { code, class } => {
                    format!("{} → Error HTTP {} ({})", url, code, class.message())
                }
                OutcomeCategory::ConnectFailure { reason } => {
                    format!("{} → No se pudo conectar ({})", url, single_line(reason))
                }
                _ => "Ocurrió un error inesperado.".to_string(),
            },
        }
    }
}

/// Collapse line breaks so free-form error text cannot start a new log line
pub fn single_line(text: &str) -> String {
    if !text.contains(['\n', '\r']) {
        return text.to_string();
    }
    text.split(['\n', '\r'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Host or URL as written into the log.
///
/// A target must not contain the arrow separator, so `→` is percent-encoded
/// the way a URL path would carry it.
pub fn log_target(text: &str) -> String {
    single_line(text).replace('→', "%E2%86%92")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_follows_category() {
        let ok = ProbeOutcome::ping("8.8.8.8", OutcomeCategory::Reachable, "Ping exitoso: el host respondió.");
        assert!(ok.success());

        let missing = ProbeOutcome::ping("8.8.8.8", OutcomeCategory::ToolMissing, "Comando 'ping' no encontrado en el sistema.");
        assert!(!missing.success());

        let redirect = ProbeOutcome::http(
            "http://example.com",
            HttpScheme::Http,
            OutcomeCategory::Responded { code: 301, class: StatusClass::Redirection },
            "Método: HTTP | Código: 301 | Detalle: x",
        );
        assert!(redirect.success());
    }

    #[test]
    fn test_tcp_target_includes_port() {
        let outcome = ProbeOutcome::tcp(
            "example.com",
            TcpService::Sftp,
            OutcomeCategory::Unreachable,
            "Puerto 22 cerrado o inaccesible.",
        );
        assert_eq!(outcome.target(), "example.com:22");
        assert_eq!(outcome.export_host(), "example.com");
        assert_eq!(outcome.summary(), "example.com:22 (SFTP) → Puerto 22 cerrado o inaccesible.");
    }

    #[test]
    fn test_http_summaries() {
        let url = "https://example.com";
        let responded = ProbeOutcome::http(
            url,
            HttpScheme::Https,
            OutcomeCategory::Responded { code: 200, class: StatusClass::Success },
            "ignored",
        );
        assert_eq!(responded.summary(), "https://example.com → 200 (Éxito: el sitio respondió correctamente.)");

        let failed = ProbeOutcome::http(
            url,
            HttpScheme::Https,
            OutcomeCategory::ProtocolError { code: 503, class: StatusClass::ServerError },
            "ignored",
        );
        assert_eq!(failed.summary(), "https://example.com → Error HTTP 503 (Error del servidor: el sitio tiene problemas internos.)");

        let unexpected = ProbeOutcome::http(
            url,
            HttpScheme::Https,
            OutcomeCategory::Unexpected { reason: "boom".into() },
            "Ocurrió un error inesperado: boom",
        );
        assert_eq!(unexpected.summary(), "Ocurrió un error inesperado.");
    }

    #[test]
    fn test_detail_is_flattened_to_one_line() {
        let outcome = ProbeOutcome::ping(
            "10.0.0.1",
            OutcomeCategory::Unexpected { reason: "a\nb".into() },
            "Error al ejecutar ping: first\r\nsecond",
        );
        assert_eq!(outcome.detail(), "Error al ejecutar ping: first second");
    }

    #[test]
    fn test_targets_never_carry_the_arrow() {
        let tcp = ProbeOutcome::tcp("x→y.example", TcpService::Ssh, OutcomeCategory::Unreachable, "Puerto 22 cerrado o inaccesible.");
        assert_eq!(tcp.export_host(), "x%E2%86%92y.example");
        assert_eq!(tcp.target(), "x%E2%86%92y.example:22");

        let http = ProbeOutcome::http(
            "http://127.0.0.1:1/a→b",
            HttpScheme::Http,
            OutcomeCategory::ConnectFailure { reason: "refused".into() },
            "No se pudo conectar usando HTTP (timeout o DNS). Detalle técnico: refused",
        );
        assert_eq!(http.export_host(), "http://127.0.0.1:1/a%E2%86%92b");

        let ping = ProbeOutcome::ping("a\nb→c", OutcomeCategory::Unreachable, "Ping fallido: el host no respondió.");
        assert!(!ping.export_host().contains('→'));
        assert_eq!(log_target("8.8.8.8"), "8.8.8.8");
    }
}
