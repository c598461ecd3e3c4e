//! Probe requests as handed over by the harness

use crate::types::{HttpScheme, ProbeKind, TcpService, TestType};
use serde::{Deserialize, Serialize};

/// One probe to run. Each variant carries exactly the fields its kind needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbeRequest {
    Http { host: String, scheme: HttpScheme },
    Ping { host: String },
    PingRange { start: String, end: String },
    Tcp { host: String, service: TcpService },
}

impl ProbeRequest {
    pub fn http(host: impl Into<String>, scheme: HttpScheme) -> Self {
        Self::Http { host: host.into(), scheme }
    }

    pub fn ping(host: impl Into<String>) -> Self {
        Self::Ping { host: host.into() }
    }

    pub fn ping_range(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self::PingRange { start: start.into(), end: end.into() }
    }

    pub fn tcp(host: impl Into<String>, service: TcpService) -> Self {
        Self::Tcp { host: host.into(), service }
    }

    /// Build a request from the CLI's flat selection
    pub fn from_selection(
        test_type: TestType,
        host: &str,
        service: TcpService,
        range_end: Option<&str>,
    ) -> Self {
        match (test_type, range_end) {
            (TestType::Http, _) => Self::http(host, HttpScheme::Http),
            (TestType::Https, _) => Self::http(host, HttpScheme::Https),
            (TestType::Ping, Some(end)) => Self::ping_range(host, end),
            (TestType::Ping, None) => Self::ping(host),
            (TestType::Tcp, _) => Self::tcp(host, service),
        }
    }

    pub fn kind(&self) -> ProbeKind {
        match self {
            Self::Http { scheme: HttpScheme::Http, .. } => ProbeKind::Http,
            Self::Http { scheme: HttpScheme::Https, .. } => ProbeKind::Https,
            Self::Ping { .. } => ProbeKind::PingSingle,
            Self::PingRange { .. } => ProbeKind::PingRange,
            Self::Tcp { .. } => ProbeKind::Tcp,
        }
    }

    /// Host text as entered (range start for range requests)
    pub fn host(&self) -> &str {
        match self {
            Self::Http { host, .. } | Self::Ping { host } | Self::Tcp { host, .. } => host,
            Self::PingRange { start, .. } => start,
        }
    }
}
