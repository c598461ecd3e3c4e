//! Non-fatal configuration checks
//!
//! `Config::validate` rejects settings the probes cannot run with. The checks
//! here only produce warnings for settings that work but are likely to
//! surprise the user.

use crate::models::Config;
use crate::types::PingBackend;

/// HTTP timeouts above this make batch runs noticeably slow
const SLOW_HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Validation warning levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationLevel {
    Info,
    Warning,
}

impl ValidationLevel {
    /// Get display string for level
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
        }
    }
}

/// Configuration validation warning
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(level: ValidationLevel, message: impl Into<String>) -> Self {
        Self { level, message: message.into() }
    }

    /// Format warning for display
    pub fn format(&self, use_color: bool) -> String {
        let label = format!("[{}]", self.level.as_str());
        if use_color {
            use colored::Colorize;
            let label = match self.level {
                ValidationLevel::Info => label.blue(),
                ValidationLevel::Warning => label.yellow(),
            };
            format!("{} {}", label, self.message)
        } else {
            format!("{} {}", label, self.message)
        }
    }
}

/// Collect warnings for a configuration that already passed `Config::validate`
pub fn validate_config(config: &Config) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if config.ping_backend == PingBackend::Icmp {
        warnings.push(ValidationWarning::new(
            ValidationLevel::Warning,
            "The icmp ping backend opens a raw socket and usually needs root or CAP_NET_RAW; \
             without it every ping is reported as an invocation failure",
        ));
    }

    if config.http_timeout_seconds > SLOW_HTTP_TIMEOUT_SECONDS {
        warnings.push(ValidationWarning::new(
            ValidationLevel::Info,
            format!(
                "HTTP timeout of {}s will slow down runs against unreachable hosts",
                config.http_timeout_seconds
            ),
        ));
    }

    if config.ping_backend == PingBackend::System && config.ping_program != crate::defaults::DEFAULT_PING_PROGRAM {
        warnings.push(ValidationWarning::new(
            ValidationLevel::Info,
            format!("Using '{}' instead of the system ping program", config.ping_program),
        ));
    }

    warnings
}
