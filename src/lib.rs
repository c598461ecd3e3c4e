//! conncheck
//!
//! A connectivity checker: HTTP/HTTPS fetches, ICMP ping of single hosts and
//! IPv4 ranges, TCP service ports, an appendable result log and CSV export.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod output;
pub mod probe;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use export::{ExportRow, ExportStatus};
pub use models::{Config, OutcomeCategory, ProbeOutcome, ProbeRequest};
pub use output::{ColoredFormatter, OutputFormatter, OutputFormatterFactory, PlainFormatter};
pub use probe::{ProbeEngine, ProbeReport};
pub use session::{ResultLog, Session};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// Build information set by build.rs
pub const BUILD_TIME: &str = env!("BUILD_TIME");
pub const TARGET_TRIPLE: &str = env!("TARGET_TRIPLE");
pub const GIT_COMMIT: Option<&str> = option_env!("GIT_COMMIT");

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(5);
    pub const DEFAULT_PING_TIMEOUT: Duration = Duration::from_secs(3);
    pub const DEFAULT_TCP_TIMEOUT: Duration = Duration::from_secs(3);
    pub const DEFAULT_PING_PROGRAM: &str = "ping";
    pub const DEFAULT_ENABLE_COLOR: bool = true;
}
