//! Command-line interface

pub mod shell;

pub use shell::{ShellCommand, SHELL_HELP};

use crate::models::ProbeRequest;
use crate::types::{PingBackend, TcpService, TestType};
use clap::Parser;
use std::path::PathBuf;

/// conncheck - check HTTP/HTTPS, ping and TCP service reachability
#[derive(Parser, Debug, Clone)]
#[command(name = "conncheck")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Hosts to probe in order (range starts when --range-end is given)
    #[arg(value_name = "TARGETS")]
    pub targets: Vec<String>,

    /// Probe type
    #[arg(short, long, value_enum, default_value_t = TestType::Https)]
    pub kind: TestType,

    /// Service probed by --kind tcp
    #[arg(short, long, value_enum, default_value_t = TcpService::Ssh)]
    pub service: TcpService,

    /// Last address of an IPv4 range; each target becomes a range start
    #[arg(long, value_name = "IPV4")]
    pub range_end: Option<String>,

    /// Export the session log as CSV when done
    #[arg(short = 'o', long, value_name = "FILE")]
    pub export: Option<PathBuf>,

    /// Export rows parsed from saved log text instead of probing
    #[arg(long, value_name = "FILE", requires = "export")]
    pub from_log: Option<PathBuf>,

    /// Read commands from stdin
    #[arg(short, long)]
    pub interactive: bool,

    /// List the supported environment variables and exit
    #[arg(long, conflicts_with_all = ["targets", "interactive", "from_log", "create_env"])]
    pub env_help: bool,

    /// Write an example .env file to FILE and exit
    #[arg(long, value_name = "FILE", conflicts_with_all = ["targets", "interactive", "from_log"])]
    pub create_env: Option<PathBuf>,

    /// HTTP(S) request timeout in seconds
    #[arg(long, value_name = "SECS", value_parser = parse_timeout)]
    pub http_timeout: Option<u64>,

    /// Ping reply wait in seconds
    #[arg(long, value_name = "SECS", value_parser = parse_timeout)]
    pub ping_timeout: Option<u64>,

    /// TCP connect timeout in seconds
    #[arg(long, value_name = "SECS", value_parser = parse_timeout)]
    pub tcp_timeout: Option<u64>,

    /// ICMP implementation
    #[arg(long, value_enum)]
    pub ping_backend: Option<PingBackend>,

    /// Program run by the system ping backend
    #[arg(long, value_name = "PATH")]
    pub ping_program: Option<String>,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Validate CLI arguments for conflicts and requirements
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        if self.env_help || self.create_env.is_some() {
            return Ok(());
        }

        if self.from_log.is_some() {
            if !self.targets.is_empty() || self.interactive {
                return Err("--from-log cannot be combined with targets or --interactive".to_string());
            }
            return Ok(());
        }

        if self.range_end.is_some() && self.kind != TestType::Ping {
            return Err("--range-end requires --kind ping".to_string());
        }

        if self.interactive && !self.targets.is_empty() {
            return Err("Targets cannot be combined with --interactive".to_string());
        }

        if self.targets.is_empty() && !self.interactive {
            return Err("Must specify at least one target, --interactive or --from-log".to_string());
        }

        Ok(())
    }

    /// Requests for the batch run, in target order
    pub fn requests(&self) -> Vec<ProbeRequest> {
        self.targets
            .iter()
            .map(|target| ProbeRequest::from_selection(self.kind, target, self.service, self.range_end.as_deref()))
            .collect()
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.color {
            true
        } else if self.no_color {
            false
        } else {
            supports_color()
        }
    }
}

/// Parse a timeout in whole seconds
fn parse_timeout(s: &str) -> Result<u64, String> {
    if s.starts_with('+') || s.starts_with("0x") || s.starts_with("0X") {
        return Err(format!("Invalid timeout: {}", s));
    }

    let max = crate::models::config::MAX_TIMEOUT_SECONDS;
    s.parse::<u64>()
        .map_err(|_| format!("Invalid timeout: {}", s))
        .and_then(|secs| {
            if secs == 0 {
                Err("Timeout must be greater than 0".to_string())
            } else if secs > max {
                Err(format!("Timeout cannot exceed {} seconds", max))
            } else {
                Ok(secs)
            }
        })
}

/// Check if the terminal supports color output
pub fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    #[cfg(target_os = "windows")]
    {
        if std::env::var("ANSICON").is_ok() || std::env::var("ConEmuANSI").is_ok() {
            return true;
        }
    }

    #[cfg(unix)]
    {
        true
    }
    #[cfg(not(unix))]
    {
        false
    }
}
