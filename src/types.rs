//! Type definitions shared by the probes, the CLI and the configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Probe families a request can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbeKind {
    Http,
    Https,
    PingSingle,
    PingRange,
    Tcp,
}

/// Scheme used when the entered host carries none
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum HttpScheme {
    Http,
    Https,
}

impl HttpScheme {
    /// URL scheme prefix (without `://`)
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpScheme::Http => "http",
            HttpScheme::Https => "https",
        }
    }

    /// Upper-case label used in the result log
    pub fn label(&self) -> &'static str {
        match self {
            HttpScheme::Http => "HTTP",
            HttpScheme::Https => "HTTPS",
        }
    }
}

/// TCP services with a fixed well-known port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum TcpService {
    Ssh,
    Ftp,
    Sftp,
    Telnet,
}

impl TcpService {
    /// Port probed for this service. SFTP rides on the SSH transport, so it shares 22.
    pub fn port(&self) -> u16 {
        match self {
            TcpService::Ssh => 22,
            TcpService::Ftp => 21,
            TcpService::Sftp => 22,
            TcpService::Telnet => 23,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TcpService::Ssh => "SSH",
            TcpService::Ftp => "FTP",
            TcpService::Sftp => "SFTP",
            TcpService::Telnet => "TELNET",
        }
    }
}

impl FromStr for TcpService {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "ssh" => Ok(TcpService::Ssh),
            "ftp" => Ok(TcpService::Ftp),
            "sftp" => Ok(TcpService::Sftp),
            "telnet" => Ok(TcpService::Telnet),
            other => Err(AppError::validation(format!("Unknown TCP service: {}", other))),
        }
    }
}

/// Probe type chosen on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TestType {
    Http,
    Https,
    Ping,
    Tcp,
}

/// ICMP backend selected at configuration time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PingBackend {
    /// Shell out to the operating system's `ping` binary
    #[default]
    System,
    /// Send the echo request over a raw ICMP socket
    Icmp,
}

impl fmt::Display for PingBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PingBackend::System => write!(f, "system"),
            PingBackend::Icmp => write!(f, "icmp"),
        }
    }
}

impl FromStr for PingBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "system" => Ok(PingBackend::System),
            "icmp" => Ok(PingBackend::Icmp),
            other => Err(AppError::config(format!("Unknown ping backend: {}", other))),
        }
    }
}
