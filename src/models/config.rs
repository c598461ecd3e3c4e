//! Configuration data model and validation

use crate::types::{AppError, PingBackend, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound for any per-attempt timeout
pub const MAX_TIMEOUT_SECONDS: u64 = 60;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Timeout for a single HTTP(S) GET
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_seconds: u64,

    /// Wait for a single echo reply
    #[serde(default = "default_ping_timeout_secs")]
    pub ping_timeout_seconds: u64,

    /// Timeout for a single TCP connect attempt
    #[serde(default = "default_tcp_timeout_secs")]
    pub tcp_timeout_seconds: u64,

    /// Which ICMP implementation answers ping requests
    #[serde(default)]
    pub ping_backend: PingBackend,

    /// Program invoked by the system ping backend
    #[serde(default = "default_ping_program")]
    pub ping_program: String,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_timeout_seconds: default_http_timeout_secs(),
            ping_timeout_seconds: default_ping_timeout_secs(),
            tcp_timeout_seconds: default_tcp_timeout_secs(),
            ping_backend: PingBackend::default(),
            ping_program: default_ping_program(),
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }

    pub fn ping_timeout(&self) -> Duration {
        Duration::from_secs(self.ping_timeout_seconds)
    }

    pub fn tcp_timeout(&self) -> Duration {
        Duration::from_secs(self.tcp_timeout_seconds)
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        let timeouts = [
            ("HTTP", self.http_timeout_seconds),
            ("Ping", self.ping_timeout_seconds),
            ("TCP", self.tcp_timeout_seconds),
        ];

        for (name, seconds) in timeouts {
            if seconds == 0 {
                return Err(AppError::config(format!("{} timeout must be greater than 0", name)));
            }
            if seconds > MAX_TIMEOUT_SECONDS {
                return Err(AppError::config(format!(
                    "{} timeout cannot exceed {} seconds",
                    name, MAX_TIMEOUT_SECONDS
                )));
            }
        }

        if self.ping_program.trim().is_empty() {
            return Err(AppError::config("Ping program cannot be empty"));
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(timeout) = std::env::var("HTTP_TIMEOUT_SECONDS") {
            self.http_timeout_seconds = parse_seconds("HTTP_TIMEOUT_SECONDS", &timeout)?;
        }

        if let Ok(timeout) = std::env::var("PING_TIMEOUT_SECONDS") {
            self.ping_timeout_seconds = parse_seconds("PING_TIMEOUT_SECONDS", &timeout)?;
        }

        if let Ok(timeout) = std::env::var("TCP_TIMEOUT_SECONDS") {
            self.tcp_timeout_seconds = parse_seconds("TCP_TIMEOUT_SECONDS", &timeout)?;
        }

        if let Ok(backend) = std::env::var("PING_BACKEND") {
            self.ping_backend = backend.parse()?;
        }

        if let Ok(program) = std::env::var("PING_PROGRAM") {
            self.ping_program = program.trim().to_string();
        }

        if let Ok(enable_color) = std::env::var("ENABLE_COLOR") {
            self.enable_color = enable_color.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", enable_color, e)))?;
        }

        Ok(())
    }
}

fn parse_seconds(name: &str, value: &str) -> Result<u64> {
    value.trim().parse()
        .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", name, value, e)))
}

// Default value functions for serde
fn default_http_timeout_secs() -> u64 {
    crate::defaults::DEFAULT_HTTP_TIMEOUT.as_secs()
}

fn default_ping_timeout_secs() -> u64 {
    crate::defaults::DEFAULT_PING_TIMEOUT.as_secs()
}

fn default_tcp_timeout_secs() -> u64 {
    crate::defaults::DEFAULT_TCP_TIMEOUT.as_secs()
}

fn default_ping_program() -> String {
    crate::defaults::DEFAULT_PING_PROGRAM.to_string()
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.http_timeout(), Duration::from_secs(5));
        assert_eq!(config.ping_timeout(), Duration::from_secs(3));
        assert_eq!(config.tcp_timeout(), Duration::from_secs(3));
        assert_eq!(config.ping_backend, PingBackend::System);
        assert_eq!(config.ping_program, "ping");
    }

    #[test]
    fn test_zero_timeout_invalid() {
        let mut config = Config::default();
        config.tcp_timeout_seconds = 0;
        let error = config.validate().unwrap_err();
        assert!(error.to_string().contains("TCP timeout"));
    }

    #[test]
    fn test_excessive_timeout_invalid() {
        let mut config = Config::default();
        config.http_timeout_seconds = MAX_TIMEOUT_SECONDS + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_ping_program_invalid() {
        let mut config = Config::default();
        config.ping_program = "   ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serde_defaults_fill_missing_fields() {
        let config: Config = serde_json::from_str(r#"{"ping_backend": "icmp"}"#).unwrap();
        assert_eq!(config.ping_backend, PingBackend::Icmp);
        assert_eq!(config.http_timeout_seconds, 5);
        assert!(config.enable_color);
    }
}
