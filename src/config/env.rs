//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use crate::models::config::MAX_TIMEOUT_SECONDS;
use crate::types::PingBackend;
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env from the current directory if it exists
    pub fn load_env_file(debug: bool) -> Result<()> {
        if Path::new(".env").exists() {
            dotenv::from_filename(".env")
                .map_err(|e| AppError::config(format!("Failed to load .env file: {}", e)))?;

            if debug {
                eprintln!("Loaded configuration from .env file");
            }
        } else if debug {
            eprintln!("No .env file found, using defaults and CLI arguments");
        }

        Ok(())
    }

    /// Create example .env file content
    pub fn create_example_env_content() -> String {
        r#"# conncheck Configuration
#
# Values set here are used as defaults and can be overridden by
# environment variables and command-line arguments.

# Timeout for a single HTTP(S) GET, in seconds
# HTTP_TIMEOUT_SECONDS=5

# Wait for a single ping reply, in seconds
# PING_TIMEOUT_SECONDS=3

# Timeout for a single TCP connect attempt, in seconds
# TCP_TIMEOUT_SECONDS=3

# ICMP implementation: system (runs the ping binary) or icmp (raw socket)
# PING_BACKEND=system

# Program run by the system backend
# PING_PROGRAM=ping

# Enable colored output (true/false)
# ENABLE_COLOR=true
"#
        .to_string()
    }

    /// Save example .env file to disk
    pub fn save_example_env_file(path: &Path) -> Result<()> {
        let content = Self::create_example_env_content();
        std::fs::write(path, content)
            .map_err(|e| AppError::config(format!("Failed to write example .env file: {}", e)))?;

        Ok(())
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        match key {
            "HTTP_TIMEOUT_SECONDS" | "PING_TIMEOUT_SECONDS" | "TCP_TIMEOUT_SECONDS" => {
                let timeout: u64 = value
                    .trim()
                    .parse()
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
                if timeout == 0 || timeout > MAX_TIMEOUT_SECONDS {
                    return Err(AppError::config(format!(
                        "{} must be between 1 and {}, got: {}",
                        key, MAX_TIMEOUT_SECONDS, timeout
                    )));
                }
            }
            "PING_BACKEND" => {
                value.parse::<PingBackend>()?;
            }
            "PING_PROGRAM" => {
                if value.trim().is_empty() {
                    return Err(AppError::config("PING_PROGRAM cannot be empty"));
                }
            }
            "ENABLE_COLOR" => {
                value
                    .trim()
                    .parse::<bool>()
                    .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", value, e)))?;
            }
            _ => {
                // Unknown environment variable, ignore
            }
        }

        Ok(())
    }

    /// Get list of all supported environment variables with descriptions
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("HTTP_TIMEOUT_SECONDS", "HTTP(S) request timeout in seconds (1-60)", "5"),
            ("PING_TIMEOUT_SECONDS", "Ping reply wait in seconds (1-60)", "3"),
            ("TCP_TIMEOUT_SECONDS", "TCP connect timeout in seconds (1-60)", "3"),
            ("PING_BACKEND", "ICMP implementation (system or icmp)", "system"),
            ("PING_PROGRAM", "Program run by the system ping backend", "ping"),
            ("ENABLE_COLOR", "Enable colored output", "true"),
        ]
    }

    /// Display environment variable help
    pub fn display_env_help() -> String {
        let mut help = String::new();
        help.push_str("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<22} {}\n", var, description));
            help.push_str(&format!("  {:<22} Example: {}\n\n", "", example));
        }

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default values\n");

        help
    }

    /// Validate all currently set environment variables
    pub fn validate_current_env() -> Vec<String> {
        Self::get_supported_env_vars()
            .into_iter()
            .filter_map(|(var_name, _, _)| {
                let value = std::env::var(var_name).ok()?;
                Self::validate_env_var(var_name, &value)
                    .err()
                    .map(|e| format!("Warning: {}", e))
            })
            .collect()
    }

    /// Check the .env file in the current directory, line by line
    pub fn check_env_file() -> Result<Option<Vec<String>>> {
        if !Path::new(".env").exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(".env")
            .map_err(|e| AppError::config(format!("Failed to read .env file: {}", e)))?;

        Ok(Some(Self::check_env_content(&content)))
    }

    fn check_env_content(content: &str) -> Vec<String> {
        let mut warnings = Vec::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                if let Err(e) = Self::validate_env_var(key.trim(), value.trim()) {
                    warnings.push(format!("Line '{}': {}", line, e));
                }
            }
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_example_content_lists_every_variable() {
        let content = EnvManager::create_example_env_content();

        for (name, _, _) in EnvManager::get_supported_env_vars() {
            assert!(content.contains(&format!("{}=", name)), "missing {}", name);
        }
    }

    #[test]
    fn test_save_example_file() {
        let temp_file = NamedTempFile::new().unwrap();
        EnvManager::save_example_env_file(temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains("conncheck Configuration"));
    }

    #[test]
    fn test_validate_env_var() {
        assert!(EnvManager::validate_env_var("HTTP_TIMEOUT_SECONDS", "5").is_ok());
        assert!(EnvManager::validate_env_var("PING_TIMEOUT_SECONDS", "60").is_ok());
        assert!(EnvManager::validate_env_var("PING_BACKEND", "icmp").is_ok());
        assert!(EnvManager::validate_env_var("PING_PROGRAM", "/usr/bin/ping").is_ok());
        assert!(EnvManager::validate_env_var("ENABLE_COLOR", "false").is_ok());
        assert!(EnvManager::validate_env_var("SOMETHING_ELSE", "whatever").is_ok());

        assert!(EnvManager::validate_env_var("TCP_TIMEOUT_SECONDS", "0").is_err());
        assert!(EnvManager::validate_env_var("TCP_TIMEOUT_SECONDS", "61").is_err());
        assert!(EnvManager::validate_env_var("HTTP_TIMEOUT_SECONDS", "soon").is_err());
        assert!(EnvManager::validate_env_var("PING_BACKEND", "raw").is_err());
        assert!(EnvManager::validate_env_var("PING_PROGRAM", "  ").is_err());
        assert!(EnvManager::validate_env_var("ENABLE_COLOR", "maybe").is_err());
    }

    #[test]
    fn test_check_env_content_reports_bad_lines() {
        let warnings = EnvManager::check_env_content(
            "# comment\n\nHTTP_TIMEOUT_SECONDS=5\nPING_BACKEND=raw\nENABLE_COLOR=maybe\n",
        );

        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].starts_with("Line 'PING_BACKEND=raw'"));
        assert!(warnings[1].starts_with("Line 'ENABLE_COLOR=maybe'"));
    }

    #[test]
    fn test_display_env_help() {
        let help = EnvManager::display_env_help();

        assert!(help.contains("Supported Environment Variables:"));
        assert!(help.contains("PING_BACKEND"));
        assert!(help.contains("Configuration Priority"));
        assert!(help.contains("Command-line arguments"));
    }
}
