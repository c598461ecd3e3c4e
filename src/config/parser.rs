//! Configuration parsing from CLI arguments and environment variables

use crate::{cli::Cli, config::env::EnvManager, error::Result, models::Config};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        let mut config = Config::default();

        self.load_env_file()?;
        config.merge_from_env()?;
        self.apply_cli_overrides(&mut config);

        config.validate()?;

        Ok(config)
    }

    /// Load .env file if it exists
    fn load_env_file(&self) -> Result<()> {
        EnvManager::load_env_file(self.cli.debug)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) {
        if let Some(seconds) = self.cli.http_timeout {
            config.http_timeout_seconds = seconds;
        }
        if let Some(seconds) = self.cli.ping_timeout {
            config.ping_timeout_seconds = seconds;
        }
        if let Some(seconds) = self.cli.tcp_timeout {
            config.tcp_timeout_seconds = seconds;
        }

        if let Some(backend) = self.cli.ping_backend {
            config.ping_backend = backend;
        }
        if let Some(ref program) = self.cli.ping_program {
            config.ping_program = program.trim().to_string();
        }

        if self.cli.color {
            config.enable_color = true;
        } else if self.cli.no_color {
            config.enable_color = false;
        }

        // CLI-only switches
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;

        if config.debug {
            eprintln!("Applied CLI overrides to configuration");
            eprintln!("{}", display_config_summary(config));
        }
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let summary = [
        format!("HTTP Timeout: {}s", config.http_timeout_seconds),
        format!("Ping Timeout: {}s", config.ping_timeout_seconds),
        format!("TCP Timeout: {}s", config.tcp_timeout_seconds),
        format!("Ping Backend: {}", config.ping_backend),
        format!("Ping Program: {}", config.ping_program),
        format!("Color Output: {}", config.enable_color),
        format!("Verbose: {}", config.verbose),
        format!("Debug: {}", config.debug),
    ];

    summary.join("\n")
}
