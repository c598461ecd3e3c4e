//! Main application orchestration and execution
//!
//! Three modes share one session: a batch run over the CLI targets, an
//! interactive loop over stdin commands, and `--from-log`, which only exports
//! rows parsed from saved log text. `--env-help` and `--create-env` only
//! print or write configuration help.

use crate::{
    cli::{Cli, ShellCommand, SHELL_HELP},
    config::{display_config_summary, load_config, validate_config, EnvManager, ValidationWarning},
    error::{AppError, Result},
    export::{self, ExportStatus},
    log_debug, log_info,
    logging::{Logger, LoggerFactory},
    models::{Config, ProbeRequest},
    output::{OutputFormatter, OutputFormatterFactory},
    probe::{ProbeEngine, ProbeReport},
    session::Session,
};
use std::io::{IsTerminal, Write};
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Main application struct that coordinates all components
pub struct App {
    cli: Cli,
    config: Config,
    warnings: Vec<ValidationWarning>,
    use_color: bool,
    session: Session,
    engine: ProbeEngine,
    formatter: Box<dyn OutputFormatter>,
    logger: Logger,
}

impl App {
    /// Validate the command line, load configuration and build the engine
    pub async fn new(cli: Cli) -> Result<Self> {
        cli.validate().map_err(AppError::validation)?;

        let config = load_config(cli.clone())?;
        let warnings = validate_config(&config);

        let use_color = config.enable_color && cli.use_colors();
        if cli.color {
            colored::control::set_override(true);
        }

        let session = Session::new();
        let factory = LoggerFactory::with_session_id(config.clone(), session.id().to_string());
        let logger = factory.create_logger("APP").await;
        let engine = ProbeEngine::new(&config)?.with_logger(factory.create_probe_logger().await);
        logger.add_context_field("ping_backend".to_string(), engine.pinger_name()).await;
        let formatter = OutputFormatterFactory::create_formatter(use_color);

        Ok(Self {
            cli,
            config,
            warnings,
            use_color,
            session,
            engine,
            formatter,
            logger,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run the selected mode to completion
    pub async fn run(mut self) -> Result<()> {
        self.report_startup().await?;

        if self.cli.env_help {
            print!("{}", EnvManager::display_env_help());
            return Ok(());
        }

        if let Some(path) = self.cli.create_env.clone() {
            EnvManager::save_example_env_file(&path)?;
            println!("{}", self.formatter.format_success(&format!("Example configuration written to {}", path.display()))?);
            return Ok(());
        }

        if let Some(log_path) = self.cli.from_log.clone() {
            let export_path = self.cli.export.clone().ok_or_else(|| AppError::validation("--from-log requires --export"))?;
            return self.export_saved_log(&log_path, &export_path).await;
        }

        if self.cli.interactive {
            self.run_interactive().await?;
        } else {
            let requests = self.cli.requests();
            log_info!(self.logger, "Running {} batch request(s)", requests.len());
            for request in requests {
                self.run_request(&request).await?;
            }
        }

        if let Some(path) = self.cli.export.clone() {
            let status = self.session.export(&path);
            if let Err(e) = self.finish_export(status) {
                self.logger
                    .error("Session export failed")
                    .field("path", path.display().to_string())
                    .error_info(&e)
                    .log()
                    .await;
                return Err(e);
            }
        }

        self.logger
            .info("Session finished")
            .field("entries", self.session.log().len())
            .log()
            .await;

        Ok(())
    }

    async fn report_startup(&self) -> Result<()> {
        if self.config.debug {
            eprintln!(
                "{} v{} ({}, {}, built {})",
                crate::PKG_NAME,
                crate::VERSION,
                crate::GIT_COMMIT.unwrap_or("unknown commit"),
                crate::TARGET_TRIPLE,
                crate::BUILD_TIME
            );
            eprintln!("{}", display_config_summary(&self.config));
            if let Some(env_warnings) = EnvManager::check_env_file()? {
                for warning in env_warnings {
                    eprintln!("{}", self.formatter.format_warning(&warning)?);
                }
            }
            for warning in EnvManager::validate_current_env() {
                eprintln!("{}", self.formatter.format_warning(&warning)?);
            }
        }

        for warning in &self.warnings {
            eprintln!("{}", warning.format(self.use_color));
        }

        log_debug!(
            self.logger,
            "Session {} ready with ping backend '{}'",
            self.session.id(),
            self.engine.pinger_name()
        );

        Ok(())
    }

    /// Run one request, printing each log entry as it lands and then the summary
    async fn run_request(&mut self, request: &ProbeRequest) -> Result<ProbeReport> {
        let formatter = self.formatter.as_ref();
        let mut render_error = None;

        let report = self
            .engine
            .run_with_progress(request, &mut self.session, |entry| match formatter.format_entry(entry) {
                Ok(text) => println!("{}", text),
                Err(e) => {
                    render_error.get_or_insert(e);
                }
            })
            .await;

        if let Some(e) = render_error {
            return Err(e);
        }

        let status = if report.is_rejected() {
            formatter.format_error(&report.summary)?
        } else {
            formatter.format_summary(&report.summary)?
        };
        println!("{}", status);

        Ok(report)
    }

    async fn run_interactive(&mut self) -> Result<()> {
        let prompt = std::io::stdin().is_terminal();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        if prompt {
            println!("{}", SHELL_HELP);
        }

        loop {
            if prompt {
                print!("conncheck> ");
                std::io::stdout().flush()?;
            }

            let Some(line) = lines.next_line().await? else { break };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match line.parse::<ShellCommand>() {
                Ok(ShellCommand::Quit) => break,
                Ok(command) => self.execute(command).await?,
                Err(e) => println!("{}", self.formatter.format_error(e.message())?),
            }
        }

        Ok(())
    }

    async fn execute(&mut self, command: ShellCommand) -> Result<()> {
        match command {
            ShellCommand::Probe(request) => {
                self.run_request(&request).await?;
            }
            ShellCommand::ShowLog => {
                println!("{}", self.formatter.format_log(self.session.log())?);
            }
            ShellCommand::Clear => {
                let message = self.session.clear().to_string();
                println!("{}", self.formatter.format_summary(&message)?);
            }
            ShellCommand::Export(path) => {
                let status = self.session.export(&path);
                let line = match status {
                    ExportStatus::Failed(_) => self.formatter.format_error(&status.summary())?,
                    _ => self.formatter.format_summary(&status.summary())?,
                };
                println!("{}", line);
            }
            ShellCommand::Help => println!("{}", SHELL_HELP),
            ShellCommand::Quit => {}
        }
        Ok(())
    }

    /// Parse saved log text and export its rows
    async fn export_saved_log(&self, log_path: &Path, export_path: &Path) -> Result<()> {
        let text = tokio::fs::read_to_string(log_path)
            .await
            .map_err(|e| AppError::io(format!("Failed to read log file '{}': {}", log_path.display(), e)))?;

        log_debug!(self.logger, "Parsing {} bytes of saved log text", text.len());

        self.finish_export(export::export_text(&text, export_path))
    }

    /// Print the export status; a failed write ends the run with an error
    fn finish_export(&self, status: ExportStatus) -> Result<()> {
        match status {
            ExportStatus::Failed(reason) => Err(AppError::export(reason)),
            ExportStatus::Written { .. } => {
                println!("{}", self.formatter.format_success(&status.summary())?);
                Ok(())
            }
            ExportStatus::Empty | ExportStatus::NoRows => {
                println!("{}", self.formatter.format_summary(&status.summary())?);
                Ok(())
            }
        }
    }
}
