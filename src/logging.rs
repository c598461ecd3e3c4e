//! Structured diagnostics logging for conncheck
//!
//! This module provides the diagnostics side channel of the tool:
//! - Structured logging with levels, fields and correlation IDs
//! - Debug mode JSON output with source locations
//! - Probe event logging (HTTP fetches, TCP connects, pings, range sweeps)
//!
//! Every record goes to stderr. Stdout is reserved for the result log and the
//! summaries, so piping the tool never mixes the two.

use crate::error::{AppError, Result};
use crate::models::{Config, OutcomeCategory, OutcomeContext, ProbeOutcome};
use crate::types::ProbeKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    /// Trace level - most detailed
    Trace = 0,
    /// Debug level - detailed information for debugging
    Debug = 1,
    /// Info level - general application information
    Info = 2,
    /// Warning level - potentially harmful situations
    Warn = 3,
    /// Error level - error events but application can continue
    Error = 4,
    /// Fatal level - severe error events that cause application termination
    Fatal = 5,
}

impl LogLevel {
    /// Get log level name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    /// Get ANSI color code for console output
    pub fn color_code(&self) -> &'static str {
        match self {
            LogLevel::Trace => "\x1b[37m",
            LogLevel::Debug => "\x1b[36m",
            LogLevel::Info => "\x1b[32m",
            LogLevel::Warn => "\x1b[33m",
            LogLevel::Error => "\x1b[31m",
            LogLevel::Fatal => "\x1b[35m",
        }
    }

    pub fn reset_code() -> &'static str {
        "\x1b[0m"
    }
}

impl std::str::FromStr for LogLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "FATAL" => Ok(LogLevel::Fatal),
            _ => Err(AppError::parse(format!("Invalid log level: {}", s))),
        }
    }
}

/// One structured diagnostics record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    /// Timestamp when the record was created
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    /// Logger name/component
    pub logger: String,
    /// Correlation ID for tracking related events
    pub correlation_id: Option<String>,
    /// Additional structured fields
    pub fields: HashMap<String, serde_json::Value>,
    /// Source location, filled by the logging macros
    pub location: Option<LogLocation>,
}

/// Source code location information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogLocation {
    pub file: String,
    pub line: u32,
    pub module: Option<String>,
}

/// Logger implementation with multiple output formats
pub struct Logger {
    /// Minimum log level to output
    min_level: LogLevel,
    use_color: bool,
    include_location: bool,
    format: LogFormat,
    name: String,
    /// Shared context storage
    context: Arc<RwLock<LogContext>>,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogFormat {
    /// Human-readable console format
    Console,
    /// JSON format for structured logging
    Json,
    /// Compact single-line format
    Compact,
}

/// Shared logging context for correlation and session tracking
#[derive(Debug, Default)]
struct LogContext {
    session_id: Option<String>,
    current_correlation_id: Option<String>,
    context_fields: HashMap<String, serde_json::Value>,
}

impl Logger {
    /// Create a new logger
    pub fn new(name: String) -> Self {
        Self {
            min_level: LogLevel::Info,
            use_color: true,
            include_location: false,
            format: LogFormat::Console,
            name,
            context: Arc::new(RwLock::new(LogContext::default())),
        }
    }

    /// Create a logger with specific configuration
    pub fn with_config(name: String, config: &Config) -> Self {
        let min_level = if config.debug {
            LogLevel::Debug
        } else if config.verbose {
            LogLevel::Info
        } else {
            LogLevel::Warn
        };

        Self {
            min_level,
            use_color: config.enable_color,
            include_location: config.debug,
            format: if config.debug { LogFormat::Json } else { LogFormat::Console },
            name,
            context: Arc::new(RwLock::new(LogContext::default())),
        }
    }

    pub fn set_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }

    pub fn set_format(&mut self, format: LogFormat) {
        self.format = format;
    }

    pub fn set_color(&mut self, use_color: bool) {
        self.use_color = use_color;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set session correlation ID
    pub async fn set_session_id(&self, session_id: String) {
        let mut context = self.context.write().await;
        context.session_id = Some(session_id);
    }

    /// Add context field for all subsequent records
    pub async fn add_context_field<T: Serialize>(&self, key: String, value: T) {
        if let Ok(json_value) = serde_json::to_value(value) {
            let mut context = self.context.write().await;
            context.context_fields.insert(key, json_value);
        }
    }

    /// Start a correlated operation
    pub async fn start_operation(&self, operation_name: &str) -> String {
        let correlation_id = Uuid::new_v4().to_string();
        {
            let mut context = self.context.write().await;
            context.current_correlation_id = Some(correlation_id.clone());
        }

        self.debug(&format!("Started operation: {}", operation_name))
            .correlation_id(&correlation_id)
            .field("operation", operation_name)
            .field("operation_type", "start")
            .log()
            .await;

        correlation_id
    }

    /// End a correlated operation
    pub async fn end_operation(&self, correlation_id: &str, operation_name: &str, success: bool) {
        self.debug(&format!("Completed operation: {} (success: {})", operation_name, success))
            .correlation_id(correlation_id)
            .field("operation", operation_name)
            .field("operation_type", "end")
            .field("success", success)
            .log()
            .await;

        let mut context = self.context.write().await;
        if context.current_correlation_id.as_deref() == Some(correlation_id) {
            context.current_correlation_id = None;
        }
    }

    /// Create a record builder
    pub fn log(&self, level: LogLevel, message: &str) -> LogRecordBuilder<'_> {
        LogRecordBuilder::new(self, level, message.to_string())
    }

    pub fn debug(&self, message: &str) -> LogRecordBuilder<'_> {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&self, message: &str) -> LogRecordBuilder<'_> {
        self.log(LogLevel::Info, message)
    }

    pub fn warn(&self, message: &str) -> LogRecordBuilder<'_> {
        self.log(LogLevel::Warn, message)
    }

    pub fn error(&self, message: &str) -> LogRecordBuilder<'_> {
        self.log(LogLevel::Error, message)
    }

    /// Check if a log level would be output
    pub fn would_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    async fn write_record(&self, mut record: LogRecord) {
        if record.level < self.min_level {
            return;
        }

        let context = self.context.read().await;
        if let Some(session_id) = &context.session_id {
            record.fields.insert("session_id".to_string(), serde_json::Value::String(session_id.clone()));
        }
        if record.correlation_id.is_none() {
            record.correlation_id = context.current_correlation_id.clone();
        }
        for (key, value) in &context.context_fields {
            record.fields.insert(key.clone(), value.clone());
        }
        drop(context);

        let output = self.render(&record);
        let _ = writeln!(io::stderr(), "{}", output);
    }

    /// Render a record in the configured format
    pub fn render(&self, record: &LogRecord) -> String {
        match self.format {
            LogFormat::Console => self.format_console(record),
            LogFormat::Json => self.format_json(record),
            LogFormat::Compact => self.format_compact(record),
        }
    }

    fn format_console(&self, record: &LogRecord) -> String {
        let timestamp = record.timestamp.format("%Y-%m-%d %H:%M:%S%.3f");
        let level_str = record.level.as_str();

        let formatted_level = if self.use_color {
            format!("{}{:>5}{}", record.level.color_code(), level_str, LogLevel::reset_code())
        } else {
            format!("{:>5}", level_str)
        };

        let mut output = format!("{} {} [{}] {}", timestamp, formatted_level, record.logger, record.message);

        if let Some(correlation_id) = &record.correlation_id {
            let short: String = correlation_id.chars().take(8).collect();
            output.push_str(&format!(" [{}]", short));
        }

        if !record.fields.is_empty() {
            let mut fields: Vec<String> = record.fields.iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            fields.sort();
            output.push_str(&format!(" {{{}}}", fields.join(", ")));
        }

        if self.include_location {
            if let Some(location) = &record.location {
                output.push_str(&format!(" @ {}:{}", location.file, location.line));
            }
        }

        output
    }

    fn format_json(&self, record: &LogRecord) -> String {
        match serde_json::to_string(record) {
            Ok(json) => json,
            Err(_) => format!("{{\"error\": \"Failed to serialize log record\", \"message\": {:?}}}", record.message),
        }
    }

    fn format_compact(&self, record: &LogRecord) -> String {
        let timestamp = record.timestamp.format("%H:%M:%S");
        format!("{} {} {}: {}",
            timestamp,
            record.level.as_str().chars().next().unwrap_or('?'),
            record.logger,
            record.message
        )
    }
}

/// Builder pattern for creating log records
pub struct LogRecordBuilder<'a> {
    logger: &'a Logger,
    record: LogRecord,
}

impl<'a> LogRecordBuilder<'a> {
    fn new(logger: &'a Logger, level: LogLevel, message: String) -> Self {
        Self {
            logger,
            record: LogRecord {
                timestamp: Utc::now(),
                level,
                message,
                logger: logger.name.clone(),
                correlation_id: None,
                fields: HashMap::new(),
                location: None,
            },
        }
    }

    pub fn correlation_id(mut self, id: &str) -> Self {
        self.record.correlation_id = Some(id.to_string());
        self
    }

    /// Add a structured field
    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.record.fields.insert(key.to_string(), json_value);
        }
        self
    }

    pub fn location(mut self, file: &str, line: u32, module: Option<&str>) -> Self {
        self.record.location = Some(LogLocation {
            file: file.to_string(),
            line,
            module: module.map(String::from),
        });
        self
    }

    /// Add elapsed wall time in milliseconds
    pub fn elapsed(self, duration: Duration) -> Self {
        self.field("duration_ms", duration.as_secs_f64() * 1000.0)
    }

    /// Add error information
    pub fn error_info(self, error: &AppError) -> Self {
        self.field("error_category", error.category())
            .field("error_exit_code", error.exit_code())
    }

    /// Finalize and write the record
    pub async fn log(self) {
        self.logger.write_record(self.record).await;
    }
}

/// Specialized logger for probe events
pub struct ProbeLogger {
    logger: Logger,
}

impl ProbeLogger {
    pub fn new(config: &Config) -> Self {
        Self {
            logger: Logger::with_config("PROBE".to_string(), config),
        }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Log a finished probe, dispatching on what was probed
    pub async fn log_outcome(&self, outcome: &ProbeOutcome, duration: Duration) {
        match outcome.context() {
            OutcomeContext::Http { url, scheme } => {
                let status = match outcome.category() {
                    OutcomeCategory::Responded { code, .. } | OutcomeCategory::ProtocolError { code, .. } => Some(*code),
                    _ => None,
                };
                self.log_http_request(url, scheme.label(), status, outcome.category().name(), duration).await;
            }
            OutcomeContext::Tcp { .. } => {
                let error = (!outcome.success()).then(|| outcome.detail());
                self.log_connection(outcome.target(), outcome.success(), error, duration).await;
            }
            OutcomeContext::Ping { host } => {
                self.log_ping(host, outcome.success(), outcome.detail(), duration).await;
            }
        }
    }

    /// Log HTTP request
    pub async fn log_http_request(
        &self,
        url: &str,
        method: &str,
        status_code: Option<u16>,
        category: &str,
        duration: Duration,
    ) {
        let success = status_code.is_some_and(|code| code < 400);
        let level = if success { LogLevel::Debug } else { LogLevel::Info };

        let message = format!("GET {} via {} -> {} in {:.1}ms",
            url, method,
            status_code.map_or_else(|| category.to_uppercase(), |c| c.to_string()),
            duration.as_secs_f64() * 1000.0);

        self.logger.log(level, &message)
            .field("url", url)
            .field("method", method)
            .field("status_code", status_code)
            .field("category", category)
            .field("success", success)
            .elapsed(duration)
            .log()
            .await;
    }

    /// Log connection attempt
    pub async fn log_connection(&self, target: &str, success: bool, error: Option<&str>, duration: Duration) {
        let level = if success { LogLevel::Debug } else { LogLevel::Info };
        let message = if success {
            format!("Connected to {}", target)
        } else {
            format!("Failed to connect to {}: {}", target, error.unwrap_or("unknown error"))
        };

        let mut builder = self.logger.log(level, &message)
            .field("target", target)
            .field("success", success)
            .elapsed(duration);

        if let Some(err) = error {
            builder = builder.field("error", err);
        }

        builder.log().await;
    }

    /// Log a single echo attempt
    pub async fn log_ping(&self, host: &str, success: bool, detail: &str, duration: Duration) {
        let level = if success { LogLevel::Debug } else { LogLevel::Info };
        self.logger.log(level, &format!("Ping {}: {}", host, detail))
            .field("host", host)
            .field("success", success)
            .elapsed(duration)
            .log()
            .await;
    }

    /// Log the totals of a finished range sweep
    pub async fn log_range(&self, start: &str, end: &str, responded: u64, unresponsive: u64, duration: Duration) {
        self.logger.info(&format!("Range sweep {} - {} finished", start, end))
            .field("start", start)
            .field("end", end)
            .field("responded", responded)
            .field("unresponsive", unresponsive)
            .elapsed(duration)
            .log()
            .await;
    }

    /// Log a request refused before any network activity
    pub async fn log_rejection(&self, kind: ProbeKind, input: &str, reason: &str) {
        self.logger.info(&format!("Rejected {:?} request for '{}'", kind, input))
            .field("kind", kind)
            .field("input", input)
            .field("reason", reason)
            .log()
            .await;
    }
}

/// Global logger factory and management
pub struct LoggerFactory {
    config: Config,
    session_id: String,
}

impl LoggerFactory {
    /// Create a new logger factory with a fresh session id
    pub fn new(config: Config) -> Self {
        Self::with_session_id(config, Uuid::new_v4().to_string())
    }

    /// Create a factory whose loggers tag records with an existing session id
    pub fn with_session_id(config: Config, session_id: String) -> Self {
        Self { config, session_id }
    }

    /// Create a logger with a specific name
    pub async fn create_logger(&self, name: &str) -> Logger {
        let logger = Logger::with_config(name.to_string(), &self.config);
        logger.set_session_id(self.session_id.clone()).await;
        logger
    }

    /// Create a probe logger sharing the session id
    pub async fn create_probe_logger(&self) -> ProbeLogger {
        let probe_logger = ProbeLogger::new(&self.config);
        probe_logger.logger.set_session_id(self.session_id.clone()).await;
        probe_logger
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

/// Convenience macros for logging with location information
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => {
        $logger.debug(&format!($($arg)*))
            .location(file!(), line!(), Some(module_path!()))
            .log()
            .await
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => {
        $logger.info(&format!($($arg)*))
            .location(file!(), line!(), Some(module_path!()))
            .log()
            .await
    };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)*) => {
        $logger.warn(&format!($($arg)*))
            .location(file!(), line!(), Some(module_path!()))
            .log()
            .await
    };
}
