//! ICMP reachability through the `Pinger` capability
//!
//! [`SystemPinger`] shells out to the platform `ping` binary. The raw-socket
//! backend lives in `probe::icmp`.

use crate::models::{OutcomeCategory, ProbeOutcome};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// Extra time the child gets beyond its own wait before it is killed
const PROCESS_GRACE: Duration = Duration::from_secs(2);

/// What a single echo attempt produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PingReply {
    Replied,
    NoReply,
    /// The ping utility is not installed
    ToolMissing,
    /// The attempt could not be made at all
    Failed(String),
}

/// Sends one echo request and waits at most `timeout` for the reply
#[async_trait]
pub trait Pinger: Send + Sync {
    async fn ping(&self, host: &str, timeout: Duration) -> PingReply;

    /// Backend name for diagnostics
    fn name(&self) -> &'static str;
}

/// Turn a reply into the arrow-form outcome for `host`
pub fn ping_outcome(host: &str, reply: PingReply) -> ProbeOutcome {
    match reply {
        PingReply::Replied => ProbeOutcome::ping(host, OutcomeCategory::Reachable, "Ping exitoso: el host respondió."),
        PingReply::NoReply => ProbeOutcome::ping(host, OutcomeCategory::Unreachable, "Ping fallido: el host no respondió."),
        PingReply::ToolMissing => {
            ProbeOutcome::ping(host, OutcomeCategory::ToolMissing, "Comando 'ping' no encontrado en el sistema.")
        }
        PingReply::Failed(reason) => ProbeOutcome::ping(
            host,
            OutcomeCategory::Unexpected { reason: reason.clone() },
            format!("Error al ejecutar ping: {}", reason),
        ),
    }
}

/// Command-line dialect of the `ping` utility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Posix,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Posix
        }
    }
}

/// Arguments for a single echo with the given wait
pub fn ping_args(platform: Platform, host: &str, wait: Duration) -> Vec<String> {
    match platform {
        Platform::Windows => vec![
            "-n".to_string(),
            "1".to_string(),
            "-w".to_string(),
            wait.as_millis().to_string(),
            host.to_string(),
        ],
        // -W takes whole seconds
        Platform::Posix => vec![
            "-c".to_string(),
            "1".to_string(),
            "-W".to_string(),
            wait.as_secs().max(1).to_string(),
            host.to_string(),
        ],
    }
}

/// Pinger backed by the operating system's ping program
#[derive(Debug, Clone)]
pub struct SystemPinger {
    program: String,
    platform: Platform,
}

impl SystemPinger {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            platform: Platform::current(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for SystemPinger {
    fn default() -> Self {
        Self::new(crate::defaults::DEFAULT_PING_PROGRAM)
    }
}

#[async_trait]
impl Pinger for SystemPinger {
    async fn ping(&self, host: &str, wait: Duration) -> PingReply {
        let host = host.trim();
        if host.starts_with('-') {
            return PingReply::Failed(format!("host '{}' looks like a command-line option", host));
        }

        let mut child = match Command::new(&self.program)
            .args(ping_args(self.platform, host, wait))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return PingReply::ToolMissing,
            Err(e) => return PingReply::Failed(e.to_string()),
        };

        match timeout(wait + PROCESS_GRACE, child.wait()).await {
            Ok(Ok(status)) if status.success() => PingReply::Replied,
            Ok(Ok(_)) => PingReply::NoReply,
            Ok(Err(e)) => PingReply::Failed(e.to_string()),
            // Overran its own wait; kill_on_drop reaps it
            Err(_) => PingReply::NoReply,
        }
    }

    fn name(&self) -> &'static str {
        "system"
    }
}
