//! TCP service port probe

use crate::models::{OutcomeCategory, ProbeOutcome};
use crate::types::TcpService;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{lookup_host, TcpStream};
use tokio::time::timeout;

/// How a single connect attempt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortState {
    Open,
    /// Refused, unreachable or timed out
    Closed,
    /// The host could not be turned into an IPv4 socket address
    Error(String),
}

impl PortState {
    pub fn message(&self, port: u16) -> String {
        match self {
            PortState::Open => format!("Puerto {} abierto (conexión posible).", port),
            PortState::Closed => format!("Puerto {} cerrado o inaccesible.", port),
            PortState::Error(reason) => format!("Error al comprobar el puerto {}: {}", port, reason),
        }
    }
}

/// Connects once to a service port, bounded by a timeout
pub struct TcpProber {
    timeout: Duration,
}

impl TcpProber {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Probe the well-known port of `service` on `host`
    pub async fn probe(&self, host: &str, service: TcpService) -> ProbeOutcome {
        let host = host.trim();
        let port = service.port();
        let state = self.check_port(host, port).await;

        let category = match &state {
            PortState::Open => OutcomeCategory::Reachable,
            PortState::Closed => OutcomeCategory::Unreachable,
            PortState::Error(reason) => OutcomeCategory::ConnectFailure { reason: reason.clone() },
        };
        ProbeOutcome::tcp(host, service, category, state.message(port))
    }

    /// Resolve and connect inside one timeout; the stream is dropped at once
    pub async fn check_port(&self, host: &str, port: u16) -> PortState {
        let attempt = async {
            let addr = match first_ipv4(host, port).await {
                Ok(addr) => addr,
                Err(reason) => return PortState::Error(reason),
            };
            match TcpStream::connect(addr).await {
                Ok(_stream) => PortState::Open,
                Err(_) => PortState::Closed,
            }
        };

        match timeout(self.timeout, attempt).await {
            Ok(state) => state,
            Err(_elapsed) => PortState::Closed,
        }
    }
}

async fn first_ipv4(host: &str, port: u16) -> std::result::Result<SocketAddr, String> {
    let mut addrs = lookup_host((host, port)).await.map_err(|e| e.to_string())?;
    addrs
        .find(SocketAddr::is_ipv4)
        .ok_or_else(|| format!("{} has no IPv4 address", host))
}
