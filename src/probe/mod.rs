//! Probe engine: validation, dispatch and logging of one request at a time

pub mod address;
pub mod classify;
pub mod http;
pub mod icmp;
pub mod ping;
pub mod range;
pub mod tcp;


use crate::error::Result;
use crate::logging::ProbeLogger;
use crate::models::{Config, ProbeOutcome, ProbeRequest};
use crate::session::{LogEntry, Session};
use crate::types::{PingBackend, ProbeKind};
use std::time::{Duration, Instant};

pub use classify::{classify, StatusClass};
pub use http::HttpProber;
pub use icmp::IcmpPinger;
pub use ping::{PingReply, Pinger, SystemPinger};
pub use range::{RangePlan, RangeRejection, RangeSweep, MAX_RANGE_ADDRESSES};
pub use tcp::TcpProber;

/// Why a request was refused before any network activity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The host failed the address check; carries the status text
    InvalidInput(String),
    RangeInvalid(RangeRejection),
}

impl Rejection {
    fn invalid_input(kind: ProbeKind) -> Self {
        let message = match kind {
            ProbeKind::Http | ProbeKind::Https => {
                "Dirección inválida. Escribe un dominio (www.ejemplo.com) o una IP (8.8.8.8)."
            }
            ProbeKind::PingSingle | ProbeKind::PingRange => {
                "Dirección inválida para ping. Escribe un dominio o una IP válida."
            }
            ProbeKind::Tcp => "Dirección inválida. Escribe un dominio o una IP válida.",
        };
        Rejection::InvalidInput(message.to_string())
    }

    pub fn message(&self) -> String {
        match self {
            Rejection::InvalidInput(message) => message.clone(),
            Rejection::RangeInvalid(rejection) => rejection.message(),
        }
    }
}

/// What one request produced
#[derive(Debug, Clone)]
pub struct ProbeReport {
    /// One-line status for the user
    pub summary: String,
    /// Outcomes appended to the log, in order
    pub outcomes: Vec<ProbeOutcome>,
    pub rejection: Option<Rejection>,
}

impl ProbeReport {
    fn rejected(rejection: Rejection) -> Self {
        Self {
            summary: rejection.message(),
            outcomes: Vec::new(),
            rejection: Some(rejection),
        }
    }

    pub fn is_rejected(&self) -> bool {
        self.rejection.is_some()
    }
}

/// Build the pinger selected by the configuration
pub fn pinger_for(config: &Config) -> Box<dyn Pinger> {
    match config.ping_backend {
        PingBackend::System => Box::new(SystemPinger::new(config.ping_program.clone())),
        PingBackend::Icmp => Box::new(IcmpPinger::new()),
    }
}

/// Runs probe requests against a session. Holds clients and settings only.
pub struct ProbeEngine {
    http: HttpProber,
    tcp: TcpProber,
    pinger: Box<dyn Pinger>,
    ping_timeout: Duration,
    logger: ProbeLogger,
}

impl ProbeEngine {
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_pinger(config, pinger_for(config))
    }

    /// Engine with an explicit ping backend
    pub fn with_pinger(config: &Config, pinger: Box<dyn Pinger>) -> Result<Self> {
        Ok(Self {
            http: HttpProber::new(config.http_timeout())?,
            tcp: TcpProber::new(config.tcp_timeout()),
            pinger,
            ping_timeout: config.ping_timeout(),
            logger: ProbeLogger::new(config),
        })
    }

    pub fn with_logger(mut self, logger: ProbeLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn pinger_name(&self) -> &'static str {
        self.pinger.name()
    }

    /// Run one request to completion
    pub async fn run(&self, request: &ProbeRequest, session: &mut Session) -> ProbeReport {
        self.run_with_progress(request, session, |_| {}).await
    }

    /// Run one request, calling `on_entry` after every log append
    pub async fn run_with_progress<F>(
        &self,
        request: &ProbeRequest,
        session: &mut Session,
        mut on_entry: F,
    ) -> ProbeReport
    where
        F: FnMut(&LogEntry),
    {
        let report = match request {
            ProbeRequest::PingRange { start, end } => {
                self.sweep_range(start, end, session, &mut on_entry).await
            }
            single => {
                let kind = single.kind();
                let host = single.host().trim();
                if !address::validate(host) {
                    self.reject(kind, host, Rejection::invalid_input(kind)).await
                } else {
                    let started = Instant::now();
                    let outcome = match single {
                        ProbeRequest::Http { scheme, .. } => self.http.fetch(host, *scheme).await,
                        ProbeRequest::Tcp { service, .. } => self.tcp.probe(host, *service).await,
                        _ => ping::ping_outcome(host, self.pinger.ping(host, self.ping_timeout).await),
                    };
                    self.logger.log_outcome(&outcome, started.elapsed()).await;

                    let summary = outcome.summary();
                    on_entry(session.log_mut().append(LogEntry::from_outcome(outcome.clone())));
                    ProbeReport { summary, outcomes: vec![outcome], rejection: None }
                }
            }
        };

        session.set_summary(report.summary.clone());
        report
    }

    async fn sweep_range<F>(&self, start: &str, end: &str, session: &mut Session, on_entry: &mut F) -> ProbeReport
    where
        F: FnMut(&LogEntry),
    {
        let plan = match RangePlan::new(start, end) {
            Ok(plan) => plan,
            Err(rejection) => {
                return self.reject(ProbeKind::PingRange, start, Rejection::RangeInvalid(rejection)).await;
            }
        };

        let logger = self.logger.logger();
        let correlation_id = logger.start_operation("range_sweep").await;
        let started = Instant::now();

        let mut sweep = plan.sweep(self.pinger.as_ref(), self.ping_timeout);
        let mut outcomes = Vec::new();
        loop {
            let attempt = Instant::now();
            let Some(outcome) = sweep.next().await else { break };
            self.logger.log_outcome(&outcome, attempt.elapsed()).await;
            on_entry(session.log_mut().append(LogEntry::from_outcome(outcome.clone())));
            outcomes.push(outcome);
        }

        let tally = sweep.tally();
        self.logger
            .log_range(
                &sweep.plan().start().to_string(),
                &sweep.plan().end().to_string(),
                tally.responded,
                tally.unresponsive,
                started.elapsed(),
            )
            .await;
        logger.end_operation(&correlation_id, "range_sweep", true).await;

        ProbeReport { summary: sweep.summary(), outcomes, rejection: None }
    }

    async fn reject(&self, kind: ProbeKind, input: &str, rejection: Rejection) -> ProbeReport {
        self.logger.log_rejection(kind, input, &rejection.message()).await;
        ProbeReport::rejected(rejection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::LogTag;
    use crate::types::{HttpScheme, TcpService};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Answers every ping with a fixed reply and counts the calls
    struct FixedPinger {
        reply: PingReply,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Pinger for FixedPinger {
        async fn ping(&self, _host: &str, _timeout: Duration) -> PingReply {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    fn engine(reply: PingReply) -> (ProbeEngine, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let pinger = FixedPinger { reply, calls: Arc::clone(&calls) };
        let engine = ProbeEngine::with_pinger(&Config::default(), Box::new(pinger)).unwrap();
        (engine, calls)
    }

    #[tokio::test]
    async fn test_single_ping_success_line() {
        let (engine, calls) = engine(PingReply::Replied);
        let mut session = Session::new();

        let report = engine.run(&ProbeRequest::ping("8.8.8.8"), &mut session).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(report.summary, "8.8.8.8 → Ping exitoso: el host respondió.");
        assert_eq!(session.log().all_text(), "8.8.8.8 → Ping exitoso: el host respondió.\n");
        let tags: Vec<_> = session.log().lines().map(|line| line.tag).collect();
        assert_eq!(tags, vec![Some(LogTag::Ok)]);
        assert_eq!(session.summary(), Some(report.summary.as_str()));
    }

    #[tokio::test]
    async fn test_invalid_host_is_rejected_without_probing() {
        let (engine, calls) = engine(PingReply::Replied);
        let mut session = Session::new();

        let requests = [
            ProbeRequest::ping("256.1.1.1"),
            ProbeRequest::http("256.1.1.1", HttpScheme::Https),
            ProbeRequest::tcp("256.1.1.1", TcpService::Ssh),
        ];
        for request in &requests {
            let report = engine.run(request, &mut session).await;
            assert!(report.is_rejected());
            assert!(report.outcomes.is_empty());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(session.log().is_empty());
        assert_eq!(session.summary(), Some("Dirección inválida. Escribe un dominio o una IP válida."));
    }

    #[tokio::test]
    async fn test_rejection_texts_depend_on_kind() {
        let (engine, _) = engine(PingReply::Replied);
        let mut session = Session::new();

        let ping = engine.run(&ProbeRequest::ping("localhost"), &mut session).await;
        assert_eq!(ping.summary, "Dirección inválida para ping. Escribe un dominio o una IP válida.");

        let http = engine.run(&ProbeRequest::http("", HttpScheme::Http), &mut session).await;
        assert_eq!(
            http.summary,
            "Dirección inválida. Escribe un dominio (www.ejemplo.com) o una IP (8.8.8.8)."
        );
    }

    #[tokio::test]
    async fn test_inverted_range_rejected_before_any_ping() {
        let (engine, calls) = engine(PingReply::Replied);
        let mut session = Session::new();

        let report = engine.run(&ProbeRequest::ping_range("10.0.0.1", "10.0.0.0"), &mut session).await;

        assert_eq!(report.rejection, Some(Rejection::RangeInvalid(RangeRejection::Inverted)));
        assert_eq!(report.summary, "El rango es inválido: IP inicio es mayor que IP fin.");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(session.log().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_range_rejected_before_any_ping() {
        let (engine, calls) = engine(PingReply::Replied);
        let mut session = Session::new();

        let report = engine.run(&ProbeRequest::ping_range("10.0.0.1", "10.0.2.1"), &mut session).await;

        assert_eq!(report.rejection, Some(Rejection::RangeInvalid(RangeRejection::TooLarge(513))));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_range_reports_progress_in_order() {
        let (engine, calls) = engine(PingReply::NoReply);
        let mut session = Session::new();
        let mut seen = Vec::new();

        let report = engine
            .run_with_progress(&ProbeRequest::ping_range("192.168.1.1", "192.168.1.3"), &mut session, |entry| {
                seen.push(entry.outcome().target().to_string());
            })
            .await;

        assert_eq!(seen, vec!["192.168.1.1", "192.168.1.2", "192.168.1.3"]);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(session.log().len(), 3);
        assert_eq!(
            report.summary,
            "Rango 192.168.1.1 - 192.168.1.3 (3 IPs). Respondieron: 0 · No respondieron: 3."
        );
    }

    #[tokio::test]
    async fn test_log_accumulates_across_requests() {
        let (engine, _) = engine(PingReply::ToolMissing);
        let mut session = Session::new();

        engine.run(&ProbeRequest::ping("8.8.8.8"), &mut session).await;
        engine.run(&ProbeRequest::ping(" example.com "), &mut session).await;

        assert_eq!(
            session.log().all_text(),
            "8.8.8.8 → Comando 'ping' no encontrado en el sistema.\n\
             example.com → Comando 'ping' no encontrado en el sistema.\n"
        );
    }

    #[tokio::test]
    async fn test_tcp_request_renders_host_block() {
        let (engine, _) = engine(PingReply::Replied);
        let mut session = Session::new();

        engine.run(&ProbeRequest::tcp("127.0.0.1", TcpService::Sftp), &mut session).await;

        let text = session.log().all_text();
        assert!(text.starts_with("Host: 127.0.0.1\nServicio: SFTP | Puerto: 22 | Resultado: Puerto 22 "));
    }

    #[test]
    fn test_pinger_follows_backend() {
        let mut config = Config::default();
        assert_eq!(pinger_for(&config).name(), "system");
        config.ping_backend = PingBackend::Icmp;
        assert_eq!(pinger_for(&config).name(), "icmp");
    }
}
