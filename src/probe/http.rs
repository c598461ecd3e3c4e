//! HTTP(S) reachability fetch

use crate::error::{AppError, Result};
use crate::models::{OutcomeCategory, ProbeOutcome};
use crate::probe::classify::classify;
use crate::types::HttpScheme;
use reqwest::Client;
use std::error::Error as StdError;
use std::time::Duration;
use url::Url;

/// Issues one GET per probe and classifies what came back
pub struct HttpProber {
    client: Client,
    timeout: Duration,
}

impl HttpProber {
    /// Create a prober whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("conncheck/{}", crate::VERSION))
            .build()
            .map_err(|e| AppError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch `host` once and classify the result. Never fails.
    pub async fn fetch(&self, host: &str, scheme: HttpScheme) -> ProbeOutcome {
        let url = build_url(host, scheme);
        let label = scheme.label();

        let parsed = match Url::parse(&url) {
            Ok(parsed) => parsed,
            Err(e) => return unexpected(&url, scheme, &e.to_string()),
        };

        match self.client.get(parsed).send().await {
            Ok(response) => {
                let code = response.status().as_u16();
                let class = classify(code);
                if code < 400 {
                    ProbeOutcome::http(
                        &url,
                        scheme,
                        OutcomeCategory::Responded { code, class },
                        format!("Método: {} | Código: {} | Detalle: {}", label, code, class.message()),
                    )
                } else {
                    ProbeOutcome::http(
                        &url,
                        scheme,
                        OutcomeCategory::ProtocolError { code, class },
                        format!("Error HTTP {} | Código: {} | Detalle: {}", label, code, class.message()),
                    )
                }
            }
            Err(e) if e.is_timeout() || e.is_connect() || e.is_request() => {
                let reason = root_cause(&e);
                ProbeOutcome::http(
                    &url,
                    scheme,
                    OutcomeCategory::ConnectFailure { reason: reason.clone() },
                    format!("No se pudo conectar usando {} (timeout o DNS). Detalle técnico: {}", label, reason),
                )
            }
            Err(e) => unexpected(&url, scheme, &e.to_string()),
        }
    }
}

/// Prefix the scheme unless the host already names one
pub fn build_url(raw: &str, scheme: HttpScheme) -> String {
    let raw = raw.trim();
    if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("{}://{}", scheme.as_str(), raw)
    }
}

fn unexpected(url: &str, scheme: HttpScheme, reason: &str) -> ProbeOutcome {
    ProbeOutcome::http(
        url,
        scheme,
        OutcomeCategory::Unexpected { reason: reason.to_string() },
        format!("Ocurrió un error inesperado: {}", reason),
    )
}

/// Text of the innermost error in the chain
fn root_cause(error: &(dyn StdError + 'static)) -> String {
    let mut current = error;
    while let Some(source) = current.source() {
        current = source;
    }
    current.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_prefixes_scheme() {
        assert_eq!(build_url("example.com", HttpScheme::Http), "http://example.com");
        assert_eq!(build_url("  example.com ", HttpScheme::Https), "https://example.com");
    }

    #[test]
    fn test_build_url_keeps_explicit_scheme() {
        assert_eq!(build_url("https://example.com", HttpScheme::Http), "https://example.com");
        assert_eq!(build_url("http://example.com/a", HttpScheme::Https), "http://example.com/a");
    }

    #[tokio::test]
    async fn test_unparseable_url_is_unexpected() {
        let prober = HttpProber::new(Duration::from_secs(1)).unwrap();
        let outcome = prober.fetch("exa mple.com", HttpScheme::Http).await;

        assert!(!outcome.success());
        assert!(matches!(outcome.category(), OutcomeCategory::Unexpected { .. }));
        assert!(outcome.detail().starts_with("Ocurrió un error inesperado: "));
        assert_eq!(outcome.target(), "http://exa mple.com");
    }

    #[derive(Debug, thiserror::Error)]
    #[error("error sending request")]
    struct Wrapped(#[source] std::io::Error);

    #[test]
    fn test_root_cause_walks_chain() {
        let inner = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        assert_eq!(root_cause(&Wrapped(inner)), "connection refused");
    }
}
