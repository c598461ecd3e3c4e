//! Sequential ping sweep over an inclusive IPv4 range

use crate::models::ProbeOutcome;
use crate::probe::ping::{ping_outcome, Pinger};
use serde::Serialize;
use std::fmt;
use std::net::Ipv4Addr;
use std::ops::RangeInclusive;
use std::time::Duration;

/// Largest number of addresses a single sweep may cover
pub const MAX_RANGE_ADDRESSES: u64 = 256;

/// Why a range was refused before any ping was sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RangeRejection {
    /// A bound is not an IPv4 address
    InvalidBounds,
    /// Start lies above end
    Inverted,
    /// More than [`MAX_RANGE_ADDRESSES`] addresses; carries the count
    TooLarge(u64),
}

impl RangeRejection {
    pub fn message(&self) -> String {
        match self {
            RangeRejection::InvalidBounds => {
                "IP inicio o IP fin inválidas. Escribe IPv4 válidas (ej: 192.168.1.10).".to_string()
            }
            RangeRejection::Inverted => "El rango es inválido: IP inicio es mayor que IP fin.".to_string(),
            RangeRejection::TooLarge(count) => {
                format!("Rango demasiado grande ({} IPs). Máximo permitido: {}.", count, MAX_RANGE_ADDRESSES)
            }
        }
    }
}

impl fmt::Display for RangeRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// A validated range, ready to sweep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangePlan {
    start: Ipv4Addr,
    end: Ipv4Addr,
}

impl RangePlan {
    /// Check both bounds, their order and the size of the range
    pub fn new(start: &str, end: &str) -> std::result::Result<Self, RangeRejection> {
        let (start, end) = match (start.trim().parse::<Ipv4Addr>(), end.trim().parse::<Ipv4Addr>()) {
            (Ok(start), Ok(end)) => (start, end),
            _ => return Err(RangeRejection::InvalidBounds),
        };
        if start > end {
            return Err(RangeRejection::Inverted);
        }

        let plan = Self { start, end };
        if plan.count() > MAX_RANGE_ADDRESSES {
            return Err(RangeRejection::TooLarge(plan.count()));
        }
        Ok(plan)
    }

    pub fn start(&self) -> Ipv4Addr {
        self.start
    }

    pub fn end(&self) -> Ipv4Addr {
        self.end
    }

    /// Inclusive number of addresses
    pub fn count(&self) -> u64 {
        u64::from(u32::from(self.end)) - u64::from(u32::from(self.start)) + 1
    }

    /// Start pinging. The plan is consumed, so a sweep cannot be restarted.
    pub fn sweep(self, pinger: &dyn Pinger, timeout: Duration) -> RangeSweep<'_> {
        RangeSweep {
            pending: u32::from(self.start)..=u32::from(self.end),
            plan: self,
            pinger,
            timeout,
            tally: RangeTally::default(),
        }
    }
}

/// Running responder counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RangeTally {
    pub responded: u64,
    pub unresponsive: u64,
}

impl RangeTally {
    fn record(&mut self, success: bool) {
        if success {
            self.responded += 1;
        } else {
            self.unresponsive += 1;
        }
    }

    pub fn total(&self) -> u64 {
        self.responded + self.unresponsive
    }
}

/// Lazy, ascending, one-shot sequence of ping outcomes
pub struct RangeSweep<'a> {
    plan: RangePlan,
    pending: RangeInclusive<u32>,
    pinger: &'a dyn Pinger,
    timeout: Duration,
    tally: RangeTally,
}

impl<'a> RangeSweep<'a> {
    /// Ping the next address, or `None` once the range is exhausted
    pub async fn next(&mut self) -> Option<ProbeOutcome> {
        let address = Ipv4Addr::from(self.pending.next()?);
        let host = address.to_string();
        let reply = self.pinger.ping(&host, self.timeout).await;
        let outcome = ping_outcome(&host, reply);
        self.tally.record(outcome.success());
        Some(outcome)
    }

    pub fn plan(&self) -> &RangePlan {
        &self.plan
    }

    pub fn tally(&self) -> RangeTally {
        self.tally
    }

    pub fn is_finished(&self) -> bool {
        self.pending.is_empty()
    }

    /// Final status line for the addresses pinged so far
    pub fn summary(&self) -> String {
        format!(
            "Rango {} - {} ({} IPs). Respondieron: {} · No respondieron: {}.",
            self.plan.start,
            self.plan.end,
            self.plan.count(),
            self.tally.responded,
            self.tally.unresponsive
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::ping::PingReply;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replies only for hosts ending in an even octet and records the call order
    #[derive(Default)]
    struct EvenPinger {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Pinger for EvenPinger {
        async fn ping(&self, host: &str, _timeout: Duration) -> PingReply {
            self.seen.lock().unwrap().push(host.to_string());
            let last: u8 = host.rsplit('.').next().unwrap().parse().unwrap();
            if last % 2 == 0 { PingReply::Replied } else { PingReply::NoReply }
        }

        fn name(&self) -> &'static str {
            "even"
        }
    }

    #[test]
    fn test_accepts_exactly_256() {
        let plan = RangePlan::new("10.0.0.0", "10.0.0.255").unwrap();
        assert_eq!(plan.count(), 256);
    }

    #[test]
    fn test_rejects_257() {
        assert_eq!(RangePlan::new("10.0.0.0", "10.0.1.0"), Err(RangeRejection::TooLarge(257)));
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        assert_eq!(RangePlan::new("10.0.0.1", "10.0.0.0"), Err(RangeRejection::Inverted));
    }

    #[test]
    fn test_reports_size_of_large_range() {
        let rejection = RangePlan::new("10.0.0.1", "10.0.2.1").unwrap_err();
        assert_eq!(rejection, RangeRejection::TooLarge(513));
        assert_eq!(rejection.message(), "Rango demasiado grande (513 IPs). Máximo permitido: 256.");
    }

    #[test]
    fn test_rejects_non_ipv4_bounds() {
        assert_eq!(RangePlan::new("example.com", "10.0.0.1"), Err(RangeRejection::InvalidBounds));
        assert_eq!(RangePlan::new("10.0.0.1", "10.0.0.256"), Err(RangeRejection::InvalidBounds));
    }

    #[test]
    fn test_full_address_space_does_not_overflow() {
        assert_eq!(
            RangePlan::new("0.0.0.0", "255.255.255.255"),
            Err(RangeRejection::TooLarge(1u64 << 32))
        );
    }

    #[test]
    fn test_single_address_range() {
        let plan = RangePlan::new(" 192.168.1.10 ", "192.168.1.10").unwrap();
        assert_eq!(plan.count(), 1);
    }

    #[tokio::test]
    async fn test_sweep_is_ascending_and_finite() {
        let pinger = EvenPinger::default();
        let plan = RangePlan::new("10.0.0.254", "10.0.1.1").unwrap();
        let mut sweep = plan.sweep(&pinger, Duration::from_millis(10));

        let mut targets = Vec::new();
        while let Some(outcome) = sweep.next().await {
            targets.push(outcome.target().to_string());
        }
        assert_eq!(targets, vec!["10.0.0.254", "10.0.0.255", "10.0.1.0", "10.0.1.1"]);
        assert_eq!(*pinger.seen.lock().unwrap(), targets);

        assert!(sweep.is_finished());
        assert!(sweep.next().await.is_none());
        assert_eq!(sweep.tally(), RangeTally { responded: 2, unresponsive: 2 });
        assert_eq!(
            sweep.summary(),
            "Rango 10.0.0.254 - 10.0.1.1 (4 IPs). Respondieron: 2 · No respondieron: 2."
        );
    }

    #[tokio::test]
    async fn test_sweep_can_stop_early() {
        let pinger = EvenPinger::default();
        let mut sweep = RangePlan::new("10.0.0.1", "10.0.0.9").unwrap().sweep(&pinger, Duration::from_millis(10));

        sweep.next().await;
        sweep.next().await;
        assert!(!sweep.is_finished());
        assert_eq!(sweep.tally().total(), 2);
        assert_eq!(pinger.seen.lock().unwrap().len(), 2);
    }
}
