//! Native ICMP echo over a raw IPv4 socket
//!
//! Usually needs root or CAP_NET_RAW. Any socket failure is reported as a
//! failed attempt, never as a missing reply.

use crate::probe::ping::{PingReply, Pinger};
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use std::net::{Ipv4Addr, SocketAddr, ToSocketAddrs};
use std::time::Duration;
use tokio::time::timeout;

/// Time allowed for name resolution on top of the reply wait
const RESOLVE_GRACE: Duration = Duration::from_secs(2);

/// Echo payload carried after the 8-byte ICMP header
const PAYLOAD: &[u8] = b"conncheck";

/// Pinger that crafts the echo request itself
#[derive(Debug, Clone, Copy, Default)]
pub struct IcmpPinger;

impl IcmpPinger {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Pinger for IcmpPinger {
    async fn ping(&self, host: &str, wait: Duration) -> PingReply {
        let host = host.trim().to_string();
        bounded_echo(wait, move || echo(&host, wait)).await
    }

    fn name(&self) -> &'static str {
        "icmp"
    }
}

/// Run a blocking echo attempt, resolution included, within `wait` plus a grace period
async fn bounded_echo<F>(wait: Duration, attempt: F) -> PingReply
where
    F: FnOnce() -> anyhow::Result<bool> + Send + 'static,
{
    // The blocking task keeps running after the deadline; its result is dropped.
    match timeout(wait + RESOLVE_GRACE, tokio::task::spawn_blocking(attempt)).await {
        Err(_elapsed) => PingReply::NoReply,
        Ok(Ok(Ok(true))) => PingReply::Replied,
        Ok(Ok(Ok(false))) => PingReply::NoReply,
        Ok(Ok(Err(e))) => PingReply::Failed(format!("{:#}", e)),
        Ok(Err(e)) => PingReply::Failed(e.to_string()),
    }
}

/// First IPv4 address `host` resolves to
fn resolve_ipv4(host: &str) -> anyhow::Result<Ipv4Addr> {
    if let Ok(addr) = host.parse::<Ipv4Addr>() {
        return Ok(addr);
    }
    (host, 0)
        .to_socket_addrs()
        .with_context(|| format!("failed to resolve {}", host))?
        .find_map(|addr| match addr {
            SocketAddr::V4(v4) => Some(*v4.ip()),
            SocketAddr::V6(_) => None,
        })
        .ok_or_else(|| anyhow!("{} has no IPv4 address", host))
}

#[cfg(unix)]
mod raw {
    use super::PAYLOAD;
    use anyhow::{anyhow, Context};
    use pnet::packet::icmp::echo_reply::EchoReplyPacket;
    use pnet::packet::icmp::echo_request::{self, MutableEchoRequestPacket};
    use pnet::packet::icmp::{self, IcmpPacket, IcmpTypes};
    use pnet::packet::ip::IpNextHeaderProtocols;
    use pnet::packet::Packet;
    use pnet::transport::{icmp_packet_iter, transport_channel, TransportChannelType, TransportProtocol};
    use std::net::{IpAddr, Ipv4Addr};
    use std::time::{Duration, Instant};

    pub const REQUEST_LEN: usize = 8 + PAYLOAD.len();

    /// Fill `buffer` with an echo request carrying `identifier`
    pub fn build_echo_request(buffer: &mut [u8], identifier: u16, sequence: u16) -> anyhow::Result<MutableEchoRequestPacket<'_>> {
        let mut packet = MutableEchoRequestPacket::new(buffer)
            .ok_or_else(|| anyhow!("echo request buffer too small"))?;
        packet.set_icmp_type(IcmpTypes::EchoRequest);
        packet.set_icmp_code(echo_request::IcmpCodes::NoCode);
        packet.set_identifier(identifier);
        packet.set_sequence_number(sequence);
        packet.set_payload(PAYLOAD);

        let checksum = {
            let view = IcmpPacket::new(packet.packet())
                .ok_or_else(|| anyhow!("echo request buffer too small"))?;
            icmp::checksum(&view)
        };
        packet.set_checksum(checksum);
        Ok(packet)
    }

    pub fn send_and_wait(target: Ipv4Addr, wait: Duration) -> anyhow::Result<bool> {
        let protocol = TransportChannelType::Layer4(TransportProtocol::Ipv4(IpNextHeaderProtocols::Icmp));
        let (mut tx, mut rx) = transport_channel(4096, protocol)
            .context("failed to open raw ICMP socket (root or CAP_NET_RAW required)")?;

        let identifier: u16 = rand::random();
        let mut buffer = [0u8; REQUEST_LEN];
        let request = build_echo_request(&mut buffer, identifier, 1)?;
        tx.send_to(request, IpAddr::V4(target))
            .with_context(|| format!("failed to send echo request to {}", target))?;

        let deadline = Instant::now() + wait;
        let mut replies = icmp_packet_iter(&mut rx);
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(false);
            }
            match replies.next_with_timeout(remaining).context("failed to read ICMP socket")? {
                None => return Ok(false),
                Some((packet, from)) => {
                    if from != IpAddr::V4(target) || packet.get_icmp_type() != IcmpTypes::EchoReply {
                        continue;
                    }
                    let matches = EchoReplyPacket::new(packet.packet())
                        .is_some_and(|reply| reply.get_identifier() == identifier);
                    if matches {
                        return Ok(true);
                    }
                }
            }
        }
    }
}

#[cfg(unix)]
fn echo(host: &str, wait: Duration) -> anyhow::Result<bool> {
    let target = resolve_ipv4(host)?;
    raw::send_and_wait(target, wait)
}

#[cfg(not(unix))]
fn echo(host: &str, _wait: Duration) -> anyhow::Result<bool> {
    let _ = resolve_ipv4(host)?;
    Err(anyhow!("native ICMP backend is not supported on this platform"))
}
