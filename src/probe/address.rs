//! Structural check on user-entered hosts
//!
//! Accepts IPv4 literals and anything that looks like a dotted domain name.
//! No DNS lookup happens here: strings such as `a..b` pass and are left to
//! fail at the network layer.

use std::net::Ipv4Addr;

/// True when `text` is a dotted-quad IPv4 address with every octet in 0-255
pub fn is_ipv4(text: &str) -> bool {
    text.parse::<Ipv4Addr>().is_ok()
}

/// Quick syntax gate for an IPv4 address or a simple domain
pub fn validate(text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() {
        return false;
    }
    if is_ipv4(text) {
        return true;
    }
    // Numeric text is either a valid IPv4 literal or nothing: bare numbers
    // and dotted numbers with a bad octet are never domains.
    if text.chars().all(|c| c.is_numeric() || c == '.') {
        return false;
    }
    text.contains('.')
}
