use crate::ProbeError;
use std::fmt;
use std::str::FromStr;

/// Transport a query is sent over.
///
/// Selectors are matched exactly: `"udp"` and `"tcp"` are the only accepted
/// spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DnsProtocol {
    Udp,
    Tcp,
}

impl DnsProtocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            DnsProtocol::Udp => "udp",
            DnsProtocol::Tcp => "tcp",
        }
    }

    /// Stream transports carry a two-byte length prefix per message.
    pub fn is_stream(&self) -> bool {
        matches!(self, DnsProtocol::Tcp)
    }
}

impl fmt::Display for DnsProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DnsProtocol {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "udp" => Ok(DnsProtocol::Udp),
            "tcp" => Ok(DnsProtocol::Tcp),
            other => Err(ProbeError::UnsupportedProtocol(other.to_string())),
        }
    }
}
