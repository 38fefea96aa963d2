use crate::DnsProtocol;
use std::fmt;
use std::time::SystemTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Counter,
    Trend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricUnit {
    Count,
    Milliseconds,
    Bytes,
}

/// Catalog of every metric the probe emits. The string identifiers are
/// stable and shared by all calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetricName {
    DialCount,
    DialError,
    ConnectionCount,
    ConnectionUdpCount,
    ConnectionTcpCount,
    ConnectionUdpError,
    ConnectionTcpError,
    RequestCount,
    RequestError,
    ResponseTime,
    DataUdpSent,
    DataUdpReceived,
    DataTcpSent,
    DataTcpReceived,
}

impl MetricName {
    pub const ALL: [MetricName; 14] = [
        MetricName::DialCount,
        MetricName::DialError,
        MetricName::ConnectionCount,
        MetricName::ConnectionUdpCount,
        MetricName::ConnectionTcpCount,
        MetricName::ConnectionUdpError,
        MetricName::ConnectionTcpError,
        MetricName::RequestCount,
        MetricName::RequestError,
        MetricName::ResponseTime,
        MetricName::DataUdpSent,
        MetricName::DataUdpReceived,
        MetricName::DataTcpSent,
        MetricName::DataTcpReceived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::DialCount => "dns.dial.count",
            MetricName::DialError => "dns.dial.error",
            MetricName::ConnectionCount => "dns.connection.count",
            MetricName::ConnectionUdpCount => "dns.connection.udp.count",
            MetricName::ConnectionTcpCount => "dns.connection.tcp.count",
            MetricName::ConnectionUdpError => "dns.connection.udp.error",
            MetricName::ConnectionTcpError => "dns.connection.tcp.error",
            MetricName::RequestCount => "dns.request.count",
            MetricName::RequestError => "dns.request.error",
            MetricName::ResponseTime => "dns.response.time",
            MetricName::DataUdpSent => "dns.data.udp.sent",
            MetricName::DataUdpReceived => "dns.data.udp.received",
            MetricName::DataTcpSent => "dns.data.tcp.sent",
            MetricName::DataTcpReceived => "dns.data.tcp.received",
        }
    }

    pub fn kind(&self) -> MetricKind {
        match self {
            MetricName::ResponseTime => MetricKind::Trend,
            _ => MetricKind::Counter,
        }
    }

    pub fn unit(&self) -> MetricUnit {
        match self {
            MetricName::ResponseTime => MetricUnit::Milliseconds,
            MetricName::DataUdpSent
            | MetricName::DataUdpReceived
            | MetricName::DataTcpSent
            | MetricName::DataTcpReceived => MetricUnit::Bytes,
            _ => MetricUnit::Count,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == name)
    }

    pub fn connection_count(protocol: DnsProtocol) -> Self {
        match protocol {
            DnsProtocol::Udp => MetricName::ConnectionUdpCount,
            DnsProtocol::Tcp => MetricName::ConnectionTcpCount,
        }
    }

    pub fn connection_error(protocol: DnsProtocol) -> Self {
        match protocol {
            DnsProtocol::Udp => MetricName::ConnectionUdpError,
            DnsProtocol::Tcp => MetricName::ConnectionTcpError,
        }
    }

    pub fn data_sent(protocol: DnsProtocol) -> Self {
        match protocol {
            DnsProtocol::Udp => MetricName::DataUdpSent,
            DnsProtocol::Tcp => MetricName::DataTcpSent,
        }
    }

    pub fn data_received(protocol: DnsProtocol) -> Self {
        match protocol {
            DnsProtocol::Udp => MetricName::DataUdpReceived,
            DnsProtocol::Tcp => MetricName::DataTcpReceived,
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tags attributing a sample to the caller that produced it.
pub type Tags = std::collections::BTreeMap<String, String>;

/// A single value pushed to a metric sink.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub metric: MetricName,
    pub value: f64,
    pub time: SystemTime,
    pub tags: std::sync::Arc<Tags>,
}

impl Sample {
    pub fn new(metric: MetricName, value: f64, tags: std::sync::Arc<Tags>) -> Self {
        Self {
            metric,
            value,
            time: SystemTime::now(),
            tags,
        }
    }
}
