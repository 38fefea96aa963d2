pub mod metered;
pub mod tcp;
pub mod udp;

use async_trait::async_trait;
use dnsprobe_domain::{DnsProtocol, ProbeError};
use std::fmt;
use std::io;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub use metered::MeteredConnection;
pub use tcp::TcpTransport;
pub use udp::{UdpStream, UdpTransport};

/// Capability set the exchange depends on. Any byte stream that can be read,
/// written and shut down qualifies.
pub trait DnsConnection: AsyncRead + AsyncWrite + Send + Unpin + fmt::Debug {}

impl<T> DnsConnection for T where T: AsyncRead + AsyncWrite + Send + Unpin + fmt::Debug {}

pub type BoxedConnection = Box<dyn DnsConnection>;

/// A dialed connection whose traffic is counted.
pub type Connection = MeteredConnection<BoxedConnection>;

#[async_trait]
pub trait DnsDialer: Send + Sync {
    type Connection: DnsConnection + 'static;

    async fn connect(&self, address: &str) -> io::Result<Self::Connection>;

    fn protocol_name(&self) -> &'static str;
}

pub enum Transport {
    Udp(UdpTransport),
    Tcp(TcpTransport),
}

impl Transport {
    pub async fn connect(&self, address: &str) -> io::Result<BoxedConnection> {
        match self {
            Self::Udp(t) => Ok(Box::new(t.connect(address).await?)),
            Self::Tcp(t) => Ok(Box::new(t.connect(address).await?)),
        }
    }

    pub fn protocol_name(&self) -> &'static str {
        match self {
            Self::Udp(t) => t.protocol_name(),
            Self::Tcp(t) => t.protocol_name(),
        }
    }
}

pub fn create_transport(protocol: DnsProtocol) -> Transport {
    match protocol {
        DnsProtocol::Udp => Transport::Udp(UdpTransport),
        DnsProtocol::Tcp => Transport::Tcp(TcpTransport),
    }
}

/// Establishes a metered connection to `address`.
///
/// A zero `timeout` leaves the dial unbounded. Cancellation of `cancel`
/// aborts an in-progress dial.
pub async fn dial(
    protocol: DnsProtocol,
    address: &str,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<Connection, ProbeError> {
    let transport = create_transport(protocol);
    debug!(protocol = transport.protocol_name(), address, "dialing");

    let connect = bounded(timeout, transport.connect(address));

    let inner = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            return Err(ProbeError::dial(protocol, address, "cancelled"));
        }
        result = connect => result.map_err(|e| ProbeError::dial(protocol, address, e))?,
    };

    Ok(MeteredConnection::new(inner))
}

/// Runs `fut` under `timeout`, treating a zero duration as no bound.
pub(crate) async fn bounded<F, T>(timeout: Duration, fut: F) -> io::Result<T>
where
    F: std::future::Future<Output = io::Result<T>>,
{
    if timeout.is_zero() {
        return fut.await;
    }
    tokio::time::timeout(timeout, fut).await.map_err(|_| {
        io::Error::new(
            io::ErrorKind::TimedOut,
            format!("i/o timeout after {timeout:?}"),
        )
    })?
}
