//! One synchronous request/response cycle over an established connection.

use super::forwarding::BuiltQuery;
use super::transport::bounded;
use super::transport::tcp::{read_with_length_prefix, send_with_length_prefix};
use dnsprobe_domain::{DnsProtocol, ProbeError, ResolverConfig};
use hickory_proto::op::Message;
use std::io;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Largest UDP payload a single datagram can carry.
const MAX_UDP_MESSAGE_SIZE: usize = 65535;

#[derive(Debug, Clone)]
pub struct ExchangeOutcome {
    pub response: Message,
    pub rtt: Duration,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExchangeEngine {
    config: ResolverConfig,
}

impl ExchangeEngine {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ResolverConfig {
        &mut self.config
    }

    /// Sends `query` on `conn` and waits for the matching response.
    ///
    /// The write is bounded by the write timeout and the read by the read
    /// timeout. Round-trip time runs from just before the write until the
    /// response is decoded. Any failure, including a response carrying a
    /// different transaction id, is reported as `ProbeError::Request`.
    pub async fn exchange<C>(
        &self,
        query: &BuiltQuery,
        conn: &mut C,
        protocol: DnsProtocol,
        address: &str,
        cancel: &CancellationToken,
    ) -> Result<ExchangeOutcome, ProbeError>
    where
        C: AsyncRead + AsyncWrite + Unpin,
    {
        let start = Instant::now();

        let round_trip = async {
            bounded(
                self.config.write_timeout,
                write_message(conn, protocol, &query.bytes),
            )
            .await?;
            debug!(address, id = query.id, len = query.bytes.len(), "query sent");

            bounded(self.config.read_timeout, read_message(conn, protocol)).await
        };

        let response_bytes = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(ProbeError::request(address, "cancelled"));
            }
            result = round_trip => result.map_err(|e| ProbeError::request(address, e))?,
        };

        let response = Message::from_vec(&response_bytes).map_err(|e| {
            ProbeError::request(address, format!("failed to parse DNS response: {e}"))
        })?;

        if response.id() != query.id {
            return Err(ProbeError::request(
                address,
                format!(
                    "response id mismatch: expected {}, got {}",
                    query.id,
                    response.id()
                ),
            ));
        }

        let rtt = start.elapsed();
        debug!(
            address,
            id = query.id,
            len = response_bytes.len(),
            rtt_us = rtt.as_micros() as u64,
            "response received"
        );

        Ok(ExchangeOutcome { response, rtt })
    }
}

async fn write_message<C>(conn: &mut C, protocol: DnsProtocol, bytes: &[u8]) -> io::Result<()>
where
    C: AsyncWrite + Unpin,
{
    if protocol.is_stream() {
        return send_with_length_prefix(conn, bytes).await;
    }

    let written = conn.write(bytes).await?;
    if written != bytes.len() {
        return Err(io::Error::new(
            io::ErrorKind::WriteZero,
            format!("short write: {written} of {} bytes", bytes.len()),
        ));
    }
    Ok(())
}

async fn read_message<C>(conn: &mut C, protocol: DnsProtocol) -> io::Result<Vec<u8>>
where
    C: AsyncRead + Unpin,
{
    if protocol.is_stream() {
        return read_with_length_prefix(conn).await;
    }

    // one datagram per read
    let mut buf = vec![0u8; MAX_UDP_MESSAGE_SIZE];
    let n = conn.read(&mut buf).await?;
    buf.truncate(n);
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::forwarding::MessageBuilder;
    use hickory_proto::op::MessageType;
    use hickory_proto::serialize::binary::BinEncodable;

    fn response_for(query: &BuiltQuery, id: u16) -> Vec<u8> {
        let mut response = Message::new();
        response
            .set_id(id)
            .set_message_type(MessageType::Response)
            .set_recursion_desired(true);
        response.add_query(query.message.queries()[0].clone());
        response.to_vec().unwrap()
    }

    #[tokio::test]
    async fn test_tcp_exchange_over_duplex() {
        let query = MessageBuilder::build("example.com", "A").unwrap();
        let reply = response_for(&query, query.id);
        let (mut client, mut server) = tokio::io::duplex(4096);

        let server_task = tokio::spawn(async move {
            let request = read_with_length_prefix(&mut server).await.unwrap();
            send_with_length_prefix(&mut server, &reply).await.unwrap();
            request
        });

        let engine = ExchangeEngine::default();
        let outcome = engine
            .exchange(
                &query,
                &mut client,
                DnsProtocol::Tcp,
                "duplex",
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(server_task.await.unwrap(), query.bytes);
        assert_eq!(outcome.response.id(), query.id);
        assert_eq!(outcome.response.queries().len(), 1);
    }

    #[tokio::test]
    async fn test_udp_exchange_sends_unframed_datagram() {
        let server = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let mut client = crate::dns::transport::UdpStream::connect(server.local_addr().unwrap())
            .await
            .unwrap();
        let query = MessageBuilder::build("example.com", "A").unwrap();
        let reply = response_for(&query, query.id);

        let server_task = tokio::spawn(async move {
            let mut buf = vec![0u8; 512];
            let (len, peer) = server.recv_from(&mut buf).await.unwrap();
            server.send_to(&reply, peer).await.unwrap();
            buf.truncate(len);
            buf
        });

        let outcome = ExchangeEngine::default()
            .exchange(
                &query,
                &mut client,
                DnsProtocol::Udp,
                "udp",
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(server_task.await.unwrap(), query.bytes);
        assert_eq!(outcome.response.id(), query.id);
    }

    #[tokio::test]
    async fn test_mismatched_id_is_a_request_error() {
        let query = MessageBuilder::build("example.com", "A").unwrap();
        let reply = response_for(&query, query.id.wrapping_add(1));
        let (mut client, mut server) = tokio::io::duplex(4096);

        tokio::spawn(async move {
            let _ = read_with_length_prefix(&mut server).await;
            let _ = send_with_length_prefix(&mut server, &reply).await;
        });

        let err = ExchangeEngine::default()
            .exchange(
                &query,
                &mut client,
                DnsProtocol::Tcp,
                "duplex",
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ProbeError::Request { .. }));
        assert!(err.to_string().contains("mismatch"));
    }

    #[tokio::test]
    async fn test_garbage_response_is_a_request_error() {
        let query = MessageBuilder::build("example.com", "A").unwrap();
        let (mut client, mut server) = tokio::io::duplex(4096);

        tokio::spawn(async move {
            let _ = read_with_length_prefix(&mut server).await;
            let _ = send_with_length_prefix(&mut server, &[0xFF, 0x01, 0x02]).await;
        });

        let err = ExchangeEngine::default()
            .exchange(
                &query,
                &mut client,
                DnsProtocol::Tcp,
                "duplex",
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ProbeError::Request { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_timeout() {
        let query = MessageBuilder::build("example.com", "A").unwrap();
        let (mut client, _server) = tokio::io::duplex(4096);

        let mut config = ResolverConfig::default();
        config.set_read_timeout("50ms").unwrap();

        let err = ExchangeEngine::new(config)
            .exchange(
                &query,
                &mut client,
                DnsProtocol::Tcp,
                "duplex",
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ProbeError::Request { .. }));
        assert!(err.to_string().contains("timeout"));
    }

    #[tokio::test]
    async fn test_cancellation_aborts_read() {
        let query = MessageBuilder::build("example.com", "A").unwrap();
        let (mut client, _server) = tokio::io::duplex(4096);
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let err = ExchangeEngine::default()
            .exchange(&query, &mut client, DnsProtocol::Tcp, "duplex", &cancel)
            .await
            .unwrap_err();

        assert_eq!(err, ProbeError::request("duplex", "cancelled"));
    }
}
