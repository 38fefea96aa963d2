use super::events::{CallContext, MetricsEmitter};
use super::exchange::ExchangeEngine;
use super::forwarding::{render_message, MessageBuilder};
use super::transport;
use dnsprobe_domain::{DnsProtocol, ProbeError, ResolverConfig};
use hickory_proto::op::Message;
use std::fmt;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, trace};

/// Result of one successful query, with the traffic it took.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub response: Message,
    pub rtt: Duration,
    pub tx_bytes: u64,
    pub rx_bytes: u64,
    pub protocol: DnsProtocol,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_message(&self.response))
    }
}

/// Issues single DNS queries against a caller-chosen server and reports
/// the lifecycle of each one as metric samples on the call's context.
///
/// A resolver holds only its timeouts. It is cheap to copy and safe to
/// share between concurrent calls once configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolver {
    engine: ExchangeEngine,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ResolverConfig) -> Self {
        Self {
            engine: ExchangeEngine::new(config),
        }
    }

    pub fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    pub fn config(&self) -> &ResolverConfig {
        self.engine.config()
    }

    pub fn set_dial_timeout(&mut self, value: &str) -> Result<(), ProbeError> {
        self.engine.config_mut().set_dial_timeout(value)
    }

    pub fn set_read_timeout(&mut self, value: &str) -> Result<(), ProbeError> {
        self.engine.config_mut().set_read_timeout(value)
    }

    pub fn set_write_timeout(&mut self, value: &str) -> Result<(), ProbeError> {
        self.engine.config_mut().set_write_timeout(value)
    }

    /// Queries `address` for `domain` and returns the decoded response.
    ///
    /// Record type, domain and protocol are validated, in that order,
    /// before anything is emitted, so a rejected call leaves no samples
    /// behind. After that the call emits, in order: `dns.dial.count`, then either the dial failure
    /// pair or the connection counts, then `dns.request.count`, and finally
    /// either `dns.request.error` or the response time with the byte counts.
    pub async fn lookup(
        &self,
        ctx: &CallContext,
        address: &str,
        domain: &str,
        record_type: &str,
        protocol: &str,
    ) -> Result<Resolution, ProbeError> {
        let query = MessageBuilder::build(domain, record_type)?;
        let protocol: DnsProtocol = protocol.parse()?;
        let emitter = MetricsEmitter::new(ctx);
        let config = self.engine.config();

        emitter.dial();
        let mut conn = match transport::dial(
            protocol,
            address,
            config.dial_timeout,
            ctx.cancellation(),
        )
        .await
        {
            Ok(conn) => conn,
            Err(err) => {
                debug!(error = %err, "dial failed");
                emitter.dial_error();
                emitter.connection_error(protocol);
                return Err(err);
            }
        };
        emitter.connection(protocol);

        emitter.request();
        let outcome = self
            .engine
            .exchange(&query, &mut conn, protocol, address, ctx.cancellation())
            .await;

        let tx_bytes = conn.tx_bytes();
        let rx_bytes = conn.rx_bytes();
        release(conn, address).await;

        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(err) => {
                debug!(error = %err, "request failed");
                emitter.request_error();
                return Err(err);
            }
        };

        emitter.response_time(outcome.rtt);
        emitter.data_sent(protocol, tx_bytes);
        emitter.data_received(protocol, rx_bytes);

        Ok(Resolution {
            response: outcome.response,
            rtt: outcome.rtt,
            tx_bytes,
            rx_bytes,
            protocol,
        })
    }

    /// Like [`Resolver::lookup`], rendering the response as text.
    pub async fn resolve(
        &self,
        ctx: &CallContext,
        address: &str,
        domain: &str,
        record_type: &str,
        protocol: &str,
    ) -> Result<String, ProbeError> {
        self.lookup(ctx, address, domain, record_type, protocol)
            .await
            .map(|resolution| resolution.to_string())
    }
}

async fn release(mut conn: transport::Connection, address: &str) {
    if let Err(e) = conn.shutdown().await {
        trace!(address, error = %e, "connection shutdown failed");
    }
    trace!(address, "connection released");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::events::MetricsRecorder;
    use dnsprobe_domain::MetricName;
    use std::sync::Arc;

    #[test]
    fn test_setters_keep_previous_value_on_error() {
        let mut resolver = Resolver::new();
        resolver.set_read_timeout("2s").unwrap();

        assert!(resolver.set_read_timeout("soon").is_err());
        assert_eq!(resolver.config().read_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_version_matches_package() {
        assert_eq!(Resolver::version(), env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_invalid_protocol_emits_nothing() {
        let recorder = Arc::new(MetricsRecorder::new());
        let ctx = CallContext::new(recorder.clone());

        let err = Resolver::new()
            .resolve(&ctx, "127.0.0.1:53", "example.com", "A", "quic")
            .await
            .unwrap_err();

        assert_eq!(err, ProbeError::UnsupportedProtocol("quic".to_string()));
        assert_eq!(recorder.total_samples(), 0);
    }

    #[tokio::test]
    async fn test_unknown_type_emits_nothing() {
        let recorder = Arc::new(MetricsRecorder::new());
        let ctx = CallContext::new(recorder.clone());

        let err = Resolver::new()
            .resolve(&ctx, "127.0.0.1:53", "example.com", "ZZZ", "udp")
            .await
            .unwrap_err();

        assert_eq!(err, ProbeError::UnknownQueryType("ZZZ".to_string()));
        assert_eq!(recorder.count(MetricName::DialCount), 0);
    }
}
