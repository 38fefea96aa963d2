use super::{CallContext, EmitError};
use dnsprobe_domain::{DnsProtocol, MetricName};
use std::time::Duration;
use tracing::{debug, warn};

/// Maps lifecycle events of one resolve call onto metric samples.
///
/// Every push is best-effort: failures are logged and never reach the
/// caller.
#[derive(Debug, Clone, Copy)]
pub struct MetricsEmitter<'a> {
    ctx: &'a CallContext,
}

impl<'a> MetricsEmitter<'a> {
    pub fn new(ctx: &'a CallContext) -> Self {
        Self { ctx }
    }

    pub fn dial(&self) {
        self.emit(MetricName::DialCount, 1.0);
    }

    pub fn dial_error(&self) {
        self.emit(MetricName::DialError, 1.0);
    }

    pub fn connection(&self, protocol: DnsProtocol) {
        self.emit(MetricName::connection_count(protocol), 1.0);
        self.emit(MetricName::ConnectionCount, 1.0);
    }

    pub fn connection_error(&self, protocol: DnsProtocol) {
        self.emit(MetricName::connection_error(protocol), 1.0);
    }

    pub fn request(&self) {
        self.emit(MetricName::RequestCount, 1.0);
    }

    pub fn request_error(&self) {
        self.emit(MetricName::RequestError, 1.0);
    }

    pub fn response_time(&self, rtt: Duration) {
        self.emit(MetricName::ResponseTime, rtt.as_secs_f64() * 1000.0);
    }

    pub fn data_sent(&self, protocol: DnsProtocol, bytes: u64) {
        self.emit(MetricName::data_sent(protocol), bytes as f64);
    }

    pub fn data_received(&self, protocol: DnsProtocol, bytes: u64) {
        self.emit(MetricName::data_received(protocol), bytes as f64);
    }

    fn emit(&self, metric: MetricName, value: f64) {
        match self.ctx.push(metric, value) {
            Ok(()) => {}
            Err(EmitError::NoContext) => {
                warn!(metric = %metric, "dropping sample: no calling context");
            }
            Err(err) => {
                debug!(metric = %metric, error = %err, "dropping sample");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::events::MetricsRecorder;
    use std::sync::Arc;

    #[test]
    fn test_connection_emits_aggregate_and_protocol_variant() {
        let recorder = Arc::new(MetricsRecorder::new());
        let ctx = CallContext::new(recorder.clone());
        let emitter = MetricsEmitter::new(&ctx);

        emitter.connection(DnsProtocol::Tcp);

        assert_eq!(recorder.count(MetricName::ConnectionCount), 1);
        assert_eq!(recorder.count(MetricName::ConnectionTcpCount), 1);
        assert_eq!(recorder.count(MetricName::ConnectionUdpCount), 0);
    }

    #[test]
    fn test_response_time_is_in_milliseconds() {
        let recorder = Arc::new(MetricsRecorder::new());
        let ctx = CallContext::new(recorder.clone());

        MetricsEmitter::new(&ctx).response_time(Duration::from_micros(2500));

        let summary = recorder.summary(MetricName::ResponseTime).unwrap();
        assert_eq!(summary.count, 1);
        assert!((summary.sum - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_data_samples_carry_byte_counts() {
        let recorder = Arc::new(MetricsRecorder::new());
        let ctx = CallContext::new(recorder.clone());
        let emitter = MetricsEmitter::new(&ctx);

        emitter.data_sent(DnsProtocol::Udp, 29);
        emitter.data_received(DnsProtocol::Udp, 45);

        assert_eq!(recorder.sum(MetricName::DataUdpSent), 29.0);
        assert_eq!(recorder.sum(MetricName::DataUdpReceived), 45.0);
        assert_eq!(recorder.sum(MetricName::DataTcpSent), 0.0);
    }

    #[test]
    fn test_detached_context_never_panics() {
        let ctx = CallContext::detached();
        let emitter = MetricsEmitter::new(&ctx);

        emitter.dial();
        emitter.dial_error();
        emitter.connection(DnsProtocol::Udp);
        emitter.connection_error(DnsProtocol::Udp);
        emitter.request();
        emitter.request_error();
        emitter.response_time(Duration::from_millis(1));
        emitter.data_sent(DnsProtocol::Tcp, 1);
        emitter.data_received(DnsProtocol::Tcp, 1);
    }
}
