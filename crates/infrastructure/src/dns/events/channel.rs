use super::{EmitError, MetricSink};
use dnsprobe_domain::Sample;
use tokio::sync::mpsc;

/// Forwards samples to an external aggregator over an unbounded channel.
#[derive(Clone)]
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<Sample>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Sample>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { sender: tx }, rx)
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl MetricSink for ChannelSink {
    fn push(&self, sample: Sample) -> Result<(), EmitError> {
        self.sender.send(sample).map_err(|_| EmitError::SinkClosed)
    }
}

impl std::fmt::Debug for ChannelSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelSink")
            .field("closed", &self.is_closed())
            .finish()
    }
}
