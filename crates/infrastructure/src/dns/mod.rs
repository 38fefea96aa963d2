pub mod events;
pub mod exchange;
pub mod forwarding;
pub mod resolver;
pub mod transport;

pub use events::{CallContext, ChannelSink, EmitError, MetricSink, MetricsRecorder};
pub use exchange::{ExchangeEngine, ExchangeOutcome};
pub use resolver::{Resolution, Resolver};
