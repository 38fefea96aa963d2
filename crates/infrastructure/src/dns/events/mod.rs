pub mod channel;
pub mod context;
pub mod emitter;
pub mod recorder;

pub use channel::ChannelSink;
pub use context::{CallContext, EmitError, MetricSink};
pub use emitter::MetricsEmitter;
pub use recorder::{MetricSummary, MetricsRecorder};
