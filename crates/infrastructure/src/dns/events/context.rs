use dnsprobe_domain::{MetricName, Sample, Tags};
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmitError {
    #[error("no metric sink attached to the calling context")]
    NoContext,

    #[error("calling context is done")]
    ContextDone,

    #[error("metric sink closed")]
    SinkClosed,
}

/// Receiver of emitted samples. Implementations must tolerate concurrent
/// pushes from many calls.
pub trait MetricSink: Send + Sync {
    fn push(&self, sample: Sample) -> Result<(), EmitError>;
}

/// Per-call execution context supplied by the caller.
///
/// Carries the sink samples go to, the tags attributing them to a virtual
/// user and iteration, and the cancellation signal for the call.
#[derive(Clone)]
pub struct CallContext {
    sink: Option<Arc<dyn MetricSink>>,
    tags: Arc<Tags>,
    cancel: CancellationToken,
}

impl CallContext {
    pub fn new(sink: Arc<dyn MetricSink>) -> Self {
        Self {
            sink: Some(sink),
            tags: Arc::new(Tags::new()),
            cancel: CancellationToken::new(),
        }
    }

    /// A context with nowhere to send samples. Every push reports
    /// `EmitError::NoContext`.
    pub fn detached() -> Self {
        Self {
            sink: None,
            tags: Arc::new(Tags::new()),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        Arc::make_mut(&mut self.tags).insert(key.into(), value.to_string());
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_done(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Pushes one sample unless the context is already done.
    pub fn push(&self, metric: MetricName, value: f64) -> Result<(), EmitError> {
        let sink = self.sink.as_ref().ok_or(EmitError::NoContext)?;
        if self.is_done() {
            return Err(EmitError::ContextDone);
        }
        sink.push(Sample::new(metric, value, self.tags.clone()))
    }
}

impl fmt::Debug for CallContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallContext")
            .field("attached", &self.sink.is_some())
            .field("tags", &self.tags)
            .field("cancelled", &self.is_done())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct VecSink(Mutex<Vec<Sample>>);

    impl MetricSink for VecSink {
        fn push(&self, sample: Sample) -> Result<(), EmitError> {
            self.0.lock().unwrap().push(sample);
            Ok(())
        }
    }

    #[test]
    fn test_push_attaches_tags() {
        let sink = Arc::new(VecSink::default());
        let ctx = CallContext::new(sink.clone())
            .with_tag("vu", 3)
            .with_tag("iter", 7);

        ctx.push(MetricName::DialCount, 1.0).unwrap();

        let samples = sink.0.lock().unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].metric, MetricName::DialCount);
        assert_eq!(samples[0].value, 1.0);
        assert_eq!(samples[0].tags.get("vu").map(String::as_str), Some("3"));
        assert_eq!(samples[0].tags.get("iter").map(String::as_str), Some("7"));
    }

    #[test]
    fn test_detached_context_reports_no_context() {
        let ctx = CallContext::detached();
        assert_eq!(
            ctx.push(MetricName::DialCount, 1.0),
            Err(EmitError::NoContext)
        );
    }

    #[test]
    fn test_done_context_drops_samples() {
        let sink = Arc::new(VecSink::default());
        let cancel = CancellationToken::new();
        let ctx = CallContext::new(sink.clone()).with_cancellation(cancel.clone());

        cancel.cancel();

        assert_eq!(
            ctx.push(MetricName::RequestCount, 1.0),
            Err(EmitError::ContextDone)
        );
        assert!(sink.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_cloned_context_shares_tags_copy_on_write() {
        let ctx = CallContext::detached().with_tag("vu", 1);
        let other = ctx.clone().with_tag("iter", 2);

        assert_eq!(ctx.tags().len(), 1);
        assert_eq!(other.tags().len(), 2);
    }
}
