use super::{EmitError, MetricSink};
use dashmap::DashMap;
use dnsprobe_domain::{MetricName, Sample};
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricSummary {
    pub count: u64,
    pub sum: f64,
    pub min: f64,
    pub max: f64,
}

impl MetricSummary {
    fn new(value: f64) -> Self {
        Self {
            count: 1,
            sum: value,
            min: value,
            max: value,
        }
    }

    fn record(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum / self.count as f64
    }
}

/// In-process sink aggregating samples per metric.
#[derive(Debug, Default)]
pub struct MetricsRecorder {
    total_samples: AtomicU64,

    summaries: DashMap<MetricName, MetricSummary>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, metric: MetricName, value: f64) {
        self.total_samples.fetch_add(1, Ordering::Relaxed);

        self.summaries
            .entry(metric)
            .and_modify(|s| s.record(value))
            .or_insert_with(|| MetricSummary::new(value));
    }

    pub fn total_samples(&self) -> u64 {
        self.total_samples.load(Ordering::Relaxed)
    }

    /// Number of samples pushed for `metric`.
    pub fn count(&self, metric: MetricName) -> u64 {
        self.summaries.get(&metric).map(|s| s.count).unwrap_or(0)
    }

    pub fn sum(&self, metric: MetricName) -> f64 {
        self.summaries.get(&metric).map(|s| s.sum).unwrap_or(0.0)
    }

    pub fn summary(&self, metric: MetricName) -> Option<MetricSummary> {
        self.summaries.get(&metric).map(|s| *s)
    }

    /// Summaries in catalog order, skipping metrics never seen.
    pub fn snapshot(&self) -> Vec<(MetricName, MetricSummary)> {
        MetricName::ALL
            .into_iter()
            .filter_map(|metric| self.summary(metric).map(|s| (metric, s)))
            .collect()
    }

    pub fn reset(&self) {
        self.total_samples.store(0, Ordering::Relaxed);
        self.summaries.clear();
    }
}

impl MetricSink for MetricsRecorder {
    fn push(&self, sample: Sample) -> Result<(), EmitError> {
        self.record(sample.metric, sample.value);
        Ok(())
    }
}
