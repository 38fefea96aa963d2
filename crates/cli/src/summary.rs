use crate::harness::RunReport;
use dnsprobe_domain::{MetricKind, MetricName, MetricUnit};
use dnsprobe_infrastructure::dns::events::MetricSummary;
use std::fmt::Write;

fn unit_suffix(unit: MetricUnit) -> &'static str {
    match unit {
        MetricUnit::Count => "",
        MetricUnit::Milliseconds => "ms",
        MetricUnit::Bytes => "B",
    }
}

/// Renders the per-metric table printed at the end of a run.
pub fn render(report: &RunReport, rows: &[(MetricName, MetricSummary)]) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "requests: {} ok, {} failed in {:.2?}{}",
        report.succeeded,
        report.failed,
        report.elapsed,
        if report.cancelled { " (cancelled)" } else { "" }
    );

    if rows.is_empty() {
        let _ = writeln!(out, "no samples recorded");
        return out;
    }

    let width = rows
        .iter()
        .map(|(metric, _)| metric.as_str().len())
        .max()
        .unwrap_or(0);

    for (metric, summary) in rows {
        let unit = unit_suffix(metric.unit());
        let _ = match metric.kind() {
            MetricKind::Counter => writeln!(
                out,
                "{:<width$}  {}{}",
                metric.as_str(),
                summary.sum,
                unit
            ),
            MetricKind::Trend => writeln!(
                out,
                "{:<width$}  avg={:.3}{u} min={:.3}{u} max={:.3}{u} count={}",
                metric.as_str(),
                summary.mean(),
                summary.min,
                summary.max,
                summary.count,
                u = unit
            ),
        };
    }

    out
}
