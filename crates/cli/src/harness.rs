use dnsprobe_domain::config::{LoadConfig, TargetConfig};
use dnsprobe_infrastructure::dns::{CallContext, MetricsRecorder, Resolver};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// What every virtual user sends and how often.
#[derive(Debug, Clone)]
pub struct LoadPlan {
    pub target: TargetConfig,
    pub load: LoadConfig,
    pub print_responses: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct VuOutcome {
    succeeded: u64,
    failed: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct RunReport {
    pub succeeded: u64,
    pub failed: u64,
    pub cancelled: bool,
    pub elapsed: Duration,
}

impl RunReport {
    pub fn all_failed(&self) -> bool {
        self.succeeded == 0 && self.failed > 0
    }
}

/// Runs the plan to completion or until `cancel` fires.
pub async fn run(
    resolver: Resolver,
    plan: Arc<LoadPlan>,
    recorder: Arc<MetricsRecorder>,
    cancel: CancellationToken,
) -> RunReport {
    let start = Instant::now();
    let mut tasks = JoinSet::new();

    info!(
        vus = plan.load.vus,
        iterations = plan.load.iterations,
        address = %plan.target.address,
        protocol = %plan.target.protocol,
        "Starting load run"
    );

    for vu in 0..plan.load.vus {
        let plan = plan.clone();
        let recorder = recorder.clone();
        let cancel = cancel.clone();
        tasks.spawn(async move { run_vu(vu, resolver, &plan, recorder, cancel).await });
    }

    let mut report = RunReport {
        succeeded: 0,
        failed: 0,
        cancelled: false,
        elapsed: Duration::ZERO,
    };

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(outcome) => {
                report.succeeded += outcome.succeeded;
                report.failed += outcome.failed;
            }
            Err(e) => warn!(error = %e, "virtual user task failed"),
        }
    }

    report.cancelled = cancel.is_cancelled();
    report.elapsed = start.elapsed();
    report
}

async fn run_vu(
    vu: usize,
    resolver: Resolver,
    plan: &LoadPlan,
    recorder: Arc<MetricsRecorder>,
    cancel: CancellationToken,
) -> VuOutcome {
    let target = &plan.target;
    let mut outcome = VuOutcome::default();

    for iter in 0..plan.load.iterations {
        if cancel.is_cancelled() {
            break;
        }

        let ctx = CallContext::new(recorder.clone())
            .with_tag("vu", vu)
            .with_tag("iter", iter)
            .with_cancellation(cancel.child_token());

        match resolver
            .resolve(
                &ctx,
                &target.address,
                &target.domain,
                &target.record_type,
                &target.protocol,
            )
            .await
        {
            Ok(text) => {
                outcome.succeeded += 1;
                if plan.print_responses {
                    println!("{text}");
                } else {
                    debug!(vu, iter, "resolve ok");
                }
            }
            Err(e) => {
                outcome.failed += 1;
                warn!(vu, iter, error = %e, "resolve failed");
                // every further iteration would be rejected the same way
                if e.is_validation() {
                    break;
                }
            }
        }
    }

    outcome
}
