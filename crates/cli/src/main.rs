use clap::Parser;
use dnsprobe_domain::config::CliOverrides;
use dnsprobe_infrastructure::dns::{MetricsRecorder, Resolver};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

mod bootstrap;
mod harness;
mod summary;

#[derive(Parser)]
#[command(name = "dnsprobe")]
#[command(version)]
#[command(about = "dnsprobe - DNS load probe reporting per-query metrics")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Server address as host:port
    #[arg(short = 'a', long)]
    address: Option<String>,

    /// Domain name to query
    #[arg(short = 'd', long)]
    domain: Option<String>,

    /// Record type mnemonic (A, AAAA, MX, ...)
    #[arg(short = 't', long = "type")]
    record_type: Option<String>,

    /// Transport protocol (udp, tcp)
    #[arg(short = 'p', long)]
    protocol: Option<String>,

    /// Number of concurrent virtual users
    #[arg(long)]
    vus: Option<usize>,

    /// Resolves per virtual user
    #[arg(short = 'n', long)]
    iterations: Option<usize>,

    /// Dial timeout, e.g. 500ms (0 disables)
    #[arg(long)]
    dial_timeout: Option<String>,

    /// Read timeout, e.g. 2s (0 disables)
    #[arg(long)]
    read_timeout: Option<String>,

    /// Write timeout, e.g. 2s (0 disables)
    #[arg(long)]
    write_timeout: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Print every rendered response to stdout
    #[arg(long)]
    print_responses: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        address: cli.address,
        domain: cli.domain,
        record_type: cli.record_type,
        protocol: cli.protocol,
        vus: cli.vus,
        iterations: cli.iterations,
        dial_timeout: cli.dial_timeout,
        read_timeout: cli.read_timeout,
        write_timeout: cli.write_timeout,
        log_level: cli.log_level,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting dnsprobe v{}", Resolver::version());

    let resolver = Resolver::with_config(config.resolver.to_resolver_config()?);
    let recorder = Arc::new(MetricsRecorder::new());
    let cancel = CancellationToken::new();

    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling in-flight requests");
            signal_cancel.cancel();
        }
    });

    let plan = Arc::new(harness::LoadPlan {
        target: config.target,
        load: config.load,
        print_responses: cli.print_responses,
    });

    let report = harness::run(resolver, plan, recorder.clone(), cancel).await;

    print!("{}", summary::render(&report, &recorder.snapshot()));

    if report.all_failed() {
        anyhow::bail!("all {} requests failed", report.failed);
    }

    info!("Run complete");
    Ok(())
}
