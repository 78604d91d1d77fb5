use clap::{Parser, ValueEnum};
use dnstap_relay_application::use_cases::RelayDnsMessagesUseCase;
use dnstap_relay_domain::{CliOverrides, OutputKind};
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{error, info, warn};

mod bootstrap;
mod di;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputArg {
    Dnstap,
    Syslog,
}

impl From<OutputArg> for OutputKind {
    fn from(arg: OutputArg) -> Self {
        match arg {
            OutputArg::Dnstap => OutputKind::Dnstap,
            OutputArg::Syslog => OutputKind::Syslog,
        }
    }
}

#[derive(Parser)]
#[command(name = "dnstap-relay")]
#[command(version)]
#[command(about = "Forwards DNS query/response records to a dnstap collector or syslog")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Output to drive
    #[arg(long, value_enum)]
    output: Option<OutputArg>,

    /// Unix socket of the dnstap collector
    #[arg(long, value_name = "PATH")]
    sock_path: Option<String>,

    /// Host of the dnstap collector
    #[arg(long)]
    remote_address: Option<String>,

    /// Port of the dnstap collector
    #[arg(long)]
    remote_port: Option<u16>,

    /// Seconds between connection attempts
    #[arg(long, value_name = "SECONDS")]
    retry_interval: Option<u64>,

    /// Identity stamped on every dnstap message
    #[arg(long)]
    server_id: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        output: cli.output.map(OutputKind::from),
        server_id: cli.server_id,
        sock_path: cli.sock_path,
        remote_address: cli.remote_address,
        remote_port: cli.remote_port,
        retry_interval: cli.retry_interval,
        log_level: cli.log_level,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config.logging);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        output = %config.output,
        "Starting dnstap-relay"
    );

    let handle = di::build_output(&config).await?;
    let relay = RelayDnsMessagesUseCase::new(Arc::new(handle.sink()));
    let stdin = BufReader::new(tokio::io::stdin());

    let drain = tokio::select! {
        result = relay.execute(stdin) => match result {
            Ok(_) => true,
            Err(e) => {
                error!(error = %e, "Relay stopped");
                false
            }
        },
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted");
            false
        }
    };

    if drain && !handle.drain(di::drain_timeout(&config)).await {
        warn!(
            output = handle.name(),
            pending = handle.pending(),
            "Queue not drained before shutdown"
        );
    }

    handle.stop().await;

    info!("Shutdown complete");
    Ok(())
}
