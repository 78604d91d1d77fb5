use dnstap_relay_domain::{Config, OutputKind};
use dnstap_relay_infrastructure::dnstap::DnstapForwarder;
use dnstap_relay_infrastructure::output::OutputHandle;
use dnstap_relay_infrastructure::syslog::SyslogForwarder;
use std::time::Duration;
use tracing::error;

const SYSLOG_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Starts the configured output. A syslog daemon that cannot be reached is
/// fatal; the dnstap output keeps retrying in the background instead.
pub async fn build_output(config: &Config) -> anyhow::Result<OutputHandle> {
    match config.output {
        OutputKind::Dnstap => DnstapForwarder::from_config(config).map_err(|e| {
            error!(error = %e, "Failed to start dnstap output");
            anyhow::anyhow!(e)
        }),
        OutputKind::Syslog => SyslogForwarder::connect(config).await.map_err(|e| {
            error!(error = %e, "Failed to connect to syslog");
            anyhow::anyhow!(e)
        }),
    }
}

/// How long queued records get to leave once input is exhausted.
pub fn drain_timeout(config: &Config) -> Duration {
    match config.output {
        OutputKind::Dnstap => config.dnstap.io_timeout_duration(),
        OutputKind::Syslog => SYSLOG_DRAIN_TIMEOUT,
    }
}
