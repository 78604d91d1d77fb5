use super::format::SyslogFormatter;
use super::writer::SyslogWriter;
use super::OUTPUT_NAME;
use crate::output::{record_queue, shutdown_pair, OutputHandle, ShutdownSignal};
use dnstap_relay_domain::{Config, DnsMessage, DomainError};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

pub struct SyslogForwarder;

impl SyslogForwarder {
    /// Opens the syslog connection and starts forwarding. Failing to reach
    /// the daemon here is fatal for the caller.
    pub async fn connect(config: &Config) -> Result<OutputHandle, DomainError> {
        config
            .syslog
            .validate()
            .map_err(|e| DomainError::ConfigError(e.to_string()))?;

        let formatter = SyslogFormatter::from_config(&config.syslog)
            .map_err(|e| DomainError::ConfigError(e.to_string()))?;
        let writer = SyslogWriter::connect(&config.syslog, CONNECT_TIMEOUT).await?;

        info!(
            output = OUTPUT_NAME,
            transport = %writer.transport(),
            priority = formatter.priority(),
            "Connected to syslog"
        );

        Ok(Self::spawn(writer, formatter))
    }

    pub fn spawn(writer: SyslogWriter, formatter: SyslogFormatter) -> OutputHandle {
        let (queue_tx, queue_rx) = record_queue();
        let (handle, signal) = shutdown_pair();

        tokio::spawn(run(writer, formatter, queue_rx, signal));

        OutputHandle::new(OUTPUT_NAME, queue_tx, handle)
    }
}

async fn run(
    mut writer: SyslogWriter,
    formatter: SyslogFormatter,
    mut queue: mpsc::Receiver<DnsMessage>,
    signal: ShutdownSignal,
) {
    let exit = signal.token();
    let local = writer.is_local();
    let mut written = 0u64;
    let mut failed = 0u64;

    loop {
        let record = tokio::select! {
            biased;
            _ = exit.cancelled() => break,
            record = queue.recv() => match record {
                Some(record) => record,
                None => break,
            },
        };

        let line = formatter.format(local, &record.to_text_line());
        match writer.write_line(&line).await {
            Ok(()) => written += 1,
            Err(e) => {
                failed += 1;
                error!(output = OUTPUT_NAME, error = %e, "Failed to write syslog line");
            }
        }
    }

    queue.close();
    let mut abandoned = 0u64;
    while queue.try_recv().is_ok() {
        abandoned += 1;
    }
    if abandoned > 0 {
        warn!(
            output = OUTPUT_NAME,
            abandoned = abandoned,
            "Discarding queued records on shutdown"
        );
    }

    writer.close().await;
    info!(
        output = OUTPUT_NAME,
        written = written,
        failed = failed,
        "Run terminated"
    );

    signal.complete();
}
