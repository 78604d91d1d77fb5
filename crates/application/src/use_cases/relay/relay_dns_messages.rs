use crate::ports::DnsMessageSink;
use dnstap_relay_domain::{DnsMessage, DomainError};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayStats {
    pub relayed: u64,
    pub skipped: u64,
}

/// Feeds JSON-lines encoded records into a sink, one record per line.
///
/// Lines that do not decode are logged and skipped; the relay only stops on
/// end of input, a read error, or a sink that no longer accepts records.
pub struct RelayDnsMessagesUseCase {
    sink: Arc<dyn DnsMessageSink>,
}

impl RelayDnsMessagesUseCase {
    pub fn new(sink: Arc<dyn DnsMessageSink>) -> Self {
        Self { sink }
    }

    pub async fn execute<R>(&self, reader: R) -> Result<RelayStats, DomainError>
    where
        R: AsyncBufRead + Unpin + Send,
    {
        let output = self.sink.output_name();
        let mut lines = reader.lines();
        let mut stats = RelayStats::default();
        let mut line_number = 0u64;

        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| DomainError::IoError(e.to_string()))?
        {
            line_number += 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let message: DnsMessage = match serde_json::from_str(line) {
                Ok(message) => message,
                Err(e) => {
                    stats.skipped += 1;
                    warn!(output, line_number, error = %e, "Skipping undecodable record");
                    continue;
                }
            };

            self.sink.send(message).await?;
            stats.relayed += 1;

            if stats.relayed % 10_000 == 0 {
                debug!(output, relayed = stats.relayed, "Relay progress");
            }
        }

        info!(
            output,
            relayed = stats.relayed,
            skipped = stats.skipped,
            "Input exhausted"
        );

        Ok(stats)
    }
}
