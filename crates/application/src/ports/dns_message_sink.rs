use async_trait::async_trait;
use dnstap_relay_domain::{DnsMessage, DomainError};

/// Destination side of the pipeline: anything that accepts DNS records for
/// delivery. Implementations may apply backpressure by awaiting in `send`.
#[async_trait]
pub trait DnsMessageSink: Send + Sync {
    async fn send(&self, message: DnsMessage) -> Result<(), DomainError>;

    fn output_name(&self) -> &'static str;
}
