#![allow(dead_code)]

use async_trait::async_trait;
use dnstap_relay_application::ports::DnsMessageSink;
use dnstap_relay_domain::{DnsMessage, DomainError, MessageKind};
use tokio::sync::RwLock;

pub struct MockDnsMessageSink {
    received: RwLock<Vec<DnsMessage>>,
    accept_limit: Option<usize>,
}

impl MockDnsMessageSink {
    pub fn new() -> Self {
        Self {
            received: RwLock::new(Vec::new()),
            accept_limit: None,
        }
    }

    /// Sink that reports a closed queue once `limit` records were accepted.
    pub fn closing_after(limit: usize) -> Self {
        Self {
            received: RwLock::new(Vec::new()),
            accept_limit: Some(limit),
        }
    }

    pub async fn received(&self) -> Vec<DnsMessage> {
        self.received.read().await.clone()
    }

    pub async fn count(&self) -> usize {
        self.received.read().await.len()
    }
}

#[async_trait]
impl DnsMessageSink for MockDnsMessageSink {
    async fn send(&self, message: DnsMessage) -> Result<(), DomainError> {
        let mut received = self.received.write().await;
        if let Some(limit) = self.accept_limit {
            if received.len() >= limit {
                return Err(DomainError::QueueClosed);
            }
        }
        received.push(message);
        Ok(())
    }

    fn output_name(&self) -> &'static str {
        "mock"
    }
}

pub fn json_line(kind: MessageKind, query_port: &str) -> String {
    format!(
        r#"{{"kind":"{}","operation":"CLIENT_QUERY","family":"INET","protocol":"UDP","time_sec":1,"time_nsec":2,"query_ip":"10.0.0.1","query_port":"{}","response_ip":"10.0.0.53","response_port":"53","payload":[1,2]}}"#,
        kind.as_str(),
        query_port
    )
}
