mod shutdown;

pub use shutdown::{shutdown_pair, ShutdownHandle, ShutdownSignal};

use async_trait::async_trait;
use dnstap_relay_application::ports::DnsMessageSink;
use dnstap_relay_domain::{DnsMessage, DomainError};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::info;

/// Records buffered between producers and a forwarder before `enqueue`
/// starts waiting.
pub const QUEUE_CAPACITY: usize = 512;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

pub fn record_queue() -> (mpsc::Sender<DnsMessage>, mpsc::Receiver<DnsMessage>) {
    mpsc::channel(QUEUE_CAPACITY)
}

/// Owner side of a running forwarder: the producer half of its queue and the
/// handle that stops it.
#[derive(Debug)]
pub struct OutputHandle {
    name: &'static str,
    queue: mpsc::Sender<DnsMessage>,
    shutdown: ShutdownHandle,
}

impl OutputHandle {
    pub(crate) fn new(
        name: &'static str,
        queue: mpsc::Sender<DnsMessage>,
        shutdown: ShutdownHandle,
    ) -> Self {
        Self {
            name,
            queue,
            shutdown,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Producer half of the queue, for stages that want to push directly.
    pub fn channel(&self) -> mpsc::Sender<DnsMessage> {
        self.queue.clone()
    }

    pub fn sink(&self) -> RecordQueueSink {
        RecordQueueSink {
            output: self.name,
            queue: self.queue.clone(),
        }
    }

    /// Waits while the queue is full. Fails once the forwarder has stopped.
    pub async fn enqueue(&self, message: DnsMessage) -> Result<(), DomainError> {
        self.queue
            .send(message)
            .await
            .map_err(|_| DomainError::QueueClosed)
    }

    /// Records waiting in the queue. A record the forwarder has already
    /// taken but not yet written is not counted.
    pub fn pending(&self) -> usize {
        self.queue.max_capacity() - self.queue.capacity()
    }

    /// Waits up to `limit` for the forwarder to empty its queue. Returns
    /// whether it did.
    pub async fn drain(&self, limit: Duration) -> bool {
        let deadline = Instant::now() + limit;
        while self.pending() > 0 {
            if self.queue.is_closed() || Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
        }
        true
    }

    /// Stops the forwarder and waits until its connection is closed.
    /// Records still queued at that point are discarded.
    pub async fn stop(self) {
        info!(output = self.name, "Stopping...");
        self.shutdown.stop().await;
        info!(output = self.name, "Stopped");
    }
}

#[derive(Debug, Clone)]
pub struct RecordQueueSink {
    output: &'static str,
    queue: mpsc::Sender<DnsMessage>,
}

#[async_trait]
impl DnsMessageSink for RecordQueueSink {
    async fn send(&self, message: DnsMessage) -> Result<(), DomainError> {
        self.queue
            .send(message)
            .await
            .map_err(|_| DomainError::QueueClosed)
    }

    fn output_name(&self) -> &'static str {
        self.output
    }
}
