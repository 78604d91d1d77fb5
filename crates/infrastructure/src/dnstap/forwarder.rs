use super::connection::{BoxedStream, Dialer, SocketDialer};
use super::encoder::DnstapEncoder;
use super::{CONTENT_TYPE, OUTPUT_NAME};
use crate::framestream::{FrameStreamError, FrameStreamSender, DEFAULT_MAX_FRAME_SIZE};
use crate::output::{record_queue, shutdown_pair, OutputHandle, ShutdownSignal};
use dnstap_relay_domain::{Config, ConfigError, DnsMessage};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone)]
pub struct DnstapSettings {
    pub identity: String,
    pub retry_delay: Duration,
    pub io_timeout: Duration,
}

impl DnstapSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            identity: config.collector.server_id.clone(),
            retry_delay: config.dnstap.retry_delay(),
            io_timeout: config.dnstap.io_timeout_duration(),
        }
    }
}

pub struct DnstapForwarder;

impl DnstapForwarder {
    /// Starts the forwarder loop on the current runtime. The returned handle
    /// is the only way to feed and stop it.
    pub fn spawn(dialer: Arc<dyn Dialer>, settings: DnstapSettings) -> OutputHandle {
        let (queue_tx, queue_rx) = record_queue();
        let (handle, signal) = shutdown_pair();

        info!(
            output = OUTPUT_NAME,
            destination = %dialer.describe(),
            retry_delay_secs = settings.retry_delay.as_secs_f64(),
            "Starting forwarder"
        );

        let worker = ForwarderLoop {
            encoder: DnstapEncoder::new(settings.identity.clone()),
            dialer,
            settings,
            queue: queue_rx,
            exit: signal.token(),
            stats: ForwarderStats::default(),
        };
        tokio::spawn(worker.run(signal));

        OutputHandle::new(OUTPUT_NAME, queue_tx, handle)
    }

    pub fn from_config(config: &Config) -> Result<OutputHandle, ConfigError> {
        config.dnstap.validate()?;
        let destination = config.dnstap.destination()?;
        let dialer = SocketDialer::new(destination, config.dnstap.io_timeout_duration());

        Ok(Self::spawn(
            Arc::new(dialer),
            DnstapSettings::from_config(config),
        ))
    }
}

/// The connection, when there is one, travels inside the state.
enum State {
    Disconnected,
    Connecting,
    HandshakeInit(BoxedStream),
    Streaming(FrameStreamSender<BoxedStream>),
    Reconnecting(BoxedStream),
    Terminated(Option<BoxedStream>),
}

#[derive(Debug, Default)]
struct ForwarderStats {
    connections: u64,
    failed_dials: u64,
    frames_sent: u64,
    dropped_records: u64,
}

struct ForwarderLoop {
    dialer: Arc<dyn Dialer>,
    encoder: DnstapEncoder,
    settings: DnstapSettings,
    queue: mpsc::Receiver<DnsMessage>,
    exit: CancellationToken,
    stats: ForwarderStats,
}

impl ForwarderLoop {
    async fn run(mut self, signal: ShutdownSignal) {
        let mut state = State::Disconnected;

        loop {
            state = match state {
                State::Disconnected if self.exit.is_cancelled() => State::Terminated(None),
                State::Disconnected => State::Connecting,
                State::Connecting => self.connect().await,
                State::HandshakeInit(stream) => self.handshake(stream).await,
                State::Streaming(sender) => self.stream(sender).await,
                State::Reconnecting(stream) => self.reconnect(stream).await,
                State::Terminated(stream) => {
                    self.terminate(stream).await;
                    break;
                }
            };
        }

        signal.complete();
    }

    async fn connect(&mut self) -> State {
        if self.exit.is_cancelled() {
            return State::Terminated(None);
        }

        match self.dialer.dial().await {
            Ok(stream) => {
                self.stats.connections += 1;
                info!(
                    output = OUTPUT_NAME,
                    destination = %self.dialer.describe(),
                    "Connected to collector"
                );
                State::HandshakeInit(stream)
            }
            Err(e) => {
                self.stats.failed_dials += 1;
                error!(
                    output = OUTPUT_NAME,
                    destination = %self.dialer.describe(),
                    error = %e,
                    retry_in_secs = self.settings.retry_delay.as_secs_f64(),
                    "Connection failed"
                );
                self.after_retry_delay(State::Connecting).await
            }
        }
    }

    async fn handshake(&mut self, stream: BoxedStream) -> State {
        let mut sender = FrameStreamSender::new(stream, CONTENT_TYPE, self.settings.io_timeout);

        match sender.handshake().await {
            Ok(()) => {
                info!(output = OUTPUT_NAME, "Frame stream started");
                State::Streaming(sender)
            }
            Err(e) => {
                error!(output = OUTPUT_NAME, error = %e, "Frame stream handshake failed");
                State::Reconnecting(sender.into_inner())
            }
        }
    }

    async fn stream(&mut self, mut sender: FrameStreamSender<BoxedStream>) -> State {
        loop {
            let next = tokio::select! {
                biased;
                _ = self.exit.cancelled() => None,
                record = self.queue.recv() => record,
            };

            let Some(record) = next else {
                self.close_stream(&mut sender).await;
                return State::Terminated(Some(sender.into_inner()));
            };

            if let Err(e) = self.forward(&mut sender, record).await {
                error!(
                    output = OUTPUT_NAME,
                    error = %e,
                    "Failed to send frame, reconnecting"
                );
                return State::Reconnecting(sender.into_inner());
            }
        }
    }

    async fn forward(
        &mut self,
        sender: &mut FrameStreamSender<BoxedStream>,
        record: DnsMessage,
    ) -> Result<(), FrameStreamError> {
        let frame = match self.encoder.encode(&record) {
            Ok(frame) if frame.len() > DEFAULT_MAX_FRAME_SIZE => {
                self.stats.dropped_records += 1;
                error!(
                    output = OUTPUT_NAME,
                    size = frame.len(),
                    "Dropping record larger than the frame limit"
                );
                return Ok(());
            }
            Ok(frame) => frame,
            Err(e) => {
                self.stats.dropped_records += 1;
                error!(output = OUTPUT_NAME, error = %e, "Dropping record");
                return Ok(());
            }
        };

        sender.send_frame(frame).await?;
        self.stats.frames_sent += 1;

        if self.stats.frames_sent % 10_000 == 0 {
            debug!(
                output = OUTPUT_NAME,
                frames_sent = self.stats.frames_sent,
                "Streaming"
            );
        }

        Ok(())
    }

    /// STOP/FINISH exchange. A collector that does not answer is only logged.
    async fn close_stream(&self, sender: &mut FrameStreamSender<BoxedStream>) {
        if let Err(e) = sender.finish().await {
            warn!(
                output = OUTPUT_NAME,
                error = %e,
                "Frame stream did not finish cleanly"
            );
        }
    }

    async fn reconnect(&mut self, stream: BoxedStream) -> State {
        self.release(stream).await;
        info!(
            output = OUTPUT_NAME,
            retry_in_secs = self.settings.retry_delay.as_secs_f64(),
            "Reconnecting"
        );
        self.after_retry_delay(State::Connecting).await
    }

    /// Waits out the retry delay unless shutdown is requested first.
    async fn after_retry_delay(&self, next: State) -> State {
        tokio::select! {
            biased;
            _ = self.exit.cancelled() => State::Terminated(None),
            _ = tokio::time::sleep(self.settings.retry_delay) => next,
        }
    }

    async fn release(&self, mut stream: BoxedStream) {
        match tokio::time::timeout(self.settings.io_timeout, stream.shutdown()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => debug!(output = OUTPUT_NAME, error = %e, "Error closing connection"),
            Err(_) => debug!(output = OUTPUT_NAME, "Timed out closing connection"),
        }
    }

    async fn terminate(&mut self, stream: Option<BoxedStream>) {
        if let Some(stream) = stream {
            self.release(stream).await;
        }

        // Releases producers blocked on a full queue.
        self.queue.close();
        let mut abandoned = 0u64;
        while self.queue.try_recv().is_ok() {
            abandoned += 1;
        }
        if abandoned > 0 {
            warn!(
                output = OUTPUT_NAME,
                abandoned = abandoned,
                "Discarding queued records on shutdown"
            );
        }

        info!(
            output = OUTPUT_NAME,
            connections = self.stats.connections,
            failed_dials = self.stats.failed_dials,
            frames_sent = self.stats.frames_sent,
            dropped_records = self.stats.dropped_records,
            "Forwarder terminated"
        );
    }
}
