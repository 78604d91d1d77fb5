use bytes::Bytes;
use dnstap_relay_infrastructure::dnstap::{decode, schema::Dnstap, CONTENT_TYPE};
use dnstap_relay_infrastructure::framestream::{
    ControlFrame, ControlType, Frame, FrameStreamCodec, FrameStreamReceiver,
};
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio_util::codec::Framed;

const COLLECTOR_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectorBehaviour {
    /// Handshake, then read frames until STOP or hangup.
    Normal,
    /// Drop the connection after this many data frames.
    HangUpAfter(usize),
    /// Answer READY with an ACCEPT for another content type.
    WrongContentType,
}

#[derive(Debug)]
pub enum CollectorEvent {
    Frame { session: usize, dnstap: Dnstap },
    Finished { session: usize },
    HungUp { session: usize },
    Rejected { session: usize },
    Failed { session: usize, error: String },
}

impl CollectorEvent {
    pub fn session(&self) -> usize {
        match self {
            CollectorEvent::Frame { session, .. }
            | CollectorEvent::Finished { session }
            | CollectorEvent::HungUp { session }
            | CollectorEvent::Rejected { session }
            | CollectorEvent::Failed { session, .. } => *session,
        }
    }
}

pub struct MockCollector;

impl MockCollector {
    pub fn events() -> (mpsc::UnboundedSender<CollectorEvent>, CollectorEvents) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, CollectorEvents { rx })
    }

    /// Runs one collector session on `stream` in the background.
    pub fn serve<S>(
        stream: S,
        behaviour: CollectorBehaviour,
        session: usize,
        events: mpsc::UnboundedSender<CollectorEvent>,
    ) where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        tokio::spawn(async move {
            let event = match behaviour {
                CollectorBehaviour::WrongContentType => reject(stream, session).await,
                CollectorBehaviour::Normal => receive(stream, None, session, &events).await,
                CollectorBehaviour::HangUpAfter(n) => {
                    receive(stream, Some(n), session, &events).await
                }
            };
            let _ = events.send(event);
        });
    }

    pub fn listen_tcp(
        listener: tokio::net::TcpListener,
        events: mpsc::UnboundedSender<CollectorEvent>,
    ) {
        tokio::spawn(async move {
            let mut session = 0;
            while let Ok((stream, _)) = listener.accept().await {
                Self::serve(stream, CollectorBehaviour::Normal, session, events.clone());
                session += 1;
            }
        });
    }

    #[cfg(unix)]
    pub fn listen_unix(
        listener: tokio::net::UnixListener,
        events: mpsc::UnboundedSender<CollectorEvent>,
    ) {
        tokio::spawn(async move {
            let mut session = 0;
            while let Ok((stream, _)) = listener.accept().await {
                Self::serve(stream, CollectorBehaviour::Normal, session, events.clone());
                session += 1;
            }
        });
    }
}

async fn receive<S>(
    stream: S,
    hang_up_after: Option<usize>,
    session: usize,
    events: &mpsc::UnboundedSender<CollectorEvent>,
) -> CollectorEvent
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut receiver = FrameStreamReceiver::new(stream, CONTENT_TYPE, COLLECTOR_TIMEOUT);
    if let Err(e) = receiver.handshake().await {
        return CollectorEvent::Failed {
            session,
            error: e.to_string(),
        };
    }

    let mut frames = 0;
    loop {
        if hang_up_after == Some(frames) {
            drop(receiver);
            return CollectorEvent::HungUp { session };
        }

        match receiver.next_frame().await {
            Ok(Some(payload)) => {
                frames += 1;
                match decode(&payload) {
                    Ok(dnstap) => {
                        let _ = events.send(CollectorEvent::Frame { session, dnstap });
                    }
                    Err(e) => {
                        return CollectorEvent::Failed {
                            session,
                            error: e.to_string(),
                        }
                    }
                }
            }
            Ok(None) if receiver.is_finished() => return CollectorEvent::Finished { session },
            Ok(None) => return CollectorEvent::HungUp { session },
            Err(e) => {
                return CollectorEvent::Failed {
                    session,
                    error: e.to_string(),
                }
            }
        }
    }
}

async fn reject<S>(stream: S, session: usize) -> CollectorEvent
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut framed = Framed::new(stream, FrameStreamCodec::new());

    match framed.next().await {
        Some(Ok(Frame::Control(control))) if control.kind == ControlType::Ready => {}
        other => {
            return CollectorEvent::Failed {
                session,
                error: format!("expected READY, got {:?}", other),
            }
        }
    }

    let accept = ControlFrame::with_content_type(
        ControlType::Accept,
        Bytes::from_static(b"protobuf:other.Schema"),
    );
    if let Err(e) = framed.send(Frame::Control(accept)).await {
        return CollectorEvent::Failed {
            session,
            error: e.to_string(),
        };
    }

    // The sender gives up and closes the connection.
    let _ = tokio::time::timeout(COLLECTOR_TIMEOUT, framed.next()).await;
    CollectorEvent::Rejected { session }
}

pub struct CollectorEvents {
    rx: mpsc::UnboundedReceiver<CollectorEvent>,
}

impl CollectorEvents {
    pub async fn next(&mut self) -> CollectorEvent {
        tokio::time::timeout(Duration::from_secs(5), self.rx.recv())
            .await
            .expect("timed out waiting for collector event")
            .expect("collector event channel closed")
    }

    /// Next event that is not a data frame, skipping frames.
    pub async fn next_non_frame(&mut self) -> CollectorEvent {
        loop {
            match self.next().await {
                CollectorEvent::Frame { .. } => continue,
                other => return other,
            }
        }
    }

    pub async fn frames(&mut self, count: usize) -> Vec<(usize, Dnstap)> {
        let mut frames = Vec::with_capacity(count);
        while frames.len() < count {
            match self.next().await {
                CollectorEvent::Frame { session, dnstap } => frames.push((session, dnstap)),
                CollectorEvent::Failed { session, error } => {
                    panic!("collector session {} failed: {}", session, error)
                }
                _ => {}
            }
        }
        frames
    }

    /// Asserts nothing arrives within `wait`.
    pub async fn assert_quiet(&mut self, wait: Duration) {
        if let Ok(Some(event)) = tokio::time::timeout(wait, self.rx.recv()).await {
            panic!("unexpected collector event: {:?}", event);
        }
    }
}

pub fn query_port(dnstap: &Dnstap) -> u32 {
    dnstap
        .message
        .as_ref()
        .and_then(|m| m.query_port)
        .expect("frame without query port")
}
