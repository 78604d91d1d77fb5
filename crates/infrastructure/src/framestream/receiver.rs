use super::codec::FrameStreamCodec;
use super::error::FrameStreamError;
use super::exchange::{content_type_label, expect_control, send_control, FramedStream};
use super::frame::{ControlFrame, ControlType, Frame};
use bytes::Bytes;
use futures::StreamExt;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::Framed;

/// Reading end of a bidirectional Frame Streams session, as run by a
/// collector.
pub struct FrameStreamReceiver<S> {
    framed: FramedStream<S>,
    content_type: Bytes,
    timeout: Duration,
    finished: bool,
}

impl<S> FrameStreamReceiver<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, content_type: impl Into<Bytes>, timeout: Duration) -> Self {
        Self {
            framed: Framed::new(stream, FrameStreamCodec::new()),
            content_type: content_type.into(),
            timeout,
            finished: false,
        }
    }

    /// READY -> ACCEPT -> START, seen from the collector side.
    pub async fn handshake(&mut self) -> Result<(), FrameStreamError> {
        let ready = expect_control(&mut self.framed, ControlType::Ready, self.timeout).await?;
        if !ready.has_content_type(&self.content_type) {
            return Err(FrameStreamError::ContentTypeMismatch(content_type_label(
                &self.content_type,
            )));
        }

        send_control(
            &mut self.framed,
            ControlFrame::with_content_type(ControlType::Accept, self.content_type.clone()),
            self.timeout,
        )
        .await?;

        let start = expect_control(&mut self.framed, ControlType::Start, self.timeout).await?;
        if !start.content_types.is_empty() && !start.has_content_type(&self.content_type) {
            return Err(FrameStreamError::ContentTypeMismatch(content_type_label(
                &self.content_type,
            )));
        }

        Ok(())
    }

    /// Next data frame, or `None` once the sender stopped or hung up. After a
    /// STOP the FINISH reply has already been sent and `is_finished` is set.
    pub async fn next_frame(&mut self) -> Result<Option<Bytes>, FrameStreamError> {
        if self.finished {
            return Ok(None);
        }

        match self.framed.next().await {
            None => Ok(None),
            Some(Err(e)) => Err(e),
            Some(Ok(Frame::Data(payload))) => Ok(Some(payload)),
            Some(Ok(Frame::Control(control))) if control.kind == ControlType::Stop => {
                self.finished = true;
                send_control(
                    &mut self.framed,
                    ControlFrame::new(ControlType::Finish),
                    self.timeout,
                )
                .await?;
                Ok(None)
            }
            Some(Ok(Frame::Control(control))) => Err(FrameStreamError::UnexpectedControl {
                expected: ControlType::Stop,
                got: control.kind,
            }),
        }
    }

    /// True once the sender closed the session with STOP.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn into_inner(self) -> S {
        self.framed.into_inner()
    }
}
