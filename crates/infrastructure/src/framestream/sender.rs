use super::codec::FrameStreamCodec;
use super::error::FrameStreamError;
use super::exchange::{content_type_label, expect_control, send_control, send_frame, FramedStream};
use super::frame::{ControlFrame, ControlType, Frame};
use bytes::Bytes;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::Framed;

/// Writing end of a bidirectional Frame Streams session.
///
/// `handshake` must succeed before `send_frame` is used. Every exchange with
/// the peer, data writes included, is bounded by the I/O timeout.
pub struct FrameStreamSender<S> {
    framed: FramedStream<S>,
    content_type: Bytes,
    timeout: Duration,
}

impl<S> FrameStreamSender<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, content_type: impl Into<Bytes>, timeout: Duration) -> Self {
        Self {
            framed: Framed::new(stream, FrameStreamCodec::new()),
            content_type: content_type.into(),
            timeout,
        }
    }

    /// READY -> ACCEPT -> START.
    pub async fn handshake(&mut self) -> Result<(), FrameStreamError> {
        send_control(
            &mut self.framed,
            ControlFrame::with_content_type(ControlType::Ready, self.content_type.clone()),
            self.timeout,
        )
        .await?;

        let accept = expect_control(&mut self.framed, ControlType::Accept, self.timeout).await?;
        if !accept.has_content_type(&self.content_type) {
            return Err(FrameStreamError::ContentTypeMismatch(content_type_label(
                &self.content_type,
            )));
        }

        send_control(
            &mut self.framed,
            ControlFrame::with_content_type(ControlType::Start, self.content_type.clone()),
            self.timeout,
        )
        .await
    }

    pub async fn send_frame(&mut self, payload: Bytes) -> Result<(), FrameStreamError> {
        send_frame(
            &mut self.framed,
            Frame::Data(payload),
            self.timeout,
            "data frame write",
        )
        .await
    }

    /// STOP -> FINISH. The underlying stream is left open.
    pub async fn finish(&mut self) -> Result<(), FrameStreamError> {
        send_control(
            &mut self.framed,
            ControlFrame::new(ControlType::Stop),
            self.timeout,
        )
        .await?;
        expect_control(&mut self.framed, ControlType::Finish, self.timeout).await?;
        Ok(())
    }

    pub fn content_type(&self) -> &[u8] {
        &self.content_type
    }

    pub fn into_inner(self) -> S {
        self.framed.into_inner()
    }
}
