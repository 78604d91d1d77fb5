use super::codec::FrameStreamCodec;
use super::error::FrameStreamError;
use super::frame::{ControlFrame, ControlType, Frame};
use futures::{SinkExt, StreamExt};
use std::future::Future;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::Framed;

pub(crate) type FramedStream<S> = Framed<S, FrameStreamCodec>;

pub(crate) async fn with_timeout<F, T>(
    timeout: Duration,
    what: &'static str,
    fut: F,
) -> Result<T, FrameStreamError>
where
    F: Future<Output = Result<T, FrameStreamError>>,
{
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| FrameStreamError::Timeout(what))?
}

pub(crate) async fn send_frame<S>(
    framed: &mut FramedStream<S>,
    frame: Frame,
    timeout: Duration,
    what: &'static str,
) -> Result<(), FrameStreamError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    with_timeout(timeout, what, framed.send(frame)).await
}

pub(crate) async fn send_control<S>(
    framed: &mut FramedStream<S>,
    control: ControlFrame,
    timeout: Duration,
) -> Result<(), FrameStreamError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let what = control_write_label(control.kind);
    send_frame(framed, Frame::Control(control), timeout, what).await
}

pub(crate) async fn expect_control<S>(
    framed: &mut FramedStream<S>,
    expected: ControlType,
    timeout: Duration,
) -> Result<ControlFrame, FrameStreamError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let next = tokio::time::timeout(timeout, framed.next())
        .await
        .map_err(|_| FrameStreamError::Timeout(control_read_label(expected)))?;

    match next {
        None => Err(FrameStreamError::ConnectionClosed),
        Some(Err(e)) => Err(e),
        Some(Ok(Frame::Control(control))) if control.kind == expected => Ok(control),
        Some(Ok(Frame::Control(control))) => Err(FrameStreamError::UnexpectedControl {
            expected,
            got: control.kind,
        }),
        Some(Ok(Frame::Data(_))) => Err(FrameStreamError::UnexpectedData(expected)),
    }
}

pub(crate) fn content_type_label(content_type: &[u8]) -> String {
    String::from_utf8_lossy(content_type).into_owned()
}

fn control_write_label(kind: ControlType) -> &'static str {
    match kind {
        ControlType::Accept => "ACCEPT write",
        ControlType::Start => "START write",
        ControlType::Stop => "STOP write",
        ControlType::Ready => "READY write",
        ControlType::Finish => "FINISH write",
    }
}

fn control_read_label(kind: ControlType) -> &'static str {
    match kind {
        ControlType::Accept => "ACCEPT read",
        ControlType::Start => "START read",
        ControlType::Stop => "STOP read",
        ControlType::Ready => "READY read",
        ControlType::Finish => "FINISH read",
    }
}
