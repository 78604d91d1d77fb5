use bytes::Bytes;
use dnstap_relay_infrastructure::framestream::{
    ControlFrame, ControlType, Frame, FrameStreamCodec, FrameStreamError, FrameStreamReceiver,
    FrameStreamSender,
};
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio_util::codec::Framed;

const CT: &str = "protobuf:dnstap.Dnstap";
const TIMEOUT: Duration = Duration::from_secs(2);

#[tokio::test]
async fn test_session_delivers_frames_and_finishes() {
    let (client, server) = tokio::io::duplex(4096);

    let collector = tokio::spawn(async move {
        let mut receiver = FrameStreamReceiver::new(server, CT, TIMEOUT);
        receiver.handshake().await.unwrap();

        let mut frames = Vec::new();
        while let Some(frame) = receiver.next_frame().await.unwrap() {
            frames.push(frame);
        }
        (frames, receiver.is_finished())
    });

    let mut sender = FrameStreamSender::new(client, CT, TIMEOUT);
    sender.handshake().await.unwrap();
    for payload in [&b"one"[..], b"two", b"three"] {
        sender
            .send_frame(Bytes::copy_from_slice(payload))
            .await
            .unwrap();
    }
    sender.finish().await.unwrap();

    let (frames, finished) = collector.await.unwrap();
    assert_eq!(
        frames,
        vec![
            Bytes::from_static(b"one"),
            Bytes::from_static(b"two"),
            Bytes::from_static(b"three")
        ]
    );
    assert!(finished);
    assert_eq!(sender.content_type(), CT.as_bytes());
}

#[tokio::test]
async fn test_receiver_reports_hangup_without_finish() {
    let (client, server) = tokio::io::duplex(4096);

    let collector = tokio::spawn(async move {
        let mut receiver = FrameStreamReceiver::new(server, CT, TIMEOUT);
        receiver.handshake().await.unwrap();
        let first = receiver.next_frame().await.unwrap();
        let after = receiver.next_frame().await.unwrap();
        (first, after, receiver.is_finished())
    });

    let mut sender = FrameStreamSender::new(client, CT, TIMEOUT);
    sender.handshake().await.unwrap();
    sender.send_frame(Bytes::from_static(b"x")).await.unwrap();
    drop(sender);

    let (first, after, finished) = collector.await.unwrap();
    assert_eq!(first, Some(Bytes::from_static(b"x")));
    assert_eq!(after, None);
    assert!(!finished);
}

#[tokio::test]
async fn test_sender_rejects_accept_for_other_content_type() {
    let (client, server) = tokio::io::duplex(4096);

    let peer = tokio::spawn(async move {
        let mut framed = Framed::new(server, FrameStreamCodec::new());
        let ready = framed.next().await.unwrap().unwrap();
        assert!(matches!(ready, Frame::Control(ref c) if c.kind == ControlType::Ready));
        framed
            .send(Frame::Control(ControlFrame::with_content_type(
                ControlType::Accept,
                Bytes::from_static(b"protobuf:other"),
            )))
            .await
            .unwrap();
        framed
    });

    let mut sender = FrameStreamSender::new(client, CT, TIMEOUT);
    let result = sender.handshake().await;
    assert!(matches!(
        result,
        Err(FrameStreamError::ContentTypeMismatch(ref ct)) if ct == CT
    ));
    drop(peer.await.unwrap());
}

#[tokio::test]
async fn test_receiver_rejects_ready_for_other_content_type() {
    let (client, server) = tokio::io::duplex(4096);

    let collector = tokio::spawn(async move {
        let mut receiver = FrameStreamReceiver::new(server, "protobuf:other", TIMEOUT);
        receiver.handshake().await
    });

    let mut sender = FrameStreamSender::new(client, CT, TIMEOUT);
    let sender_result = sender.handshake().await;

    assert!(matches!(
        collector.await.unwrap(),
        Err(FrameStreamError::ContentTypeMismatch(_))
    ));
    assert!(sender_result.is_err());
}

#[tokio::test]
async fn test_sender_times_out_on_silent_peer() {
    let (client, _server) = tokio::io::duplex(4096);

    let mut sender = FrameStreamSender::new(client, CT, Duration::from_millis(100));
    let result = sender.handshake().await;

    assert!(matches!(
        result,
        Err(FrameStreamError::Timeout("ACCEPT read"))
    ));
}

#[tokio::test]
async fn test_sender_reports_closed_connection() {
    let (client, server) = tokio::io::duplex(4096);

    let peer = tokio::spawn(async move {
        let mut framed = Framed::new(server, FrameStreamCodec::new());
        let _ = framed.next().await;
    });

    let mut sender = FrameStreamSender::new(client, CT, TIMEOUT);
    let result = sender.handshake().await;
    peer.await.unwrap();

    assert!(matches!(result, Err(FrameStreamError::ConnectionClosed)));
}

#[tokio::test]
async fn test_receiver_rejects_data_before_start() {
    let (client, server) = tokio::io::duplex(4096);

    let peer = tokio::spawn(async move {
        let mut framed = Framed::new(client, FrameStreamCodec::new());
        framed
            .send(Frame::Control(ControlFrame::with_content_type(
                ControlType::Ready,
                Bytes::from_static(CT.as_bytes()),
            )))
            .await
            .unwrap();
        let accept = framed.next().await.unwrap().unwrap();
        assert!(matches!(accept, Frame::Control(ref c) if c.kind == ControlType::Accept));
        framed
            .send(Frame::Data(Bytes::from_static(b"early")))
            .await
            .unwrap();
        framed
    });

    let mut receiver = FrameStreamReceiver::new(server, CT, TIMEOUT);
    let result = receiver.handshake().await;

    assert!(matches!(
        result,
        Err(FrameStreamError::UnexpectedData(ControlType::Start))
    ));
    drop(peer.await.unwrap());
}
