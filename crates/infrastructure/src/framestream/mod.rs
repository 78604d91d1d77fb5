//! Frame Streams: the length-framed transport that carries dnstap payloads.
//!
//! Sessions are bidirectional. The sender announces a content type with
//! READY, the receiver answers ACCEPT, and START opens the data phase. STOP
//! and FINISH close it again.

mod codec;
mod error;
mod exchange;
mod frame;
mod receiver;
mod sender;

pub use codec::{
    FrameStreamCodec, DEFAULT_MAX_FRAME_SIZE, MAX_CONTENT_TYPE_SIZE, MAX_CONTROL_FRAME_SIZE,
};
pub use error::FrameStreamError;
pub use frame::{ControlFrame, ControlType, Frame};
pub use receiver::FrameStreamReceiver;
pub use sender::FrameStreamSender;
