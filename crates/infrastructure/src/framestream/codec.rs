use super::error::FrameStreamError;
use super::frame::{ControlFrame, ControlType, Frame};
use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

const CONTROL_ESCAPE: u32 = 0;
const FIELD_CONTENT_TYPE: u32 = 0x01;

pub const MAX_CONTROL_FRAME_SIZE: usize = 512;
pub const MAX_CONTENT_TYPE_SIZE: usize = 256;
pub const DEFAULT_MAX_FRAME_SIZE: usize = 1 << 20;

/// Frame Streams wire codec.
///
/// A data frame is a big-endian `u32` length followed by the payload. A
/// length of zero escapes a control frame: `u32` body length, `u32` control
/// type, then `(field type, length, bytes)` content-type fields.
#[derive(Debug, Clone)]
pub struct FrameStreamCodec {
    max_frame_size: usize,
}

impl FrameStreamCodec {
    pub fn new() -> Self {
        Self {
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }

    pub fn with_max_frame_size(max_frame_size: usize) -> Self {
        Self { max_frame_size }
    }

    fn decode_control(mut body: BytesMut) -> Result<ControlFrame, FrameStreamError> {
        let code = body.get_u32();
        let kind =
            ControlType::from_code(code).ok_or(FrameStreamError::UnknownControlType(code))?;

        let mut content_types = Vec::new();
        while body.has_remaining() {
            if body.remaining() < 8 {
                return Err(FrameStreamError::MalformedControl(
                    "truncated control field header".to_string(),
                ));
            }
            let field = body.get_u32();
            let len = body.get_u32() as usize;
            if len > body.remaining() {
                return Err(FrameStreamError::MalformedControl(format!(
                    "control field of {} bytes overruns frame",
                    len
                )));
            }
            if field != FIELD_CONTENT_TYPE {
                return Err(FrameStreamError::MalformedControl(format!(
                    "unknown control field type {:#x}",
                    field
                )));
            }
            if len > MAX_CONTENT_TYPE_SIZE {
                return Err(FrameStreamError::ContentTypeTooLarge(len));
            }
            content_types.push(body.split_to(len).freeze());
        }

        Ok(ControlFrame {
            kind,
            content_types,
        })
    }
}

impl Default for FrameStreamCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for FrameStreamCodec {
    type Item = Frame;
    type Error = FrameStreamError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Frame>, FrameStreamError> {
        if src.len() < 4 {
            return Ok(None);
        }

        let len = (&src[..4]).get_u32();
        if len != CONTROL_ESCAPE {
            let len = len as usize;
            if len > self.max_frame_size {
                return Err(FrameStreamError::FrameTooLarge {
                    size: len,
                    max: self.max_frame_size,
                });
            }
            if src.len() < 4 + len {
                src.reserve(4 + len - src.len());
                return Ok(None);
            }
            src.advance(4);
            return Ok(Some(Frame::Data(src.split_to(len).freeze())));
        }

        if src.len() < 8 {
            return Ok(None);
        }
        let body_len = (&src[4..8]).get_u32() as usize;
        if body_len > MAX_CONTROL_FRAME_SIZE {
            return Err(FrameStreamError::ControlFrameTooLarge(body_len));
        }
        if body_len < 4 {
            return Err(FrameStreamError::MalformedControl(format!(
                "control frame of {} bytes has no type",
                body_len
            )));
        }
        if src.len() < 8 + body_len {
            src.reserve(8 + body_len - src.len());
            return Ok(None);
        }

        src.advance(8);
        let body = src.split_to(body_len);
        Self::decode_control(body).map(|control| Some(Frame::Control(control)))
    }
}

impl Encoder<Frame> for FrameStreamCodec {
    type Error = FrameStreamError;

    fn encode(&mut self, frame: Frame, dst: &mut BytesMut) -> Result<(), FrameStreamError> {
        match frame {
            Frame::Data(payload) => {
                if payload.is_empty() {
                    return Err(FrameStreamError::EmptyDataFrame);
                }
                if payload.len() > self.max_frame_size {
                    return Err(FrameStreamError::FrameTooLarge {
                        size: payload.len(),
                        max: self.max_frame_size,
                    });
                }
                dst.reserve(4 + payload.len());
                dst.put_u32(payload.len() as u32);
                dst.extend_from_slice(&payload);
            }
            Frame::Control(control) => {
                if let Some(ct) = control
                    .content_types
                    .iter()
                    .find(|ct| ct.len() > MAX_CONTENT_TYPE_SIZE)
                {
                    return Err(FrameStreamError::ContentTypeTooLarge(ct.len()));
                }
                let body_len = control.body_len();
                if body_len > MAX_CONTROL_FRAME_SIZE {
                    return Err(FrameStreamError::ControlFrameTooLarge(body_len));
                }

                dst.reserve(8 + body_len);
                dst.put_u32(CONTROL_ESCAPE);
                dst.put_u32(body_len as u32);
                dst.put_u32(control.kind.code());
                for ct in &control.content_types {
                    dst.put_u32(FIELD_CONTENT_TYPE);
                    dst.put_u32(ct.len() as u32);
                    dst.extend_from_slice(ct);
                }
            }
        }
        Ok(())
    }
}
