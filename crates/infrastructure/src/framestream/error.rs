use super::frame::ControlType;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrameStreamError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Frame of {size} bytes exceeds limit of {max} bytes")]
    FrameTooLarge { size: usize, max: usize },

    #[error("Control frame of {0} bytes exceeds limit")]
    ControlFrameTooLarge(usize),

    #[error("Content type of {0} bytes exceeds limit")]
    ContentTypeTooLarge(usize),

    #[error("Data frames cannot be empty")]
    EmptyDataFrame,

    #[error("Unknown control frame type {0:#x}")]
    UnknownControlType(u32),

    #[error("Malformed control frame: {0}")]
    MalformedControl(String),

    #[error("Expected {expected} control frame, got {got}")]
    UnexpectedControl {
        expected: ControlType,
        got: ControlType,
    },

    #[error("Expected {0} control frame, got a data frame")]
    UnexpectedData(ControlType),

    #[error("Peer does not accept content type {0}")]
    ContentTypeMismatch(String),

    #[error("Timed out during {0}")]
    Timeout(&'static str),

    #[error("Connection closed by peer")]
    ConnectionClosed,
}
