use bytes::Bytes;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlType {
    Accept,
    Start,
    Stop,
    Ready,
    Finish,
}

impl ControlType {
    pub fn code(&self) -> u32 {
        match self {
            Self::Accept => 0x01,
            Self::Start => 0x02,
            Self::Stop => 0x03,
            Self::Ready => 0x04,
            Self::Finish => 0x05,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0x01 => Some(Self::Accept),
            0x02 => Some(Self::Start),
            0x03 => Some(Self::Stop),
            0x04 => Some(Self::Ready),
            0x05 => Some(Self::Finish),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accept => "ACCEPT",
            Self::Start => "START",
            Self::Stop => "STOP",
            Self::Ready => "READY",
            Self::Finish => "FINISH",
        }
    }
}

impl fmt::Display for ControlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlFrame {
    pub kind: ControlType,
    pub content_types: Vec<Bytes>,
}

impl ControlFrame {
    pub fn new(kind: ControlType) -> Self {
        Self {
            kind,
            content_types: Vec::new(),
        }
    }

    pub fn with_content_type(kind: ControlType, content_type: impl Into<Bytes>) -> Self {
        Self {
            kind,
            content_types: vec![content_type.into()],
        }
    }

    pub fn has_content_type(&self, content_type: &[u8]) -> bool {
        self.content_types
            .iter()
            .any(|ct| ct.as_ref() == content_type)
    }

    /// Length of the control frame body: type word plus every field.
    pub fn body_len(&self) -> usize {
        4 + self
            .content_types
            .iter()
            .map(|ct| 8 + ct.len())
            .sum::<usize>()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Data(Bytes),
    Control(ControlFrame),
}
