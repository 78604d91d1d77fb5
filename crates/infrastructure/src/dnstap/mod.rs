//! dnstap output: records are encoded as dnstap protobuf messages and
//! streamed to a collector over Frame Streams, reconnecting on failure.

mod connection;
mod encoder;
mod forwarder;
mod names;
pub mod schema;

pub use connection::{BoxedStream, Dialer, FrameStream, SocketDialer};
pub use encoder::{decode, DnstapEncoder, DNSTAP_VERSION};
pub use forwarder::{DnstapForwarder, DnstapSettings};
pub use names::{NameTable, MESSAGE_TYPES, SOCKET_FAMILIES, SOCKET_PROTOCOLS};

pub const CONTENT_TYPE: &str = "protobuf:dnstap.Dnstap";

pub const OUTPUT_NAME: &str = "dnstap";
