//! Syslog output: one text line per record over the local socket, UDP or
//! TCP.

mod format;
mod forwarder;
mod writer;

pub use format::{SyslogFormatter, DEFAULT_TAG};
pub use forwarder::SyslogForwarder;
pub use writer::SyslogWriter;

pub const OUTPUT_NAME: &str = "syslog";
