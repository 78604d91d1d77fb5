use chrono::{DateTime, SecondsFormat};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Query,
    Response,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Query => "query",
            MessageKind::Response => "response",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One DNS query or response observed upstream.
///
/// `operation`, `family` and `protocol` hold the symbolic dnstap names
/// (`CLIENT_QUERY`, `INET6`, `UDP`, ...). Ports are kept as the decimal
/// strings produced by the collectors and are only validated when a record is
/// encoded for the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsMessage {
    pub kind: MessageKind,
    pub operation: String,
    pub family: String,
    pub protocol: String,
    pub time_sec: u64,
    #[serde(default)]
    pub time_nsec: u32,
    pub query_ip: String,
    pub query_port: String,
    pub response_ip: String,
    pub response_port: String,
    #[serde(default)]
    pub payload: Vec<u8>,
}

impl DnsMessage {
    pub fn timestamp_rfc3339(&self) -> Option<String> {
        let secs = i64::try_from(self.time_sec).ok()?;
        DateTime::from_timestamp(secs, self.time_nsec)
            .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Nanos, true))
    }

    /// Single-line rendering used by line-oriented outputs.
    pub fn to_text_line(&self) -> String {
        format!(
            "{} {} {}:{} {} {} {} {}b",
            self.timestamp_rfc3339().as_deref().unwrap_or("-"),
            self.operation,
            self.query_ip,
            self.query_port,
            self.family,
            self.protocol,
            self.kind,
            self.payload.len()
        )
    }
}
