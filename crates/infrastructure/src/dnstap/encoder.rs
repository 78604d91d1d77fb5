use super::names::{MESSAGE_TYPES, SOCKET_FAMILIES, SOCKET_PROTOCOLS};
use super::schema::{Dnstap, DnstapType, Message};
use bytes::{Bytes, BytesMut};
use dnstap_relay_domain::{DnsMessage, DomainError, MessageKind};
use prost::Message as ProstMessage;
use std::net::IpAddr;

pub const DNSTAP_VERSION: &str = concat!("dnstap-relay ", env!("CARGO_PKG_VERSION"));

/// Turns records into serialized dnstap payloads, one per data frame.
#[derive(Debug, Clone)]
pub struct DnstapEncoder {
    identity: Vec<u8>,
}

impl DnstapEncoder {
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into().into_bytes(),
        }
    }

    pub fn to_dnstap(&self, record: &DnsMessage) -> Result<Dnstap, DomainError> {
        let query_port = parse_port("query_port", &record.query_port)?;
        let response_port = parse_port("response_port", &record.response_port)?;

        let mut message = Message {
            r#type: MESSAGE_TYPES.resolve(&record.operation),
            socket_family: Some(SOCKET_FAMILIES.resolve(&record.family)),
            socket_protocol: Some(SOCKET_PROTOCOLS.resolve(&record.protocol)),
            query_address: ip_bytes(&record.query_ip),
            response_address: ip_bytes(&record.response_ip),
            query_port: Some(query_port),
            response_port: Some(response_port),
            ..Default::default()
        };

        match record.kind {
            MessageKind::Query => {
                message.query_time_sec = Some(record.time_sec);
                message.query_time_nsec = Some(record.time_nsec);
                message.query_message = Some(record.payload.clone());
            }
            MessageKind::Response => {
                message.response_time_sec = Some(record.time_sec);
                message.response_time_nsec = Some(record.time_nsec);
                message.response_message = Some(record.payload.clone());
            }
        }

        Ok(Dnstap {
            identity: Some(self.identity.clone()),
            version: Some(DNSTAP_VERSION.as_bytes().to_vec()),
            extra: None,
            message: Some(message),
            r#type: DnstapType::Message as i32,
        })
    }

    pub fn encode(&self, record: &DnsMessage) -> Result<Bytes, DomainError> {
        let dnstap = self.to_dnstap(record)?;

        let mut buf = BytesMut::with_capacity(dnstap.encoded_len());
        dnstap
            .encode(&mut buf)
            .map_err(|e| DomainError::EncodeError(e.to_string()))?;

        Ok(buf.freeze())
    }
}

/// Parses one data frame payload back into the schema.
pub fn decode(frame: &[u8]) -> Result<Dnstap, DomainError> {
    Dnstap::decode(frame).map_err(|e| DomainError::DecodeError(e.to_string()))
}

fn parse_port(field: &'static str, value: &str) -> Result<u32, DomainError> {
    value.parse::<u32>().map_err(|_| DomainError::InvalidPort {
        field,
        value: value.to_string(),
    })
}

fn ip_bytes(text: &str) -> Option<Vec<u8>> {
    match text.parse::<IpAddr>().ok()? {
        IpAddr::V4(v4) => Some(v4.octets().to_vec()),
        IpAddr::V6(v6) => Some(v6.octets().to_vec()),
    }
}
