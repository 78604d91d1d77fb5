use dnstap_relay_domain::{DnsMessage, MessageKind};
use dnstap_relay_infrastructure::dnstap::DnstapSettings;
use std::time::Duration;

pub const TEST_IDENTITY: &str = "test-relay";
pub const BASE_PORT: u32 = 10_000;

/// Client query whose query port encodes `i`, so frames can be matched back
/// to the record that produced them.
pub fn sample_message(i: u32) -> DnsMessage {
    DnsMessage {
        kind: MessageKind::Query,
        operation: "CLIENT_QUERY".to_string(),
        family: "INET".to_string(),
        protocol: "UDP".to_string(),
        time_sec: 1_700_000_000 + u64::from(i),
        time_nsec: 500,
        query_ip: "192.0.2.10".to_string(),
        query_port: (BASE_PORT + i).to_string(),
        response_ip: "192.0.2.53".to_string(),
        response_port: "53".to_string(),
        payload: i.to_be_bytes().to_vec(),
    }
}

pub fn sample_response(i: u32) -> DnsMessage {
    DnsMessage {
        kind: MessageKind::Response,
        operation: "CLIENT_RESPONSE".to_string(),
        family: "INET6".to_string(),
        protocol: "TCP".to_string(),
        query_ip: "2001:db8::10".to_string(),
        response_ip: "2001:db8::53".to_string(),
        ..sample_message(i)
    }
}

pub fn test_settings(retry_delay: Duration) -> DnstapSettings {
    DnstapSettings {
        identity: TEST_IDENTITY.to_string(),
        retry_delay,
        io_timeout: Duration::from_secs(2),
    }
}
