use super::schema::{MessageType, SocketFamily, SocketProtocol};
use rustc_hash::FxHashMap;
use std::sync::LazyLock;

/// Symbolic dnstap enum names and their wire values.
#[derive(Debug)]
pub struct NameTable {
    values: FxHashMap<&'static str, i32>,
}

impl NameTable {
    fn new(entries: &[(&'static str, i32)]) -> Self {
        let values = entries.iter().copied().collect();
        Self { values }
    }

    /// Wire value for `name`, or 0 when the name is unknown.
    pub fn resolve(&self, name: &str) -> i32 {
        self.values.get(name).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

const MESSAGE_TYPE_ENTRIES: &[(&str, i32)] = &[
    ("AUTH_QUERY", MessageType::AuthQuery as i32),
    ("AUTH_RESPONSE", MessageType::AuthResponse as i32),
    ("RESOLVER_QUERY", MessageType::ResolverQuery as i32),
    ("RESOLVER_RESPONSE", MessageType::ResolverResponse as i32),
    ("CLIENT_QUERY", MessageType::ClientQuery as i32),
    ("CLIENT_RESPONSE", MessageType::ClientResponse as i32),
    ("FORWARDER_QUERY", MessageType::ForwarderQuery as i32),
    ("FORWARDER_RESPONSE", MessageType::ForwarderResponse as i32),
    ("STUB_QUERY", MessageType::StubQuery as i32),
    ("STUB_RESPONSE", MessageType::StubResponse as i32),
    ("TOOL_QUERY", MessageType::ToolQuery as i32),
    ("TOOL_RESPONSE", MessageType::ToolResponse as i32),
    ("UPDATE_QUERY", MessageType::UpdateQuery as i32),
    ("UPDATE_RESPONSE", MessageType::UpdateResponse as i32),
];

const SOCKET_FAMILY_ENTRIES: &[(&str, i32)] = &[
    ("INET", SocketFamily::Inet as i32),
    ("INET6", SocketFamily::Inet6 as i32),
];

const SOCKET_PROTOCOL_ENTRIES: &[(&str, i32)] = &[
    ("UDP", SocketProtocol::Udp as i32),
    ("TCP", SocketProtocol::Tcp as i32),
    ("DOT", SocketProtocol::Dot as i32),
    ("DOH", SocketProtocol::Doh as i32),
    ("DNSCryptUDP", SocketProtocol::DnsCryptUdp as i32),
    ("DNSCryptTCP", SocketProtocol::DnsCryptTcp as i32),
    ("DOQ", SocketProtocol::Doq as i32),
];

pub static MESSAGE_TYPES: LazyLock<NameTable> =
    LazyLock::new(|| NameTable::new(MESSAGE_TYPE_ENTRIES));

pub static SOCKET_FAMILIES: LazyLock<NameTable> =
    LazyLock::new(|| NameTable::new(SOCKET_FAMILY_ENTRIES));

pub static SOCKET_PROTOCOLS: LazyLock<NameTable> =
    LazyLock::new(|| NameTable::new(SOCKET_PROTOCOL_ENTRIES));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_cover_every_variant() {
        assert_eq!(MESSAGE_TYPES.len(), 14);
        assert_eq!(SOCKET_FAMILIES.len(), 2);
        assert_eq!(SOCKET_PROTOCOLS.len(), 7);
    }

    #[test]
    fn test_resolve_is_case_sensitive() {
        assert_eq!(SOCKET_PROTOCOLS.resolve("DNSCryptUDP"), 5);
        assert_eq!(SOCKET_PROTOCOLS.resolve("udp"), 0);
        assert_eq!(MESSAGE_TYPES.resolve("client_query"), 0);
    }

    #[test]
    fn test_resolve_known_names() {
        assert_eq!(MESSAGE_TYPES.resolve("FORWARDER_RESPONSE"), 8);
        assert_eq!(SOCKET_FAMILIES.resolve("INET6"), 2);
    }
}
