mod dns_message_sink;

pub use dns_message_sink::DnsMessageSink;
