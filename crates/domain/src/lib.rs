//! dnstap-relay Domain Layer
pub mod config;
pub mod destination;
pub mod dns_message;
pub mod errors;

pub use config::{
    CliOverrides, CollectorConfig, Config, ConfigError, DnstapConfig, LogFormat, LoggingConfig,
    OutputKind, SyslogConfig, SyslogFacility, SyslogSeverity, SyslogTransport,
};
pub use destination::Destination;
pub use dns_message::{DnsMessage, MessageKind};
pub use errors::DomainError;
