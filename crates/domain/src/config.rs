pub mod collector;
pub mod dnstap;
pub mod errors;
pub mod logging;
pub mod root;
pub mod syslog;

pub use collector::CollectorConfig;
pub use dnstap::DnstapConfig;
pub use errors::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use root::{CliOverrides, Config, OutputKind};
pub use syslog::{SyslogConfig, SyslogFacility, SyslogSeverity, SyslogTransport};
