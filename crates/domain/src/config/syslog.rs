use super::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyslogConfig {
    #[serde(default = "default_severity")]
    pub severity: String,

    #[serde(default = "default_facility")]
    pub facility: String,

    /// `local`, `udp` or `tcp`
    #[serde(default = "default_transport")]
    pub transport: String,

    /// `host:port`, ignored for the local transport
    #[serde(default = "default_remote_address")]
    pub remote_address: String,
}

impl Default for SyslogConfig {
    fn default() -> Self {
        Self {
            severity: default_severity(),
            facility: default_facility(),
            transport: default_transport(),
            remote_address: default_remote_address(),
        }
    }
}

impl SyslogConfig {
    pub fn severity(&self) -> Result<SyslogSeverity, ConfigError> {
        self.severity.parse()
    }

    pub fn facility(&self) -> Result<SyslogFacility, ConfigError> {
        self.facility.parse()
    }

    pub fn transport(&self) -> Result<SyslogTransport, ConfigError> {
        self.transport.parse()
    }

    /// PRI value: facility code combined with severity.
    pub fn priority(&self) -> Result<u8, ConfigError> {
        Ok(self.facility()?.code() | self.severity()?.code())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.priority()?;
        if self.transport()? != SyslogTransport::Local && self.remote_address.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "syslog transport '{}' requires remote_address",
                self.transport
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyslogSeverity {
    Emergency,
    Alert,
    Critical,
    Error,
    Warning,
    Notice,
    Info,
    Debug,
}

impl SyslogSeverity {
    pub fn code(&self) -> u8 {
        match self {
            Self::Emergency => 0,
            Self::Alert => 1,
            Self::Critical => 2,
            Self::Error => 3,
            Self::Warning => 4,
            Self::Notice => 5,
            Self::Info => 6,
            Self::Debug => 7,
        }
    }
}

impl FromStr for SyslogSeverity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EMERG" | "EMERGENCY" => Ok(Self::Emergency),
            "ALERT" => Ok(Self::Alert),
            "CRIT" | "CRITICAL" => Ok(Self::Critical),
            "ERR" | "ERROR" => Ok(Self::Error),
            "WARNING" | "WARN" => Ok(Self::Warning),
            "NOTICE" => Ok(Self::Notice),
            "INFO" => Ok(Self::Info),
            "DEBUG" => Ok(Self::Debug),
            _ => Err(ConfigError::Validation(format!(
                "invalid syslog severity: {}",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyslogFacility {
    Kern,
    User,
    Daemon,
    Local(u8),
}

impl SyslogFacility {
    /// Facility number shifted into PRI position.
    pub fn code(&self) -> u8 {
        let number = match self {
            Self::Kern => 0,
            Self::User => 1,
            Self::Daemon => 3,
            Self::Local(n) => 16 + n,
        };
        number << 3
    }
}

impl FromStr for SyslogFacility {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        match upper.as_str() {
            "KERN" => Ok(Self::Kern),
            "USER" => Ok(Self::User),
            "DAEMON" => Ok(Self::Daemon),
            other => other
                .strip_prefix("LOCAL")
                .and_then(|n| n.parse::<u8>().ok())
                .filter(|n| *n <= 7)
                .map(Self::Local)
                .ok_or_else(|| {
                    ConfigError::Validation(format!("invalid syslog facility: {}", s))
                }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyslogTransport {
    Local,
    Udp,
    Tcp,
}

impl SyslogTransport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Udp => "udp",
            Self::Tcp => "tcp",
        }
    }
}

impl fmt::Display for SyslogTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyslogTransport {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "udp" => Ok(Self::Udp),
            "tcp" => Ok(Self::Tcp),
            _ => Err(ConfigError::Validation(format!(
                "invalid syslog transport: {}",
                s
            ))),
        }
    }
}

fn default_severity() -> String {
    "INFO".to_string()
}

fn default_facility() -> String {
    "DAEMON".to_string()
}

fn default_transport() -> String {
    "local".to_string()
}

fn default_remote_address() -> String {
    "127.0.0.1:514".to_string()
}
