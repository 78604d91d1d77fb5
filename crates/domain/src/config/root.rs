use serde::{Deserialize, Serialize};
use std::fmt;

use super::collector::CollectorConfig;
use super::dnstap::DnstapConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::syslog::SyslogConfig;

/// Main configuration structure for dnstap-relay
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Which output this instance drives
    #[serde(default)]
    pub output: OutputKind,

    /// Identity of this collector
    #[serde(default)]
    pub collector: CollectorConfig,

    /// Frame Streams / dnstap output
    #[serde(default)]
    pub dnstap: DnstapConfig,

    /// Syslog output
    #[serde(default)]
    pub syslog: SyslogConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    #[default]
    Dnstap,

    Syslog,
}

impl OutputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dnstap => "dnstap",
            Self::Syslog => "syslog",
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. dnstap-relay.toml in current directory
    /// 3. /etc/dnstap-relay/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if let Some(path) = Self::get_config_path() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    /// Parse configuration from a TOML document
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let mut config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.dnstap.fill_destination_defaults();
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    /// Apply command-line overrides to configuration
    ///
    /// A destination given on the command line replaces the one from the
    /// file instead of being merged with it.
    pub fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(output) = overrides.output {
            self.output = output;
        }
        if let Some(server_id) = overrides.server_id {
            self.collector.server_id = server_id;
        }

        let remote_given = overrides.remote_address.is_some() || overrides.remote_port.is_some();
        if let Some(path) = overrides.sock_path {
            self.dnstap.sock_path = Some(path);
            if !remote_given {
                self.dnstap.remote_address = None;
                self.dnstap.remote_port = None;
            }
        } else if remote_given {
            self.dnstap.sock_path = None;
        }
        if let Some(address) = overrides.remote_address {
            self.dnstap.remote_address = Some(address);
        }
        if let Some(port) = overrides.remote_port {
            self.dnstap.remote_port = Some(port);
        }
        self.dnstap.fill_destination_defaults();

        if let Some(retry) = overrides.retry_interval {
            self.dnstap.retry_interval = retry;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Validate configuration for the selected output
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::Validation(
                "logging level cannot be empty".to_string(),
            ));
        }

        match self.output {
            OutputKind::Dnstap => self.dnstap.validate(),
            OutputKind::Syslog => self.syslog.validate(),
        }
    }

    /// Get the path to the configuration file being used
    pub fn get_config_path() -> Option<String> {
        if std::path::Path::new("dnstap-relay.toml").exists() {
            Some("dnstap-relay.toml".to_string())
        } else if std::path::Path::new("/etc/dnstap-relay/config.toml").exists() {
            Some("/etc/dnstap-relay/config.toml".to_string())
        } else {
            None
        }
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub output: Option<OutputKind>,
    pub server_id: Option<String>,
    pub sock_path: Option<String>,
    pub remote_address: Option<String>,
    pub remote_port: Option<u16>,
    pub retry_interval: Option<u64>,
    pub log_level: Option<String>,
}
