use super::errors::ConfigError;
use crate::destination::Destination;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DnstapConfig {
    /// Local stream socket of the collector. Mutually exclusive with
    /// `remote_address`/`remote_port`.
    #[serde(default)]
    pub sock_path: Option<String>,

    #[serde(default)]
    pub remote_address: Option<String>,

    #[serde(default)]
    pub remote_port: Option<u16>,

    /// Seconds to wait between connection attempts
    #[serde(default = "default_retry_interval")]
    pub retry_interval: u64,

    /// Seconds allowed for one dial, handshake or end-of-stream exchange
    #[serde(default = "default_io_timeout")]
    pub io_timeout: u64,
}

impl Default for DnstapConfig {
    fn default() -> Self {
        Self {
            sock_path: None,
            remote_address: Some(default_remote_address()),
            remote_port: Some(default_remote_port()),
            retry_interval: default_retry_interval(),
            io_timeout: default_io_timeout(),
        }
    }
}

impl DnstapConfig {
    /// Resolve the configured destination. Exactly one of the socket path or
    /// the remote address/port pair must be set.
    pub fn destination(&self) -> Result<Destination, ConfigError> {
        let sock_path = non_empty(&self.sock_path);
        let remote_address = non_empty(&self.remote_address);

        match (sock_path, remote_address, self.remote_port) {
            (Some(path), None, None) => Ok(Destination::unix(path)),
            (None, Some(host), Some(port)) => {
                if port == 0 {
                    return Err(ConfigError::Validation(
                        "dnstap remote_port cannot be 0".to_string(),
                    ));
                }
                Ok(Destination::tcp(host, port))
            }
            (None, Some(_), None) => Err(ConfigError::Validation(
                "dnstap remote_address is set but remote_port is missing".to_string(),
            )),
            (None, None, Some(_)) => Err(ConfigError::Validation(
                "dnstap remote_port is set but remote_address is missing".to_string(),
            )),
            (None, None, None) => Err(ConfigError::Validation(
                "dnstap needs either sock_path or remote_address/remote_port".to_string(),
            )),
            (Some(_), _, _) => Err(ConfigError::Validation(
                "dnstap sock_path and remote_address/remote_port are mutually exclusive"
                    .to_string(),
            )),
        }
    }

    /// Fill the default collector address and port unless a socket path is
    /// configured. Runs after a file or CLI layer so that partial sections
    /// keep the defaults for whatever they leave out.
    pub fn fill_destination_defaults(&mut self) {
        if non_empty(&self.sock_path).is_some() {
            return;
        }
        if self.remote_address.is_none() {
            self.remote_address = Some(default_remote_address());
        }
        if self.remote_port.is_none() {
            self.remote_port = Some(default_remote_port());
        }
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_interval)
    }

    pub fn io_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.io_timeout)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.destination()?;

        if self.retry_interval == 0 {
            return Err(ConfigError::Validation(
                "dnstap retry_interval must be at least 1 second".to_string(),
            ));
        }
        if self.io_timeout == 0 {
            return Err(ConfigError::Validation(
                "dnstap io_timeout must be at least 1 second".to_string(),
            ));
        }

        Ok(())
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn default_remote_address() -> String {
    "127.0.0.1".to_string()
}

fn default_remote_port() -> u16 {
    6000
}

fn default_retry_interval() -> u64 {
    5
}

fn default_io_timeout() -> u64 {
    5
}
