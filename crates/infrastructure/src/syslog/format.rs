use chrono::{DateTime, Local, SecondsFormat, TimeZone};
use dnstap_relay_domain::{ConfigError, SyslogConfig};
use std::fmt::Display;

pub const DEFAULT_TAG: &str = "dnstap-relay";

/// Builds syslog lines in the two header layouts daemons expect: the short
/// BSD form on the local socket and an RFC 3339 timestamp with hostname when
/// talking to a remote daemon.
#[derive(Debug, Clone)]
pub struct SyslogFormatter {
    priority: u8,
    hostname: String,
    tag: String,
    pid: u32,
}

impl SyslogFormatter {
    pub fn new(priority: u8, hostname: impl Into<String>, tag: impl Into<String>, pid: u32) -> Self {
        Self {
            priority,
            hostname: hostname.into(),
            tag: tag.into(),
            pid,
        }
    }

    pub fn from_config(config: &SyslogConfig) -> Result<Self, ConfigError> {
        let hostname = hostname::get()
            .ok()
            .map(|name| name.to_string_lossy().into_owned())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "localhost".to_string());

        Ok(Self::new(
            config.priority()?,
            hostname,
            DEFAULT_TAG,
            std::process::id(),
        ))
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }

    pub fn format(&self, local: bool, msg: &str) -> String {
        let now = Local::now();
        if local {
            self.format_local(&now, msg)
        } else {
            self.format_remote(&now, msg)
        }
    }

    /// `<PRI>Mmm dd hh:mm:ss tag[pid]: msg`
    pub fn format_local<Tz>(&self, now: &DateTime<Tz>, msg: &str) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        format!(
            "<{}>{} {}[{}]: {}",
            self.priority,
            now.format("%b %e %H:%M:%S"),
            self.tag,
            self.pid,
            msg
        )
    }

    /// `<PRI>rfc3339 hostname tag[pid]: msg`
    pub fn format_remote<Tz>(&self, now: &DateTime<Tz>, msg: &str) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        format!(
            "<{}>{} {} {}[{}]: {}",
            self.priority,
            now.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.hostname,
            self.tag,
            self.pid,
            msg
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn formatter() -> SyslogFormatter {
        SyslogFormatter::new(30, "ns1", "dnstap-relay", 4242)
    }

    #[test]
    fn test_local_layout_pads_day() {
        let now = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 1).unwrap();
        assert_eq!(
            formatter().format_local(&now, "hello"),
            "<30>Mar  7 09:05:01 dnstap-relay[4242]: hello"
        );
    }

    #[test]
    fn test_remote_layout_has_hostname() {
        let now = Utc.with_ymd_and_hms(2024, 3, 17, 9, 5, 1).unwrap();
        assert_eq!(
            formatter().format_remote(&now, "hello"),
            "<30>2024-03-17T09:05:01Z ns1 dnstap-relay[4242]: hello"
        );
    }

    #[test]
    fn test_from_config_uses_facility_and_severity() {
        let config = SyslogConfig {
            severity: "WARNING".to_string(),
            facility: "LOCAL3".to_string(),
            ..Default::default()
        };
        let formatter = SyslogFormatter::from_config(&config).unwrap();
        assert_eq!(formatter.priority(), (19 << 3) | 4);
    }
}
