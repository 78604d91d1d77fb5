pub mod dnstap;
pub mod framestream;
pub mod output;
pub mod syslog;
