use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Where a forwarder delivers its frames: a local stream socket or a remote
/// host reached over TCP.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Destination {
    Unix(PathBuf),
    Tcp { host: Arc<str>, port: u16 },
}

impl Destination {
    pub fn unix(path: impl Into<PathBuf>) -> Self {
        Destination::Unix(path.into())
    }

    pub fn tcp(host: impl Into<Arc<str>>, port: u16) -> Self {
        Destination::Tcp {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Unix(path) => write!(f, "unix://{}", path.display()),
            Destination::Tcp { host, port } if host.contains(':') => {
                write!(f, "[{}]:{}", host, port)
            }
            Destination::Tcp { host, port } => write!(f, "{}:{}", host, port),
        }
    }
}
