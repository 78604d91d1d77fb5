use dnstap_relay_domain::{DomainError, SyslogConfig, SyslogTransport};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpStream, UdpSocket};
use tracing::debug;

#[cfg(unix)]
use std::path::Path;
#[cfg(unix)]
use tokio::net::UnixDatagram;

#[cfg(unix)]
const LOCAL_SOCKET_PATHS: &[&str] = &["/dev/log", "/var/run/syslog", "/var/run/log"];

/// Connection to a syslog daemon. One call to `write_line` is one message.
#[derive(Debug)]
pub enum SyslogWriter {
    #[cfg(unix)]
    Local(UnixDatagram),
    Udp(UdpSocket),
    Tcp {
        stream: TcpStream,
        timeout: Duration,
    },
}

impl SyslogWriter {
    pub async fn connect(config: &SyslogConfig, timeout: Duration) -> Result<Self, DomainError> {
        let transport = config
            .transport()
            .map_err(|e| DomainError::ConfigError(e.to_string()))?;

        match transport {
            SyslogTransport::Local => Self::connect_local(),
            SyslogTransport::Udp => Self::connect_udp(&config.remote_address).await,
            SyslogTransport::Tcp => Self::connect_tcp(&config.remote_address, timeout).await,
        }
    }

    #[cfg(unix)]
    pub fn connect_local() -> Result<Self, DomainError> {
        let mut last_error = None;
        for path in LOCAL_SOCKET_PATHS {
            match Self::connect_local_at(Path::new(path)) {
                Ok(writer) => return Ok(writer),
                Err(e) => {
                    debug!(path, error = %e, "Syslog socket unavailable");
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| {
            DomainError::TransportConnect {
                server: "local syslog".to_string(),
                reason: "no syslog socket found".to_string(),
            }
        }))
    }

    #[cfg(not(unix))]
    pub fn connect_local() -> Result<Self, DomainError> {
        Err(DomainError::UnsupportedTransport(
            "local syslog is only available on unix".to_string(),
        ))
    }

    #[cfg(unix)]
    pub fn connect_local_at(path: &Path) -> Result<Self, DomainError> {
        let connect_error = |e: std::io::Error| DomainError::TransportConnect {
            server: format!("unix://{}", path.display()),
            reason: e.to_string(),
        };

        let socket = UnixDatagram::unbound().map_err(connect_error)?;
        socket.connect(path).map_err(connect_error)?;
        Ok(SyslogWriter::Local(socket))
    }

    pub async fn connect_udp(address: &str) -> Result<Self, DomainError> {
        let connect_error = |e: std::io::Error| DomainError::TransportConnect {
            server: address.to_string(),
            reason: e.to_string(),
        };

        let target = tokio::net::lookup_host(address)
            .await
            .map_err(connect_error)?
            .next()
            .ok_or_else(|| DomainError::TransportConnect {
                server: address.to_string(),
                reason: "address did not resolve".to_string(),
            })?;

        let bind_addr = if target.is_ipv4() {
            "0.0.0.0:0"
        } else {
            "[::]:0"
        };
        let socket = UdpSocket::bind(bind_addr).await.map_err(connect_error)?;
        socket.connect(target).await.map_err(connect_error)?;
        Ok(SyslogWriter::Udp(socket))
    }

    pub async fn connect_tcp(address: &str, timeout: Duration) -> Result<Self, DomainError> {
        let stream = tokio::time::timeout(timeout, TcpStream::connect(address))
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: address.to_string(),
            })?
            .map_err(|e| DomainError::TransportConnect {
                server: address.to_string(),
                reason: e.to_string(),
            })?;

        Ok(SyslogWriter::Tcp { stream, timeout })
    }

    pub fn transport(&self) -> SyslogTransport {
        match self {
            #[cfg(unix)]
            SyslogWriter::Local(_) => SyslogTransport::Local,
            SyslogWriter::Udp(_) => SyslogTransport::Udp,
            SyslogWriter::Tcp { .. } => SyslogTransport::Tcp,
        }
    }

    pub fn is_local(&self) -> bool {
        self.transport() == SyslogTransport::Local
    }

    /// Stream transports are newline-delimited; datagram ones send the line
    /// as-is.
    pub async fn write_line(&mut self, line: &str) -> Result<(), DomainError> {
        let io_error = |e: std::io::Error| DomainError::IoError(e.to_string());

        match self {
            #[cfg(unix)]
            SyslogWriter::Local(socket) => {
                socket.send(line.as_bytes()).await.map_err(io_error)?;
            }
            SyslogWriter::Udp(socket) => {
                socket.send(line.as_bytes()).await.map_err(io_error)?;
            }
            SyslogWriter::Tcp { stream, timeout } => {
                let mut buf = Vec::with_capacity(line.len() + 1);
                buf.extend_from_slice(line.as_bytes());
                if !line.ends_with('\n') {
                    buf.push(b'\n');
                }
                tokio::time::timeout(*timeout, stream.write_all(&buf))
                    .await
                    .map_err(|_| DomainError::IoError("syslog write timed out".to_string()))?
                    .map_err(io_error)?;
            }
        }

        Ok(())
    }

    pub async fn close(self) {
        if let SyslogWriter::Tcp { mut stream, .. } = self {
            let _ = stream.shutdown().await;
        }
    }
}
