use async_trait::async_trait;
use dnstap_relay_domain::{Destination, DomainError};
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tracing::debug;

/// Byte stream a forwarder can run a Frame Streams session over.
pub trait FrameStream: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T> FrameStream for T where T: AsyncRead + AsyncWrite + Unpin + Send {}

pub type BoxedStream = Box<dyn FrameStream>;

/// Opens one fresh connection to the collector per call.
#[async_trait]
pub trait Dialer: Send + Sync {
    async fn dial(&self) -> Result<BoxedStream, DomainError>;

    fn describe(&self) -> String;
}

/// Dials the configured [`Destination`], bounding each attempt by `timeout`.
#[derive(Debug, Clone)]
pub struct SocketDialer {
    destination: Destination,
    timeout: Duration,
}

impl SocketDialer {
    pub fn new(destination: Destination, timeout: Duration) -> Self {
        Self {
            destination,
            timeout,
        }
    }

    async fn connect_tcp(&self, host: &str, port: u16) -> Result<TcpStream, DomainError> {
        let stream = tokio::time::timeout(self.timeout, TcpStream::connect((host, port)))
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: self.destination.to_string(),
            })?
            .map_err(|e| DomainError::TransportConnect {
                server: self.destination.to_string(),
                reason: e.to_string(),
            })?;

        stream
            .set_nodelay(true)
            .map_err(|e| DomainError::TransportConnect {
                server: self.destination.to_string(),
                reason: format!("failed to set TCP_NODELAY: {}", e),
            })?;

        Ok(stream)
    }

    #[cfg(unix)]
    async fn connect_unix(&self, path: &Path) -> Result<BoxedStream, DomainError> {
        let stream = tokio::time::timeout(self.timeout, tokio::net::UnixStream::connect(path))
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: self.destination.to_string(),
            })?
            .map_err(|e| DomainError::TransportConnect {
                server: self.destination.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Box::new(stream))
    }

    #[cfg(not(unix))]
    async fn connect_unix(&self, _path: &Path) -> Result<BoxedStream, DomainError> {
        Err(DomainError::UnsupportedTransport(
            "unix sockets are not available on this platform".to_string(),
        ))
    }
}

#[async_trait]
impl Dialer for SocketDialer {
    async fn dial(&self) -> Result<BoxedStream, DomainError> {
        debug!(destination = %self.destination, "Dialing collector");

        match &self.destination {
            Destination::Unix(path) => self.connect_unix(path).await,
            Destination::Tcp { host, port } => {
                let stream = self.connect_tcp(host, *port).await?;
                Ok(Box::new(stream))
            }
        }
    }

    fn describe(&self) -> String {
        self.destination.to_string()
    }
}
