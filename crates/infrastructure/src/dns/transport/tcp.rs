use super::resolver::resolve_all;
use super::DnsTransport;
use bytes::Bytes;
use async_trait::async_trait;
use dnsgate_domain::{DomainError, UpstreamAddr};
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

const MAX_TCP_MESSAGE_SIZE: usize = 65535;

/// DNS over TCP (RFC 1035 §4.2.2): one fresh connection per query, each
/// message framed with a 2-byte big-endian length.
pub struct TcpTransport {
    upstream_addr: UpstreamAddr,
    connect_timeout: Duration,
}

impl TcpTransport {
    pub fn new(upstream_addr: UpstreamAddr, connect_timeout: Duration) -> Self {
        Self {
            upstream_addr,
            connect_timeout,
        }
    }

    pub fn upstream(&self) -> &UpstreamAddr {
        &self.upstream_addr
    }

    /// Hostname resolution and the connect attempts share one deadline.
    async fn connect(&self) -> Result<TcpStream, DomainError> {
        tokio::time::timeout(self.connect_timeout, self.connect_any())
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: self.upstream_addr.to_string(),
            })?
    }

    async fn connect_any(&self) -> Result<TcpStream, DomainError> {
        let candidates = match &self.upstream_addr {
            UpstreamAddr::Resolved(addr) => vec![*addr],
            UpstreamAddr::Unresolved { hostname, port } => resolve_all(hostname, *port).await?,
        };

        let mut last_error: Option<(SocketAddr, io::Error)> = None;

        for addr in candidates {
            match TcpStream::connect(addr).await {
                Ok(stream) => {
                    stream.set_nodelay(true).map_err(|e| DomainError::TransportIo {
                        server: addr.to_string(),
                        message: format!("failed to set TCP_NODELAY: {}", e),
                    })?;
                    return Ok(stream);
                }
                Err(e) => {
                    debug!(server = %addr, error = %e, "TCP connect failed");
                    last_error = Some((addr, e));
                }
            }
        }

        Err(match last_error {
            Some((addr, e)) if e.kind() == io::ErrorKind::ConnectionRefused => {
                DomainError::TransportConnectionRefused {
                    server: addr.to_string(),
                }
            }
            Some((addr, e)) => DomainError::TransportIo {
                server: addr.to_string(),
                message: e.to_string(),
            },
            None => DomainError::TransportIo {
                server: self.upstream_addr.to_string(),
                message: "no address to connect to".to_string(),
            },
        })
    }
}

#[async_trait]
impl DnsTransport for TcpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<Bytes, DomainError> {
        let mut stream = self.connect().await?;
        let server = self.upstream_addr.to_string();

        tokio::time::timeout(timeout, send_with_length_prefix(&mut stream, message_bytes))
            .await
            .map_err(|_| DomainError::QueryTimeout)?
            .map_err(|e| io_error(&server, e))?;

        debug!(
            server = %server,
            message_len = message_bytes.len(),
            "TCP query sent"
        );

        let response_bytes = tokio::time::timeout(timeout, read_with_length_prefix(&mut stream))
            .await
            .map_err(|_| DomainError::QueryTimeout)?
            .map_err(|e| io_error(&server, e))?;

        debug!(
            server = %server,
            response_len = response_bytes.len(),
            "TCP response received"
        );

        Ok(Bytes::from(response_bytes))
    }
}

fn io_error(server: &str, e: io::Error) -> DomainError {
    DomainError::TransportIo {
        server: server.to_string(),
        message: e.to_string(),
    }
}

pub(crate) async fn send_with_length_prefix<S>(
    stream: &mut S,
    message_bytes: &[u8],
) -> io::Result<()>
where
    S: AsyncWriteExt + Unpin,
{
    let length = u16::try_from(message_bytes.len()).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("DNS message too large: {} bytes", message_bytes.len()),
        )
    })?;

    stream.write_all(&length.to_be_bytes()).await?;
    stream.write_all(message_bytes).await?;
    stream.flush().await
}

pub(crate) async fn read_with_length_prefix<S>(stream: &mut S) -> io::Result<Vec<u8>>
where
    S: AsyncReadExt + Unpin,
{
    let mut len_buf = [0u8; 2];
    stream.read_exact(&mut len_buf).await?;

    let response_len = u16::from_be_bytes(len_buf) as usize;
    if response_len == 0 || response_len > MAX_TCP_MESSAGE_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("invalid response length: {} bytes", response_len),
        ));
    }

    let mut response = vec![0u8; response_len];
    stream.read_exact(&mut response).await?;

    Ok(response)
}
