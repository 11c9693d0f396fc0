pub mod resolver;
pub mod tcp;

use async_trait::async_trait;
use bytes::Bytes;
use dnsgate_domain::DomainError;
use std::time::Duration;

pub use tcp::TcpTransport;

/// Carries one serialized query to an upstream and returns the raw reply.
#[async_trait]
pub trait DnsTransport: Send + Sync {
    /// `timeout` bounds writing the query and reading the reply.
    async fn send(&self, message_bytes: &[u8], timeout: Duration) -> Result<Bytes, DomainError>;
}
