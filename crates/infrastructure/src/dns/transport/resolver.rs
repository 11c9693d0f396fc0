use dnsgate_domain::DomainError;
use std::net::SocketAddr;

/// Resolves an upstream hostname to all its IP addresses (IPv4 + IPv6)
/// through the system resolver.
pub async fn resolve_all(hostname: &str, port: u16) -> Result<Vec<SocketAddr>, DomainError> {
    let target = format!("{}:{}", hostname, port);

    let addrs: Vec<SocketAddr> = tokio::net::lookup_host(&target)
        .await
        .map_err(|e| DomainError::TransportIo {
            server: target.clone(),
            message: format!("hostname resolution failed: {}", e),
        })?
        .collect();

    if addrs.is_empty() {
        return Err(DomainError::TransportIo {
            server: target,
            message: "hostname resolved to no addresses".to_string(),
        });
    }

    Ok(addrs)
}
