use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

/// Represents an upstream server address that may or may not be resolved to an IP.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UpstreamAddr {
    Resolved(SocketAddr),
    Unresolved { hostname: Arc<str>, port: u16 },
}

impl UpstreamAddr {
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        match self {
            UpstreamAddr::Resolved(addr) => Some(*addr),
            UpstreamAddr::Unresolved { .. } => None,
        }
    }

    pub fn port(&self) -> u16 {
        match self {
            UpstreamAddr::Resolved(addr) => addr.port(),
            UpstreamAddr::Unresolved { port, .. } => *port,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, UpstreamAddr::Unresolved { .. })
    }

    /// Returns (hostname, port) if this address is unresolved.
    pub fn unresolved_parts(&self) -> Option<(&str, u16)> {
        match self {
            UpstreamAddr::Unresolved { hostname, port } => Some((hostname, *port)),
            UpstreamAddr::Resolved(_) => None,
        }
    }
}

impl fmt::Display for UpstreamAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamAddr::Resolved(addr) => write!(f, "{}", addr),
            UpstreamAddr::Unresolved { hostname, port } => write!(f, "{}:{}", hostname, port),
        }
    }
}

fn parse_host_port(s: &str) -> Option<(&str, u16)> {
    if s.starts_with('[') {
        let end = s.find(']')?;
        let host = &s[1..end];
        let rest = &s[end + 1..];
        let port_str = rest.strip_prefix(':')?;
        let port = port_str.parse::<u16>().ok()?;
        Some((host, port))
    } else {
        let (host, port_str) = s.rsplit_once(':')?;
        let port = port_str.parse::<u16>().ok()?;
        Some((host, port))
    }
}

fn is_valid_hostname(host: &str) -> bool {
    !host.is_empty()
        && host.len() <= 253
        && host.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && label
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-')
                && !label.starts_with('-')
                && !label.ends_with('-')
        })
}

impl FromStr for UpstreamAddr {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(addr) = s.parse::<SocketAddr>() {
            if addr.port() == 0 {
                return Err(format!("Invalid address '{}': port cannot be 0", s));
            }
            return Ok(UpstreamAddr::Resolved(addr));
        }
        match parse_host_port(s) {
            Some((host, port)) if port != 0 && is_valid_hostname(host) => {
                Ok(UpstreamAddr::Unresolved {
                    hostname: host.into(),
                    port,
                })
            }
            _ => Err(format!(
                "Invalid address '{}'. Expected 'IP:PORT' or 'HOSTNAME:PORT'",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ipv4() {
        let addr: UpstreamAddr = "1.1.1.1:53".parse().unwrap();
        assert_eq!(addr.socket_addr(), Some("1.1.1.1:53".parse().unwrap()));
        assert_eq!(addr.to_string(), "1.1.1.1:53");
    }

    #[test]
    fn test_parse_ipv6_brackets() {
        let addr: UpstreamAddr = "[2606:4700:4700::1111]:53".parse().unwrap();
        assert!(!addr.is_unresolved());
        assert_eq!(addr.port(), 53);
    }

    #[test]
    fn test_parse_hostname() {
        let addr: UpstreamAddr = "dns.google:53".parse().unwrap();
        assert_eq!(addr.unresolved_parts(), Some(("dns.google", 53)));
        assert_eq!(addr.to_string(), "dns.google:53");
    }

    #[test]
    fn test_rejects_malformed() {
        assert!("1.1.1.1".parse::<UpstreamAddr>().is_err());
        assert!("1.1.1.1:notaport".parse::<UpstreamAddr>().is_err());
        assert!(":53".parse::<UpstreamAddr>().is_err());
        assert!("bad host:53".parse::<UpstreamAddr>().is_err());
        assert!("dns.google:0".parse::<UpstreamAddr>().is_err());
    }
}
