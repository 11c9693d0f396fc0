use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown upstream: {0}")]
    UnknownUpstream(String),

    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid IP address: {0}")]
    InvalidIpAddress(String),

    #[error("Invalid upstream address: {0}")]
    InvalidUpstreamAddress(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("Domain not found (NXDOMAIN)")]
    NxDomain,

    #[error("Upstream answered with {0}")]
    ServerFailure(String),

    #[error("No records in answer (NODATA)")]
    NoRecords,

    #[error("Query timeout")]
    QueryTimeout,

    #[error("Transport timeout connecting to {server}")]
    TransportTimeout { server: String },

    #[error("Transport connection refused by {server}")]
    TransportConnectionRefused { server: String },

    #[error("Transport I/O error with {server}: {message}")]
    TransportIo { server: String, message: String },

    #[error("Lookup cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DomainError {
    /// Errors the caller caused by naming something we do not know about.
    pub fn is_client_error(&self) -> bool {
        matches!(self, DomainError::UnknownUpstream(_))
    }
}
