//! dnsgate domain layer
pub mod config;
pub mod dns_record;
pub mod errors;
pub mod lookup;
pub mod upstream_addr;
pub mod upstream_registry;

pub use config::{CliOverrides, Config, ConfigError};
pub use dns_record::{MxRecord, RecordSet, RecordType};
pub use errors::DomainError;
pub use lookup::{AggregateResult, LookupOutcome};
pub use upstream_addr::UpstreamAddr;
pub use upstream_registry::{UpstreamRegistry, BUILTIN_UPSTREAMS};
