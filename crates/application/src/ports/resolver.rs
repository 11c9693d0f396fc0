use async_trait::async_trait;
use dnsgate_domain::{DomainError, RecordSet, RecordType, UpstreamAddr};
use std::sync::Arc;

/// A resolver that sends every query to exactly one upstream.
///
/// Instances are created per request and never shared between requests.
#[async_trait]
pub trait BoundResolver: Send + Sync {
    /// Queries `target` for `record_type`. For PTR the target must be an IP
    /// literal; anything else fails inside the resolver.
    async fn lookup(&self, target: &str, record_type: RecordType)
        -> Result<RecordSet, DomainError>;

    fn upstream(&self) -> &UpstreamAddr;
}

pub trait ResolverFactory: Send + Sync {
    fn build(&self, upstream: &UpstreamAddr) -> Arc<dyn BoundResolver>;
}
