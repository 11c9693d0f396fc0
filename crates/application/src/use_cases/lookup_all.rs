use crate::ports::ResolverFactory;
use crate::services::AggregateLookupCoordinator;
use dnsgate_domain::{AggregateResult, DomainError, UpstreamRegistry};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// All-records lookup against a named upstream.
pub struct LookupAllRecordsUseCase {
    registry: Arc<UpstreamRegistry>,
    factory: Arc<dyn ResolverFactory>,
    coordinator: AggregateLookupCoordinator,
}

impl LookupAllRecordsUseCase {
    pub fn new(registry: Arc<UpstreamRegistry>, factory: Arc<dyn ResolverFactory>) -> Self {
        Self {
            registry,
            factory,
            coordinator: AggregateLookupCoordinator::default(),
        }
    }

    /// Partial failures never fail the call; only an unknown upstream does.
    pub async fn execute(
        &self,
        upstream: &str,
        domain: &str,
        cancel: &CancellationToken,
    ) -> Result<AggregateResult, DomainError> {
        let addr = self.registry.resolve(upstream)?;
        let resolver = self.factory.build(addr);

        Ok(self.coordinator.execute(resolver, domain, cancel).await)
    }
}
