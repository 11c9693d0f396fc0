use crate::ports::ResolverFactory;
use crate::services::RecordLookupService;
use dnsgate_domain::{DomainError, LookupOutcome, RecordType, UpstreamRegistry};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Single record-type lookup against a named upstream.
pub struct LookupRecordUseCase {
    registry: Arc<UpstreamRegistry>,
    factory: Arc<dyn ResolverFactory>,
    service: RecordLookupService,
}

impl LookupRecordUseCase {
    pub fn new(registry: Arc<UpstreamRegistry>, factory: Arc<dyn ResolverFactory>) -> Self {
        Self {
            registry,
            factory,
            service: RecordLookupService::new(),
        }
    }

    /// Fails only with [`DomainError::UnknownUpstream`], before any network
    /// activity. Resolution failures come back as `Ok(LookupOutcome::NotFound)`.
    pub async fn execute(
        &self,
        upstream: &str,
        target: &str,
        record_type: RecordType,
        cancel: &CancellationToken,
    ) -> Result<LookupOutcome, DomainError> {
        let addr = self.registry.resolve(upstream)?;
        let resolver = self.factory.build(addr);

        let outcome = match record_type {
            RecordType::A => self.service.lookup_a(resolver.as_ref(), target, cancel).await,
            RecordType::AAAA => {
                self.service
                    .lookup_aaaa(resolver.as_ref(), target, cancel)
                    .await
            }
            RecordType::CNAME => {
                self.service
                    .lookup_cname(resolver.as_ref(), target, cancel)
                    .await
            }
            RecordType::MX => self.service.lookup_mx(resolver.as_ref(), target, cancel).await,
            RecordType::NS => self.service.lookup_ns(resolver.as_ref(), target, cancel).await,
            RecordType::PTR => {
                self.service
                    .lookup_ptr(resolver.as_ref(), target, cancel)
                    .await
            }
            RecordType::TXT => {
                self.service
                    .lookup_txt(resolver.as_ref(), target, cancel)
                    .await
            }
        };

        Ok(outcome)
    }
}
