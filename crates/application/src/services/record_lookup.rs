use crate::ports::BoundResolver;
use dnsgate_domain::{DomainError, LookupOutcome, RecordType};
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// One lookup per record type, each collapsing every failure into
/// [`LookupOutcome::NotFound`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordLookupService;

impl RecordLookupService {
    pub fn new() -> Self {
        Self
    }

    pub async fn lookup_a(
        &self,
        resolver: &dyn BoundResolver,
        domain: &str,
        cancel: &CancellationToken,
    ) -> LookupOutcome {
        self.lookup(resolver, domain, RecordType::A, cancel).await
    }

    pub async fn lookup_aaaa(
        &self,
        resolver: &dyn BoundResolver,
        domain: &str,
        cancel: &CancellationToken,
    ) -> LookupOutcome {
        self.lookup(resolver, domain, RecordType::AAAA, cancel).await
    }

    pub async fn lookup_cname(
        &self,
        resolver: &dyn BoundResolver,
        domain: &str,
        cancel: &CancellationToken,
    ) -> LookupOutcome {
        self.lookup(resolver, domain, RecordType::CNAME, cancel).await
    }

    /// Preserves the order the upstream returned.
    pub async fn lookup_mx(
        &self,
        resolver: &dyn BoundResolver,
        domain: &str,
        cancel: &CancellationToken,
    ) -> LookupOutcome {
        self.lookup(resolver, domain, RecordType::MX, cancel).await
    }

    pub async fn lookup_ns(
        &self,
        resolver: &dyn BoundResolver,
        domain: &str,
        cancel: &CancellationToken,
    ) -> LookupOutcome {
        self.lookup(resolver, domain, RecordType::NS, cancel).await
    }

    /// `ip` is handed to the resolver as-is.
    pub async fn lookup_ptr(
        &self,
        resolver: &dyn BoundResolver,
        ip: &str,
        cancel: &CancellationToken,
    ) -> LookupOutcome {
        self.lookup(resolver, ip, RecordType::PTR, cancel).await
    }

    pub async fn lookup_txt(
        &self,
        resolver: &dyn BoundResolver,
        domain: &str,
        cancel: &CancellationToken,
    ) -> LookupOutcome {
        self.lookup(resolver, domain, RecordType::TXT, cancel).await
    }

    pub async fn lookup(
        &self,
        resolver: &dyn BoundResolver,
        target: &str,
        record_type: RecordType,
        cancel: &CancellationToken,
    ) -> LookupOutcome {
        if cancel.is_cancelled() {
            debug!(
                query_target = %target,
                record_type = %record_type,
                "Lookup skipped, request cancelled"
            );
            return LookupOutcome::NotFound;
        }

        let start = Instant::now();

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(DomainError::Cancelled),
            result = resolver.lookup(target, record_type) => result,
        };

        let elapsed_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(records) if records.record_type() != record_type => {
                warn!(
                    upstream = %resolver.upstream(),
                    query_target = %target,
                    record_type = %record_type,
                    returned = %records.record_type(),
                    "Resolver returned records of the wrong type"
                );
                LookupOutcome::NotFound
            }
            Ok(records) => {
                debug!(
                    upstream = %resolver.upstream(),
                    query_target = %target,
                    record_type = %record_type,
                    count = records.len(),
                    elapsed_ms,
                    "Lookup succeeded"
                );
                LookupOutcome::Found(records)
            }
            Err(DomainError::Cancelled) => {
                debug!(
                    query_target = %target,
                    record_type = %record_type,
                    elapsed_ms,
                    "Lookup cancelled"
                );
                LookupOutcome::NotFound
            }
            Err(e) => {
                warn!(
                    upstream = %resolver.upstream(),
                    query_target = %target,
                    record_type = %record_type,
                    error = %e,
                    elapsed_ms,
                    "Lookup failed"
                );
                LookupOutcome::NotFound
            }
        }
    }
}
