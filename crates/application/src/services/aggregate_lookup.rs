use super::record_lookup::RecordLookupService;
use crate::ports::BoundResolver;
use dnsgate_domain::{AggregateResult, LookupOutcome, RecordType};
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::AbortHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Aborts every spawned lookup that is still running when dropped, so a
/// dropped request does not leave tasks talking to the upstream.
struct AbortOnDrop(Vec<AbortHandle>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        for handle in &self.0 {
            handle.abort();
        }
    }
}

/// Runs the seven record lookups for one domain concurrently and merges
/// their outcomes.
///
/// Each lookup runs in its own task and reports through a single
/// `FuturesUnordered`; the merge is a keyed write in this function only.
/// A failing lookup yields `NotFound` for its own type and nothing else.
/// The result is returned only once all seven have reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct AggregateLookupCoordinator {
    service: RecordLookupService,
}

impl AggregateLookupCoordinator {
    pub async fn execute(
        &self,
        resolver: Arc<dyn BoundResolver>,
        domain: &str,
        cancel: &CancellationToken,
    ) -> AggregateResult {
        let start = Instant::now();
        let domain: Arc<str> = Arc::from(domain);

        debug!(
            upstream = %resolver.upstream(),
            domain = %domain,
            lookups = RecordType::ALL.len(),
            "Dispatching aggregate lookup"
        );

        let mut abort_handles = Vec::with_capacity(RecordType::ALL.len());
        let mut reports = FuturesUnordered::new();

        for record_type in RecordType::ALL {
            let resolver = Arc::clone(&resolver);
            // PTR receives the domain string too, same as every other type.
            let target = Arc::clone(&domain);
            let token = cancel.child_token();
            let service = self.service;

            let handle = tokio::spawn(async move {
                service
                    .lookup(resolver.as_ref(), &target, record_type, &token)
                    .await
            });
            abort_handles.push(handle.abort_handle());
            reports.push(handle.map(move |joined| (record_type, joined)));
        }

        let _abort_guard = AbortOnDrop(abort_handles);
        let mut result = AggregateResult::new();

        while let Some((record_type, joined)) = reports.next().await {
            let outcome = match joined {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(record_type = %record_type, error = %e, "Lookup task did not complete");
                    LookupOutcome::NotFound
                }
            };
            result.insert(record_type, outcome);
        }

        debug!(
            domain = %domain,
            found = result.found_count(),
            reported = result.reported(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Aggregate lookup finished"
        );

        result
    }
}
