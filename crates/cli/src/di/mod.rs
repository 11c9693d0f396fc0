use dnsgate_api::{middleware::ResponseCache, AppState};
use dnsgate_application::ports::ResolverFactory;
use dnsgate_application::use_cases::{LookupAllRecordsUseCase, LookupRecordUseCase};
use dnsgate_domain::Config;
use dnsgate_infrastructure::dns::TcpResolverFactory;
use std::sync::Arc;
use tracing::info;

pub fn build_app_state(config: &Config) -> anyhow::Result<AppState> {
    let registry = Arc::new(config.upstream_registry()?);
    let factory: Arc<dyn ResolverFactory> =
        Arc::new(TcpResolverFactory::from_config(&config.resolver));

    info!(
        upstreams = ?registry.names().collect::<Vec<_>>(),
        dial_timeout_secs = config.resolver.dial_timeout_secs,
        query_timeout_secs = config.resolver.query_timeout_secs,
        "Upstream registry ready"
    );

    let cache = ResponseCache::from_config(&config.cache).map(Arc::new);
    match &cache {
        Some(cache) => info!(
            ttl_ms = cache.ttl().as_millis() as u64,
            max_entries = config.cache.max_entries,
            "Response cache enabled"
        ),
        None => info!("Response cache disabled"),
    }

    Ok(AppState {
        lookup_record: Arc::new(LookupRecordUseCase::new(
            Arc::clone(&registry),
            Arc::clone(&factory),
        )),
        lookup_all: Arc::new(LookupAllRecordsUseCase::new(registry, factory)),
        cache,
    })
}
