use super::UpstreamResolver;
use dnsgate_application::ports::{BoundResolver, ResolverFactory};
use dnsgate_domain::config::ResolverConfig;
use dnsgate_domain::UpstreamAddr;
use std::sync::Arc;
use std::time::Duration;

/// Builds [`UpstreamResolver`]s that share the configured timeouts.
#[derive(Debug, Clone, Copy)]
pub struct TcpResolverFactory {
    dial_timeout: Duration,
    query_timeout: Duration,
}

impl TcpResolverFactory {
    pub fn new(dial_timeout: Duration, query_timeout: Duration) -> Self {
        Self {
            dial_timeout,
            query_timeout,
        }
    }

    pub fn from_config(config: &ResolverConfig) -> Self {
        Self::new(config.dial_timeout(), config.query_timeout())
    }
}

impl ResolverFactory for TcpResolverFactory {
    fn build(&self, upstream: &UpstreamAddr) -> Arc<dyn BoundResolver> {
        Arc::new(UpstreamResolver::new(
            upstream.clone(),
            self.dial_timeout,
            self.query_timeout,
        ))
    }
}
