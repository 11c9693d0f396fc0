use async_trait::async_trait;
use dnsgate_application::ports::{BoundResolver, ResolverFactory};
use dnsgate_domain::{DomainError, MxRecord, RecordSet, RecordType, UpstreamAddr};
use std::collections::HashMap;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

struct ActiveGuard(Arc<AtomicUsize>);

impl ActiveGuard {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Scripted resolver: each record type gets a canned answer and an optional
/// delay. Unscripted types fail with NODATA.
#[derive(Clone)]
pub struct MockBoundResolver {
    upstream: UpstreamAddr,
    responses: Arc<Mutex<HashMap<RecordType, Result<RecordSet, DomainError>>>>,
    delays: Arc<Mutex<HashMap<RecordType, Duration>>>,
    calls: Arc<Mutex<Vec<(RecordType, String)>>>,
    active: Arc<AtomicUsize>,
    completed: Arc<AtomicUsize>,
}

impl MockBoundResolver {
    pub fn new() -> Self {
        Self {
            upstream: UpstreamAddr::Resolved("127.0.0.1:53".parse().unwrap()),
            responses: Arc::new(Mutex::new(HashMap::new())),
            delays: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            active: Arc::new(AtomicUsize::new(0)),
            completed: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Answers every type with a realistic record set.
    pub fn fully_populated() -> Self {
        let mock = Self::new();
        mock.set_response(
            RecordType::A,
            Ok(RecordSet::Ipv4(vec![Ipv4Addr::new(93, 184, 216, 34)])),
        );
        mock.set_response(
            RecordType::AAAA,
            Ok(RecordSet::Ipv6(vec!["2606:2800:220:1:248:1893:25c8:1946"
                .parse::<Ipv6Addr>()
                .unwrap()])),
        );
        mock.set_response(
            RecordType::CNAME,
            Ok(RecordSet::Cname("example.com.".to_string())),
        );
        mock.set_response(
            RecordType::MX,
            Ok(RecordSet::Mx(vec![
                MxRecord::new("mx2.example.com.", 20),
                MxRecord::new("mx1.example.com.", 10),
            ])),
        );
        mock.set_response(
            RecordType::NS,
            Ok(RecordSet::Ns(vec![
                "a.iana-servers.net.".to_string(),
                "b.iana-servers.net.".to_string(),
            ])),
        );
        mock.set_response(
            RecordType::PTR,
            Ok(RecordSet::Ptr(vec!["one.one.one.one.".to_string()])),
        );
        mock.set_response(
            RecordType::TXT,
            Ok(RecordSet::Txt(vec!["v=spf1 -all".to_string()])),
        );
        mock
    }

    pub fn with_upstream(mut self, upstream: UpstreamAddr) -> Self {
        self.upstream = upstream;
        self
    }

    pub fn set_response(&self, record_type: RecordType, response: Result<RecordSet, DomainError>) {
        self.responses
            .lock()
            .unwrap()
            .insert(record_type, response);
    }

    pub fn set_delay(&self, record_type: RecordType, delay: Duration) {
        self.delays.lock().unwrap().insert(record_type, delay);
    }

    pub fn set_delay_all(&self, delay: Duration) {
        for rt in RecordType::ALL {
            self.set_delay(rt, delay);
        }
    }

    pub fn calls(&self) -> Vec<(RecordType, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Lookups currently inside `lookup`.
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Lookups that ran to the end of `lookup`.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BoundResolver for MockBoundResolver {
    async fn lookup(
        &self,
        target: &str,
        record_type: RecordType,
    ) -> Result<RecordSet, DomainError> {
        let _guard = ActiveGuard::enter(&self.active);
        self.calls
            .lock()
            .unwrap()
            .push((record_type, target.to_string()));

        let delay = self.delays.lock().unwrap().get(&record_type).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let response = self
            .responses
            .lock()
            .unwrap()
            .get(&record_type)
            .cloned()
            .unwrap_or(Err(DomainError::NoRecords));

        self.completed.fetch_add(1, Ordering::SeqCst);
        response
    }

    fn upstream(&self) -> &UpstreamAddr {
        &self.upstream
    }
}

/// Hands out clones of one scripted resolver and remembers which upstreams
/// were requested.
pub struct MockResolverFactory {
    resolver: MockBoundResolver,
    built: Mutex<Vec<UpstreamAddr>>,
}

impl MockResolverFactory {
    pub fn new(resolver: MockBoundResolver) -> Self {
        Self {
            resolver,
            built: Mutex::new(Vec::new()),
        }
    }

    pub fn built(&self) -> Vec<UpstreamAddr> {
        self.built.lock().unwrap().clone()
    }
}

impl ResolverFactory for MockResolverFactory {
    fn build(&self, upstream: &UpstreamAddr) -> Arc<dyn BoundResolver> {
        self.built.lock().unwrap().push(upstream.clone());
        Arc::new(self.resolver.clone().with_upstream(upstream.clone()))
    }
}
