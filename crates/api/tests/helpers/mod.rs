#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use dnsgate_api::{create_api_routes, middleware::ResponseCache, AppState};
use dnsgate_application::ports::{BoundResolver, ResolverFactory};
use dnsgate_application::use_cases::{LookupAllRecordsUseCase, LookupRecordUseCase};
use dnsgate_domain::{DomainError, MxRecord, RecordSet, RecordType, UpstreamAddr, UpstreamRegistry};
use http_body_util::BodyExt;
use serde_json::Value;
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

/// Answers from a fixed table; unlisted types are NODATA.
pub struct ScriptedResolver {
    upstream: UpstreamAddr,
    answers: HashMap<RecordType, Result<RecordSet, DomainError>>,
    calls: AtomicUsize,
}

impl ScriptedResolver {
    pub fn new() -> Self {
        Self {
            upstream: UpstreamAddr::Resolved("127.0.0.1:53".parse().unwrap()),
            answers: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn answer(mut self, record_type: RecordType, answer: Result<RecordSet, DomainError>) -> Self {
        self.answers.insert(record_type, answer);
        self
    }

    /// example.com with A, MX, NS and TXT answers. The other types fail.
    pub fn example_com() -> Self {
        Self::new()
            .answer(
                RecordType::A,
                Ok(RecordSet::Ipv4(vec![Ipv4Addr::new(93, 184, 216, 34)])),
            )
            .answer(
                RecordType::MX,
                Ok(RecordSet::Mx(vec![
                    MxRecord::new("mx2.example.com.", 20),
                    MxRecord::new("mx1.example.com.", 10),
                ])),
            )
            .answer(
                RecordType::NS,
                Ok(RecordSet::Ns(vec!["a.iana-servers.net.".to_string()])),
            )
            .answer(
                RecordType::TXT,
                Ok(RecordSet::Txt(vec!["v=spf1 -all".to_string()])),
            )
            .answer(RecordType::CNAME, Err(DomainError::NoRecords))
            .answer(
                RecordType::PTR,
                Err(DomainError::InvalidIpAddress("example.com".to_string())),
            )
            .answer(RecordType::AAAA, Err(DomainError::QueryTimeout))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BoundResolver for ScriptedResolver {
    async fn lookup(
        &self,
        _target: &str,
        record_type: RecordType,
    ) -> Result<RecordSet, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answers
            .get(&record_type)
            .cloned()
            .unwrap_or(Err(DomainError::NoRecords))
    }

    fn upstream(&self) -> &UpstreamAddr {
        &self.upstream
    }
}

pub struct SharedFactory(pub Arc<ScriptedResolver>);

impl ResolverFactory for SharedFactory {
    fn build(&self, _upstream: &UpstreamAddr) -> Arc<dyn BoundResolver> {
        Arc::clone(&self.0) as Arc<dyn BoundResolver>
    }
}

pub fn create_app(resolver: Arc<ScriptedResolver>, cache: Option<ResponseCache>) -> Router {
    let registry = Arc::new(UpstreamRegistry::builtin());
    let factory: Arc<dyn ResolverFactory> = Arc::new(SharedFactory(resolver));

    create_api_routes(AppState {
        lookup_record: Arc::new(LookupRecordUseCase::new(
            Arc::clone(&registry),
            Arc::clone(&factory),
        )),
        lookup_all: Arc::new(LookupAllRecordsUseCase::new(registry, factory)),
        cache: cache.map(Arc::new),
    })
}

pub fn default_cache() -> ResponseCache {
    ResponseCache::new(Duration::from_secs(5), 100)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).unwrap()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

pub async fn get(app: &Router, uri: &str) -> TestResponse {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();

    TestResponse {
        status,
        headers,
        body,
    }
}
