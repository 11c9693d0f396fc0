//! Short-lived cache of successful GET responses, in front of the routes.
//!
//! Entries are keyed by method, path and query string. A request carrying
//! `noCache=true` skips the cache in both directions.

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use dashmap::DashMap;
use dnsgate_domain::config::CacheConfig;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub const X_CACHE: &str = "x-cache";
const BYPASS_PARAM: &str = "noCache";

#[derive(Debug, Clone)]
struct CachedResponse {
    headers: HeaderMap,
    body: Bytes,
    stored_at: Instant,
}

#[derive(Debug)]
pub struct ResponseCache {
    entries: DashMap<String, CachedResponse>,
    ttl: Duration,
    max_entries: usize,
}

impl ResponseCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            max_entries,
        }
    }

    /// `None` when caching is turned off.
    pub fn from_config(config: &CacheConfig) -> Option<Self> {
        config
            .enabled
            .then(|| Self::new(config.ttl(), config.max_entries))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn get(&self, key: &str) -> Option<CachedResponse> {
        let entry = self.entries.get(key)?;
        if entry.stored_at.elapsed() < self.ttl {
            return Some(entry.clone());
        }
        drop(entry);
        self.entries.remove(key);
        None
    }

    fn insert(&self, key: String, headers: HeaderMap, body: Bytes) {
        if self.entries.len() >= self.max_entries && !self.entries.contains_key(&key) {
            self.purge_expired();
            if self.entries.len() >= self.max_entries {
                debug!(entries = self.entries.len(), "Response cache full, not storing");
                return;
            }
        }

        self.entries.insert(
            key,
            CachedResponse {
                headers,
                body,
                stored_at: Instant::now(),
            },
        );
    }

    pub fn purge_expired(&self) {
        let ttl = self.ttl;
        self.entries.retain(|_, entry| entry.stored_at.elapsed() < ttl);
    }

    fn cache_control(&self) -> HeaderValue {
        HeaderValue::from_str(&format!("public, max-age={}", self.ttl.as_secs()))
            .unwrap_or_else(|_| HeaderValue::from_static("no-cache"))
    }
}

fn cache_key(method: &Method, uri: &Uri) -> String {
    match uri.query() {
        Some(query) => format!("{} {}?{}", method, uri.path(), query),
        None => format!("{} {}", method, uri.path()),
    }
}

fn bypass_requested(uri: &Uri) -> bool {
    uri.query().is_some_and(|query| {
        query.split('&').any(|pair| match pair.split_once('=') {
            Some((name, value)) => name == BYPASS_PARAM && value.eq_ignore_ascii_case("true"),
            None => false,
        })
    })
}

pub async fn cache_responses(
    State(cache): State<Arc<ResponseCache>>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() != Method::GET || bypass_requested(request.uri()) {
        return next.run(request).await;
    }

    let key = cache_key(request.method(), request.uri());

    if let Some(hit) = cache.get(&key) {
        debug!(key = %key, "Response cache hit");
        let mut response = Response::new(Body::from(hit.body));
        *response.headers_mut() = hit.headers;
        response
            .headers_mut()
            .insert(X_CACHE, HeaderValue::from_static("hit"));
        return response;
    }

    let response = next.run(request).await;
    if response.status() != StatusCode::OK {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let body = match to_bytes(body, usize::MAX).await {
        Ok(body) => body,
        Err(e) => {
            warn!(key = %key, error = %e, "Failed to buffer response body");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    parts
        .headers
        .insert(header::CACHE_CONTROL, cache.cache_control());
    cache.insert(key, parts.headers.clone(), body.clone());
    parts
        .headers
        .insert(X_CACHE, HeaderValue::from_static("miss"));

    Response::from_parts(parts, Body::from(body))
}
