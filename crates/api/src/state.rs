use crate::middleware::ResponseCache;
use dnsgate_application::use_cases::{LookupAllRecordsUseCase, LookupRecordUseCase};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub lookup_record: Arc<LookupRecordUseCase>,
    pub lookup_all: Arc<LookupAllRecordsUseCase>,
    /// `None` when response caching is disabled.
    pub cache: Option<Arc<ResponseCache>>,
}
