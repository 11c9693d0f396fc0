use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};
use dnsgate_domain::{AggregateResult, DomainError, LookupOutcome, RecordType};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use crate::{dto::RecordResponse, errors::ApiError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/a/{upstream}/{domain}", get(lookup_a))
        .route("/aaaa/{upstream}/{domain}", get(lookup_aaaa))
        .route("/cname/{upstream}/{domain}", get(lookup_cname))
        .route("/mx/{upstream}/{domain}", get(lookup_mx))
        .route("/ns/{upstream}/{domain}", get(lookup_ns))
        .route("/ptr/{upstream}/{ip}", get(lookup_ptr))
        .route("/txt/{upstream}/{domain}", get(lookup_txt))
        .route("/all/{upstream}/{domain}", get(lookup_all))
}

type LookupPath = Path<(String, String)>;
type LookupResponse = Result<Json<RecordResponse>, ApiError>;

async fn lookup_a(
    State(state): State<AppState>,
    Path((upstream, domain)): LookupPath,
) -> LookupResponse {
    lookup_single(&state, &upstream, &domain, RecordType::A).await
}

async fn lookup_aaaa(
    State(state): State<AppState>,
    Path((upstream, domain)): LookupPath,
) -> LookupResponse {
    lookup_single(&state, &upstream, &domain, RecordType::AAAA).await
}

async fn lookup_cname(
    State(state): State<AppState>,
    Path((upstream, domain)): LookupPath,
) -> LookupResponse {
    lookup_single(&state, &upstream, &domain, RecordType::CNAME).await
}

async fn lookup_mx(
    State(state): State<AppState>,
    Path((upstream, domain)): LookupPath,
) -> LookupResponse {
    lookup_single(&state, &upstream, &domain, RecordType::MX).await
}

async fn lookup_ns(
    State(state): State<AppState>,
    Path((upstream, domain)): LookupPath,
) -> LookupResponse {
    lookup_single(&state, &upstream, &domain, RecordType::NS).await
}

async fn lookup_ptr(
    State(state): State<AppState>,
    Path((upstream, ip)): LookupPath,
) -> LookupResponse {
    lookup_single(&state, &upstream, &ip, RecordType::PTR).await
}

async fn lookup_txt(
    State(state): State<AppState>,
    Path((upstream, domain)): LookupPath,
) -> LookupResponse {
    lookup_single(&state, &upstream, &domain, RecordType::TXT).await
}

/// The token fires when this future is dropped, which is what axum does to
/// a handler whose client went away.
#[instrument(skip(state))]
async fn lookup_single(
    state: &AppState,
    upstream: &str,
    target: &str,
    record_type: RecordType,
) -> LookupResponse {
    let cancel = CancellationToken::new();
    let _cancel_on_drop = cancel.clone().drop_guard();

    match state
        .lookup_record
        .execute(upstream, target, record_type, &cancel)
        .await?
    {
        LookupOutcome::Found(records) => Ok(Json(RecordResponse::from(records))),
        LookupOutcome::NotFound => {
            debug!("No records found");
            Err(ApiError(DomainError::NoRecords))
        }
    }
}

#[instrument(skip(state))]
async fn lookup_all(
    State(state): State<AppState>,
    Path((upstream, domain)): LookupPath,
) -> Result<Json<AggregateResult>, ApiError> {
    let cancel = CancellationToken::new();
    let _cancel_on_drop = cancel.clone().drop_guard();

    let result = state.lookup_all.execute(&upstream, &domain, &cancel).await?;

    debug!(found = result.found_count(), "Aggregate lookup served");

    Ok(Json(result))
}
