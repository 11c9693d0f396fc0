use crate::handlers;
use crate::middleware::cache_responses;
use crate::state::AppState;
use axum::{middleware::from_fn_with_state, routing::get, Router};

pub fn create_api_routes(state: AppState) -> Router {
    let router = Router::new()
        .route("/", get(handlers::root))
        .merge(handlers::records::routes());

    let router = match state.cache.clone() {
        Some(cache) => router.layer(from_fn_with_state(cache, cache_responses)),
        None => router,
    };

    router.with_state(state)
}
