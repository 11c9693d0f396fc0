use crate::dto::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dnsgate_domain::DomainError;

pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            DomainError::UnknownUpstream(_) => (StatusCode::BAD_REQUEST, "DNS server not found"),

            DomainError::ConfigError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error")
            }

            // Resolution failures all look the same to the client.
            _ => (StatusCode::NOT_FOUND, "No records found"),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}
