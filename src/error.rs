use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use schedcore_shared::Error;
use serde_json::json;

/// Wraps the shared command error so it can be returned directly from axum
/// handlers; the HTTP surface is JSON-only (§6 — no HTML front-end here).
pub struct AppError(pub Error);

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            Error::Validate(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            Error::Forbidden => (StatusCode::FORBIDDEN, "forbidden".to_string()),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Error::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            Error::User(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Error::Server(err) => {
                tracing::error!(err = %err, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
