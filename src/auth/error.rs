use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde_json::json;
use thiserror::Error;

/// Caller-visible failures. Deliberately coarse: `AuthFailed` covers both
/// unknown usernames and wrong passwords so responses cannot be used to
/// enumerate accounts. `UsernameTaken` is the only place existence leaks,
/// and only on the registration path.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid input")]
    InvalidInput,
    #[error("username already in use")]
    UsernameTaken,
    #[error("auth failed")]
    AuthFailed,
    #[error("store unavailable")]
    StoreUnavailable,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::InvalidInput => (StatusCode::BAD_REQUEST, "Invalid request"),
            AuthError::UsernameTaken => (StatusCode::CONFLICT, "Username already in use."),
            AuthError::AuthFailed => (StatusCode::UNAUTHORIZED, "Auth failed"),
            AuthError::StoreUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, "Service unavailable")
            }
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}
