use axum::{
    extract::State,
    http::{header::USER_AGENT, HeaderMap},
    Json,
};

use crate::auth::error::AuthError;
use crate::auth::types::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::auth::AppState;
use crate::device::device_type_from_user_agent;

fn device_type(headers: &HeaderMap) -> &'static str {
    let ua = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    device_type_from_user_agent(ua)
}

pub async fn register_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AuthError> {
    let device_type = device_type(&headers);

    state
        .auth
        .register(&req.name, &req.username, &req.password, device_type)
        .await?;

    Ok(Json(RegisterResponse {
        message: "Auth successful",
    }))
}

pub async fn login_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let device_type = device_type(&headers);

    let token = state
        .auth
        .login(&req.username, &req.password, device_type)
        .await?;

    Ok(Json(LoginResponse {
        message: "Auth successful",
        token,
    }))
}
