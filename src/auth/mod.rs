pub mod error;
pub mod handlers;
pub mod password;
pub mod service;
pub mod token;
pub mod types;

use std::sync::Arc;

use axum::{routing::post, Router};

use crate::auth::handlers::{login_handler, register_handler};
use crate::auth::service::AuthService;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
}
