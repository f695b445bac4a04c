use axum::{
    Router,
    routing::{get, post},
};

use crate::app::AppState;

pub mod auth;
pub mod system;

/// Routes reachable without credentials.
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(system::health))
        .route("/auth/login", post(auth::login))
}

/// Routes that require a resolved principal and a tenant scope.
pub fn protected_router() -> Router<AppState> {
    Router::new()
        .route("/auth/refresh-token", post(auth::refresh_token))
        .route("/auth/check-token", post(auth::check_token))
        .route("/auth/permissions/:permission", get(auth::check_permission))
}
