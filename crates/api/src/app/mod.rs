//! HTTP application wiring (Axum router + shared state).
//!
//! - `routes/`: handlers, one file per area
//! - `dto.rs`: request/response bodies
//! - `errors.rs`: `ApiError` and the JSON error body

use std::sync::Arc;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
};
use tower::ServiceBuilder;

use tenant_gate_auth::{CredentialResolver, TokenCodec, UserDirectory, UserLookup};

use crate::config::{ConfigError, GatewayConfig};
use crate::middleware::{self, AuthState};
use crate::request_log::{RequestLogHook, TracingRequestLog};

pub mod dto;
pub mod errors;
pub mod routes;

/// State shared by all handlers. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthState,
    pub directory: Arc<dyn UserDirectory>,
}

impl AppState {
    pub fn codec(&self) -> &TokenCodec {
        self.auth.resolver.codec()
    }
}

/// Build the full HTTP router from a validated configuration.
pub fn build_app<D>(config: &GatewayConfig, directory: Arc<D>) -> Result<Router, ConfigError>
where
    D: UserDirectory + 'static,
{
    let codec = TokenCodec::new(config.jwt.secret.as_bytes(), config.token_lifetime()?)
        .map_err(|e| ConfigError::Invalid(e.to_string()))?;

    let lookup: Arc<dyn UserLookup> = directory.clone();
    let resolver = CredentialResolver::new(
        codec,
        config.services_auth_keys.clone(),
        config.auth.bearer_scheme,
        lookup,
    );

    let request_log = config
        .log
        .enable_http_requests_log
        .then(|| Arc::new(TracingRequestLog) as Arc<dyn RequestLogHook>);

    let state = AppState {
        auth: AuthState {
            resolver: Arc::new(resolver),
            request_log,
        },
        directory,
    };

    Ok(router(state))
}

/// Assemble routes around an existing state.
pub fn router(state: AppState) -> Router {
    let public = routes::public_router()
        .route_layer(from_fn_with_state(state.auth.clone(), middleware::skip_auth));

    let protected = routes::protected_router()
        .route_layer(from_fn_with_state(state.auth.clone(), middleware::require_auth));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(ServiceBuilder::new().layer(from_fn(middleware::default_headers)))
        .with_state(state)
}
