//! Request interceptor.
//!
//! Every route is wrapped by [`default_headers`] plus exactly one of
//! [`require_auth`] (protected routes) or [`skip_auth`] (login-style routes).
//! Both end by inserting an [`AuthorizedRequestContext`] into the request
//! extensions and dispatching to the handler; `require_auth` may instead
//! reject with `401` (no resolvable principal) or `403` (bad tenant header).

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{
        HeaderMap, HeaderValue,
        header::{ACCESS_CONTROL_ALLOW_ORIGIN, AUTHORIZATION, CONTENT_TYPE},
    },
    middleware::Next,
    response::Response,
};

use tenant_gate_auth::CredentialResolver;
use tenant_gate_core::{DomainError, TenantId};

use crate::app::errors::ApiError;
use crate::context::AuthorizedRequestContext;
use crate::request_log::RequestLogHook;

/// Header carrying the tenant scope of a request.
pub const TENANT_HEADER: &str = "x-tenant-id";

#[derive(Clone)]
pub struct AuthState {
    pub resolver: Arc<CredentialResolver>,
    /// Set only when request logging is enabled.
    pub request_log: Option<Arc<dyn RequestLogHook>>,
}

/// Stamp the default response headers, whatever the outcome.
pub async fn default_headers(req: Request, next: Next) -> Response {
    let mut res = next.run(req).await;
    let headers = res.headers_mut();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/json; charset=UTF-8"),
    );
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    res
}

/// Resolve the caller and tenant, then dispatch.
pub async fn require_auth(
    State(state): State<AuthState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = state.resolver.resolve(authorization(req.headers())).await?;

    let tenant_id = tenant_scope(req.headers()).map_err(|e| {
        tracing::debug!(error = %e, "tenant scope rejected");
        ApiError::MissingTenantScope
    })?;

    let ctx = AuthorizedRequestContext::new(principal, tenant_id);
    Ok(dispatch(&state, req, ctx, next).await)
}

/// Dispatch without authentication, with an anonymous unscoped context.
pub async fn skip_auth(State(state): State<AuthState>, req: Request, next: Next) -> Response {
    dispatch(&state, req, AuthorizedRequestContext::anonymous(), next).await
}

async fn dispatch(
    state: &AuthState,
    mut req: Request,
    ctx: AuthorizedRequestContext,
    next: Next,
) -> Response {
    if let Some(hook) = &state.request_log {
        hook.on_dispatch(&req, &ctx);
    }
    req.extensions_mut().insert(ctx);
    next.run(req).await
}

/// The `Authorization` header value, if present and valid UTF-8.
fn authorization(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok())
}

/// Parse the tenant header as a positive integer.
pub fn tenant_scope(headers: &HeaderMap) -> Result<TenantId, DomainError> {
    let raw = headers
        .get(TENANT_HEADER)
        .ok_or_else(|| DomainError::validation("x-tenant-id header missing"))?
        .to_str()
        .map_err(|_| DomainError::validation("x-tenant-id header is not ASCII"))?;
    raw.parse()
}
