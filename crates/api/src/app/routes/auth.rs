use axum::{
    Json,
    extract::{Extension, Path, State, rejection::JsonRejection},
};

use tenant_gate_auth::{PermissionPayload, Principal};

use crate::app::AppState;
use crate::app::dto::{LoginRequest, PermissionCheckResponse, PrincipalResponse, TokenResponse};
use crate::app::errors::ApiError;
use crate::authz::require_permission;
use crate::context::AuthorizedRequestContext;

/// `POST /auth/login` (public): exchange username/password for a token
/// carrying the user's per-tenant grants.
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let (user, grants) = state
        .directory
        .authenticate(&req.username, &req.password)
        .await
        .map_err(ApiError::Login)?;

    let (token, expires_at) = state
        .codec()
        .issue(user.id, PermissionPayload::PerTenant(grants))?;

    tracing::info!(user_id = %user.id, "token issued");
    Ok(Json(TokenResponse { token, expires_at }))
}

/// `POST /auth/refresh-token`: re-issue the caller's token with a fresh
/// lifetime and the same grants. Service keys cannot be refreshed.
pub async fn refresh_token(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthorizedRequestContext>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Principal::User(user) = ctx.principal() else {
        return Err(ApiError::NotPermitted(
            "only user tokens can be refreshed".to_string(),
        ));
    };

    let (token, expires_at) = state
        .codec()
        .issue(user.user.id, PermissionPayload::PerTenant(user.grants.clone()))?;

    tracing::info!(user_id = %user.user.id, "token refreshed");
    Ok(Json(TokenResponse { token, expires_at }))
}

/// `POST /auth/check-token`: describe the resolved caller.
pub async fn check_token(
    Extension(ctx): Extension<AuthorizedRequestContext>,
) -> Json<PrincipalResponse> {
    Json(PrincipalResponse::from(&ctx))
}

/// `GET /auth/permissions/:permission`: succeed only if the caller holds
/// `permission` in the request's tenant.
pub async fn check_permission(
    Extension(ctx): Extension<AuthorizedRequestContext>,
    Path(permission): Path<String>,
) -> Result<Json<PermissionCheckResponse>, ApiError> {
    require_permission(&ctx, &permission)?;

    Ok(Json(PermissionCheckResponse {
        permission,
        tenant_id: ctx.tenant_id(),
        granted: true,
    }))
}
