use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tenant_gate_auth::{PermissionPayload, PrincipalKind};
use tenant_gate_core::{TenantId, UserId};

use crate::context::AuthorizedRequestContext;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl core::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct PrincipalResponse {
    pub kind: PrincipalKind,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    pub permissions: PermissionPayload,
    pub tenant_id: TenantId,
}

impl From<&AuthorizedRequestContext> for PrincipalResponse {
    fn from(ctx: &AuthorizedRequestContext) -> Self {
        let principal = ctx.principal();
        Self {
            kind: principal.kind(),
            display_name: principal.display_name().to_string(),
            user_id: principal.user_id(),
            permissions: principal.permissions(),
            tenant_id: ctx.tenant_id(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PermissionCheckResponse {
    pub permission: String,
    pub tenant_id: TenantId,
    pub granted: bool,
}
