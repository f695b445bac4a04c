//! Handler-side permission checks.
//!
//! The interceptor only establishes *who* is calling and *where*; handlers
//! decide what the caller may do by checking the permission they need.

use tenant_gate_auth::authorize;

use crate::app::errors::ApiError;
use crate::context::AuthorizedRequestContext;

/// Require `permission` for the principal within the request's tenant.
pub fn require_permission(ctx: &AuthorizedRequestContext, permission: &str) -> Result<(), ApiError> {
    authorize(ctx.principal(), permission, ctx.tenant_id()).map_err(ApiError::Forbidden)
}

#[cfg(test)]
mod tests {
    use tenant_gate_auth::{Permission, Principal};
    use tenant_gate_core::TenantId;

    use super::*;

    #[test]
    fn denies_missing_permission() {
        let ctx = AuthorizedRequestContext::new(
            Principal::service("indexer", vec![Permission::new("users.read")]),
            TenantId::new(5).unwrap(),
        );
        assert!(require_permission(&ctx, "users.read").is_ok());
        assert!(matches!(
            require_permission(&ctx, "users.write"),
            Err(ApiError::Forbidden(_))
        ));
    }

    #[test]
    fn anonymous_context_is_always_denied() {
        let ctx = AuthorizedRequestContext::anonymous();
        assert!(require_permission(&ctx, "users.read").is_err());
    }
}
