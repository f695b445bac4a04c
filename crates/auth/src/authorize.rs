use thiserror::Error;

use tenant_gate_core::TenantId;

use crate::Principal;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),
}

/// Decide whether `principal` holds `permission` within `tenant_id`.
///
/// - No IO
/// - No panics
/// - Absence of a grant is `false`, never an error
///
/// Users are checked against the grants of the requested tenant only.
/// Services hold tenant-independent grants.
pub fn has_permission(principal: &Principal, permission: &str, tenant_id: TenantId) -> bool {
    match principal {
        Principal::Anonymous => false,
        Principal::User(user) => user
            .grants
            .for_tenant(tenant_id)
            .is_some_and(|perms| perms.iter().any(|p| p.as_str() == permission)),
        Principal::Service(service) => service.permissions.iter().any(|p| p.as_str() == permission),
    }
}

/// Like [`has_permission`], but as a `Result` for use with `?` in handlers.
pub fn authorize(principal: &Principal, permission: &str, tenant_id: TenantId) -> Result<(), AuthzError> {
    if has_permission(principal, permission, tenant_id) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(permission.to_string()))
    }
}
