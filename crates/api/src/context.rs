use tenant_gate_auth::Principal;
use tenant_gate_core::TenantId;

/// Authorization context of a single request: who is calling, and within
/// which tenant.
///
/// Created by the interceptor and handed to the handler through request
/// extensions. Never shared across requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedRequestContext {
    principal: Principal,
    tenant_id: TenantId,
}

impl AuthorizedRequestContext {
    pub fn new(principal: Principal, tenant_id: TenantId) -> Self {
        Self {
            principal,
            tenant_id,
        }
    }

    /// Context for routes that skip authentication.
    pub fn anonymous() -> Self {
        Self::new(Principal::Anonymous, TenantId::UNSCOPED)
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}
