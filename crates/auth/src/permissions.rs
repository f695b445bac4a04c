use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use tenant_gate_core::TenantId;

/// Permission identifier.
///
/// Permissions are opaque strings (e.g. "users.read"). Matching is exact and
/// case-sensitive; there is no wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Permission {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}

/// Per-tenant permission grants of a user.
///
/// Keys are tenant ids rendered as decimal strings, which is how they travel
/// inside the `pms` token claim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantGrants(BTreeMap<String, Vec<Permission>>);

impl TenantGrants {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `permissions` to the grants of `tenant_id`.
    pub fn grant(
        mut self,
        tenant_id: TenantId,
        permissions: impl IntoIterator<Item = Permission>,
    ) -> Self {
        self.0
            .entry(tenant_id.to_string())
            .or_default()
            .extend(permissions);
        self
    }

    /// Permissions granted within `tenant_id`, if the user belongs to it.
    pub fn for_tenant(&self, tenant_id: TenantId) -> Option<&[Permission]> {
        self.0.get(&tenant_id.to_string()).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, Vec<Permission>>> for TenantGrants {
    fn from(value: BTreeMap<String, Vec<Permission>>) -> Self {
        Self(value)
    }
}

/// Permission payload embedded in tokens and attached to principals.
///
/// Users are scoped per tenant; services hold a flat, tenant-independent list.
/// On the wire the two shapes are told apart structurally (JSON object vs.
/// array).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PermissionPayload {
    PerTenant(TenantGrants),
    Flat(Vec<Permission>),
}

impl PermissionPayload {
    pub fn empty() -> Self {
        PermissionPayload::Flat(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenant(id: u64) -> TenantId {
        TenantId::new(id).unwrap()
    }

    #[test]
    fn grants_are_keyed_by_decimal_tenant_id() {
        let grants = TenantGrants::new()
            .grant(tenant(1), [Permission::new("read")])
            .grant(tenant(1), [Permission::new("write")]);

        let json = serde_json::to_value(&grants).unwrap();
        assert_eq!(json, serde_json::json!({ "1": ["read", "write"] }));
        assert!(grants.for_tenant(tenant(2)).is_none());
    }

    #[test]
    fn payload_shape_is_selected_by_json_structure() {
        let per_tenant: PermissionPayload =
            serde_json::from_value(serde_json::json!({ "3": ["users.read"] })).unwrap();
        let PermissionPayload::PerTenant(grants) = per_tenant else {
            panic!("expected per-tenant payload");
        };
        assert_eq!(grants.for_tenant(tenant(3)).unwrap(), &[Permission::new("users.read")]);

        let flat: PermissionPayload =
            serde_json::from_value(serde_json::json!(["users.read"])).unwrap();
        assert_eq!(flat, PermissionPayload::Flat(vec![Permission::new("users.read")]));
    }

    #[test]
    fn payload_rejects_non_string_permissions() {
        let result = serde_json::from_value::<PermissionPayload>(serde_json::json!({ "1": [5] }));
        assert!(result.is_err());
    }
}
