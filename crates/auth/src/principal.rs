use serde::Serialize;

use tenant_gate_core::UserId;

use crate::{Permission, PermissionPayload, TenantGrants, UserRecord};

/// Kind of an authenticated caller.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrincipalKind {
    Anonymous,
    User,
    Service,
}

impl core::fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PrincipalKind::Anonymous => write!(f, "anonymous"),
            PrincipalKind::User => write!(f, "user"),
            PrincipalKind::Service => write!(f, "service"),
        }
    }
}

/// A human user, scoped to the tenants it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPrincipal {
    pub user: UserRecord,
    /// Grants as embedded in the verified token, not re-read from storage.
    pub grants: TenantGrants,
}

/// A trusted backend caller with tenant-independent permissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicePrincipal {
    pub name: String,
    pub permissions: Vec<Permission>,
}

/// Identity resolved from a request credential.
///
/// The variant fixes the shape of the permission payload. Built once per
/// request and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    /// Caller on a route that skips authentication. Holds no permissions.
    Anonymous,
    User(UserPrincipal),
    Service(ServicePrincipal),
}

impl Principal {
    pub fn user(user: UserRecord, grants: TenantGrants) -> Self {
        Principal::User(UserPrincipal { user, grants })
    }

    pub fn service(name: impl Into<String>, permissions: Vec<Permission>) -> Self {
        Principal::Service(ServicePrincipal {
            name: name.into(),
            permissions,
        })
    }

    pub fn kind(&self) -> PrincipalKind {
        match self {
            Principal::Anonymous => PrincipalKind::Anonymous,
            Principal::User(_) => PrincipalKind::User,
            Principal::Service(_) => PrincipalKind::Service,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Principal::Anonymous => "",
            Principal::User(u) => &u.user.display_name,
            Principal::Service(s) => &s.name,
        }
    }

    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Principal::User(u) => Some(u.user.id),
            _ => None,
        }
    }

    /// Wire form of the principal's grants.
    pub fn permissions(&self) -> PermissionPayload {
        match self {
            Principal::Anonymous => PermissionPayload::empty(),
            Principal::User(u) => PermissionPayload::PerTenant(u.grants.clone()),
            Principal::Service(s) => PermissionPayload::Flat(s.permissions.clone()),
        }
    }
}
