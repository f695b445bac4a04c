//! `tenant-gate-auth`: credential verification and permission evaluation.
//!
//! This crate is decoupled from HTTP; the user store is reached only through
//! the [`UserLookup`] and [`UserDirectory`] traits.

pub mod authorize;
pub mod claims;
pub mod credentials;
pub mod permissions;
pub mod principal;
pub mod token;
pub mod user;

pub use authorize::{AuthzError, authorize, has_permission};
pub use claims::{TokenClaims, TokenError, validate_claims};
pub use credentials::{BearerScheme, CredentialError, CredentialResolver, ServiceCredential};
pub use permissions::{Permission, PermissionPayload, TenantGrants};
pub use principal::{Principal, PrincipalKind, ServicePrincipal, UserPrincipal};
pub use token::{MAX_TOKEN_LIFETIME_SECS, TokenCodec, VerifiedToken};
pub use user::{
    InMemoryUserDirectory, LookupError, UserDirectory, UserLookup, UserRecord, UserStatus,
};
