//! Credential resolution: `Authorization` header value → [`Principal`].
//!
//! Two credential forms are accepted: bearer tokens issued by
//! [`TokenCodec`], and static service keys from configuration. Every failure
//! is an "unauthenticated" outcome; the variants only exist for logging.

use std::borrow::Cow;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::token::TokenCodec;
use crate::{LookupError, Permission, PermissionPayload, Principal, TokenError, UserLookup};

/// Trusted non-human caller, loaded once from configuration.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCredential {
    pub name: String,
    pub key: String,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

impl core::fmt::Debug for ServiceCredential {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ServiceCredential")
            .field("name", &self.name)
            .field("key", &"<redacted>")
            .field("permissions", &self.permissions)
            .finish()
    }
}

/// How a header is recognized as a bearer credential.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BearerScheme {
    /// Case-sensitive `"Bearer "` prefix.
    #[default]
    Strict,
    /// Any header containing `"Bearer"`; every occurrence is removed before
    /// the remainder is trimmed. Kept for older clients.
    Legacy,
}

impl BearerScheme {
    /// Extract the token from `header` if it is a bearer credential.
    pub fn extract<'a>(&self, header: &'a str) -> Option<Cow<'a, str>> {
        match self {
            BearerScheme::Strict => header
                .strip_prefix("Bearer ")
                .map(|rest| Cow::Borrowed(rest.trim())),
            BearerScheme::Legacy => header
                .contains("Bearer")
                .then(|| Cow::Owned(header.replace("Bearer", "").trim().to_string())),
        }
    }

    /// Whether `header` would be routed to bearer-token verification.
    pub fn matches(&self, header: &str) -> bool {
        match self {
            BearerScheme::Strict => header.starts_with("Bearer "),
            BearerScheme::Legacy => header.contains("Bearer"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("missing credentials")]
    MissingCredential,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("subject lookup failed: {0}")]
    Lookup(#[from] LookupError),

    #[error("user is not active")]
    InactiveUser,

    #[error("token payload is not scoped per tenant")]
    UnexpectedPayload,

    #[error("unknown service key")]
    UnknownServiceKey,
}

/// Resolves raw credentials against the token codec, the user collaborator
/// and the configured service keys.
///
/// Immutable after construction; share it behind an `Arc`.
pub struct CredentialResolver {
    codec: TokenCodec,
    services: Vec<ServiceCredential>,
    scheme: BearerScheme,
    users: Arc<dyn UserLookup>,
}

impl CredentialResolver {
    pub fn new(
        codec: TokenCodec,
        services: Vec<ServiceCredential>,
        scheme: BearerScheme,
        users: Arc<dyn UserLookup>,
    ) -> Self {
        Self {
            codec,
            services,
            scheme,
            users,
        }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Resolve the `Authorization` header value of a request.
    pub async fn resolve(&self, header: Option<&str>) -> Result<Principal, CredentialError> {
        let header = header.filter(|h| !h.trim().is_empty());
        let Some(header) = header else {
            return Err(CredentialError::MissingCredential);
        };

        match self.scheme.extract(header) {
            Some(token) => self.resolve_bearer(&token).await,
            None => self.resolve_service_key(header),
        }
    }

    async fn resolve_bearer(&self, token: &str) -> Result<Principal, CredentialError> {
        if token.is_empty() {
            return Err(CredentialError::MissingCredential);
        }

        let verified = self.codec.verify(token).inspect_err(|e| {
            tracing::debug!(error = %e, "bearer token rejected");
        })?;

        let PermissionPayload::PerTenant(grants) = verified.permissions else {
            return Err(CredentialError::UnexpectedPayload);
        };

        let user = self
            .users
            .get_user_by_id(verified.subject)
            .await
            .inspect_err(|e| {
                tracing::warn!(subject = %verified.subject, error = %e, "token subject lookup failed");
            })?;

        if !user.is_active() {
            return Err(CredentialError::InactiveUser);
        }

        Ok(Principal::user(user, grants))
    }

    fn resolve_service_key(&self, key: &str) -> Result<Principal, CredentialError> {
        self.services
            .iter()
            .find(|svc| bool::from(svc.key.as_bytes().ct_eq(key.as_bytes())))
            .map(|svc| Principal::service(svc.name.clone(), svc.permissions.clone()))
            .ok_or(CredentialError::UnknownServiceKey)
    }
}
