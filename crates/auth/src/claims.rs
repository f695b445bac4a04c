use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tenant_gate_core::UserId;

use crate::PermissionPayload;

/// Bearer token claims, as they appear on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user) identifier.
    pub uid: UserId,

    /// Permissions embedded at issuance.
    pub pms: PermissionPayload,

    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,

    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token lifetime is out of range")]
    InvalidLifetime,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl TokenError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}

/// Validate the time window of already-decoded claims.
///
/// The token is valid strictly before `exp`; there is no leeway.
pub fn validate_claims(claims: &TokenClaims, now: DateTime<Utc>) -> Result<(), TokenError> {
    if claims.exp <= claims.iat {
        return Err(TokenError::malformed("invalid time window (exp <= iat)"));
    }
    let now = now.timestamp();
    if now < claims.iat {
        return Err(TokenError::malformed("token issued in the future"));
    }
    if now >= claims.exp {
        return Err(TokenError::Expired);
    }
    Ok(())
}
