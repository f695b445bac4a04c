//! Strongly-typed identifiers used across the gateway.
//!
//! Both tenants and users are addressed by positive integers on the wire
//! (`x-tenant-id` header, `uid` token claim).

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a tenant (multi-tenant boundary).
///
/// Authenticated requests always carry a positive tenant id. The zero value
/// is reserved for [`TenantId::UNSCOPED`], the scope handed to public routes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct TenantId(u64);

/// Identifier of a user (token subject).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct UserId(u64);

impl TenantId {
    /// Scope of requests that skipped authentication.
    pub const UNSCOPED: TenantId = TenantId(0);

    pub fn is_unscoped(&self) -> bool {
        self.0 == 0
    }
}

macro_rules! impl_positive_id {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Create an identifier, rejecting zero.
            pub fn new(value: u64) -> Result<Self, DomainError> {
                if value == 0 {
                    return Err(DomainError::invalid_id(format!("{}: must be positive", $name)));
                }
                Ok(Self(value))
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl TryFrom<u64> for $t {
            type Error = DomainError;

            fn try_from(value: u64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$t> for u64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        /// Parses a positive decimal integer with an optional leading `+`.
        /// Whitespace, `-` and zero are rejected.
        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let digits = s.strip_prefix('+').unwrap_or(s);
                if !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(DomainError::invalid_id(format!("{}: not a positive integer", $name)));
                }
                let value = digits
                    .parse::<u64>()
                    .map_err(|e| DomainError::invalid_id(format!("{}: {}", $name, e)))?;
                Self::new(value)
            }
        }
    };
}

impl_positive_id!(TenantId, "TenantId");
impl_positive_id!(UserId, "UserId");
