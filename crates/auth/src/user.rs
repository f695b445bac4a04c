//! User records and the lookup collaborators the gateway depends on.
//!
//! Persistence is owned elsewhere; this module only defines what the gateway
//! needs from it, plus an in-memory directory for development and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tenant_gate_core::UserId;

use crate::TenantGrants;

// ─────────────────────────────────────────────────────────────────────────────
// User Record
// ─────────────────────────────────────────────────────────────────────────────

/// User account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// User can authenticate.
    #[default]
    Active,
    /// User is suspended and cannot authenticate.
    Suspended,
}

impl core::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            UserStatus::Active => write!(f, "active"),
            UserStatus::Suspended => write!(f, "suspended"),
        }
    }
}

/// The user fields the gateway reads from the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub username: String,
    pub display_name: String,
    #[serde(default)]
    pub status: UserStatus,
}

impl UserRecord {
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Collaborators
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("user not found")]
    NotFound,

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("user directory unavailable: {0}")]
    Unavailable(String),
}

/// Resolves token subjects to user records.
///
/// Implementations own their timeout and failure behavior; the gateway never
/// retries a failed lookup.
#[async_trait]
pub trait UserLookup: Send + Sync {
    async fn get_user_by_id(&self, id: UserId) -> Result<UserRecord, LookupError>;
}

/// Password authentication used by the login endpoint.
///
/// Returns the user together with the per-tenant grants to embed in the
/// issued token.
#[async_trait]
pub trait UserDirectory: UserLookup {
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(UserRecord, TenantGrants), LookupError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory directory (dev/test)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct DirectoryEntry {
    record: UserRecord,
    password_hash: String,
    grants: TenantGrants,
}

/// Process-local user directory.
///
/// Holds bcrypt password hashes, never the passwords themselves. Intended for
/// development and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserDirectory {
    users: HashMap<UserId, DirectoryEntry>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user. `password_hash` is a bcrypt hash (`$2b$...`).
    pub fn with_user(
        mut self,
        record: UserRecord,
        password_hash: impl Into<String>,
        grants: TenantGrants,
    ) -> Self {
        self.users.insert(
            record.id,
            DirectoryEntry {
                record,
                password_hash: password_hash.into(),
                grants,
            },
        );
        self
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserLookup for InMemoryUserDirectory {
    async fn get_user_by_id(&self, id: UserId) -> Result<UserRecord, LookupError> {
        self.users
            .get(&id)
            .map(|entry| entry.record.clone())
            .ok_or(LookupError::NotFound)
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(UserRecord, TenantGrants), LookupError> {
        let entry = self
            .users
            .values()
            .find(|entry| entry.record.username == username)
            .ok_or(LookupError::InvalidCredentials)?;

        let matches = bcrypt::verify(password, &entry.password_hash).unwrap_or_else(|e| {
            tracing::warn!(user_id = %entry.record.id, error = %e, "unreadable password hash");
            false
        });
        if !matches || !entry.record.is_active() {
            return Err(LookupError::InvalidCredentials);
        }

        Ok((entry.record.clone(), entry.grants.clone()))
    }
}
