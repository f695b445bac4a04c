//! `tenant-gate-core`: shared identifiers and the domain error model.
//!
//! No transport or storage concerns live here.

pub mod error;
pub mod id;

pub use error::DomainError;
pub use id::{TenantId, UserId};
