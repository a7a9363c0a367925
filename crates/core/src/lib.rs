//! `edutalent-core` — shared identity building blocks.
//!
//! Pure types only: no IO, no framework concerns.

pub mod error;
pub mod id;

pub use error::DomainError;
pub use id::{TenantId, UserId};
