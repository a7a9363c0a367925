//! Identity service port ("who am I" + logout).

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::CurrentUser;

#[cfg(feature = "http")]
pub mod http;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// No valid session (already logged out, expired, never signed in).
    #[error("unauthorized")]
    Unauthorized,

    #[error("network error: {0}")]
    Transport(String),

    #[error("identity service error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("malformed identity payload: {0}")]
    Decode(String),
}

impl IdentityError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, IdentityError::Unauthorized)
    }
}

/// Remote identity collaborator.
///
/// Implementations must not retry on their own; the resolver issues exactly
/// the calls it needs.
#[async_trait]
pub trait IdentityClient: Send + Sync {
    /// The signed-in user, or `None` when the service reports nobody.
    async fn current_user(&self) -> Result<Option<CurrentUser>, IdentityError>;

    async fn logout(&self) -> Result<(), IdentityError>;
}

#[async_trait]
impl<C> IdentityClient for Arc<C>
where
    C: IdentityClient + ?Sized,
{
    async fn current_user(&self) -> Result<Option<CurrentUser>, IdentityError> {
        (**self).current_user().await
    }

    async fn logout(&self) -> Result<(), IdentityError> {
        (**self).logout().await
    }
}
