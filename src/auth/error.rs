use thiserror::Error;

use crate::store::StoreError;

/// Failures of the identity core: hashing, tokens, register and login.
///
/// The three token kinds (`Malformed`, `InvalidSignature`, `Expired`) stay
/// distinct so they can be logged separately; the HTTP layer renders all of
/// them as the same 401 response.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("password hashing failed: {0}")]
    HashingFailure(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("token is malformed")]
    Malformed,
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("email already registered")]
    DuplicateEmail,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AuthError {
    /// True for the kinds that mean "the bearer token is unusable".
    pub fn is_token_failure(&self) -> bool {
        matches!(
            self,
            AuthError::Malformed | AuthError::InvalidSignature | AuthError::Expired
        )
    }
}
