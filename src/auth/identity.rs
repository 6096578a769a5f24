use std::sync::Arc;

use log::{debug, info, warn};
use tokio::task;
use uuid::Uuid;

use crate::auth::error::AuthError;
use crate::auth::password::{Credential, CredentialManager};
use crate::auth::token::{self, TokenSettings};
use crate::models::{normalize_email, NewUser, User};
use crate::store::{Store, StoreError};

/// Register and login flows, plus bearer-token resolution for the web layer.
///
/// Holds no mutable state: every call is a function of its arguments, the
/// process-wide token settings, and reads/writes against the store.
#[derive(Clone)]
pub struct IdentityService {
    store: Arc<dyn Store>,
    credentials: CredentialManager,
    tokens: TokenSettings,
}

impl IdentityService {
    pub fn new(store: Arc<dyn Store>, credentials: CredentialManager, tokens: TokenSettings) -> Self {
        Self {
            store,
            credentials,
            tokens,
        }
    }

    /// Creates an identity and issues its first token.
    ///
    /// Returns `DuplicateEmail` if the email is taken, whether that is seen
    /// by the lookup or only by the store's unique constraint.
    pub async fn register(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        secret: &str,
    ) -> Result<(User, String), AuthError> {
        let email = normalize_email(email);

        if self.store.find_user_by_email(&email).await?.is_some() {
            debug!("Registration rejected, email already in use");
            return Err(AuthError::DuplicateEmail);
        }

        let credential = self.hash(secret).await?;
        let new_user = NewUser {
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            email,
            credential,
        };

        let user = self.store.create_user(new_user).await.map_err(|e| match e {
            StoreError::UniqueViolation => AuthError::DuplicateEmail,
            other => AuthError::Store(other),
        })?;

        let token = token::issue(user.id, &self.tokens.secret, self.tokens.ttl)?;
        info!("Registered user {}", user.id);
        Ok((user, token))
    }

    /// Verifies an email/password pair and issues a token.
    ///
    /// An unknown email and a wrong password both yield `InvalidCredentials`
    /// and cost one bcrypt computation each.
    pub async fn login(&self, email: &str, secret: &str) -> Result<(User, String), AuthError> {
        let email = normalize_email(email);
        let user = self.store.find_user_by_email(&email).await?;

        let verified = self.verify(secret, user.as_ref().map(User::credential)).await?;

        match user {
            Some(user) if verified => {
                let token = token::issue(user.id, &self.tokens.secret, self.tokens.ttl)?;
                info!("User {} logged in", user.id);
                Ok((user, token))
            }
            user => {
                warn!(
                    "Login failed for {} (account exists: {})",
                    email,
                    user.is_some()
                );
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// Resolves a bearer token to the identity it was issued for.
    pub fn authenticate(&self, token: &str) -> Result<Uuid, AuthError> {
        token::validate(token, &self.tokens.secret).map_err(|e| {
            debug!("Rejected bearer token: {}", e);
            e
        })
    }

    async fn hash(&self, secret: &str) -> Result<Credential, AuthError> {
        let manager = self.credentials;
        let secret = secret.to_string();
        task::spawn_blocking(move || manager.hash(&secret))
            .await
            .map_err(|e| AuthError::HashingFailure(e.to_string()))?
    }

    async fn verify(&self, secret: &str, credential: Option<Credential>) -> Result<bool, AuthError> {
        let manager = self.credentials;
        let secret = secret.to_string();
        task::spawn_blocking(move || match credential {
            Some(credential) => manager.verify(&secret, &credential),
            None => manager.verify_dummy(&secret),
        })
        .await
        .map_err(|e| AuthError::HashingFailure(e.to_string()))
    }
}
