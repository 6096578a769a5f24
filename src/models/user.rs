use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::auth::password::Credential;

/// A registered identity, uniquely keyed by email.
///
/// The stored credential is never serialized, so a `User` can be returned
/// from the API as-is.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Immutable identifier, also used as the token subject.
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    /// Normalized (trimmed, lower-cased) email address.
    pub email: String,
    /// bcrypt hash of the user's password.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Builds a fresh identity from registration data.
    pub fn new(input: NewUser) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            password_hash: input.credential.into_inner(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn credential(&self) -> Credential {
        Credential::from_stored(self.password_hash.clone())
    }
}

/// Data required to persist a new identity.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub credential: Credential,
}

/// Trims and lower-cases an email so lookups and the unique key agree.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
