use bcrypt::{hash, verify};
use log::{error, warn};

use crate::auth::error::AuthError;

/// bcrypt's own default work factor.
pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;
pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

/// Salt and digest of a fixed bcrypt hash. Only used to spend verification work.
const DUMMY_SALT_AND_DIGEST: &str = "CCCCCCCCCCCCCCCCCCCCC.E5YPO9kmyuRGyh0XouQYb4YMJKvyOeW";

/// One-way hash of a password in bcrypt modular-crypt format.
///
/// The salt and cost are embedded in the string, so a credential can be
/// verified without any other state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps a hash loaded from storage.
    pub fn from_stored(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Hashes and verifies passwords with a fixed bcrypt cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialManager {
    cost: u32,
}

impl CredentialManager {
    pub fn new(cost: u32) -> Result<Self, AuthError> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(AuthError::Configuration(format!(
                "bcrypt cost must be between {} and {}, got {}",
                MIN_COST, MAX_COST, cost
            )));
        }
        Ok(Self { cost })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hashes `secret` with a fresh random salt.
    pub fn hash(&self, secret: &str) -> Result<Credential, AuthError> {
        hash(secret, self.cost).map(Credential).map_err(|e| {
            error!("Failed to hash password: {}", e);
            AuthError::HashingFailure(e.to_string())
        })
    }

    /// Returns whether `secret` matches `credential`.
    ///
    /// A stored credential that cannot be parsed counts as a mismatch.
    pub fn verify(&self, secret: &str, credential: &Credential) -> bool {
        match verify(secret, credential.as_str()) {
            Ok(matches) => matches,
            Err(e) => {
                warn!("Stored credential could not be verified: {}", e);
                false
            }
        }
    }

    /// Spends the same work as [`verify`](Self::verify) and always fails.
    /// Used when the login email is unknown.
    pub fn verify_dummy(&self, secret: &str) -> bool {
        let dummy = self.dummy_credential();
        match verify(secret, dummy.as_str()) {
            Ok(_) => false,
            Err(e) => {
                error!("Dummy credential could not be verified: {}", e);
                false
            }
        }
    }

    fn dummy_credential(&self) -> Credential {
        Credential(format!("$2b${:02}${}", self.cost, DUMMY_SALT_AND_DIGEST))
    }
}

impl Default for CredentialManager {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}
