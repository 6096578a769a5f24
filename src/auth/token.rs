use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::error::AuthError;

/// The only algorithm tokens are signed with or accepted under.
const ALGORITHM: Algorithm = Algorithm::HS256;

/// Represents the claims encoded within a token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the user's id.
    pub sub: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Symmetric key used to sign and verify tokens.
#[derive(Clone)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, AuthError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(AuthError::Configuration(
                "signing secret must not be empty".into(),
            ));
        }
        Ok(Self(bytes))
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(..)")
    }
}

/// Process-wide token configuration: the signing secret and token lifetime.
#[derive(Debug, Clone)]
pub struct TokenSettings {
    pub secret: SigningSecret,
    pub ttl: Duration,
}

impl TokenSettings {
    /// Builds settings from a raw secret and a human duration such as `24h`.
    pub fn new(secret: impl Into<Vec<u8>>, ttl: &str) -> Result<Self, AuthError> {
        Ok(Self {
            secret: SigningSecret::new(secret)?,
            ttl: parse_ttl(ttl)?,
        })
    }
}

/// Parses a token lifetime like `24h`, `90m` or `1h 30m`.
pub fn parse_ttl(raw: &str) -> Result<Duration, AuthError> {
    let ttl = humantime::parse_duration(raw.trim())
        .map_err(|e| AuthError::Configuration(format!("invalid token ttl '{}': {}", raw, e)))?;
    if ttl.is_zero() {
        return Err(AuthError::Configuration("token ttl must be positive".into()));
    }
    Ok(ttl)
}

/// Issues a token for `subject`, valid for `ttl` from now.
pub fn issue(subject: Uuid, secret: &SigningSecret, ttl: Duration) -> Result<String, AuthError> {
    issue_at(subject, secret, ttl, Utc::now())
}

/// Issues a token as if the current time were `now`.
pub fn issue_at(
    subject: Uuid,
    secret: &SigningSecret,
    ttl: Duration,
    now: DateTime<Utc>,
) -> Result<String, AuthError> {
    if ttl.is_zero() {
        return Err(AuthError::Configuration("token ttl must be positive".into()));
    }
    let expires_at = chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| AuthError::Configuration(format!("token ttl {:?} is out of range", ttl)))?;

    let claims = Claims {
        sub: subject.to_string(),
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
    };

    encode(
        &Header::new(ALGORITHM),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::Configuration(format!("failed to sign token: {}", e)))
}

/// Verifies a token and returns its subject.
///
/// The signature is checked before expiry, so a token signed with another key
/// reports `InvalidSignature` even if it is also expired. Tokens declaring any
/// algorithm other than HS256 are refused as `InvalidSignature`.
pub fn validate(token: &str, secret: &SigningSecret) -> Result<Uuid, AuthError> {
    let mut validation = Validation::new(ALGORITHM);
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map_err(classify)?;

    Uuid::parse_str(&data.claims.sub).map_err(|_| AuthError::Malformed)
}

fn classify(error: jsonwebtoken::errors::Error) -> AuthError {
    match error.kind() {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => AuthError::InvalidSignature,
        ErrorKind::ExpiredSignature => AuthError::Expired,
        _ => AuthError::Malformed,
    }
}
