pub mod error;
pub mod extractors;
pub mod identity;
pub mod middleware;
pub mod password;
pub mod token;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::User;

// Re-export necessary items
pub use error::AuthError;
pub use extractors::AuthenticatedUserId;
pub use identity::IdentityService;
pub use middleware::AuthMiddleware;
pub use password::{Credential, CredentialManager};
pub use token::{Claims, SigningSecret, TokenSettings};

lazy_static! {
    // Letters (any script) and spaces
    static ref NAME_REGEX: regex::Regex = regex::Regex::new(r"^[\p{L}\s]+$").unwrap();
}

/// Names are stored trimmed, so the length bounds apply to the trimmed value.
fn validate_name_length(name: &str) -> Result<(), ValidationError> {
    let length = name.trim().chars().count();
    if (2..=50).contains(&length) {
        Ok(())
    } else {
        let mut error = ValidationError::new("length");
        error.message = Some("Name must be between 2 and 50 characters".into());
        Err(error)
    }
}

/// Represents the payload for a user login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Between 2 and 50 characters, letters and spaces only.
    #[validate(
        custom = "validate_name_length",
        regex(path = "NAME_REGEX", message = "First name may only contain letters and spaces")
    )]
    pub first_name: String,
    /// Between 2 and 50 characters, letters and spaces only.
    #[validate(
        custom = "validate_name_length",
        regex(path = "NAME_REGEX", message = "Last name may only contain letters and spaces")
    )]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    /// Between 6 and 100 characters.
    #[validate(length(min = 6, max = 100))]
    pub password: String,
}

/// Response body for a successful registration or login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Bearer token for subsequent requests.
    pub token: String,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(first_name: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            first_name: first_name.to_string(),
            last_name: "Núñez".to_string(),
            email: "test@example.com".to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_login_request_validation() {
        let valid_login = LoginRequest {
            email: "test@example.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(valid_login.validate().is_ok());

        let invalid_email_login = LoginRequest {
            email: "testexample.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(invalid_email_login.validate().is_err());
    }

    #[test]
    fn test_register_request_validation() {
        assert!(register("María José", "password123").validate().is_ok());
        assert!(register("R2D2", "password123").validate().is_err());
        assert!(register("A", "password123").validate().is_err());
        assert!(register("   ", "password123").validate().is_err());
        assert!(register(" A", "password123").validate().is_err());
        assert!(register("  Al  ", "password123").validate().is_ok());
        assert!(register(&"a".repeat(51), "password123").validate().is_err());
        assert!(register("Alice", "12345").validate().is_err());
        assert!(register("Alice", &"p".repeat(101)).validate().is_err());
    }
}
