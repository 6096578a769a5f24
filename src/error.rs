//!
//! # HTTP Error Mapping
//!
//! This module defines `AppError`, the error type every handler returns.
//! Core errors (`AuthError`, `AccessError`, `StoreError`) and validation
//! failures convert into it with `?`, and `AppError` implements
//! `actix_web::error::ResponseError` to render a status code and a
//! `{ "error": message }` JSON body.
//!
//! The mapping hides what callers must not learn: every token failure is the
//! same 401, an unknown email and a wrong password are the same 401, and a
//! task the caller cannot see is a 404. Internal details are logged, not sent.

use actix_web::{
    error::{JsonPayloadError, PathError, QueryPayloadError, ResponseError},
    http::StatusCode,
    HttpRequest, HttpResponse,
};
use log::{debug, error};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

use crate::access::AccessError;
use crate::auth::AuthError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    /// HTTP 401.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// HTTP 400.
    #[error("Bad Request: {0}")]
    BadRequest(String),
    /// HTTP 403.
    #[error("Forbidden: {0}")]
    Forbidden(String),
    /// HTTP 404.
    #[error("Not Found: {0}")]
    NotFound(String),
    /// HTTP 422, with the validator's field messages.
    #[error("Validation Error: {0}")]
    ValidationError(String),
    /// HTTP 500. The message is generic; details go to the log.
    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
}

impl AppError {
    fn message(&self) -> &str {
        match self {
            AppError::Unauthorized(msg)
            | AppError::BadRequest(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::ValidationError(msg)
            | AppError::InternalServerError(msg) => msg,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.message()
        }))
    }
}

impl From<AuthError> for AppError {
    fn from(error: AuthError) -> AppError {
        match error {
            AuthError::Malformed | AuthError::InvalidSignature | AuthError::Expired => {
                debug!("Token rejected: {}", error);
                AppError::Unauthorized("Invalid or expired token".into())
            }
            AuthError::InvalidCredentials => AppError::Unauthorized("Invalid credentials".into()),
            AuthError::DuplicateEmail => AppError::BadRequest("Email already registered".into()),
            AuthError::Store(store_error) => store_error.into(),
            AuthError::HashingFailure(_) | AuthError::Configuration(_) => {
                error!("Identity core failure: {}", error);
                AppError::InternalServerError("Internal server error".into())
            }
        }
    }
}

impl From<AccessError> for AppError {
    fn from(error: AccessError) -> AppError {
        match error {
            AccessError::AssigneeNotFound(id) => {
                AppError::BadRequest(format!("Assignee {} does not exist", id))
            }
            AccessError::NotVisible => AppError::NotFound("Task not found".into()),
            AccessError::NotPermitted => {
                AppError::Forbidden("Only the task creator may modify this task".into())
            }
            AccessError::Store(store_error) => store_error.into(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        error!("Store failure: {}", error);
        AppError::InternalServerError("Internal server error".into())
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`.
///
/// The detailed validation messages are preserved.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// Renders unreadable JSON bodies (bad syntax, missing fields, wrong types)
/// as a 400 with the usual error body.
pub fn json_error_handler(error: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("Rejected body on {}: {}", req.path(), error);
    AppError::BadRequest(format!("Invalid request body: {}", error)).into()
}

pub fn query_error_handler(error: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("Rejected query on {}: {}", req.path(), error);
    AppError::BadRequest(format!("Invalid query parameters: {}", error)).into()
}

/// A path segment that is not a valid id cannot name a visible task.
pub fn path_error_handler(error: PathError, req: &HttpRequest) -> actix_web::Error {
    debug!("Rejected path {}: {}", req.path(), error);
    AppError::NotFound("Task not found".into()).into()
}
