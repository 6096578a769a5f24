//! Persistence boundary for identities and tasks.
//!
//! The core never talks to a database directly; it goes through the [`Store`]
//! trait, which exposes single-record operations keyed by primary key or by
//! the unique email. [`PgStore`] backs the service in production and
//! [`MemoryStore`] backs tests and database-less local runs.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{NewTask, NewUser, Task, TaskChanges, TaskFilter, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors reported by a [`Store`] implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A unique constraint (the user email) rejected the write.
    #[error("unique constraint violated")]
    UniqueViolation,
    /// A referenced identity does not exist.
    #[error("referenced record does not exist")]
    MissingReference,
    /// The targeted record does not exist.
    #[error("record not found")]
    NotFound,
    #[error("database error: {0}")]
    Database(String),
}

/// Converts `sqlx::Error` into `StoreError`.
///
/// `RowNotFound` maps to `NotFound`; unique and foreign-key violations keep
/// their meaning so callers can report them as domain errors.
impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::UniqueViolation,
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                StoreError::MissingReference
            }
            _ => StoreError::Database(error.to_string()),
        }
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Persists a new identity. Fails with `UniqueViolation` if the email is
    /// already taken.
    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError>;

    async fn find_task_by_id(&self, id: Uuid) -> Result<Option<Task>, StoreError>;

    /// Tasks the user created or is assigned to, newest first.
    async fn list_tasks_for_user(
        &self,
        user_id: Uuid,
        filter: &TaskFilter,
    ) -> Result<Vec<Task>, StoreError>;

    /// Fails with `MissingReference` if creator or assignee do not exist.
    async fn create_task(&self, new_task: NewTask) -> Result<Task, StoreError>;

    /// Applies a field-level partial update. Fails with `NotFound` if the
    /// task no longer exists.
    async fn update_task(&self, id: Uuid, changes: TaskChanges) -> Result<Task, StoreError>;

    async fn delete_task(&self, id: Uuid) -> Result<(), StoreError>;
}
