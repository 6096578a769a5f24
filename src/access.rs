//! Per-request authorization decisions for tasks.
//!
//! Exactly two identities relate to a task: its creator and its assignee.
//! Both may read it; only the creator may change or delete it. A failed read
//! is reported as `NotVisible` (rendered as 404 so task ids do not leak), a
//! failed write as `NotPermitted` (rendered as 403).

use thiserror::Error;
use uuid::Uuid;

use crate::models::Task;
use crate::store::{Store, StoreError};

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("assignee {0} does not exist")]
    AssigneeNotFound(Uuid),
    #[error("task not found")]
    NotVisible,
    #[error("only the task creator may modify this task")]
    NotPermitted,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Any authenticated actor may create a task. Returns the effective assignee:
/// the actor when none (or the actor) is proposed, otherwise the proposed
/// identity, which must exist.
pub async fn can_create(
    store: &dyn Store,
    actor: Uuid,
    proposed_assignee: Option<Uuid>,
) -> Result<Uuid, AccessError> {
    match proposed_assignee {
        None => Ok(actor),
        Some(assignee) if assignee == actor => Ok(actor),
        Some(assignee) => {
            ensure_identity_exists(store, assignee).await?;
            Ok(assignee)
        }
    }
}

pub fn can_read(actor: Uuid, task: &Task) -> Result<(), AccessError> {
    if actor == task.creator_id || actor == task.assignee_id {
        Ok(())
    } else {
        Err(AccessError::NotVisible)
    }
}

/// Covers both update and delete.
pub fn can_mutate(actor: Uuid, task: &Task) -> Result<(), AccessError> {
    if actor == task.creator_id {
        Ok(())
    } else {
        Err(AccessError::NotPermitted)
    }
}

/// Moving a task to another assignee is a creator-only mutation, and the new
/// assignee must exist.
pub async fn can_reassign(
    store: &dyn Store,
    actor: Uuid,
    task: &Task,
    new_assignee: Uuid,
) -> Result<(), AccessError> {
    can_mutate(actor, task)?;
    if new_assignee == task.assignee_id || new_assignee == task.creator_id {
        return Ok(());
    }
    ensure_identity_exists(store, new_assignee).await
}

async fn ensure_identity_exists(store: &dyn Store, id: Uuid) -> Result<(), AccessError> {
    match store.find_user_by_id(id).await? {
        Some(_) => Ok(()),
        None => Err(AccessError::AssigneeNotFound(id)),
    }
}
