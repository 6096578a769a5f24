use std::sync::Arc;

use log::info;
use uuid::Uuid;

use crate::access::{self, AccessError};
use crate::models::{NewTask, NewTaskRequest, Task, TaskChanges, TaskFilter, UpdateTaskRequest};
use crate::store::{Store, StoreError};

/// Task operations on behalf of an authenticated actor, each guarded by the
/// access rules in [`crate::access`].
///
/// Update and delete check visibility before ownership: an actor with no
/// relation to the task gets `NotVisible`, the same answer as for a task that
/// does not exist. Only the assignee, who can already see the task, is told
/// `NotPermitted`.
#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn Store>,
}

impl TaskService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create(&self, actor: Uuid, request: NewTaskRequest) -> Result<Task, AccessError> {
        let assignee = access::can_create(self.store.as_ref(), actor, request.assignee_id).await?;
        let task = self
            .store
            .create_task(NewTask::from_request(request, actor, assignee))
            .await
            .map_err(|e| match e {
                StoreError::MissingReference => AccessError::AssigneeNotFound(assignee),
                other => AccessError::Store(other),
            })?;
        info!("User {} created task {}", actor, task.id);
        Ok(task)
    }

    pub async fn list(&self, actor: Uuid, filter: &TaskFilter) -> Result<Vec<Task>, AccessError> {
        Ok(self.store.list_tasks_for_user(actor, filter).await?)
    }

    pub async fn get(&self, actor: Uuid, id: Uuid) -> Result<Task, AccessError> {
        self.visible_task(actor, id).await
    }

    /// Applies the present fields of `request`. The creator is never part of
    /// an update.
    pub async fn update(
        &self,
        actor: Uuid,
        id: Uuid,
        request: UpdateTaskRequest,
    ) -> Result<Task, AccessError> {
        let task = self.visible_task(actor, id).await?;
        access::can_mutate(actor, &task)?;
        if let Some(new_assignee) = request.assignee_id {
            access::can_reassign(self.store.as_ref(), actor, &task, new_assignee).await?;
        }

        let changes = TaskChanges::from(request);
        if changes.is_empty() {
            return Ok(task);
        }

        let assignee = changes.assignee_id;
        let updated = self.store.update_task(id, changes).await.map_err(|e| match e {
            StoreError::NotFound => AccessError::NotVisible,
            StoreError::MissingReference => {
                AccessError::AssigneeNotFound(assignee.unwrap_or(task.assignee_id))
            }
            other => AccessError::Store(other),
        })?;
        info!("User {} updated task {}", actor, id);
        Ok(updated)
    }

    pub async fn delete(&self, actor: Uuid, id: Uuid) -> Result<(), AccessError> {
        let task = self.visible_task(actor, id).await?;
        access::can_mutate(actor, &task)?;

        self.store.delete_task(id).await.map_err(|e| match e {
            StoreError::NotFound => AccessError::NotVisible,
            other => AccessError::Store(other),
        })?;
        info!("User {} deleted task {}", actor, id);
        Ok(())
    }

    async fn visible_task(&self, actor: Uuid, id: Uuid) -> Result<Task, AccessError> {
        let task = self
            .store
            .find_task_by_id(id)
            .await?
            .ok_or(AccessError::NotVisible)?;
        access::can_read(actor, &task)?;
        Ok(task)
    }
}
