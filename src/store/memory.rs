use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Store, StoreError};
use crate::models::{NewTask, NewUser, Task, TaskChanges, TaskFilter, User};

/// In-process store keeping identities and tasks in hash maps.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    tasks: RwLock<HashMap<Uuid, Task>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|user| user.email == new_user.email) {
            return Err(StoreError::UniqueViolation);
        }
        let user = User::new(new_user);
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_task_by_id(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        Ok(self.tasks.read().await.get(&id).cloned())
    }

    async fn list_tasks_for_user(
        &self,
        user_id: Uuid,
        filter: &TaskFilter,
    ) -> Result<Vec<Task>, StoreError> {
        let tasks = self.tasks.read().await;
        let mut visible: Vec<Task> = tasks
            .values()
            .filter(|task| task.creator_id == user_id || task.assignee_id == user_id)
            .filter(|task| filter.matches(task))
            .cloned()
            .collect();
        visible.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(visible)
    }

    async fn create_task(&self, new_task: NewTask) -> Result<Task, StoreError> {
        {
            let users = self.users.read().await;
            if !users.contains_key(&new_task.creator_id)
                || !users.contains_key(&new_task.assignee_id)
            {
                return Err(StoreError::MissingReference);
            }
        }
        let task = Task::new(new_task);
        self.tasks.write().await.insert(task.id, task.clone());
        Ok(task)
    }

    async fn update_task(&self, id: Uuid, changes: TaskChanges) -> Result<Task, StoreError> {
        if let Some(assignee_id) = changes.assignee_id {
            if !self.users.read().await.contains_key(&assignee_id) {
                return Err(StoreError::MissingReference);
            }
        }
        let mut tasks = self.tasks.write().await;
        let task = tasks.get_mut(&id).ok_or(StoreError::NotFound)?;
        task.apply(changes);
        Ok(task.clone())
    }

    async fn delete_task(&self, id: Uuid) -> Result<(), StoreError> {
        self.tasks
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::Credential;
    use crate::models::{TaskPriority, TaskStatus};
    use chrono::Utc;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: email.to_string(),
            credential: Credential::from_stored("hash"),
        }
    }

    fn new_task(creator: Uuid, assignee: Uuid, status: TaskStatus) -> NewTask {
        NewTask {
            title: "Task".to_string(),
            description: "Description".to_string(),
            status,
            priority: TaskPriority::Medium,
            due_date: Utc::now(),
            creator_id: creator,
            assignee_id: assignee,
        }
    }

    #[actix_rt::test]
    async fn test_email_is_unique() {
        let store = MemoryStore::new();
        store.create_user(new_user("a@x.com")).await.unwrap();

        let err = store.create_user(new_user("a@x.com")).await.unwrap_err();
        assert_eq!(err, StoreError::UniqueViolation);
    }

    #[actix_rt::test]
    async fn test_task_requires_existing_identities() {
        let store = MemoryStore::new();
        let alice = store.create_user(new_user("a@x.com")).await.unwrap();

        let err = store
            .create_task(new_task(alice.id, Uuid::new_v4(), TaskStatus::Pending))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::MissingReference);
    }

    #[actix_rt::test]
    async fn test_list_covers_creator_and_assignee_with_filter() {
        let store = MemoryStore::new();
        let alice = store.create_user(new_user("a@x.com")).await.unwrap();
        let bob = store.create_user(new_user("b@x.com")).await.unwrap();
        let carol = store.create_user(new_user("c@x.com")).await.unwrap();

        store
            .create_task(new_task(alice.id, bob.id, TaskStatus::Pending))
            .await
            .unwrap();
        store
            .create_task(new_task(alice.id, alice.id, TaskStatus::Complete))
            .await
            .unwrap();

        let all = TaskFilter::default();
        assert_eq!(store.list_tasks_for_user(alice.id, &all).await.unwrap().len(), 2);
        assert_eq!(store.list_tasks_for_user(bob.id, &all).await.unwrap().len(), 1);
        assert!(store.list_tasks_for_user(carol.id, &all).await.unwrap().is_empty());

        let complete = TaskFilter {
            status: Some(TaskStatus::Complete),
            priority: None,
        };
        assert_eq!(
            store.list_tasks_for_user(alice.id, &complete).await.unwrap().len(),
            1
        );
    }

    #[actix_rt::test]
    async fn test_update_and_delete_missing_task() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();

        assert_eq!(
            store.update_task(id, TaskChanges::default()).await.unwrap_err(),
            StoreError::NotFound
        );
        assert_eq!(store.delete_task(id).await.unwrap_err(), StoreError::NotFound);
    }
}
