use async_trait::async_trait;
use log::info;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use uuid::Uuid;

use super::{Store, StoreError};
use crate::models::{NewTask, NewUser, Task, TaskChanges, TaskFilter, User};

const USER_COLUMNS: &str =
    "id, first_name, last_name, email, password_hash, created_at, updated_at";

const TASK_COLUMNS: &str = "id, title, description, status, priority, due_date, \
     creator_id, assignee_id, created_at, updated_at";

/// PostgreSQL-backed store on a `sqlx` connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(25)
            .max_lifetime(Duration::from_secs(5 * 60))
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Applies the embedded migrations in `./migrations`.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("migration failed: {}", e)))?;
        info!("Database migrations applied");
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let user = User::new(new_user);
        let created = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, first_name, last_name, email, password_hash, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn find_task_by_id(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = $1",
            TASK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }

    async fn list_tasks_for_user(
        &self,
        user_id: Uuid,
        filter: &TaskFilter,
    ) -> Result<Vec<Task>, StoreError> {
        // Absent filters bind as NULL and match every row.
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks \
             WHERE (creator_id = $1 OR assignee_id = $1) \
               AND ($2::task_status IS NULL OR status = $2) \
               AND ($3::task_priority IS NULL OR priority = $3) \
             ORDER BY created_at DESC",
            TASK_COLUMNS
        ))
        .bind(user_id)
        .bind(filter.status)
        .bind(filter.priority)
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }

    async fn create_task(&self, new_task: NewTask) -> Result<Task, StoreError> {
        let task = Task::new(new_task);
        let created = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (id, title, description, status, priority, due_date, creator_id, assignee_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status)
        .bind(task.priority)
        .bind(task.due_date)
        .bind(task.creator_id)
        .bind(task.assignee_id)
        .bind(task.created_at)
        .bind(task.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn update_task(&self, id: Uuid, changes: TaskChanges) -> Result<Task, StoreError> {
        let updated = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks SET \
               title = COALESCE($2, title), \
               description = COALESCE($3, description), \
               status = COALESCE($4, status), \
               priority = COALESCE($5, priority), \
               due_date = COALESCE($6, due_date), \
               assignee_id = COALESCE($7, assignee_id), \
               updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(id)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.status)
        .bind(changes.priority)
        .bind(changes.due_date)
        .bind(changes.assignee_id)
        .fetch_optional(&self.pool)
        .await?;
        updated.ok_or(StoreError::NotFound)
    }

    async fn delete_task(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
