use crate::{
    auth::AuthenticatedUserId,
    error::AppError,
    models::{NewTaskRequest, TaskFilter, UpdateTaskRequest},
    tasks::TaskService,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

/// Retrieves the tasks visible to the authenticated user.
///
/// A task is visible when the user created it or is its assignee. Tasks are
/// ordered by creation date, newest first.
///
/// ## Query Parameters:
/// - `status` (optional): `pending`, `in_progress` or `complete`.
/// - `priority` (optional): `low`, `medium` or `high`.
///
/// ## Responses:
/// - `200 OK`: A JSON array of `Task` objects.
/// - `400 Bad Request`: An unknown status or priority value.
/// - `401 Unauthorized`: Missing or invalid token.
#[get("")]
pub async fn get_tasks(
    tasks: web::Data<TaskService>,
    query_params: web::Query<TaskFilter>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let tasks = tasks.list(user.0, &query_params).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a task owned by the authenticated user.
///
/// The creator is always the caller. `assignee_id` defaults to the caller and
/// must name an existing user otherwise.
///
/// ## Responses:
/// - `201 Created`: The new `Task`.
/// - `400 Bad Request`: Malformed body or unknown assignee.
/// - `401 Unauthorized`: Missing or invalid token.
/// - `422 Unprocessable Entity`: Title or description out of bounds.
#[post("")]
pub async fn create_task(
    tasks: web::Data<TaskService>,
    task_data: web::Json<NewTaskRequest>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = tasks.create(user.0, task_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(task))
}

/// Retrieves a single task.
///
/// ## Responses:
/// - `200 OK`: The `Task`.
/// - `401 Unauthorized`: Missing or invalid token.
/// - `404 Not Found`: The task does not exist or the caller is neither its
///   creator nor its assignee.
#[get("/{id}")]
pub async fn get_task(
    tasks: web::Data<TaskService>,
    task_id: web::Path<Uuid>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let task = tasks.get(user.0, task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Updates a task. Only the creator may do this; absent fields are kept.
///
/// ## Responses:
/// - `200 OK`: The updated `Task`.
/// - `400 Bad Request`: Malformed body or unknown assignee.
/// - `401 Unauthorized`: Missing or invalid token.
/// - `403 Forbidden`: The caller is the assignee but not the creator.
/// - `404 Not Found`: The task is not visible to the caller.
/// - `422 Unprocessable Entity`: Title or description out of bounds.
#[put("/{id}")]
pub async fn update_task(
    tasks: web::Data<TaskService>,
    task_id: web::Path<Uuid>,
    task_data: web::Json<UpdateTaskRequest>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = tasks
        .update(user.0, task_id.into_inner(), task_data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task. Only the creator may do this.
///
/// ## Responses:
/// - `204 No Content`: On successful deletion.
/// - `401 Unauthorized`: Missing or invalid token.
/// - `403 Forbidden`: The caller is the assignee but not the creator.
/// - `404 Not Found`: The task is not visible to the caller.
#[delete("/{id}")]
pub async fn delete_task(
    tasks: web::Data<TaskService>,
    task_id: web::Path<Uuid>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    tasks.delete(user.0, task_id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use crate::models::NewTaskRequest;
    use chrono::Utc;
    use validator::Validate;

    fn input(title: String, description: String) -> NewTaskRequest {
        NewTaskRequest {
            title,
            description,
            status: None,
            priority: None,
            due_date: Utc::now(),
            assignee_id: None,
        }
    }

    #[test]
    fn test_task_input_validation() {
        assert!(input(String::new(), "Test Description".into())
            .validate()
            .is_err());
        assert!(input("a".repeat(201), "Test Description".into())
            .validate()
            .is_err());
        assert!(input("Valid title".into(), "b".repeat(1001))
            .validate()
            .is_err());
        assert!(input("Valid title".into(), String::new())
            .validate()
            .is_err());
        assert!(input("Valid Title".into(), "Test Description".into())
            .validate()
            .is_ok());
    }
}
