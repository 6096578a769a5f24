pub mod task;
pub mod user;

pub use task::{
    NewTask, NewTaskRequest, Task, TaskChanges, TaskFilter, TaskPriority, TaskStatus,
    UpdateTaskRequest,
};
pub use user::{normalize_email, NewUser, User};
