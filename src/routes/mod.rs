pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::web;

use crate::error::{json_error_handler, path_error_handler, query_error_handler};

/// Routes mounted under `/api`. The caller wraps the scope in
/// [`crate::auth::AuthMiddleware`]. Extractor failures answer with the same
/// JSON error body as handler failures.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler));

    cfg.service(
        web::scope("/auth")
            .service(auth::login)
            .service(auth::register),
    )
    .service(
        web::scope("/tasks")
            .service(tasks::get_tasks)
            .service(tasks::create_task)
            .service(tasks::get_task)
            .service(tasks::update_task)
            .service(tasks::delete_task),
    );
}
