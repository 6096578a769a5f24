use actix_web::{get, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

/// Liveness probe, served outside `/api` and without authentication.
///
/// Touches neither the store nor the token settings, so it answers even when
/// the database is unreachable.
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "message": "TaskGate API is running",
        "timestamp": Utc::now()
    }))
}
