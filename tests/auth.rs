use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::middleware::Logger;
use actix_web::{test, web, App};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use taskgate::auth::password::MIN_COST;
use taskgate::auth::{token, AuthMiddleware, CredentialManager, IdentityService, TokenSettings};
use taskgate::cors::{build_cors, CorsSettings};
use taskgate::routes::{self, health};
use taskgate::store::MemoryStore;
use taskgate::tasks::TaskService;

const SECRET: &str = "integration-test-secret";

macro_rules! test_app {
    () => {{
        let store = Arc::new(MemoryStore::new());
        let identity = IdentityService::new(
            store.clone(),
            CredentialManager::new(MIN_COST).unwrap(),
            TokenSettings::new(SECRET, "1h").unwrap(),
        );
        test::init_service(
            App::new()
                .app_data(web::Data::new(identity))
                .app_data(web::Data::new(TaskService::new(store)))
                .wrap(build_cors(CorsSettings::default()))
                .wrap(Logger::default())
                .service(health::health)
                .service(
                    web::scope("/api")
                        .wrap(AuthMiddleware)
                        .configure(routes::config),
                ),
        )
        .await
    }};
}

fn alice() -> Value {
    json!({
        "first_name": "Alice",
        "last_name": "Liddell",
        "email": "alice@example.com",
        "password": "Password123!"
    })
}

#[actix_rt::test]
async fn test_register_and_login_flow() {
    let app = test_app!();

    // Register a new user
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(alice())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let registered: Value = test::read_body_json(resp).await;
    let user_id = registered["user"]["id"].as_str().unwrap().to_string();
    assert_eq!(registered["user"]["email"], "alice@example.com");
    assert!(registered["user"].get("password_hash").is_none());
    assert!(!registered["token"].as_str().unwrap().is_empty());

    // The same email again, differently cased
    let mut duplicate = alice();
    duplicate["email"] = json!("Alice@Example.com");
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(&duplicate)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Login
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "alice@example.com", "password": "Password123!" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let logged_in: Value = test::read_body_json(resp).await;
    assert_eq!(logged_in["user"]["id"], json!(user_id));

    // The login token authenticates as the registered identity
    let token = logged_in["token"].as_str().unwrap();
    let secret = taskgate::auth::SigningSecret::new(SECRET).unwrap();
    assert_eq!(token::validate(token, &secret).unwrap().to_string(), user_id);

    let req = test::TestRequest::get()
        .uri("/api/tasks")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let tasks: Value = test::read_body_json(resp).await;
    assert_eq!(tasks, json!([]));
}

#[actix_rt::test]
async fn test_login_failures_are_indistinguishable() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(alice())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let mut bodies = Vec::new();
    for payload in [
        json!({ "email": "alice@example.com", "password": "wrong-password" }),
        json!({ "email": "nobody@example.com", "password": "Password123!" }),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        bodies.push(test::read_body(resp).await);
    }

    assert_eq!(bodies[0], bodies[1]);
}

#[actix_rt::test]
async fn test_invalid_registration_inputs() {
    let app = test_app!();

    let test_cases = vec![
        // Deserialization errors
        (
            json!({ "last_name": "Doe", "email": "test@example.com", "password": "Password123!" }),
            StatusCode::BAD_REQUEST,
            "missing first name",
        ),
        (
            json!({ "first_name": "Jane", "last_name": "Doe", "password": "Password123!" }),
            StatusCode::BAD_REQUEST,
            "missing email",
        ),
        (
            json!({ "first_name": "Jane", "last_name": "Doe", "email": "test@example.com" }),
            StatusCode::BAD_REQUEST,
            "missing password",
        ),
        // Validation errors
        (
            json!({ "first_name": "Jane", "last_name": "Doe", "email": "invalid-email", "password": "Password123!" }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "invalid email format",
        ),
        (
            json!({ "first_name": "J", "last_name": "Doe", "email": "test@example.com", "password": "Password123!" }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "first name too short",
        ),
        (
            json!({ "first_name": "Jane", "last_name": "D".repeat(51), "email": "test@example.com", "password": "Password123!" }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "last name too long",
        ),
        (
            json!({ "first_name": "   ", "last_name": "Doe", "email": "test@example.com", "password": "Password123!" }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "blank first name",
        ),
        (
            json!({ "first_name": "Jane", "last_name": " A", "email": "test@example.com", "password": "Password123!" }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "last name short once trimmed",
        ),
        (
            json!({ "first_name": "Jane99", "last_name": "Doe", "email": "test@example.com", "password": "Password123!" }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "first name with digits",
        ),
        (
            json!({ "first_name": "Jane", "last_name": "Doe", "email": "test@example.com", "password": "123" }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "password too short",
        ),
    ];

    for (payload, expected_status, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(&payload)
            .to_request();

        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body_bytes = test::read_body(resp).await;

        assert_eq!(
            status,
            expected_status,
            "Test case failed: {}. Body: {:?}",
            description,
            String::from_utf8_lossy(&body_bytes)
        );
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);
        assert!(
            body["error"].is_string(),
            "Test case failed: {}. Expected a JSON error body, got {:?}",
            description,
            String::from_utf8_lossy(&body_bytes)
        );
    }

    // A body that is not JSON at all
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
}

#[actix_rt::test]
async fn test_protected_routes_require_valid_token() {
    let app = test_app!();

    let expired = token::issue_at(
        uuid::Uuid::new_v4(),
        &taskgate::auth::SigningSecret::new(SECRET).unwrap(),
        std::time::Duration::from_secs(60),
        chrono::Utc::now() - chrono::Duration::hours(1),
    )
    .unwrap();
    let foreign = token::issue(
        uuid::Uuid::new_v4(),
        &taskgate::auth::SigningSecret::new("some-other-secret").unwrap(),
        std::time::Duration::from_secs(60),
    )
    .unwrap();

    let headers = vec![
        None,
        Some("Bearer".to_string()),
        Some("Basic dXNlcjpwYXNz".to_string()),
        Some("Bearer not.a.token".to_string()),
        Some(format!("Bearer {}", expired)),
        Some(format!("Bearer {}", foreign)),
    ];

    let mut bodies = Vec::new();
    for header in headers {
        let mut req = test::TestRequest::get().uri("/api/tasks");
        if let Some(value) = &header {
            req = req.insert_header(("Authorization", value.as_str()));
        }
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "header: {:?}", header);
        bodies.push(test::read_body(resp).await);
    }

    // The token failures (malformed, expired, foreign) share one body.
    assert_eq!(bodies[3], bodies[4]);
    assert_eq!(bodies[4], bodies[5]);
}

#[actix_rt::test]
async fn test_health_is_public() {
    let app = test_app!();

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
}
