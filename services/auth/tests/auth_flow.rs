//! End-to-end register / login / me flow against PostgreSQL

use auth::{
    AppState,
    rate_limiter::{RateLimiter, RateLimiterConfig},
    routes::create_router,
};
use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use common::{
    database::{DatabaseConfig, init_pool, run_migrations},
    token::{TokenConfig, TokenService},
};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn app() -> axum::Router {
    let config = DatabaseConfig::from_env().expect("database config");
    let pool = init_pool(&config).await.expect("database pool");
    run_migrations(&pool).await.expect("migrations");

    create_router(AppState::new(
        pool,
        TokenService::new(&TokenConfig {
            secret: "integration-secret".to_string(),
            expiry_hours: 1,
        }),
        RateLimiter::new(RateLimiterConfig::default()),
        "/uploads/profiles/default-avatar.png".to_string(),
    ))
}

async fn call(app: &axum::Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn json_post(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn register_login_and_me() {
    let app = app().await;
    let suffix = &uuid::Uuid::new_v4().simple().to_string()[..8];
    let username = format!("user_{}", suffix);
    let email = format!("{}@Example.com", username);

    let (status, body) = call(
        &app,
        json_post(
            "/api/auth/register",
            json!({"username": username, "name": "Test User", "email": email, "password": "password123"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["expiresIn"], 3600);
    assert_eq!(body["data"]["user"]["email"], email.to_lowercase());
    assert_eq!(
        body["data"]["user"]["profilePicture"],
        "/uploads/profiles/default-avatar.png"
    );

    // Same username again
    let (status, _) = call(
        &app,
        json_post(
            "/api/auth/register",
            json!({"username": username, "name": "Test User", "email": format!("other_{}", email), "password": "password123"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(
        &app,
        json_post(
            "/api/auth/login",
            json!({"email": email, "password": "wrong-password"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = call(
        &app,
        json_post(
            "/api/auth/login",
            json!({"username": username, "password": "password123"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = call(
        &app,
        Request::get("/api/auth/me")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["username"], username);
}
