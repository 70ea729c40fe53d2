/// Common test utilities for integration tests
///
/// Builds a real router over a real database. Tests that need this context
/// skip themselves when `DATABASE_URL` is not set, so the unit-test suite
/// stays runnable without infrastructure.
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use sqlx::PgPool;
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use taskboard_shared::db::migrations::run_migrations;
use tower::Service as _;
use uuid::Uuid;

/// Secret used by every test token
pub const TEST_SECRET: &str = "integration-test-secret-32-bytes!!";

/// Test context: the app under test plus direct database access
pub struct TestContext {
    pub db: PgPool,
    pub app: Router,
}

impl TestContext {
    /// Creates a context over `DATABASE_URL`, or None to skip the test
    pub async fn try_new() -> Option<Self> {
        let url = match std::env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => {
                eprintln!("DATABASE_URL not set; skipping integration test");
                return None;
            }
        };

        let db = PgPool::connect(&url)
            .await
            .expect("failed to connect to test database");

        run_migrations(&db).await.expect("migrations should apply");

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database: DatabaseConfig {
                url,
                max_connections: 5,
            },
            jwt: JwtConfig {
                secret: TEST_SECRET.to_string(),
            },
        };

        let app = build_router(AppState::new(db.clone(), config));

        Some(Self { db, app })
    }

    /// Sends a request and returns the response
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app
            .clone()
            .call(request)
            .await
            .expect("router call is infallible")
    }

    /// Registers a fresh user and logs them in, returning (email, token)
    ///
    /// Emails are uniqued per call so tests never collide with each other
    /// or with leftovers from earlier runs.
    pub async fn register_and_login(&self, name: &str) -> (String, String) {
        let email = format!("{}-{}@example.com", name, Uuid::new_v4());

        let response = self
            .send(post_json(
                "/api/auth/register",
                json!({ "email": email, "password": "pw", "name": name }),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = self
            .send(post_json(
                "/api/auth/login",
                json!({ "email": email, "password": "pw" }),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = read_json(response).await;
        let token = body["token"].as_str().expect("login returns token").to_string();

        (email, token)
    }

    /// Removes a test user and their tasks
    pub async fn cleanup_user(&self, email: &str) {
        sqlx::query("DELETE FROM tasks WHERE user_id IN (SELECT id FROM users WHERE email = $1)")
            .bind(email)
            .execute(&self.db)
            .await
            .expect("task cleanup should succeed");
        sqlx::query("DELETE FROM users WHERE email = $1")
            .bind(email)
            .execute(&self.db)
            .await
            .expect("user cleanup should succeed");
    }
}

/// Builds an unauthenticated JSON POST
pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Builds an authenticated request, with an optional JSON body
pub fn authed(method: &str, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token));

    match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Reads a response body as JSON
pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}
