//! Common test utilities for integration tests.
//!
//! These tests run against a real PostgreSQL database. They are skipped
//! (pass vacuously) when `TEST_DATABASE_URL` is unset so the suite stays
//! green without infrastructure.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tower::ServiceExt;
use uuid::Uuid;

use alumniverse_api::app::create_app;
use alumniverse_api::config::{
    CalendarConfig, Config, DatabaseConfig, EmailConfig, JwtAuthConfig, LoggingConfig,
    PaymentConfig, SecurityConfig, ServerConfig,
};

/// Connect to the test database, or `None` when `TEST_DATABASE_URL` is
/// unset.
pub async fn try_test_pool() -> Option<PgPool> {
    let database_url = std::env::var("TEST_DATABASE_URL").ok()?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    Some(pool)
}

/// Apply migrations; already-applied versions are skipped.
pub async fn run_migrations(pool: &PgPool) {
    sqlx::migrate!("../persistence/src/migrations")
        .run(pool)
        .await
        .expect("Failed to run migrations");
}

/// Configuration for tests: console/disabled collaborators, no rate limit.
pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            request_timeout_secs: 30,
        },
        database: DatabaseConfig {
            url: std::env::var("TEST_DATABASE_URL").unwrap_or_default(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 10,
            idle_timeout_secs: 600,
        },
        logging: LoggingConfig {
            level: "warn".into(),
            format: "pretty".into(),
        },
        security: SecurityConfig {
            cors_origins: vec![],
            auth_rate_limit_per_minute: 0,
        },
        jwt: JwtAuthConfig {
            secret: "integration-test-secret-0123456789abcdef".into(),
            token_expiry_secs: 3600,
        },
        email: EmailConfig::default(),
        payment: PaymentConfig::default(),
        calendar: CalendarConfig::default(),
    }
}

pub fn create_test_app(config: Config, pool: PgPool) -> Router {
    create_app(config, pool)
}

/// Build a JSON request.
pub fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Build a JSON request with a bearer token.
pub fn json_request_with_token(
    method: Method,
    uri: &str,
    body: Value,
    token: &str,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Build a bodyless request with a bearer token.
pub fn request_with_token(method: Method, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// Read a JSON response body.
pub async fn parse_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

/// A verified, logged-in account with its profile id.
pub struct TestAccount {
    pub email: String,
    pub user_id: Uuid,
    pub profile_id: Uuid,
    pub token: String,
}

fn unique_email(prefix: &str) -> String {
    format!("{}-{}@test.example", prefix, &Uuid::new_v4().to_string()[..8])
}

fn student_signup_body(email: &str) -> Value {
    json!({
        "account": {
            "email": email,
            "password": "integration-pass-1",
            "phone_num": "+2348012345678",
            "firstname": "Test",
            "lastname": "Student"
        },
        "profile": {
            "matric_no": "CSC/21/123456",
            "department": "Computer Science",
            "faculty": "SOC",
            "level": 400,
            "cgpa": 4.2,
            "skills": ["rust"],
            "expected_grad_year": 2027,
            "resume_url": "https://cdn.test.example/cv.pdf"
        }
    })
}

fn alumnus_signup_body(email: &str) -> Value {
    json!({
        "account": {
            "email": email,
            "password": "integration-pass-1",
            "phone_num": "+2348098765432",
            "firstname": "Test",
            "lastname": "Alumnus"
        },
        "profile": {
            "matric_no": "CSC/10/654321",
            "department": "Computer Science",
            "faculty": "SOC",
            "grad_year": 2014,
            "current_job_title": "Engineer",
            "current_company": "Example Corp",
            "industry": "Software",
            "years_of_exp": 10
        }
    })
}

/// Read the issued verification code straight from the store.
pub async fn issued_code(pool: &PgPool, user_id: Uuid) -> String {
    sqlx::query_scalar::<_, String>("SELECT code FROM one_time_codes WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .expect("No verification code issued")
}

pub async fn user_id_by_email(pool: &PgPool, email: &str) -> Uuid {
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE email = $1")
        .bind(email)
        .fetch_one(pool)
        .await
        .expect("User not found")
}

async fn signup_verify_login(
    app: &Router,
    pool: &PgPool,
    signup_uri: &str,
    signup_body: Value,
    email: &str,
    profile_table: &str,
) -> TestAccount {
    let response = app
        .clone()
        .oneshot(json_request(Method::POST, signup_uri, signup_body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED, "signup failed");

    let user_id = user_id_by_email(pool, email).await;
    let code = issued_code(pool, user_id).await;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/auth/verify-otp",
            json!({ "email": email, "code": code }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK, "verify failed");

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/auth/login",
            json!({ "email": email, "password": "integration-pass-1" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK, "login failed");
    let body = parse_body(response).await;
    let token = body["access_token"].as_str().unwrap().to_string();

    let profile_id = sqlx::query_scalar::<_, Uuid>(&format!(
        "SELECT id FROM {} WHERE user_id = $1",
        profile_table
    ))
    .bind(user_id)
    .fetch_one(pool)
    .await
    .expect("Profile not found");

    TestAccount {
        email: email.to_string(),
        user_id,
        profile_id,
        token,
    }
}

/// Create a verified student account through the public API.
pub async fn create_student(app: &Router, pool: &PgPool) -> TestAccount {
    let email = unique_email("student");
    signup_verify_login(
        app,
        pool,
        "/api/v1/auth/signup/student",
        student_signup_body(&email),
        &email,
        "student_profiles",
    )
    .await
}

/// Create a verified alumnus account through the public API.
pub async fn create_alumnus(app: &Router, pool: &PgPool) -> TestAccount {
    let email = unique_email("alumnus");
    signup_verify_login(
        app,
        pool,
        "/api/v1/auth/signup/alumnus",
        alumnus_signup_body(&email),
        &email,
        "alumni_profiles",
    )
    .await
}
