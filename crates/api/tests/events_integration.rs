//! Integration tests for event registration and ticketing.
//!
//! These tests require a running PostgreSQL instance. They skip when
//! `TEST_DATABASE_URL` is unset.

mod common;

use axum::http::{Method, StatusCode};
use axum::Router;
use common::*;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

async fn create_event_with_ticket(
    app: &Router,
    creator: &TestAccount,
    price_minor: i64,
    quantity: i32,
) -> (Uuid, Uuid) {
    let response = app
        .clone()
        .oneshot(json_request_with_token(
            Method::POST,
            "/api/v1/events",
            json!({
                "title": "Alumni career talk",
                "description": "An evening of career conversations",
                "category": "career",
                "mode": "physical",
                "venue": "Main auditorium",
                "starts_at": "2027-03-01T17:00:00Z",
                "duration_mins": 90,
                "tickets": [{
                    "name": "General",
                    "price_minor": price_minor,
                    "quantity": quantity
                }]
            }),
            &creator.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = parse_body(response).await;
    let event_id = Uuid::parse_str(body["event"]["id"].as_str().unwrap()).unwrap();
    let ticket_id = Uuid::parse_str(body["tickets"][0]["id"].as_str().unwrap()).unwrap();
    (event_id, ticket_id)
}

async fn register(app: &Router, ticket_id: Uuid, account: &TestAccount) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(json_request_with_token(
            Method::POST,
            &format!("/api/v1/tickets/{}/register", ticket_id),
            json!({}),
            &account.token,
        ))
        .await
        .unwrap();
    let status = response.status();
    (status, parse_body(response).await)
}

async fn quantity_sold(pool: &PgPool, ticket_id: Uuid) -> i32 {
    sqlx::query_scalar::<_, i32>("SELECT quantity_sold FROM tickets WHERE id = $1")
        .bind(ticket_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_free_ticket_registration_completes_immediately() {
    let Some(pool) = try_test_pool().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool.clone());

    let creator = create_alumnus(&app, &pool).await;
    let attendee = create_student(&app, &pool).await;
    let (_event_id, ticket_id) = create_event_with_ticket(&app, &creator, 0, 50).await;

    let (status, body) = register(&app, ticket_id, &attendee).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["outcome"], "confirmed");
    assert_eq!(body["purchase"]["is_paid"], true);
    assert!(body.get("checkout_url").is_none());

    assert_eq!(quantity_sold(&pool, ticket_id).await, 1);
}

#[tokio::test]
async fn test_paid_ticket_registration_returns_checkout_url() {
    let Some(pool) = try_test_pool().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool.clone());

    let creator = create_alumnus(&app, &pool).await;
    let attendee = create_student(&app, &pool).await;
    let (_event_id, ticket_id) = create_event_with_ticket(&app, &creator, 5000, 50).await;

    let (status, body) = register(&app, ticket_id, &attendee).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["outcome"], "checkout_required");
    assert_eq!(body["purchase"]["is_paid"], false);
    let checkout_url = body["checkout_url"].as_str().unwrap();
    assert!(checkout_url.contains(body["purchase"]["ticket_uid"].as_str().unwrap()));

    // quantity_sold is deferred until external confirmation.
    assert_eq!(quantity_sold(&pool, ticket_id).await, 0);
}

#[tokio::test]
async fn test_payment_confirmation_settles_purchase() {
    let Some(pool) = try_test_pool().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool.clone());

    let creator = create_alumnus(&app, &pool).await;
    let attendee = create_student(&app, &pool).await;
    let (_event_id, ticket_id) = create_event_with_ticket(&app, &creator, 5000, 50).await;

    let (_, body) = register(&app, ticket_id, &attendee).await;
    let reference = body["purchase"]["ticket_uid"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/payments/confirm",
            json!({ "reference": reference }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_body(response).await;
    assert_eq!(body["purchase"]["is_paid"], true);
    assert_eq!(quantity_sold(&pool, ticket_id).await, 1);

    // The callback is idempotent on the reference.
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/payments/confirm",
            json!({ "reference": reference }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(quantity_sold(&pool, ticket_id).await, 1);
}

#[tokio::test]
async fn test_sold_out_ticket_is_refused() {
    let Some(pool) = try_test_pool().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool.clone());

    let creator = create_alumnus(&app, &pool).await;
    let attendee = create_student(&app, &pool).await;
    let (_event_id, ticket_id) = create_event_with_ticket(&app, &creator, 0, 0).await;

    let (status, body) = register(&app, ticket_id, &attendee).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "sold_out");

    // No paid purchase was created.
    let paid = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM ticket_purchases WHERE ticket_id = $1 AND is_paid = true",
    )
    .bind(ticket_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(paid, 0);
}

#[tokio::test]
async fn test_event_without_tickets_gets_default_free_ticket() {
    let Some(pool) = try_test_pool().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool.clone());

    let creator = create_alumnus(&app, &pool).await;

    let response = app
        .clone()
        .oneshot(json_request_with_token(
            Method::POST,
            "/api/v1/events",
            json!({
                "title": "Open meetup",
                "description": "Informal networking for everyone",
                "category": "networking",
                "mode": "physical",
                "venue": "Courtyard",
                "starts_at": "2027-04-01T17:00:00Z",
                "duration_mins": 60
            }),
            &creator.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = parse_body(response).await;
    assert_eq!(body["tickets"].as_array().unwrap().len(), 1);
    assert_eq!(body["tickets"][0]["is_default"], true);
    assert_eq!(body["tickets"][0]["price_minor"], 0);
}
