//! Integration tests for the offer/application/engagement state machine.
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

async fn create_mentorship(app: &Router, alumnus: &TestAccount, max_slots: i32) -> Uuid {
    let response = app
        .clone()
        .oneshot(json_request_with_token(
            Method::POST,
            "/api/v1/mentorships",
            json!({
                "title": "Backend mentorship",
                "description": "Weekly pairing on systems work",
                "focus_areas": ["rust", "databases"],
                "max_slots": max_slots
            }),
            &alumnus.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = parse_body(response).await;
    Uuid::parse_str(body["id"].as_str().unwrap()).unwrap()
}

async fn create_offer(
    app: &Router,
    alumnus: &TestAccount,
    mentorship_id: Uuid,
    student: &TestAccount,
) -> Value {
    let response = app
        .clone()
        .oneshot(json_request_with_token(
            Method::POST,
            "/api/v1/offers",
            json!({
                "opportunity_kind": "mentorship",
                "opportunity_id": mentorship_id,
                "student_id": student.profile_id
            }),
            &alumnus.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    parse_body(response).await
}

async fn remaining_slots(pool: &PgPool, mentorship_id: Uuid) -> i32 {
    sqlx::query_scalar::<_, i32>("SELECT remaining_slots FROM mentorships WHERE id = $1")
        .bind(mentorship_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_accept_offer_creates_engagement_and_decrements_slots() {
    let Some(pool) = try_test_pool().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool.clone());

    let alumnus = create_alumnus(&app, &pool).await;
    let student = create_student(&app, &pool).await;
    let mentorship_id = create_mentorship(&app, &alumnus, 2).await;

    let offer = create_offer(&app, &alumnus, mentorship_id, &student).await;
    let offer_id = offer["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(json_request_with_token(
            Method::POST,
            &format!("/api/v1/offers/{}/accept", offer_id),
            json!({}),
            &student.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = parse_body(response).await;
    assert_eq!(body["offer"]["status"], "accepted");
    assert_eq!(body["engagement"]["status"], "active");
    assert_eq!(body["engagement"]["source"]["kind"], "offer");

    assert_eq!(remaining_slots(&pool, mentorship_id).await, 1);
}

#[tokio::test]
async fn test_duplicate_acceptance_yields_exactly_one_engagement() {
    let Some(pool) = try_test_pool().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool.clone());

    let alumnus = create_alumnus(&app, &pool).await;
    let student = create_student(&app, &pool).await;
    let mentorship_id = create_mentorship(&app, &alumnus, 2).await;

    // The student applies while the alumnus offers: same pair, two routes
    // to acceptance.
    let offer = create_offer(&app, &alumnus, mentorship_id, &student).await;
    let offer_id = offer["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(json_request_with_token(
            Method::POST,
            "/api/v1/applications",
            json!({
                "opportunity_kind": "mentorship",
                "opportunity_id": mentorship_id
            }),
            &student.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let application = parse_body(response).await;
    let application_id = application["id"].as_str().unwrap();

    // First acceptance wins.
    let response = app
        .clone()
        .oneshot(json_request_with_token(
            Method::POST,
            &format!("/api/v1/offers/{}/accept", offer_id),
            json!({}),
            &student.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Accepting the duplicate application for the same pair loses with
    // already_engaged; slots stay untouched.
    let slots_before = remaining_slots(&pool, mentorship_id).await;
    let response = app
        .clone()
        .oneshot(json_request_with_token(
            Method::POST,
            &format!("/api/v1/applications/{}/accept", application_id),
            json!({}),
            &alumnus.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = parse_body(response).await;
    assert_eq!(body["error"], "already_engaged");
    assert_eq!(remaining_slots(&pool, mentorship_id).await, slots_before);

    let engagements = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM engagements WHERE opportunity_id = $1 AND student_id = $2",
    )
    .bind(mentorship_id)
    .bind(student.profile_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(engagements, 1);
}

#[tokio::test]
async fn test_single_slot_mentorship_never_overdraws() {
    let Some(pool) = try_test_pool().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool.clone());

    let alumnus = create_alumnus(&app, &pool).await;
    let first = create_student(&app, &pool).await;
    let second = create_student(&app, &pool).await;
    let mentorship_id = create_mentorship(&app, &alumnus, 1).await;

    let offer_a = create_offer(&app, &alumnus, mentorship_id, &first).await;
    let offer_b = create_offer(&app, &alumnus, mentorship_id, &second).await;

    let response = app
        .clone()
        .oneshot(json_request_with_token(
            Method::POST,
            &format!("/api/v1/offers/{}/accept", offer_a["id"].as_str().unwrap()),
            json!({}),
            &first.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // The second pair has no engagement yet, so the conditional slot
    // decrement is what refuses it.
    let response = app
        .clone()
        .oneshot(json_request_with_token(
            Method::POST,
            &format!("/api/v1/offers/{}/accept", offer_b["id"].as_str().unwrap()),
            json!({}),
            &second.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = parse_body(response).await;
    assert_eq!(body["error"], "no_slots_remaining");

    assert_eq!(remaining_slots(&pool, mentorship_id).await, 0);

    // The losing offer rolled back to pending.
    let status = sqlx::query_scalar::<_, String>(
        "SELECT status::text FROM offers WHERE id = $1",
    )
    .bind(Uuid::parse_str(offer_b["id"].as_str().unwrap()).unwrap())
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(status, "pending");
}

#[tokio::test]
async fn test_lifecycle_guards() {
    let Some(pool) = try_test_pool().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool.clone());

    let alumnus = create_alumnus(&app, &pool).await;
    let student = create_student(&app, &pool).await;
    let outsider = create_student(&app, &pool).await;
    let mentorship_id = create_mentorship(&app, &alumnus, 3).await;

    let offer = create_offer(&app, &alumnus, mentorship_id, &student).await;
    let offer_id = offer["id"].as_str().unwrap();

    // A different student cannot respond.
    let response = app
        .clone()
        .oneshot(json_request_with_token(
            Method::POST,
            &format!("/api/v1/offers/{}/accept", offer_id),
            json!({}),
            &outsider.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Duplicate pending offer for the same pair is refused.
    let response = app
        .clone()
        .oneshot(json_request_with_token(
            Method::POST,
            "/api/v1/offers",
            json!({
                "opportunity_kind": "mentorship",
                "opportunity_id": mentorship_id,
                "student_id": student.profile_id
            }),
            &alumnus.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = parse_body(response).await;
    assert_eq!(body["error"], "duplicate");

    // Rejection is terminal: a second response conflicts.
    let response = app
        .clone()
        .oneshot(json_request_with_token(
            Method::POST,
            &format!("/api/v1/offers/{}/reject", offer_id),
            json!({}),
            &student.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(json_request_with_token(
            Method::POST,
            &format!("/api/v1/offers/{}/accept", offer_id),
            json!({}),
            &student.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = parse_body(response).await;
    assert_eq!(body["error"], "already_resolved");

    // A rejected pair may be offered again.
    let response = app
        .clone()
        .oneshot(json_request_with_token(
            Method::POST,
            "/api/v1/offers",
            json!({
                "opportunity_kind": "mentorship",
                "opportunity_id": mentorship_id,
                "student_id": student.profile_id
            }),
            &alumnus.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_engagement_source_resolves_to_offer() {
    let Some(pool) = try_test_pool().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool.clone());

    let alumnus = create_alumnus(&app, &pool).await;
    let student = create_student(&app, &pool).await;
    let mentorship_id = create_mentorship(&app, &alumnus, 2).await;
    let offer = create_offer(&app, &alumnus, mentorship_id, &student).await;
    let offer_id = offer["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(json_request_with_token(
            Method::POST,
            &format!("/api/v1/offers/{}/accept", offer_id),
            json!({}),
            &student.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = parse_body(response).await;
    let engagement_id = body["engagement"]["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(request_with_token(
            Method::GET,
            &format!("/api/v1/engagements/{}/source", engagement_id),
            &student.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_body(response).await;
    assert_eq!(body["kind"], "offer");
    assert_eq!(body["record"]["id"], offer_id);
}
