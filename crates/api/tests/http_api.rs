//! HTTP-level integration tests: routing, authentication, authorization,
//! and response shapes through the full middleware stack.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{bearer, build_test_app, send};

const STUDENT: &str = "student@campus.example";

#[sqlx::test(migrations = "../db/migrations")]
async fn health_endpoint_reports_ok(pool: PgPool) {
    let app = build_test_app(pool);

    let (status, body) = send(&app, "GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db_healthy"], true);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn listing_tickets_requires_authentication(pool: PgPool) {
    let app = build_test_app(pool);

    let (status, body) = send(&app, "GET", "/api/v1/tickets", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn guests_can_submit_tickets(pool: PgPool) {
    let app = build_test_app(pool);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/tickets",
        None,
        Some(json!({
            "title": "Forgot my password",
            "description": "The login page will not accept my password",
            "created_by": "guest@example.com",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let reference = body["data"]["reference"].as_str().unwrap();
    assert!(reference.starts_with("TICKET-"));
    assert_eq!(body["data"]["department"], "IT Support");
    assert_eq!(body["data"]["status"], "assigned");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn blank_submissions_are_rejected(pool: PgPool) {
    let app = build_test_app(pool);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/tickets",
        None,
        Some(json!({
            "title": "",
            "description": "something",
            "created_by": "guest@example.com",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn students_cannot_post_internal_notes(pool: PgPool) {
    let app = build_test_app(pool);

    let (_, created) = send(
        &app,
        "POST",
        "/api/v1/tickets",
        None,
        Some(json!({
            "title": "Wifi down in the dorm",
            "description": "no wifi since this morning",
            "created_by": STUDENT,
        })),
    )
    .await;
    let reference = created["data"]["reference"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/tickets/{reference}/notes"),
        Some(&bearer(1, STUDENT, "student")),
        Some(json!({ "message": "note to self" })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn staff_only_content_is_stripped_for_students(pool: PgPool) {
    let app = build_test_app(pool);
    let staff = bearer(2, "amos.kibet@staff.campus.example", "staff");

    let (_, created) = send(
        &app,
        "POST",
        "/api/v1/tickets",
        None,
        Some(json!({
            "title": "Library database locked",
            "description": "cannot open the research database",
            "created_by": STUDENT,
        })),
    )
    .await;
    let reference = created["data"]["reference"].as_str().unwrap();

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/v1/tickets/{reference}/notes"),
        Some(&staff),
        Some(json!({ "message": "checking the licence server" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The creator sees the ticket, minus staff-only content.
    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/tickets/{reference}"),
        Some(&bearer(1, STUDENT, "student")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["internal_notes"].as_array().unwrap().len(), 0);

    // Staff see the full audit trail.
    let (_, body) = send(
        &app,
        "GET",
        &format!("/api/v1/tickets/{reference}"),
        Some(&staff),
        None,
    )
    .await;
    assert!(!body["data"]["internal_notes"].as_array().unwrap().is_empty());

    // Another student cannot see the ticket at all.
    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/v1/tickets/{reference}"),
        Some(&bearer(3, "other@campus.example", "student")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn sweeps_are_admin_only(pool: PgPool) {
    let app = build_test_app(pool);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/tickets/sweeps/overdue",
        Some(&bearer(1, STUDENT, "student")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/tickets/sweeps/overdue",
        Some(&bearer(9, "admin@helpdesk.campus.example", "admin")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["skipped"], false);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn registration_and_login_round_trip(pool: PgPool) {
    let app = build_test_app(pool);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/auth/register",
        None,
        Some(json!({
            "name": "Test Student",
            "email": "new.student@campus.example",
            "registration_number": "REG-1234",
            "password": "a-strong-password",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["role"], "student");
    assert!(body["data"].get("password_hash").is_none());

    // Duplicate registration is a descriptive validation error.
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/auth/register",
        None,
        Some(json!({
            "name": "Imposter",
            "email": "new.student@campus.example",
            "password": "another-password",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("already exists"));

    // Login works with the registration number as identifier.
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({
            "identifier": "REG-1234",
            "password": "a-strong-password",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["token"].as_str().is_some());

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({
            "identifier": "REG-1234",
            "password": "wrong-password",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
