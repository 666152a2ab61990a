//! Integration tests for the checkout flow and its ledgers.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//!   (`CHALKBOARD_DATABASE_URL` must point at it)
//! - The API server running with PayPal sandbox credentials
//!
//! Run with: cargo test -p chalkboard-integration-tests -- --ignored
//!
//! Payment execution needs a buyer approval step that cannot be automated
//! here; the capture-replay test therefore reads pre-approved sandbox
//! identifiers from `PAYPAL_TEST_PAYMENT_ID` / `PAYPAL_TEST_PAYER_ID`.

use chalkboard_client::{ChalkboardClient, CheckoutInput, ClientError, UserSummary};
use chalkboard_integration_tests::{base_url, unique_email};
use serde_json::json;
use sqlx::{PgPool, Row};

async fn test_pool() -> PgPool {
    let url = std::env::var("CHALKBOARD_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("CHALKBOARD_DATABASE_URL must be set for checkout tests");
    PgPool::connect(&url).await.expect("database connection")
}

/// Register an instructor, publish a course, and return a student client
/// plus the course id and the student's identity.
async fn seed_course_and_student() -> (ChalkboardClient, i64, UserSummary) {
    let instructor = ChalkboardClient::new(base_url()).expect("client");
    instructor
        .register(
            "Test Instructor",
            &unique_email("instructor"),
            "hunter2hunter2",
            "instructor",
        )
        .await
        .expect("instructor registration");

    let course = instructor
        .create_course(&json!({
            "title": "Integration Testing in Anger",
            "pricing": "49.99",
            "isPublished": true,
            "curriculum": [
                {"title": "Lesson 1", "videoUrl": "/uploads/lesson1.mp4", "freePreview": true}
            ]
        }))
        .await
        .expect("course creation");

    let student = ChalkboardClient::new(base_url()).expect("client");
    let user = student
        .register(
            "Test Student",
            &unique_email("student"),
            "hunter2hunter2",
            "student",
        )
        .await
        .expect("student registration");

    (student, course.id.as_i64(), user)
}

#[tokio::test]
#[ignore = "Requires running API server, database, and PayPal sandbox credentials"]
async fn test_initiate_checkout_creates_one_pending_order_and_no_enrollment() {
    let (student, course_id, user) = seed_course_and_student().await;
    let pool = test_pool().await;

    let approval = student
        .initiate_checkout(&CheckoutInput {
            user_id: user.id,
            user_name: user.user_name.clone(),
            user_email: user.user_email.clone(),
            course_id: course_id.into(),
            course_pricing: "49.99".to_string(),
        })
        .await
        .expect("checkout initiation");

    assert!(approval.approve_url.starts_with("https://"));

    // Exactly one order, still pending/created
    let row = sqlx::query(
        "SELECT count(*) AS n FROM orders \
         WHERE user_id = $1 AND course_id = $2 \
         AND payment_status = 'pending' AND order_status = 'created'",
    )
    .bind(user.id.as_i64())
    .bind(course_id)
    .fetch_one(&pool)
    .await
    .expect("order count query");
    assert_eq!(row.get::<i64, _>("n"), 1);

    // Neither ledger was touched
    let enrollments = student.my_enrollments().await.expect("enrollments");
    assert!(enrollments.is_empty());

    let roster = sqlx::query("SELECT count(*) AS n FROM course_students WHERE course_id = $1")
        .bind(course_id)
        .fetch_one(&pool)
        .await
        .expect("roster count query");
    assert_eq!(roster.get::<i64, _>("n"), 0);
}

#[tokio::test]
#[ignore = "Requires running API server, database, and PayPal sandbox credentials"]
async fn test_capture_with_rejected_payment_leaves_order_pending() {
    let (student, course_id, user) = seed_course_and_student().await;
    let pool = test_pool().await;

    let approval = student
        .initiate_checkout(&CheckoutInput {
            user_id: user.id,
            user_name: user.user_name.clone(),
            user_email: user.user_email.clone(),
            course_id: course_id.into(),
            course_pricing: "49.99".to_string(),
        })
        .await
        .expect("checkout initiation");

    // A payment id the gateway has never seen must be rejected
    let err = student
        .capture_checkout("PAY-DOES-NOT-EXIST", "PAYER-NOBODY", approval.order_id)
        .await
        .expect_err("capture must fail");

    match err {
        ClientError::Api { status, .. } => assert_eq!(status, 500),
        other => panic!("expected API error, got {other:?}"),
    }

    // The order is untouched
    let row = sqlx::query("SELECT payment_status, order_status FROM orders WHERE id = $1")
        .bind(approval.order_id.as_i64())
        .fetch_one(&pool)
        .await
        .expect("order query");
    assert_eq!(row.get::<String, _>("payment_status"), "pending");
    assert_eq!(row.get::<String, _>("order_status"), "created");
}

#[tokio::test]
#[ignore = "Requires an approved sandbox payment (PAYPAL_TEST_PAYMENT_ID / PAYPAL_TEST_PAYER_ID)"]
async fn test_capture_replay_enrolls_exactly_once() {
    let payment_id =
        std::env::var("PAYPAL_TEST_PAYMENT_ID").expect("PAYPAL_TEST_PAYMENT_ID must be set");
    let payer_id =
        std::env::var("PAYPAL_TEST_PAYER_ID").expect("PAYPAL_TEST_PAYER_ID must be set");

    let (student, course_id, user) = seed_course_and_student().await;
    let pool = test_pool().await;

    let approval = student
        .initiate_checkout(&CheckoutInput {
            user_id: user.id,
            user_name: user.user_name.clone(),
            user_email: user.user_email.clone(),
            course_id: course_id.into(),
            course_pricing: "49.99".to_string(),
        })
        .await
        .expect("checkout initiation");

    let order = student
        .capture_checkout(&payment_id, &payer_id, approval.order_id)
        .await
        .expect("first capture");
    assert_eq!(order.payment_status.to_string(), "paid");
    assert_eq!(order.order_status.to_string(), "confirmed");

    // Replay the same capture; the ledgers must not grow
    let _ = student
        .capture_checkout(&payment_id, &payer_id, approval.order_id)
        .await;

    let roster = sqlx::query(
        "SELECT count(*) AS n FROM course_students WHERE course_id = $1 AND student_id = $2",
    )
    .bind(course_id)
    .bind(user.id.as_i64())
    .fetch_one(&pool)
    .await
    .expect("roster count query");
    assert_eq!(roster.get::<i64, _>("n"), 1);

    let enrollments = student.my_enrollments().await.expect("enrollments");
    assert_eq!(enrollments.len(), 1);
}
