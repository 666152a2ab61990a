//! Integration tests for registration, login, and token handling.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p chalkboard-api)
//!
//! Run with: cargo test -p chalkboard-integration-tests -- --ignored

use chalkboard_client::{ChalkboardClient, ClientError};
use chalkboard_integration_tests::{base_url, unique_email};

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_register_issues_token_and_signs_in() {
    let client = ChalkboardClient::new(base_url()).expect("client");
    let email = unique_email("register");

    let user = client
        .register("Test Student", &email, "hunter2hunter2", "student")
        .await
        .expect("registration should succeed");

    assert_eq!(user.user_email, email);
    assert!(client.auth().is_authenticated().await);

    // The issued token must satisfy the auth check
    let me = client.me().await.expect("me should succeed");
    assert_eq!(me.user_email, email);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_duplicate_registration_conflicts() {
    let client = ChalkboardClient::new(base_url()).expect("client");
    let email = unique_email("duplicate");

    client
        .register("First", &email, "hunter2hunter2", "student")
        .await
        .expect("first registration should succeed");

    let second = ChalkboardClient::new(base_url()).expect("client");
    let err = second
        .register("Second", &email, "hunter2hunter2", "student")
        .await
        .expect_err("second registration must fail");

    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 400);
            assert!(message.contains("already exists"), "message: {message}");
        }
        other => panic!("expected API error, got {other:?}"),
    }

    // The failed registration must not have signed the client in
    assert!(!second.auth().is_authenticated().await);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_login_with_wrong_password_rejects() {
    let client = ChalkboardClient::new(base_url()).expect("client");
    let email = unique_email("wrongpw");

    client
        .register("Test Student", &email, "hunter2hunter2", "student")
        .await
        .expect("registration should succeed");
    client.sign_out().await;

    let err = client
        .login(&email, "not-the-password")
        .await
        .expect_err("login must fail");

    match err {
        ClientError::Api { status, .. } => assert_eq!(status, 401),
        other => panic!("expected API error, got {other:?}"),
    }
    assert!(!client.auth().is_authenticated().await);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_garbage_token_clears_session() {
    let client = ChalkboardClient::new(base_url()).expect("client");
    let email = unique_email("badtoken");

    let user = client
        .register("Test Student", &email, "hunter2hunter2", "student")
        .await
        .expect("registration should succeed");

    // Swap in a forged token; the next authorized call must 401 and clear
    // the store
    let forged = ChalkboardClient::with_session(
        base_url(),
        "not-a-real-token".to_string(),
        user,
    )
    .expect("client");

    let err = forged.me().await.expect_err("forged token must be rejected");
    match err {
        ClientError::Api { status, .. } => assert_eq!(status, 401),
        other => panic!("expected API error, got {other:?}"),
    }
    assert!(!forged.auth().is_authenticated().await);
}
