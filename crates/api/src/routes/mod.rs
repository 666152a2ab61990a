//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Readiness check (database ping)
//!
//! # Auth
//! POST /api/auth/register           - Create an account, returns token + user
//! POST /api/auth/login              - Login, returns token + user
//! GET  /api/users/me                - Current user (bearer)
//!
//! # Courses
//! POST   /api/courses/add                 - Create course (instructor)
//! GET    /api/courses/get                 - List courses
//! GET    /api/courses/get/details/{id}    - Course detail with curriculum + roster
//! PUT    /api/courses/update/{id}         - Update course (instructor)
//! DELETE /api/courses/delete/{courseId}   - Delete course (instructor)
//!
//! # Checkout (bearer)
//! POST /api/orders/create           - Initiate checkout, returns approveUrl + orderId
//! POST /api/orders/capture          - Execute payment, finalize order
//!
//! # Enrollments (bearer)
//! GET  /api/enrollments/me          - Caller's purchased courses
//!
//! # Uploads (bearer)
//! POST /api/upload                  - Multipart file upload, returns filePath
//! ```
//!
//! Every response body uses the `{success, message?, data?}` envelope the
//! client renders from.

pub mod auth;
pub mod courses;
pub mod enrollments;
pub mod orders;
pub mod upload;

use axum::{
    Json, Router,
    routing::{delete, get, post, put},
};
use serde::Serialize;

use crate::state::AppState;

/// Success envelope: `{success: true, message?, data}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

impl<T: Serialize> Envelope<T> {
    /// Wrap response data in a success envelope.
    pub fn data(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: None,
            data,
        })
    }

    /// Wrap response data with a human-readable message.
    pub fn with_message(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: Some(message.into()),
            data,
        })
    }
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
}

/// Create the course catalog routes router.
pub fn course_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(courses::add))
        .route("/get", get(courses::list))
        .route("/get/details/{id}", get(courses::details))
        .route("/update/{id}", put(courses::update))
        .route("/delete/{courseId}", delete(courses::remove))
}

/// Create the checkout routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(orders::create))
        .route("/capture", post(orders::capture))
}

/// Create the enrollment routes router.
pub fn enrollment_routes() -> Router<AppState> {
    Router::new().route("/me", get(enrollments::mine))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth_routes())
        .route("/api/users/me", get(auth::me))
        .nest("/api/courses", course_routes())
        .nest("/api/orders", order_routes())
        .nest("/api/enrollments", enrollment_routes())
        .route("/api/upload", post(upload::upload))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let Json(envelope) = Envelope::data(vec![1, 2, 3]);
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
        assert!(json.get("message").is_none());
    }

    #[test]
    fn test_envelope_with_message() {
        let Json(envelope) = Envelope::with_message("Order confirmed", 7);
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["message"], "Order confirmed");
        assert_eq!(json["data"], 7);
    }
}
