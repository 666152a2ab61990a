//! Wire types the API returns, in the client's shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use chalkboard_core::{CourseId, OrderId, OrderStatus, PaymentStatus, UserId, UserRole};

/// Response envelope: `{success, message?, data?}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

/// Public user fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: UserId,
    pub user_name: String,
    pub user_email: String,
    pub role: UserRole,
}

/// Register/login response payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub access_token: String,
    pub user: UserSummary,
}

/// One catalog entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub id: CourseId,
    pub instructor_id: UserId,
    pub instructor_name: String,
    pub title: String,
    pub pricing: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub is_published: bool,
}

/// An initiated checkout: where to send the buyer, and which order to
/// capture afterwards.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutApproval {
    pub approve_url: String,
    pub order_id: OrderId,
}

/// A finalized (or still pending) order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: OrderId,
    pub user_id: UserId,
    pub course_id: CourseId,
    pub course_title: String,
    pub course_pricing: String,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub order_date: DateTime<Utc>,
}

/// One purchased course in the caller's enrollment ledger.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentSummary {
    pub course_id: CourseId,
    pub course_title: String,
    pub instructor_name: String,
    #[serde(default)]
    pub course_image: Option<String>,
    pub date_of_purchase: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_with_data() {
        let envelope: Envelope<AuthPayload> = serde_json::from_value(json!({
            "success": true,
            "message": "Login successful",
            "data": {
                "accessToken": "tok",
                "user": {"id": 1, "userName": "Sam", "userEmail": "sam@example.com", "role": "student"}
            }
        }))
        .unwrap();

        assert!(envelope.success);
        let payload = envelope.data.unwrap();
        assert_eq!(payload.access_token, "tok");
        assert_eq!(payload.user.role, UserRole::Student);
    }

    #[test]
    fn test_envelope_failure_has_no_data() {
        let envelope: Envelope<AuthPayload> = serde_json::from_value(json!({
            "success": false,
            "message": "Invalid email or password"
        }))
        .unwrap();

        assert!(!envelope.success);
        assert!(envelope.data.is_none());
        assert_eq!(envelope.message.unwrap(), "Invalid email or password");
    }

    #[test]
    fn test_order_summary_statuses() {
        let order: OrderSummary = serde_json::from_value(json!({
            "id": 7,
            "userId": 2,
            "courseId": 3,
            "courseTitle": "Systems Programming",
            "coursePricing": "49.99",
            "paymentStatus": "paid",
            "orderStatus": "confirmed",
            "orderDate": "2026-08-01T12:00:00Z"
        }))
        .unwrap();

        assert_eq!(order.payment_status, PaymentStatus::Paid);
        assert_eq!(order.order_status, OrderStatus::Confirmed);
    }
}
