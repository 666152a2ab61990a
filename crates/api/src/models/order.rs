//! Order ledger domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use chalkboard_core::{CourseId, Email, OrderId, OrderStatus, PaymentStatus, Price, UserId};

/// One checkout attempt.
///
/// Created in `pending`/`created` at checkout initiation; mutated exactly
/// once at capture, when the external execution succeeded, to
/// `paid`/`confirmed` plus the provider's payment identifiers. Never deleted.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub user_name: String,
    pub user_email: Email,
    pub instructor_id: UserId,
    pub instructor_name: String,
    pub course_id: CourseId,
    pub course_title: String,
    pub course_image: Option<String>,
    pub course_pricing: Price,
    pub payment_method: String,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub payment_id: Option<String>,
    pub payer_id: Option<String>,
    pub order_date: DateTime<Utc>,
}

impl Order {
    /// Whether this order already went through a successful capture.
    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.payment_status == PaymentStatus::Paid && self.order_status == OrderStatus::Confirmed
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let order = Order {
            id: OrderId::new(11),
            user_id: UserId::new(2),
            user_name: "Sam".to_string(),
            user_email: Email::parse("sam@example.com").unwrap(),
            instructor_id: UserId::new(1),
            instructor_name: "Ada".to_string(),
            course_id: CourseId::new(3),
            course_title: "Systems Programming".to_string(),
            course_image: None,
            course_pricing: Price::parse("49.99").unwrap(),
            payment_method: "paypal".to_string(),
            payment_status: PaymentStatus::Pending,
            order_status: OrderStatus::Created,
            payment_id: None,
            payer_id: None,
            order_date: Utc::now(),
        };

        assert!(!order.is_finalized());

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["paymentStatus"], "pending");
        assert_eq!(json["orderStatus"], "created");
        assert_eq!(json["coursePricing"], "49.99");
    }
}
