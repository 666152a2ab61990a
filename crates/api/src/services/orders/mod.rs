//! Checkout orchestrator.
//!
//! Sequences the payment provider with the three ledgers. Two operations:
//!
//! - [`OrderService::initiate_checkout`]: validate → create provider payment
//!   → persist a `pending`/`created` order → return the approval redirect.
//!   A gateway failure surfaces before anything is written locally.
//! - [`OrderService::capture_checkout`]: validate → load order → execute the
//!   provider payment with the order's stored total → mark the order
//!   `paid`/`confirmed` → record the enrollment → set-add the student to the
//!   course roster → return the updated order. A gateway failure leaves the
//!   order `pending`.
//!
//! The three capture writes are not wrapped in a transaction and there is no
//! compensation if a later write fails after the order is marked paid; both
//! ledger writes are keyed inserts, so a client retry of capture converges
//! instead of double-enrolling. Nothing here prevents two concurrent captures
//! of the same order from both reaching the provider.

mod error;

pub use error::OrderError;

use serde::Deserialize;
use sqlx::PgPool;
use tracing::{info, instrument};

use chalkboard_core::{CourseId, Email, OrderId, Price, UserId};

use crate::config::ApiConfig;
use crate::db::courses::CourseRepository;
use crate::db::enrollments::EnrollmentRepository;
use crate::db::orders::{OrderDraft, OrderRepository};
use crate::models::{Course, EnrolledStudent, Enrollment, Order};
use crate::paypal::{CreatePaymentRequest, PaypalClient};

/// Checkout initiation payload.
///
/// Everything is optional on the wire; the orchestrator owns the validation
/// so a missing field maps to one `Validation` failure rather than a
/// deserialize rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub user_id: Option<UserId>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub course_id: Option<CourseId>,
    pub course_pricing: Option<String>,
}

/// Capture payload: the provider identifiers from the approval redirect plus
/// the order they belong to.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureRequest {
    pub payment_id: Option<String>,
    pub payer_id: Option<String>,
    pub order_id: Option<OrderId>,
}

/// A successfully initiated checkout.
#[derive(Debug, Clone)]
pub struct CheckoutInitiated {
    pub approve_url: String,
    pub order_id: OrderId,
}

/// Validated checkout inputs, ready for the gateway and the order ledger.
#[derive(Debug, Clone)]
struct ValidatedCheckout {
    user_id: UserId,
    user_name: String,
    user_email: Email,
    course_id: CourseId,
    price: Price,
}

/// The checkout orchestrator.
pub struct OrderService<'a> {
    orders: OrderRepository<'a>,
    courses: CourseRepository<'a>,
    enrollments: EnrollmentRepository<'a>,
    gateway: &'a PaypalClient,
    config: &'a ApiConfig,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, gateway: &'a PaypalClient, config: &'a ApiConfig) -> Self {
        Self {
            orders: OrderRepository::new(pool),
            courses: CourseRepository::new(pool),
            enrollments: EnrollmentRepository::new(pool),
            gateway,
            config,
        }
    }

    /// Start a checkout: create the provider payment, persist a pending
    /// order, and hand back the approval redirect.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Validation` for missing/malformed inputs,
    /// `OrderError::CourseNotFound` for an unknown course, and
    /// `OrderError::Gateway` if the provider rejects the payment - in which
    /// case no local state has been written.
    #[instrument(skip(self, request), fields(course_id = ?request.course_id, user_id = ?request.user_id))]
    pub async fn initiate_checkout(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutInitiated, OrderError> {
        let checkout = validate_checkout(request)?;

        let course = self
            .courses
            .find_by_id(checkout.course_id)
            .await?
            .ok_or(OrderError::CourseNotFound)?;

        let payment_request = build_payment_request(&course, checkout.price, self.config);

        // Gateway first: a rejection here must leave no trace locally
        let created = self.gateway.create_payment(&payment_request).await?;

        let order = self
            .orders
            .create(&OrderDraft {
                user_id: checkout.user_id,
                user_name: checkout.user_name,
                user_email: checkout.user_email,
                instructor_id: course.instructor_id,
                instructor_name: course.instructor_name,
                course_id: course.id,
                course_title: course.title,
                course_image: course.image_url,
                course_pricing: checkout.price,
            })
            .await?;

        info!(order_id = %order.id, payment_id = %created.payment_id, "checkout initiated");

        Ok(CheckoutInitiated {
            approve_url: created.approve_url,
            order_id: order.id,
        })
    }

    /// Finalize a checkout after buyer approval: execute the payment, mark
    /// the order paid, and record the enrollment on both ledgers.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Validation` for missing identifiers,
    /// `OrderError::OrderNotFound` for an unknown order, and
    /// `OrderError::Gateway` if execution fails - the order stays `pending`.
    #[instrument(skip(self, request), fields(order_id = ?request.order_id))]
    pub async fn capture_checkout(&self, request: CaptureRequest) -> Result<Order, OrderError> {
        let (payment_id, payer_id, order_id) = validate_capture(request)?;

        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or(OrderError::OrderNotFound)?;

        // Execute with the stored total, not anything client-supplied
        self.gateway
            .execute_payment(&payment_id, &payer_id, &order.course_pricing.gateway_total())
            .await?;

        let order = self
            .orders
            .finalize(order.id, &payment_id, &payer_id)
            .await
            .map_err(|e| match e {
                crate::db::RepositoryError::NotFound => OrderError::OrderNotFound,
                other => OrderError::Repository(other),
            })?;

        self.enrollments
            .add(&Enrollment {
                user_id: order.user_id,
                course_id: order.course_id,
                course_title: order.course_title.clone(),
                instructor_id: order.instructor_id,
                instructor_name: order.instructor_name.clone(),
                course_image: order.course_image.clone(),
                date_of_purchase: order.order_date,
            })
            .await?;

        let newly_enrolled = self
            .courses
            .add_student(
                order.course_id,
                &EnrolledStudent {
                    student_id: order.user_id,
                    student_name: order.user_name.clone(),
                    student_email: order.user_email.clone(),
                    paid_amount: order.course_pricing,
                },
            )
            .await?;

        info!(
            order_id = %order.id,
            newly_enrolled,
            "order confirmed"
        );

        Ok(order)
    }
}

/// Step 1 of initiation: presence and shape of the checkout inputs.
fn validate_checkout(request: CheckoutRequest) -> Result<ValidatedCheckout, OrderError> {
    let (Some(user_id), Some(course_id), Some(pricing)) =
        (request.user_id, request.course_id, request.course_pricing)
    else {
        return Err(OrderError::Validation(
            "Missing required payment information: userId, courseId, and coursePricing are required"
                .to_string(),
        ));
    };

    let price = Price::parse(&pricing).map_err(|e| OrderError::Validation(e.to_string()))?;

    let user_email = Email::parse(request.user_email.as_deref().unwrap_or_default())
        .map_err(|e| OrderError::Validation(format!("invalid buyer email: {e}")))?;

    Ok(ValidatedCheckout {
        user_id,
        user_name: request.user_name.unwrap_or_default(),
        user_email,
        course_id,
        price,
    })
}

/// Step 1 of capture: all three identifiers must be present.
fn validate_capture(request: CaptureRequest) -> Result<(String, String, OrderId), OrderError> {
    match (request.payment_id, request.payer_id, request.order_id) {
        (Some(payment_id), Some(payer_id), Some(order_id))
            if !payment_id.is_empty() && !payer_id.is_empty() =>
        {
            Ok((payment_id, payer_id, order_id))
        }
        _ => Err(OrderError::Validation(
            "Missing required parameters: paymentId, payerId, and orderId are required".to_string(),
        )),
    }
}

/// Build the provider payment request: one line item for the course, with
/// the client's return/cancel redirect targets.
fn build_payment_request(
    course: &Course,
    price: Price,
    config: &ApiConfig,
) -> CreatePaymentRequest {
    CreatePaymentRequest::single_item_sale(
        &course.title,
        &course.id.to_string(),
        &price.gateway_total(),
        config.payment_return_url(),
        config.payment_cancel_url(),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use secrecy::SecretString;
    use std::path::PathBuf;

    use crate::config::{PaypalConfig, PaypalMode};

    fn checkout_request() -> CheckoutRequest {
        CheckoutRequest {
            user_id: Some(UserId::new(1)),
            user_name: Some("Sam".to_string()),
            user_email: Some("sam@example.com".to_string()),
            course_id: Some(CourseId::new(3)),
            course_pricing: Some("49.99".to_string()),
        }
    }

    #[test]
    fn test_validate_checkout_accepts_complete_input() {
        let checkout = validate_checkout(checkout_request()).unwrap();
        assert_eq!(checkout.user_id, UserId::new(1));
        assert_eq!(checkout.price.gateway_total(), "49.99");
    }

    #[test]
    fn test_validate_checkout_requires_buyer_course_and_price() {
        for request in [
            CheckoutRequest {
                user_id: None,
                ..checkout_request()
            },
            CheckoutRequest {
                course_id: None,
                ..checkout_request()
            },
            CheckoutRequest {
                course_pricing: None,
                ..checkout_request()
            },
        ] {
            assert!(matches!(
                validate_checkout(request),
                Err(OrderError::Validation(_))
            ));
        }
    }

    #[test]
    fn test_validate_checkout_rejects_non_positive_price() {
        for bad in ["0", "-5", "gratis"] {
            let request = CheckoutRequest {
                course_pricing: Some(bad.to_string()),
                ..checkout_request()
            };
            assert!(matches!(
                validate_checkout(request),
                Err(OrderError::Validation(_))
            ));
        }
    }

    #[test]
    fn test_validate_capture_requires_all_identifiers() {
        let complete = CaptureRequest {
            payment_id: Some("PAY-123".to_string()),
            payer_id: Some("PAYER-456".to_string()),
            order_id: Some(OrderId::new(7)),
        };
        assert!(validate_capture(complete.clone()).is_ok());

        for request in [
            CaptureRequest {
                payment_id: None,
                ..complete.clone()
            },
            CaptureRequest {
                payer_id: Some(String::new()),
                ..complete.clone()
            },
            CaptureRequest {
                order_id: None,
                ..complete
            },
        ] {
            assert!(matches!(
                validate_capture(request),
                Err(OrderError::Validation(_))
            ));
        }
    }

    #[test]
    fn test_build_payment_request_uses_validated_price() {
        let config = ApiConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 5000,
            client_base_url: "http://localhost:5173".to_string(),
            jwt_secret: SecretString::from("x".repeat(32)),
            paypal: PaypalConfig {
                client_id: "id".to_string(),
                client_secret: SecretString::from("sekrit"),
                mode: PaypalMode::Sandbox,
            },
            upload_dir: PathBuf::from("uploads"),
            sentry_dsn: None,
        };

        let course = Course {
            id: CourseId::new(3),
            instructor_id: UserId::new(1),
            instructor_name: "Ada".to_string(),
            title: "Systems Programming".to_string(),
            subtitle: None,
            description: None,
            category: None,
            level: None,
            language: None,
            image_url: None,
            welcome_message: None,
            pricing: Price::parse("49.99").unwrap(),
            objectives: None,
            is_published: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let request = build_payment_request(&course, Price::parse("49.99").unwrap(), &config);
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["transactions"][0]["amount"]["total"], "49.99");
        assert_eq!(body["transactions"][0]["item_list"]["items"][0]["sku"], "3");
        assert_eq!(
            body["redirect_urls"]["cancel_url"],
            "http://localhost:5173/payment-cancel"
        );
    }
}
