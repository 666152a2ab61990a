//! Order ledger repository.

use sqlx::PgPool;

use chalkboard_core::{CourseId, Email, OrderId, Price, UserId};

use super::RepositoryError;
use crate::models::Order;

const ORDER_COLUMNS: &str = "id, user_id, user_name, user_email, instructor_id, instructor_name, \
     course_id, course_title, course_image, course_pricing, payment_method, payment_status, \
     order_status, payment_id, payer_id, order_date";

/// Fields captured when a checkout is initiated.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub user_id: UserId,
    pub user_name: String,
    pub user_email: Email,
    pub instructor_id: UserId,
    pub instructor_name: String,
    pub course_id: CourseId,
    pub course_title: String,
    pub course_image: Option<String>,
    pub course_pricing: Price,
}

/// Repository for the order ledger.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new order in `pending`/`created` state.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, draft: &OrderDraft) -> Result<Order, RepositoryError> {
        let sql = format!(
            "INSERT INTO orders (user_id, user_name, user_email, instructor_id, instructor_name, \
             course_id, course_title, course_image, course_pricing, payment_method) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'paypal') \
             RETURNING {ORDER_COLUMNS}"
        );

        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(draft.user_id)
            .bind(&draft.user_name)
            .bind(&draft.user_email)
            .bind(draft.instructor_id)
            .bind(&draft.instructor_name)
            .bind(draft.course_id)
            .bind(&draft.course_title)
            .bind(&draft.course_image)
            .bind(draft.course_pricing)
            .fetch_one(self.pool)
            .await?;

        Ok(order)
    }

    /// Look up one order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1");

        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(order)
    }

    /// Mark an order `paid`/`confirmed` and record the provider identifiers.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn finalize(
        &self,
        id: OrderId,
        payment_id: &str,
        payer_id: &str,
    ) -> Result<Order, RepositoryError> {
        let sql = format!(
            "UPDATE orders SET payment_status = 'paid', order_status = 'confirmed', \
             payment_id = $2, payer_id = $3 \
             WHERE id = $1 \
             RETURNING {ORDER_COLUMNS}"
        );

        sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .bind(payment_id)
            .bind(payer_id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }
}
