//! Enrollment ledger repository.

use sqlx::PgPool;

use chalkboard_core::UserId;

use super::RepositoryError;
use crate::models::Enrollment;

/// Repository for per-student purchased-course records.
pub struct EnrollmentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> EnrollmentRepository<'a> {
    /// Create a new enrollment repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Record a purchase in the student's ledger.
    ///
    /// Keyed (user, course); replaying the same purchase is a no-op. Returns
    /// `true` if the row was inserted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn add(&self, enrollment: &Enrollment) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO enrollments (user_id, course_id, course_title, instructor_id, \
             instructor_name, course_image, date_of_purchase) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (user_id, course_id) DO NOTHING",
        )
        .bind(enrollment.user_id)
        .bind(enrollment.course_id)
        .bind(&enrollment.course_title)
        .bind(enrollment.instructor_id)
        .bind(&enrollment.instructor_name)
        .bind(&enrollment.course_image)
        .bind(enrollment.date_of_purchase)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Every course the student has purchased, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Enrollment>, RepositoryError> {
        let enrollments = sqlx::query_as::<_, Enrollment>(
            "SELECT user_id, course_id, course_title, instructor_id, instructor_name, \
             course_image, date_of_purchase \
             FROM enrollments WHERE user_id = $1 ORDER BY date_of_purchase DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(enrollments)
    }
}
