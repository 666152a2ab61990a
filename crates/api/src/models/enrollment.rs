//! Enrollment ledger domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use chalkboard_core::{CourseId, UserId};

/// One purchased-course record in a student's enrollment ledger.
///
/// Keyed (user, course) in the database, so at most one entry exists per
/// student per course regardless of how many times a capture is replayed.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub user_id: UserId,
    pub course_id: CourseId,
    pub course_title: String,
    pub instructor_id: UserId,
    pub instructor_name: String,
    pub course_image: Option<String>,
    pub date_of_purchase: DateTime<Utc>,
}
