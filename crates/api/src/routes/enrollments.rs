//! Enrollment route handlers.

use axum::{Json, extract::State};

use crate::db::enrollments::EnrollmentRepository;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::Enrollment;
use crate::routes::Envelope;
use crate::state::AppState;

/// The caller's purchased courses, newest first.
///
/// GET /api/enrollments/me (bearer)
///
/// # Errors
///
/// 500 on database failure.
pub async fn mine(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Envelope<Vec<Enrollment>>>> {
    let enrollments = EnrollmentRepository::new(state.pool())
        .list_for_user(user.user_id)
        .await?;

    Ok(Envelope::data(enrollments))
}
