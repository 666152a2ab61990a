//! Course catalog route handlers.
//!
//! Reads are public; mutations require the instructor role. The authoring
//! payload carries the curriculum inline, and update replaces it wholesale -
//! the course editor always submits the full lecture list.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use chalkboard_core::{CourseId, Price};

use crate::db::courses::{CourseDraft, CourseRepository, LectureDraft};
use crate::error::{AppError, Result};
use crate::middleware::RequireInstructor;
use crate::models::{Course, CourseDetails};
use crate::routes::Envelope;
use crate::services::AuthService;
use crate::state::AppState;

/// Course authoring payload (create and update).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoursePayload {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub level: Option<String>,
    pub language: Option<String>,
    pub image_url: Option<String>,
    pub welcome_message: Option<String>,
    pub pricing: Option<String>,
    pub objectives: Option<String>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub curriculum: Vec<LecturePayload>,
}

/// One curriculum item in the authoring payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LecturePayload {
    pub title: String,
    pub video_url: String,
    #[serde(default)]
    pub free_preview: bool,
}

impl CoursePayload {
    /// Validate the payload into a draft owned by the given instructor.
    fn into_draft(
        self,
        instructor_id: chalkboard_core::UserId,
        instructor_name: String,
    ) -> Result<CourseDraft> {
        let Some(title) = self.title.filter(|t| !t.trim().is_empty()) else {
            return Err(AppError::Validation("title is required".to_string()));
        };

        let pricing = self
            .pricing
            .ok_or_else(|| AppError::Validation("pricing is required".to_string()))?;
        let pricing =
            Price::parse(&pricing).map_err(|e| AppError::Validation(e.to_string()))?;

        Ok(CourseDraft {
            instructor_id,
            instructor_name,
            title,
            subtitle: self.subtitle,
            description: self.description,
            category: self.category,
            level: self.level,
            language: self.language,
            image_url: self.image_url,
            welcome_message: self.welcome_message,
            pricing,
            objectives: self.objectives,
            is_published: self.is_published,
            lectures: self
                .curriculum
                .into_iter()
                .map(|lecture| LectureDraft {
                    title: lecture.title,
                    video_url: lecture.video_url,
                    free_preview: lecture.free_preview,
                })
                .collect(),
        })
    }
}

/// Create a course.
///
/// POST /api/courses/add (instructor)
///
/// # Errors
///
/// 400 for a missing title or invalid pricing; 401/403 for auth failures.
#[instrument(skip(state, payload))]
pub async fn add(
    State(state): State<AppState>,
    RequireInstructor(instructor): RequireInstructor,
    Json(payload): Json<CoursePayload>,
) -> Result<(StatusCode, Json<Envelope<Course>>)> {
    // The token only carries the id; the display name comes from the account
    let auth = AuthService::new(state.pool(), &state.config().jwt_secret);
    let profile = auth.profile(instructor.user_id).await?;

    let draft = payload.into_draft(instructor.user_id, profile.user_name)?;
    let course = CourseRepository::new(state.pool()).create(&draft).await?;

    tracing::info!(course_id = %course.id, "course created");

    Ok((
        StatusCode::CREATED,
        Envelope::with_message("Course created successfully", course),
    ))
}

/// List every course.
///
/// GET /api/courses/get
///
/// # Errors
///
/// 500 on database failure.
pub async fn list(State(state): State<AppState>) -> Result<Json<Envelope<Vec<Course>>>> {
    let courses = CourseRepository::new(state.pool()).list().await?;
    Ok(Envelope::data(courses))
}

/// Full course detail: metadata, curriculum, roster.
///
/// GET /api/courses/get/details/{id}
///
/// # Errors
///
/// 404 if the course does not exist.
pub async fn details(
    State(state): State<AppState>,
    Path(id): Path<CourseId>,
) -> Result<Json<Envelope<CourseDetails>>> {
    let details = CourseRepository::new(state.pool())
        .details(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Course cannot be found".to_string()))?;

    Ok(Envelope::data(details))
}

/// Update a course, replacing its curriculum.
///
/// PUT /api/courses/update/{id} (instructor)
///
/// # Errors
///
/// 400 for invalid payload, 404 for an unknown course.
#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    RequireInstructor(instructor): RequireInstructor,
    Path(id): Path<CourseId>,
    Json(payload): Json<CoursePayload>,
) -> Result<Json<Envelope<Course>>> {
    let auth = AuthService::new(state.pool(), &state.config().jwt_secret);
    let profile = auth.profile(instructor.user_id).await?;

    let draft = payload.into_draft(instructor.user_id, profile.user_name)?;
    let course = CourseRepository::new(state.pool())
        .update(id, &draft)
        .await?
        .ok_or_else(|| AppError::NotFound("Course cannot be found".to_string()))?;

    Ok(Envelope::with_message("Course updated successfully", course))
}

/// Delete a course.
///
/// DELETE /api/courses/delete/{courseId} (instructor)
///
/// # Errors
///
/// 404 for an unknown course.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    RequireInstructor(_instructor): RequireInstructor,
    Path(course_id): Path<CourseId>,
) -> Result<Json<Envelope<CourseId>>> {
    let deleted = CourseRepository::new(state.pool()).delete(course_id).await?;

    if !deleted {
        return Err(AppError::NotFound("Course cannot be found".to_string()));
    }

    Ok(Envelope::with_message("Course deleted successfully", course_id))
}
