//! Course catalog repository.
//!
//! Courses and their curriculum are written together: create inserts the
//! course plus its lectures in one transaction, update replaces the lecture
//! list wholesale. The roster add uses `ON CONFLICT DO NOTHING` so replaying
//! a capture for the same (course, student) pair is a no-op.

use sqlx::{PgPool, Postgres, Transaction};

use chalkboard_core::{CourseId, Price, UserId};

use super::RepositoryError;
use crate::models::{Course, CourseDetails, EnrolledStudent, Lecture};

const COURSE_COLUMNS: &str = "id, instructor_id, instructor_name, title, subtitle, description, \
     category, level, language, image_url, welcome_message, pricing, objectives, is_published, \
     created_at, updated_at";

/// Fields for a new or updated course record.
#[derive(Debug, Clone)]
pub struct CourseDraft {
    pub instructor_id: UserId,
    pub instructor_name: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub level: Option<String>,
    pub language: Option<String>,
    pub image_url: Option<String>,
    pub welcome_message: Option<String>,
    pub pricing: Price,
    pub objectives: Option<String>,
    pub is_published: bool,
    pub lectures: Vec<LectureDraft>,
}

/// One curriculum item in a draft; position comes from list order.
#[derive(Debug, Clone)]
pub struct LectureDraft {
    pub title: String,
    pub video_url: String,
    pub free_preview: bool,
}

/// Repository for courses, curriculum, and the enrolled-student roster.
pub struct CourseRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CourseRepository<'a> {
    /// Create a new course repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a course with its curriculum.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any insert fails.
    pub async fn create(&self, draft: &CourseDraft) -> Result<Course, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO courses (instructor_id, instructor_name, title, subtitle, description, \
             category, level, language, image_url, welcome_message, pricing, objectives, \
             is_published) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {COURSE_COLUMNS}"
        );

        let course = sqlx::query_as::<_, Course>(&sql)
            .bind(draft.instructor_id)
            .bind(&draft.instructor_name)
            .bind(&draft.title)
            .bind(&draft.subtitle)
            .bind(&draft.description)
            .bind(&draft.category)
            .bind(&draft.level)
            .bind(&draft.language)
            .bind(&draft.image_url)
            .bind(&draft.welcome_message)
            .bind(draft.pricing)
            .bind(&draft.objectives)
            .bind(draft.is_published)
            .fetch_one(&mut *tx)
            .await?;

        insert_lectures(&mut tx, course.id, &draft.lectures).await?;

        tx.commit().await?;

        Ok(course)
    }

    /// List every course, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Course>, RepositoryError> {
        let sql = format!("SELECT {COURSE_COLUMNS} FROM courses ORDER BY created_at DESC");

        let courses = sqlx::query_as::<_, Course>(&sql)
            .fetch_all(self.pool)
            .await?;

        Ok(courses)
    }

    /// Look up one course.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(&self, id: CourseId) -> Result<Option<Course>, RepositoryError> {
        let sql = format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1");

        let course = sqlx::query_as::<_, Course>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(course)
    }

    /// Full detail: course plus curriculum plus roster.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any query fails.
    pub async fn details(&self, id: CourseId) -> Result<Option<CourseDetails>, RepositoryError> {
        let Some(course) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let curriculum = self.lectures(id).await?;
        let students = self.students(id).await?;

        Ok(Some(CourseDetails {
            course,
            curriculum,
            students,
        }))
    }

    /// Update a course and replace its curriculum.
    ///
    /// Returns `None` if the course does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails.
    pub async fn update(
        &self,
        id: CourseId,
        draft: &CourseDraft,
    ) -> Result<Option<Course>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "UPDATE courses SET title = $2, subtitle = $3, description = $4, category = $5, \
             level = $6, language = $7, image_url = $8, welcome_message = $9, pricing = $10, \
             objectives = $11, is_published = $12, updated_at = now() \
             WHERE id = $1 \
             RETURNING {COURSE_COLUMNS}"
        );

        let Some(course) = sqlx::query_as::<_, Course>(&sql)
            .bind(id)
            .bind(&draft.title)
            .bind(&draft.subtitle)
            .bind(&draft.description)
            .bind(&draft.category)
            .bind(&draft.level)
            .bind(&draft.language)
            .bind(&draft.image_url)
            .bind(&draft.welcome_message)
            .bind(draft.pricing)
            .bind(&draft.objectives)
            .bind(draft.is_published)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM course_lectures WHERE course_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        insert_lectures(&mut tx, id, &draft.lectures).await?;

        tx.commit().await?;

        Ok(Some(course))
    }

    /// Delete a course. Lectures and roster rows cascade.
    ///
    /// Returns `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn delete(&self, id: CourseId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Curriculum for one course, in position order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lectures(&self, id: CourseId) -> Result<Vec<Lecture>, RepositoryError> {
        let lectures = sqlx::query_as::<_, Lecture>(
            "SELECT id, course_id, title, video_url, free_preview, position \
             FROM course_lectures WHERE course_id = $1 ORDER BY position ASC",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(lectures)
    }

    /// Roster for one course.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn students(&self, id: CourseId) -> Result<Vec<EnrolledStudent>, RepositoryError> {
        let students = sqlx::query_as::<_, EnrolledStudent>(
            "SELECT student_id, student_name, student_email, paid_amount \
             FROM course_students WHERE course_id = $1 ORDER BY student_id ASC",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(students)
    }

    /// Set-add a student to the roster.
    ///
    /// Returns `true` if the row was inserted, `false` if the student was
    /// already on the roster.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn add_student(
        &self,
        course_id: CourseId,
        student: &EnrolledStudent,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO course_students (course_id, student_id, student_name, student_email, \
             paid_amount) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (course_id, student_id) DO NOTHING",
        )
        .bind(course_id)
        .bind(student.student_id)
        .bind(&student.student_name)
        .bind(&student.student_email)
        .bind(student.paid_amount)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

async fn insert_lectures(
    tx: &mut Transaction<'_, Postgres>,
    course_id: CourseId,
    lectures: &[LectureDraft],
) -> Result<(), RepositoryError> {
    for (position, lecture) in lectures.iter().enumerate() {
        let position = i32::try_from(position)
            .map_err(|_| RepositoryError::DataCorruption("curriculum too long".to_owned()))?;

        sqlx::query(
            "INSERT INTO course_lectures (course_id, title, video_url, free_preview, position) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(course_id)
        .bind(&lecture.title)
        .bind(&lecture.video_url)
        .bind(lecture.free_preview)
        .bind(position)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}
