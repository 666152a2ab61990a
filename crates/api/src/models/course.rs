//! Course catalog domain types.
//!
//! A course owns an ordered curriculum of lectures and a roster of enrolled
//! students. The roster has set semantics: one row per (course, student),
//! enforced by the database, so replayed captures cannot double-enroll.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use chalkboard_core::{CourseId, Email, LectureId, Price, UserId};

/// A course authored by one instructor.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One curriculum item.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Lecture {
    pub id: LectureId,
    pub course_id: CourseId,
    pub title: String,
    pub video_url: String,
    pub free_preview: bool,
    pub position: i32,
}

/// One roster entry: a student who paid for the course.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledStudent {
    pub student_id: UserId,
    pub student_name: String,
    pub student_email: Email,
    pub paid_amount: Price,
}

/// Full course detail: metadata plus curriculum plus roster.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetails {
    #[serde(flatten)]
    pub course: Course,
    pub curriculum: Vec<Lecture>,
    pub students: Vec<EnrolledStudent>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_details_flatten_course_fields() {
        let course = Course {
            id: CourseId::new(3),
            instructor_id: UserId::new(1),
            instructor_name: "Ada".to_string(),
            title: "Systems Programming".to_string(),
            subtitle: None,
            description: None,
            category: Some("engineering".to_string()),
            level: Some("advanced".to_string()),
            language: Some("en".to_string()),
            image_url: None,
            welcome_message: None,
            pricing: Price::parse("49.99").unwrap(),
            objectives: None,
            is_published: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let details = CourseDetails {
            course,
            curriculum: vec![],
            students: vec![],
        };

        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["title"], "Systems Programming");
        assert_eq!(json["pricing"], "49.99");
        assert!(json["curriculum"].as_array().unwrap().is_empty());
        assert!(json["students"].as_array().unwrap().is_empty());
    }
}
