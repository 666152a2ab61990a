//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use chalkboard_core::{Email, UserId, UserRole};

/// A registered account (domain type).
///
/// Carries the password hash; never serialized directly. Use
/// [`UserProfile`] for anything that leaves the server.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Normalised email address.
    pub email: Email,
    /// Argon2 password hash.
    pub password_hash: String,
    /// Student or instructor.
    pub role: UserRole,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// Public projection of a user, in the client's wire shape.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub user_name: String,
    pub user_email: Email,
    pub role: UserRole,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            user_name: user.name,
            user_email: user.email,
            role: user.role,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_never_carries_the_hash() {
        let user = User {
            id: UserId::new(1),
            name: "Ada".to_string(),
            email: Email::parse("ada@example.com").unwrap(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$abc$def".to_string(),
            role: UserRole::Instructor,
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&UserProfile::from(user)).unwrap();
        assert!(json.contains("\"userName\":\"Ada\""));
        assert!(json.contains("\"userEmail\":\"ada@example.com\""));
        assert!(json.contains("\"role\":\"instructor\""));
        assert!(!json.contains("argon2"));
    }
}
