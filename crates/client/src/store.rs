//! Client-side auth state.
//!
//! One explicit store with a defined lifecycle instead of ad hoc globals:
//!
//! ```text
//! absent -> issued (login/register) -> attached (each request)
//!        -> cleared (401 response or explicit sign-out) -> absent
//! ```
//!
//! The store is the single place the token lives; every authorized request
//! reads it at send time, and any 401 clears it so the caller knows to
//! re-authenticate.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::types::UserSummary;

/// An issued token plus the user it belongs to.
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: String,
    pub user: UserSummary,
}

/// Shared, cheaply cloneable auth-state store.
#[derive(Debug, Clone, Default)]
pub struct AuthStore {
    inner: Arc<RwLock<Option<Session>>>,
}

impl AuthStore {
    /// Create an empty store (state: absent).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hydrate the store from a previously persisted token, e.g. one the
    /// embedding application saved across restarts.
    #[must_use]
    pub fn with_token(access_token: String, user: UserSummary) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(Session { access_token, user }))),
        }
    }

    /// Store a newly issued session (state: issued).
    pub async fn set(&self, session: Session) {
        *self.inner.write().await = Some(session);
    }

    /// The current token, if any (state: attached when used).
    pub async fn token(&self) -> Option<String> {
        self.inner
            .read()
            .await
            .as_ref()
            .map(|session| session.access_token.clone())
    }

    /// The signed-in user, if any.
    pub async fn user(&self) -> Option<UserSummary> {
        self.inner.read().await.as_ref().map(|s| s.user.clone())
    }

    /// Whether a session is held.
    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.is_some()
    }

    /// Drop the session (state: absent). Called on 401 and on sign-out.
    pub async fn clear(&self) {
        *self.inner.write().await = None;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chalkboard_core::{UserId, UserRole};

    fn user() -> UserSummary {
        UserSummary {
            id: UserId::new(1),
            user_name: "Sam".to_string(),
            user_email: "sam@example.com".to_string(),
            role: UserRole::Student,
        }
    }

    #[tokio::test]
    async fn test_lifecycle_absent_issued_cleared() {
        let store = AuthStore::new();
        assert!(!store.is_authenticated().await);
        assert!(store.token().await.is_none());

        store
            .set(Session {
                access_token: "tok-1".to_string(),
                user: user(),
            })
            .await;
        assert!(store.is_authenticated().await);
        assert_eq!(store.token().await.unwrap(), "tok-1");
        assert_eq!(store.user().await.unwrap().user_name, "Sam");

        store.clear().await;
        assert!(!store.is_authenticated().await);
        assert!(store.token().await.is_none());
    }

    #[tokio::test]
    async fn test_reissue_replaces_session() {
        let store = AuthStore::new();
        store
            .set(Session {
                access_token: "tok-1".to_string(),
                user: user(),
            })
            .await;
        store
            .set(Session {
                access_token: "tok-2".to_string(),
                user: user(),
            })
            .await;

        assert_eq!(store.token().await.unwrap(), "tok-2");
    }
}
