//! Typed API client for Chalkboard.
//!
//! Wraps the REST surface behind typed methods and owns the client-side auth
//! state: `register`/`login` store the issued token, every authorized call
//! attaches it as a bearer header, and any 401 response clears the store so
//! the embedding application knows to send the user back to sign-in.
//!
//! # Example
//!
//! ```rust,ignore
//! use chalkboard_client::ChalkboardClient;
//!
//! let client = ChalkboardClient::new("http://localhost:5000")?;
//! client.login("sam@example.com", "hunter2hunter2").await?;
//!
//! let courses = client.courses().await?;
//! let approval = client.initiate_checkout(&checkout).await?;
//! // ...buyer approves at approval.approve_url...
//! let order = client.capture_checkout("PAY-1", "PAYER-1", approval.order_id).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod store;
pub mod types;

pub use store::{AuthStore, Session};
pub use types::{
    AuthPayload, CheckoutApproval, CourseSummary, EnrollmentSummary, OrderSummary, UserSummary,
};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use chalkboard_core::{CourseId, OrderId, UserId};

use types::Envelope;

/// Errors from the API client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a failure envelope.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A success envelope arrived without the expected data.
    #[error("malformed API response: {0}")]
    Malformed(String),

    /// The operation needs a signed-in user and the store is empty.
    #[error("not authenticated")]
    NotAuthenticated,
}

/// Checkout initiation input.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutInput {
    pub user_id: UserId,
    pub user_name: String,
    pub user_email: String,
    pub course_id: CourseId,
    pub course_pricing: String,
}

/// The Chalkboard API client.
#[derive(Debug, Clone)]
pub struct ChalkboardClient {
    http: reqwest::Client,
    base_url: String,
    auth: AuthStore,
}

impl ChalkboardClient {
    /// Create a client against the given base URL with an empty auth store.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Http` if the underlying HTTP client cannot be
    /// built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth: AuthStore::new(),
        })
    }

    /// Create a client hydrated from a previously persisted session.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Http` if the underlying HTTP client cannot be
    /// built.
    pub fn with_session(
        base_url: impl Into<String>,
        access_token: String,
        user: UserSummary,
    ) -> Result<Self, ClientError> {
        let mut client = Self::new(base_url)?;
        client.auth = AuthStore::with_token(access_token, user);
        Ok(client)
    }

    /// The auth-state store.
    #[must_use]
    pub const fn auth(&self) -> &AuthStore {
        &self.auth
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Register an account; stores the issued token on success.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with the server's message on failure
    /// (e.g. duplicate email).
    pub async fn register(
        &self,
        user_name: &str,
        user_email: &str,
        password: &str,
        role: &str,
    ) -> Result<UserSummary, ClientError> {
        let payload: AuthPayload = self
            .execute(self.http.post(self.url("/api/auth/register")).json(
                &serde_json::json!({
                    "userName": user_name,
                    "userEmail": user_email,
                    "password": password,
                    "role": role,
                }),
            ))
            .await?;

        self.auth
            .set(Session {
                access_token: payload.access_token,
                user: payload.user.clone(),
            })
            .await;

        Ok(payload.user)
    }

    /// Login; stores the issued token on success.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` on bad credentials; the store stays empty.
    pub async fn login(
        &self,
        user_email: &str,
        password: &str,
    ) -> Result<UserSummary, ClientError> {
        let payload: AuthPayload = self
            .execute(self.http.post(self.url("/api/auth/login")).json(
                &serde_json::json!({
                    "userEmail": user_email,
                    "password": password,
                }),
            ))
            .await?;

        self.auth
            .set(Session {
                access_token: payload.access_token,
                user: payload.user.clone(),
            })
            .await;

        Ok(payload.user)
    }

    /// The current user, verified against the server.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotAuthenticated` with an empty store, or
    /// `ClientError::Api` (and a cleared store) if the token is rejected.
    pub async fn me(&self) -> Result<UserSummary, ClientError> {
        let request = self.authorized(self.http.get(self.url("/api/users/me"))).await?;
        self.execute(request).await
    }

    /// Drop the stored session.
    pub async fn sign_out(&self) {
        self.auth.clear().await;
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// List every course.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` on server failure.
    pub async fn courses(&self) -> Result<Vec<CourseSummary>, ClientError> {
        self.execute(self.http.get(self.url("/api/courses/get")))
            .await
    }

    /// Full course detail, as raw JSON (metadata + curriculum + roster).
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with 404 for an unknown course.
    pub async fn course_details(&self, id: CourseId) -> Result<serde_json::Value, ClientError> {
        self.execute(
            self.http
                .get(self.url(&format!("/api/courses/get/details/{id}"))),
        )
        .await
    }

    /// Create a course (instructor role required).
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` on validation or authorization failure.
    pub async fn create_course(
        &self,
        payload: &serde_json::Value,
    ) -> Result<CourseSummary, ClientError> {
        let request = self
            .authorized(self.http.post(self.url("/api/courses/add")))
            .await?;
        self.execute(request.json(payload)).await
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Initiate a checkout; returns the approval redirect and the order id.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` on validation or gateway failure.
    pub async fn initiate_checkout(
        &self,
        checkout: &CheckoutInput,
    ) -> Result<CheckoutApproval, ClientError> {
        let request = self
            .authorized(self.http.post(self.url("/api/orders/create")))
            .await?;
        self.execute(request.json(checkout)).await
    }

    /// Capture an approved checkout.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` on gateway failure; the order stays
    /// pending server-side.
    pub async fn capture_checkout(
        &self,
        payment_id: &str,
        payer_id: &str,
        order_id: OrderId,
    ) -> Result<OrderSummary, ClientError> {
        let request = self
            .authorized(self.http.post(self.url("/api/orders/capture")))
            .await?;
        self.execute(request.json(&serde_json::json!({
            "paymentId": payment_id,
            "payerId": payer_id,
            "orderId": order_id,
        })))
        .await
    }

    /// The caller's purchased courses.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotAuthenticated` with an empty store.
    pub async fn my_enrollments(&self) -> Result<Vec<EnrollmentSummary>, ClientError> {
        let request = self
            .authorized(self.http.get(self.url("/api/enrollments/me")))
            .await?;
        self.execute(request).await
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Attach the stored bearer token, failing fast when there is none.
    async fn authorized(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, ClientError> {
        let token = self
            .auth
            .token()
            .await
            .ok_or(ClientError::NotAuthenticated)?;
        Ok(request.bearer_auth(token))
    }

    /// Send a request and unwrap the `{success, data}` envelope. A 401
    /// clears the auth store before the error is returned.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            // Token rejected: back to the absent state
            self.auth.clear().await;
        }

        if !status.is_success() {
            let message = response
                .json::<Envelope<serde_json::Value>>()
                .await
                .ok()
                .and_then(|envelope| envelope.message)
                .unwrap_or_else(|| "request failed".to_string());

            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: Envelope<T> = response.json().await?;
        envelope
            .data
            .ok_or_else(|| ClientError::Malformed("success envelope without data".to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_normalised() {
        let client = ChalkboardClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.url("/api/courses/get"), "http://localhost:5000/api/courses/get");
    }

    #[tokio::test]
    async fn test_authorized_requires_a_session() {
        let client = ChalkboardClient::new("http://localhost:5000").unwrap();
        let result = client
            .authorized(client.http.get(client.url("/api/users/me")))
            .await;
        assert!(matches!(result, Err(ClientError::NotAuthenticated)));
    }

    #[test]
    fn test_checkout_input_wire_shape() {
        let input = CheckoutInput {
            user_id: UserId::new(2),
            user_name: "Sam".to_string(),
            user_email: "sam@example.com".to_string(),
            course_id: CourseId::new(3),
            course_pricing: "49.99".to_string(),
        };

        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["userId"], 2);
        assert_eq!(json["courseId"], 3);
        assert_eq!(json["coursePricing"], "49.99");
    }
}
