//! PayPal REST API client - the payment gateway adapter.
//!
//! Wraps the provider's create/execute endpoints behind two promise-style
//! operations so the checkout orchestrator never sees the provider's native
//! call shape. Both operations are pure delegations: no local persistence, no
//! retry. The provider may hold remote state (a pending payment) even when a
//! call fails with a network timeout; resolving that ambiguity would need a
//! provider-side query this client does not implement.
//!
//! OAuth client-credentials tokens are fetched lazily and cached in-process
//! until 60 seconds before expiry.

pub mod types;

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::config::PaypalConfig;

pub use types::{CreatePaymentRequest, PaymentResource};

use types::{Amount, ExecutePaymentRequest, ExecuteTransaction, ProviderError, TokenResponse};

/// Errors from the payment gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP transport failure (connect, timeout, decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider rejected the token request.
    #[error("gateway authentication failed: {0}")]
    Auth(String),

    /// The provider rejected the operation.
    #[error("gateway rejected the request ({status}): {detail}")]
    Rejected { status: u16, detail: String },

    /// The provider's response did not include an approval redirect.
    #[error("no approval URL in gateway response")]
    MissingApprovalUrl,
}

/// A created payment: the provider's handle plus the buyer-approval target.
#[derive(Debug, Clone)]
pub struct CreatedPayment {
    pub payment_id: String,
    pub approve_url: String,
}

/// A successfully executed payment.
#[derive(Debug, Clone)]
pub struct PaymentReceipt {
    pub payment_id: String,
    pub state: Option<String>,
}

struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

/// Client for the PayPal REST payments API.
#[derive(Clone)]
pub struct PaypalClient {
    inner: Arc<PaypalClientInner>,
}

struct PaypalClientInner {
    client: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: SecretString,
    token: RwLock<Option<CachedToken>>,
}

impl PaypalClient {
    /// Create a new gateway client from configuration.
    #[must_use]
    pub fn new(config: &PaypalConfig) -> Self {
        Self {
            inner: Arc::new(PaypalClientInner {
                client: reqwest::Client::new(),
                base_url: config.mode.base_url().to_string(),
                client_id: config.client_id.clone(),
                client_secret: config.client_secret.clone(),
                token: RwLock::new(None),
            }),
        }
    }

    /// Get a valid access token, refreshing through the client-credentials
    /// grant when the cached one is missing or near expiry.
    async fn access_token(&self) -> Result<String, GatewayError> {
        {
            let cached = self.inner.token.read().await;
            if let Some(token) = cached.as_ref()
                && token.expires_at > Utc::now()
            {
                return Ok(token.access_token.clone());
            }
        }

        let response = self
            .inner
            .client
            .post(format!("{}/v1/oauth2/token", self.inner.base_url))
            .basic_auth(
                &self.inner.client_id,
                Some(self.inner.client_secret.expose_secret()),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GatewayError::Auth(format!(
                "token endpoint returned {}",
                response.status()
            )));
        }

        let token: TokenResponse = response.json().await?;
        // Refresh a minute early so in-flight calls never carry a stale token
        let expires_at = Utc::now() + Duration::seconds(token.expires_in.max(60) - 60);

        let mut cached = self.inner.token.write().await;
        *cached = Some(CachedToken {
            access_token: token.access_token.clone(),
            expires_at,
        });

        Ok(token.access_token)
    }

    /// Create a payment and return its id plus the buyer-approval URL.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the provider rejects the request or the
    /// response carries no approval link. Nothing is persisted locally either
    /// way.
    #[instrument(skip(self, request), fields(total = %request.transactions.first().map(|t| t.amount.total.as_str()).unwrap_or("-")))]
    pub async fn create_payment(
        &self,
        request: &CreatePaymentRequest,
    ) -> Result<CreatedPayment, GatewayError> {
        let response = self
            .request(reqwest::Method::POST, "/v1/payments/payment")
            .await?
            .json(request)
            .send()
            .await?;

        let payment: PaymentResource = Self::decode(response).await?;
        debug!(payment_id = %payment.id, "payment created");

        let approve_url = payment
            .approval_url()
            .ok_or(GatewayError::MissingApprovalUrl)?
            .to_string();

        Ok(CreatedPayment {
            payment_id: payment.id,
            approve_url,
        })
    }

    /// Execute a previously approved payment.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the provider rejects the execution.
    #[instrument(skip(self), fields(payment_id = %payment_id))]
    pub async fn execute_payment(
        &self,
        payment_id: &str,
        payer_id: &str,
        total: &str,
    ) -> Result<PaymentReceipt, GatewayError> {
        let body = ExecutePaymentRequest {
            payer_id: payer_id.to_string(),
            transactions: vec![ExecuteTransaction {
                amount: Amount::usd(total),
            }],
        };

        let response = self
            .request(
                reqwest::Method::POST,
                &format!("/v1/payments/payment/{payment_id}/execute"),
            )
            .await?
            .json(&body)
            .send()
            .await?;

        let payment: PaymentResource = Self::decode(response).await?;
        debug!(payment_id = %payment.id, state = ?payment.state, "payment executed");

        Ok(PaymentReceipt {
            payment_id: payment.id,
            state: payment.state,
        })
    }

    async fn request(
        &self,
        method: reqwest::Method,
        path: &str,
    ) -> Result<reqwest::RequestBuilder, GatewayError> {
        let token = self.access_token().await?;
        Ok(self
            .inner
            .client
            .request(method, format!("{}{path}", self.inner.base_url))
            .bearer_auth(token))
    }

    /// Decode a provider response, turning non-success statuses into
    /// `Rejected` with whatever diagnostic the body carries.
    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GatewayError> {
        let status = response.status();

        if !status.is_success() {
            let detail = response
                .json::<ProviderError>()
                .await
                .ok()
                .and_then(|e| e.message.or(e.name))
                .unwrap_or_else(|| "unknown provider error".to_string());
            tracing::warn!(status = %status, detail = %detail, "gateway rejected request");
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                detail,
            });
        }

        Ok(response.json::<T>().await?)
    }
}
