//! Checkout route handlers.
//!
//! Thin wrappers over the orchestrator: deserialize, delegate, envelope.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use tracing::instrument;

use chalkboard_core::OrderId;

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::Order;
use crate::routes::Envelope;
use crate::services::OrderService;
use crate::services::orders::{CaptureRequest, CheckoutRequest};
use crate::state::AppState;

/// Initiated-checkout response: where to send the buyer, and which order to
/// capture once they approve.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub approve_url: String,
    pub order_id: OrderId,
}

/// Initiate a checkout.
///
/// POST /api/orders/create (bearer)
///
/// # Errors
///
/// 400 for missing/invalid checkout fields, 404 for an unknown course, 500
/// if the payment provider rejects the payment (nothing persisted locally).
#[instrument(skip(state, request))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(request): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<Envelope<CheckoutResponse>>)> {
    let service = OrderService::new(state.pool(), state.gateway(), state.config());
    let initiated = service.initiate_checkout(request).await?;

    Ok((
        StatusCode::CREATED,
        Envelope::data(CheckoutResponse {
            approve_url: initiated.approve_url,
            order_id: initiated.order_id,
        }),
    ))
}

/// Execute the approved payment and finalize the order.
///
/// POST /api/orders/capture (bearer)
///
/// # Errors
///
/// 400 for missing identifiers, 404 for an unknown order, 500 if the
/// provider rejects execution (the order stays `pending`).
#[instrument(skip(state, request))]
pub async fn capture(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(request): Json<CaptureRequest>,
) -> Result<Json<Envelope<Order>>> {
    let service = OrderService::new(state.pool(), state.gateway(), state.config());
    let order = service.capture_checkout(request).await?;

    Ok(Envelope::with_message("Order confirmed", order))
}
