//! JSON REST handlers for payments.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use serde::Deserialize;

use clinic_domain::id::OrderId;
use clinic_domain::outcome::UpdateOutcome;
use clinic_domain::payment::{PaymentConfirmation, PaymentIntent};
use clinic_domain::price::Price;

use super::parse_id;
use crate::auth::Authenticated;
use crate::error::ApiError;
use crate::state::{Adapters, AppState};

/// Request body for creating a payment intent.
#[derive(Deserialize)]
pub struct CreateIntentRequest {
    #[serde(alias = "totalPrice")]
    pub price: Price,
}

/// `POST /create-payment-intent`
pub async fn create_intent<A: Adapters>(
    State(state): State<AppState<A>>,
    Authenticated(identity): Authenticated,
    payload: Result<Json<CreateIntentRequest>, JsonRejection>,
) -> Result<Json<PaymentIntent>, ApiError> {
    let Json(req) = payload?;
    tracing::debug!(email = %identity.email, "creating payment intent");
    let intent = state.payments.create_intent(req.price).await?;
    Ok(Json(intent))
}

/// `PATCH /order/:id`: record a completed payment.
pub async fn confirm<A: Adapters>(
    State(state): State<AppState<A>>,
    Authenticated(_): Authenticated,
    Path(id): Path<String>,
    payload: Result<Json<PaymentConfirmation>, JsonRejection>,
) -> Result<Json<UpdateOutcome>, ApiError> {
    let id: OrderId = parse_id(&id)?;
    let Json(confirmation) = payload?;
    let outcome = state.payments.confirm_payment(id, confirmation).await?;
    Ok(Json(outcome))
}
