//! JSON REST handlers for reviews.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use serde::Deserialize;

use clinic_domain::review::Review;

use crate::auth::Authenticated;
use crate::error::ApiError;
use crate::state::{Adapters, AppState};

/// Request body for adding a review. The author comes from the credential.
#[derive(Deserialize)]
pub struct CreateReviewRequest {
    #[serde(default)]
    pub text: String,
    pub rating: Option<u8>,
}

/// `POST /add-review`
pub async fn create<A: Adapters>(
    State(state): State<AppState<A>>,
    Authenticated(identity): Authenticated,
    payload: Result<Json<CreateReviewRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Review>), ApiError> {
    let Json(req) = payload?;
    let review = state
        .reviews
        .add_review(&identity, req.text, req.rating)
        .await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// `GET /reviews`
pub async fn list<A: Adapters>(
    State(state): State<AppState<A>>,
) -> Result<Json<Vec<Review>>, ApiError> {
    let reviews = state.reviews.list_reviews().await?;
    Ok(Json(reviews))
}
