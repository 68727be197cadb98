//! JSON REST handlers for the service catalog.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use clinic_domain::catalog::Service;
use clinic_domain::extra::{ExtraFields, strip_keys};
use clinic_domain::id::ServiceId;
use clinic_domain::outcome::UpsertOutcome;
use clinic_domain::price::Price;

use super::parse_id;
use crate::error::ApiError;
use crate::state::{Adapters, AppState};

/// Request body for creating a service.
#[derive(Deserialize)]
pub struct CreateServiceRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub slots: Vec<String>,
    pub available: Option<bool>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Request body for toggling availability.
#[derive(Deserialize)]
pub struct AvailabilityRequest {
    pub available: bool,
}

#[derive(Serialize)]
pub struct OutcomeBody {
    pub outcome: UpsertOutcome,
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<Service>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the availability upsert endpoint.
pub enum UpsertResponse {
    Created(Json<OutcomeBody>),
    Updated(Json<OutcomeBody>),
}

impl IntoResponse for UpsertResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
            Self::Updated(json) => json.into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `GET /services`
pub async fn list<A: Adapters>(
    State(state): State<AppState<A>>,
) -> Result<Json<Vec<Service>>, ApiError> {
    let services = state.catalog.list_services().await?;
    Ok(Json(services))
}

/// `GET /purchase/:id`
pub async fn get<A: Adapters>(
    State(state): State<AppState<A>>,
    Path(id): Path<String>,
) -> Result<Json<Service>, ApiError> {
    let id: ServiceId = parse_id(&id)?;
    let service = state.catalog.get_service(id).await?;
    Ok(Json(service))
}

/// `POST /services`
pub async fn create<A: Adapters>(
    State(state): State<AppState<A>>,
    payload: Result<Json<CreateServiceRequest>, JsonRejection>,
) -> Result<CreateResponse, ApiError> {
    let Json(mut req) = payload?;
    strip_keys(&mut req.extra, &["_id"]);

    let service = Service::builder()
        .name(req.name)
        .price(req.price)
        .slots(req.slots)
        .available(req.available.unwrap_or(true))
        .extra(req.extra)
        .build();
    let created = state.catalog.create_service(service).await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `PUT /purchase/:id`
pub async fn set_availability<A: Adapters>(
    State(state): State<AppState<A>>,
    Path(id): Path<String>,
    payload: Result<Json<AvailabilityRequest>, JsonRejection>,
) -> Result<UpsertResponse, ApiError> {
    let id: ServiceId = parse_id(&id)?;
    let Json(req) = payload?;
    let outcome = state.catalog.set_availability(id, req.available).await?;
    let body = Json(OutcomeBody { outcome });
    Ok(match outcome {
        UpsertOutcome::Created => UpsertResponse::Created(body),
        UpsertOutcome::Updated => UpsertResponse::Updated(body),
    })
}

/// `DELETE /service/:id`
pub async fn delete<A: Adapters>(
    State(state): State<AppState<A>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError> {
    let id: ServiceId = parse_id(&id)?;
    state.catalog.delete_service(id).await?;
    Ok(DeleteResponse::NoContent)
}
