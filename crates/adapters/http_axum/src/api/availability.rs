//! Availability handler.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use serde::Deserialize;

use clinic_domain::catalog::Service;

use crate::error::ApiError;
use crate::state::{Adapters, AppState};

#[derive(Deserialize)]
pub struct DateQuery {
    #[serde(default)]
    pub date: String,
}

/// `GET /available?date=`
pub async fn for_date<A: Adapters>(
    State(state): State<AppState<A>>,
    query: Result<Query<DateQuery>, QueryRejection>,
) -> Result<Json<Vec<Service>>, ApiError> {
    let Query(query) = query?;
    let services = state.availability.available_on(&query.date).await?;
    Ok(Json(services))
}
