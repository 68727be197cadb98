//! JSON REST handlers for orders.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use clinic_domain::extra::{ExtraFields, strip_keys};
use clinic_domain::id::OrderId;
use clinic_domain::order::Order;
use clinic_domain::outcome::UpdateOutcome;
use clinic_domain::price::Price;

use super::parse_id;
use crate::auth::{AdminCaller, CurrentCaller};
use crate::error::ApiError;
use crate::state::{Adapters, AppState};

/// Keys the server owns on an order; clients cannot set them at booking time.
const SERVER_KEYS: [&str; 5] = ["_id", "paid", "shipped", "transactionId", "createdAt"];

/// Request body for placing an order.
#[derive(Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub treatment: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub slot: String,
    #[serde(default, alias = "totalPrice")]
    pub price: Price,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Deserialize)]
pub struct EmailQuery {
    #[serde(default)]
    pub email: String,
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<Order>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
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

/// `POST /orders`
pub async fn create<A: Adapters>(
    State(state): State<AppState<A>>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<CreateResponse, ApiError> {
    let Json(mut req) = payload?;
    strip_keys(&mut req.extra, &SERVER_KEYS);

    let order = Order::builder()
        .email(req.email)
        .treatment(req.treatment)
        .date(req.date)
        .slot(req.slot)
        .price(req.price)
        .extra(req.extra)
        .build()?;
    let created = state.orders.place_order(order).await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `GET /all-orders`
pub async fn list_all<A: Adapters>(
    State(state): State<AppState<A>>,
    AdminCaller(caller): AdminCaller,
) -> Result<Json<Vec<Order>>, ApiError> {
    let orders = state.orders.list_all(&caller).await?;
    Ok(Json(orders))
}

/// `GET /orders?email=`
pub async fn list_for_customer<A: Adapters>(
    State(state): State<AppState<A>>,
    CurrentCaller(caller): CurrentCaller,
    query: Result<Query<EmailQuery>, QueryRejection>,
) -> Result<Json<Vec<Order>>, ApiError> {
    let Query(query) = query?;
    let orders = state
        .orders
        .list_for_customer(&caller, &query.email)
        .await?;
    Ok(Json(orders))
}

/// `GET /order/:id`
pub async fn get<A: Adapters>(
    State(state): State<AppState<A>>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    let id: OrderId = parse_id(&id)?;
    let order = state.orders.get_order(&caller, id).await?;
    Ok(Json(order))
}

/// `DELETE /orders/:id`
pub async fn delete<A: Adapters>(
    State(state): State<AppState<A>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError> {
    let id: OrderId = parse_id(&id)?;
    state.orders.delete_order(id).await?;
    Ok(DeleteResponse::NoContent)
}

/// `PATCH /ship-order/:id`
pub async fn ship<A: Adapters>(
    State(state): State<AppState<A>>,
    AdminCaller(caller): AdminCaller,
    Path(id): Path<String>,
) -> Result<Json<UpdateOutcome>, ApiError> {
    let id: OrderId = parse_id(&id)?;
    let outcome = state.orders.mark_shipped(&caller, id).await?;
    Ok(Json(outcome))
}
