//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod availability;
#[allow(clippy::missing_errors_doc)]
pub mod orders;
#[allow(clippy::missing_errors_doc)]
pub mod payments;
#[allow(clippy::missing_errors_doc)]
pub mod reviews;
#[allow(clippy::missing_errors_doc)]
pub mod services;
#[allow(clippy::missing_errors_doc)]
pub mod users;

use std::str::FromStr;

use axum::Router;
use axum::routing::{delete, get, patch, post, put};

use clinic_domain::error::{ClinicError, ValidationError};

use crate::error::ApiError;
use crate::state::{Adapters, AppState};

/// Build the API router. Paths match the ones the web client already calls.
pub fn routes<A: Adapters>() -> Router<AppState<A>> {
    Router::new()
        // Catalog
        .route(
            "/services",
            get(services::list::<A>).post(services::create::<A>),
        )
        .route("/service/{id}", delete(services::delete::<A>))
        .route(
            "/purchase/{id}",
            get(services::get::<A>).put(services::set_availability::<A>),
        )
        .route("/available", get(availability::for_date::<A>))
        // Orders
        .route(
            "/orders",
            get(orders::list_for_customer::<A>).post(orders::create::<A>),
        )
        .route("/orders/{id}", delete(orders::delete::<A>))
        .route("/all-orders", get(orders::list_all::<A>))
        .route(
            "/order/{id}",
            get(orders::get::<A>).patch(payments::confirm::<A>),
        )
        .route("/ship-order/{id}", patch(orders::ship::<A>))
        // Payments
        .route("/create-payment-intent", post(payments::create_intent::<A>))
        // Users
        .route("/user", get(users::get::<A>))
        .route("/user/{email}", put(users::sign_in::<A>))
        .route("/user-update/{email}", put(users::update_profile::<A>))
        .route("/user/admin/{email}", put(users::promote::<A>))
        .route("/admin/{email}", get(users::is_admin::<A>))
        .route("/all-users", get(users::list::<A>))
        // Reviews
        .route("/add-review", post(reviews::create::<A>))
        .route("/reviews", get(reviews::list::<A>))
}

/// Parse a path identifier, reporting malformed input as a validation error.
fn parse_id<T>(raw: &str) -> Result<T, ApiError>
where
    T: FromStr<Err = ValidationError>,
{
    T::from_str(raw).map_err(|err| ClinicError::from(err).into())
}
