//! Authentication extractors.
//!
//! Handlers opt into authentication by taking one of these extractors:
//!
//! ```rust,ignore
//! async fn handler(CurrentCaller(caller): CurrentCaller) -> impl IntoResponse {
//!     format!("Hello, {}!", caller.email)
//! }
//! ```

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use clinic_domain::error::AuthError;
use clinic_domain::user::{Caller, Identity};

use crate::error::ApiError;
use crate::state::{Adapters, AppState};

/// Extractor that requires a verified bearer credential.
///
/// A missing `Authorization` header is rejected with 401; anything that
/// fails verification is rejected with 403.
pub struct Authenticated(pub Identity);

/// Extractor that requires a verified credential and loads the caller's role.
pub struct CurrentCaller(pub Caller);

/// Extractor that requires a verified credential belonging to an admin.
pub struct AdminCaller(pub Caller);

fn authenticate<A: Adapters>(parts: &Parts, state: &AppState<A>) -> Result<Identity, ApiError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .map(|value| value.to_str().map_err(|_| AuthError::Unauthorized))
        .transpose()?;
    Ok(state.identity.authenticate(header)?)
}

impl<A: Adapters> FromRequestParts<AppState<A>> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<A>,
    ) -> Result<Self, Self::Rejection> {
        authenticate(parts, state).map(Self)
    }
}

impl<A: Adapters> FromRequestParts<AppState<A>> for CurrentCaller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<A>,
    ) -> Result<Self, Self::Rejection> {
        let identity = authenticate(parts, state)?;
        let caller = state.identity.resolve(&identity).await?;
        Ok(Self(caller))
    }
}

impl<A: Adapters> FromRequestParts<AppState<A>> for AdminCaller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<A>,
    ) -> Result<Self, Self::Rejection> {
        let identity = authenticate(parts, state)?;
        let caller = state.identity.require_admin(&identity).await?;
        Ok(Self(caller))
    }
}
