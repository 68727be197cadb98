//! JSON REST handlers for users and roles.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use clinic_domain::extra::ExtraFields;
use clinic_domain::outcome::{UpdateOutcome, UpsertOutcome};
use clinic_domain::user::User;

use crate::auth::{AdminCaller, Authenticated};
use crate::error::ApiError;
use crate::state::{Adapters, AppState};

#[derive(Deserialize)]
pub struct EmailQuery {
    #[serde(default)]
    pub email: String,
}

#[derive(Serialize)]
pub struct SignInResponse {
    pub outcome: UpsertOutcome,
    pub token: String,
}

#[derive(Serialize)]
pub struct ProfileResponse {
    pub outcome: UpsertOutcome,
}

#[derive(Serialize)]
pub struct AdminResponse {
    pub admin: bool,
}

/// Missing or empty bodies count as an empty profile.
fn profile(payload: Result<Json<ExtraFields>, JsonRejection>) -> Result<ExtraFields, ApiError> {
    match payload {
        Ok(Json(fields)) => Ok(fields),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(ExtraFields::new()),
        Err(rejection) => Err(rejection.into()),
    }
}

/// `PUT /user/:email`: create or update the user and hand back a credential.
pub async fn sign_in<A: Adapters>(
    State(state): State<AppState<A>>,
    Path(email): Path<String>,
    payload: Result<Json<ExtraFields>, JsonRejection>,
) -> Result<Json<SignInResponse>, ApiError> {
    let (outcome, token) = state.users.sign_in(&email, profile(payload)?).await?;
    Ok(Json(SignInResponse { outcome, token }))
}

/// `PUT /user-update/:email`
pub async fn update_profile<A: Adapters>(
    State(state): State<AppState<A>>,
    Path(email): Path<String>,
    payload: Result<Json<ExtraFields>, JsonRejection>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let outcome = state
        .users
        .update_profile(&email, profile(payload)?)
        .await?;
    Ok(Json(ProfileResponse { outcome }))
}

/// `GET /user?email=`
pub async fn get<A: Adapters>(
    State(state): State<AppState<A>>,
    query: Result<Query<EmailQuery>, QueryRejection>,
) -> Result<Json<User>, ApiError> {
    let Query(query) = query?;
    let user = state.users.get_user(&query.email).await?;
    Ok(Json(user))
}

/// `GET /all-users`
pub async fn list<A: Adapters>(
    State(state): State<AppState<A>>,
    Authenticated(_): Authenticated,
) -> Result<Json<Vec<User>>, ApiError> {
    let users = state.users.list_users().await?;
    Ok(Json(users))
}

/// `GET /admin/:email`
pub async fn is_admin<A: Adapters>(
    State(state): State<AppState<A>>,
    Path(email): Path<String>,
) -> Result<Json<AdminResponse>, ApiError> {
    let admin = state.users.is_admin(&email).await?;
    Ok(Json(AdminResponse { admin }))
}

/// `PUT /user/admin/:email`
pub async fn promote<A: Adapters>(
    State(state): State<AppState<A>>,
    AdminCaller(caller): AdminCaller,
    Path(email): Path<String>,
) -> Result<Json<UpdateOutcome>, ApiError> {
    let outcome = state.users.promote(&caller, &email).await?;
    Ok(Json(outcome))
}
