//! User service: sign-in, profiles, and role management.

use clinic_domain::error::{ClinicError, NotFoundError, ValidationError};
use clinic_domain::extra::{ExtraFields, strip_keys};
use clinic_domain::outcome::{UpdateOutcome, UpsertOutcome};
use clinic_domain::user::{Caller, Role, User};

use crate::ports::{TokenCodec, UserRepository};

/// Application service for user accounts.
pub struct UserService<U, T> {
    users: U,
    tokens: T,
}

impl<U: UserRepository, T: TokenCodec> UserService<U, T> {
    pub fn new(users: U, tokens: T) -> Self {
        Self { users, tokens }
    }

    /// Create or update the user keyed by `email` and issue a credential
    /// asserting that email.
    ///
    /// Reserved keys (`email`, `role`, `_id`) are dropped from `profile`, so a
    /// sign-in can never grant a role.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicError::Validation`] for a blank email,
    /// [`ClinicError::Credential`] when signing fails, or a storage error.
    pub async fn sign_in(
        &self,
        email: &str,
        profile: ExtraFields,
    ) -> Result<(UpsertOutcome, String), ClinicError> {
        let outcome = self.update_profile(email, profile).await?;
        let token = self.tokens.issue(email)?;
        tracing::info!(email, ?outcome, "user signed in");
        Ok((outcome, token))
    }

    /// Create or merge the profile of `email` without issuing a credential.
    ///
    /// # Errors
    ///
    /// See [`UserService::sign_in`].
    pub async fn update_profile(
        &self,
        email: &str,
        mut profile: ExtraFields,
    ) -> Result<UpsertOutcome, ClinicError> {
        if email.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "email" }.into());
        }
        let stripped = strip_keys(&mut profile, &User::RESERVED_KEYS);
        if stripped > 0 {
            tracing::warn!(email, stripped, "reserved keys dropped from profile update");
        }
        self.users.upsert(email.to_string(), profile).await
    }

    /// # Errors
    ///
    /// Returns [`ClinicError::NotFound`] when no user has `email`, or a
    /// storage error.
    pub async fn get_user(&self, email: &str) -> Result<User, ClinicError> {
        self.users
            .get_by_email(email.to_string())
            .await?
            .ok_or_else(|| {
                NotFoundError {
                    entity: "User",
                    id: email.to_string(),
                }
                .into()
            })
    }

    /// # Errors
    ///
    /// Returns a storage error.
    pub async fn list_users(&self) -> Result<Vec<User>, ClinicError> {
        self.users.get_all().await
    }

    /// Whether `email` holds the admin role. Unknown users are not admins.
    ///
    /// # Errors
    ///
    /// Returns a storage error.
    pub async fn is_admin(&self, email: &str) -> Result<bool, ClinicError> {
        Ok(self
            .users
            .get_by_email(email.to_string())
            .await?
            .is_some_and(|user| user.role.is_admin()))
    }

    /// Grant the admin role to an existing user.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Forbidden`] unless `caller` is an admin,
    /// [`ClinicError::NotFound`] when the target does not exist, or a
    /// storage error.
    pub async fn promote(&self, caller: &Caller, email: &str) -> Result<UpdateOutcome, ClinicError> {
        caller.require_admin().map_err(|err| {
            tracing::warn!(by = %caller.email, target = email, "promotion refused");
            ClinicError::from(err)
        })?;
        let outcome = self.users.set_role(email.to_string(), Role::Admin).await?;
        if !outcome.found() {
            return Err(NotFoundError {
                entity: "User",
                id: email.to_string(),
            }
            .into());
        }
        tracing::info!(by = %caller.email, target = email, "user promoted to admin");
        Ok(outcome)
    }
}
