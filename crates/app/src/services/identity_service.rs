//! Identity service: turns a bearer header into a verified caller.

use clinic_domain::error::{AuthError, ClinicError};
use clinic_domain::user::{Caller, Identity, Role};

use crate::ports::{TokenCodec, UserRepository};

const BEARER: &str = "Bearer";

/// Verifies credentials and loads the caller's role for the current request.
///
/// Roles are never cached: a promotion takes effect on the next request.
pub struct IdentityService<U, T> {
    users: U,
    tokens: T,
}

impl<U: UserRepository, T: TokenCodec> IdentityService<U, T> {
    pub fn new(users: U, tokens: T) -> Self {
        Self { users, tokens }
    }

    /// Verify the raw value of an `Authorization` header.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unauthenticated`] when the header is missing and
    /// [`AuthError::Unauthorized`] when it is not a well-formed bearer
    /// credential or fails verification.
    pub fn authenticate(&self, header: Option<&str>) -> Result<Identity, ClinicError> {
        let header = header.ok_or(AuthError::Unauthenticated)?;
        let token = match header.split_once(' ') {
            Some((scheme, token)) if scheme.eq_ignore_ascii_case(BEARER) => token.trim(),
            _ => return Err(AuthError::Unauthorized.into()),
        };
        if token.is_empty() {
            return Err(AuthError::Unauthorized.into());
        }
        self.tokens
            .verify(token)
            .inspect_err(|err| tracing::debug!(%err, "credential rejected"))
    }

    /// Load the stored role of `identity`. Unknown users are customers.
    ///
    /// # Errors
    ///
    /// Returns a storage error from the user repository.
    pub async fn resolve(&self, identity: &Identity) -> Result<Caller, ClinicError> {
        let role = self
            .users
            .get_by_email(identity.email.clone())
            .await?
            .map_or(Role::Customer, |user| user.role);
        Ok(Caller {
            email: identity.email.clone(),
            role,
        })
    }

    /// Resolve `identity` and require the admin role.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Forbidden`] for non-admins, or a storage error.
    pub async fn require_admin(&self, identity: &Identity) -> Result<Caller, ClinicError> {
        let caller = self.resolve(identity).await?;
        caller.require_admin().inspect_err(|_| {
            tracing::warn!(email = %caller.email, "admin access denied");
        })?;
        Ok(caller)
    }
}
