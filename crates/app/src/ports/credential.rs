//! Credential port: issuing and verifying bearer tokens.

use std::sync::Arc;

use clinic_domain::error::ClinicError;
use clinic_domain::user::Identity;

/// Signs and verifies the bearer credentials handed to clients.
///
/// Verification is pure computation, so the trait is synchronous.
pub trait TokenCodec {
    /// Produce a signed token asserting `email` as its subject.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicError::Credential`] if signing fails.
    fn issue(&self, email: &str) -> Result<String, ClinicError>;

    /// Verify `token` and return the identity it asserts.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicError::Auth`] with
    /// [`AuthError::Unauthorized`](clinic_domain::error::AuthError::Unauthorized)
    /// when the token is malformed or its signature does not verify.
    fn verify(&self, token: &str) -> Result<Identity, ClinicError>;
}

impl<T: TokenCodec + ?Sized> TokenCodec for Arc<T> {
    fn issue(&self, email: &str) -> Result<String, ClinicError> {
        (**self).issue(email)
    }

    fn verify(&self, token: &str) -> Result<Identity, ClinicError> {
        (**self).verify(token)
    }
}
