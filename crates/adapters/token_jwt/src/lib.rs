//! # clinic-adapter-token-jwt
//!
//! Bearer credentials as HS256-signed JSON Web Tokens.
//!
//! Tokens carry the subject email and the issue time. They do not expire,
//! and they never carry a role: authorization is re-derived from stored
//! user state on every request.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use clinic_app::ports::TokenCodec;
use clinic_domain::error::{AuthError, ClinicError};
use clinic_domain::user::Identity;

/// Errors raised while signing a token.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("failed to sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

impl From<TokenError> for ClinicError {
    fn from(err: TokenError) -> Self {
        Self::Credential(Box::new(err))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sub: Option<String>,
    /// Subject as written by older clients.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    iat: Option<i64>,
}

impl Claims {
    fn subject(self) -> Option<String> {
        self.sub.or(self.email).filter(|email| !email.is_empty())
    }
}

/// [`TokenCodec`] backed by a shared HS256 secret.
pub struct JwtTokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtTokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtTokenCodec")
            .field("secret", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl JwtTokenCodec {
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let secret = secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

impl TokenCodec for JwtTokenCodec {
    fn issue(&self, email: &str) -> Result<String, ClinicError> {
        let claims = Claims {
            sub: Some(email.to_string()),
            email: Some(email.to_string()),
            iat: Some(chrono::Utc::now().timestamp()),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenError::Signing(err).into())
    }

    fn verify(&self, token: &str) -> Result<Identity, ClinicError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|err| {
            match err.kind() {
                ErrorKind::InvalidSignature => tracing::debug!("token signature mismatch"),
                kind => tracing::debug!(?kind, "token rejected"),
            }
            AuthError::Unauthorized
        })?;

        data.claims
            .subject()
            .map(Identity::new)
            .ok_or_else(|| AuthError::Unauthorized.into())
    }
}
