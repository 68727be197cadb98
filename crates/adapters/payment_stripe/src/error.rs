//! Stripe-specific error type.

use serde::Deserialize;

/// Errors that can occur when calling the Stripe API.
#[derive(Debug, thiserror::Error)]
pub enum StripeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Stripe answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The created intent had no client secret.
    #[error("payment intent response has no client secret")]
    MissingClientSecret,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

impl StripeError {
    pub(crate) fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorEnvelope>(body)
            .ok()
            .and_then(|envelope| envelope.error.message.or(envelope.error.kind))
            .unwrap_or_else(|| format!("unexpected response ({} bytes)", body.len()));
        Self::Api { status, message }
    }
}
