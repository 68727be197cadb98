//! # clinic-adapter-payment-stripe
//!
//! [`PaymentProcessor`] backed by the Stripe `PaymentIntents` API.
//!
//! - Base URL: `https://api.stripe.com`
//! - Authentication: secret key as a bearer token
//! - Request bodies are form-encoded; responses are JSON

mod error;

pub use error::StripeError;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use clinic_app::ports::PaymentProcessor;
use clinic_domain::error::ClinicError;
use clinic_domain::payment::{ChargeRequest, PaymentIntent};

/// Stripe API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for [`StripeClient`].
pub struct StripeConfig {
    pub secret_key: SecretString,
    pub api_base: String,
    pub timeout: Duration,
}

impl StripeConfig {
    #[must_use]
    pub fn new(secret_key: SecretString) -> Self {
        Self {
            secret_key,
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Deserialize)]
struct IntentResponse {
    client_secret: Option<String>,
}

/// Stripe API client.
pub struct StripeClient {
    client: reqwest::Client,
    secret_key: SecretString,
    api_base: String,
}

impl std::fmt::Debug for StripeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeClient")
            .field("secret_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

impl StripeClient {
    /// Create a new Stripe client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: StripeConfig) -> Result<Self, StripeError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            secret_key: config.secret_key,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    /// Create a card payment intent and return its client secret.
    ///
    /// # Errors
    ///
    /// Returns [`StripeError`] when the request fails, Stripe rejects it, or
    /// the response carries no client secret.
    pub async fn create_payment_intent(
        &self,
        charge: &ChargeRequest,
    ) -> Result<PaymentIntent, StripeError> {
        let url = format!("{}/v1/payment_intents", self.api_base);
        let response = self
            .client
            .post(&url)
            .bearer_auth(self.secret_key.expose_secret())
            .form(&intent_form(charge))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StripeError::from_response(status.as_u16(), &body));
        }

        let parsed: IntentResponse = response.json().await?;
        let client_secret = parsed.client_secret.ok_or(StripeError::MissingClientSecret)?;
        tracing::debug!(
            amount = charge.amount,
            currency = %charge.currency,
            "stripe payment intent created"
        );
        Ok(PaymentIntent { client_secret })
    }
}

fn intent_form(charge: &ChargeRequest) -> [(&'static str, String); 3] {
    [
        ("amount", charge.amount.to_string()),
        ("currency", charge.currency.clone()),
        ("payment_method_types[]", "card".to_string()),
    ]
}

impl PaymentProcessor for StripeClient {
    async fn create_intent(&self, charge: ChargeRequest) -> Result<PaymentIntent, ClinicError> {
        self.create_payment_intent(&charge)
            .await
            .map_err(ClinicError::payment)
    }
}
