//! Payments: confirmations of completed charges and intent requests.

use serde::{Deserialize, Serialize};

use crate::error::{ClinicError, ValidationError};
use crate::extra::ExtraFields;
use crate::id::{OrderId, PaymentId};
use crate::price::Price;
use crate::time::{Timestamp, now};

/// Payload a client sends once the processor reports a successful charge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfirmation {
    pub transaction_id: String,
    #[serde(default)]
    pub amount: Option<Price>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl PaymentConfirmation {
    #[must_use]
    pub fn new(transaction_id: impl Into<String>) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            amount: None,
            extra: ExtraFields::new(),
        }
    }

    /// # Errors
    ///
    /// Returns [`ClinicError::Validation`] when the transaction id is blank.
    pub fn validate(&self) -> Result<(), ClinicError> {
        if self.transaction_id.trim().is_empty() {
            return Err(ValidationError::EmptyField {
                field: "transactionId",
            }
            .into());
        }
        Ok(())
    }

    /// Turn the confirmation into the append-only record for `order_id`.
    #[must_use]
    pub fn into_record(self, order_id: OrderId) -> PaymentRecord {
        PaymentRecord {
            id: PaymentId::new(),
            order_id,
            transaction_id: self.transaction_id,
            amount: self.amount,
            extra: self.extra,
            created_at: now(),
        }
    }
}

/// Append-only record of a completed payment. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    #[serde(rename = "_id")]
    pub id: PaymentId,
    pub order_id: OrderId,
    pub transaction_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Price>,
    #[serde(flatten)]
    pub extra: ExtraFields,
    pub created_at: Timestamp,
}

/// A charge to be authorized by the payment processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeRequest {
    /// Amount in minor currency units (cents).
    pub amount: u64,
    /// Lower-case ISO 4217 code, e.g. `usd`.
    pub currency: String,
}

impl ChargeRequest {
    /// Build a charge for `price` in `currency`.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicError::Validation`] if the price rounds to zero minor
    /// units or the currency is not a three-letter code.
    pub fn new(price: Price, currency: &str) -> Result<Self, ClinicError> {
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::InvalidCurrency.into());
        }
        Ok(Self {
            amount: price.to_minor_units()?,
            currency: currency.to_ascii_lowercase(),
        })
    }
}

/// Client-side secret returned by the processor for a payment intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    pub client_secret: String,
}
