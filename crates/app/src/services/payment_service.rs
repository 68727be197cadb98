//! Payment service: payment intents and payment confirmation.

use clinic_domain::error::{ClinicError, ConflictError, NotFoundError};
use clinic_domain::id::OrderId;
use clinic_domain::outcome::UpdateOutcome;
use clinic_domain::payment::{ChargeRequest, PaymentConfirmation, PaymentIntent};
use clinic_domain::price::Price;

use crate::ports::{PaymentLedger, PaymentProcessor};

/// Application service tying the payment processor to the order ledger.
pub struct PaymentService<L, P> {
    ledger: L,
    processor: P,
    currency: String,
}

impl<L: PaymentLedger, P: PaymentProcessor> PaymentService<L, P> {
    /// Create a new service charging in `currency` (ISO 4217, e.g. `usd`).
    pub fn new(ledger: L, processor: P, currency: impl Into<String>) -> Self {
        Self {
            ledger,
            processor,
            currency: currency.into(),
        }
    }

    /// Ask the processor for a payment intent covering `price`.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicError::Validation`] when the price rounds to zero
    /// minor units, or [`ClinicError::PaymentProcessing`] when the processor
    /// fails.
    pub async fn create_intent(&self, price: Price) -> Result<PaymentIntent, ClinicError> {
        let charge = ChargeRequest::new(price, &self.currency)?;
        let amount = charge.amount;
        self.processor
            .create_intent(charge)
            .await
            .inspect(|_| tracing::debug!(amount, "payment intent created"))
            .inspect_err(|err| tracing::warn!(%err, amount, "payment intent failed"))
    }

    /// Record a completed payment and mark the order paid, atomically.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicError::Validation`] for a blank transaction id,
    /// [`ClinicError::NotFound`] when the order does not exist,
    /// [`ClinicError::Conflict`] when it is already paid (no record is
    /// written in either case), or a storage error from the ledger.
    pub async fn confirm_payment(
        &self,
        order_id: OrderId,
        confirmation: PaymentConfirmation,
    ) -> Result<UpdateOutcome, ClinicError> {
        confirmation.validate()?;
        let record = confirmation.into_record(order_id);
        let transaction_id = record.transaction_id.clone();

        let outcome = self.ledger.confirm(order_id, record).await?;
        if !outcome.found() {
            return Err(NotFoundError {
                entity: "Order",
                id: order_id.to_string(),
            }
            .into());
        }
        if outcome.modified == 0 {
            tracing::warn!(%order_id, %transaction_id, "duplicate payment confirmation");
            return Err(ConflictError::AlreadyPaid { order_id }.into());
        }

        tracing::info!(%order_id, %transaction_id, "payment confirmed");
        Ok(outcome)
    }
}
