//! Payment ports: the ledger of completed payments and the external processor.

use std::future::Future;
use std::sync::Arc;

use clinic_domain::error::ClinicError;
use clinic_domain::id::OrderId;
use clinic_domain::outcome::UpdateOutcome;
use clinic_domain::payment::{ChargeRequest, PaymentIntent, PaymentRecord};

/// Persists payment records together with the order they settle.
pub trait PaymentLedger {
    /// Mark `order_id` paid with `record.transaction_id` and append `record`,
    /// as one atomic unit.
    ///
    /// The order is only updated while unpaid. The outcome tells the caller
    /// what happened, and the record is written only when the order changed:
    /// - `matched == 0`: no such order, nothing written
    /// - `matched == 1, modified == 0`: already paid, nothing written
    /// - `matched == 1, modified == 1`: order paid and record appended
    fn confirm(
        &self,
        order_id: OrderId,
        record: PaymentRecord,
    ) -> impl Future<Output = Result<UpdateOutcome, ClinicError>> + Send;

    /// Look up a payment record by the processor's transaction id.
    fn find_by_transaction_id(
        &self,
        transaction_id: String,
    ) -> impl Future<Output = Result<Option<PaymentRecord>, ClinicError>> + Send;
}

/// The external payment processor.
pub trait PaymentProcessor {
    /// Create a payment intent for `charge` and return its client secret.
    ///
    /// Failures are reported as [`ClinicError::PaymentProcessing`].
    fn create_intent(
        &self,
        charge: ChargeRequest,
    ) -> impl Future<Output = Result<PaymentIntent, ClinicError>> + Send;
}

impl<T: PaymentLedger + Send + Sync> PaymentLedger for Arc<T> {
    fn confirm(
        &self,
        order_id: OrderId,
        record: PaymentRecord,
    ) -> impl Future<Output = Result<UpdateOutcome, ClinicError>> + Send {
        (**self).confirm(order_id, record)
    }

    fn find_by_transaction_id(
        &self,
        transaction_id: String,
    ) -> impl Future<Output = Result<Option<PaymentRecord>, ClinicError>> + Send {
        (**self).find_by_transaction_id(transaction_id)
    }
}

impl<T: PaymentProcessor + Send + Sync> PaymentProcessor for Arc<T> {
    fn create_intent(
        &self,
        charge: ChargeRequest,
    ) -> impl Future<Output = Result<PaymentIntent, ClinicError>> + Send {
        (**self).create_intent(charge)
    }
}
