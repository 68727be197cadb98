//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`ClinicError`]
//! via `#[from]` (or a boxed source for infrastructure failures).

use crate::id::OrderId;

/// Boxed infrastructure error carried through the domain without leaking its type.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error returned by every use-case.
#[derive(Debug, thiserror::Error)]
pub enum ClinicError {
    /// Input failed a domain invariant.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A referenced record does not exist.
    #[error("{0}")]
    NotFound(#[from] NotFoundError),

    /// Missing, invalid, or insufficient credentials.
    #[error("{0}")]
    Auth(#[from] AuthError),

    /// The write conflicts with existing state.
    #[error("{0}")]
    Conflict(#[from] ConflictError),

    /// The external payment processor rejected or failed the request.
    #[error("payment processing failed")]
    PaymentProcessing(#[source] BoxError),

    /// A credential could not be issued.
    #[error("credential error")]
    Credential(#[source] BoxError),

    /// The backing store failed.
    #[error("storage error")]
    Storage(#[source] BoxError),
}

/// Domain invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("price must be a finite, non-negative number")]
    InvalidPrice,

    #[error("amount must be greater than zero")]
    NonPositiveAmount,

    #[error("malformed identifier: {0}")]
    InvalidId(String),

    #[error("rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(u8),

    #[error("currency must be a three-letter ISO code")]
    InvalidCurrency,
}

/// A record lookup that came back empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// Identity and access failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No credential was presented.
    #[error("missing credential")]
    Unauthenticated,

    /// The credential is malformed, has a bad signature, or cannot be decoded.
    #[error("invalid credential")]
    Unauthorized,

    /// The caller is known but lacks the required role or ownership.
    #[error("insufficient privileges")]
    Forbidden,
}

/// Writes rejected because of existing state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConflictError {
    #[error("slot {slot} on {date} for {treatment} is already booked")]
    SlotTaken {
        treatment: String,
        date: String,
        slot: String,
    },

    #[error("order {order_id} is already paid")]
    AlreadyPaid { order_id: OrderId },
}

impl ClinicError {
    /// Wrap a storage adapter failure.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Box::new(err))
    }

    /// Wrap a payment processor failure.
    pub fn payment(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::PaymentProcessing(Box::new(err))
    }
}
