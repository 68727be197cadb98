//! Order: a customer's booking of one slot of one service on one date.

use serde::{Deserialize, Serialize};

use crate::error::{ClinicError, ConflictError, ValidationError};
use crate::extra::ExtraFields;
use crate::id::OrderId;
use crate::price::Price;
use crate::time::{Timestamp, now};

/// A booking, its payment state, and its fulfillment state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    /// Customer email; the owner of the order.
    pub email: String,
    /// Name of the booked [`Service`](crate::catalog::Service).
    pub treatment: String,
    /// Booking date exactly as the client formats it.
    pub date: String,
    pub slot: String,
    #[serde(alias = "totalPrice")]
    pub price: Price,
    pub paid: bool,
    pub shipped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    pub created_at: Timestamp,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// The capacity unit an order consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotKey<'a> {
    pub treatment: &'a str,
    pub date: &'a str,
    pub slot: &'a str,
}

impl SlotKey<'_> {
    /// Conflict reported when this slot is already booked.
    #[must_use]
    pub fn taken(&self) -> ConflictError {
        ConflictError::SlotTaken {
            treatment: self.treatment.to_string(),
            date: self.date.to_string(),
            slot: self.slot.to_string(),
        }
    }
}

impl Order {
    /// Create a builder for constructing an [`Order`].
    #[must_use]
    pub fn builder() -> OrderBuilder {
        OrderBuilder::default()
    }

    #[must_use]
    pub fn slot_key(&self) -> SlotKey<'_> {
        SlotKey {
            treatment: &self.treatment,
            date: &self.date,
            slot: &self.slot,
        }
    }

    #[must_use]
    pub fn is_owned_by(&self, email: &str) -> bool {
        self.email == email
    }

    /// Record a completed payment.
    ///
    /// # Errors
    ///
    /// Returns [`ConflictError::AlreadyPaid`] if the order was paid before;
    /// the existing transaction id is left untouched.
    pub fn mark_paid(&mut self, transaction_id: impl Into<String>) -> Result<(), ConflictError> {
        if self.paid {
            return Err(ConflictError::AlreadyPaid { order_id: self.id });
        }
        self.paid = true;
        self.transaction_id = Some(transaction_id.into());
        Ok(())
    }

    /// Flag the order as shipped. Returns `false` if it already was.
    pub fn mark_shipped(&mut self) -> bool {
        !std::mem::replace(&mut self.shipped, true)
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicError::Validation`] when the email, treatment, date,
    /// or slot is empty.
    pub fn validate(&self) -> Result<(), ClinicError> {
        let required = [
            ("email", &self.email),
            ("treatment", &self.treatment),
            ("date", &self.date),
            ("slot", &self.slot),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ValidationError::EmptyField { field }.into());
            }
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Order`].
#[derive(Debug, Default)]
pub struct OrderBuilder {
    id: Option<OrderId>,
    email: Option<String>,
    treatment: Option<String>,
    date: Option<String>,
    slot: Option<String>,
    price: Option<Price>,
    extra: ExtraFields,
}

impl OrderBuilder {
    #[must_use]
    pub fn id(mut self, id: OrderId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn treatment(mut self, treatment: impl Into<String>) -> Self {
        self.treatment = Some(treatment.into());
        self
    }

    #[must_use]
    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    #[must_use]
    pub fn slot(mut self, slot: impl Into<String>) -> Self {
        self.slot = Some(slot.into());
        self
    }

    #[must_use]
    pub fn price(mut self, price: Price) -> Self {
        self.price = Some(price);
        self
    }

    #[must_use]
    pub fn extra(mut self, extra: ExtraFields) -> Self {
        self.extra = extra;
        self
    }

    /// Consume the builder, validate, and return an unpaid, unshipped [`Order`].
    ///
    /// # Errors
    ///
    /// Returns [`ClinicError::Validation`] if a required field is missing.
    pub fn build(self) -> Result<Order, ClinicError> {
        let order = Order {
            id: self.id.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            treatment: self.treatment.unwrap_or_default(),
            date: self.date.unwrap_or_default(),
            slot: self.slot.unwrap_or_default(),
            price: self.price.unwrap_or_default(),
            paid: false,
            shipped: false,
            transaction_id: None,
            created_at: now(),
            extra: self.extra,
        };
        order.validate()?;
        Ok(order)
    }
}
