//! Order service: booking, lookup, and fulfillment of orders.

use clinic_domain::error::{ClinicError, NotFoundError};
use clinic_domain::id::OrderId;
use clinic_domain::order::Order;
use clinic_domain::outcome::UpdateOutcome;
use clinic_domain::user::Caller;

use crate::ports::OrderRepository;

/// Application service for the order lifecycle.
///
/// Operations that need an authenticated caller take a [`Caller`] whose role
/// was loaded from storage for the current request.
pub struct OrderService<R> {
    repo: R,
}

impl<R: OrderRepository> OrderService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Book a slot.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicError::Validation`] if the order is incomplete,
    /// [`ClinicError::Conflict`] if the slot is already booked for that date,
    /// or a storage error from the repository.
    pub async fn place_order(&self, order: Order) -> Result<Order, ClinicError> {
        order.validate()?;
        let placed = self.repo.create(order).await.inspect_err(|err| {
            if matches!(err, ClinicError::Conflict(_)) {
                tracing::info!(%err, "booking rejected");
            }
        })?;
        tracing::info!(
            order_id = %placed.id,
            treatment = %placed.treatment,
            date = %placed.date,
            slot = %placed.slot,
            "order placed"
        );
        Ok(placed)
    }

    /// List every order. Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicError::Auth`] when `caller` is not an admin, or a
    /// storage error from the repository.
    pub async fn list_all(&self, caller: &Caller) -> Result<Vec<Order>, ClinicError> {
        caller.require_admin()?;
        self.repo.get_all().await
    }

    /// List the orders placed by `email`.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicError::Auth`] unless `caller` owns `email` or is an
    /// admin, or a storage error from the repository.
    pub async fn list_for_customer(
        &self,
        caller: &Caller,
        email: &str,
    ) -> Result<Vec<Order>, ClinicError> {
        caller.require_access(email)?;
        self.repo.find_by_email(email.to_string()).await
    }

    /// Fetch one order.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicError::NotFound`] when no order with `id` exists,
    /// [`ClinicError::Auth`] unless `caller` owns it or is an admin, or a
    /// storage error from the repository.
    pub async fn get_order(&self, caller: &Caller, id: OrderId) -> Result<Order, ClinicError> {
        let order = self.repo.get_by_id(id).await?.ok_or_else(|| not_found(id))?;
        caller.require_access(&order.email)?;
        Ok(order)
    }

    /// Cancel an order, freeing its slot.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicError::NotFound`] when no order with `id` exists, or a
    /// storage error from the repository.
    pub async fn delete_order(&self, id: OrderId) -> Result<(), ClinicError> {
        if !self.repo.delete(id).await? {
            return Err(not_found(id));
        }
        tracing::info!(order_id = %id, "order deleted");
        Ok(())
    }

    /// Flag an order as shipped. Admin only; payment is not required first.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicError::Auth`] when `caller` is not an admin,
    /// [`ClinicError::NotFound`] when no order with `id` exists, or a storage
    /// error from the repository.
    pub async fn mark_shipped(
        &self,
        caller: &Caller,
        id: OrderId,
    ) -> Result<UpdateOutcome, ClinicError> {
        caller.require_admin()?;
        let outcome = self.repo.mark_shipped(id).await?;
        if !outcome.found() {
            return Err(not_found(id));
        }
        tracing::info!(order_id = %id, by = %caller.email, "order shipped");
        Ok(outcome)
    }
}

fn not_found(id: OrderId) -> ClinicError {
    NotFoundError {
        entity: "Order",
        id: id.to_string(),
    }
    .into()
}
