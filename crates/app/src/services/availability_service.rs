//! Availability service: the per-date view of bookable slots.

use clinic_domain::availability;
use clinic_domain::catalog::Service;
use clinic_domain::error::{ClinicError, ValidationError};

use crate::ports::{OrderRepository, ServiceRepository};

/// Read-only use-case combining the catalog with the bookings of one date.
pub struct AvailabilityService<S, O> {
    services: S,
    orders: O,
}

impl<S: ServiceRepository, O: OrderRepository> AvailabilityService<S, O> {
    /// Create a new service over the catalog and order repositories.
    pub fn new(services: S, orders: O) -> Self {
        Self { services, orders }
    }

    /// Return the catalog with every service's slots narrowed to those still
    /// free on `date`. Stored records are not modified.
    ///
    /// The result is a snapshot: a slot shown here can still be taken before
    /// the customer books it, in which case placing the order fails.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicError::Validation`] when `date` is blank, or a storage
    /// error from either repository.
    pub async fn available_on(&self, date: &str) -> Result<Vec<Service>, ClinicError> {
        if date.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "date" }.into());
        }
        let catalog = self.services.get_all().await?;
        let bookings = self.orders.find_by_date(date.to_string()).await?;
        tracing::debug!(
            date,
            services = catalog.len(),
            bookings = bookings.len(),
            "computing availability"
        );
        Ok(availability::for_date(catalog, &bookings, date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{InMemoryOrders, InMemoryServices};
    use clinic_domain::order::Order;

    async fn setup() -> AvailabilityService<InMemoryServices, InMemoryOrders> {
        let services = InMemoryServices::default();
        services
            .create(
                Service::builder()
                    .name("A")
                    .slots(["9am", "10am"])
                    .build(),
            )
            .await
            .unwrap();

        let orders = InMemoryOrders::default();
        orders
            .create(
                Order::builder()
                    .email("x@y.com")
                    .treatment("A")
                    .date("2024-01-01")
                    .slot("9am")
                    .build()
                    .unwrap(),
            )
            .await
            .unwrap();

        AvailabilityService::new(services, orders)
    }

    #[tokio::test]
    async fn should_hide_booked_slot_on_booked_date() {
        let svc = setup().await;
        let view = svc.available_on("2024-01-01").await.unwrap();
        assert_eq!(view[0].slots, vec!["10am"]);
    }

    #[tokio::test]
    async fn should_show_all_slots_on_other_dates() {
        let svc = setup().await;
        let view = svc.available_on("2024-01-02").await.unwrap();
        assert_eq!(view[0].slots, vec!["9am", "10am"]);
    }

    #[tokio::test]
    async fn should_return_identical_results_when_repeated() {
        let svc = setup().await;
        let first = svc.available_on("2024-01-01").await.unwrap();
        let second = svc.available_on("2024-01-01").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn should_not_modify_stored_catalog() {
        let svc = setup().await;
        svc.available_on("2024-01-01").await.unwrap();

        let stored = svc.services.get_all().await.unwrap();
        assert_eq!(stored[0].slots, vec!["9am", "10am"]);
    }

    #[tokio::test]
    async fn should_reject_blank_date() {
        let svc = setup().await;
        let result = svc.available_on(" ").await;
        assert!(matches!(result, Err(ClinicError::Validation(_))));
    }
}
