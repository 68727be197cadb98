//! Availability: which catalog slots are still bookable on a given date.
//!
//! A slot is occupied as soon as any order exists for the same
//! (service name, date, slot) triple. There is no partial capacity.

use std::collections::HashSet;

use crate::catalog::Service;
use crate::order::Order;

/// Return `catalog` with each service's slots narrowed to those not booked on `date`.
///
/// Orders for other dates are ignored, so callers may pass a superset.
/// Service names are matched exactly (case-sensitive). Slot order is
/// preserved and the rest of each record is returned unchanged.
#[must_use]
pub fn for_date(catalog: Vec<Service>, orders: &[Order], date: &str) -> Vec<Service> {
    let bookings: Vec<&Order> = orders.iter().filter(|order| order.date == date).collect();

    if bookings.is_empty() {
        return catalog;
    }

    catalog
        .into_iter()
        .map(|mut service| {
            let taken: HashSet<&str> = bookings
                .iter()
                .filter(|order| order.treatment == service.name)
                .map(|order| order.slot.as_str())
                .collect();
            service.slots.retain(|slot| !taken.contains(slot.as_str()));
            service
        })
        .collect()
}
