//! # clinic-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `ServiceRepository`: the service catalog
//!   - `OrderRepository`: bookings, with atomic slot consumption
//!   - `UserRepository`: user profiles and roles
//!   - `ReviewRepository`: customer reviews
//!   - `PaymentLedger`: payment records written atomically with the order update
//!   - `PaymentProcessor`: external payment-intent creation
//!   - `TokenCodec`: bearer credential issuance and verification
//! - Define **driving/inbound ports** as use-case services:
//!   - `CatalogService`, `OrderService`, `AvailabilityService`
//!   - `PaymentService`, `IdentityService`, `UserService`, `ReviewService`
//! - Orchestrate domain objects without knowing *how* persistence or IO works
//!
//! ## Dependency rule
//! Depends on `clinic-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;
