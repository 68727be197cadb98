//! # clinic-domain
//!
//! Pure domain model for the clinic repair/order-booking service.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps, prices
//! - Define the **catalog** (`Service`: name, price, bookable slots)
//! - Define **orders** (a booking of one slot of one service on one date)
//! - Define **users** and **roles**, and the per-request `Caller`
//! - Define **reviews** and append-only **payment records**
//! - Compute **availability**: which slots remain bookable on a date
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod extra;
pub mod id;
pub mod outcome;
pub mod price;
pub mod time;

pub mod availability;
pub mod catalog;
pub mod order;
pub mod payment;
pub mod review;
pub mod user;
