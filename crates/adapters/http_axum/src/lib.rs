//! # clinic-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the JSON API used by the clinic's web client (`/services`,
//!   `/orders`, `/available`, `/create-payment-intent`, …)
//! - Authenticate bearer credentials and resolve the caller's role per request
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map application results and errors into HTTP responses
//!
//! ## Dependency rule
//! Depends on `clinic-app` (for port traits and services) and `clinic-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod auth;
pub mod error;
pub mod router;
pub mod state;
