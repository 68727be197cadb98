//! Application services: use-case implementations.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.

pub mod availability_service;
pub mod catalog_service;
pub mod identity_service;
pub mod order_service;
pub mod payment_service;
pub mod review_service;
pub mod user_service;
