//! Storage port: repository traits for persistence.

use std::future::Future;
use std::sync::Arc;

use clinic_domain::catalog::Service;
use clinic_domain::error::ClinicError;
use clinic_domain::extra::ExtraFields;
use clinic_domain::id::{OrderId, ServiceId};
use clinic_domain::order::Order;
use clinic_domain::outcome::{UpdateOutcome, UpsertOutcome};
use clinic_domain::review::Review;
use clinic_domain::user::{Role, User};

/// Repository for the service catalog.
pub trait ServiceRepository {
    /// Insert a new service.
    fn create(&self, service: Service) -> impl Future<Output = Result<Service, ClinicError>> + Send;

    /// Get a service by its unique identifier.
    fn get_by_id(
        &self,
        id: ServiceId,
    ) -> impl Future<Output = Result<Option<Service>, ClinicError>> + Send;

    /// Get the whole catalog.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Service>, ClinicError>> + Send;

    /// Set the availability flag, inserting a bare record if `id` is unknown.
    fn set_available(
        &self,
        id: ServiceId,
        available: bool,
    ) -> impl Future<Output = Result<UpsertOutcome, ClinicError>> + Send;

    /// Delete a service. Returns `false` when nothing matched.
    fn delete(&self, id: ServiceId) -> impl Future<Output = Result<bool, ClinicError>> + Send;
}

/// Repository for orders.
pub trait OrderRepository {
    /// Insert a new order, consuming its (treatment, date, slot) triple.
    ///
    /// Must fail with
    /// [`ConflictError::SlotTaken`](clinic_domain::error::ConflictError::SlotTaken)
    /// if another order already holds the same triple. The check and the
    /// insert are a single atomic write.
    fn create(&self, order: Order) -> impl Future<Output = Result<Order, ClinicError>> + Send;

    /// Get an order by its unique identifier.
    fn get_by_id(
        &self,
        id: OrderId,
    ) -> impl Future<Output = Result<Option<Order>, ClinicError>> + Send;

    /// Get every order.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Order>, ClinicError>> + Send;

    /// Find orders placed by `email` (exact match).
    fn find_by_email(
        &self,
        email: String,
    ) -> impl Future<Output = Result<Vec<Order>, ClinicError>> + Send;

    /// Find orders booked on `date` (exact match).
    fn find_by_date(
        &self,
        date: String,
    ) -> impl Future<Output = Result<Vec<Order>, ClinicError>> + Send;

    /// Set the shipped flag.
    fn mark_shipped(
        &self,
        id: OrderId,
    ) -> impl Future<Output = Result<UpdateOutcome, ClinicError>> + Send;

    /// Delete an order, freeing its slot. Returns `false` when nothing matched.
    fn delete(&self, id: OrderId) -> impl Future<Output = Result<bool, ClinicError>> + Send;
}

/// Repository for users, keyed by email.
pub trait UserRepository {
    /// Merge `profile` into the user's profile fields, creating the user if absent.
    fn upsert(
        &self,
        email: String,
        profile: ExtraFields,
    ) -> impl Future<Output = Result<UpsertOutcome, ClinicError>> + Send;

    /// Get a user by email.
    fn get_by_email(
        &self,
        email: String,
    ) -> impl Future<Output = Result<Option<User>, ClinicError>> + Send;

    /// Get every user.
    fn get_all(&self) -> impl Future<Output = Result<Vec<User>, ClinicError>> + Send;

    /// Set the role of an existing user. Never creates a user.
    fn set_role(
        &self,
        email: String,
        role: Role,
    ) -> impl Future<Output = Result<UpdateOutcome, ClinicError>> + Send;
}

/// Repository for reviews.
pub trait ReviewRepository {
    /// Persist a new review.
    fn create(&self, review: Review) -> impl Future<Output = Result<Review, ClinicError>> + Send;

    /// Get all reviews, newest first.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Review>, ClinicError>> + Send;
}

impl<T: ServiceRepository + Send + Sync> ServiceRepository for Arc<T> {
    fn create(&self, service: Service) -> impl Future<Output = Result<Service, ClinicError>> + Send {
        (**self).create(service)
    }

    fn get_by_id(
        &self,
        id: ServiceId,
    ) -> impl Future<Output = Result<Option<Service>, ClinicError>> + Send {
        (**self).get_by_id(id)
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Service>, ClinicError>> + Send {
        (**self).get_all()
    }

    fn set_available(
        &self,
        id: ServiceId,
        available: bool,
    ) -> impl Future<Output = Result<UpsertOutcome, ClinicError>> + Send {
        (**self).set_available(id, available)
    }

    fn delete(&self, id: ServiceId) -> impl Future<Output = Result<bool, ClinicError>> + Send {
        (**self).delete(id)
    }
}

impl<T: OrderRepository + Send + Sync> OrderRepository for Arc<T> {
    fn create(&self, order: Order) -> impl Future<Output = Result<Order, ClinicError>> + Send {
        (**self).create(order)
    }

    fn get_by_id(
        &self,
        id: OrderId,
    ) -> impl Future<Output = Result<Option<Order>, ClinicError>> + Send {
        (**self).get_by_id(id)
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Order>, ClinicError>> + Send {
        (**self).get_all()
    }

    fn find_by_email(
        &self,
        email: String,
    ) -> impl Future<Output = Result<Vec<Order>, ClinicError>> + Send {
        (**self).find_by_email(email)
    }

    fn find_by_date(
        &self,
        date: String,
    ) -> impl Future<Output = Result<Vec<Order>, ClinicError>> + Send {
        (**self).find_by_date(date)
    }

    fn mark_shipped(
        &self,
        id: OrderId,
    ) -> impl Future<Output = Result<UpdateOutcome, ClinicError>> + Send {
        (**self).mark_shipped(id)
    }

    fn delete(&self, id: OrderId) -> impl Future<Output = Result<bool, ClinicError>> + Send {
        (**self).delete(id)
    }
}

impl<T: UserRepository + Send + Sync> UserRepository for Arc<T> {
    fn upsert(
        &self,
        email: String,
        profile: ExtraFields,
    ) -> impl Future<Output = Result<UpsertOutcome, ClinicError>> + Send {
        (**self).upsert(email, profile)
    }

    fn get_by_email(
        &self,
        email: String,
    ) -> impl Future<Output = Result<Option<User>, ClinicError>> + Send {
        (**self).get_by_email(email)
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<User>, ClinicError>> + Send {
        (**self).get_all()
    }

    fn set_role(
        &self,
        email: String,
        role: Role,
    ) -> impl Future<Output = Result<UpdateOutcome, ClinicError>> + Send {
        (**self).set_role(email, role)
    }
}

impl<T: ReviewRepository + Send + Sync> ReviewRepository for Arc<T> {
    fn create(&self, review: Review) -> impl Future<Output = Result<Review, ClinicError>> + Send {
        (**self).create(review)
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Review>, ClinicError>> + Send {
        (**self).get_all()
    }
}
