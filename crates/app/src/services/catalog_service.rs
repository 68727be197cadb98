//! Catalog service: use-cases for managing the offered services.

use clinic_domain::catalog::Service;
use clinic_domain::error::{ClinicError, NotFoundError};
use clinic_domain::id::ServiceId;
use clinic_domain::outcome::UpsertOutcome;

use crate::ports::ServiceRepository;

/// Application service for catalog CRUD operations.
pub struct CatalogService<R> {
    repo: R,
}

impl<R: ServiceRepository> CatalogService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Add a service to the catalog as given.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn create_service(&self, service: Service) -> Result<Service, ClinicError> {
        let created = self.repo.create(service).await?;
        tracing::info!(service_id = %created.id, name = %created.name, "service created");
        Ok(created)
    }

    /// Look up a service by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicError::NotFound`] when no service with `id` exists,
    /// or a storage error from the repository.
    pub async fn get_service(&self, id: ServiceId) -> Result<Service, ClinicError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| not_found(id))
    }

    /// List the whole catalog.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_services(&self) -> Result<Vec<Service>, ClinicError> {
        self.repo.get_all().await
    }

    /// Toggle whether a service can be booked, creating a bare record for an
    /// unknown id.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn set_availability(
        &self,
        id: ServiceId,
        available: bool,
    ) -> Result<UpsertOutcome, ClinicError> {
        let outcome = self.repo.set_available(id, available).await?;
        tracing::info!(service_id = %id, available, ?outcome, "service availability set");
        Ok(outcome)
    }

    /// Remove a service from the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicError::NotFound`] when no service with `id` exists,
    /// or a storage error from the repository.
    pub async fn delete_service(&self, id: ServiceId) -> Result<(), ClinicError> {
        if !self.repo.delete(id).await? {
            return Err(not_found(id));
        }
        tracing::info!(service_id = %id, "service deleted");
        Ok(())
    }
}

fn not_found(id: ServiceId) -> ClinicError {
    NotFoundError {
        entity: "Service",
        id: id.to_string(),
    }
    .into()
}
