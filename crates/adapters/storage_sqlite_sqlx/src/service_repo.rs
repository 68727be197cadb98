//! `SQLite` implementation of [`ServiceRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use clinic_app::ports::ServiceRepository;
use clinic_domain::catalog::Service;
use clinic_domain::error::ClinicError;
use clinic_domain::id::ServiceId;
use clinic_domain::outcome::UpsertOutcome;

use crate::codec::{decode_err, decode_extra, decode_price};
use crate::error::StorageError;

/// Wrapper for converting database rows into domain types without polluting
/// domain structs with database concerns.
struct Wrapper(Service);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Service> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let name: String = row.try_get("name")?;
        let price: f64 = row.try_get("price")?;
        let slots_json: String = row.try_get("slots")?;
        let available: bool = row.try_get("available")?;
        let extra_json: String = row.try_get("extra")?;

        Ok(Self(Service {
            id: ServiceId::from_str(&id).map_err(decode_err)?,
            name,
            price: decode_price(price)?,
            slots: serde_json::from_str(&slots_json).map_err(decode_err)?,
            available,
            extra: decode_extra(&extra_json)?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO services (id, name, price, slots, available, extra)
    VALUES (?, ?, ?, ?, ?, ?)
";

const SELECT_BY_ID: &str = "SELECT * FROM services WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM services ORDER BY rowid";
const UPDATE_AVAILABLE: &str = "UPDATE services SET available = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM services WHERE id = ?";

/// `SQLite`-backed service catalog.
pub struct SqliteServiceRepository {
    pool: SqlitePool,
}

impl SqliteServiceRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

async fn insert<'e, E>(executor: E, service: &Service) -> Result<(), StorageError>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    sqlx::query(INSERT)
        .bind(service.id.to_string())
        .bind(&service.name)
        .bind(service.price.value())
        .bind(serde_json::to_string(&service.slots)?)
        .bind(service.available)
        .bind(serde_json::to_string(&service.extra)?)
        .execute(executor)
        .await?;
    Ok(())
}

impl ServiceRepository for SqliteServiceRepository {
    async fn create(&self, service: Service) -> Result<Service, ClinicError> {
        insert(&self.pool, &service).await?;
        Ok(service)
    }

    async fn get_by_id(&self, id: ServiceId) -> Result<Option<Service>, ClinicError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn get_all(&self) -> Result<Vec<Service>, ClinicError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn set_available(
        &self,
        id: ServiceId,
        available: bool,
    ) -> Result<UpsertOutcome, ClinicError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;

        let updated = sqlx::query(UPDATE_AVAILABLE)
            .bind(available)
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?
            .rows_affected();

        let outcome = if updated > 0 {
            UpsertOutcome::Updated
        } else {
            insert(&mut *tx, &Service::placeholder(id, available)).await?;
            UpsertOutcome::Created
        };

        tx.commit().await.map_err(StorageError::from)?;
        Ok(outcome)
    }

    async fn delete(&self, id: ServiceId) -> Result<bool, ClinicError> {
        let result = sqlx::query(DELETE_BY_ID)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(result.rows_affected() > 0)
    }
}
