//! `SQLite` implementation of [`OrderRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use clinic_app::ports::OrderRepository;
use clinic_domain::error::ClinicError;
use clinic_domain::id::OrderId;
use clinic_domain::order::Order;
use clinic_domain::outcome::UpdateOutcome;

use crate::codec::{decode_err, decode_extra, decode_price, decode_time, encode_time};
use crate::error::StorageError;

/// Wrapper for converting database rows into domain types without polluting
/// domain structs with database concerns.
struct Wrapper(Order);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Order> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let price: f64 = row.try_get("price")?;
        let extra_json: String = row.try_get("extra")?;
        let created_at: String = row.try_get("created_at")?;

        Ok(Self(Order {
            id: OrderId::from_str(&id).map_err(decode_err)?,
            email: row.try_get("email")?,
            treatment: row.try_get("treatment")?,
            date: row.try_get("date")?,
            slot: row.try_get("slot")?,
            price: decode_price(price)?,
            paid: row.try_get("paid")?,
            shipped: row.try_get("shipped")?,
            transaction_id: row.try_get("transaction_id")?,
            created_at: decode_time(&created_at)?,
            extra: decode_extra(&extra_json)?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO orders (id, email, treatment, date, slot, price, paid, shipped, transaction_id, extra, created_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";

const SELECT_BY_ID: &str = "SELECT * FROM orders WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM orders ORDER BY created_at, rowid";
const SELECT_BY_EMAIL: &str = "SELECT * FROM orders WHERE email = ? ORDER BY created_at, rowid";
const SELECT_BY_DATE: &str = "SELECT * FROM orders WHERE date = ? ORDER BY created_at, rowid";
const EXISTS_BY_ID: &str = "SELECT COUNT(*) FROM orders WHERE id = ?";
const MARK_SHIPPED: &str = "UPDATE orders SET shipped = 1 WHERE id = ? AND shipped = 0";
const DELETE_BY_ID: &str = "DELETE FROM orders WHERE id = ?";

/// `SQLite`-backed order repository.
///
/// Slot reservation relies on the unique index over
/// `(treatment, date, slot)`, so concurrent bookings of the same slot cannot
/// both succeed.
pub struct SqliteOrderRepository {
    pool: SqlitePool,
}

impl SqliteOrderRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch_many(
        &self,
        query: &'static str,
        key: String,
    ) -> Result<Vec<Order>, ClinicError> {
        let rows: Vec<Wrapper> = sqlx::query_as(query)
            .bind(key)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}

impl OrderRepository for SqliteOrderRepository {
    async fn create(&self, order: Order) -> Result<Order, ClinicError> {
        let extra_json = serde_json::to_string(&order.extra).map_err(StorageError::from)?;

        let result = sqlx::query(INSERT)
            .bind(order.id.to_string())
            .bind(&order.email)
            .bind(&order.treatment)
            .bind(&order.date)
            .bind(&order.slot)
            .bind(order.price.value())
            .bind(order.paid)
            .bind(order.shipped)
            .bind(order.transaction_id.as_deref())
            .bind(&extra_json)
            .bind(encode_time(&order.created_at))
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(order),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(order.slot_key().taken().into())
            }
            Err(err) => Err(StorageError::from(err).into()),
        }
    }

    async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, ClinicError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn get_all(&self) -> Result<Vec<Order>, ClinicError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn find_by_email(&self, email: String) -> Result<Vec<Order>, ClinicError> {
        self.fetch_many(SELECT_BY_EMAIL, email).await
    }

    async fn find_by_date(&self, date: String) -> Result<Vec<Order>, ClinicError> {
        self.fetch_many(SELECT_BY_DATE, date).await
    }

    async fn mark_shipped(&self, id: OrderId) -> Result<UpdateOutcome, ClinicError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;

        let modified = sqlx::query(MARK_SHIPPED)
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?
            .rows_affected();

        let matched = if modified > 0 {
            modified
        } else {
            let (count,): (i64,) = sqlx::query_as(EXISTS_BY_ID)
                .bind(id.to_string())
                .fetch_one(&mut *tx)
                .await
                .map_err(StorageError::from)?;
            count.unsigned_abs()
        };

        tx.commit().await.map_err(StorageError::from)?;
        Ok(UpdateOutcome { matched, modified })
    }

    async fn delete(&self, id: OrderId) -> Result<bool, ClinicError> {
        let result = sqlx::query(DELETE_BY_ID)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(result.rows_affected() > 0)
    }
}
