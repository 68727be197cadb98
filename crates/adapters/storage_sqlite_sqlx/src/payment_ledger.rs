//! `SQLite` implementation of [`PaymentLedger`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use clinic_app::ports::PaymentLedger;
use clinic_domain::error::ClinicError;
use clinic_domain::id::{OrderId, PaymentId};
use clinic_domain::outcome::UpdateOutcome;
use clinic_domain::payment::PaymentRecord;

use crate::codec::{decode_err, decode_extra, decode_price, decode_time, encode_time};
use crate::error::StorageError;

struct Wrapper(PaymentRecord);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let order_id: String = row.try_get("order_id")?;
        let amount: Option<f64> = row.try_get("amount")?;
        let extra_json: String = row.try_get("extra")?;
        let created_at: String = row.try_get("created_at")?;

        Ok(Self(PaymentRecord {
            id: PaymentId::from_str(&id).map_err(decode_err)?,
            order_id: OrderId::from_str(&order_id).map_err(decode_err)?,
            transaction_id: row.try_get("transaction_id")?,
            amount: amount.map(decode_price).transpose()?,
            extra: decode_extra(&extra_json)?,
            created_at: decode_time(&created_at)?,
        }))
    }
}

const MARK_PAID: &str = "UPDATE orders SET paid = 1, transaction_id = ? WHERE id = ? AND paid = 0";
const EXISTS_ORDER: &str = "SELECT COUNT(*) FROM orders WHERE id = ?";

const INSERT_PAYMENT: &str = r"
    INSERT INTO payments (id, order_id, transaction_id, amount, extra, created_at)
    VALUES (?, ?, ?, ?, ?, ?)
";

const SELECT_BY_TRANSACTION: &str =
    "SELECT * FROM payments WHERE transaction_id = ? ORDER BY created_at, rowid LIMIT 1";

/// `SQLite`-backed payment ledger.
///
/// Marking the order paid and appending the payment record happen in one
/// transaction: either both are stored or neither is.
pub struct SqlitePaymentLedger {
    pool: SqlitePool,
}

impl SqlitePaymentLedger {
    /// Create a new ledger using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl PaymentLedger for SqlitePaymentLedger {
    async fn confirm(
        &self,
        order_id: OrderId,
        record: PaymentRecord,
    ) -> Result<UpdateOutcome, ClinicError> {
        let extra_json = serde_json::to_string(&record.extra).map_err(StorageError::from)?;
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;

        let modified = sqlx::query(MARK_PAID)
            .bind(&record.transaction_id)
            .bind(order_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?
            .rows_affected();

        if modified == 0 {
            let (count,): (i64,) = sqlx::query_as(EXISTS_ORDER)
                .bind(order_id.to_string())
                .fetch_one(&mut *tx)
                .await
                .map_err(StorageError::from)?;
            tx.rollback().await.map_err(StorageError::from)?;
            return Ok(UpdateOutcome {
                matched: count.unsigned_abs(),
                modified: 0,
            });
        }

        sqlx::query(INSERT_PAYMENT)
            .bind(record.id.to_string())
            .bind(order_id.to_string())
            .bind(&record.transaction_id)
            .bind(record.amount.map(f64::from))
            .bind(&extra_json)
            .bind(encode_time(&record.created_at))
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?;

        tx.commit().await.map_err(StorageError::from)?;
        Ok(UpdateOutcome::modified_one())
    }

    async fn find_by_transaction_id(
        &self,
        transaction_id: String,
    ) -> Result<Option<PaymentRecord>, ClinicError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_TRANSACTION)
            .bind(transaction_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }
}
