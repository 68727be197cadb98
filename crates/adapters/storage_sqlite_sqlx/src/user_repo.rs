//! `SQLite` implementation of [`UserRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use clinic_app::ports::UserRepository;
use clinic_domain::error::ClinicError;
use clinic_domain::extra::{ExtraFields, merge};
use clinic_domain::outcome::{UpdateOutcome, UpsertOutcome};
use clinic_domain::user::{Role, User};

use crate::codec::decode_extra;
use crate::error::StorageError;

struct Wrapper(User);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let role: Option<String> = row.try_get("role")?;
        let profile_json: String = row.try_get("profile")?;

        Ok(Self(User {
            email: row.try_get("email")?,
            role: Role::from_stored(role.as_deref()),
            profile: decode_extra(&profile_json)?,
        }))
    }
}

const INSERT_IF_ABSENT: &str =
    "INSERT INTO users (email, role, profile) VALUES (?, NULL, ?) ON CONFLICT(email) DO NOTHING";
const SELECT_PROFILE: &str = "SELECT profile FROM users WHERE email = ?";
const UPDATE_PROFILE: &str = "UPDATE users SET profile = ? WHERE email = ?";
const SELECT_BY_EMAIL: &str = "SELECT * FROM users WHERE email = ?";
const SELECT_ALL: &str = "SELECT * FROM users ORDER BY rowid";
const UPDATE_ROLE: &str = "UPDATE users SET role = ? WHERE email = ? AND role IS NOT ?";
const EXISTS_BY_EMAIL: &str = "SELECT COUNT(*) FROM users WHERE email = ?";

/// `SQLite`-backed user repository keyed by email.
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl UserRepository for SqliteUserRepository {
    async fn upsert(
        &self,
        email: String,
        profile: ExtraFields,
    ) -> Result<UpsertOutcome, ClinicError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;

        // Write first so the transaction holds the write lock before it reads.
        let encoded = serde_json::to_string(&profile).map_err(StorageError::from)?;
        let inserted = sqlx::query(INSERT_IF_ABSENT)
            .bind(&email)
            .bind(encoded)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?
            .rows_affected();

        let outcome = if inserted > 0 {
            UpsertOutcome::Created
        } else {
            let (stored,): (String,) = sqlx::query_as(SELECT_PROFILE)
                .bind(&email)
                .fetch_one(&mut *tx)
                .await
                .map_err(StorageError::from)?;
            let mut merged: ExtraFields =
                serde_json::from_str(&stored).map_err(StorageError::from)?;
            merge(&mut merged, profile);
            let merged = serde_json::to_string(&merged).map_err(StorageError::from)?;
            sqlx::query(UPDATE_PROFILE)
                .bind(merged)
                .bind(&email)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;
            UpsertOutcome::Updated
        };

        tx.commit().await.map_err(StorageError::from)?;
        Ok(outcome)
    }

    async fn get_by_email(&self, email: String) -> Result<Option<User>, ClinicError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_EMAIL)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn get_all(&self) -> Result<Vec<User>, ClinicError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn set_role(&self, email: String, role: Role) -> Result<UpdateOutcome, ClinicError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;

        let stored = role.as_stored();
        let modified = sqlx::query(UPDATE_ROLE)
            .bind(stored)
            .bind(&email)
            .bind(stored)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?
            .rows_affected();

        let matched = if modified > 0 {
            modified
        } else {
            let (count,): (i64,) = sqlx::query_as(EXISTS_BY_EMAIL)
                .bind(&email)
                .fetch_one(&mut *tx)
                .await
                .map_err(StorageError::from)?;
            count.unsigned_abs()
        };

        tx.commit().await.map_err(StorageError::from)?;
        Ok(UpdateOutcome { matched, modified })
    }
}
