//! `SQLite` implementation of [`ReviewRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use clinic_app::ports::ReviewRepository;
use clinic_domain::error::ClinicError;
use clinic_domain::id::ReviewId;
use clinic_domain::review::Review;

use crate::codec::{decode_err, decode_time, encode_time};
use crate::error::StorageError;

struct Wrapper(Review);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let rating: Option<i64> = row.try_get("rating")?;
        let created_at: String = row.try_get("created_at")?;

        let rating = rating
            .map(|value| u8::try_from(value).map_err(decode_err))
            .transpose()?;

        Ok(Self(Review {
            id: ReviewId::from_str(&id).map_err(decode_err)?,
            author: row.try_get("author")?,
            text: row.try_get("text")?,
            rating,
            created_at: decode_time(&created_at)?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO reviews (id, author, text, rating, created_at)
    VALUES (?, ?, ?, ?, ?)
";

const SELECT_ALL: &str = "SELECT * FROM reviews ORDER BY created_at DESC, rowid DESC";

/// `SQLite`-backed review repository.
pub struct SqliteReviewRepository {
    pool: SqlitePool,
}

impl SqliteReviewRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ReviewRepository for SqliteReviewRepository {
    async fn create(&self, review: Review) -> Result<Review, ClinicError> {
        sqlx::query(INSERT)
            .bind(review.id.to_string())
            .bind(&review.author)
            .bind(&review.text)
            .bind(review.rating.map(i64::from))
            .bind(encode_time(&review.created_at))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(review)
    }

    async fn get_all(&self) -> Result<Vec<Review>, ClinicError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}
