//! Review service.

use clinic_domain::error::ClinicError;
use clinic_domain::review::Review;
use clinic_domain::user::Identity;

use crate::ports::ReviewRepository;

/// Application service for customer reviews.
pub struct ReviewService<R> {
    repo: R,
}

impl<R: ReviewRepository> ReviewService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Store a review authored by the verified `identity`.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicError::Validation`] for blank text or an out-of-range
    /// rating, or a storage error.
    pub async fn add_review(
        &self,
        identity: &Identity,
        text: String,
        rating: Option<u8>,
    ) -> Result<Review, ClinicError> {
        let review = Review::new(identity.email.clone(), text, rating)?;
        let created = self.repo.create(review).await?;
        tracing::info!(review_id = %created.id, author = %created.author, "review added");
        Ok(created)
    }

    /// List every review, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error.
    pub async fn list_reviews(&self) -> Result<Vec<Review>, ClinicError> {
        self.repo.get_all().await
    }
}
