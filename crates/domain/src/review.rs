//! Review: customer feedback shown on the landing page.

use serde::{Deserialize, Serialize};

use crate::error::{ClinicError, ValidationError};
use crate::id::ReviewId;
use crate::time::{Timestamp, now};

/// Free-text feedback submitted by an authenticated customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: ReviewId,
    /// Email of the submitting customer, taken from the credential.
    pub author: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    pub created_at: Timestamp,
}

impl Review {
    /// Build a new review for `author`.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicError::Validation`] when `text` is blank or `rating`
    /// falls outside `1..=5`.
    pub fn new(
        author: impl Into<String>,
        text: impl Into<String>,
        rating: Option<u8>,
    ) -> Result<Self, ClinicError> {
        let review = Self {
            id: ReviewId::new(),
            author: author.into(),
            text: text.into(),
            rating,
            created_at: now(),
        };
        review.validate()?;
        Ok(review)
    }

    /// # Errors
    ///
    /// See [`Review::new`].
    pub fn validate(&self) -> Result<(), ClinicError> {
        if self.text.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "text" }.into());
        }
        match self.rating {
            Some(rating) if !(1..=5).contains(&rating) => {
                Err(ValidationError::RatingOutOfRange(rating).into())
            }
            _ => Ok(()),
        }
    }
}
