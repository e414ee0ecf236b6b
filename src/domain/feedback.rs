use chrono::{DateTime, Utc};

use super::errors::DomainError;
use super::identity::Purchaser;

#[derive(Debug, Clone)]
pub struct Feedback {
    pub id: i64,
    pub item_id: i64,
    pub author: Option<Purchaser>,
    pub rating: i16,
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub item_id: i64,
    pub author: Purchaser,
    pub rating: i16,
    pub comments: Option<String>,
}

pub fn validate_rating(rating: i16) -> Result<(), DomainError> {
    if !(1..=5).contains(&rating) {
        return Err(DomainError::validation("rating must be between 1 and 5"));
    }
    Ok(())
}
