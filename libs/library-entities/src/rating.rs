//! A user's rating and review of a series

use crate::error::EntityError;
use serde::{Deserialize, Serialize};

pub const MIN_RATING: f32 = 0.0;
pub const MAX_RATING: f32 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: i32,
    pub app_user_id: i32,
    pub series_id: i32,
    /// Stars in `[0, 5]`, half steps allowed
    pub score: f32,
    /// Distinguishes an explicit 0 from "never rated"
    pub has_been_rated: bool,
    pub review: Option<String>,
}

impl Rating {
    /// Unrated entry for a user and series
    pub fn new(app_user_id: i32, series_id: i32) -> Self {
        Self {
            id: 0,
            app_user_id,
            series_id,
            score: 0.0,
            has_been_rated: false,
            review: None,
        }
    }

    pub fn rate(&mut self, score: f32) -> Result<(), EntityError> {
        if !(MIN_RATING..=MAX_RATING).contains(&score) {
            return Err(EntityError::RatingOutOfRange {
                value: score,
                min: MIN_RATING,
                max: MAX_RATING,
            });
        }
        self.score = score;
        self.has_been_rated = true;
        Ok(())
    }

    /// Blank reviews are stored as none
    pub fn set_review(&mut self, review: impl Into<String>) {
        let review = review.into();
        let trimmed = review.trim();
        self.review = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }

    pub fn clear(&mut self) {
        self.score = 0.0;
        self.has_been_rated = false;
        self.review = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_rejects_out_of_range_scores() {
        let mut rating = Rating::new(1, 2);
        assert!(rating.rate(5.5).is_err());
        assert!(!rating.has_been_rated);

        rating.rate(0.0).unwrap();
        assert!(rating.has_been_rated);
    }

    #[test]
    fn test_blank_review_is_none() {
        let mut rating = Rating::new(1, 2);
        rating.set_review("   ");
        assert_eq!(rating.review, None);

        rating.set_review(" Great pacing ");
        assert_eq!(rating.review.as_deref(), Some("Great pacing"));
    }
}
