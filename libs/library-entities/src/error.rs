//! Entity errors

/// Errors raised when an entity would be put in an invalid state
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EntityError {
    #[error("rating must be between {min} and {max}, got {value}")]
    RatingOutOfRange { value: f32, min: f32, max: f32 },

    #[error("chapter {chapter_id} does not belong to volume {volume_id}")]
    ForeignChapter { chapter_id: i32, volume_id: i32 },
}
