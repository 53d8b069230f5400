//! Library domain entities
//!
//! Plain records shared by the library subsystems: a user's rating of a
//! series, recommendations pulled from external metadata providers, and
//! volumes with their chapters.

pub mod error;
pub mod rating;
pub mod recommendation;
pub mod volume;

pub use error::EntityError;
pub use rating::Rating;
pub use recommendation::{ExternalRecommendation, ScrobbleProvider};
pub use volume::{
    Chapter, ReadingTime, Volume, VolumeBuilder, LOOSE_LEAF_NUMBER, LOOSE_LEAF_VOLUME,
    SPECIAL_VOLUME_NUMBER,
};
