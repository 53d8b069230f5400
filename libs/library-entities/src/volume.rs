//! Volumes of a series and their fluent builder

use crate::error::EntityError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name of the volume holding chapters released outside any volume
pub const LOOSE_LEAF_VOLUME: &str = "-100000";
pub const LOOSE_LEAF_NUMBER: f32 = -100_000.0;
/// Number of the volume holding specials
pub const SPECIAL_VOLUME_NUMBER: f32 = 100_000.0;

const MIN_WORDS_PER_HOUR: f32 = 10_260.0;
const MAX_WORDS_PER_HOUR: f32 = 30_000.0;
const MIN_PAGES_PER_MINUTE: f32 = 3.33;
const MAX_PAGES_PER_MINUTE: f32 = 2.75;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: i32,
    pub volume_id: i32,
    /// Chapter number or range as parsed from the file name
    pub range: String,
    pub min_number: f32,
    pub max_number: f32,
    pub pages: i32,
    pub word_count: i64,
    pub is_special: bool,
}

impl Chapter {
    pub fn new(range: impl Into<String>, pages: i32) -> Self {
        let range = range.into();
        let (min_number, max_number) = parse_range(&range);
        Self {
            id: 0,
            volume_id: 0,
            range,
            min_number,
            max_number,
            pages,
            word_count: 0,
            is_special: false,
        }
    }

    pub fn with_word_count(mut self, word_count: i64) -> Self {
        self.word_count = word_count;
        self
    }
}

/// Estimated reading time in hours
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingTime {
    pub min_hours: i32,
    pub max_hours: i32,
    pub avg_hours: f32,
}

impl ReadingTime {
    /// Text-based works are timed by words, image-based ones by pages
    pub fn estimate(pages: i32, word_count: i64) -> Self {
        let (fast, slow) = if word_count > 0 {
            let words = word_count as f32;
            (words / MAX_WORDS_PER_HOUR, words / MIN_WORDS_PER_HOUR)
        } else {
            let pages = pages.max(0) as f32;
            (
                pages / MIN_PAGES_PER_MINUTE / 60.0,
                pages / MAX_PAGES_PER_MINUTE / 60.0,
            )
        };

        Self {
            min_hours: fast.round() as i32,
            max_hours: slow.round() as i32,
            avg_hours: (fast + slow) / 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub id: i32,
    pub series_id: i32,
    /// Volume name as parsed, possibly a range such as `1-3`
    pub name: String,
    /// Lowercased name used for matching during scans
    pub lookup_name: String,
    pub min_number: f32,
    pub max_number: f32,
    pub chapters: Vec<Chapter>,
    pub pages: i32,
    pub word_count: i64,
    pub reading_time: ReadingTime,
    pub cover_image: Option<String>,
    pub created: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

impl Volume {
    pub fn is_loose_leaf(&self) -> bool {
        self.min_number == LOOSE_LEAF_NUMBER
    }

    pub fn is_special(&self) -> bool {
        self.min_number == SPECIAL_VOLUME_NUMBER
    }

    /// Recompute page and word totals and reading time from the chapters
    pub fn recompute_totals(&mut self) {
        self.pages = self.chapters.iter().map(|c| c.pages).sum();
        self.word_count = self.chapters.iter().map(|c| c.word_count).sum();
        self.reading_time = ReadingTime::estimate(self.pages, self.word_count);
    }

    pub fn add_chapter(&mut self, mut chapter: Chapter) -> Result<(), EntityError> {
        if chapter.volume_id != 0 && self.id != 0 && chapter.volume_id != self.id {
            return Err(EntityError::ForeignChapter {
                chapter_id: chapter.id,
                volume_id: self.id,
            });
        }
        chapter.volume_id = self.id;
        self.chapters.push(chapter);
        self.recompute_totals();
        self.last_modified = Utc::now();
        Ok(())
    }
}

/// Fluent construction of a [`Volume`]
#[derive(Debug, Clone)]
pub struct VolumeBuilder {
    volume: Volume,
}

impl VolumeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let (min_number, max_number) = parse_range(&name);
        let now = Utc::now();
        Self {
            volume: Volume {
                id: 0,
                series_id: 0,
                lookup_name: name.to_lowercase(),
                name,
                min_number,
                max_number,
                chapters: Vec::new(),
                pages: 0,
                word_count: 0,
                reading_time: ReadingTime::default(),
                cover_image: None,
                created: now,
                last_modified: now,
            },
        }
    }

    pub fn loose_leaf() -> Self {
        Self::new(LOOSE_LEAF_VOLUME)
    }

    pub fn with_id(mut self, id: i32) -> Self {
        self.volume.id = id;
        self
    }

    pub fn with_series_id(mut self, series_id: i32) -> Self {
        self.volume.series_id = series_id;
        self
    }

    /// Override the number parsed from the name
    pub fn with_number(mut self, number: f32) -> Self {
        self.volume.min_number = number;
        self.volume.max_number = number;
        self
    }

    pub fn with_chapter(mut self, chapter: Chapter) -> Self {
        self.volume.chapters.push(chapter);
        self
    }

    pub fn with_cover_image(mut self, cover_image: impl Into<String>) -> Self {
        self.volume.cover_image = Some(cover_image.into());
        self
    }

    pub fn with_created(mut self, created: DateTime<Utc>) -> Self {
        self.volume.created = created;
        self.volume.last_modified = created;
        self
    }

    pub fn build(mut self) -> Volume {
        let volume_id = self.volume.id;
        for chapter in &mut self.volume.chapters {
            chapter.volume_id = volume_id;
        }
        self.volume.recompute_totals();
        self.volume
    }
}

/// `(min, max)` of a numeric name such as `3`, `1-3` or `2.5`. Names that are
/// not numeric yield `(0, 0)`.
pub fn parse_range(name: &str) -> (f32, f32) {
    let name = name.trim();
    if name == LOOSE_LEAF_VOLUME {
        return (LOOSE_LEAF_NUMBER, LOOSE_LEAF_NUMBER);
    }

    let parse = |s: &str| s.trim().parse::<f32>().ok();
    let parsed = match name.split_once('-') {
        Some((min, max)) if !min.trim().is_empty() => parse(min).zip(parse(max)),
        _ => parse(name).map(|n| (n, n)),
    };
    parsed.unwrap_or((0.0, 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range("1-3"), (1.0, 3.0));
        assert_eq!(parse_range("2.5"), (2.5, 2.5));
        assert_eq!(parse_range(" 4 - 6 "), (4.0, 6.0));
        assert_eq!(parse_range(LOOSE_LEAF_VOLUME), (LOOSE_LEAF_NUMBER, LOOSE_LEAF_NUMBER));
        assert_eq!(parse_range("Omnibus"), (0.0, 0.0));
    }

    #[test]
    fn test_reading_time_prefers_words() {
        let by_words = ReadingTime::estimate(300, 60_000);
        assert_eq!(by_words.min_hours, 2);
        assert_eq!(by_words.max_hours, 6);

        let by_pages = ReadingTime::estimate(200, 0);
        assert_eq!(by_pages.min_hours, 1);
        assert_eq!(by_pages.max_hours, 1);
    }
}
