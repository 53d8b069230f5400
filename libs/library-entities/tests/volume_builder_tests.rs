//! Volume builder behavior

use chrono::{TimeZone, Utc};
use library_entities::{Chapter, EntityError, VolumeBuilder, LOOSE_LEAF_NUMBER};

#[test]
fn test_range_name_sets_min_and_max() {
    let volume = VolumeBuilder::new("1-3").with_series_id(42).build();

    assert_eq!(volume.min_number, 1.0);
    assert_eq!(volume.max_number, 3.0);
    assert_eq!(volume.series_id, 42);
    assert_eq!(volume.lookup_name, "1-3");
}

#[test]
fn test_chapters_drive_totals() {
    let volume = VolumeBuilder::new("2")
        .with_id(9)
        .with_chapter(Chapter::new("10", 20))
        .with_chapter(Chapter::new("11", 24).with_word_count(0))
        .build();

    assert_eq!(volume.pages, 44);
    assert!(volume.chapters.iter().all(|c| c.volume_id == 9));
    assert_eq!(volume.chapters[0].min_number, 10.0);
}

#[test]
fn test_loose_leaf_and_number_override() {
    let loose = VolumeBuilder::loose_leaf().build();
    assert!(loose.is_loose_leaf());
    assert_eq!(loose.min_number, LOOSE_LEAF_NUMBER);

    let special = VolumeBuilder::new("Specials").with_number(100_000.0).build();
    assert!(special.is_special());
}

#[test]
fn test_created_timestamp_is_kept() {
    let created = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let volume = VolumeBuilder::new("1").with_created(created).build();

    assert_eq!(volume.created, created);
    assert_eq!(volume.last_modified, created);
}

#[test]
fn test_add_chapter_rejects_chapter_of_another_volume() {
    let mut volume = VolumeBuilder::new("1").with_id(1).build();
    let mut chapter = Chapter::new("5", 30);
    chapter.volume_id = 2;

    assert_eq!(
        volume.add_chapter(chapter),
        Err(EntityError::ForeignChapter {
            chapter_id: 0,
            volume_id: 1
        })
    );

    volume.add_chapter(Chapter::new("6", 30)).unwrap();
    assert_eq!(volume.pages, 30);
}

#[test]
fn test_serializes_camel_case() {
    let volume = VolumeBuilder::new("1").with_cover_image("v1.png").build();
    let json = serde_json::to_value(&volume).unwrap();

    assert_eq!(json["minNumber"], 1.0);
    assert_eq!(json["coverImage"], "v1.png");
    assert!(json["readingTime"]["avgHours"].is_number());
}
