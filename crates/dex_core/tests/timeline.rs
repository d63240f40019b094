use dex_core::db::open_db_in_memory;
use dex_core::{
    make_in_memory_store, ContentMode, DomainRecord, EmbeddedBundle, ImageRef, RecordLoader,
    RecordRepository, RefreshPolicy, SqliteRecordRepository, TimelineConfig, TimelineGenerator,
};
use std::time::Duration;

const HOUR: Duration = Duration::from_secs(60 * 60);
const HOUR_MS: i64 = 60 * 60 * 1000;
const T: i64 = 1_760_700_000_000;

fn record(name: &str, categories: &[&str], image: &str) -> DomainRecord {
    DomainRecord::new(
        name,
        categories.iter().map(|value| value.to_string()).collect(),
        ImageRef::new(image),
    )
    .unwrap()
}

fn rotate() -> TimelineConfig {
    TimelineConfig {
        content_mode: ContentMode::Rotate,
        ..TimelineConfig::default()
    }
}

#[test]
fn generate_spaces_entries_by_interval() {
    let generator = TimelineGenerator::placeholder_only(TimelineConfig::default());

    for (count, interval) in [
        (1, Duration::from_millis(1)),
        (5, HOUR),
        (12, Duration::from_secs(90)),
    ] {
        let timeline = generator.generate(T, count, interval);
        assert_eq!(timeline.len(), count);
        assert_eq!(timeline.policy(), RefreshPolicy::AtEnd);

        let interval_ms = interval.as_millis() as i64;
        for (offset, entry) in timeline.entries().iter().enumerate() {
            assert_eq!(entry.timestamp_ms, T + offset as i64 * interval_ms);
        }
        assert!(timeline
            .entries()
            .windows(2)
            .all(|pair| pair[0].timestamp_ms < pair[1].timestamp_ms));
    }
}

#[test]
fn unresolved_timeline_uses_bulbasaur_placeholder() {
    let generator = TimelineGenerator::placeholder_only(TimelineConfig::default());

    let timeline = generator.generate(T, 5, HOUR);

    let stamps = timeline
        .entries()
        .iter()
        .map(|entry| entry.timestamp_ms)
        .collect::<Vec<_>>();
    assert_eq!(
        stamps,
        vec![T, T + HOUR_MS, T + 2 * HOUR_MS, T + 3 * HOUR_MS, T + 4 * HOUR_MS]
    );
    for entry in timeline.entries() {
        assert_eq!(entry.name, "bulbasaur");
        assert_eq!(entry.categories, vec!["grass", "poison"]);
    }
    assert_eq!(timeline.refresh_after_ms(), Some(T + 4 * HOUR_MS));
}

#[test]
fn resolved_timeline_projects_loaded_record() {
    let conn = open_db_in_memory().unwrap();
    let loader = RecordLoader::new(SqliteRecordRepository::new(&conn), EmbeddedBundle::bundled());
    loader.load().unwrap();

    let generator = TimelineGenerator::new(loader.repo(), TimelineConfig::default());
    let timeline = generator.generate_default(T);

    assert_eq!(timeline.len(), 5);
    assert_eq!(timeline.entries()[4].timestamp_ms, T + 4 * HOUR_MS);
    for entry in timeline.entries() {
        assert_eq!(entry.name, "bulbasaur");
        assert_eq!(entry.categories, vec!["grass", "poison"]);
        assert_eq!(entry.image_reference.as_str(), "bulbasaur.png");
    }
}

#[test]
fn consecutive_calls_with_same_arguments_are_identical() {
    let conn = make_in_memory_store(&record("mew", &["psychic"], "mew")).unwrap();
    let repo = SqliteRecordRepository::new(&conn);
    let generator = TimelineGenerator::new(&repo, TimelineConfig::default());

    let first = generator.generate(T, 4, HOUR);
    let second = generator.generate(T, 4, HOUR);

    assert_eq!(first, second);
}

#[test]
fn later_calls_reflect_records_resolved_in_between() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::new(&conn);
    let generator = TimelineGenerator::new(&repo, TimelineConfig::default());

    let before = generator.generate(T, 2, HOUR);
    assert!(before.entries().iter().all(|entry| entry.name == "bulbasaur"));

    repo.insert_record(&record("mew", &["psychic"], "mew")).unwrap();

    let after = generator.generate(T, 2, HOUR);
    assert!(after.entries().iter().all(|entry| entry.name == "mew"));
    assert_eq!(generator.snapshot(T).name, "mew");
}

#[test]
fn rotate_cycles_through_stored_records() {
    let conn = make_in_memory_store(&record("bulbasaur", &["grass", "poison"], "b.png")).unwrap();
    let repo = SqliteRecordRepository::new(&conn);
    repo.insert_record(&record("mew", &["psychic"], "mew")).unwrap();
    repo.insert_record(&record("charmander", &["fire"], "c.png")).unwrap();

    let timeline = TimelineGenerator::new(&repo, rotate()).generate(T, 5, HOUR);

    let names = timeline
        .entries()
        .iter()
        .map(|entry| entry.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["bulbasaur", "mew", "charmander", "bulbasaur", "mew"]);
}

#[test]
fn rotate_mode_snapshot_shows_latest_record() {
    let conn = make_in_memory_store(&record("bulbasaur", &["grass", "poison"], "b.png")).unwrap();
    let repo = SqliteRecordRepository::new(&conn);
    repo.insert_record(&record("mew", &["psychic"], "mew")).unwrap();

    let rotating = TimelineGenerator::new(&repo, rotate()).snapshot(T);
    let repeating = TimelineGenerator::new(&repo, TimelineConfig::default()).snapshot(T);

    assert_eq!(rotating.name, "mew");
    assert_eq!(rotating.timestamp_ms, T);
    assert_eq!(rotating, repeating);
}

#[test]
fn repeat_mode_uses_latest_record_only() {
    let conn = make_in_memory_store(&record("bulbasaur", &["grass", "poison"], "b.png")).unwrap();
    let repo = SqliteRecordRepository::new(&conn);
    repo.insert_record(&record("mew", &["psychic"], "mew")).unwrap();

    let timeline = TimelineGenerator::new(&repo, TimelineConfig::default()).generate(T, 3, HOUR);

    assert!(timeline.entries().iter().all(|entry| entry.name == "mew"));
}

#[test]
fn every_entry_has_a_primary_category() {
    let conn = make_in_memory_store(&record("mew", &["psychic"], "mew")).unwrap();
    let repo = SqliteRecordRepository::new(&conn);
    let generators = [
        TimelineGenerator::placeholder_only(TimelineConfig::default()),
        TimelineGenerator::placeholder_only(rotate()),
        TimelineGenerator::new(&repo, TimelineConfig::default()),
        TimelineGenerator::new(&repo, rotate()),
    ];

    for generator in &generators {
        assert!(!generator.placeholder().categories.is_empty());
        for entry in generator.generate(T, 7, HOUR).entries() {
            assert!(!entry.categories.is_empty(), "entry {entry:?}");
        }
    }
}

#[test]
fn unreadable_store_falls_back_to_placeholder() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch("DROP TABLE record_categories; DROP TABLE records;")
        .unwrap();
    let repo = SqliteRecordRepository::new(&conn);
    assert!(repo.list_records().is_err());

    let timeline = TimelineGenerator::new(&repo, TimelineConfig::default()).generate(T, 2, HOUR);

    assert!(timeline.entries().iter().all(|entry| entry.name == "bulbasaur"));
}
