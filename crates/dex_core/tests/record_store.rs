use dex_core::db::{open_db, open_db_in_memory};
use dex_core::{
    make_in_memory_store, record_id_for, DomainRecord, ImageRef, InsertOutcome,
    RecordRepository, RepoError, SqliteRecordRepository,
};

fn record(name: &str, categories: &[&str], image: &str) -> DomainRecord {
    DomainRecord::new(
        name,
        categories.iter().map(|value| value.to_string()).collect(),
        ImageRef::new(image),
    )
    .unwrap()
}

#[test]
fn insert_and_get_roundtrip_preserves_category_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::new(&conn);
    let bulbasaur = record("bulbasaur", &["grass", "poison"], "bulbasaur.png");

    let outcome = repo.insert_record(&bulbasaur).unwrap();
    assert_eq!(outcome, InsertOutcome::Inserted(bulbasaur.id()));

    let loaded = repo.get_record(bulbasaur.id()).unwrap().unwrap();
    assert_eq!(loaded, bulbasaur);
    assert_eq!(loaded.categories(), ["grass", "poison"]);
}

#[test]
fn get_unknown_record_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::new(&conn);

    assert_eq!(repo.get_record(record_id_for("missingno")).unwrap(), None);
    assert_eq!(repo.latest_record().unwrap(), None);
    assert!(repo.list_records().unwrap().is_empty());
}

#[test]
fn inserting_equal_record_is_a_no_op() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::new(&conn);
    let mew = record("mew", &["psychic"], "mew");

    assert!(repo.insert_record(&mew).unwrap().was_inserted());
    let second = repo.insert_record(&mew.clone()).unwrap();

    assert_eq!(second, InsertOutcome::AlreadyPresent(mew.id()));
    assert_eq!(repo.count_records().unwrap(), 1);
}

#[test]
fn inserting_same_name_with_different_content_is_a_conflict() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::new(&conn);
    repo.insert_record(&record("mew", &["psychic"], "mew"))
        .unwrap();

    let err = repo
        .insert_record(&record("mew", &["psychic", "fairy"], "mew"))
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict { ref name } if name == "mew"));
    assert_eq!(
        repo.get_record(record_id_for("mew")).unwrap().unwrap().categories(),
        ["psychic"]
    );
}

#[test]
fn list_and_latest_follow_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::new(&conn);
    let bulbasaur = record("bulbasaur", &["grass", "poison"], "bulbasaur.png");
    let mew = record("mew", &["psychic"], "mew");
    let charmander = record("charmander", &["fire"], "charmander.png");

    for item in [&bulbasaur, &mew, &charmander] {
        repo.insert_record(item).unwrap();
    }

    assert_eq!(repo.list_records().unwrap(), vec![bulbasaur, mew, charmander.clone()]);
    assert_eq!(repo.latest_record().unwrap(), Some(charmander));
    assert_eq!(repo.count_records().unwrap(), 3);
}

#[test]
fn make_in_memory_store_is_seeded_and_isolated() {
    let seed = record("bulbasaur", &["grass", "poison"], "bulbasaur.png");

    let first = make_in_memory_store(&seed).unwrap();
    let second = make_in_memory_store(&seed).unwrap();
    SqliteRecordRepository::new(&second)
        .insert_record(&record("mew", &["psychic"], "mew"))
        .unwrap();

    assert_eq!(
        SqliteRecordRepository::new(&first).list_records().unwrap(),
        vec![seed]
    );
    assert_eq!(
        SqliteRecordRepository::new(&second).count_records().unwrap(),
        2
    );
}

#[test]
fn file_store_keeps_records_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dex.db");
    let mew = record("mew", &["psychic"], "mew");

    {
        let conn = open_db(&path).unwrap();
        SqliteRecordRepository::new(&conn).insert_record(&mew).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let repo = SqliteRecordRepository::new(&conn);
    assert_eq!(repo.list_records().unwrap(), vec![mew.clone()]);
    assert!(!repo.insert_record(&mew).unwrap().was_inserted());
}

#[test]
fn persisted_record_without_categories_is_rejected_on_read() {
    let conn = open_db_in_memory().unwrap();
    let id = record_id_for("missingno");
    conn.execute(
        "INSERT INTO records (id, seq, name, image_reference) VALUES (?1, 1, 'missingno', 'glitch');",
        [id.to_string()],
    )
    .unwrap();

    let err = SqliteRecordRepository::new(&conn).list_records().unwrap_err();
    match err {
        RepoError::InvalidData(message) => assert!(message.contains("category"), "{message}"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn persisted_record_with_mismatched_id_is_rejected_on_read() {
    let conn = open_db_in_memory().unwrap();
    let id = record_id_for("bulbasaur");
    conn.execute(
        "INSERT INTO records (id, seq, name, image_reference) VALUES (?1, 1, 'mew', 'mew');",
        [id.to_string()],
    )
    .unwrap();

    let err = SqliteRecordRepository::new(&conn)
        .get_record(id)
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)), "unexpected error: {err}");
}
