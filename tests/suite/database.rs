//! On-disk database format and recovery

use dominsp_store::{JsonRecordStore, RecordStore, StoreError, init_database};
use dominsp_types::{Record, Status, Word};

fn record(word: &str, status: Status, combined: bool) -> Record {
    Record::new(Word::new(word).unwrap(), status, combined)
}

#[test]
fn init_creates_empty_collection_and_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("words.json");

    init_database(&path).unwrap();

    let store = JsonRecordStore::new(&path);
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn records_are_stored_as_flat_objects_with_integer_status() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("words.json");
    let store = JsonRecordStore::new(&path);

    store
        .save(&[
            record("fine", Status::Taken, false),
            record("sunset", Status::Expanded, true),
        ])
        .unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
        raw,
        serde_json::json!([
            { "word": "fine", "status": 2, "combined": false },
            { "word": "sunset", "status": 1, "combined": true }
        ])
    );
}

#[test]
fn missing_status_and_combined_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("words.json");
    std::fs::write(&path, r#"[{ "word": "sun" }]"#).unwrap();

    let records = JsonRecordStore::new(&path).load().unwrap();
    assert_eq!(records, vec![record("sun", Status::New, false)]);
}

#[test]
fn unknown_status_code_is_a_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("words.json");
    std::fs::write(&path, r#"[{ "word": "sun", "status": 9, "combined": false }]"#).unwrap();

    let err = JsonRecordStore::new(&path).load().unwrap_err();
    assert!(matches!(err, StoreError::Format { .. }));
    assert_eq!(err.path(), &path);
}

#[test]
fn missing_database_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = JsonRecordStore::new(dir.path().join("absent.json"))
        .load()
        .unwrap_err();
    assert!(matches!(err, StoreError::Read { .. }));
    assert_eq!(err.kind(), "read failure");
}

#[test]
fn interrupted_save_is_recovered_from_backup() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("words.json");
    let store = JsonRecordStore::new(&path);
    store.save(&[record("sun", Status::New, false)]).unwrap();

    // A crash between "rename to .bak" and "persist" leaves only the backup.
    std::fs::rename(&path, path.with_extension("bak")).unwrap();

    let records = store.load().unwrap();
    assert_eq!(records, vec![record("sun", Status::New, false)]);
    assert!(path.exists());
}
