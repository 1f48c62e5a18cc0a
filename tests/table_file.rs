//! Table File Tests
//!
//! Loader and writer behavior on disk:
//! - Loading never mutates the file
//! - Header-only files are empty, missing files are unavailable
//! - Persisted files read back to the same table
//! - The header (schema) survives every commit unchanged

use std::fs;
use std::path::PathBuf;

use daylog::commit::CommitEngine;
use daylog::table::{Payload, Row, Scalar, Schema, Table, TableErrorCode, TableLoader, TableWriter};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn write_file(content: &[u8]) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("db.csv");
    fs::write(&path, content).unwrap();
    (tmp, path)
}

fn schema(names: &[&str]) -> Schema {
    Schema::new(names.iter().map(|s| s.to_string()).collect()).unwrap()
}

// =============================================================================
// Load Tests
// =============================================================================

#[test]
fn test_header_only_is_empty() {
    let (_tmp, path) = write_file(b"datetime,a,b\n");
    let err = TableLoader::new(&path).load().unwrap_err();
    assert_eq!(err.code(), TableErrorCode::EmptyTable);

    let seeded = TableLoader::new(&path).load_schema_seeded().unwrap();
    assert_eq!(seeded.schema().columns(), ["a", "b"]);
    assert!(seeded.is_empty());
}

#[test]
fn test_missing_file_is_unavailable() {
    let tmp = TempDir::new().unwrap();
    let loader = TableLoader::new(tmp.path().join("absent.csv"));

    assert_eq!(
        loader.load().unwrap_err().code(),
        TableErrorCode::StorageUnavailable
    );
    assert_eq!(
        loader.load_schema_seeded().unwrap_err().code(),
        TableErrorCode::StorageUnavailable
    );
}

#[test]
fn test_malformed_files_are_unavailable() {
    let cases: [&[u8]; 7] = [
        b"",
        b"time,a\n2020-05-01 00:00:00,1\n",
        b"datetime\n",
        b"datetime,a,a\n",
        b"datetime,a\n2020-05-01 00:00:00,1,2\n",
        b"datetime,a\n,1\n",
        b"datetime,a\n2020-05-01 00:00:00,\xff\xfe\n",
    ];

    for content in cases {
        let (_tmp, path) = write_file(content);
        let err = TableLoader::new(&path).load().unwrap_err();
        assert_eq!(
            err.code(),
            TableErrorCode::StorageUnavailable,
            "accepted {:?}",
            String::from_utf8_lossy(content)
        );
    }
}

/// Loading leaves the bytes on disk untouched.
#[test]
fn test_load_does_not_mutate() {
    let content = b"datetime,a,b\n2020-05-01 00:00:00,1,x\n2020-05-02 00:00:00,,2.5";
    let (_tmp, path) = write_file(content);

    for _ in 0..3 {
        let table = TableLoader::new(&path).load().unwrap();
        assert_eq!(table.row_count(), 2);
    }
    assert_eq!(fs::read(&path).unwrap(), content);
}

// =============================================================================
// Persist Tests
// =============================================================================

#[test]
fn test_persist_then_load() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("db.csv");

    let mut table = Table::new(schema(&["count", "note", "ratio"]));
    table
        .push(Row::new(
            "2020-05-01 00:00:00",
            vec![
                Some(Scalar::Int(-3)),
                Some(Scalar::Text("said \"hi\", left".into())),
                Some(Scalar::Float(1e-7)),
            ],
        ))
        .unwrap();
    table
        .push(Row::new(
            "2020-05-02 00:00:00",
            vec![None, None, Some(Scalar::Float(2.0))],
        ))
        .unwrap();

    TableWriter::new(&path).persist(&table).unwrap();

    let loaded = TableLoader::new(&path).load().unwrap();
    assert_eq!(loaded, table);
    assert!(fs::read_to_string(&path).unwrap().ends_with('\n'));
}

/// A text column keeps numeric-looking values as text across commits.
#[test]
fn test_text_column_round_trips_digits() {
    let (_tmp, path) = write_file(b"datetime,note,level
2020-05-01 00:00:00,spring,1.5
");
    let engine = CommitEngine::new(&path);

    let mut payload = Payload::new();
    payload.insert("note".to_string(), Some(Scalar::Text("007".into())));
    payload.insert("level".to_string(), Some(Scalar::Int(2)));
    engine.commit("2020-05-02 00:00:00", &payload).unwrap();

    let table = TableLoader::new(&path).load().unwrap();
    assert_eq!(
        table.rows()[1].values(),
        [Some(Scalar::Text("007".into())), Some(Scalar::Float(2.0))]
    );
}

/// Header names are any UTF-8 text, not only identifiers.
#[test]
fn test_free_form_header_names_load_and_commit() {
    let (_tmp, path) = write_file("datetime,day rank,température\n".as_bytes());
    let engine = CommitEngine::new(&path);

    let mut payload = Payload::new();
    payload.insert("température".to_string(), Some(Scalar::Float(21.5)));
    engine.commit("2020-05-01 00:00:00", &payload).unwrap();

    let table = TableLoader::new(&path).load().unwrap();
    assert_eq!(table.schema().columns(), ["day rank", "température"]);
    assert_eq!(table.rows()[0].values(), [None, Some(Scalar::Float(21.5))]);
    assert!(fs::read_to_string(&path)
        .unwrap()
        .starts_with("datetime,day rank,température\n"));
}

/// The header is identical after any number of commits.
#[test]
fn test_schema_survives_commits() {
    let (_tmp, path) = write_file(b"datetime,day_rank,temperature\n");
    let engine = CommitEngine::new(&path);

    for day in 1..=5 {
        let mut payload = Payload::new();
        payload.insert("day_rank".to_string(), Some(Scalar::Int(day)));
        engine
            .commit(&format!("2020-05-{:02} 12:00:00", day), &payload)
            .unwrap();

        let table = TableLoader::new(&path).load().unwrap();
        assert_eq!(table.schema().columns(), ["day_rank", "temperature"]);
        assert_eq!(table.row_count(), day as usize);
    }

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().next(), Some("datetime,day_rank,temperature"));
}
