//! Commit Serialization Tests
//!
//! Concurrent commits go through one writer lane:
//! - N concurrent commits on a seeded table land exactly N rows
//! - No commit overwrites another's row
//! - Readers running alongside see whole files only
//! - The schema never changes across commits

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use daylog::commit::CommitEngine;
use daylog::table::{Payload, Scalar, TableErrorCode, TableLoader};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

const HEADER: &str = "datetime,writer,seq\n";

fn setup_seeded() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("db.csv");
    fs::write(&path, HEADER).unwrap();
    (tmp, path)
}

fn payload(writer: i64, seq: i64) -> Payload {
    let mut payload = Payload::new();
    payload.insert("writer".to_string(), Some(Scalar::Int(writer)));
    payload.insert("seq".to_string(), Some(Scalar::Int(seq)));
    payload
}

fn timestamp(writer: i64, seq: i64) -> String {
    format!("2020-05-01 {:02}:{:02}:00", writer, seq)
}

// =============================================================================
// Serialization Tests
// =============================================================================

/// Every concurrent commit lands, none lost to a stale read.
#[test]
fn test_concurrent_commits_all_land() {
    const WRITERS: i64 = 8;
    const PER_WRITER: i64 = 10;

    let (_tmp, path) = setup_seeded();
    let engine = Arc::new(CommitEngine::new(&path));

    let handles: Vec<_> = (0..WRITERS)
        .map(|writer| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for seq in 0..PER_WRITER {
                    engine
                        .commit(&timestamp(writer, seq), &payload(writer, seq))
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let table = TableLoader::new(&path).load().unwrap();
    assert_eq!(table.row_count(), (WRITERS * PER_WRITER) as usize);

    let keys: BTreeSet<&str> = table.rows().iter().map(|r| r.timestamp()).collect();
    assert_eq!(keys.len(), (WRITERS * PER_WRITER) as usize);

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with(HEADER));
    assert!(content.ends_with('\n'));
    assert_eq!(content.lines().count(), (WRITERS * PER_WRITER) as usize + 1);
}

/// Each writer's rows keep their relative order.
#[test]
fn test_per_writer_order_preserved() {
    let (_tmp, path) = setup_seeded();
    let engine = Arc::new(CommitEngine::new(&path));

    let handles: Vec<_> = (0..4)
        .map(|writer| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for seq in 0..5 {
                    engine
                        .commit(&timestamp(writer, seq), &payload(writer, seq))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let table = TableLoader::new(&path).load().unwrap();
    for writer in 0..4 {
        let seqs: Vec<_> = table
            .rows()
            .iter()
            .filter(|r| r.values()[0] == Some(Scalar::Int(writer)))
            .map(|r| r.values()[1].clone())
            .collect();
        let expected: Vec<_> = (0..5).map(|s| Some(Scalar::Int(s))).collect();
        assert_eq!(seqs, expected);
    }
}

/// Readers never observe a partial file while commits run.
#[test]
fn test_readers_see_whole_files() {
    let (_tmp, path) = setup_seeded();
    let engine = Arc::new(CommitEngine::new(&path));

    let writer = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || {
            for seq in 0..30 {
                engine.commit(&timestamp(1, seq), &payload(1, seq)).unwrap();
            }
        })
    };

    let reader = {
        let loader = TableLoader::new(&path);
        thread::spawn(move || {
            let mut last = 0;
            for _ in 0..200 {
                match loader.load() {
                    Ok(table) => {
                        assert_eq!(table.schema().columns(), ["writer", "seq"]);
                        assert!(table.row_count() >= last);
                        last = table.row_count();
                    }
                    Err(e) => assert_eq!(e.code(), TableErrorCode::EmptyTable),
                }
            }
        })
    };

    writer.join().unwrap();
    reader.join().unwrap();

    assert_eq!(TableLoader::new(&path).load().unwrap().row_count(), 30);
}

/// Failed commits between successful ones leave no trace.
#[test]
fn test_rejected_commits_do_not_interleave() {
    let (_tmp, path) = setup_seeded();
    let engine = CommitEngine::new(&path);

    engine.commit(&timestamp(0, 0), &payload(0, 0)).unwrap();

    let mut unknown = payload(0, 1);
    unknown.insert("mood".to_string(), Some(Scalar::Text("fine".into())));
    assert!(engine.commit(&timestamp(0, 1), &unknown).is_err());
    assert!(engine.commit("not a time", &payload(0, 1)).is_err());

    engine.commit(&timestamp(0, 2), &payload(0, 2)).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "datetime,writer,seq\n2020-05-01 00:00:00,0,0\n2020-05-01 00:02:00,0,2\n"
    );

    let leftovers: Vec<_> = fs::read_dir(path.parent().unwrap())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}
