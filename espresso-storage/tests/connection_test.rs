//! Storage connection tests: pragmas, migrations, reader routing.

use std::sync::Arc;
use std::thread;

use espresso_core::traits::CooccurrenceSource;
use espresso_core::types::{ArgumentTuple, Pattern};
use espresso_storage::connection::pragmas::verify_wal_mode;
use espresso_storage::migrations::{current_version, LATEST_VERSION};
use espresso_storage::{DatabaseManager, StorageEngine};
use tempfile::TempDir;

// ---- Pragmas & migrations ----

#[test]
fn test_file_database_uses_wal_and_latest_schema() {
    let dir = TempDir::new().unwrap();
    let db = DatabaseManager::open(&dir.path().join("boot.db"), 2).unwrap();

    db.with_writer(|conn| {
        assert!(verify_wal_mode(conn)?);
        assert_eq!(current_version(conn)?, LATEST_VERSION);
        let timeout: i64 = conn
            .pragma_query_value(None, "busy_timeout", |row| row.get(0))
            .unwrap();
        assert_eq!(timeout, 5000);
        Ok(())
    })
    .unwrap();
    assert_eq!(db.reader_count(), 2);
}

#[test]
fn test_reopen_keeps_schema_version() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("boot.db");
    drop(DatabaseManager::open(&path, 1).unwrap());
    let db = DatabaseManager::open(&path, 1).unwrap();
    let version = db.with_reader(current_version).unwrap();
    assert_eq!(version, LATEST_VERSION);
}

#[test]
fn test_in_memory_reads_go_through_writer() {
    let db = DatabaseManager::open_in_memory().unwrap();
    assert_eq!(db.reader_count(), 0);
    assert!(db.path().is_none());
    db.with_writer(|conn| {
        conn.execute_batch("CREATE TABLE scratch (x INTEGER); INSERT INTO scratch VALUES (7);")
            .unwrap();
        Ok(())
    })
    .unwrap();
    let x: i64 = db
        .with_reader(|conn| Ok(conn.query_row("SELECT x FROM scratch", [], |r| r.get(0)).unwrap()))
        .unwrap();
    assert_eq!(x, 7);
    db.checkpoint().unwrap();
}

// ---- Concurrent readers ----

#[test]
fn test_pooled_readers_see_committed_writes() {
    let dir = TempDir::new().unwrap();
    let engine = Arc::new(StorageEngine::open(&dir.path().join("boot.db"), "m", 4).unwrap());
    let pattern = Pattern::from("ARG1 acquired ARG2");
    let instance = ArgumentTuple::from(["Google", "YouTube"]);
    engine.insert_cooccurrence(&pattern, &instance, 5.0).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = Arc::clone(&engine);
            let pattern = pattern.clone();
            let instance = instance.clone();
            thread::spawn(move || engine.lookup(&pattern, &instance).unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), Some(5.0));
    }
}
