//! One-shot subcommands against a temporary store.

use fake_sms::{Number, RecordStore};
use fake_sms_cli::commands;

fn seeded_store(dir: &std::path::Path, numbers: &[&str]) -> RecordStore {
    let store = RecordStore::open(dir).unwrap();
    for n in numbers {
        store
            .append(Number::new("USA", *n, "2026-10-19 10:00:00 Monday"))
            .unwrap();
    }
    store
}

fn registered(store: &RecordStore) -> Vec<String> {
    store.list().unwrap().into_iter().map(|n| n.number).collect()
}

#[test]
fn test_remove_targets_number_after_store_changed() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_store(dir.path(), &["+1", "+2", "+3"]);

    // The operator saw "+2" in a listing; another invocation then drops "+1".
    RecordStore::open(dir.path()).unwrap().remove_number("+1").unwrap();
    commands::remove(&store, "+2").unwrap();

    assert_eq!(registered(&store), vec!["+3"]);
}

#[test]
fn test_remove_unknown_number_fails_and_keeps_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_store(dir.path(), &["+1"]);

    let err = commands::remove(&store, "+9").unwrap_err();

    assert!(format!("{err:#}").contains("+9"));
    assert_eq!(registered(&store), vec!["+1"]);
}
