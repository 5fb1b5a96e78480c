// Output-directory behavior: backup rotation, latest pointer, and the
// run-status ledger.

#![allow(clippy::unwrap_used)]

use std::fs;

use chrono::{TimeZone, Utc};
use netscribe_core::output::{OutputManager, read_status};
use netscribe_core::render::OutputFormat;
use tempfile::TempDir;

fn ts(minute: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, minute, 0).unwrap()
}

fn names(dir: &TempDir) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn first_commit_creates_document_and_pointer() {
    let dir = TempDir::new().unwrap();
    let output = OutputManager::new(dir.path()).unwrap();

    let path = output
        .commit("lab", b"# first", OutputFormat::Markdown, ts(0), 0)
        .unwrap();

    assert_eq!(path, dir.path().join("lab-20250301_120000.md"));
    assert_eq!(fs::read(&path).unwrap(), b"# first");
    // reading through the pointer follows the symlink
    assert_eq!(fs::read(dir.path().join("lab-latest.md")).unwrap(), b"# first");
    assert!(!names(&dir).iter().any(|n| n.contains("backup")));
}

#[test]
fn superseded_document_survives_as_single_backup() {
    let dir = TempDir::new().unwrap();
    let output = OutputManager::new(dir.path()).unwrap();

    output.commit("lab", b"gen one", OutputFormat::Markdown, ts(0), 0).unwrap();
    output.commit("lab", b"gen two", OutputFormat::Markdown, ts(1), 0).unwrap();

    assert_eq!(fs::read(dir.path().join("lab-latest.md")).unwrap(), b"gen two");
    let backup = dir.path().join("lab-backup-20250301_120100.md");
    assert_eq!(fs::read(&backup).unwrap(), b"gen one");

    // a third generation replaces the backup rather than accumulating
    output.commit("lab", b"gen three", OutputFormat::Markdown, ts(2), 0).unwrap();
    let backups: Vec<String> =
        names(&dir).into_iter().filter(|n| n.contains("backup")).collect();
    assert_eq!(backups, vec!["lab-backup-20250301_120200.md".to_string()]);
    assert_eq!(
        fs::read(dir.path().join(&backups[0])).unwrap(),
        b"gen two"
    );
    assert_eq!(fs::read(dir.path().join("lab-latest.md")).unwrap(), b"gen three");
}

#[test]
fn formats_rotate_independently() {
    let dir = TempDir::new().unwrap();
    let output = OutputManager::new(dir.path()).unwrap();

    output.commit("lab", b"{}", OutputFormat::Json, ts(0), 0).unwrap();
    output.commit("lab", b"# md", OutputFormat::Markdown, ts(0), 0).unwrap();
    output.commit("lab", b"{\"v\":2}", OutputFormat::Json, ts(1), 0).unwrap();

    assert_eq!(fs::read(dir.path().join("lab-latest.json")).unwrap(), b"{\"v\":2}");
    // markdown pointer untouched by the json rotation
    assert_eq!(fs::read(dir.path().join("lab-latest.md")).unwrap(), b"# md");
    assert!(dir.path().join("lab-backup-20250301_120100.json").exists());
}

#[test]
fn status_ledger_tracks_latest_outcome_per_controller() {
    let dir = TempDir::new().unwrap();
    let output = OutputManager::new(dir.path()).unwrap();

    output.commit("alpha", b"a", OutputFormat::Markdown, ts(0), 2).unwrap();
    output.record_failure("beta", ts(0), "authentication rejected").unwrap();

    let ledger = read_status(dir.path()).unwrap();
    assert_eq!(ledger.len(), 2);
    assert!(ledger["alpha"].success);
    assert_eq!(ledger["alpha"].file.as_deref(), Some("alpha-20250301_120000.md"));
    assert_eq!(ledger["alpha"].warnings, 2);
    assert!(!ledger["beta"].success);
    assert_eq!(ledger["beta"].error.as_deref(), Some("authentication rejected"));

    // a later success replaces beta's failure record
    output.commit("beta", b"b", OutputFormat::Markdown, ts(5), 0).unwrap();
    let ledger = read_status(dir.path()).unwrap();
    assert!(ledger["beta"].success);
    assert!(ledger["beta"].error.is_none());
}

#[test]
fn failure_record_leaves_documents_untouched() {
    let dir = TempDir::new().unwrap();
    let output = OutputManager::new(dir.path()).unwrap();

    output.commit("lab", b"stable", OutputFormat::Markdown, ts(0), 0).unwrap();
    output.record_failure("lab", ts(1), "connection refused").unwrap();

    assert_eq!(fs::read(dir.path().join("lab-latest.md")).unwrap(), b"stable");
    assert!(!read_status(dir.path()).unwrap()["lab"].success);
}
