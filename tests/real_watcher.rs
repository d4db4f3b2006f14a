// tests/real_watcher.rs
//
// Drives the platform notification backend against a temp directory.
// Timing depends on the OS, so the deadlines here are generous.

#![cfg(target_os = "linux")]

use std::fs;
use std::time::Duration;

use tempfile::TempDir;

use livefire::errors::WatchSetupError;
use livefire::watch::{start_watching, StalkerOptions};
use livefire_test_utils::{assert_still_pending, init_tracing, with_timeout};

fn options() -> StalkerOptions {
    StalkerOptions {
        debounce: Duration::from_millis(200),
        event_buffer: 8,
    }
}

#[tokio::test]
async fn in_place_write_is_reported() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("body.html");
    fs::write(&target, "<p>one</p>").unwrap();

    let mut stream = start_watching(&[&target], options()).unwrap();
    fs::write(&target, "<p>two</p>").unwrap();

    let changed = with_timeout(stream.recv()).await.unwrap();
    assert_eq!(changed, target.canonicalize().unwrap());
}

#[tokio::test]
async fn atomic_replace_is_reported_once_and_then_tracked() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("body.html");
    fs::write(&target, "<p>one</p>").unwrap();
    let expected = target.canonicalize().unwrap();

    let mut stream = start_watching(&[&target], options()).unwrap();

    let tmp = dir.path().join(".body.html.tmp");
    fs::write(&tmp, "<p>two</p>").unwrap();
    fs::rename(&tmp, &target).unwrap();

    assert_eq!(with_timeout(stream.recv()).await.unwrap(), expected);
    assert_still_pending(stream.recv(), Duration::from_millis(500)).await;

    // The replacement file is watched too.
    fs::write(&target, "<p>three</p>").unwrap();
    assert_eq!(with_timeout(stream.recv()).await.unwrap(), expected);
}

#[tokio::test]
async fn other_files_in_the_directory_are_ignored() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("body.html");
    fs::write(&target, "").unwrap();

    let mut stream = start_watching(&[&target], options()).unwrap();
    fs::write(dir.path().join("notes.txt"), "scratch").unwrap();

    assert_still_pending(stream.recv(), Duration::from_millis(500)).await;
}

#[tokio::test]
async fn missing_target_fails_startup() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("later.css");

    let err = start_watching(&[&target], options()).unwrap_err();
    assert!(matches!(err, WatchSetupError::Register { .. }), "got {err:?}");
}
