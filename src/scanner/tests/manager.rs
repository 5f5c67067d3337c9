//! Tests for ScannerManager
//!
//! Lifecycle of a scan through the manager: start, completion, cancellation,
//! the single-active-scan rule, restarts and worker crash containment.

use crate::scanner::error::ScanError;
use crate::scanner::events::{MemoryEventSink, ScanEventType};
use crate::scanner::manager::ScannerManager;
use crate::scanner::tests::helpers::{
    config_for, write_aged_file, GatedSink, PanickingSink, DAY, MIB,
};
use crate::scanner::types::ScanStatus;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

#[tokio::test]
async fn test_scanner_manager_creation() {
    let manager = ScannerManager::create().await;

    assert_eq!(manager.status(), ScanStatus::Idle);
    assert!(manager.current_scan().is_none());
}

#[tokio::test]
async fn test_scan_finds_old_large_files_outside_exclusions() {
    let dir = TempDir::new().unwrap();
    let mnt = dir.path().join("mnt");
    write_aged_file(&mnt.join("a.mp3"), 2 * MIB, DAY * 40);
    write_aged_file(&mnt.join("backup/b.mp3"), 2 * MIB, DAY * 40);
    write_aged_file(&mnt.join("c.mp3"), 2 * MIB, DAY * 5);

    let excluded = mnt.join("backup").to_string_lossy().to_string();
    let config = config_for(&mnt, "mp3", &excluded, 30, 1_048_576);

    let manager = ScannerManager::create().await;
    let handle = manager.start_scan(config).unwrap();
    let outcome = handle.wait().await;

    assert_eq!(outcome.status, ScanStatus::Completed);
    assert_eq!(outcome.counts, BTreeMap::from([(".mp3".to_string(), 1)]));
    assert_eq!(outcome.scan_id, handle.id());
    assert!(outcome.failure.is_none());
    assert_eq!(handle.status(), ScanStatus::Completed);
    assert_eq!(manager.status(), ScanStatus::Completed);
}

#[tokio::test]
async fn test_empty_extension_set_completes_without_visiting() {
    let dir = TempDir::new().unwrap();
    write_aged_file(&dir.path().join("a.mp3"), 2 * MIB, DAY * 40);

    let manager = ScannerManager::create().await;
    let handle = manager
        .start_scan(config_for(dir.path(), "", "", 30, 0))
        .unwrap();
    let outcome = handle.wait().await;

    assert_eq!(outcome.status, ScanStatus::Completed);
    assert!(outcome.counts.is_empty());
    assert_eq!(outcome.stats.files_examined, 0);
}

#[tokio::test]
async fn test_second_start_rejected_while_active() {
    let dir = TempDir::new().unwrap();
    let sink = Arc::new(GatedSink::new());
    let manager = ScannerManager::with_sink(sink.clone()).await;
    let config = config_for(dir.path(), "mp3", "", 30, 0);

    let first = manager.start_scan(config.clone()).unwrap();
    assert_eq!(first.status(), ScanStatus::Running);
    assert!(first.try_outcome().is_none());

    match manager.start_scan(config.clone()) {
        Err(ScanError::ScanAlreadyActive { scan_id }) => assert_eq!(scan_id, first.id()),
        other => panic!("Expected ScanAlreadyActive, got {:?}", other),
    }

    // still rejected while the cancel is being honoured
    first.cancel();
    assert_eq!(first.status(), ScanStatus::CancelRequested);
    assert!(manager.start_scan(config.clone()).is_err());

    sink.release();
    first.wait().await;

    let second = manager.start_scan(config).unwrap();
    assert_ne!(second.id(), first.id());
    assert_eq!(second.wait().await.status, ScanStatus::Completed);
}

#[tokio::test]
async fn test_cancel_before_any_visit_yields_zero_counts() {
    let dir = TempDir::new().unwrap();
    write_aged_file(&dir.path().join("a.mp3"), 2 * MIB, DAY * 40);
    write_aged_file(&dir.path().join("b.wav"), 2 * MIB, DAY * 40);

    let sink = Arc::new(GatedSink::new());
    let manager = ScannerManager::with_sink(sink.clone()).await;
    let handle = manager
        .start_scan(config_for(dir.path(), "mp3\nwav", "", 30, 0))
        .unwrap();

    assert!(manager.cancel(&handle));
    assert!(!handle.cancel());
    sink.release();

    let outcome = handle.wait().await;
    assert_eq!(outcome.status, ScanStatus::Cancelled);
    assert_eq!(
        outcome.counts,
        BTreeMap::from([(".mp3".to_string(), 0), (".wav".to_string(), 0)])
    );
    assert_eq!(outcome.stats.files_examined, 0);

    let events = sink.recorded.event_types();
    assert_eq!(
        events,
        vec![
            ScanEventType::CancelRequested,
            ScanEventType::Started,
            ScanEventType::Cancelled
        ]
    );
}

#[tokio::test]
async fn test_cancel_after_terminal_is_noop() {
    let dir = TempDir::new().unwrap();
    write_aged_file(&dir.path().join("a.mp3"), 2 * MIB, DAY * 40);

    let manager = ScannerManager::create().await;
    let handle = manager
        .start_scan(config_for(dir.path(), "mp3", "", 30, 0))
        .unwrap();
    let delivered = handle.wait().await;

    assert!(!handle.cancel());
    assert!(!manager.cancel(&handle));
    assert_eq!(handle.status(), ScanStatus::Completed);
    assert_eq!(handle.try_outcome(), Some(delivered.clone()));
    assert_eq!(handle.wait().await, delivered);
}

#[tokio::test]
async fn test_restart_replaces_active_scan() {
    let dir = TempDir::new().unwrap();
    write_aged_file(&dir.path().join("a.mp3"), 2 * MIB, DAY * 40);

    let sink = Arc::new(GatedSink::new());
    let manager = ScannerManager::with_sink(sink.clone()).await;
    let config = config_for(dir.path(), "mp3", "", 30, 0);
    let first = manager.start_scan(config.clone()).unwrap();

    let (restarted, _) = tokio::join!(manager.restart_scan(config), async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        sink.release();
    });
    let second = restarted.unwrap();

    assert_eq!(first.wait().await.status, ScanStatus::Cancelled);
    assert_ne!(second.id(), first.id());
    let outcome = second.wait().await;
    assert_eq!(outcome.status, ScanStatus::Completed);
    assert_eq!(outcome.counts[".mp3"], 1);
}

#[tokio::test]
async fn test_restart_without_active_scan_just_starts() {
    let dir = TempDir::new().unwrap();
    let manager = ScannerManager::create().await;

    let handle = manager
        .restart_scan(config_for(dir.path(), "mp3", "", 30, 0))
        .await
        .unwrap();
    assert_eq!(handle.wait().await.status, ScanStatus::Completed);
}

#[tokio::test]
async fn test_worker_panic_reported_as_failed() {
    let dir = TempDir::new().unwrap();
    let manager = ScannerManager::with_sink(Arc::new(PanickingSink)).await;
    let config = config_for(dir.path(), "mp3", "", 30, 0);

    let handle = manager.start_scan(config.clone()).unwrap();
    let outcome = handle.wait().await;

    assert_eq!(outcome.status, ScanStatus::Failed);
    let failure = outcome.failure.unwrap();
    assert!(failure.contains("sink exploded"), "got {}", failure);
    assert_eq!(handle.status(), ScanStatus::Failed);

    // a failed scan does not block the next one
    assert!(manager.start_scan(config).is_ok());
}

#[tokio::test]
async fn test_events_recorded_for_completed_scan() {
    let dir = TempDir::new().unwrap();
    let sink = Arc::new(MemoryEventSink::new());
    let manager = ScannerManager::with_sink(sink.clone()).await;

    let handle = manager
        .start_scan(config_for(dir.path(), "mp3", "", 30, 0))
        .unwrap();
    handle.wait().await;

    let events = sink.events();
    assert_eq!(
        events.iter().map(|e| e.event_type.clone()).collect::<Vec<_>>(),
        vec![
            ScanEventType::Started,
            ScanEventType::RootStarted,
            ScanEventType::Completed
        ]
    );
    assert!(events.iter().all(|e| e.scan_id == handle.id()));
}

#[tokio::test]
async fn test_snapshot_tracks_terminal_state() {
    let dir = TempDir::new().unwrap();
    let manager = ScannerManager::create().await;
    let handle = manager
        .start_scan(config_for(dir.path(), "mp3", "", 30, 0))
        .unwrap();
    handle.wait().await;

    let snapshot = handle.snapshot();
    assert_eq!(snapshot.scan_id, handle.id());
    assert_eq!(snapshot.status, ScanStatus::Completed);
    assert_eq!(
        snapshot.outcome.map(|o| o.status),
        Some(ScanStatus::Completed)
    );
}

#[tokio::test]
async fn test_wait_from_several_clones_sees_one_outcome() {
    let dir = TempDir::new().unwrap();
    write_aged_file(&dir.path().join("a.mp3"), 2 * MIB, DAY * 40);
    let config = config_for(dir.path(), "mp3", "", 30, 0);

    let manager = ScannerManager::create().await;
    let handle = manager.start_scan(config).unwrap();
    let other = handle.clone();

    let (first, second) = tokio::join!(handle.wait(), other.wait());
    let after = handle.wait().await;

    assert_eq!(first, second);
    assert_eq!(first, after);
    assert_eq!(handle.try_outcome(), Some(after));
}
