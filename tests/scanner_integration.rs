//! End-to-end scans over fixture trees through the public API

mod common;

use common::{configuration, FixtureFile, FixtureTree, DAY, MIB};
use offloader::scanner::api::{ScanError, ScanEventType, ScanStatus, ScannerManager};
use offloader::scanner::MemoryEventSink;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_mount_scenario() {
    let tree = FixtureTree::new(&[
        FixtureFile::new("mnt/a.mp3", 2 * MIB, DAY * 40),
        FixtureFile::new("mnt/backup/b.mp3", 2 * MIB, DAY * 40),
        FixtureFile::new("mnt/c.mp3", 2 * MIB, DAY * 5),
    ]);
    let mnt = tree.path("mnt");
    let backup = tree.path("mnt/backup");
    let config = configuration(
        &[".mp3"],
        &[backup.as_path()],
        30,
        1_048_576,
        &[mnt.as_path()],
    );

    let manager = ScannerManager::create().await;
    let outcome = manager.start_scan(config).unwrap().wait().await;

    assert_eq!(outcome.status, ScanStatus::Completed);
    assert_eq!(outcome.counts, BTreeMap::from([(".mp3".to_string(), 1)]));
}

#[tokio::test]
async fn test_prefix_exclusion_also_hides_sibling_with_longer_name() {
    let tree = FixtureTree::new(&[
        FixtureFile::new("data/a.iso", 2 * MIB, DAY * 40),
        FixtureFile::new("data2/b.iso", 2 * MIB, DAY * 40),
        FixtureFile::new("other/c.iso", 2 * MIB, DAY * 40),
    ]);
    let data = tree.path("data");
    let config = configuration(&["iso"], &[data.as_path()], 30, 0, &[tree.root()]);

    let manager = ScannerManager::create().await;
    let outcome = manager.start_scan(config).unwrap().wait().await;

    assert_eq!(outcome.counts[".iso"], 1);
}

#[tokio::test]
async fn test_multiple_roots_and_extensions() {
    let first = FixtureTree::new(&[
        FixtureFile::new("a.mkv", 3 * MIB, DAY * 100),
        FixtureFile::new("nested/deeper/b.zip", 3 * MIB, DAY * 100),
    ]);
    let second = FixtureTree::new(&[
        FixtureFile::new("c.mkv", 3 * MIB, DAY * 100),
        FixtureFile::new("d.zip", MIB / 2, DAY * 100),
    ]);
    let config = configuration(
        &["mkv", "zip", "rar"],
        &[],
        30,
        MIB as u64,
        &[first.root(), second.root()],
    );

    let sink = Arc::new(MemoryEventSink::new());
    let manager = ScannerManager::with_sink(sink.clone()).await;
    let outcome = manager.start_scan(config).unwrap().wait().await;

    assert_eq!(outcome.status, ScanStatus::Completed);
    assert_eq!(
        outcome.counts,
        BTreeMap::from([
            (".mkv".to_string(), 2),
            (".rar".to_string(), 0),
            (".zip".to_string(), 1),
        ])
    );

    let roots_walked: Vec<String> = sink
        .events()
        .into_iter()
        .filter(|e| e.event_type == ScanEventType::RootStarted)
        .filter_map(|e| e.message)
        .collect();
    assert_eq!(
        roots_walked,
        vec![
            first.root().display().to_string(),
            second.root().display().to_string()
        ]
    );
}

#[tokio::test]
async fn test_size_boundary_is_exclusive() {
    let tree = FixtureTree::new(&[
        FixtureFile::new("exact.wav", 4096, DAY * 40),
        FixtureFile::new("bigger.wav", 4097, DAY * 40),
    ]);
    let config = configuration(&["wav"], &[], 30, 4096, &[tree.root()]);

    let manager = ScannerManager::create().await;
    let outcome = manager.start_scan(config).unwrap().wait().await;

    assert_eq!(outcome.counts[".wav"], 1);
}

#[tokio::test]
async fn test_unreadable_directory_is_skipped() {
    let tree = FixtureTree::new(&[
        FixtureFile::new("open/a.mp3", 2 * MIB, DAY * 40),
        FixtureFile::new("locked/b.mp3", 2 * MIB, DAY * 40),
    ]);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(tree.path("locked"), std::fs::Permissions::from_mode(0o000))
            .unwrap();
    }

    let config = configuration(&["mp3"], &[], 30, 0, &[tree.root()]);
    let manager = ScannerManager::create().await;
    let outcome = manager.start_scan(config).unwrap().wait().await;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(tree.path("locked"), std::fs::Permissions::from_mode(0o755))
            .unwrap();
    }

    assert_eq!(outcome.status, ScanStatus::Completed);
    // root may read the locked directory anyway
    assert!(outcome.counts[".mp3"] >= 1);
}

#[tokio::test]
async fn test_only_one_active_scan_per_manager() {
    let tree = FixtureTree::new(&[]);
    let manager = ScannerManager::create().await;
    let config = configuration(&["mp3"], &[], 30, 0, &[tree.root()]);

    let first = manager.start_scan(config.clone()).unwrap();
    match manager.start_scan(config.clone()) {
        // the first scan may already have finished on a fast machine
        Ok(second) => {
            assert!(first.status().is_terminal());
            second.wait().await;
        }
        Err(ScanError::ScanAlreadyActive { scan_id }) => assert_eq!(scan_id, first.id()),
    }
    first.wait().await;

    let again = manager.start_scan(config).unwrap();
    assert_eq!(again.wait().await.status, ScanStatus::Completed);
}

#[tokio::test]
async fn test_cancel_from_another_task() {
    let tree = FixtureTree::new(&[FixtureFile::new("a.mp3", 1024, DAY * 40)]);
    let manager = ScannerManager::create().await;
    let handle = manager
        .start_scan(configuration(&["mp3"], &[], 30, 0, &[tree.root()]))
        .unwrap();

    let canceller = handle.clone();
    tokio::spawn(async move {
        canceller.cancel();
    })
    .await
    .unwrap();

    let outcome = tokio::time::timeout(Duration::from_secs(10), handle.wait())
        .await
        .expect("scan stops after cancel");
    assert!(matches!(
        outcome.status,
        ScanStatus::Cancelled | ScanStatus::Completed
    ));
    if outcome.status == ScanStatus::Cancelled {
        assert!(outcome.counts[".mp3"] <= 1);
    }
}
