//! Test helper functions for scanner unit tests
//!
//! These helpers are separate from integration test helpers in tests/common/
//! since unit tests and integration tests run in different contexts.

use crate::config::{validate, Configuration, RawConfiguration};
use crate::scanner::events::{MemoryEventSink, ScanEvent, ScanEventSink, ScanEventType};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::{Condvar, Mutex};
use std::time::{Duration, SystemTime};

pub const DAY: Duration = Duration::from_secs(86_400);
pub const MIB: usize = 1024 * 1024;

/// Create a file of `size` bytes whose modification time is `age` ago
pub fn write_aged_file(path: &Path, size: usize, age: Duration) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let mut file = File::create(path).unwrap();
    file.write_all(&vec![0u8; size]).unwrap();
    file.set_modified(SystemTime::now() - age).unwrap();
}

/// Validated configuration rooted at `root`
pub fn config_for(
    root: &Path,
    extensions: &str,
    excluded: &str,
    age: u64,
    size: u64,
) -> Configuration {
    validate(&RawConfiguration {
        extensions: extensions.to_string(),
        excluded_folders: excluded.to_string(),
        min_age_days: age.to_string(),
        min_size_bytes: size.to_string(),
        roots: root.to_string_lossy().to_string(),
    })
    .unwrap()
}

/// Sink that holds the worker on its `Started` event until released,
/// letting tests act while a scan is known to be running but has not
/// visited anything yet
#[derive(Default)]
pub struct GatedSink {
    open: Mutex<bool>,
    opened: Condvar,
    pub recorded: MemoryEventSink,
}

impl GatedSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn release(&self) {
        *self.open.lock().unwrap() = true;
        self.opened.notify_all();
    }
}

impl ScanEventSink for GatedSink {
    fn record(&self, event: ScanEvent) {
        if event.event_type == ScanEventType::Started {
            let mut open = self.open.lock().unwrap();
            while !*open {
                open = self.opened.wait(open).unwrap();
            }
        }
        self.recorded.record(event);
    }
}

/// Sink that panics when the walk reaches its first root
#[derive(Default)]
pub struct PanickingSink;

impl ScanEventSink for PanickingSink {
    fn record(&self, event: ScanEvent) {
        if event.event_type == ScanEventType::RootStarted {
            panic!("sink exploded on {}", event.message.unwrap_or_default());
        }
    }
}
