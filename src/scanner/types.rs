//! Scanner Types and Enums
//!
//! Shared types used throughout the scanner module.

use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use strum_macros::Display;

/// Lifecycle state of a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ScanStatus {
    /// No scan has been started on the manager
    Idle,
    Running,
    /// Cancellation was requested and the worker has not stopped yet
    CancelRequested,
    Completed,
    Cancelled,
    /// The worker died unexpectedly
    Failed,
}

impl ScanStatus {
    /// Whether the status is final for a scan
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ScanStatus::Completed | ScanStatus::Cancelled | ScanStatus::Failed
        )
    }

    /// Whether a worker may still be walking
    pub fn is_active(self) -> bool {
        matches!(self, ScanStatus::Running | ScanStatus::CancelRequested)
    }
}

/// Scan statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    /// Files whose name matched a configured extension and were stat'ed
    pub files_examined: u64,
    /// Files that passed every filter
    pub files_matched: u64,
    /// Entries that could not be read and were skipped
    pub entries_skipped: u64,
    pub scan_duration: Duration,
}

/// Terminal result of a scan, delivered once through the handle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanOutcome {
    pub scan_id: String,
    pub status: ScanStatus,
    /// Qualifying file count per configured extension
    pub counts: BTreeMap<String, u64>,
    pub stats: ScanStats,
    /// Panic message when the worker failed
    pub failure: Option<String>,
}

impl ScanOutcome {
    /// Total qualifying files across all extensions
    pub fn total_matches(&self) -> u64 {
        self.counts.values().sum()
    }
}

/// Point-in-time view of a scan as published by its worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSnapshot {
    pub scan_id: String,
    pub status: ScanStatus,
    /// Present once the status is terminal
    pub outcome: Option<ScanOutcome>,
}
