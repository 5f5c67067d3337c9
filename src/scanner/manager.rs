//! Scanner Manager
//!
//! Central coordination for background scans. A manager owns at most one live
//! scan; its worker runs on the blocking pool of the tokio runtime that created
//! the manager and publishes state through a watch channel, so callers only
//! ever observe complete snapshots.

use crate::config::Configuration;
use crate::scanner::cancel::CancellationToken;
use crate::scanner::error::{ScanError, ScanResult};
use crate::scanner::events::{LogEventSink, ScanEvent, ScanEventSink, ScanEventType};
use crate::scanner::types::{ScanOutcome, ScanSnapshot, ScanStats, ScanStatus};
use crate::scanner::walk::{WalkReport, Walker};
use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::SystemTime;
use tokio::runtime::Handle;
use tokio::sync::watch;

/// Caller-side reference to one scan
///
/// Cloning is cheap; every clone observes the same scan.
#[derive(Clone)]
pub struct ScanHandle {
    scan_id: String,
    token: CancellationToken,
    state: Arc<watch::Sender<ScanSnapshot>>,
    sink: Arc<dyn ScanEventSink>,
}

impl std::fmt::Debug for ScanHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanHandle")
            .field("scan_id", &self.scan_id)
            .field("status", &self.status())
            .finish()
    }
}

impl ScanHandle {
    pub fn id(&self) -> &str {
        &self.scan_id
    }

    pub fn status(&self) -> ScanStatus {
        self.state.borrow().status
    }

    pub fn snapshot(&self) -> ScanSnapshot {
        self.state.borrow().clone()
    }

    /// Terminal result if the worker has finished
    pub fn try_outcome(&self) -> Option<ScanOutcome> {
        self.state.borrow().outcome.clone()
    }

    /// Wait until the scan reaches a terminal state
    pub async fn wait(&self) -> ScanOutcome {
        let mut receiver = self.state.subscribe();
        let outcome = match receiver.wait_for(|snapshot| snapshot.status.is_terminal()).await {
            Ok(snapshot) => snapshot.outcome.clone(),
            // the handle owns the sender, so the channel cannot close under us
            Err(_) => return failed_outcome(&self.scan_id, "scan state channel closed"),
        };
        outcome.unwrap_or_else(|| failed_outcome(&self.scan_id, "terminal state without result"))
    }

    /// Request cancellation.
    ///
    /// Returns true if this call moved the scan from `Running` to
    /// `CancelRequested`. Calling it on a scan that is already cancelling or
    /// finished changes nothing.
    pub fn cancel(&self) -> bool {
        let requested = self.state.send_if_modified(|snapshot| {
            if snapshot.status == ScanStatus::Running {
                snapshot.status = ScanStatus::CancelRequested;
                true
            } else {
                false
            }
        });

        if requested {
            self.token.cancel();
            self.sink.record(ScanEvent::new(
                ScanEventType::CancelRequested,
                self.scan_id.clone(),
            ));
        }
        requested
    }
}

/// Owns the live scan and the capabilities its workers need
pub struct ScannerManager {
    runtime: Handle,
    sink: Arc<dyn ScanEventSink>,
    next_id: AtomicU64,
    current: Mutex<Option<ScanHandle>>,
}

impl ScannerManager {
    /// Create a manager that logs scan events through the `log` facade
    pub async fn create() -> Arc<Self> {
        Self::with_sink(Arc::new(LogEventSink)).await
    }

    /// Create a manager reporting scan events to `sink`
    pub async fn with_sink(sink: Arc<dyn ScanEventSink>) -> Arc<Self> {
        Arc::new(Self {
            runtime: Handle::current(),
            sink,
            next_id: AtomicU64::new(1),
            current: Mutex::new(None),
        })
    }

    /// Status of the most recent scan, `Idle` if none was started
    pub fn status(&self) -> ScanStatus {
        self.lock_current()
            .as_ref()
            .map_or(ScanStatus::Idle, ScanHandle::status)
    }

    /// Handle to the most recent scan
    pub fn current_scan(&self) -> Option<ScanHandle> {
        self.lock_current().clone()
    }

    /// Start a background scan of `config`.
    ///
    /// Fails with `ScanAlreadyActive` while the previous scan is running or
    /// still winding down after a cancel; nothing changes in that case.
    pub fn start_scan(&self, config: Configuration) -> ScanResult<ScanHandle> {
        let mut current = self.lock_current();
        if let Some(active) = current.as_ref().filter(|h| h.status().is_active()) {
            return Err(ScanError::ScanAlreadyActive {
                scan_id: active.id().to_string(),
            });
        }

        let scan_id = format!("scan-{}", self.next_id.fetch_add(1, Ordering::Relaxed));
        let (state, _) = watch::channel(ScanSnapshot {
            scan_id: scan_id.clone(),
            status: ScanStatus::Running,
            outcome: None,
        });
        let handle = ScanHandle {
            scan_id,
            token: CancellationToken::new(),
            state: Arc::new(state),
            sink: Arc::clone(&self.sink),
        };
        *current = Some(handle.clone());
        drop(current);

        let worker = handle.clone();
        self.runtime
            .spawn_blocking(move || run_worker(worker, config));

        Ok(handle)
    }

    /// Cancel the current scan if it is active, wait for it, then start anew
    pub async fn restart_scan(&self, config: Configuration) -> ScanResult<ScanHandle> {
        if let Some(previous) = self.current_scan() {
            if previous.status().is_active() {
                log::debug!("Restarting: cancelling {}", previous.id());
                previous.cancel();
                previous.wait().await;
            }
        }
        self.start_scan(config)
    }

    /// Request cancellation of `handle`; see [`ScanHandle::cancel`]
    pub fn cancel(&self, handle: &ScanHandle) -> bool {
        handle.cancel()
    }

    fn lock_current(&self) -> MutexGuard<'_, Option<ScanHandle>> {
        // a poisoned slot still holds a valid handle
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Worker body: walk, then publish exactly one terminal snapshot
fn run_worker(handle: ScanHandle, config: Configuration) {
    let scan_id = handle.scan_id.clone();
    let sink = Arc::clone(&handle.sink);

    let walked = catch_unwind(AssertUnwindSafe(|| {
        sink.record(ScanEvent::with_message(
            ScanEventType::Started,
            scan_id.clone(),
            format!(
                "({} roots, {} extensions)",
                config.roots().len(),
                config.extensions().len()
            ),
        ));
        Walker::new(&config, &handle.token, SystemTime::now()).run(|root: &Path| {
            sink.record(ScanEvent::with_message(
                ScanEventType::RootStarted,
                scan_id.clone(),
                root.display().to_string(),
            ))
        })
    }));

    let outcome = match walked {
        Ok(report) => finished_outcome(&scan_id, report),
        Err(payload) => failed_outcome(&scan_id, &panic_message(payload.as_ref())),
    };

    let event = match outcome.status {
        ScanStatus::Completed => ScanEvent::with_message(
            ScanEventType::Completed,
            scan_id.clone(),
            format!("({} qualifying files)", outcome.total_matches()),
        ),
        ScanStatus::Cancelled => ScanEvent::with_message(
            ScanEventType::Cancelled,
            scan_id.clone(),
            format!("({} qualifying files before stop)", outcome.total_matches()),
        ),
        _ => ScanEvent::with_message(
            ScanEventType::Failed,
            scan_id.clone(),
            outcome.failure.clone().unwrap_or_default(),
        ),
    };
    if catch_unwind(AssertUnwindSafe(|| {
        sink.record(event);
        sink.flush();
    }))
    .is_err()
    {
        log::warn!("Event sink panicked while recording the end of {}", scan_id);
    }

    handle.state.send_replace(ScanSnapshot {
        scan_id,
        status: outcome.status,
        outcome: Some(outcome),
    });
}

fn finished_outcome(scan_id: &str, report: WalkReport) -> ScanOutcome {
    ScanOutcome {
        scan_id: scan_id.to_string(),
        status: if report.cancelled {
            ScanStatus::Cancelled
        } else {
            ScanStatus::Completed
        },
        counts: report.counts,
        stats: report.stats,
        failure: None,
    }
}

fn failed_outcome(scan_id: &str, message: &str) -> ScanOutcome {
    ScanOutcome {
        scan_id: scan_id.to_string(),
        status: ScanStatus::Failed,
        counts: BTreeMap::new(),
        stats: ScanStats::default(),
        failure: Some(message.to_string()),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "scan worker panicked".to_string()
    }
}
