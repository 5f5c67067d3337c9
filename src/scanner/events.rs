//! Scan lifecycle events
//!
//! The manager reports lifecycle transitions to a [`ScanEventSink`]. The
//! default sink writes them to the log; tests capture them in memory.

use std::sync::Mutex;
use std::time::SystemTime;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScanEventType {
    Started,
    RootStarted,
    CancelRequested,
    Completed,
    Cancelled,
    Failed,
}

/// A single lifecycle event for one scan
#[derive(Clone, Debug)]
pub struct ScanEvent {
    pub event_type: ScanEventType,
    pub timestamp: SystemTime,
    pub scan_id: String,
    pub message: Option<String>,
}

impl ScanEvent {
    pub fn new(event_type: ScanEventType, scan_id: String) -> Self {
        Self {
            event_type,
            timestamp: SystemTime::now(),
            scan_id,
            message: None,
        }
    }

    pub fn with_message(event_type: ScanEventType, scan_id: String, message: String) -> Self {
        Self {
            event_type,
            timestamp: SystemTime::now(),
            scan_id,
            message: Some(message),
        }
    }
}

/// Receiver of scan lifecycle events
///
/// Called from the blocking worker thread, so implementations must not block
/// for long.
pub trait ScanEventSink: Send + Sync {
    fn record(&self, event: ScanEvent);

    fn flush(&self) {}
}

/// Sink that forwards events to the `log` facade
#[derive(Debug, Default)]
pub struct LogEventSink;

impl ScanEventSink for LogEventSink {
    fn record(&self, event: ScanEvent) {
        let detail = event.message.as_deref().unwrap_or("");
        match event.event_type {
            ScanEventType::Started => log::info!("Scan {} started {}", event.scan_id, detail),
            ScanEventType::RootStarted => {
                log::debug!("Scan {} walking {}", event.scan_id, detail)
            }
            ScanEventType::CancelRequested => {
                log::info!("Scan {} cancellation requested", event.scan_id)
            }
            ScanEventType::Completed => log::info!("Scan {} complete {}", event.scan_id, detail),
            ScanEventType::Cancelled => log::info!("Scan {} cancelled {}", event.scan_id, detail),
            ScanEventType::Failed => log::error!("Scan {} failed: {}", event.scan_id, detail),
        }
    }

    fn flush(&self) {
        log::logger().flush();
    }
}

/// Sink that keeps every event, for inspection in tests
#[derive(Debug, Default)]
pub struct MemoryEventSink {
    events: Mutex<Vec<ScanEvent>>,
}

impl MemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ScanEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn event_types(&self) -> Vec<ScanEventType> {
        self.events().into_iter().map(|e| e.event_type).collect()
    }
}

impl ScanEventSink for MemoryEventSink {
    fn record(&self, event: ScanEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}
