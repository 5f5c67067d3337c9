//! Scanner Component
//!
//! Background search for old, large files. A [`ScannerManager`] starts at most
//! one scan at a time; each scan walks the configured roots on a blocking
//! worker, filters candidates by extension, age, size and excluded folders,
//! and delivers a single terminal [`ScanOutcome`] through its [`ScanHandle`].
//!
//! ## Core Features
//!
//! - **Cooperative cancellation**: polled before every root, extension pass and entry
//! - **Snapshot publication**: callers poll or await complete state, never partial counts
//! - **Crash containment**: a panicking worker ends the scan as `Failed`
//! - **Event sink**: lifecycle events go to an injected [`ScanEventSink`]

pub mod api;
pub mod cancel;
pub mod error;
pub mod events;
pub mod filter;
pub mod manager;
pub mod types;
pub mod walk;

#[cfg(test)]
mod tests;

pub use cancel::CancellationToken;
pub use error::{ScanError, ScanResult};
pub use events::{LogEventSink, MemoryEventSink, ScanEvent, ScanEventSink, ScanEventType};
pub use manager::{ScanHandle, ScannerManager};
pub use types::{ScanOutcome, ScanSnapshot, ScanStats, ScanStatus};
