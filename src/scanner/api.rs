//! Scanner API
//!
//! Public surface of the scanner system, consolidating the exports callers
//! outside the module need.

// Scan management
pub use crate::scanner::manager::{ScanHandle, ScannerManager};

// Error handling
pub use crate::scanner::error::{ScanError, ScanResult};

// Lifecycle events
pub use crate::scanner::events::{LogEventSink, ScanEvent, ScanEventSink, ScanEventType};

// Core data types
pub use crate::scanner::types::{ScanOutcome, ScanSnapshot, ScanStats, ScanStatus};
