//! Scanner Error Types

use thiserror::Error;

/// Scanner error types
///
/// Filesystem problems met during a walk are never surfaced here; they are
/// skipped and only show up as missing matches. What remains are caller
/// precondition violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// Another scan is still running or winding down on this manager
    #[error("Scan {scan_id} is still active; cancel it or wait for it to finish")]
    ScanAlreadyActive { scan_id: String },
}

impl crate::core::error_handling::ContextualError for ScanError {
    fn is_user_actionable(&self) -> bool {
        match self {
            ScanError::ScanAlreadyActive { .. } => true,
        }
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ScanError::ScanAlreadyActive { .. } => {
                Some("A scan is already in progress; cancel it before starting another")
            }
        }
    }
}

pub type ScanResult<T> = Result<T, ScanError>;
