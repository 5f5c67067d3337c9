//! Generic error handling utilities
//!
//! Lets the command layer report configuration, validation and scan errors
//! through one path while each module keeps its own error enum.

/// Trait for errors that can distinguish between user-actionable and system errors
///
/// When `is_user_actionable()` returns `true`, `user_message()` must return
/// `Some(message)` with something the user can act on; otherwise it returns
/// `None` and the caller falls back to the operation context.
pub trait ContextualError: std::error::Error {
    /// True for mistakes the user can fix: a malformed extension, a
    /// non-numeric threshold, starting a scan while another runs.
    /// False for environment failures such as an unreadable config file.
    fn is_user_actionable(&self) -> bool;

    /// The message to show when the error is user-actionable
    fn user_message(&self) -> Option<&str>;
}

/// Log an error at the detail level its kind deserves
///
/// User-actionable errors print their own message; system errors print the
/// operation context. The full error is always available at debug level.
pub fn log_error_with_context<E: ContextualError + std::fmt::Display + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    match error.user_message() {
        Some(user_msg) if error.is_user_actionable() => {
            log::error!("{}: {}", operation_context, user_msg);
        }
        _ => log::error!("{} failed", operation_context),
    }
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}

/// Text for the primary error line, matching what [`log_error_with_context`] logs
pub fn headline<E: ContextualError>(error: &E, operation_context: &str) -> String {
    match error.user_message() {
        Some(user_msg) if error.is_user_actionable() => {
            format!("{}: {}", operation_context, user_msg)
        }
        _ => format!("{} failed", operation_context),
    }
}
