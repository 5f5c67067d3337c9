//! Validation utilities for free-text configuration input
//!
//! Provides the token-level checks used when turning editor/CLI text into a
//! typed configuration: line splitting, extension normalisation and
//! non-negative integer parsing.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Accepted shape of a normalised extension token
static EXTENSION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\.[A-Za-z0-9]{1,10}$").expect("extension pattern is a valid regex")
});

/// Largest threshold accepted; the TOML store keeps integers as signed 64-bit
pub const MAX_THRESHOLD: u64 = i64::MAX as u64;

/// Configuration validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Extension token is malformed
    #[error("Invalid extension '{token}': {reason}")]
    InvalidExtension { token: String, reason: String },

    /// Numeric field is not a non-negative integer within range
    #[error("Invalid number: {reason}")]
    InvalidNumber {
        field: String,
        value: String,
        reason: String,
    },
}

impl crate::core::error_handling::ContextualError for ValidationError {
    fn is_user_actionable(&self) -> bool {
        true
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ValidationError::InvalidExtension { reason, .. } => Some(reason.as_str()),
            ValidationError::InvalidNumber { reason, .. } => Some(reason.as_str()),
        }
    }
}

/// Split free text on line breaks, trimming each line and dropping blanks
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalise and validate a single extension token.
///
/// The token is trimmed, lowercased and given a leading dot if missing. Tokens
/// with internal whitespace or that do not match `.` followed by 1-10 ASCII
/// alphanumerics are rejected.
pub fn validate_extension(token: &str) -> Result<String, ValidationError> {
    let trimmed = token.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::InvalidExtension {
            token: token.to_string(),
            reason: "Extension cannot be empty".to_string(),
        });
    }

    if trimmed.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidExtension {
            token: token.to_string(),
            reason: format!("Extension '{}' contains whitespace", trimmed),
        });
    }

    let lowered = trimmed.to_lowercase();
    let normalised = if lowered.starts_with('.') {
        lowered
    } else {
        format!(".{}", lowered)
    };

    if !EXTENSION_PATTERN.is_match(&normalised) {
        return Err(ValidationError::InvalidExtension {
            token: token.to_string(),
            reason: format!(
                "Extension '{}' must be a dot followed by 1 to 10 letters or digits",
                trimmed
            ),
        });
    }

    Ok(normalised)
}

/// Parse a non-negative integer field, trimming surrounding whitespace.
///
/// Values above [`MAX_THRESHOLD`] are rejected rather than truncated.
pub fn parse_non_negative(field: &str, value: &str) -> Result<u64, ValidationError> {
    let invalid = |reason: String| ValidationError::InvalidNumber {
        field: field.to_string(),
        value: value.to_string(),
        reason,
    };

    let parsed = value.trim().parse::<u64>().map_err(|_| {
        invalid(format!(
            "{} must be a whole non-negative number (got '{}')",
            field,
            value.trim()
        ))
    })?;

    if parsed > MAX_THRESHOLD {
        return Err(invalid(format!(
            "{} must not exceed {} (got {})",
            field, MAX_THRESHOLD, parsed
        )));
    }
    Ok(parsed)
}

/// Keep the first occurrence of each entry, preserving order
pub fn dedup_preserving_order(items: Vec<String>, what: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut result = Vec::with_capacity(items.len());
    for item in items {
        if seen.insert(item.clone()) {
            result.push(item);
        } else {
            log::debug!("Ignoring duplicate {} '{}'", what, item);
        }
    }
    result
}
