//! Qualification filter for candidate files

use crate::config::Configuration;
use std::path::Path;
use std::time::{Duration, SystemTime};

const SECONDS_PER_DAY: u64 = 86_400;

/// Decides whether a file counts as old, large and outside exclusions.
///
/// The cutoff is fixed when the filter is built so every file in one scan is
/// judged against the same instant.
#[derive(Debug, Clone)]
pub struct FileFilter<'a> {
    config: &'a Configuration,
    cutoff: Option<SystemTime>,
}

impl<'a> FileFilter<'a> {
    pub fn new(config: &'a Configuration, now: SystemTime) -> Self {
        let age = Duration::from_secs(config.min_age_days().saturating_mul(SECONDS_PER_DAY));
        let cutoff = now.checked_sub(age);
        if cutoff.is_none() {
            log::warn!(
                "Minimum age of {} days reaches before the clock's origin; no file can qualify",
                config.min_age_days()
            );
        }
        Self { config, cutoff }
    }

    /// Last-modified times strictly before this instant qualify
    pub fn cutoff(&self) -> Option<SystemTime> {
        self.cutoff
    }

    /// Strictly older than the cutoff
    pub fn is_old_enough(&self, modified: SystemTime) -> bool {
        self.cutoff.is_some_and(|cutoff| modified < cutoff)
    }

    /// Strictly larger than the minimum size
    pub fn is_large_enough(&self, size: u64) -> bool {
        size > self.config.min_size_bytes()
    }

    pub fn is_excluded(&self, path: &Path) -> bool {
        self.config.is_excluded(&path.to_string_lossy())
    }

    /// All three conditions together
    pub fn qualifies(&self, path: &Path, modified: SystemTime, size: u64) -> bool {
        self.is_old_enough(modified) && self.is_large_enough(size) && !self.is_excluded(path)
    }
}
