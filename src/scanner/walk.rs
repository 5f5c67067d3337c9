//! Filesystem traversal for a single scan
//!
//! Roots are visited in configuration order and, within each root, one full
//! walk is made per extension. The cancellation token is polled before each
//! root, before each extension pass and before each entry, so a cancelled
//! scan stops after at most one more directory entry. A [`WalkObserver`]
//! hears about each root and each examined file.

use crate::config::Configuration;
use crate::scanner::cancel::CancellationToken;
use crate::scanner::filter::FileFilter;
use crate::scanner::types::ScanStats;
use glob::{MatchOptions, Pattern};
use std::collections::BTreeMap;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

/// Result of a walk, before it is turned into a scan outcome
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkReport {
    pub counts: BTreeMap<String, u64>,
    pub stats: ScanStats,
    pub cancelled: bool,
}

/// Progress callbacks from a running walk
///
/// Any `FnMut(&Path)` closure observes root starts only.
pub trait WalkObserver {
    fn root_started(&mut self, _root: &Path) {}

    /// Called after a candidate file has been stat'ed and counted as examined
    fn file_examined(&mut self, _path: &Path) {}
}

impl<F: FnMut(&Path)> WalkObserver for F {
    fn root_started(&mut self, root: &Path) {
        self(root)
    }
}

pub struct Walker<'a> {
    config: &'a Configuration,
    filter: FileFilter<'a>,
    token: &'a CancellationToken,
    patterns: Vec<(String, Pattern)>,
    options: MatchOptions,
    counts: BTreeMap<String, u64>,
    stats: ScanStats,
}

impl<'a> Walker<'a> {
    pub fn new(config: &'a Configuration, token: &'a CancellationToken, now: SystemTime) -> Self {
        let patterns = config
            .extensions()
            .iter()
            .filter_map(|ext| match Pattern::new(&format!("*{}", ext)) {
                Ok(pattern) => Some((ext.clone(), pattern)),
                Err(e) => {
                    log::warn!("Skipping extension '{}': {}", ext, e);
                    None
                }
            })
            .collect();

        let counts = config
            .extensions()
            .iter()
            .map(|ext| (ext.clone(), 0))
            .collect();

        Self {
            config,
            filter: FileFilter::new(config, now),
            token,
            patterns,
            options: MatchOptions {
                case_sensitive: !cfg!(windows),
                ..MatchOptions::new()
            },
            counts,
            stats: ScanStats::default(),
        }
    }

    /// Walk every root, reporting progress to `observer`
    pub fn run(mut self, mut observer: impl WalkObserver) -> WalkReport {
        let started = std::time::Instant::now();
        let cancelled = self.walk_roots(&mut observer).is_break();
        self.stats.scan_duration = started.elapsed();

        WalkReport {
            counts: self.counts,
            stats: self.stats,
            cancelled,
        }
    }

    fn walk_roots(&mut self, observer: &mut impl WalkObserver) -> ControlFlow<()> {
        let config = self.config;
        for root in config.roots() {
            self.check_cancel()?;
            let root = absolute_root(root);
            observer.root_started(&root);

            for index in 0..self.patterns.len() {
                self.check_cancel()?;
                self.walk_extension(&root, index, observer)?;
            }
        }
        ControlFlow::Continue(())
    }

    fn walk_extension(
        &mut self,
        root: &Path,
        index: usize,
        observer: &mut impl WalkObserver,
    ) -> ControlFlow<()> {
        let filter = self.filter.clone();
        let entries = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| {
                !(entry.file_type().is_dir() && filter.is_excluded(entry.path()))
            });

        for entry in entries {
            self.check_cancel()?;

            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::trace!("Skipping unreadable entry: {}", e);
                    self.stats.entries_skipped += 1;
                    continue;
                }
            };
            if entry.file_type().is_dir() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if !self.patterns[index].1.matches_with(&name, self.options) {
                continue;
            }

            let Some((modified, size)) = self.examine(entry.path()) else {
                continue;
            };
            observer.file_examined(entry.path());

            if self.filter.qualifies(entry.path(), modified, size) {
                let extension = self.patterns[index].0.clone();
                *self.counts.entry(extension).or_insert(0) += 1;
                self.stats.files_matched += 1;
            }
        }
        ControlFlow::Continue(())
    }

    /// Stat a candidate; `None` for anything that is not a readable regular file
    fn examine(&mut self, path: &Path) -> Option<(SystemTime, u64)> {
        let metadata = match std::fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) => {
                log::trace!("Cannot stat {}: {}", path.display(), e);
                self.stats.entries_skipped += 1;
                return None;
            }
        };
        if !metadata.is_file() {
            return None;
        }
        let modified = match metadata.modified() {
            Ok(modified) => modified,
            Err(e) => {
                log::trace!("No modification time for {}: {}", path.display(), e);
                self.stats.entries_skipped += 1;
                return None;
            }
        };

        self.stats.files_examined += 1;
        Some((modified, metadata.len()))
    }

    fn check_cancel(&self) -> ControlFlow<()> {
        if self.token.is_cancelled() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}

fn absolute_root(root: &Path) -> PathBuf {
    match std::path::absolute(root) {
        Ok(path) => path,
        Err(e) => {
            log::debug!("Cannot make {} absolute: {}", root.display(), e);
            root.to_path_buf()
        }
    }
}
