//! Common test utilities and helpers
//!
//! Fixture trees with controlled sizes and modification times, and
//! configuration builders pointing at them.

#![allow(dead_code)]

use offloader::config::{validate, Configuration, RawConfiguration};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

pub const DAY: Duration = Duration::from_secs(86_400);
pub const MIB: usize = 1024 * 1024;

/// A file to create inside a fixture tree
pub struct FixtureFile {
    pub relative: &'static str,
    pub size: usize,
    pub age: Duration,
}

impl FixtureFile {
    pub const fn new(relative: &'static str, size: usize, age: Duration) -> Self {
        Self {
            relative,
            size,
            age,
        }
    }
}

/// Temporary directory populated with fixture files
pub struct FixtureTree {
    dir: TempDir,
}

impl FixtureTree {
    pub fn new(files: &[FixtureFile]) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        for file in files {
            write_aged_file(&dir.path().join(file.relative), file.size, file.age);
        }
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }
}

/// Create a file of `size` bytes last modified `age` ago
pub fn write_aged_file(path: &Path, size: usize, age: Duration) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dirs");
    }
    let mut file = File::create(path).expect("create fixture file");
    file.write_all(&vec![0u8; size]).expect("write fixture file");
    file.set_modified(SystemTime::now() - age)
        .expect("set modification time");
}

/// Validated configuration from plain field values
pub fn configuration(
    extensions: &[&str],
    excluded: &[&Path],
    min_age_days: u64,
    min_size_bytes: u64,
    roots: &[&Path],
) -> Configuration {
    let lines = |paths: &[&Path]| {
        paths
            .iter()
            .map(|p| p.to_string_lossy().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    };
    validate(&RawConfiguration {
        extensions: extensions.join("\n"),
        excluded_folders: lines(excluded),
        min_age_days: min_age_days.to_string(),
        min_size_bytes: min_size_bytes.to_string(),
        roots: lines(roots),
    })
    .expect("valid fixture configuration")
}
