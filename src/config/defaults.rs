//! Platform and profile defaults
//!
//! Supplies the default roots, excluded folders and threshold profiles. The
//! scan engine only ever sees these as configuration input.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use strum_macros::{Display, EnumIter, EnumString};

const MIB: u64 = 1024 * 1024;

/// Named default threshold and extension sets
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Media and archive formats above 50 MiB
    #[default]
    Standard,
    /// Common audio/video formats above 1 MiB
    Lightweight,
}

impl Profile {
    /// Default extension set, already normalised
    pub fn extensions(self) -> Vec<String> {
        let list: &[&str] = match self {
            Profile::Standard => &[
                ".mp3", ".wav", ".flac", ".mp4", ".mkv", ".avi", ".mov", ".iso", ".zip", ".7z",
                ".rar",
            ],
            Profile::Lightweight => &[".mp3", ".wav", ".mp4"],
        };
        list.iter().map(|e| e.to_string()).collect()
    }

    /// Minimum size in bytes a file must exceed
    pub fn min_size_bytes(self) -> u64 {
        match self {
            Profile::Standard => 50 * MIB,
            Profile::Lightweight => MIB,
        }
    }

    /// Minimum age in days a file must exceed
    pub fn min_age_days(self) -> u64 {
        30
    }
}

/// Roots to traverse when none are configured
#[cfg(windows)]
pub fn default_roots() -> Vec<PathBuf> {
    let roots: Vec<PathBuf> = (b'A'..=b'Z')
        .map(|letter| PathBuf::from(format!("{}:\\", letter as char)))
        .filter(|path| path.exists())
        .collect();

    if roots.is_empty() {
        vec![PathBuf::from("C:\\")]
    } else {
        roots
    }
}

/// Roots to traverse when none are configured
#[cfg(not(windows))]
pub fn default_roots() -> Vec<PathBuf> {
    vec![PathBuf::from("/")]
}

/// System locations that never hold user data worth offloading
#[cfg(windows)]
pub fn default_excluded_folders() -> Vec<String> {
    [
        "C:\\Windows",
        "C:\\Program Files",
        "C:\\Program Files (x86)",
        "C:\\ProgramData",
        "C:\\$Recycle.Bin",
        "C:\\System Volume Information",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// System locations that never hold user data worth offloading
#[cfg(target_os = "macos")]
pub fn default_excluded_folders() -> Vec<String> {
    [
        "/System",
        "/Library",
        "/Applications",
        "/private",
        "/usr",
        "/bin",
        "/sbin",
        "/dev",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// System locations that never hold user data worth offloading
#[cfg(all(not(windows), not(target_os = "macos")))]
pub fn default_excluded_folders() -> Vec<String> {
    [
        "/proc", "/sys", "/dev", "/run", "/boot", "/usr", "/bin", "/sbin", "/lib", "/etc",
        "/snap", "/var/lib",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
