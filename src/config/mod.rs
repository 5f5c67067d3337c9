//! Scan configuration
//!
//! An immutable snapshot of everything a scan needs: the extension set, the
//! excluded folder prefixes, the age and size thresholds and the roots to
//! walk. Free-text input from an editor flows through [`validate`] before it
//! becomes a [`Configuration`]; edits produce new values instead of mutating
//! one that a scan may be reading.

pub mod defaults;
pub mod store;

use crate::core::validation::{
    dedup_preserving_order, parse_non_negative, split_lines, validate_extension, ValidationError,
};
use defaults::{default_excluded_folders, default_roots, Profile};
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;

pub use store::{ConfigError, ConfigStore, TomlConfigStore};

/// Field names shared by validation errors, the TOML store and the CLI
pub const FIELD_EXTENSIONS: &str = "extensions";
pub const FIELD_EXCLUDED_FOLDERS: &str = "excluded-folders";
pub const FIELD_MIN_AGE_DAYS: &str = "min-age-days";
pub const FIELD_MIN_SIZE_BYTES: &str = "min-size-bytes";
pub const FIELD_ROOTS: &str = "roots";

/// Validated scan configuration
///
/// Only constructed through [`validate`], the profile defaults or the `with_*`
/// edits, so every value upholds the extension and de-duplication invariants.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Configuration {
    extensions: Vec<String>,
    excluded_folders: Vec<String>,
    min_age_days: u64,
    min_size_bytes: u64,
    roots: Vec<PathBuf>,
}

impl Configuration {
    /// Default configuration for a profile on the current platform
    pub fn for_profile(profile: Profile) -> Self {
        Self {
            extensions: profile.extensions(),
            excluded_folders: default_excluded_folders(),
            min_age_days: profile.min_age_days(),
            min_size_bytes: profile.min_size_bytes(),
            roots: default_roots(),
        }
    }

    /// Extensions in traversal order, lowercase and dot-prefixed
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Excluded path prefixes
    pub fn excluded_folders(&self) -> &[String] {
        &self.excluded_folders
    }

    pub fn min_age_days(&self) -> u64 {
        self.min_age_days
    }

    pub fn min_size_bytes(&self) -> u64 {
        self.min_size_bytes
    }

    /// Roots in traversal order
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Whether `path` falls under an excluded folder.
    ///
    /// Plain string-prefix test: an entry `/data` also excludes `/data2`.
    pub fn is_excluded(&self, path: &str) -> bool {
        self.excluded_folders
            .iter()
            .any(|folder| path.starts_with(folder.as_str()))
    }

    /// New configuration with one more extension; duplicates are a no-op
    pub fn with_extension_added(&self, token: &str) -> Result<Self, ValidationError> {
        let extension = validate_extension(token)?;
        let mut next = self.clone();
        if next.extensions.contains(&extension) {
            log::debug!("Extension '{}' already configured", extension);
        } else {
            next.extensions.push(extension);
        }
        Ok(next)
    }

    /// New configuration without the given extension
    pub fn with_extension_removed(&self, token: &str) -> Result<Self, ValidationError> {
        let extension = validate_extension(token)?;
        let mut next = self.clone();
        next.extensions.retain(|e| *e != extension);
        Ok(next)
    }

    /// New configuration with one more excluded folder
    pub fn with_folder_added(&self, folder: &str) -> Self {
        let folder = folder.trim();
        let mut next = self.clone();
        if !folder.is_empty() && !next.excluded_folders.iter().any(|f| f == folder) {
            next.excluded_folders.push(folder.to_string());
        }
        next
    }

    /// New configuration without the given excluded folder
    pub fn with_folder_removed(&self, folder: &str) -> Self {
        let folder = folder.trim();
        let mut next = self.clone();
        next.excluded_folders.retain(|f| f != folder);
        next
    }

    /// New configuration walking the given roots; empty means platform defaults
    pub fn with_roots(&self, roots: Vec<PathBuf>) -> Self {
        let mut next = self.clone();
        next.roots = if roots.is_empty() {
            default_roots()
        } else {
            roots
        };
        next
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::for_profile(Profile::default())
    }
}

impl PartialEq for Configuration {
    fn eq(&self, other: &Self) -> bool {
        fn as_set(items: &[String]) -> HashSet<&str> {
            items.iter().map(String::as_str).collect()
        }

        as_set(&self.extensions) == as_set(&other.extensions)
            && as_set(&self.excluded_folders) == as_set(&other.excluded_folders)
            && self.min_age_days == other.min_age_days
            && self.min_size_bytes == other.min_size_bytes
            && self.roots == other.roots
    }
}

impl Eq for Configuration {}

/// Unvalidated configuration text as an editor holds it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawConfiguration {
    /// One extension per line
    pub extensions: String,
    /// One folder prefix per line
    pub excluded_folders: String,
    pub min_age_days: String,
    pub min_size_bytes: String,
    /// One root per line; blank means platform defaults
    pub roots: String,
}

impl From<&Configuration> for RawConfiguration {
    fn from(config: &Configuration) -> Self {
        Self {
            extensions: config.extensions.join("\n"),
            excluded_folders: config.excluded_folders.join("\n"),
            min_age_days: config.min_age_days.to_string(),
            min_size_bytes: config.min_size_bytes.to_string(),
            roots: config
                .roots
                .iter()
                .map(|r| r.to_string_lossy().to_string())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// Turn raw editor text into a validated configuration
pub fn validate(raw: &RawConfiguration) -> Result<Configuration, ValidationError> {
    let extensions = split_lines(&raw.extensions)
        .iter()
        .map(|token| validate_extension(token))
        .collect::<Result<Vec<_>, _>>()?;
    let extensions = dedup_preserving_order(extensions, "extension");

    let excluded_folders =
        dedup_preserving_order(split_lines(&raw.excluded_folders), "excluded folder");
    for folder in &excluded_folders {
        if !std::path::Path::new(folder).is_absolute() {
            log::warn!(
                "Excluded folder '{}' is not absolute and will only match paths starting with it literally",
                folder
            );
        }
    }

    let min_age_days = parse_non_negative(FIELD_MIN_AGE_DAYS, &raw.min_age_days)?;
    let min_size_bytes = parse_non_negative(FIELD_MIN_SIZE_BYTES, &raw.min_size_bytes)?;

    let roots: Vec<PathBuf> = dedup_preserving_order(split_lines(&raw.roots), "root")
        .into_iter()
        .map(PathBuf::from)
        .collect();
    let roots = if roots.is_empty() {
        default_roots()
    } else {
        roots
    };

    Ok(Configuration {
        extensions,
        excluded_folders,
        min_age_days,
        min_size_bytes,
        roots,
    })
}
