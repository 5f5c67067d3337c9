//! Turning command line values into configurations
//!
//! Everything typed on the command line goes through the same validation as
//! an edited configuration file: values are rendered back into a
//! [`RawConfiguration`], overridden field by field and validated as a whole.

use super::args::{ScanArgs, SetArgs};
use crate::config::{
    validate, ConfigError, ConfigStore, Configuration, RawConfiguration, TomlConfigStore,
};
use crate::core::validation::ValidationError;
use std::path::PathBuf;

/// Field-level replacements applied on top of a base configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub extensions: Option<Vec<String>>,
    pub excluded_folders: Option<Vec<String>>,
    pub extra_excluded_folders: Vec<String>,
    pub min_age_days: Option<String>,
    pub min_size_bytes: Option<String>,
    pub roots: Option<Vec<PathBuf>>,
}

fn non_empty<T>(items: &[T]) -> Option<Vec<T>>
where
    T: Clone,
{
    (!items.is_empty()).then(|| items.to_vec())
}

impl From<&ScanArgs> for Overrides {
    fn from(args: &ScanArgs) -> Self {
        Self {
            extensions: non_empty(&args.extensions),
            excluded_folders: None,
            extra_excluded_folders: args.exclude.clone(),
            min_age_days: args.min_age_days.clone(),
            min_size_bytes: args.min_size_bytes.clone(),
            roots: non_empty(&args.roots),
        }
    }
}

impl From<&SetArgs> for Overrides {
    fn from(args: &SetArgs) -> Self {
        Self {
            extensions: non_empty(&args.extensions),
            excluded_folders: non_empty(&args.excluded_folders),
            extra_excluded_folders: Vec::new(),
            min_age_days: args.min_age_days.clone(),
            min_size_bytes: args.min_size_bytes.clone(),
            roots: non_empty(&args.roots),
        }
    }
}

impl Overrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Validate `base` with these overrides applied
    pub fn apply(&self, base: &Configuration) -> Result<Configuration, ValidationError> {
        let mut raw = RawConfiguration::from(base);

        if let Some(extensions) = &self.extensions {
            raw.extensions = extensions.join("\n");
        }
        if let Some(folders) = &self.excluded_folders {
            raw.excluded_folders = folders.join("\n");
        }
        for folder in &self.extra_excluded_folders {
            raw.excluded_folders.push('\n');
            raw.excluded_folders.push_str(folder);
        }
        if let Some(days) = &self.min_age_days {
            raw.min_age_days = days.clone();
        }
        if let Some(bytes) = &self.min_size_bytes {
            raw.min_size_bytes = bytes.clone();
        }
        if let Some(roots) = &self.roots {
            raw.roots = roots
                .iter()
                .map(|root| root.to_string_lossy().to_string())
                .collect::<Vec<_>>()
                .join("\n");
        }

        validate(&raw)
    }
}

/// Store selected by `--config-file`, else the default location
pub fn open_store(config_file: Option<&PathBuf>) -> Result<TomlConfigStore, ConfigError> {
    match config_file {
        Some(path) => Ok(TomlConfigStore::new(path.clone())),
        None => TomlConfigStore::default_location(),
    }
}

/// Apply `edit` to the stored configuration and save the result
pub fn edit_stored<S, F>(store: &S, edit: F) -> Result<Configuration, ConfigError>
where
    S: ConfigStore,
    F: FnOnce(Configuration) -> Result<Configuration, ValidationError>,
{
    let current = store.load()?;
    let updated = edit(current)?;
    store.save(&updated)?;
    Ok(updated)
}
