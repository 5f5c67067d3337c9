//! TOML configuration persistence
//!
//! Loads and saves the scan configuration as typed TOML values. Stored values
//! override the profile defaults key by key and always pass through
//! [`validate`](super::validate) on the way in, so a hand-edited file cannot
//! smuggle in an invalid configuration. Keys this module does not own (for
//! example logging settings) are preserved on save.

use super::defaults::Profile;
use super::{
    validate, Configuration, RawConfiguration, FIELD_EXCLUDED_FOLDERS, FIELD_EXTENSIONS,
    FIELD_MIN_AGE_DAYS, FIELD_MIN_SIZE_BYTES, FIELD_ROOTS,
};
use crate::core::validation::ValidationError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable overriding the default configuration file location
pub const CONFIG_FILE_ENV: &str = "OFFLOADER_CONFIG_FILE";

/// Configuration persistence failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Failed to serialize configuration: {message}")]
    Serialize { message: String },

    #[error("Configuration file contains an invalid value: {0}")]
    Validation(#[from] ValidationError),

    #[error("No user configuration directory is available on this platform")]
    NoConfigDir,
}

impl crate::core::error_handling::ContextualError for ConfigError {
    fn is_user_actionable(&self) -> bool {
        matches!(
            self,
            ConfigError::Parse { .. } | ConfigError::Validation(_) | ConfigError::NoConfigDir
        )
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ConfigError::Parse { message, .. } => Some(message.as_str()),
            ConfigError::Validation(e) => {
                crate::core::error_handling::ContextualError::user_message(e)
            }
            ConfigError::NoConfigDir => {
                Some("No configuration directory found; pass --config-file explicitly")
            }
            _ => None,
        }
    }
}

/// Persistence collaborator for scan configurations
pub trait ConfigStore {
    /// Load the stored configuration, falling back to defaults for missing keys
    fn load(&self) -> Result<Configuration, ConfigError>;

    /// Persist a configuration
    fn save(&self, config: &Configuration) -> Result<(), ConfigError>;

    /// Replace the stored scan settings with a profile's defaults
    fn reset(&self, profile: Profile) -> Result<Configuration, ConfigError> {
        let config = Configuration::for_profile(profile);
        self.save(&config)?;
        Ok(config)
    }
}

/// Configuration stored in a TOML file
#[derive(Debug, Clone)]
pub struct TomlConfigStore {
    path: PathBuf,
}

impl TomlConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `$OFFLOADER_CONFIG_FILE` or the platform config directory
    pub fn default_location() -> Result<Self, ConfigError> {
        if let Some(path) = std::env::var_os(CONFIG_FILE_ENV).filter(|p| !p.is_empty()) {
            return Ok(Self::new(PathBuf::from(path)));
        }
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::new(dir.join("Offloader").join("offloader.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the raw TOML table; `None` when the file does not exist yet
    pub fn load_table(&self) -> Result<Option<toml::Table>, ConfigError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::Io {
            path: self.path.clone(),
            source: e,
        })?;

        contents
            .parse::<toml::Table>()
            .map(Some)
            .map_err(|e| ConfigError::Parse {
                path: self.path.clone(),
                message: e.to_string(),
            })
    }

    fn write_table(&self, table: &toml::Table) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(table).map_err(|e| ConfigError::Serialize {
            message: e.to_string(),
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        std::fs::write(&self.path, contents).map_err(|e| ConfigError::Io {
            path: self.path.clone(),
            source: e,
        })?;
        log::debug!("Configuration written to {}", self.path.display());
        Ok(())
    }

    /// Collect a string list stored either as an array or a single string
    fn string_list(table: &toml::Table, key: &str) -> Option<Vec<String>> {
        let value = table.get(key)?;
        if let Some(single) = value.as_str() {
            return Some(vec![single.to_string()]);
        }
        value.as_array().map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str())
                .map(str::to_string)
                .collect()
        })
    }

    /// Render a stored number (or string) as text for validation
    fn number_text(table: &toml::Table, key: &str) -> Option<String> {
        let value = table.get(key)?;
        match value {
            toml::Value::Integer(n) => Some(n.to_string()),
            toml::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Overlay stored values on the defaults and validate the result
    fn configuration_from_table(table: &toml::Table) -> Result<Configuration, ConfigError> {
        let mut raw = RawConfiguration::from(&Configuration::default());

        if let Some(extensions) = Self::string_list(table, FIELD_EXTENSIONS) {
            raw.extensions = extensions.join("\n");
        }
        if let Some(folders) = Self::string_list(table, FIELD_EXCLUDED_FOLDERS) {
            raw.excluded_folders = folders.join("\n");
        }
        if let Some(age) = Self::number_text(table, FIELD_MIN_AGE_DAYS) {
            raw.min_age_days = age;
        }
        if let Some(size) = Self::number_text(table, FIELD_MIN_SIZE_BYTES) {
            raw.min_size_bytes = size;
        }
        if let Some(roots) = Self::string_list(table, FIELD_ROOTS) {
            raw.roots = roots.join("\n");
        }

        Ok(validate(&raw)?)
    }

    fn apply_configuration(
        table: &mut toml::Table,
        config: &Configuration,
    ) -> Result<(), ConfigError> {
        let strings = |items: &[String]| {
            toml::Value::Array(
                items
                    .iter()
                    .map(|s| toml::Value::String(s.clone()))
                    .collect(),
            )
        };

        table.insert(FIELD_EXTENSIONS.to_string(), strings(config.extensions()));
        table.insert(
            FIELD_EXCLUDED_FOLDERS.to_string(),
            strings(config.excluded_folders()),
        );
        table.insert(
            FIELD_MIN_AGE_DAYS.to_string(),
            to_toml_integer(FIELD_MIN_AGE_DAYS, config.min_age_days())?,
        );
        table.insert(
            FIELD_MIN_SIZE_BYTES.to_string(),
            to_toml_integer(FIELD_MIN_SIZE_BYTES, config.min_size_bytes())?,
        );
        let roots: Vec<String> = config
            .roots()
            .iter()
            .map(|r| r.to_string_lossy().to_string())
            .collect();
        table.insert(FIELD_ROOTS.to_string(), strings(&roots));
        Ok(())
    }
}

/// TOML integers are signed 64-bit; larger values cannot be stored faithfully
fn to_toml_integer(key: &str, value: u64) -> Result<toml::Value, ConfigError> {
    i64::try_from(value)
        .map(toml::Value::Integer)
        .map_err(|_| ConfigError::Serialize {
            message: format!("{} value {} does not fit a TOML integer", key, value),
        })
}

impl ConfigStore for TomlConfigStore {
    fn load(&self) -> Result<Configuration, ConfigError> {
        match self.load_table()? {
            Some(table) => Self::configuration_from_table(&table),
            None => {
                log::debug!(
                    "No configuration at {}, using defaults",
                    self.path.display()
                );
                Ok(Configuration::default())
            }
        }
    }

    fn save(&self, config: &Configuration) -> Result<(), ConfigError> {
        let mut table = self.load_table()?.unwrap_or_default();
        Self::apply_configuration(&mut table, config)?;
        self.write_table(&table)
    }

    fn reset(&self, profile: Profile) -> Result<Configuration, ConfigError> {
        let config = Configuration::for_profile(profile);
        let mut table = self.load_table()?.unwrap_or_default();
        Self::apply_configuration(&mut table, &config)?;
        // Roots follow the platform after a reset
        table.remove(FIELD_ROOTS);
        self.write_table(&table)?;
        Ok(config)
    }
}
