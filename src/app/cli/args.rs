//! Command line arguments
//!
//! Global logging and colour flags apply to every subcommand; `scan` runs a
//! scan and `config` inspects or edits the stored configuration.

use crate::config::defaults::Profile;
use crate::core::logging::LogFormat;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// Log level used when none is given on the command line
pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Parser, Debug, Clone)]
#[command(name = "offloader")]
#[command(about = "Find old, large files worth moving off a disk")]
#[command(version, long_version = crate::core::version::long_version())]
#[command(after_help = " * can be specified multiple times or as a comma-separated list")]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Log level
    #[arg(
        short = 'l',
        long = "log-level",
        value_name = "LEVEL",
        value_parser = ["trace", "debug", "info", "warn", "error", "off"],
        global = true
    )]
    pub log_level: Option<String>,

    /// Log file path
    #[arg(short = 'f', long = "log-file", value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// Log output format
    #[arg(
        short = 'o',
        long = "log-format",
        value_name = "FORMAT",
        value_enum,
        global = true
    )]
    pub log_format: Option<LogFormat>,

    /// Force coloured output
    #[arg(long = "color", overrides_with = "no_color", global = true)]
    pub color: bool,

    /// Disable coloured output
    #[arg(long = "no-color", overrides_with = "color", global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Count old, large files under the configured roots
    Scan(ScanArgs),

    /// Show or edit the stored configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// One-off overrides for a single scan; nothing here is saved
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct ScanArgs {
    /// Extensions to look for, replacing the configured set*
    #[arg(short = 'x', long = "ext", value_name = "EXT", value_delimiter = ',')]
    pub extensions: Vec<String>,

    /// Additional folder prefix to exclude (repeatable)
    #[arg(short = 'e', long = "exclude", value_name = "DIR")]
    pub exclude: Vec<String>,

    /// Minimum age in days
    #[arg(short = 'a', long = "min-age-days", value_name = "DAYS")]
    pub min_age_days: Option<String>,

    /// Minimum size in bytes
    #[arg(short = 's', long = "min-size", value_name = "BYTES")]
    pub min_size_bytes: Option<String>,

    /// Root to walk, replacing the configured roots (repeatable)
    #[arg(short = 'r', long = "root", value_name = "PATH")]
    pub roots: Vec<PathBuf>,

    /// Start from a default profile instead of the stored configuration
    #[arg(short = 'p', long = "profile", value_enum)]
    pub profile: Option<Profile>,

    /// Print the result as JSON
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Print the stored configuration
    Show {
        /// Print as JSON
        #[arg(long = "json")]
        json: bool,
    },

    /// Print the configuration file location
    Path,

    /// Replace configuration values
    Set(SetArgs),

    /// Add extensions*
    AddExt {
        #[arg(value_name = "EXT", required = true, value_delimiter = ',')]
        extensions: Vec<String>,
    },

    /// Remove extensions*
    RemoveExt {
        #[arg(value_name = "EXT", required = true, value_delimiter = ',')]
        extensions: Vec<String>,
    },

    /// Add excluded folder prefixes
    AddExclude {
        #[arg(value_name = "DIR", required = true)]
        folders: Vec<String>,
    },

    /// Remove excluded folder prefixes
    RemoveExclude {
        #[arg(value_name = "DIR", required = true)]
        folders: Vec<String>,
    },

    /// Restore the scan settings of a profile
    Reset {
        #[arg(short = 'p', long = "profile", value_enum, default_value_t = Profile::default())]
        profile: Profile,
    },
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct SetArgs {
    /// Extensions, replacing the stored set*
    #[arg(short = 'x', long = "ext", value_name = "EXT", value_delimiter = ',')]
    pub extensions: Vec<String>,

    /// Excluded folder prefixes, replacing the stored set
    #[arg(short = 'e', long = "exclude", value_name = "DIR")]
    pub excluded_folders: Vec<String>,

    /// Minimum age in days
    #[arg(short = 'a', long = "min-age-days", value_name = "DAYS")]
    pub min_age_days: Option<String>,

    /// Minimum size in bytes
    #[arg(short = 's', long = "min-size", value_name = "BYTES")]
    pub min_size_bytes: Option<String>,

    /// Roots, replacing the stored roots
    #[arg(short = 'r', long = "root", value_name = "PATH")]
    pub roots: Vec<PathBuf>,
}

impl Args {
    /// Resolve colour use from the flags and whether stdout is a terminal
    pub fn use_color(&self, stdout_is_terminal: bool) -> bool {
        if self.no_color {
            false
        } else {
            self.color || stdout_is_terminal
        }
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}
