//! Application startup and command dispatch

use super::cli::config::{edit_stored, open_store, Overrides};
use super::cli::display;
use super::cli::{Args, Command, ConfigCommand, ScanArgs};
use super::spinner::run_spinner;
use crate::config::{ConfigError, ConfigStore, Configuration, TomlConfigStore};
use crate::core::error_handling::{headline, log_error_with_context, ContextualError};
use crate::core::logging::{init_logging, LogOptions};
use crate::core::shutdown::{ShutdownCoordinator, INTERRUPTED_EXIT_CODE};
use crate::core::styles::palette_to_clap;
use crate::core::validation::ValidationError;
use crate::scanner::{ScanError, ScanOutcome, ScanStatus, ScannerManager};
use clap::{CommandFactory, FromArgMatches};
use std::io::IsTerminal;
use thiserror::Error;

/// Failures a command can end with
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("Failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

impl ContextualError for CommandError {
    fn is_user_actionable(&self) -> bool {
        match self {
            CommandError::Config(e) => e.is_user_actionable(),
            CommandError::Validation(e) => e.is_user_actionable(),
            CommandError::Scan(e) => e.is_user_actionable(),
            CommandError::Output(_) => false,
        }
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            CommandError::Config(e) => e.user_message(),
            CommandError::Validation(e) => e.user_message(),
            CommandError::Scan(e) => e.user_message(),
            CommandError::Output(_) => None,
        }
    }
}

/// Process exit status for a finished scan
pub fn exit_code(status: ScanStatus) -> i32 {
    match status {
        ScanStatus::Completed => 0,
        ScanStatus::Cancelled => INTERRUPTED_EXIT_CODE,
        _ => 1,
    }
}

/// Parse arguments, set up logging, run the command; returns the exit status
pub async fn startup() -> i32 {
    let stdout_is_terminal = std::io::stdout().is_terminal();
    let help_color = stdout_is_terminal && std::env::var_os("NO_COLOR").is_none();

    let matches = Args::command()
        .styles(palette_to_clap(help_color))
        .get_matches();
    let args = match Args::from_arg_matches(&matches) {
        Ok(args) => args,
        Err(e) => e.exit(),
    };

    let use_color = args.use_color(stdout_is_terminal);
    colored::control::set_override(use_color);

    let options = LogOptions {
        level: args.log_level().to_string(),
        format: args.log_format.unwrap_or_default(),
        file: args.log_file.clone(),
        color: use_color,
    };
    let session = match init_logging(&options) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("{}", e);
            return 1;
        }
    };
    log::debug!("offloader {}", crate::core::version::long_version());

    let (context, result) = match &args.command {
        Command::Scan(scan) => ("Scan", run_scan(&args, scan, use_color).await),
        Command::Config(command) => ("Configuration", run_config(&args, command, use_color)),
    };

    let code = match result {
        Ok(code) => code,
        Err(e) => {
            log_error_with_context(&e, context);
            if !log::log_enabled!(log::Level::Error) {
                eprintln!("{}", headline(&e, context));
            }
            1
        }
    };

    session.shutdown();
    code
}

fn scan_configuration(
    store: &TomlConfigStore,
    scan: &ScanArgs,
) -> Result<Configuration, CommandError> {
    let base = match scan.profile {
        Some(profile) => Configuration::for_profile(profile),
        None => store.load()?,
    };
    Ok(Overrides::from(scan).apply(&base)?)
}

async fn run_scan(args: &Args, scan: &ScanArgs, use_color: bool) -> Result<i32, CommandError> {
    let store = open_store(args.config_file.as_ref())?;
    let config = scan_configuration(&store, scan)?;
    log::info!(
        "Scanning {} roots for {} extensions",
        config.roots().len(),
        config.extensions().len()
    );

    let manager = ScannerManager::create().await;
    let outcome = ShutdownCoordinator::guard(|mut shutdown_rx| async move {
        let handle = manager.start_scan(config)?;
        let spinner = tokio::spawn(run_spinner(handle.clone()));

        let outcome = tokio::select! {
            outcome = handle.wait() => outcome,
            _ = shutdown_rx.recv() => {
                handle.cancel();
                handle.wait().await
            }
        };
        let _ = spinner.await;
        Ok::<ScanOutcome, CommandError>(outcome)
    })
    .await?;

    if scan.json {
        println!("{}", display::to_json(&outcome)?);
    } else {
        println!("{}", display::status_line(&outcome, use_color));
        if outcome.status != ScanStatus::Failed {
            print!("{}", display::outcome_table(&outcome, use_color));
            println!("{}", display::stats_summary(&outcome, use_color));
        }
    }

    Ok(exit_code(outcome.status))
}

fn run_config(args: &Args, command: &ConfigCommand, use_color: bool) -> Result<i32, CommandError> {
    let store = open_store(args.config_file.as_ref())?;

    let updated = match command {
        ConfigCommand::Path => {
            println!("{}", store.path().display());
            return Ok(0);
        }
        ConfigCommand::Show { json } => {
            let config = store.load()?;
            if *json {
                println!("{}", display::to_json(&config)?);
            } else {
                print!(
                    "{}",
                    display::configuration_table(&config, store.path(), use_color)
                );
            }
            return Ok(0);
        }
        ConfigCommand::Set(set) => {
            let overrides = Overrides::from(set);
            if overrides.is_empty() {
                log::warn!("Nothing to set");
            }
            edit_stored(&store, |config| overrides.apply(&config))?
        }
        ConfigCommand::AddExt { extensions } => edit_stored(&store, |config| {
            extensions
                .iter()
                .try_fold(config, |config, ext| config.with_extension_added(ext))
        })?,
        ConfigCommand::RemoveExt { extensions } => edit_stored(&store, |config| {
            extensions
                .iter()
                .try_fold(config, |config, ext| config.with_extension_removed(ext))
        })?,
        ConfigCommand::AddExclude { folders } => edit_stored(&store, |config| {
            Ok(folders
                .iter()
                .fold(config, |config, folder| config.with_folder_added(folder)))
        })?,
        ConfigCommand::RemoveExclude { folders } => edit_stored(&store, |config| {
            Ok(folders
                .iter()
                .fold(config, |config, folder| config.with_folder_removed(folder)))
        })?,
        ConfigCommand::Reset { profile } => store.reset(*profile)?,
    };

    log::info!("Saved configuration to {}", store.path().display());
    print!(
        "{}",
        display::configuration_table(&updated, store.path(), use_color)
    );
    Ok(0)
}
