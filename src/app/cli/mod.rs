//! CLI module containing argument parsing, configuration overrides and output

pub mod args;
pub mod config;
pub mod display;

#[cfg(test)]
mod tests;

pub use args::{Args, Command, ConfigCommand, ScanArgs, SetArgs};
