//! Command-line client support: configuration and errors.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;

use std::io;

use rcapp_app::DriverError;
use thiserror::Error;

pub use config::{ClientConfig, StartupMode};

/// Top-level client errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading a file or the terminal failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration file did not parse.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Driver failed while running.
    #[error(transparent)]
    Driver(#[from] DriverError),
}
