//! Application layer for rcapp.
//!
//! Generic runtime and I/O seams around the session engine, so the same
//! orchestration runs in the CLI and in tests.
//!
//! # Components
//!
//! - [`Driver`]: Trait for platform-specific I/O abstraction
//! - [`Runtime`]: Generic orchestration loop using Driver
//! - [`parse_command`]: Operator command line parsing
//! - [`SimHost`]: In-process simulated Host
//! - [`ConsoleDriver`]: Line input, text output, simulated transport

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod command;
mod console;
mod driver;
mod runtime;
mod screen;
pub mod sim;

pub use command::{CommandError, HELP, OperatorCommand, parse_command};
pub use console::{ConsoleDriver, DriverError};
pub use driver::{Driver, DriverEvent};
pub use runtime::Runtime;
pub use screen::Screen;
pub use sim::{HostHandle, SimHost, spawn_host};
