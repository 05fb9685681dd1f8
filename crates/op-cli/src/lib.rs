//! # op-cli
//!
//! OpenPoint command-line interface.
//!
//! Provides commands for:
//! - Listing and inspecting connector types
//! - Checking connector type schemas
//! - Creating, editing, testing and deleting connectors
//!
//! Connector forms are built and validated locally with `op-forms`; only a
//! validated draft is sent to the platform API.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use cli::{Cli, Commands, ConnectorCommands, Format, TypeCommands};
pub use commands::Session;
pub use error::CliError;
pub use output::OutputFormat;
