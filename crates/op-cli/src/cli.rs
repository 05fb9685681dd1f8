//! Command-line argument parsing with clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use op_client::DEFAULT_BASE_URL;
use op_schema::ConnectorId;

/// OpenPoint CLI - connector configuration for the integration platform.
#[derive(Parser, Debug, Clone)]
#[command(name = "openpoint")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Platform API base URL.
    #[arg(short, long, env = "OPENPOINT_API", default_value = DEFAULT_BASE_URL)]
    pub api: String,

    /// Bearer token for the platform API.
    #[arg(long, env = "OPENPOINT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    pub format: Format,

    /// Use the built-in connector types instead of fetching them.
    #[arg(long)]
    pub offline: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Inspect connector types.
    Types {
        /// Types subcommand to execute.
        #[command(subcommand)]
        command: TypeCommands,
    },

    /// Manage connectors.
    Connectors {
        /// Connectors subcommand to execute.
        #[command(subcommand)]
        command: ConnectorCommands,
    },
}

/// Connector type subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum TypeCommands {
    /// List all connector types.
    List,

    /// Show the form fields of a connector type.
    Show {
        /// Connector type identifier.
        type_id: String,
    },

    /// Check every connector type schema for authoring defects.
    Check,
}

/// Connector subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ConnectorCommands {
    /// List connectors with a status summary.
    List,

    /// Create a connector.
    Create(CreateArgs),

    /// Edit an existing connector.
    Edit(EditArgs),

    /// Test a connector's connection.
    Test {
        /// Connector ID.
        id: ConnectorId,
    },

    /// Delete a connector.
    Delete {
        /// Connector ID.
        id: ConnectorId,
    },
}

/// Arguments for `connectors create`.
#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    /// Connector type identifier.
    pub type_id: String,

    /// Connector name.
    #[arg(short, long)]
    pub name: String,

    /// Optional description.
    #[arg(short, long)]
    pub description: Option<String>,

    /// Configuration values.
    #[arg(short, long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,
}

/// Arguments for `connectors edit`.
#[derive(Args, Debug, Clone)]
pub struct EditArgs {
    /// Connector ID.
    pub id: ConnectorId,

    /// New connector name.
    #[arg(short, long)]
    pub name: Option<String>,

    /// New description. Pass an empty string to remove it.
    #[arg(short, long)]
    pub description: Option<String>,

    /// Configuration values to change.
    #[arg(short, long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// Configuration keys to clear.
    #[arg(short, long = "unset", value_name = "KEY")]
    pub unset: Vec<String>,
}
