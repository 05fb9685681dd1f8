//! CLI command implementations.
//!
//! Each submodule implements one command group:
//! - [`types`] - Connector type inspection
//! - [`connectors`] - Connector management

pub mod connectors;
pub mod types;

pub use connectors::ConnectorsCommand;
pub use types::TypesCommand;

use std::time::Duration;

use op_client::{ApiClient, ClientConfig, RegistryOrigin, load_registry};
use op_schema::SchemaRegistry;
use tracing::debug;

use crate::cli::Cli;
use crate::error::CliError;

/// Connection settings shared by every command.
#[derive(Debug, Clone)]
pub struct Session {
    config: ClientConfig,
    offline: bool,
}

impl Session {
    /// Create a session.
    #[must_use]
    pub fn new(config: ClientConfig, offline: bool) -> Self {
        Self { config, offline }
    }

    /// Build the session from parsed arguments.
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        let mut config =
            ClientConfig::new(&cli.api).with_timeout(Duration::from_secs(cli.timeout_secs));
        if let Some(token) = &cli.token {
            config = config.with_token(token);
        }
        Self::new(config, cli.offline)
    }

    /// A client for the platform API.
    pub fn client(&self) -> Result<ApiClient, CliError> {
        ApiClient::new(self.config.clone()).map_err(CliError::from)
    }

    /// The active connector type registry.
    pub async fn registry(&self) -> Result<(SchemaRegistry, RegistryOrigin), CliError> {
        if self.offline {
            debug!("offline, using built-in connector types");
            return Ok((SchemaRegistry::builtin(), RegistryOrigin::Builtin));
        }
        let client = self.client()?;
        Ok(load_registry(&client).await)
    }
}
