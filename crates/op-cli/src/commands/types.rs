//! Connector type command implementation.

use std::io::Write;

use op_forms::FormState;

use crate::cli::TypeCommands;
use crate::commands::Session;
use crate::error::CliError;
use crate::output::{CheckReport, OutputFormat, TypeDetail, TypeInfo, TypeList};

/// Handler for `types` subcommands.
pub struct TypesCommand<'a> {
    session: &'a Session,
}

impl<'a> TypesCommand<'a> {
    /// Creates a new types command handler.
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Executes the types subcommand.
    ///
    /// # Errors
    ///
    /// Returns error if the type is unknown, its schema is malformed, or
    /// `check` finds defects.
    pub async fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        command: &TypeCommands,
    ) -> Result<(), CliError> {
        match command {
            TypeCommands::List => self.list(out, format).await,
            TypeCommands::Show { type_id } => self.show(out, format, type_id).await,
            TypeCommands::Check => self.check(out, format).await,
        }
    }

    async fn list<W: Write>(&self, out: &mut W, format: &OutputFormat) -> Result<(), CliError> {
        let (registry, origin) = self.session.registry().await?;
        let list = TypeList {
            origin,
            types: registry.types().map(TypeInfo::from).collect(),
        };
        format.write(out, &list)
    }

    async fn show<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        type_id: &str,
    ) -> Result<(), CliError> {
        let (registry, _) = self.session.registry().await?;
        let form = FormState::instantiate(&registry, type_id, None)?;
        format.write(out, &TypeDetail::from(&form))
    }

    async fn check<W: Write>(&self, out: &mut W, format: &OutputFormat) -> Result<(), CliError> {
        let (registry, origin) = self.session.registry().await?;
        let report = CheckReport {
            origin,
            checked: registry.len(),
            defects: registry.check_all().iter().map(ToString::to_string).collect(),
        };
        format.write(out, &report)?;

        if report.defects.is_empty() {
            Ok(())
        } else {
            Err(CliError::Config(format!(
                "{} connector type(s) have schema defects",
                report.defects.len()
            )))
        }
    }
}
