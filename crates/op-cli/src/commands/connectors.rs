//! Connector management command implementation.
//!
//! `create` and `edit` go through the same form engine as the web UI: the
//! form is instantiated from the active registry, bound with `--set`
//! values, validated locally and only then sent to the platform API.

use std::io::Write;

use op_client::{ApiClient, ConnectionTester, ConnectorService, ConnectorStore};
use op_forms::FormState;
use op_schema::{
    ConnectorId, ConnectorRecord, ConnectorSummary, DESCRIPTION_KEY, FieldKind, NAME_KEY,
};
use tracing::debug;

use crate::cli::{ConnectorCommands, CreateArgs, EditArgs};
use crate::commands::Session;
use crate::error::CliError;
use crate::output::{
    ConnectorDetail, ConnectorList, ConnectorRow, Deleted, OutputFormat, TestOutcome,
};

/// Handler for `connectors` subcommands.
pub struct ConnectorsCommand<'a> {
    session: &'a Session,
}

impl<'a> ConnectorsCommand<'a> {
    /// Creates a new connectors command handler.
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Executes the connectors subcommand.
    ///
    /// # Errors
    ///
    /// Returns error if the platform API fails or the form does not validate.
    pub async fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        command: &ConnectorCommands,
    ) -> Result<(), CliError> {
        match command {
            ConnectorCommands::List => self.list(out, format).await,
            ConnectorCommands::Create(args) => self.create(out, format, args).await,
            ConnectorCommands::Edit(args) => self.edit(out, format, args).await,
            ConnectorCommands::Test { id } => self.test(out, format, *id).await,
            ConnectorCommands::Delete { id } => self.delete(out, format, *id).await,
        }
    }

    async fn service(&self) -> Result<ConnectorService<ApiClient>, CliError> {
        let (registry, origin) = self.session.registry().await?;
        Ok(ConnectorService::new(self.session.client()?, registry, origin))
    }

    async fn list<W: Write>(&self, out: &mut W, format: &OutputFormat) -> Result<(), CliError> {
        let client = self.session.client()?;
        let records = client.list().await?;
        let list = ConnectorList {
            connectors: records.iter().map(ConnectorRow::from).collect(),
            summary: ConnectorSummary::from_records(&records),
        };
        format.write(out, &list)
    }

    async fn create<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        args: &CreateArgs,
    ) -> Result<(), CliError> {
        let service = self.service().await?;
        let mut form = service.new_form(&args.type_id)?;
        form.set(NAME_KEY, args.name.as_str())?;
        if let Some(description) = &args.description {
            form.set(DESCRIPTION_KEY, description.as_str())?;
        }
        bind_assignments(&mut form, &args.set)?;

        let record = service.save(&form).await?;
        write_detail(out, format, &form, &record)
    }

    async fn edit<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        args: &EditArgs,
    ) -> Result<(), CliError> {
        let service = self.service().await?;
        let mut form = service.edit_form(args.id).await?;
        if let Some(name) = &args.name {
            form.set(NAME_KEY, name.as_str())?;
        }
        if let Some(description) = &args.description {
            form.set(DESCRIPTION_KEY, description.as_str())?;
        }
        bind_assignments(&mut form, &args.set)?;
        for key in &args.unset {
            form.clear(key)?;
        }

        let record = service.save(&form).await?;
        write_detail(out, format, &form, &record)
    }

    async fn test<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        id: ConnectorId,
    ) -> Result<(), CliError> {
        let client = self.session.client()?;
        let result = client.test_connection(id).await?;
        format.write(out, &TestOutcome::new(id, result))
    }

    async fn delete<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        id: ConnectorId,
    ) -> Result<(), CliError> {
        let client = self.session.client()?;
        client.delete(id).await?;
        format.write(out, &Deleted { id })
    }
}

/// Split a `KEY=VALUE` argument at the first `=`.
fn parse_assignment(raw: &str) -> Result<(&str, &str), CliError> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value)),
        _ => Err(CliError::InvalidArgument(format!("expected KEY=VALUE, got '{raw}'"))),
    }
}

fn bind_assignments(form: &mut FormState, assignments: &[String]) -> Result<(), CliError> {
    for raw in assignments {
        let (key, value) = parse_assignment(raw)?;
        if key == NAME_KEY || key == DESCRIPTION_KEY {
            return Err(CliError::InvalidArgument(format!(
                "use --{key} instead of --set {key}=..."
            )));
        }
        debug!(key, "binding configuration value");
        form.set(key, value)?;
    }
    Ok(())
}

fn write_detail<W: Write>(
    out: &mut W,
    format: &OutputFormat,
    form: &FormState,
    record: &ConnectorRecord,
) -> Result<(), CliError> {
    let masked: Vec<&str> = form
        .descriptor()
        .fields
        .iter()
        .filter(|f| f.kind == FieldKind::Password)
        .map(|f| f.key.as_str())
        .collect();
    format.write(out, &ConnectorDetail::new(record, &masked))
}
