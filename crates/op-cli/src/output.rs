//! Output formatting for CLI commands.
//!
//! Supports table (human-readable) and JSON output formats.

use std::io::Write;

use chrono::{DateTime, Utc};
use op_client::RegistryOrigin;
use op_forms::{BoundInput, FormState};
use op_schema::{
    ConfigMap, ConnectionTestResult, ConnectorId, ConnectorRecord, ConnectorStatus,
    ConnectorSummary, TypeDescriptor,
};
use serde::Serialize;
use serde_json::Value;

use crate::cli::Format;
use crate::error::CliError;

/// Replacement shown for masked values.
pub const MASK: &str = "********";

/// Output formatter that handles both table and JSON output.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Get the current format.
    #[must_use]
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Check if JSON format is selected.
    #[must_use]
    pub const fn is_json(&self) -> bool {
        matches!(self.format, Format::Json)
    }

    /// Write a serializable value to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TableDisplay,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, value)
                    .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
                writeln!(writer)?;
            }
            Format::Table => {
                value.write_table(writer)?;
            }
        }
        Ok(())
    }

    /// Write a serializable value to a string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_string<T>(&self, value: &T) -> Result<String, CliError>
    where
        T: Serialize + TableDisplay,
    {
        let mut buf = Vec::new();
        self.write(&mut buf, value)?;
        String::from_utf8(buf).map_err(|e| CliError::Format(format!("UTF-8 error: {e}")))
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Table)
    }
}

/// Trait for types that can be displayed as a table.
pub trait TableDisplay {
    /// Write the value as a human-readable table.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;
}

/// One connector type in a listing.
#[derive(Debug, Clone, Serialize)]
pub struct TypeInfo {
    /// Type identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Short description.
    pub description: String,
    /// Number of configuration fields.
    pub fields: usize,
    /// Number of required configuration fields.
    pub required: usize,
}

impl From<&TypeDescriptor> for TypeInfo {
    fn from(descriptor: &TypeDescriptor) -> Self {
        Self {
            id: descriptor.type_id.clone(),
            name: descriptor.display_name.clone(),
            description: descriptor.description.clone(),
            fields: descriptor.fields.len(),
            required: descriptor.required_count(),
        }
    }
}

/// List of connector types for display.
#[derive(Debug, Clone, Serialize)]
pub struct TypeList {
    /// Where the registry came from.
    pub origin: RegistryOrigin,
    /// Connector types in registry order.
    pub types: Vec<TypeInfo>,
}

impl TableDisplay for TypeList {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(
            writer,
            "{:<12}  {:<16}  {:>6}  {:>8}  DESCRIPTION",
            "TYPE", "NAME", "FIELDS", "REQUIRED"
        )?;
        writeln!(writer, "{}", "─".repeat(80))?;

        for info in &self.types {
            writeln!(
                writer,
                "{:<12}  {:<16}  {:>6}  {:>8}  {}",
                truncate(&info.id, 12),
                truncate(&info.name, 16),
                info.fields,
                info.required,
                truncate(&info.description, 32)
            )?;
        }

        writeln!(writer)?;
        writeln!(writer, "Total: {} type(s) ({})", self.types.len(), self.origin)?;
        Ok(())
    }
}

/// One form input of a connector type.
#[derive(Debug, Clone, Serialize)]
pub struct InputRow {
    /// Field key.
    pub key: String,
    /// Display label.
    pub label: String,
    /// Widget name.
    pub widget: String,
    /// Whether the input must be filled.
    pub required: bool,
    /// Options of a choice widget.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// Pre-filled value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial: Option<Value>,
}

impl From<&BoundInput> for InputRow {
    fn from(input: &BoundInput) -> Self {
        let options = match input.widget() {
            op_forms::Widget::Choice { options, .. } => options.clone(),
            _ => Vec::new(),
        };
        Self {
            key: input.key().to_string(),
            label: input.label().to_string(),
            widget: input.widget().name().to_string(),
            required: input.is_required(),
            options,
            initial: input.value().cloned(),
        }
    }
}

/// The rendered form of a connector type.
#[derive(Debug, Clone, Serialize)]
pub struct TypeDetail {
    /// Type identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Short description.
    pub description: String,
    /// Inputs in render order.
    pub inputs: Vec<InputRow>,
}

impl From<&FormState> for TypeDetail {
    fn from(form: &FormState) -> Self {
        let descriptor = form.descriptor();
        Self {
            id: descriptor.type_id.clone(),
            name: descriptor.display_name.clone(),
            description: descriptor.description.clone(),
            inputs: form.inputs().iter().map(InputRow::from).collect(),
        }
    }
}

impl TableDisplay for TypeDetail {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Connector Type: {} ({})", self.name, self.id)?;
        writeln!(writer, "══════════════════════════════════")?;
        if !self.description.is_empty() {
            writeln!(writer, "{}", self.description)?;
        }
        writeln!(writer)?;
        writeln!(
            writer,
            "{:<20}  {:<20}  {:<10}  {:<8}  DEFAULT",
            "KEY", "LABEL", "WIDGET", "REQUIRED"
        )?;
        writeln!(writer, "{}", "─".repeat(72))?;

        for input in &self.inputs {
            let initial = input.initial.as_ref().map(display_value).unwrap_or_default();
            writeln!(
                writer,
                "{:<20}  {:<20}  {:<10}  {:<8}  {}",
                truncate(&input.key, 20),
                truncate(&input.label, 20),
                input.widget,
                if input.required { "yes" } else { "no" },
                initial
            )?;
            if !input.options.is_empty() {
                writeln!(writer, "{:<20}  options: {}", "", input.options.join(", "))?;
            }
        }
        Ok(())
    }
}

/// Result of checking every schema in the registry.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    /// Where the registry came from.
    pub origin: RegistryOrigin,
    /// Number of connector types checked.
    pub checked: usize,
    /// One message per defective connector type.
    pub defects: Vec<String>,
}

impl TableDisplay for CheckReport {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        for defect in &self.defects {
            writeln!(writer, "✗ {defect}")?;
        }
        writeln!(
            writer,
            "Checked {} type(s) ({}): {} defect(s)",
            self.checked,
            self.origin,
            self.defects.len()
        )?;
        Ok(())
    }
}

/// One connector in a listing.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectorRow {
    /// Connector ID.
    pub id: ConnectorId,
    /// Connector name.
    pub name: String,
    /// Connector type.
    #[serde(rename = "type")]
    pub connector_type: String,
    /// Connection status.
    pub status: ConnectorStatus,
    /// When the connection was last tested.
    pub last_tested: Option<DateTime<Utc>>,
}

impl From<&ConnectorRecord> for ConnectorRow {
    fn from(record: &ConnectorRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            connector_type: record.connector_type.clone(),
            status: record.status,
            last_tested: record.last_tested,
        }
    }
}

/// List of connectors for display.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectorList {
    /// Connectors.
    pub connectors: Vec<ConnectorRow>,
    /// Counts by status.
    pub summary: ConnectorSummary,
}

impl TableDisplay for ConnectorList {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        if self.connectors.is_empty() {
            writeln!(writer, "No connectors configured")?;
            return Ok(());
        }

        writeln!(
            writer,
            "{:>6}  {:<24}  {:<12}  {:<8}  LAST TESTED",
            "ID", "NAME", "TYPE", "STATUS"
        )?;
        writeln!(writer, "{}", "─".repeat(76))?;

        for row in &self.connectors {
            writeln!(
                writer,
                "{:>6}  {:<24}  {:<12}  {:<8}  {}",
                row.id,
                truncate(&row.name, 24),
                truncate(&row.connector_type, 12),
                row.status,
                row.last_tested.map_or_else(|| "never".to_string(), format_time)
            )?;
        }

        writeln!(writer)?;
        writeln!(
            writer,
            "Total: {} connector(s) ({} active, {} inactive, {} error)",
            self.summary.total, self.summary.active, self.summary.inactive, self.summary.error
        )?;
        Ok(())
    }
}

/// A stored connector with masked secrets.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectorDetail {
    /// Connector ID.
    pub id: ConnectorId,
    /// Connector name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Connector type.
    #[serde(rename = "type")]
    pub connector_type: String,
    /// Connection status.
    pub status: ConnectorStatus,
    /// When the connection was last tested.
    pub last_tested: Option<DateTime<Utc>>,
    /// Configuration with masked fields replaced.
    pub config: ConfigMap,
}

impl ConnectorDetail {
    /// Build the detail view, masking every key in `masked`.
    #[must_use]
    pub fn new(record: &ConnectorRecord, masked: &[&str]) -> Self {
        let config = record
            .config
            .iter()
            .map(|(key, value)| {
                let shown = if masked.contains(&key.as_str()) && !value.is_null() {
                    Value::String(MASK.to_string())
                } else {
                    value.clone()
                };
                (key.clone(), shown)
            })
            .collect();
        Self {
            id: record.id,
            name: record.name.clone(),
            description: record.description.clone(),
            connector_type: record.connector_type.clone(),
            status: record.status,
            last_tested: record.last_tested,
            config,
        }
    }
}

impl TableDisplay for ConnectorDetail {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Connector: {}", self.name)?;
        writeln!(writer, "══════════════════════════════════")?;
        writeln!(writer, "ID:           {}", self.id)?;
        writeln!(writer, "Type:         {}", self.connector_type)?;
        writeln!(writer, "Status:       {}", self.status)?;
        if let Some(description) = &self.description {
            writeln!(writer, "Description:  {description}")?;
        }
        writeln!(
            writer,
            "Last Tested:  {}",
            self.last_tested.map_or_else(|| "never".to_string(), format_time)
        )?;

        if !self.config.is_empty() {
            writeln!(writer)?;
            writeln!(writer, "Configuration")?;
            for (key, value) in &self.config {
                writeln!(writer, "  {:<20}  {}", key, display_value(value))?;
            }
        }
        Ok(())
    }
}

/// Outcome of a connection test for display.
#[derive(Debug, Clone, Serialize)]
pub struct TestOutcome {
    /// Connector ID.
    pub id: ConnectorId,
    /// Whether the connection succeeded.
    pub success: bool,
    /// Collaborator message.
    pub message: String,
    /// Status the connector moved to.
    pub status: Option<ConnectorStatus>,
}

impl TestOutcome {
    /// Wrap a test result.
    #[must_use]
    pub fn new(id: ConnectorId, result: ConnectionTestResult) -> Self {
        Self {
            id,
            success: result.success,
            message: result.message,
            status: result.status,
        }
    }
}

impl TableDisplay for TestOutcome {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        let mark = if self.success { "✓" } else { "✗" };
        writeln!(writer, "{mark} Connector {}: {}", self.id, self.message)?;
        if let Some(status) = self.status {
            writeln!(writer, "  Status: {status}")?;
        }
        Ok(())
    }
}

/// Confirmation of a deletion.
#[derive(Debug, Clone, Serialize)]
pub struct Deleted {
    /// Deleted connector ID.
    pub id: ConnectorId,
}

impl TableDisplay for Deleted {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "✓ Deleted connector {}", self.id)?;
        Ok(())
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn format_time(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Truncate a string to `max_len` characters.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{kept}...")
    } else {
        s.chars().take(max_len).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use op_schema::SchemaRegistry;
    use serde_json::json;

    fn record() -> ConnectorRecord {
        serde_json::from_value(json!({
            "id": 3,
            "name": "Warehouse",
            "type": "database",
            "config": {"host": "db.internal", "port": 5432, "password": "hunter2"},
            "status": "error",
            "last_tested": "2024-03-01T10:15:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn output_format_default_is_table() {
        let fmt = OutputFormat::default();
        assert_eq!(fmt.format(), Format::Table);
        assert!(!fmt.is_json());
    }

    #[test]
    fn type_list_table_output() {
        let registry = SchemaRegistry::builtin();
        let list = TypeList {
            origin: RegistryOrigin::Builtin,
            types: registry.types().map(TypeInfo::from).collect(),
        };

        let output = OutputFormat::default().to_string(&list).unwrap();
        assert!(output.contains("azure_blob"));
        assert!(output.contains("Total: 10 type(s) (builtin)"));
    }

    #[test]
    fn type_detail_shows_identity_and_options() {
        let registry = SchemaRegistry::builtin();
        let form = FormState::instantiate(&registry, "database", None).unwrap();
        let detail = TypeDetail::from(&form);

        assert_eq!(detail.inputs.len(), 8);
        assert_eq!(detail.inputs[0].label, "Connector Name");
        assert_eq!(detail.inputs[2].options, ["PostgreSQL", "MySQL", "Oracle"]);

        let output = OutputFormat::default().to_string(&detail).unwrap();
        assert!(output.contains("options: PostgreSQL, MySQL, Oracle"));
        assert!(output.contains("masked"));
    }

    #[test]
    fn connector_detail_masks_secrets() {
        let detail = ConnectorDetail::new(&record(), &["password"]);
        assert_eq!(detail.config["password"], json!(MASK));
        assert_eq!(detail.config["port"], json!(5432));

        let output = OutputFormat::new(Format::Json).to_string(&detail).unwrap();
        assert!(!output.contains("hunter2"));
        assert!(output.contains("\"type\": \"database\""));
    }

    #[test]
    fn connector_list_table_output() {
        let record = record();
        let list = ConnectorList {
            connectors: vec![ConnectorRow::from(&record)],
            summary: ConnectorSummary::from_records([&record]),
        };

        let output = OutputFormat::default().to_string(&list).unwrap();
        assert!(output.contains("Warehouse"));
        assert!(output.contains("2024-03-01 10:15:00"));
        assert!(output.contains("Total: 1 connector(s) (0 active, 0 inactive, 1 error)"));
    }

    #[test]
    fn empty_connector_list() {
        let list = ConnectorList {
            connectors: Vec::new(),
            summary: ConnectorSummary::default(),
        };
        let output = OutputFormat::default().to_string(&list).unwrap();
        assert_eq!(output, "No connectors configured\n");
    }

    #[test]
    fn test_outcome_table_output() {
        let outcome = TestOutcome::new(
            ConnectorId::new(2),
            ConnectionTestResult {
                success: false,
                message: "Missing required configuration".into(),
                status: Some(ConnectorStatus::Error),
            },
        );
        let output = OutputFormat::default().to_string(&outcome).unwrap();
        assert!(output.starts_with("✗ Connector 2: Missing required configuration"));
    }

    #[test]
    fn truncate_short_string() {
        assert_eq!(truncate("hello", 10), "hello");
    }

    #[test]
    fn truncate_long_string() {
        assert_eq!(truncate("hello world", 8), "hello...");
    }

    #[test]
    fn truncate_multibyte() {
        assert_eq!(truncate("Zürich Süd Lager", 8), "Züric...");
    }
}
