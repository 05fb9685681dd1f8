//! CLI error types.

use std::fmt;

use op_client::{ClientError, ServiceError};
use op_forms::{FieldErrors, FormError};
use op_schema::{ConnectorId, SchemaError};

/// CLI-specific errors.
#[derive(Debug)]
pub enum CliError {
    /// Platform API could not be reached.
    Connection(String),
    /// Invalid configuration or connector type schema.
    Config(String),
    /// Command execution failed.
    Command(String),
    /// Output formatting error.
    Format(String),
    /// Connector not found.
    ConnectorNotFound(ConnectorId),
    /// Connector type not in the registry.
    UnknownType(String),
    /// Invalid argument.
    InvalidArgument(String),
    /// Connector form did not validate.
    Validation(FieldErrors),
    /// IO error.
    Io(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connection(msg) => write!(f, "connection error: {msg}"),
            Self::Config(msg) => write!(f, "configuration error: {msg}"),
            Self::Command(msg) => write!(f, "command error: {msg}"),
            Self::Format(msg) => write!(f, "format error: {msg}"),
            Self::ConnectorNotFound(id) => write!(f, "connector not found: {id}"),
            Self::UnknownType(id) => write!(f, "unknown connector type: {id}"),
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::Validation(errors) => {
                write!(f, "connector form has errors")?;
                for error in errors.iter() {
                    write!(f, "\n{}: {}", error.key, error.message())?;
                }
                Ok(())
            }
            Self::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Validation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ClientError> for CliError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Unavailable { reason } => Self::Connection(reason),
            ClientError::NotFound { id } => Self::ConnectorNotFound(id),
            other => Self::Command(other.to_string()),
        }
    }
}

impl From<SchemaError> for CliError {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::UnknownType { type_id } => Self::UnknownType(type_id),
            other => Self::Config(other.to_string()),
        }
    }
}

impl From<FormError> for CliError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::Schema(e) => e.into(),
            other => Self::InvalidArgument(other.to_string()),
        }
    }
}

impl From<ServiceError> for CliError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Fields(errors) => Self::Validation(errors),
            ServiceError::Save(e) => e.into(),
            ServiceError::Form(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use op_forms::FormState;
    use op_schema::SchemaRegistry;

    #[test]
    fn cli_error_display_connection() {
        let err = CliError::Connection("timeout".into());
        assert_eq!(err.to_string(), "connection error: timeout");
    }

    #[test]
    fn cli_error_display_connector_not_found() {
        let err = CliError::from(ClientError::NotFound {
            id: ConnectorId::new(12),
        });
        assert_eq!(err.to_string(), "connector not found: 12");
    }

    #[test]
    fn cli_error_validation_lists_fields() {
        let registry = SchemaRegistry::builtin();
        let mut form = FormState::instantiate(&registry, "ftp", None).unwrap();
        form.set("name", "Files").unwrap();
        form.set("host", "files.example.com").unwrap();
        let errors = form.validate().unwrap_err();

        let err = CliError::from(ServiceError::Fields(errors));
        assert_eq!(
            err.to_string(),
            "connector form has errors\nusername: Username is required\npassword: Password is required"
        );
    }

    #[test]
    fn cli_error_unknown_type() {
        let err = CliError::from(FormError::Schema(SchemaError::unknown_type("mainframe")));
        assert!(matches!(err, CliError::UnknownType(ref id) if id == "mainframe"));
    }

    #[test]
    fn cli_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let cli_err = CliError::from(io_err);
        assert!(matches!(cli_err, CliError::Io(_)));
    }
}
