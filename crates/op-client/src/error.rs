//! Error types for backend collaborators and the connector service.

use op_forms::{FieldErrors, FormError};
use op_schema::ConnectorId;
use thiserror::Error;

/// Errors raised by the registry, persistence and test collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The backend could not be reached.
    #[error("backend unavailable: {reason}")]
    Unavailable {
        /// Transport-level cause.
        reason: String,
    },

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message taken from the response body.
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("failed to decode response: {reason}")]
    Decode {
        /// Decoder message.
        reason: String,
    },

    /// Creating or updating a connector failed.
    #[error("failed to save connector: {message}")]
    UnhandledSave {
        /// Collaborator message.
        message: String,
    },

    /// No connector with this id exists.
    #[error("connector not found: {id}")]
    NotFound {
        /// The requested id.
        id: ConnectorId,
    },
}

impl ClientError {
    /// Create an unavailable error.
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Create a decode error.
    #[must_use]
    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode {
            reason: reason.into(),
        }
    }

    /// Create a save error.
    #[must_use]
    pub fn unhandled_save(message: impl Into<String>) -> Self {
        Self::UnhandledSave {
            message: message.into(),
        }
    }

    /// Fold any failure of a create or update call into [`ClientError::UnhandledSave`].
    #[must_use]
    pub fn into_save_error(self) -> Self {
        match self {
            Self::UnhandledSave { .. } => self,
            Self::Status { message, .. } => Self::unhandled_save(message),
            Self::Unavailable { reason } | Self::Decode { reason } => Self::unhandled_save(reason),
            Self::NotFound { id } => Self::unhandled_save(format!("Connector {id} not found")),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::decode(err.to_string())
        } else {
            Self::unavailable(err.to_string())
        }
    }
}

/// Result type alias for collaborator calls.
pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Errors raised while saving a form through [`crate::ConnectorService`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The form did not validate; nothing was sent.
    #[error(transparent)]
    Fields(#[from] FieldErrors),

    /// The persistence collaborator rejected the draft or could not supply
    /// the record to edit.
    #[error(transparent)]
    Save(#[from] ClientError),

    /// The form could not be built.
    #[error(transparent)]
    Form(#[from] FormError),
}
