//! Connector records, drafts and test outcomes as exchanged with the backend.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Connector configuration: field key to entered value.
pub type ConfigMap = Map<String, Value>;

/// Identifier assigned by the persistence collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectorId(u64);

impl ConnectorId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ConnectorId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Connection health as last reported by the test collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorStatus {
    /// Last test succeeded.
    Active,
    /// Never tested, or not in use.
    #[default]
    Inactive,
    /// Last test failed.
    Error,
}

impl ConnectorStatus {
    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for ConnectorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An assembled, validated candidate record pending persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorDraft {
    /// Connector name.
    pub name: String,
    /// Optional free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Connector type identifier.
    #[serde(rename = "type")]
    pub connector_type: String,
    /// Configuration values keyed by field key.
    pub config: ConfigMap,
}

/// A persisted connector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorRecord {
    /// Identifier assigned on first save.
    pub id: ConnectorId,
    /// Connector name.
    pub name: String,
    /// Optional free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Connector type identifier.
    #[serde(rename = "type")]
    pub connector_type: String,
    /// Configuration values. The backend's list endpoint omits them.
    #[serde(default)]
    pub config: ConfigMap,
    /// Connection health.
    #[serde(default)]
    pub status: ConnectorStatus,
    /// When the connection was last tested.
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub last_tested: Option<DateTime<Utc>>,
    /// When the record was created.
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ConnectorRecord {
    /// Persist a draft under a freshly assigned id.
    ///
    /// New records always start out `inactive` and untested.
    #[must_use]
    pub fn from_draft(id: ConnectorId, draft: ConnectorDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            connector_type: draft.connector_type,
            config: draft.config,
            status: ConnectorStatus::Inactive,
            last_tested: None,
            created_at: Some(created_at),
        }
    }

    /// Replace the editable parts of the record with a draft.
    ///
    /// `id`, `status`, `last_tested`, `created_at` and the connector type are
    /// preserved.
    pub fn apply_draft(&mut self, draft: ConnectorDraft) {
        self.name = draft.name;
        self.description = draft.description;
        self.config = draft.config;
    }
}

/// Outcome of a connection test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionTestResult {
    /// Whether the connection could be established.
    pub success: bool,
    /// Collaborator message.
    pub message: String,
    /// Status the record moved to, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ConnectorStatus>,
}

/// Record counts broken down by status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConnectorSummary {
    /// Number of records.
    pub total: usize,
    /// Number of active records.
    pub active: usize,
    /// Number of inactive records.
    pub inactive: usize,
    /// Number of records in error.
    pub error: usize,
}

impl ConnectorSummary {
    /// Count one record with the given status.
    pub fn add(&mut self, status: ConnectorStatus) {
        self.total += 1;
        match status {
            ConnectorStatus::Active => self.active += 1,
            ConnectorStatus::Inactive => self.inactive += 1,
            ConnectorStatus::Error => self.error += 1,
        }
    }

    /// Summarize a list of records.
    #[must_use]
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a ConnectorRecord>,
    {
        let mut summary = Self::default();
        for record in records {
            summary.add(record.status);
        }
        summary
    }
}

mod timestamp {
    use super::{DateTime, Deserialize, Deserializer, NaiveDateTime, Utc};

    /// Accepts RFC 3339 timestamps and the offset-less form the backend
    /// emits for UTC columns.
    pub(super) fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };

        if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(Some(ts.with_timezone(&Utc)));
        }
        NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| Some(naive.and_utc()))
            .map_err(serde::de::Error::custom)
    }
}
