//! # op-schema
//!
//! Connector type schemas for the OpenPoint integration platform.
//!
//! A connector type (SAP, Salesforce, a SQL database, ...) is described by a
//! [`TypeDescriptor`]: display metadata plus an ordered list of
//! [`FieldSpec`]s, one per configuration input. Descriptors are collected in a
//! read-only [`SchemaRegistry`], normally decoded from the backend's
//! `/connectors/types` payload and otherwise taken from the built-in set.
//!
//! ```
//! use op_schema::{FieldKind, SchemaRegistry};
//!
//! let registry = SchemaRegistry::builtin();
//! let db = registry.lookup("database")?;
//! assert_eq!(db.field("port").map(|f| f.kind), Some(FieldKind::Number));
//! assert!(registry.lookup("mainframe").is_err());
//! # Ok::<(), op_schema::SchemaError>(())
//! ```
//!
//! The crate also defines the records exchanged with the persistence
//! collaborator: [`ConnectorDraft`] (what a form produces) and
//! [`ConnectorRecord`] (what the backend stores).

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod builtin;
mod descriptor;
mod error;
mod field;
mod record;
mod registry;

pub use builtin::BUILTIN_TYPE_IDS;
pub use descriptor::{DESCRIPTION_KEY, IDENTITY_KEYS, NAME_KEY, TypeDescriptor};
pub use error::{SchemaError, SchemaResult};
pub use field::{FieldKind, FieldSpec};
pub use record::{
    ConfigMap, ConnectionTestResult, ConnectorDraft, ConnectorId, ConnectorRecord,
    ConnectorStatus, ConnectorSummary,
};
pub use registry::SchemaRegistry;
