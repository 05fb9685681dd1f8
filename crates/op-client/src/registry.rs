//! Registry loading with built-in fallback.

use std::fmt;

use op_schema::SchemaRegistry;
use serde::Serialize;
use tracing::{debug, warn};

use crate::traits::RegistrySource;

/// Where the active registry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistryOrigin {
    /// Fetched from the registry source.
    Remote,
    /// The built-in fallback set.
    Builtin,
}

impl fmt::Display for RegistryOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote => f.write_str("remote"),
            Self::Builtin => f.write_str("builtin"),
        }
    }
}

/// Fetch the registry from `source`, substituting the built-in set when the
/// source fails or returns no types.
///
/// Never fails; the origin tells the caller which set is active.
pub async fn load_registry<S>(source: &S) -> (SchemaRegistry, RegistryOrigin)
where
    S: RegistrySource + ?Sized,
{
    match source.fetch_types().await {
        Ok(registry) if !registry.is_empty() => {
            debug!(types = registry.len(), "using remote connector types");
            (registry, RegistryOrigin::Remote)
        }
        Ok(_) => {
            warn!("registry source returned no connector types, using built-in set");
            (SchemaRegistry::builtin(), RegistryOrigin::Builtin)
        }
        Err(e) => {
            warn!(error = %e, "failed to fetch connector types, using built-in set");
            (SchemaRegistry::builtin(), RegistryOrigin::Builtin)
        }
    }
}
