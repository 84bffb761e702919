//! Schema snapshot persistence.
//!
//! The previous schema snapshot is what diffs run against: it is saved
//! as JSON after each successful generation so the next run can diff
//! the edited schema file against it.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use strata_schema::Schema;

use crate::error::{MigrateError, MigrateResult};

/// Saves and loads schema snapshots at a fixed path.
pub struct SchemaStateManager {
    path: PathBuf,
}

impl SchemaStateManager {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn save(&self, schema: &Schema) -> MigrateResult<()> {
        let json = serde_json::to_string_pretty(schema)
            .map_err(|e| MigrateError::state(format!("failed to serialize snapshot: {e}")))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| MigrateError::file_io("failed to create state directory", e))?;
        }
        fs::write(&self.path, json)
            .await
            .map_err(|e| MigrateError::file_io("failed to write snapshot", e))?;

        debug!(path = %self.path.display(), "saved schema snapshot");
        Ok(())
    }

    /// Load the stored snapshot. Returns `None` when no snapshot exists
    /// yet, which callers treat as an empty previous schema.
    pub async fn load(&self) -> MigrateResult<Option<Schema>> {
        let json = match fs::read_to_string(&self.path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(MigrateError::file_io("failed to read snapshot", e)),
        };
        let schema = serde_json::from_str(&json)
            .map_err(|e| MigrateError::state(format!("failed to deserialize snapshot: {e}")))?;
        Ok(Some(schema))
    }
}
