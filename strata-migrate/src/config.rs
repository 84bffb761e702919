//! Project configuration.
//!
//! Loaded from a `strata.toml` at the project root:
//!
//! ```toml
//! schema = "schema.strata"
//! migrations_dir = "migrations"
//! state_path = ".strata/state.json"
//! schema_name = "public"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MigrateError, MigrateResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrateConfig {
    /// Path to the schema source file.
    pub schema: PathBuf,
    /// Directory migration files are written to.
    pub migrations_dir: PathBuf,
    /// Where the previous schema snapshot is stored.
    pub state_path: PathBuf,
    /// Target database schema.
    pub schema_name: String,
}

impl Default for MigrateConfig {
    fn default() -> Self {
        Self {
            schema: PathBuf::from("schema.strata"),
            migrations_dir: PathBuf::from("migrations"),
            state_path: PathBuf::from(".strata/state.json"),
            schema_name: "public".to_string(),
        }
    }
}

impl MigrateConfig {
    pub fn from_file(path: impl AsRef<Path>) -> MigrateResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            MigrateError::config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> MigrateResult<Self> {
        toml::from_str(text).map_err(|e| MigrateError::config(e.to_string()))
    }

    pub fn with_schema(mut self, schema: impl Into<PathBuf>) -> Self {
        self.schema = schema.into();
        self
    }

    pub fn with_migrations_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.migrations_dir = dir.into();
        self
    }

    pub fn with_schema_name(mut self, name: impl Into<String>) -> Self {
        self.schema_name = name.into();
        self
    }
}
