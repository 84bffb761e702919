//! Migration file rendering and directory management.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::info;

use crate::error::{MigrateError, MigrateResult};
use crate::migration::Migration;

/// Render a migration as a single SQL file with an up section and a
/// down section, each wrapped in its own transaction.
pub fn render_migration(migration: &Migration) -> String {
    let mut out = String::new();
    out.push_str(&format!("-- Migration: {}\n", migration.description));
    out.push_str(&format!("-- Version: {}\n", migration.version));
    out.push_str(&format!("-- Generated: {}\n\n", migration.timestamp.to_rfc3339()));

    out.push_str("-- Up Migration\n");
    out.push_str("BEGIN;\n\n");
    for step in &migration.steps {
        out.push_str(&step.sql);
        out.push_str("\n\n");
    }
    out.push_str("COMMIT;\n\n");

    out.push_str("-- Down Migration\n");
    out.push_str("BEGIN;\n\n");
    for step in migration.steps.iter().rev() {
        out.push_str(&step.rollback_sql);
        out.push_str("\n\n");
    }
    out.push_str("COMMIT;\n");

    out
}

/// The on-disk name for a migration: `<version>_<description>.sql` with
/// whitespace in the description collapsed to underscores.
pub fn migration_file_name(migration: &Migration) -> String {
    let slug: String = migration
        .description
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    format!("{}_{slug}.sql", migration.version)
}

/// Split a migration file name into its version and description parts.
pub fn parse_migration_name(file_name: &str) -> MigrateResult<(String, String)> {
    let stem = file_name
        .strip_suffix(".sql")
        .ok_or_else(|| MigrateError::invalid_file_name(file_name))?;
    let mut parts = stem.splitn(2, '_');
    let version = parts
        .next()
        .filter(|v| v.len() == 14 && v.chars().all(|c| c.is_ascii_digit()))
        .ok_or_else(|| MigrateError::invalid_file_name(file_name))?;
    let name = parts
        .next()
        .ok_or_else(|| MigrateError::invalid_file_name(file_name))?;
    Ok((version.to_string(), name.to_string()))
}

/// Reads and writes migration files under a single directory.
pub struct MigrationFileManager {
    dir: PathBuf,
}

impl MigrationFileManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write a migration file, creating the directory if needed.
    /// Returns the path written.
    pub async fn write_migration(&self, migration: &Migration) -> MigrateResult<PathBuf> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| MigrateError::file_io("failed to create migrations directory", e))?;

        let path = self.dir.join(migration_file_name(migration));
        fs::write(&path, render_migration(migration))
            .await
            .map_err(|e| MigrateError::file_io("failed to write migration file", e))?;

        info!(path = %path.display(), "wrote migration");
        Ok(path)
    }

    /// List migration files sorted by version. Non-migration files in
    /// the directory are skipped.
    pub async fn list_migrations(&self) -> MigrateResult<Vec<(String, String, PathBuf)>> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(MigrateError::file_io("failed to read migrations directory", e)),
        };

        let mut migrations = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| MigrateError::file_io("failed to read directory entry", e))?
        {
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if let Ok((version, name)) = parse_migration_name(&file_name) {
                migrations.push((version, name, entry.path()));
            }
        }

        migrations.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(migrations)
    }

    pub async fn read_migration(&self, path: &Path) -> MigrateResult<String> {
        fs::read_to_string(path)
            .await
            .map_err(|e| MigrateError::file_io("failed to read migration file", e))
    }
}
