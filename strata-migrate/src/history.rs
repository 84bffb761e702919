//! Applied-migration bookkeeping.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::MigrateResult;
use crate::migration::Migration;

/// SQL that creates the bookkeeping table. Executed by history stores
/// on initialization.
pub const POSTGRES_INIT_SQL: &str = r#"CREATE TABLE IF NOT EXISTS "_strata_migrations" (
  "version" VARCHAR(14) NOT NULL PRIMARY KEY,
  "description" TEXT NOT NULL,
  "timestamp" TIMESTAMPTZ NOT NULL,
  "applied_at" TIMESTAMPTZ NOT NULL DEFAULT now()
);"#;

/// A row in the bookkeeping table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationRecord {
    pub version: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub applied_at: DateTime<Utc>,
}

impl MigrationRecord {
    pub fn from_migration(migration: &Migration) -> Self {
        Self {
            version: migration.version.clone(),
            description: migration.description.clone(),
            timestamp: migration.timestamp,
            applied_at: Utc::now(),
        }
    }
}

/// Store of which migrations have been applied. This is the sole source
/// of truth for what is pending.
#[async_trait]
pub trait MigrationHistory: Send + Sync {
    /// Create the bookkeeping table if it does not exist.
    async fn init(&self) -> MigrateResult<()>;

    /// Versions already applied, in ascending order.
    async fn applied_versions(&self) -> MigrateResult<Vec<String>>;

    /// Record a migration as applied.
    async fn record_applied(&self, record: &MigrationRecord) -> MigrateResult<()>;

    /// Remove a migration's record after rollback.
    async fn record_rolled_back(&self, version: &str) -> MigrateResult<()>;
}

/// In-memory history, for tests and dry runs.
#[derive(Default)]
pub struct InMemoryHistory {
    records: std::sync::Mutex<Vec<MigrationRecord>>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MigrateResult<std::sync::MutexGuard<'_, Vec<MigrationRecord>>> {
        self.records
            .lock()
            .map_err(|_| crate::error::MigrateError::history("history lock poisoned"))
    }
}

#[async_trait]
impl MigrationHistory for InMemoryHistory {
    async fn init(&self) -> MigrateResult<()> {
        Ok(())
    }

    async fn applied_versions(&self) -> MigrateResult<Vec<String>> {
        let mut versions: Vec<String> =
            self.lock()?.iter().map(|r| r.version.clone()).collect();
        versions.sort();
        Ok(versions)
    }

    async fn record_applied(&self, record: &MigrationRecord) -> MigrateResult<()> {
        self.lock()?.push(record.clone());
        Ok(())
    }

    async fn record_rolled_back(&self, version: &str) -> MigrateResult<()> {
        self.lock()?.retain(|r| r.version != version);
        Ok(())
    }
}
