//! The migration runner.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::{MigrateError, MigrateResult};
use crate::history::{MigrationHistory, MigrationRecord};
use crate::migration::Migration;

/// Executes SQL against a database. Implementations wrap a concrete
/// driver; the runner only needs statements and transaction control.
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    async fn execute(&self, sql: &str) -> MigrateResult<()>;
    async fn begin(&self) -> MigrateResult<()>;
    async fn commit(&self) -> MigrateResult<()>;
    async fn rollback(&self) -> MigrateResult<()>;
}

/// Applies migrations in version order, one transaction per migration.
///
/// Concurrent runners against the same database are not coordinated
/// here; callers needing that must hold an external advisory lock.
pub struct MigrationRunner<E, H> {
    executor: E,
    history: H,
    dry_run: bool,
}

impl<E: SqlExecutor, H: MigrationHistory> MigrationRunner<E, H> {
    pub fn new(executor: E, history: H) -> Self {
        Self {
            executor,
            history,
            dry_run: false,
        }
    }

    /// Report steps without executing anything.
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    /// The subset of `migrations` not yet applied, sorted by version.
    pub async fn pending<'a>(
        &self,
        migrations: &'a [Migration],
    ) -> MigrateResult<Vec<&'a Migration>> {
        let applied = self.history.applied_versions().await?;
        let mut pending: Vec<&Migration> = migrations
            .iter()
            .filter(|m| !applied.contains(&m.version))
            .collect();
        pending.sort_by(|a, b| a.version.cmp(&b.version));
        Ok(pending)
    }

    /// Apply all pending migrations. Returns the versions applied, in
    /// order. Nothing counts as applied until its whole transaction
    /// commits: a failure mid-migration rolls that migration back and
    /// returns with the already-committed versions intact in history.
    pub async fn apply(&self, migrations: &[Migration]) -> MigrateResult<Vec<String>> {
        self.history.init().await?;
        let pending = self.pending(migrations).await?;

        if self.dry_run {
            for migration in &pending {
                info!(
                    version = %migration.version,
                    steps = migration.steps.len(),
                    "dry run: would apply"
                );
            }
            return Ok(pending.iter().map(|m| m.version.clone()).collect());
        }

        let mut applied = Vec::new();
        for migration in pending {
            self.apply_one(migration).await?;
            applied.push(migration.version.clone());
        }
        Ok(applied)
    }

    async fn apply_one(&self, migration: &Migration) -> MigrateResult<()> {
        info!(
            version = %migration.version,
            description = %migration.description,
            steps = migration.steps.len(),
            "applying migration"
        );

        self.executor.begin().await?;
        for step in &migration.steps {
            if let Err(e) = self.executor.execute(&step.sql).await {
                warn!(version = %migration.version, step = %step.name, "step failed, rolling back");
                self.executor.rollback().await?;
                return Err(MigrateError::execution(&migration.version, e.to_string()));
            }
        }

        let record = MigrationRecord::from_migration(migration);
        if let Err(e) = self.history.record_applied(&record).await {
            self.executor.rollback().await?;
            return Err(e);
        }
        self.executor.commit().await?;
        Ok(())
    }

    /// Undo one applied migration: runs its rollback steps in a single
    /// transaction, then removes it from history.
    pub async fn rollback(&self, migration: &Migration) -> MigrateResult<()> {
        if self.dry_run {
            info!(version = %migration.version, "dry run: would roll back");
            return Ok(());
        }

        info!(version = %migration.version, "rolling back migration");
        let rollback = migration.rollback();

        self.executor.begin().await?;
        for step in &rollback.steps {
            if let Err(e) = self.executor.execute(&step.sql).await {
                self.executor.rollback().await?;
                return Err(MigrateError::execution(&migration.version, e.to_string()));
            }
        }
        if let Err(e) = self.history.record_rolled_back(&migration.version).await {
            self.executor.rollback().await?;
            return Err(e);
        }
        self.executor.commit().await?;
        Ok(())
    }
}
