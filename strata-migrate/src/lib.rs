//! Schema diffing and migration generation for PostgreSQL.
//!
//! Takes two [`Schema`](strata_schema::Schema) snapshots, computes the
//! structural differences per object kind, and renders each difference
//! as a forward SQL statement paired with its exact inverse. The
//! resulting [`Migration`] can be written to a SQL file or applied
//! through the [`MigrationRunner`].
//!
//! ```
//! use strata_schema::parse_schema;
//! use strata_migrate::{MigrationOptions, generate_migration_from_diff};
//!
//! let from = parse_schema("model User { id UUID @id }").unwrap();
//! let to = parse_schema("model User { id UUID @id\nemail TEXT @unique }").unwrap();
//!
//! let migration =
//!     generate_migration_from_diff(&from, &to, &MigrationOptions::default()).unwrap();
//! assert_eq!(migration.steps.len(), 1);
//! assert!(migration.steps[0].sql.contains("ADD COLUMN \"email\""));
//! ```

pub mod config;
pub mod diff;
pub mod engine;
pub mod error;
pub mod file;
pub mod generator;
pub mod history;
pub mod migration;
pub mod resolve;
pub mod sql;
pub mod state;
pub mod steps;

pub use config::MigrateConfig;
pub use diff::{Diff, Updated, diff_by_key};
pub use engine::{MigrationRunner, SqlExecutor};
pub use error::{MigrateError, MigrateResult};
pub use file::{MigrationFileManager, migration_file_name, parse_migration_name, render_migration};
pub use generator::{
    MigrationOptions, generate_migration, generate_migration_from_diff,
    generate_rollback_migration,
};
pub use history::{InMemoryHistory, MigrationHistory, MigrationRecord, POSTGRES_INIT_SQL};
pub use migration::{Migration, MigrationStep, ObjectKind, StepKind};
pub use resolve::creation_order;
pub use sql::PostgresSqlGenerator;
pub use state::SchemaStateManager;
