//! Migration steps and the migration container.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a step does to its object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Create,
    Alter,
    Drop,
}

/// The kind of database object a step targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Extension,
    Enum,
    Table,
    Constraint,
    Index,
    Rls,
    Policy,
    Role,
    Trigger,
}

/// A single migration step: forward SQL plus the exact inverse that
/// undoes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationStep {
    pub kind: StepKind,
    pub object: ObjectKind,
    /// Object identity, used for naming and rollback lookup.
    pub name: String,
    pub sql: String,
    pub rollback_sql: String,
}

impl MigrationStep {
    pub fn new(
        kind: StepKind,
        object: ObjectKind,
        name: impl Into<String>,
        sql: impl Into<String>,
        rollback_sql: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            object,
            name: name.into(),
            sql: sql.into(),
            rollback_sql: rollback_sql.into(),
        }
    }

    /// A copy with `sql` and `rollback_sql` swapped.
    pub fn inverted(&self) -> Self {
        Self {
            kind: self.kind,
            object: self.object,
            name: self.name.clone(),
            sql: self.rollback_sql.clone(),
            rollback_sql: self.sql.clone(),
        }
    }
}

/// An ordered set of steps with a version and description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Migration {
    /// 14-digit timestamp version, e.g. `20240115093000`.
    pub version: String,
    pub description: String,
    pub steps: Vec<MigrationStep>,
    pub timestamp: DateTime<Utc>,
}

impl Migration {
    /// Create a migration versioned from the current time.
    pub fn new(description: impl Into<String>, steps: Vec<MigrationStep>) -> Self {
        let timestamp = Utc::now();
        Self {
            version: version_from(timestamp),
            description: description.into(),
            steps,
            timestamp,
        }
    }

    /// Create a migration with an explicit timestamp.
    pub fn at(
        timestamp: DateTime<Utc>,
        description: impl Into<String>,
        steps: Vec<MigrationStep>,
    ) -> Self {
        Self {
            version: version_from(timestamp),
            description: description.into(),
            steps,
            timestamp,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The rollback of this migration: steps reversed, `sql` and
    /// `rollback_sql` swapped.
    pub fn rollback(&self) -> Migration {
        let steps = self.steps.iter().rev().map(MigrationStep::inverted).collect();
        Migration {
            version: self.version.clone(),
            description: format!("rollback {}", self.description),
            steps,
            timestamp: self.timestamp,
        }
    }
}

/// Render a timestamp as a 14-digit version string.
pub fn version_from(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y%m%d%H%M%S").to_string()
}
