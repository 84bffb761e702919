//! Error types for migration generation and execution.

use thiserror::Error;

/// Result type for migration operations.
pub type MigrateResult<T> = Result<T, MigrateError>;

/// Errors that can occur while generating or applying migrations.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Error from schema parsing.
    #[error(transparent)]
    Schema(#[from] strata_schema::SchemaError),

    /// No valid table creation order exists.
    #[error("Circular dependency detected for table {table}")]
    DependencyCycle { table: String },

    /// Failed to read or write a migration file.
    #[error("migration file error: {message}")]
    File {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// A migration file name does not follow `<version>_<name>.sql`.
    #[error("invalid migration file name: {name}")]
    InvalidFileName { name: String },

    /// Failed to serialize or deserialize a schema snapshot.
    #[error("schema state error: {message}")]
    State { message: String },

    /// Invalid configuration.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// The migration history store failed.
    #[error("migration history error: {message}")]
    History { message: String },

    /// SQL execution failed while applying a migration.
    #[error("failed to execute migration {version}: {message}")]
    Execution { version: String, message: String },
}

impl MigrateError {
    /// Create a dependency cycle error.
    pub fn dependency_cycle(table: impl Into<String>) -> Self {
        Self::DependencyCycle { table: table.into() }
    }

    /// Create a file error without an IO source.
    pub fn file(message: impl Into<String>) -> Self {
        Self::File {
            message: message.into(),
            source: None,
        }
    }

    /// Create a file error from an IO failure.
    pub fn file_io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::File {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create an invalid file name error.
    pub fn invalid_file_name(name: impl Into<String>) -> Self {
        Self::InvalidFileName { name: name.into() }
    }

    /// Create a schema state error.
    pub fn state(message: impl Into<String>) -> Self {
        Self::State { message: message.into() }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    /// Create a history store error.
    pub fn history(message: impl Into<String>) -> Self {
        Self::History { message: message.into() }
    }

    /// Create an execution error for a specific migration version.
    pub fn execution(version: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Execution {
            version: version.into(),
            message: message.into(),
        }
    }
}
