//! Error types for opening and migrating databases.

use std::path::PathBuf;

use tinytable_core::SchemaError;

/// Errors that can occur while creating or upgrading a database.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// Malformed schema declaration.
    #[error("Invalid schema: {0}")]
    Schema(#[from] SchemaError),

    /// Malformed helper or connection configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The stored version is newer than the declared one.
    #[error("Downgrade from version {old} to {new} is not supported")]
    Downgrade {
        /// Version stored in the database.
        old: u32,
        /// Version declared by the helper.
        new: u32,
    },

    /// The database reports a version the driver cannot interpret.
    #[error("Invalid database state: {0}")]
    InvalidState(String),

    /// The old and new shapes of a table share no column.
    #[error("Table '{table}' shares no column with its previous version")]
    NoCommonColumns {
        /// Table being migrated.
        table: String,
    },

    /// Rows left referencing missing parents after creation or upgrade.
    #[error("{count} row(s) violate FOREIGN KEY constraints, first in table '{table}'")]
    ForeignKeyViolation {
        /// Number of violating rows.
        count: usize,
        /// Table holding the first violating row.
        table: String,
    },

    /// Database error during creation, step replay or diff migration.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// IO error (reading schema files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse a schema file.
    #[error("Failed to parse schema file '{path}': {source}")]
    SchemaFile {
        /// Path to the schema file.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_json::Error,
    },
}

/// Result type for migration operations.
pub type Result<T> = std::result::Result<T, MigrateError>;
