//! Error types for schema declarations.

/// Errors raised while declaring a table schema.
///
/// All of these are configuration errors: they are reported when a
/// [`Table`](crate::Table) is constructed, before any DDL can be generated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// The table name is empty.
    #[error("Table name must not be empty")]
    EmptyTableName,

    /// A table was declared without any column.
    #[error("Table '{0}' must declare at least one column")]
    NoColumns(String),

    /// A column name is empty.
    #[error("Column name must not be empty in table '{table}'")]
    EmptyColumnName {
        /// Table declaring the column.
        table: String,
    },

    /// A composite key or reference lists no column.
    #[error("{constraint} in table '{table}' must name at least one column")]
    EmptyKeyList {
        /// Table declaring the constraint.
        table: String,
        /// Constraint keyword (`PRIMARY KEY`, `UNIQUE`, `FOREIGN KEY`).
        constraint: String,
    },

    /// A constraint pseudo-column does not carry its keyword as name.
    #[error("Constraint '{name}' in table '{table}' must be named {expected}")]
    MisnamedConstraint {
        /// Table declaring the constraint.
        table: String,
        /// Name the constraint was given.
        name: String,
        /// Accepted name(s).
        expected: String,
    },

    /// A name is not a plain SQL identifier.
    #[error("'{0}' is not a valid identifier")]
    InvalidIdentifier(String),

    /// A row copy was requested with an empty column list.
    #[error("No column to copy from '{source_table}' into '{target}'")]
    NothingToCopy {
        /// Table receiving the rows.
        target: String,
        /// Table the rows come from.
        source_table: String,
    },

    /// Two data columns share the same name.
    #[error("Column '{column}' is declared twice in table '{table}'")]
    DuplicateColumn {
        /// Table declaring the columns.
        table: String,
        /// The repeated column name.
        column: String,
    },
}

/// Result type for schema declarations.
pub type Result<T> = std::result::Result<T, SchemaError>;
