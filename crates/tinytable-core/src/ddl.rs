//! DDL text generation.
//!
//! Everything here is pure string formatting. Identifiers are emitted bare,
//! they are validated when a [`Table`] is constructed. String literals go
//! through [`escape_string`].

use crate::error::{Result, SchemaError};
use crate::schema::{Column, Table};

/// Wraps `value` in single quotes, doubling any embedded single quote.
///
/// ```rust
/// use tinytable_core::ddl::escape_string;
///
/// assert_eq!(escape_string("it's"), "'it''s'");
/// ```
#[must_use]
pub fn escape_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('\'');
    for c in value.chars() {
        if c == '\'' {
            escaped.push('\'');
        }
        escaped.push(c);
    }
    escaped.push('\'');
    escaped
}

/// Renders one column clause: `<name> <type>[ <attr> <attr> ...]`.
#[must_use]
pub fn column_sql(column: &Column) -> String {
    let mut sql = format!("{} {}", column.name(), column.sql_type());
    for attribute in column.attributes() {
        sql.push(' ');
        sql.push_str(&attribute.to_sql());
    }
    sql
}

/// Renders `CREATE TABLE <name>(<col>, <col>, ...)`.
#[must_use]
pub fn create_table_sql(table: &Table) -> String {
    let col_defs: Vec<String> = table.columns().iter().map(column_sql).collect();
    format!("CREATE TABLE {}({})", table.name(), col_defs.join(", "))
}

/// Renders `ALTER TABLE <table> ADD <col>`.
#[must_use]
pub fn add_column_sql(table_name: &str, column: &Column) -> String {
    format!("ALTER TABLE {table_name} ADD {}", column_sql(column))
}

/// Renders `ALTER TABLE <old> RENAME TO <new>`.
#[must_use]
pub fn rename_table_sql(old_name: &str, new_name: &str) -> String {
    format!("ALTER TABLE {old_name} RENAME TO {new_name}")
}

/// Renders `DROP TABLE <name>`.
#[must_use]
pub fn drop_table_sql(name: &str) -> String {
    format!("DROP TABLE {name}")
}

/// Renders `INSERT INTO <target> (<cols>) SELECT <cols> FROM <source>`.
///
/// # Errors
///
/// Returns [`SchemaError::NothingToCopy`] when `columns` is empty, since
/// the statement would not be valid SQL.
pub fn copy_rows_sql<S: AsRef<str>>(target: &str, source: &str, columns: &[S]) -> Result<String> {
    if columns.is_empty() {
        return Err(SchemaError::NothingToCopy {
            target: target.to_string(),
            source_table: source.to_string(),
        });
    }
    let list = columns
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(", ");
    Ok(format!(
        "INSERT INTO {target} ({list}) SELECT {list} FROM {source}"
    ))
}
