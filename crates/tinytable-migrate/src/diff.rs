//! Diff migration: rebuild a table to its latest declared shape.
//!
//! SQLite cannot alter most column properties in place, so the table is
//! renamed to a temporary name, recreated from the current declaration, the
//! columns common to both shapes are copied over, and the temporary table is
//! dropped. Columns keep the order they had in the old table.

use chrono::Utc;
use sqlx::SqliteConnection;
use tinytable_core::{ddl, Table};
use tracing::{debug, info, warn};

use crate::error::{MigrateError, Result};

/// A column as reported by `pragma_table_info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingColumn {
    /// Column name.
    pub name: String,
    /// Declared type, as written in the original `CREATE TABLE`.
    pub declared_type: String,
}

/// What [`diff_migrate`] did to a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffOutcome {
    /// The table did not exist and was created.
    Created,
    /// The table was rebuilt; these columns were copied.
    Rebuilt {
        /// Surviving columns, in old-table order.
        copied: Vec<String>,
    },
}

/// Returns whether a table named `name` exists.
pub async fn table_exists(conn: &mut SqliteConnection, name: &str) -> Result<bool> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1")
            .bind(name)
            .fetch_one(&mut *conn)
            .await?;
    Ok(count > 0)
}

/// Reads the columns of table `name`, in table order.
pub async fn existing_columns(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<Vec<ExistingColumn>> {
    let rows: Vec<(String, String)> =
        sqlx::query_as("SELECT name, type FROM pragma_table_info(?1) ORDER BY cid")
            .bind(name)
            .fetch_all(&mut *conn)
            .await?;
    Ok(rows
        .into_iter()
        .map(|(name, declared_type)| ExistingColumn {
            name,
            declared_type,
        })
        .collect())
}

/// Returns the old columns that the new declaration still has, in old order.
///
/// Names match ASCII case-insensitively, as SQLite identifiers do. A surviving column whose declared type changed is logged; the copy still
/// goes through and SQLite's type affinity decides the stored value.
#[must_use]
pub fn surviving_columns(old: &[ExistingColumn], table: &Table) -> Vec<String> {
    old.iter()
        .filter_map(|existing| {
            let column = table
                .columns()
                .iter()
                .find(|c| !c.is_constraint() && c.name().eq_ignore_ascii_case(&existing.name))?;
            let declared = column.sql_type().to_sql();
            if !declared.eq_ignore_ascii_case(&existing.declared_type) {
                warn!(
                    table = table.name(),
                    column = %existing.name,
                    old_type = %existing.declared_type,
                    new_type = %declared,
                    "Column type changed, copied values follow SQLite type affinity"
                );
            }
            Some(existing.name.clone())
        })
        .collect()
}

/// Returns a temporary name for the old copy of `table`.
#[must_use]
pub fn temp_table_name(table: &str) -> String {
    format!("tmp_old_{table}_{}", Utc::now().timestamp_millis())
}

async fn execute(conn: &mut SqliteConnection, sql: &str) -> Result<()> {
    debug!(sql = %sql, "Executing SQL");
    sqlx::query(sql).execute(&mut *conn).await?;
    Ok(())
}

/// Rebuilds `table` to match its declaration, keeping common columns.
///
/// A table missing from the database is simply created.
///
/// # Errors
///
/// [`MigrateError::NoCommonColumns`] if the old and new shapes share no
/// column (checked before anything is modified), or any engine error.
pub async fn diff_migrate(conn: &mut SqliteConnection, table: &Table) -> Result<DiffOutcome> {
    let name = table.name();
    if !table_exists(conn, name).await? {
        info!(table = name, "Creating table missing from previous version");
        execute(conn, &table.create_sql()).await?;
        return Ok(DiffOutcome::Created);
    }

    let old = existing_columns(conn, name).await?;
    let copied = surviving_columns(&old, table);
    if copied.is_empty() {
        return Err(MigrateError::NoCommonColumns {
            table: name.to_string(),
        });
    }

    let tmp = temp_table_name(name);
    info!(table = name, tmp = %tmp, columns = ?copied, "Rebuilding table");

    execute(conn, &ddl::rename_table_sql(name, &tmp)).await?;
    execute(conn, &table.create_sql()).await?;
    execute(conn, &ddl::copy_rows_sql(name, &tmp, &copied)?).await?;
    execute(conn, &ddl::drop_table_sql(&tmp)).await?;

    Ok(DiffOutcome::Rebuilt { copied })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinytable_core::{integer, text};

    fn existing(name: &str, declared_type: &str) -> ExistingColumn {
        ExistingColumn {
            name: name.to_string(),
            declared_type: declared_type.to_string(),
        }
    }

    #[test]
    fn test_surviving_columns_keep_old_order() {
        let table = Table::new("t", text("b"), [integer("a"), text("c")]).unwrap();
        let old = vec![
            existing("a", "INTEGER"),
            existing("gone", "TEXT"),
            existing("b", "TEXT"),
        ];
        assert_eq!(surviving_columns(&old, &table), vec!["a", "b"]);
    }

    #[test]
    fn test_surviving_columns_ignore_constraints() {
        let table = Table::new(
            "t",
            integer("id"),
            [tinytable_core::Column::primary_key_of(["id"])],
        )
        .unwrap();
        let old = vec![existing("PRIMARY KEY", ""), existing("id", "integer")];
        assert_eq!(surviving_columns(&old, &table), vec!["id"]);
    }

    #[test]
    fn test_surviving_columns_ignore_case() {
        let table = Table::new("t", integer("id"), [text("Label")]).unwrap();
        let old = vec![existing("ID", "INTEGER"), existing("label", "TEXT")];
        assert_eq!(surviving_columns(&old, &table), vec!["ID", "label"]);
    }

    #[test]
    fn test_temp_table_name() {
        let tmp = temp_table_name("add_column");
        assert!(tmp.starts_with("tmp_old_add_column_"));
        assert!(tinytable_core::schema::validate_identifier(&tmp).is_ok());
    }
}
