//! Table declarations.

use core::fmt;
use std::collections::HashSet;

use super::column::{Column, FOREIGN_KEY, PRIMARY_KEY, UNIQUE};
use super::types::SqlType;
use crate::ddl;
use crate::error::{Result, SchemaError};

/// A validated table declaration: a name and a non-empty ordered list of
/// columns.
///
/// Column order is preserved and determines the column order of the
/// generated DDL.
///
/// # Example
///
/// ```rust
/// use tinytable_core::{Column, Table, integer, text};
///
/// let table = Table::new(
///     "example2",
///     integer("id").not_null(),
///     vec![text("val"), Column::primary_key_of(["id", "val"])],
/// )
/// .unwrap();
///
/// assert_eq!(
///     table.create_sql(),
///     "CREATE TABLE example2(id INTEGER NOT NULL, val TEXT, PRIMARY KEY (id,val))"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawTable", into = "RawTable"))]
pub struct Table {
    name: String,
    columns: Vec<Column>,
}

impl Table {
    /// Creates a table from one required column plus a possibly-empty rest.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] if the table name, a column name or a key
    /// list is invalid, or if a column name is declared twice.
    pub fn new(
        name: impl Into<String>,
        first: Column,
        rest: impl IntoIterator<Item = Column>,
    ) -> Result<Self> {
        let columns = core::iter::once(first).chain(rest).collect();
        Self::from_columns(name, columns)
    }

    /// Creates a table from a column list.
    ///
    /// # Errors
    ///
    /// Same as [`Table::new`], and [`SchemaError::NoColumns`] if `columns`
    /// is empty.
    pub fn from_columns(name: impl Into<String>, columns: Vec<Column>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(SchemaError::EmptyTableName);
        }
        validate_identifier(&name)?;
        if columns.is_empty() {
            return Err(SchemaError::NoColumns(name));
        }

        {
            let mut seen = HashSet::new();
            for column in &columns {
                validate_column(&name, column)?;
                if !column.is_constraint() && !seen.insert(column.name()) {
                    return Err(SchemaError::DuplicateColumn {
                        table: name.clone(),
                        column: column.name().to_string(),
                    });
                }
            }
        }

        Ok(Self { name, columns })
    }

    /// Returns the table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns all columns, pseudo-columns included, in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the names of the data columns, in declaration order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(|c| !c.is_constraint())
            .map(Column::name)
    }

    /// Looks up a data column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| !c.is_constraint() && c.name() == name)
    }

    /// Returns `CREATE TABLE <name>(...)`.
    #[must_use]
    pub fn create_sql(&self) -> String {
        ddl::create_table_sql(self)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.create_sql())
    }
}

fn validate_column(table: &str, column: &Column) -> Result<()> {
    let keys: &[String] = match column.sql_type() {
        SqlType::KeyList(keys) => {
            if column.name() != PRIMARY_KEY && column.name() != UNIQUE {
                return Err(misnamed(table, column, "PRIMARY KEY or UNIQUE"));
            }
            keys
        }
        SqlType::Reference(fk) => {
            if column.name() != FOREIGN_KEY {
                return Err(misnamed(table, column, FOREIGN_KEY));
            }
            validate_identifier(&fk.column)?;
            validate_identifier(&fk.table)?;
            return validate_identifier(&fk.ref_column);
        }
        _ => {
            if column.name().is_empty() {
                return Err(SchemaError::EmptyColumnName {
                    table: table.to_string(),
                });
            }
            return validate_identifier(column.name());
        }
    };

    if keys.is_empty() {
        return Err(SchemaError::EmptyKeyList {
            table: table.to_string(),
            constraint: column.name().to_string(),
        });
    }
    keys.iter().try_for_each(|key| validate_identifier(key))
}

fn misnamed(table: &str, column: &Column, expected: &str) -> SchemaError {
    SchemaError::MisnamedConstraint {
        table: table.to_string(),
        name: column.name().to_string(),
        expected: expected.to_string(),
    }
}

/// Checks that `name` is a plain identifier: an ASCII letter or `_`
/// followed by ASCII alphanumerics or `_`.
///
/// # Errors
///
/// Returns [`SchemaError::InvalidIdentifier`] otherwise.
pub fn validate_identifier(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(SchemaError::InvalidIdentifier(name.to_string()))
    }
}

/// Unvalidated wire form of a [`Table`].
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct RawTable {
    name: String,
    columns: Vec<Column>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawTable> for Table {
    type Error = SchemaError;

    fn try_from(raw: RawTable) -> Result<Self> {
        Self::from_columns(raw.name, raw.columns)
    }
}

#[cfg(feature = "serde")]
impl From<Table> for RawTable {
    fn from(table: Table) -> Self {
        Self {
            name: table.name,
            columns: table.columns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::column::{integer, text};

    #[test]
    fn test_rejects_empty_name() {
        let err = Table::new("", integer("id"), []).unwrap_err();
        assert_eq!(err, SchemaError::EmptyTableName);
    }

    #[test]
    fn test_rejects_empty_column_list() {
        let err = Table::from_columns("t", vec![]).unwrap_err();
        assert_eq!(err, SchemaError::NoColumns("t".into()));
    }

    #[test]
    fn test_rejects_empty_column_name() {
        let err = Table::new("t", text(""), []).unwrap_err();
        assert!(matches!(err, SchemaError::EmptyColumnName { .. }));
    }

    #[test]
    fn test_rejects_empty_key_list() {
        let err = Table::new("t", integer("id"), [Column::unique_of(Vec::<String>::new())])
            .unwrap_err();
        assert!(matches!(err, SchemaError::EmptyKeyList { .. }));
    }

    #[test]
    fn test_constraint_must_carry_its_keyword() {
        let key_list = Column::new(
            "id INTEGER); DROP TABLE victim; --",
            SqlType::KeyList(vec!["id".into()]),
            [],
        );
        let err = Table::new("t", integer("id"), [key_list]).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::MisnamedConstraint { ref name, .. } if name.starts_with("id INTEGER")
        ));

        let unique_as_fk = Column::new(FOREIGN_KEY, SqlType::KeyList(vec!["id".into()]), []);
        assert!(matches!(
            Table::new("t", integer("id"), [unique_as_fk]).unwrap_err(),
            SchemaError::MisnamedConstraint { .. }
        ));

        let reference = Column::new(
            UNIQUE,
            SqlType::Reference(crate::schema::ForeignKeyRef {
                column: "id".into(),
                table: "p".into(),
                ref_column: "id".into(),
            }),
            [],
        );
        assert!(matches!(
            Table::new("t", integer("id"), [reference]).unwrap_err(),
            SchemaError::MisnamedConstraint { ref expected, .. } if expected == FOREIGN_KEY
        ));

        assert!(Table::new("t", integer("id"), [Column::unique_of(["id"])]).is_ok());
    }

    #[test]
    fn test_rejects_duplicate_columns() {
        let err = Table::new("t", integer("id"), [text("id")]).unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateColumn {
                table: "t".into(),
                column: "id".into(),
            }
        );
    }

    #[test]
    fn test_allows_repeated_constraints() {
        let table = Table::new(
            "t",
            integer("a"),
            [
                integer("b"),
                Column::unique_of(["a"]),
                Column::unique_of(["b"]),
            ],
        );
        assert!(table.is_ok());
    }

    #[test]
    fn test_rejects_bad_identifiers() {
        assert!(validate_identifier("ok_name1").is_ok());
        assert!(validate_identifier("_x").is_ok());
        assert!(validate_identifier("1abc").is_err());
        assert!(validate_identifier("a b").is_err());
        assert!(validate_identifier("a;DROP").is_err());
        assert!(Table::new("bad name", integer("id"), []).is_err());
    }

    #[test]
    fn test_column_names_skip_constraints() {
        let table = Table::new(
            "example2",
            integer("id"),
            [text("val"), Column::primary_key_of(["id", "val"])],
        )
        .unwrap();
        let names: Vec<&str> = table.column_names().collect();
        assert_eq!(names, vec!["id", "val"]);
        assert!(table.column("val").is_some());
        assert!(table.column("PRIMARY KEY").is_none());
    }
}
