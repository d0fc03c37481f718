//! Column declarations.
//!
//! A [`Column`] is a name, a [`SqlType`] and an ordered list of
//! [`Attribute`]s. Table-level constraints (composite primary keys, composite
//! unique constraints and foreign keys) are declared as pseudo-columns whose
//! name is the constraint keyword, so they render through the same path as
//! ordinary columns.

use core::fmt;

use super::attribute::Attribute;
use super::table::Table;
use super::types::{ForeignKeyRef, SqlType};
use crate::ddl;

/// Name of the composite primary key pseudo-column.
pub const PRIMARY_KEY: &str = "PRIMARY KEY";
/// Name of the composite unique pseudo-column.
pub const UNIQUE: &str = "UNIQUE";
/// Name of the foreign key pseudo-column.
pub const FOREIGN_KEY: &str = "FOREIGN KEY";

/// A column, or a constraint pseudo-column, of a table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Column {
    name: String,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    sql_type: SqlType,
    #[cfg_attr(feature = "serde", serde(default))]
    attributes: Vec<Attribute>,
}

impl Column {
    /// Creates a column with the given attributes, kept in order.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        sql_type: SqlType,
        attributes: impl IntoIterator<Item = Attribute>,
    ) -> Self {
        Self {
            name: name.into(),
            sql_type,
            attributes: attributes.into_iter().collect(),
        }
    }

    /// Creates a `PRIMARY KEY (a,b,...)` pseudo-column.
    #[must_use]
    pub fn primary_key_of<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::key_list(PRIMARY_KEY, keys)
    }

    /// Creates a `UNIQUE (a,b,...)` pseudo-column.
    #[must_use]
    pub fn unique_of<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::key_list(UNIQUE, keys)
    }

    /// Creates a `FOREIGN KEY (key) REFERENCES table(column)` pseudo-column.
    #[must_use]
    pub fn foreign_key(key: impl Into<String>, ref_table: &Table, ref_column: &Self) -> Self {
        Self::new(
            FOREIGN_KEY,
            SqlType::Reference(ForeignKeyRef {
                column: key.into(),
                table: ref_table.name().to_string(),
                ref_column: ref_column.name.clone(),
            }),
            [],
        )
    }

    fn key_list<I, S>(keyword: &str, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            keyword,
            SqlType::KeyList(keys.into_iter().map(Into::into).collect()),
            [],
        )
    }

    /// Appends an attribute.
    #[must_use]
    pub fn with(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Appends `PRIMARY KEY`.
    #[must_use]
    pub fn primary_key(self) -> Self {
        self.with(Attribute::PrimaryKey)
    }

    /// Appends `UNIQUE`.
    #[must_use]
    pub fn unique(self) -> Self {
        self.with(Attribute::Unique)
    }

    /// Appends `NOT NULL`.
    #[must_use]
    pub fn not_null(self) -> Self {
        self.with(Attribute::NotNull)
    }

    /// Appends `AUTOINCREMENT`.
    #[must_use]
    pub fn autoincrement(self) -> Self {
        self.with(Attribute::Autoincrement)
    }

    /// Appends `DEFAULT '<value>'`.
    #[must_use]
    pub fn default_value(self, value: impl fmt::Display) -> Self {
        self.with(Attribute::default_value(value))
    }

    /// Returns the column name (the keyword for pseudo-columns).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared type.
    #[must_use]
    pub const fn sql_type(&self) -> &SqlType {
        &self.sql_type
    }

    /// Returns the attributes in declaration order.
    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Returns whether this is a constraint pseudo-column rather than data.
    #[must_use]
    pub const fn is_constraint(&self) -> bool {
        self.sql_type.is_composite()
    }

    /// Returns `ALTER TABLE <table> ADD <column>`.
    #[must_use]
    pub fn create_add_sql(&self, table_name: &str) -> String {
        ddl::add_column_sql(table_name, self)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&ddl::column_sql(self))
    }
}

// =============================================================================
// Shorthand Functions for Common Types
// =============================================================================

/// Creates a `TEXT` column.
#[must_use]
pub fn text(name: impl Into<String>) -> Column {
    Column::new(name, SqlType::Text, [])
}

/// Creates a `NUMERIC` column.
#[must_use]
pub fn numeric(name: impl Into<String>) -> Column {
    Column::new(name, SqlType::Numeric, [])
}

/// Creates an `INTEGER` column.
#[must_use]
pub fn integer(name: impl Into<String>) -> Column {
    Column::new(name, SqlType::Integer, [])
}

/// Creates a `REAL` column.
#[must_use]
pub fn real(name: impl Into<String>) -> Column {
    Column::new(name, SqlType::Real, [])
}

/// Creates a `BLOB` column.
#[must_use]
pub fn blob(name: impl Into<String>) -> Column {
    Column::new(name, SqlType::Blob, [])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes_keep_call_order() {
        let col = integer("id").primary_key().autoincrement().not_null();
        assert_eq!(
            col.attributes(),
            &[
                Attribute::PrimaryKey,
                Attribute::Autoincrement,
                Attribute::NotNull
            ]
        );
        assert!(!col.is_constraint());
    }

    #[test]
    fn test_composite_primary_key() {
        let pk = Column::primary_key_of(["a", "b"]);
        assert_eq!(pk.name(), "PRIMARY KEY");
        assert!(pk.is_constraint());
        assert_eq!(pk.to_string(), "PRIMARY KEY (a,b)");
    }

    #[test]
    fn test_composite_unique() {
        let unique = Column::unique_of(vec![String::from("text1"), String::from("text2")]);
        assert_eq!(unique.to_string(), "UNIQUE (text1,text2)");
    }

    #[test]
    fn test_add_sql() {
        let col = text("intermediate");
        assert_eq!(
            col.create_add_sql("add_column"),
            "ALTER TABLE add_column ADD intermediate TEXT"
        );
    }
}
