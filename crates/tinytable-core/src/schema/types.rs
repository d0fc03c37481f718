//! SQL column type tokens.

use core::fmt;

/// The target of a `FOREIGN KEY` pseudo-column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForeignKeyRef {
    /// Column of the declaring table.
    pub column: String,
    /// Referenced table name.
    pub table: String,
    /// Referenced column name.
    pub ref_column: String,
}

/// SQL types accepted in a column declaration.
///
/// The plain variants are the type names SQLite recognizes. `KeyList` and
/// `Reference` only appear on constraint pseudo-columns (see
/// [`Column::primary_key_of`](crate::Column::primary_key_of) and friends).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum SqlType {
    // Text
    /// `TEXT`
    Text,
    /// `CLOB`
    Clob,

    // Integer
    /// `INTEGER`
    Integer,
    /// `INT`
    Int,
    /// `TINYINT`
    Tinyint,
    /// `SMALLINT`
    Smallint,
    /// `MEDIUMINT`
    Mediumint,
    /// `BIGINT`
    Bigint,
    /// `UNSIGNED BIG INT`
    UnsignedBigInt,
    /// `INT2`
    Int2,
    /// `INT8`
    Int8,

    // Numeric
    /// `NUMERIC`
    Numeric,
    /// `BOOLEAN`
    Boolean,
    /// `DATE`
    Date,
    /// `DATETIME`
    Datetime,

    // Floating point
    /// `REAL`
    Real,
    /// `DOUBLE`
    Double,
    /// `DOUBLE PRECISION`
    DoublePrecision,
    /// `FLOAT`
    Float,

    /// `BLOB`
    Blob,

    /// Parenthesized column list, e.g. `(id,val)`.
    KeyList(Vec<String>),
    /// Reference clause, e.g. `(id) REFERENCES example2(id)`.
    Reference(ForeignKeyRef),
}

impl SqlType {
    /// Returns the SQL text of the type.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::KeyList(keys) => format!("({})", keys.join(",")),
            Self::Reference(fk) => {
                format!("({}) REFERENCES {}({})", fk.column, fk.table, fk.ref_column)
            }
            plain => plain.keyword().unwrap_or_default().to_string(),
        }
    }

    /// Returns the type keyword, or `None` for the composite forms.
    #[must_use]
    pub const fn keyword(&self) -> Option<&'static str> {
        let keyword = match self {
            Self::Text => "TEXT",
            Self::Clob => "CLOB",
            Self::Integer => "INTEGER",
            Self::Int => "INT",
            Self::Tinyint => "TINYINT",
            Self::Smallint => "SMALLINT",
            Self::Mediumint => "MEDIUMINT",
            Self::Bigint => "BIGINT",
            Self::UnsignedBigInt => "UNSIGNED BIG INT",
            Self::Int2 => "INT2",
            Self::Int8 => "INT8",
            Self::Numeric => "NUMERIC",
            Self::Boolean => "BOOLEAN",
            Self::Date => "DATE",
            Self::Datetime => "DATETIME",
            Self::Real => "REAL",
            Self::Double => "DOUBLE",
            Self::DoublePrecision => "DOUBLE PRECISION",
            Self::Float => "FLOAT",
            Self::Blob => "BLOB",
            Self::KeyList(_) | Self::Reference(_) => return None,
        };
        Some(keyword)
    }

    /// Returns whether this is one of the composite constraint forms.
    #[must_use]
    pub const fn is_composite(&self) -> bool {
        matches!(self, Self::KeyList(_) | Self::Reference(_))
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_word_keywords() {
        assert_eq!(SqlType::UnsignedBigInt.to_sql(), "UNSIGNED BIG INT");
        assert_eq!(SqlType::DoublePrecision.to_sql(), "DOUBLE PRECISION");
    }

    #[test]
    fn test_key_list_has_no_spaces() {
        let keys = SqlType::KeyList(vec!["id".into(), "val".into()]);
        assert_eq!(keys.to_sql(), "(id,val)");
        assert!(keys.is_composite());
        assert_eq!(keys.keyword(), None);
    }

    #[test]
    fn test_reference() {
        let fk = SqlType::Reference(ForeignKeyRef {
            column: "id".into(),
            table: "example2".into(),
            ref_column: "id".into(),
        });
        assert_eq!(fk.to_string(), "(id) REFERENCES example2(id)");
    }
}
