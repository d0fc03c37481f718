//! Column modifiers.

use core::fmt;

use crate::ddl::escape_string;

/// A modifier appended after a column's type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Attribute {
    /// `PRIMARY KEY`
    PrimaryKey,
    /// `UNIQUE`
    Unique,
    /// `NOT NULL`
    NotNull,
    /// `AUTOINCREMENT`
    Autoincrement,
    /// `DEFAULT '<literal>'`, holding the unescaped literal.
    Default(String),
}

impl Attribute {
    /// Creates a `DEFAULT` attribute from any displayable value.
    ///
    /// The value is always rendered as an escaped string literal. There is no
    /// parameter binding for DDL, so never pass untrusted input here.
    #[must_use]
    pub fn default_value(value: impl fmt::Display) -> Self {
        Self::Default(value.to_string())
    }

    /// Returns the SQL text of the attribute.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::PrimaryKey => String::from("PRIMARY KEY"),
            Self::Unique => String::from("UNIQUE"),
            Self::NotNull => String::from("NOT NULL"),
            Self::Autoincrement => String::from("AUTOINCREMENT"),
            Self::Default(value) => format!("DEFAULT {}", escape_string(value)),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_escaped() {
        assert_eq!(Attribute::default_value("plain").to_sql(), "DEFAULT 'plain'");
        assert_eq!(Attribute::default_value("it's").to_sql(), "DEFAULT 'it''s'");
    }

    #[test]
    fn test_default_numbers_are_quoted() {
        assert_eq!(Attribute::default_value(42).to_sql(), "DEFAULT '42'");
    }
}
