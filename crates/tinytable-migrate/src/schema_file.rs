//! Data-driven schema definitions loaded from JSON.
//!
//! ```json
//! {
//!   "version": 3,
//!   "tables": [
//!     {
//!       "name": "add_column",
//!       "columns": [
//!         {"name": "id", "type": "INTEGER",
//!          "attributes": ["PRIMARY_KEY", "AUTOINCREMENT", "NOT_NULL"]},
//!         {"name": "special_column", "type": "TEXT"},
//!         {"name": "intermediate", "type": "TEXT"},
//!         {"name": "val", "type": "TEXT", "attributes": [{"DEFAULT": "none"}]}
//!       ]
//!     }
//!   ],
//!   "steps": {
//!     "2": ["ALTER TABLE add_column ADD intermediate TEXT"]
//!   },
//!   "population": ["INSERT INTO add_column (special_column) VALUES ('special')"]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tinytable_core::Table;

use crate::error::{MigrateError, Result};
use crate::helper::OpenHelper;

/// A schema version with its tables and SQL migration steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaFile {
    /// Schema version of `tables`.
    pub version: u32,
    /// Latest declaration of every table.
    pub tables: Vec<Table>,
    /// SQL statements per step version.
    #[serde(default)]
    pub steps: BTreeMap<u32, Vec<String>>,
    /// SQL statements run once after creation.
    #[serde(default)]
    pub population: Vec<String>,
}

impl SchemaFile {
    /// Parses a schema file from JSON text.
    ///
    /// # Errors
    ///
    /// Returns the parse error, including schema validation failures.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Reads and parses the schema file at `path`.
    ///
    /// # Errors
    ///
    /// [`MigrateError::Io`] if the file cannot be read,
    /// [`MigrateError::SchemaFile`] if it does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json).map_err(|source| MigrateError::SchemaFile {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Builds the helper that applies this schema.
    ///
    /// # Errors
    ///
    /// Any configuration error from [`OpenHelper`].
    pub fn into_helper(self) -> Result<OpenHelper> {
        let mut helper = OpenHelper::new(self.version, self.tables)?;
        for (version, statements) in self.steps {
            helper.add_sql_step(version, statements)?;
        }
        if !self.population.is_empty() {
            helper.set_initial_population_sql(self.population);
        }
        Ok(helper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"{
        "version": 3,
        "tables": [{
            "name": "add_column",
            "columns": [
                {"name": "id", "type": "INTEGER", "attributes": ["PRIMARY_KEY"]},
                {"name": "special_column", "type": "TEXT"},
                {"name": "val", "type": "TEXT", "attributes": [{"DEFAULT": "it's"}]}
            ]
        }],
        "steps": {"2": ["SELECT 1"]}
    }"#;

    #[test]
    fn test_parse_schema_file() {
        let file = SchemaFile::from_json(SCHEMA).unwrap();
        assert_eq!(file.version, 3);
        assert_eq!(
            file.tables[0].create_sql(),
            "CREATE TABLE add_column(id INTEGER PRIMARY KEY, special_column TEXT, \
             val TEXT DEFAULT 'it''s')"
        );
        assert_eq!(file.steps.get(&2).map(Vec::len), Some(1));
        assert!(file.population.is_empty());
    }

    #[test]
    fn test_into_helper() {
        let helper = SchemaFile::from_json(SCHEMA).unwrap().into_helper().unwrap();
        assert_eq!(helper.version(), 3);
        assert_eq!(helper.steps().versions_between(0, 3).collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_step_above_version_is_rejected() {
        let mut file = SchemaFile::from_json(SCHEMA).unwrap();
        file.steps.insert(4, vec![]);
        assert!(matches!(
            file.into_helper(),
            Err(MigrateError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_invalid_table_fails_to_parse() {
        let json = r#"{"version": 1, "tables": [{"name": "", "columns": []}]}"#;
        assert!(SchemaFile::from_json(json).is_err());
    }
}
