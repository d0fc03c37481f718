//! Connection settings.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error::Result;

/// Default database URL.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:tinytable.db";

/// How to reach the SQLite database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// SQLite URL (`sqlite:path.db`, `sqlite::memory:`).
    pub url: String,
    /// Pool size.
    pub max_connections: u32,
    /// Create the database file if it is missing.
    pub create_if_missing: bool,
    /// Enforce `FOREIGN KEY` constraints.
    pub foreign_keys: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 5,
            create_if_missing: true,
            foreign_keys: false,
        }
    }
}

impl DatabaseConfig {
    /// Creates a config for `url` with default settings.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// A private in-memory database, on a single connection so that every
    /// query sees the same data.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            ..Self::default()
        }
    }

    /// Sets the pool size.
    #[must_use]
    pub const fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Enables or disables foreign key enforcement.
    #[must_use]
    pub const fn foreign_keys(mut self, enabled: bool) -> Self {
        self.foreign_keys = enabled;
        self
    }

    /// Builds the sqlx connect options.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::Database`](crate::error::MigrateError::Database)
    /// if the URL cannot be parsed.
    pub fn connect_options(&self) -> Result<SqliteConnectOptions> {
        Ok(SqliteConnectOptions::from_str(&self.url)?
            .create_if_missing(self.create_if_missing)
            .foreign_keys(self.foreign_keys))
    }

    /// Opens a pool with these settings.
    ///
    /// # Errors
    ///
    /// Returns any error from parsing the URL or connecting.
    pub async fn connect(&self) -> Result<SqlitePool> {
        let pool = SqlitePoolOptions::new()
            .max_connections(self.max_connections)
            .connect_with(self.connect_options()?)
            .await?;
        Ok(pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DatabaseConfig::default();
        assert_eq!(config.url, DEFAULT_DATABASE_URL);
        assert!(config.create_if_missing);
        assert!(!config.foreign_keys);
    }

    #[test]
    fn test_connect_options_parse() {
        assert!(DatabaseConfig::in_memory().connect_options().is_ok());
        assert!(DatabaseConfig::new("sqlite:x.db?mode=bogus")
            .connect_options()
            .is_err());
    }

    #[tokio::test]
    async fn test_connect_in_memory() {
        let pool = DatabaseConfig::in_memory().connect().await.unwrap();
        let one: i64 = sqlx::query_scalar("SELECT 1").fetch_one(&pool).await.unwrap();
        assert_eq!(one, 1);
    }
}
