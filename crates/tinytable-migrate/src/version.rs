//! Schema version bookkeeping.
//!
//! The version lives in SQLite's `PRAGMA user_version`, which is 0 for a
//! freshly created database file.

use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::{MigrateError, Result};

/// Largest schema version: `user_version` is a signed 32-bit integer.
pub const MAX_VERSION: u32 = 0x7FFF_FFFF;

/// Where a database stands relative to the declared schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaState {
    /// Nothing has been created yet.
    NoSchema,
    /// The schema of the given version is in place.
    AtVersion(u32),
}

impl SchemaState {
    /// Interprets a raw `user_version` value.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::InvalidState`] for negative values.
    pub fn from_user_version(raw: i64) -> Result<Self> {
        match raw {
            0 => Ok(Self::NoSchema),
            v => u32::try_from(v)
                .map(Self::AtVersion)
                .map_err(|_| MigrateError::InvalidState(format!("user_version is {v}"))),
        }
    }

    /// Returns the stored version, 0 for [`SchemaState::NoSchema`].
    #[must_use]
    pub const fn version(self) -> u32 {
        match self {
            Self::NoSchema => 0,
            Self::AtVersion(v) => v,
        }
    }
}

/// Reads the schema state of the database behind `conn`.
pub async fn read_state(conn: &mut SqliteConnection) -> Result<SchemaState> {
    let raw: i64 = sqlx::query_scalar("PRAGMA user_version")
        .fetch_one(&mut *conn)
        .await?;
    SchemaState::from_user_version(raw)
}

/// Stores `version` as the schema version.
pub async fn write_version(conn: &mut SqliteConnection, version: u32) -> Result<()> {
    // PRAGMA arguments cannot be bound.
    let sql = format!("PRAGMA user_version = {version}");
    debug!(sql = %sql, "Executing SQL");
    sqlx::query(&sql).execute(&mut *conn).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Connection;

    #[test]
    fn test_from_user_version() {
        assert_eq!(
            SchemaState::from_user_version(0).unwrap(),
            SchemaState::NoSchema
        );
        assert_eq!(
            SchemaState::from_user_version(3).unwrap(),
            SchemaState::AtVersion(3)
        );
        assert!(matches!(
            SchemaState::from_user_version(-1),
            Err(MigrateError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn test_round_trip_version() {
        let mut conn = SqliteConnection::connect("sqlite::memory:").await.unwrap();
        assert_eq!(read_state(&mut conn).await.unwrap(), SchemaState::NoSchema);

        write_version(&mut conn, 7).await.unwrap();
        assert_eq!(
            read_state(&mut conn).await.unwrap(),
            SchemaState::AtVersion(7)
        );
        assert_eq!(SchemaState::AtVersion(7).version(), 7);
    }
}
