//! The version migration driver.
//!
//! [`OpenHelper`] owns the latest declaration of every table, the version
//! number of that declaration, and the steps that lead to it. Opening a
//! database moves it through these states:
//!
//! - `NoSchema` → `AtVersion(version)`: create every table, then run the
//!   initial population.
//! - `AtVersion(old)` → `AtVersion(version)` when `old < version`: replay the
//!   steps in `(old, version]`, then diff migrate every table.
//! - `AtVersion(old)` with `old > version`: refused with
//!   [`MigrateError::Downgrade`].
//!
//! Each open runs in a single transaction, so a failing statement leaves the
//! database as it was. Foreign key enforcement is suspended on the connection
//! while tables are rebuilt and the constraints are checked before commit.

use std::collections::HashSet;

use futures::future::BoxFuture;
use sqlx::{Connection, SqliteConnection, SqlitePool};
use tinytable_core::Table;
use tracing::{debug, info, warn};

use crate::diff::{diff_migrate, DiffOutcome};
use crate::error::{MigrateError, Result};
use crate::step::{MigrationStep, MigrationSteps};
use crate::version::{read_state, write_version, SchemaState, MAX_VERSION};

/// Creates and upgrades a database to a declared schema version.
#[derive(Debug)]
pub struct OpenHelper {
    version: u32,
    tables: Vec<Table>,
    initial_population: Option<MigrationStep>,
    steps: MigrationSteps,
}

impl OpenHelper {
    /// Creates a helper for `tables` at schema `version`.
    ///
    /// # Errors
    ///
    /// [`MigrateError::InvalidConfig`] if `version` is outside
    /// `1..=MAX_VERSION`, `tables` is empty, or two tables share a name.
    pub fn new(version: u32, tables: Vec<Table>) -> Result<Self> {
        if version == 0 || version > MAX_VERSION {
            return Err(MigrateError::InvalidConfig(format!(
                "schema version must be within 1..={MAX_VERSION}, got {version}"
            )));
        }
        if tables.is_empty() {
            return Err(MigrateError::InvalidConfig(
                "at least one table must be declared".to_string(),
            ));
        }
        {
            let mut seen = HashSet::new();
            if let Some(dup) = tables.iter().find(|t| !seen.insert(t.name())) {
                return Err(MigrateError::InvalidConfig(format!(
                    "table '{}' is declared twice",
                    dup.name()
                )));
            }
        }

        Ok(Self {
            version,
            tables,
            initial_population: None,
            steps: MigrationSteps::new(),
        })
    }

    /// Creates a helper for a single table.
    ///
    /// # Errors
    ///
    /// Same as [`OpenHelper::new`].
    pub fn with_table(version: u32, table: Table) -> Result<Self> {
        Self::new(version, vec![table])
    }

    /// Returns the declared schema version.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Returns the declared tables, in creation order.
    #[must_use]
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Looks up a declared table by name.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name() == name)
    }

    /// Returns the registered migration steps.
    #[must_use]
    pub const fn steps(&self) -> &MigrationSteps {
        &self.steps
    }

    /// Sets code run once, right after the tables are first created.
    pub fn set_initial_population<F>(&mut self, populate: F)
    where
        F: for<'c> Fn(&'c mut SqliteConnection) -> BoxFuture<'c, Result<()>>
            + Send
            + Sync
            + 'static,
    {
        self.initial_population = Some(MigrationStep::Custom(Box::new(populate)));
    }

    /// Sets SQL statements run once, right after the tables are first created.
    pub fn set_initial_population_sql(&mut self, statements: Vec<String>) {
        self.initial_population = Some(MigrationStep::Sql(statements));
    }

    /// Registers code run when upgrading across `version`.
    ///
    /// # Errors
    ///
    /// [`MigrateError::InvalidConfig`] if `version` is 0 or above the
    /// helper's version.
    pub fn add_migrate_step<F>(&mut self, version: u32, step: F) -> Result<()>
    where
        F: for<'c> Fn(&'c mut SqliteConnection) -> BoxFuture<'c, Result<()>>
            + Send
            + Sync
            + 'static,
    {
        self.add_step(version, MigrationStep::Custom(Box::new(step)))
    }

    /// Registers SQL statements run when upgrading across `version`.
    ///
    /// # Errors
    ///
    /// Same as [`OpenHelper::add_migrate_step`].
    pub fn add_sql_step(&mut self, version: u32, statements: Vec<String>) -> Result<()> {
        self.add_step(version, MigrationStep::Sql(statements))
    }

    fn add_step(&mut self, version: u32, step: MigrationStep) -> Result<()> {
        if version == 0 || version > self.version {
            return Err(MigrateError::InvalidConfig(format!(
                "migration step version {version} is outside 1..={}",
                self.version
            )));
        }
        self.steps.insert(version, step);
        Ok(())
    }

    /// Brings the database behind `pool` to the declared version.
    ///
    /// Returns the state the database was in before opening.
    ///
    /// # Errors
    ///
    /// [`MigrateError::Downgrade`] if the database is newer than the
    /// declaration, [`MigrateError::NoCommonColumns`] from the diff
    /// migration, [`MigrateError::ForeignKeyViolation`] if enforcement is on
    /// and rows lost their parent, or any engine error. Nothing is committed
    /// on error.
    pub async fn open(&self, pool: &SqlitePool) -> Result<SchemaState> {
        let mut conn = pool.acquire().await?;
        self.open_connection(&mut conn).await
    }

    /// Same as [`OpenHelper::open`], on a single connection.
    ///
    /// # Errors
    ///
    /// Same as [`OpenHelper::open`].
    pub async fn open_connection(&self, conn: &mut SqliteConnection) -> Result<SchemaState> {
        // `foreign_keys` is a no-op inside a transaction, and renaming a
        // parent table while it is on rewrites the references of its children.
        let enforced: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(&mut *conn)
            .await?;
        let enforced = enforced != 0;
        if enforced {
            sqlx::query("PRAGMA foreign_keys = OFF")
                .execute(&mut *conn)
                .await?;
        }

        let opened = self.open_in_transaction(conn, enforced).await;

        if enforced {
            sqlx::query("PRAGMA foreign_keys = ON")
                .execute(&mut *conn)
                .await?;
        }
        opened
    }

    async fn open_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        check_foreign_keys: bool,
    ) -> Result<SchemaState> {
        let mut tx = conn.begin().await?;
        let state = read_state(&mut tx).await?;

        match state {
            SchemaState::NoSchema => self.create(&mut tx).await?,
            SchemaState::AtVersion(old) if old == self.version => {
                debug!(version = old, "Schema is up to date");
                return Ok(state);
            }
            SchemaState::AtVersion(old) if old < self.version => {
                self.upgrade(&mut tx, old).await?;
            }
            SchemaState::AtVersion(old) => {
                return Err(MigrateError::Downgrade {
                    old,
                    new: self.version,
                });
            }
        }

        if check_foreign_keys {
            check_foreign_keys_hold(&mut tx).await?;
        }
        write_version(&mut tx, self.version).await?;
        tx.commit().await?;
        Ok(state)
    }

    async fn create(&self, conn: &mut SqliteConnection) -> Result<()> {
        info!(version = self.version, "Creating schema");
        for table in &self.tables {
            let sql = table.create_sql();
            debug!(sql = %sql, "Executing SQL");
            sqlx::query(&sql).execute(&mut *conn).await?;
        }
        if let Some(populate) = &self.initial_population {
            info!("Running initial population");
            populate.run(conn).await?;
        }
        Ok(())
    }

    async fn upgrade(&self, conn: &mut SqliteConnection, old: u32) -> Result<()> {
        info!(old, new = self.version, "Upgrading schema");
        self.steps.replay(conn, old, self.version).await?;

        // Keep references from other tables pointing at the original name
        // while each table is renamed away and rebuilt.
        sqlx::query("PRAGMA legacy_alter_table = ON")
            .execute(&mut *conn)
            .await?;
        let rebuilt = self.diff_migrate_all(conn).await;
        sqlx::query("PRAGMA legacy_alter_table = OFF")
            .execute(&mut *conn)
            .await?;

        for (table, outcome) in self.tables.iter().zip(rebuilt?) {
            debug!(table = table.name(), ?outcome, "Diff migration done");
        }
        Ok(())
    }

    async fn diff_migrate_all(&self, conn: &mut SqliteConnection) -> Result<Vec<DiffOutcome>> {
        let mut outcomes = Vec::with_capacity(self.tables.len());
        for table in &self.tables {
            outcomes.push(diff_migrate(conn, table).await?);
        }
        Ok(outcomes)
    }
}

async fn check_foreign_keys_hold(conn: &mut SqliteConnection) -> Result<()> {
    let violations: Vec<(String, Option<i64>, String, i64)> =
        sqlx::query_as("PRAGMA foreign_key_check")
            .fetch_all(&mut *conn)
            .await?;
    match violations.first() {
        None => Ok(()),
        Some((table, rowid, parent, _)) => {
            warn!(table = %table, ?rowid, parent = %parent, "Row references a missing parent");
            Err(MigrateError::ForeignKeyViolation {
                count: violations.len(),
                table: table.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinytable_core::{integer, text};

    fn table(name: &str) -> Table {
        Table::new(name, integer("id").primary_key(), [text("val")]).unwrap()
    }

    #[test]
    fn test_rejects_version_zero() {
        assert!(matches!(
            OpenHelper::with_table(0, table("t")),
            Err(MigrateError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_version_beyond_user_version_range() {
        assert!(matches!(
            OpenHelper::with_table(MAX_VERSION + 1, table("t")),
            Err(MigrateError::InvalidConfig(_))
        ));
        assert!(matches!(
            OpenHelper::with_table(3_000_000_000, table("t")),
            Err(MigrateError::InvalidConfig(_))
        ));
        assert!(OpenHelper::with_table(MAX_VERSION, table("t")).is_ok());
    }

    #[test]
    fn test_rejects_empty_and_duplicate_tables() {
        assert!(OpenHelper::new(1, vec![]).is_err());
        assert!(OpenHelper::new(1, vec![table("t"), table("t")]).is_err());
        assert!(OpenHelper::new(1, vec![table("t"), table("u")]).is_ok());
    }

    #[test]
    fn test_step_versions_must_fit() {
        let mut helper = OpenHelper::with_table(3, table("t")).unwrap();
        assert!(helper.add_sql_step(0, vec![]).is_err());
        assert!(helper.add_sql_step(4, vec![]).is_err());
        assert!(helper.add_sql_step(3, vec![]).is_ok());
        assert!(helper
            .add_migrate_step(2, |_conn| Box::pin(async { Ok::<_, MigrateError>(()) }))
            .is_ok());
        assert_eq!(helper.steps().len(), 2);
    }
}
