//! Version-tagged migration steps.
//!
//! A step performs a scripted change (add a column, backfill values, ...)
//! that the generic diff migration cannot infer on its own. Steps are keyed
//! by the version that introduces them; an upgrade from `old` to `new` runs
//! every step with `old < version <= new`, in ascending version order.

use std::collections::BTreeMap;
use std::fmt;

use futures::future::BoxFuture;
use sqlx::SqliteConnection;
use tracing::{debug, info};

use crate::error::Result;

/// Async callback run against the live connection.
pub type StepFn =
    dyn for<'c> Fn(&'c mut SqliteConnection) -> BoxFuture<'c, Result<()>> + Send + Sync;

/// The action of a migration step.
pub enum MigrationStep {
    /// Raw SQL statements, executed in order.
    Sql(Vec<String>),
    /// Arbitrary code.
    Custom(Box<StepFn>),
}

impl MigrationStep {
    /// Runs the step against `conn`.
    pub async fn run(&self, conn: &mut SqliteConnection) -> Result<()> {
        match self {
            Self::Sql(statements) => {
                for sql in statements {
                    debug!(sql = %sql, "Executing SQL");
                    sqlx::query(sql).execute(&mut *conn).await?;
                }
                Ok(())
            }
            Self::Custom(action) => action(conn).await,
        }
    }
}

impl fmt::Debug for MigrationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sql(statements) => f.debug_tuple("Sql").field(statements).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Registered steps, unique per version.
#[derive(Debug, Default)]
pub struct MigrationSteps {
    steps: BTreeMap<u32, MigrationStep>,
}

impl MigrationSteps {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `step` for `version`, replacing any previous step there.
    pub fn insert(&mut self, version: u32, step: MigrationStep) {
        self.steps.insert(version, step);
    }

    /// Returns the number of registered steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns whether no step is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns the versions whose steps an upgrade from `old` to `new` runs.
    pub fn versions_between(&self, old: u32, new: u32) -> impl Iterator<Item = u32> + '_ {
        self.window(old, new).map(|(v, _)| v)
    }

    fn window(&self, old: u32, new: u32) -> impl Iterator<Item = (u32, &MigrationStep)> + '_ {
        // (old, new]; BTreeMap::range panics on an inverted range.
        (old < new)
            .then(|| self.steps.range(old + 1..=new))
            .into_iter()
            .flatten()
            .map(|(v, step)| (*v, step))
    }

    /// Runs the steps of the `(old, new]` window in ascending order.
    pub async fn replay(&self, conn: &mut SqliteConnection, old: u32, new: u32) -> Result<()> {
        for (version, step) in self.window(old, new) {
            info!(version, "Applying migration step");
            step.run(conn).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(versions: &[u32]) -> MigrationSteps {
        let mut steps = MigrationSteps::new();
        for v in versions {
            steps.insert(*v, MigrationStep::Sql(vec![]));
        }
        steps
    }

    #[test]
    fn test_window_is_exclusive_inclusive() {
        let steps = registry(&[2, 5]);
        assert_eq!(steps.versions_between(1, 5).collect::<Vec<_>>(), vec![2, 5]);
        assert_eq!(steps.versions_between(3, 5).collect::<Vec<_>>(), vec![5]);
        assert_eq!(steps.versions_between(2, 4).collect::<Vec<_>>(), Vec::<u32>::new());
        assert_eq!(steps.versions_between(5, 5).collect::<Vec<_>>(), Vec::<u32>::new());
    }

    #[test]
    fn test_ascending_regardless_of_registration_order() {
        let steps = registry(&[9, 3, 6]);
        assert_eq!(steps.versions_between(0, 9).collect::<Vec<_>>(), vec![3, 6, 9]);
        assert_eq!(steps.len(), 3);
    }

    #[test]
    fn test_versions_are_unique_keys() {
        let mut steps = registry(&[2]);
        steps.insert(2, MigrationStep::Sql(vec!["SELECT 1".into()]));
        assert_eq!(steps.len(), 1);
    }
}
