//! Initialize-once access to a migrated database.

use sqlx::SqlitePool;
use tokio::sync::OnceCell;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::error::{MigrateError, Result};
use crate::helper::OpenHelper;

/// Connects to a database and opens it through an [`OpenHelper`] the first
/// time the pool is requested.
///
/// Concurrent first callers wait on the same initialization, so the helper
/// never creates or upgrades the same file twice. Once initialized, the
/// cached pool is returned without locking. Share it behind an `Arc` and pass
/// it to whoever needs the database.
#[derive(Debug)]
pub struct DatabaseHolder {
    config: DatabaseConfig,
    helper: OpenHelper,
    pool: OnceCell<SqlitePool>,
}

impl DatabaseHolder {
    /// Creates a holder; nothing is opened yet.
    #[must_use]
    pub fn new(config: DatabaseConfig, helper: OpenHelper) -> Self {
        Self {
            config,
            helper,
            pool: OnceCell::new(),
        }
    }

    /// Returns the pool, connecting and migrating on first use.
    ///
    /// A failed initialization is not cached; the next call retries it.
    ///
    /// # Errors
    ///
    /// Any error from connecting or from [`OpenHelper::open`].
    pub async fn pool(&self) -> Result<&SqlitePool> {
        self.pool
            .get_or_try_init(|| async {
                let pool = self.config.connect().await?;
                let previous = self.helper.open(&pool).await?;
                info!(
                    url = %self.config.url,
                    previous = previous.version(),
                    version = self.helper.version(),
                    "Database ready"
                );
                Ok::<_, MigrateError>(pool)
            })
            .await
    }

    /// Returns whether the pool has been initialized.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.pool.initialized()
    }

    /// Returns the helper driving this database.
    #[must_use]
    pub const fn helper(&self) -> &OpenHelper {
        &self.helper
    }
}
