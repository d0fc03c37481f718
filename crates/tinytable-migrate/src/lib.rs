//! Versioned SQLite schemas for `tinytable` table declarations.
//!
//! `tinytable-migrate` creates a database from declared [`Table`]s on first
//! open and brings it forward when the declared version grows:
//!
//! - **Step replay** - code or SQL registered for a version runs when an
//!   upgrade crosses that version, in ascending order
//! - **Diff migrate** - every table is then rebuilt to its latest
//!   declaration, keeping the columns the old and new shapes share
//! - **Downgrades** are refused before anything is modified
//!
//! The schema version is stored in `PRAGMA user_version`.
//!
//! # Example
//!
//! ```rust,no_run
//! use tinytable_migrate::prelude::*;
//!
//! # async fn run() -> Result<()> {
//! let table = Table::new(
//!     "add_column",
//!     integer("id").primary_key().autoincrement().not_null(),
//!     vec![text("special_column"), text("intermediate"), text("val")],
//! )?;
//!
//! let mut helper = OpenHelper::with_table(3, table)?;
//! helper.add_migrate_step(2, |conn| {
//!     Box::pin(async move {
//!         sqlx::query("ALTER TABLE add_column ADD intermediate TEXT")
//!             .execute(&mut *conn)
//!             .await?;
//!         Ok::<_, MigrateError>(())
//!     })
//! })?;
//!
//! let holder = DatabaseHolder::new(DatabaseConfig::new("sqlite:add-column.db"), helper);
//! let pool = holder.pool().await?;
//! # let _ = pool;
//! # Ok(())
//! # }
//! ```
//!
//! [`Table`]: tinytable_core::Table

pub mod config;
pub mod diff;
pub mod error;
pub mod helper;
pub mod holder;
pub mod schema_file;
pub mod step;
pub mod version;

pub use tinytable_core;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::DatabaseConfig;
    pub use crate::diff::{diff_migrate, DiffOutcome};
    pub use crate::error::{MigrateError, Result};
    pub use crate::helper::OpenHelper;
    pub use crate::holder::DatabaseHolder;
    pub use crate::schema_file::SchemaFile;
    pub use crate::step::{MigrationStep, MigrationSteps};
    pub use crate::version::SchemaState;
    pub use tinytable_core::{
        blob, integer, numeric, real, text, Attribute, Column, SqlType, Table,
    };
}
