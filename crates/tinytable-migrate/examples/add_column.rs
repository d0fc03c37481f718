//! Example: Adding Columns Across Versions
//!
//! Version 1 of `add_column` has `{id, special_column}`. Version 2 added an
//! `intermediate` column that must be filled for rows whose
//! `special_column` was `'special'`. Version 3 adds `val`.
//!
//! The database is first opened with the version 1 declaration and
//! populated, then reopened with the version 3 declaration: the version 2
//! step adds and backfills `intermediate`, and the diff migration brings in
//! `val`.
//!
//! Run with: cargo run --example add_column -p tinytable-migrate

use std::path::Path;

use sqlx::Row;
use tinytable_migrate::prelude::*;
use tracing::info;

const DATABASE_FILE: &str = "add-column.db";
const TABLE: &str = "add_column";

const SPECIAL: &str = "special";
const NONE: &str = "none";

mod version {
    pub const OLD: u32 = 1;
    pub const INTERMEDIATE: u32 = 2;
    pub const LATEST: u32 = 3;
}

fn id() -> Column {
    integer("id").primary_key().autoincrement().not_null()
}

fn special_column() -> Column {
    text("special_column")
}

fn intermediate_column() -> Column {
    text("intermediate")
}

fn new_column() -> Column {
    text("val")
}

fn old_helper() -> Result<OpenHelper> {
    let table = Table::new(TABLE, id(), vec![special_column()])?;
    let mut helper = OpenHelper::with_table(version::OLD, table)?;

    helper.set_initial_population(|conn| {
        Box::pin(async move {
            for special in [NONE, SPECIAL] {
                sqlx::query("INSERT INTO add_column (special_column) VALUES (?1)")
                    .bind(special)
                    .execute(&mut *conn)
                    .await?;
            }
            Ok::<_, MigrateError>(())
        })
    });
    Ok(helper)
}

fn latest_helper() -> Result<OpenHelper> {
    let table = Table::new(
        TABLE,
        id(),
        vec![special_column(), intermediate_column(), new_column()],
    )?;
    let mut helper = OpenHelper::with_table(version::LATEST, table)?;

    helper.add_migrate_step(version::INTERMEDIATE, |conn| {
        Box::pin(async move {
            sqlx::query(&intermediate_column().create_add_sql(TABLE))
                .execute(&mut *conn)
                .await?;
            sqlx::query("UPDATE add_column SET intermediate = ?1 WHERE special_column = ?2")
                .bind("special!")
                .bind(SPECIAL)
                .execute(&mut *conn)
                .await?;
            Ok::<_, MigrateError>(())
        })
    })?;
    Ok(helper)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    if Path::new(DATABASE_FILE).exists() {
        std::fs::remove_file(DATABASE_FILE)?;
    }
    let config = DatabaseConfig::new(format!("sqlite:{DATABASE_FILE}"));

    let old = DatabaseHolder::new(config.clone(), old_helper()?);
    old.pool().await?.close().await;

    let latest = DatabaseHolder::new(config, latest_helper()?);
    let pool = latest.pool().await?;

    let rows = sqlx::query("SELECT id, special_column, intermediate, val FROM add_column")
        .fetch_all(pool)
        .await?;
    for row in rows {
        let id: i64 = row.try_get("id")?;
        let special: Option<String> = row.try_get("special_column")?;
        let intermediate: Option<String> = row.try_get("intermediate")?;
        let val: Option<String> = row.try_get("val")?;
        info!(id, ?special, ?intermediate, ?val, "row");
    }

    Ok(())
}
