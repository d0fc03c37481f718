//! Example: Declaring Tables
//!
//! Declares three tables covering the basic column types, a string default,
//! a composite primary key, a composite unique constraint and a foreign key,
//! prints their DDL, creates a fresh database and inserts a row.
//!
//! Run with: cargo run --example example_tables -p tinytable-migrate

use std::path::Path;

use tinytable_migrate::prelude::*;
use tracing::info;

const DATABASE_FILE: &str = "example.db";

struct ExampleSchema {
    example: Table,
    example2: Table,
    example3: Table,
}

impl ExampleSchema {
    fn new() -> Result<Self> {
        let example = Table::new(
            "example",
            integer("id").primary_key().autoincrement().not_null(),
            vec![
                text("ex_text"),
                numeric("ex_numeric"),
                real("ex_real"),
                blob("ex_blob"),
                text("ex_default").default_value("def"),
            ],
        )?;

        let example2_id = integer("id").not_null();
        let example2 = Table::new(
            "example2",
            example2_id.clone(),
            vec![
                text("val"),
                text("text1"),
                text("text2"),
                Column::primary_key_of(["id", "val"]),
                Column::unique_of(["text1", "text2"]),
            ],
        )?;

        let example3 = Table::new(
            "example3",
            integer("id").primary_key().not_null(),
            vec![Column::foreign_key("id", &example2, &example2_id)],
        )?;

        Ok(Self {
            example,
            example2,
            example3,
        })
    }

    fn into_helper(self) -> Result<OpenHelper> {
        OpenHelper::new(1, vec![self.example, self.example2, self.example3])
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    if Path::new(DATABASE_FILE).exists() {
        std::fs::remove_file(DATABASE_FILE)?;
    }

    let schema = ExampleSchema::new()?;
    info!("ExampleTable={}", schema.example.create_sql());
    info!("Example2Table={}", schema.example2.create_sql());
    info!("Example3Table={}", schema.example3.create_sql());

    let example3_name = schema.example3.name().to_string();
    let holder = DatabaseHolder::new(
        DatabaseConfig::new(format!("sqlite:{DATABASE_FILE}")),
        schema.into_helper()?,
    );
    let pool = holder.pool().await?;

    // Foreign keys are not enforced with the default config, matching the
    // engine's own default.
    sqlx::query(&format!("INSERT INTO {example3_name} (id) VALUES (?1)"))
        .bind(1_i64)
        .execute(pool)
        .await?;

    let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {example3_name}"))
        .fetch_one(pool)
        .await?;
    info!(rows = count, "Bye");

    Ok(())
}
