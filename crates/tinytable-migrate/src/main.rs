//! tinytable CLI
//!
//! Command-line tool for creating and upgrading databases from schema files.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use tinytable_migrate::config::DEFAULT_DATABASE_URL;
use tinytable_migrate::diff::existing_columns;
use tinytable_migrate::prelude::*;
use tinytable_migrate::version::read_state;

/// Declarative SQLite schemas with versioned diff migrations.
#[derive(Parser)]
#[command(name = "tinytable")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL (SQLite path or connection string).
    #[arg(short, long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    database: String,

    /// Enforce FOREIGN KEY constraints.
    #[arg(long)]
    foreign_keys: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the CREATE TABLE statements of a schema file.
    CreateSql {
        /// Schema file (JSON).
        schema: PathBuf,
    },

    /// Create or upgrade the database to a schema file's version.
    Migrate {
        /// Schema file (JSON).
        schema: PathBuf,
    },

    /// Show the stored schema version.
    Version,

    /// List the columns of a table.
    Columns {
        /// Table name.
        table: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = DatabaseConfig::new(&cli.database).foreign_keys(cli.foreign_keys);

    match cli.command {
        Commands::CreateSql { schema } => {
            let file = SchemaFile::load(&schema)?;
            for table in &file.tables {
                println!("{};", table.create_sql());
            }
        }

        Commands::Migrate { schema } => {
            let helper = SchemaFile::load(&schema)?.into_helper()?;
            let target = helper.version();
            let holder = DatabaseHolder::new(config, helper);
            holder.pool().await?;
            info!(version = target, "Database is at the schema version");
        }

        Commands::Version => {
            let pool = config.connect().await?;
            let mut conn = pool.acquire().await?;
            match read_state(&mut conn).await? {
                SchemaState::NoSchema => println!("no schema"),
                SchemaState::AtVersion(v) => println!("{v}"),
            }
        }

        Commands::Columns { table } => {
            let pool = config.connect().await?;
            let mut conn = pool.acquire().await?;
            let columns = existing_columns(&mut conn, &table).await?;
            if columns.is_empty() {
                info!(table = %table, "No such table");
            }
            for column in columns {
                println!("{}\t{}", column.name, column.declared_type);
            }
        }
    }

    Ok(())
}
