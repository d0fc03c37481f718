//! # tinytable-core
//!
//! Declarative SQL table schemas and the DDL text they generate.
//!
//! This crate provides:
//! - A closed set of SQLite column types and attributes
//! - Column and table declarations validated at construction time
//! - `CREATE TABLE` / `ALTER TABLE ... ADD` generation, plus the handful of
//!   statements a table rebuild needs (rename, copy rows, drop)
//!
//! ## Declaring a table
//!
//! ```rust
//! use tinytable_core::{Table, integer, text};
//!
//! let table = Table::new(
//!     "example",
//!     integer("id").primary_key().autoincrement().not_null(),
//!     vec![text("ex_default").default_value("def")],
//! )
//! .unwrap();
//!
//! assert_eq!(
//!     table.create_sql(),
//!     "CREATE TABLE example(id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL, \
//!      ex_default TEXT DEFAULT 'def')"
//! );
//! ```
//!
//! ## Default values
//!
//! DDL has no parameter binding, so `DEFAULT` literals are escaped textually
//! (wrapped in single quotes, embedded quotes doubled). Never build a default
//! from untrusted input.
//!
//! ## Features
//!
//! - `serde`: `Serialize`/`Deserialize` for the schema types. Deserializing a
//!   [`Table`] runs the same validation as [`Table::from_columns`].

pub mod ddl;
pub mod error;
pub mod schema;

pub use error::{Result, SchemaError};
pub use schema::{
    blob, integer, numeric, real, text, Attribute, Column, ForeignKeyRef, SqlType, Table,
};
