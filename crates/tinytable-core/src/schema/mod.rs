//! Schema declarations: types, attributes, columns and tables.

mod attribute;
mod column;
mod table;
mod types;

pub use attribute::Attribute;
pub use column::{blob, integer, numeric, real, text, Column, FOREIGN_KEY, PRIMARY_KEY, UNIQUE};
pub use table::{validate_identifier, Table};
pub use types::{ForeignKeyRef, SqlType};
