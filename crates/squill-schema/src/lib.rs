//! Table declarations and schema creation for Squill.
//!
//! This crate provides:
//! - `Column` and `Table` descriptors that render their own SQL fragments
//! - `CreateTable` statement builder
//! - `SchemaBuilder` / `SchemaPlan` for validating and rendering a batch of
//!   `CREATE TABLE IF NOT EXISTS` statements
//! - `Schema`, a live connection on which every declared table exists
//!
//! # Example
//!
//! ```ignore
//! use squill_core::{AutoIncrement, NotNull};
//! use squill_schema::{Column, Schema, SchemaOptions, Table};
//!
//! let users = Table::new("users")
//!     .column(Column::of::<u32>("id").constraint(AutoIncrement))
//!     .column(Column::of::<String>("name").constraint(NotNull));
//!
//! assert_eq!(users.render(), "id INT AUTOINCREMENT,name TEXT NOT NULL");
//!
//! let schema = Schema::create(conn, [users], SchemaOptions::default())?;
//! ```

pub mod column;
pub mod options;
pub mod schema;
pub mod table;

pub use column::Column;
pub use options::SchemaOptions;
pub use schema::{Schema, SchemaBuilder, SchemaPlan, TableStatement};
pub use table::{CreateTable, Table};
