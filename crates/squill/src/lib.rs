//! Squill - declare SQLite tables as Rust descriptors and have them created.
//!
//! Squill turns table declarations into `CREATE TABLE IF NOT EXISTS`
//! statements and runs them against a SQLite database file:
//!
//! - Column types are inferred from Rust types at compile time
//! - Constraint tags render in declaration order
//! - Opening a schema creates the file if needed and every missing table
//! - Re-opening against an existing file is a no-op for tables already there
//!
//! There is no query layer: a `Schema` guarantees the tables exist and owns
//! the connection, nothing more.
//!
//! # Quick Start
//!
//! ```ignore
//! use squill::prelude::*;
//!
//! let schema = squill::schema(
//!     "test.db",
//!     [table(
//!         "users",
//!         [
//!             column::<i64>("id").constraint(PrimaryKey),
//!             column::<String>("name").constraint(NotNull),
//!         ],
//!     )],
//! )?;
//!
//! assert_eq!(schema.table_names(), ["users".to_string()]);
//! ```

pub use squill_core::{
    AutoIncrement, Check, Connection, ConnectionError, ConnectionErrorKind, Constraint,
    DefaultValue, Error, NotNull, PrimaryKey, Result, SchemaError, SchemaErrorKind, SqlType,
    StatementError, StatementErrorKind, TypeInfo, Unique, render_constraints,
};
pub use squill_schema::{
    Column, CreateTable, Schema, SchemaBuilder, SchemaOptions, SchemaPlan, Table, TableStatement,
};
pub use squill_sqlite::{OpenFlags, SqliteConfig, SqliteConnection, sqlite_version};

/// A schema bound to a SQLite connection.
pub type SqliteSchema = Schema<SqliteConnection>;

/// Declare a column whose SQL type is mapped from `T`.
pub fn column<T: TypeInfo + ?Sized>(name: impl Into<String>) -> Column {
    Column::of::<T>(name)
}

/// Declare a table from its columns, in order.
pub fn table(name: impl Into<String>, columns: impl IntoIterator<Item = Column>) -> Table {
    Table::new(name).columns(columns)
}

/// Open (creating if missing) the database at `path` and create every table
/// that does not exist yet.
pub fn schema(
    path: impl Into<String>,
    tables: impl IntoIterator<Item = Table>,
) -> Result<SqliteSchema> {
    open_schema(&SqliteConfig::file(path), SchemaOptions::default(), tables)
}

/// Like [`schema`], with explicit connection and batch options.
///
/// Declarations are validated before the database is opened, so a rejected
/// declaration never creates a file.
pub fn open_schema(
    config: &SqliteConfig,
    options: SchemaOptions,
    tables: impl IntoIterator<Item = Table>,
) -> Result<SqliteSchema> {
    let plan = SchemaBuilder::new().options(options).tables(tables).build()?;
    tracing::debug!(
        path = %config.path,
        statements = plan.statements().len(),
        "Opening schema database"
    );
    let conn = SqliteConnection::open(config)?;
    plan.apply(conn)
}

pub mod prelude {
    //! The declaration surface in one import.
    pub use crate::{
        AutoIncrement, Check, Column, DefaultValue, Error, NotNull, PrimaryKey, Result, Schema,
        SchemaOptions, SqlType, SqliteConfig, SqliteSchema, Table, Unique, column, schema, table,
    };
}
