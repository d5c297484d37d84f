//! SQLite connection wrapper for Squill.
//!
// FFI bindings require unsafe code - this is expected for database drivers
#![allow(unsafe_code)]
//!
//! This crate owns the native SQLite handle the schema executor runs its DDL
//! against. It implements the `Connection` trait from squill-core.
//!
//! # Features
//!
//! - File-based and in-memory databases
//! - Configurable open flags and busy timeout
//! - Prepared statements finalized on every exit path
//! - Read-only introspection of `sqlite_master`
//!
//! # Example
//!
//! ```rust,ignore
//! use squill_sqlite::{SqliteConfig, SqliteConnection};
//!
//! let conn = SqliteConnection::open(&SqliteConfig::file("app.db"))?;
//! conn.execute_raw("CREATE TABLE IF NOT EXISTS users(id INTEGER PRIMARY KEY, name TEXT);")?;
//! assert_eq!(conn.table_names()?, vec!["users".to_string()]);
//! conn.close()?;
//! ```
//!
//! # Thread Safety
//!
//! `SqliteConnection` is `Send` but not `Sync`. There is no internal locking;
//! a connection has a single owner at any time.

pub mod connection;
pub mod ffi;
mod statement;

pub use connection::{OpenFlags, SqliteConfig, SqliteConnection};

/// Re-export the SQLite library version.
pub fn sqlite_version() -> &'static str {
    ffi::version()
}

/// Re-export the SQLite library version number.
pub fn sqlite_version_number() -> i32 {
    ffi::version_number()
}
