//! Core types and traits for Squill.
//!
//! This crate provides the building blocks the schema generator works with:
//!
//! - `SqlType` / `TypeInfo` for mapping Rust types to SQL type keywords
//! - `Constraint` and the built-in constraint tags
//! - `Connection` trait implemented by database drivers
//! - `Error` taxonomy shared by every crate in the workspace

pub mod connection;
pub mod constraint;
pub mod error;
pub mod types;

pub use connection::Connection;
pub use constraint::{
    AutoIncrement, Check, Constraint, DefaultValue, NotNull, PrimaryKey, Unique,
    render_constraints,
};
pub use error::{
    ConnectionError, ConnectionErrorKind, Error, Result, SchemaError, SchemaErrorKind,
    StatementError, StatementErrorKind,
};
pub use types::{SqlType, TypeInfo};
