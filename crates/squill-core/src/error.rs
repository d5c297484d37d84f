//! Error types for Squill operations.
//!
//! Every failure while building a schema reaches the caller as one [`Error`]:
//! the connection could not be opened, a DDL statement failed, or a
//! declaration was rejected before any SQL ran.

use std::fmt;

/// The primary error type for all Squill operations.
#[derive(Debug)]
pub enum Error {
    /// Opening or closing the database failed
    Connection(ConnectionError),
    /// A statement failed to prepare or execute
    Statement(StatementError),
    /// A table or column declaration was rejected
    Schema(SchemaError),
}

#[derive(Debug)]
pub struct ConnectionError {
    pub kind: ConnectionErrorKind,
    pub message: String,
    /// Engine result code, when the engine produced one
    pub code: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionErrorKind {
    /// The database file could not be opened or created
    Open,
    /// The path cannot be handed to the engine (interior NUL byte)
    InvalidPath,
    /// The handle could not be released cleanly
    Close,
}

#[derive(Debug)]
pub struct StatementError {
    pub kind: StatementErrorKind,
    pub sql: String,
    pub message: String,
    pub code: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementErrorKind {
    /// The engine rejected the SQL text
    Prepare,
    /// The statement failed while running
    Execute,
    /// The SQL cannot be handed to the engine (interior NUL byte)
    InvalidSql,
    /// A parameter could not be bound
    Bind,
}

#[derive(Debug)]
pub struct SchemaError {
    pub kind: SchemaErrorKind,
    pub table: String,
    pub column: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorKind {
    /// A column's type has no SQL keyword
    UnmappedType,
}

/// Result type alias for Squill operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Is this a failure to open or close the database?
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Error::Connection(_))
    }

    /// Is this a failure reported by the engine for a statement?
    pub fn is_statement_error(&self) -> bool {
        matches!(self, Error::Statement(_))
    }

    /// Is this a rejected declaration?
    pub fn is_schema_error(&self) -> bool {
        matches!(self, Error::Schema(_))
    }

    /// Get the SQL that caused this error, if available
    pub fn sql(&self) -> Option<&str> {
        match self {
            Error::Statement(s) => Some(&s.sql),
            _ => None,
        }
    }

    /// Get the engine result code, if available
    pub fn code(&self) -> Option<i32> {
        match self {
            Error::Connection(c) => c.code,
            Error::Statement(s) => s.code,
            Error::Schema(_) => None,
        }
    }

    /// The diagnostic text without the category prefix.
    pub fn message(&self) -> &str {
        match self {
            Error::Connection(c) => &c.message,
            Error::Statement(s) => &s.message,
            Error::Schema(s) => &s.message,
        }
    }
}

impl SchemaError {
    /// A column whose type renders as an empty keyword.
    pub fn unmapped_type(table: impl Into<String>, column: impl Into<String>) -> Self {
        let table = table.into();
        let column = column.into();
        let message = format!("column '{table}.{column}' has no SQL type mapping");
        Self {
            kind: SchemaErrorKind::UnmappedType,
            table,
            column: Some(column),
            message,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Connection(e) => write!(f, "Connection error: {}", e),
            Error::Statement(e) => write!(f, "Statement error: {}", e),
            Error::Schema(e) => write!(f, "Schema error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for StatementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (in `{}`)", self.message, self.sql)
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<ConnectionError> for Error {
    fn from(err: ConnectionError) -> Self {
        Error::Connection(err)
    }
}

impl From<StatementError> for Error {
    fn from(err: StatementError) -> Self {
        Error::Statement(err)
    }
}

impl From<SchemaError> for Error {
    fn from(err: SchemaError) -> Self {
        Error::Schema(err)
    }
}
