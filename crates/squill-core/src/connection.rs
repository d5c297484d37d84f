//! Database connection trait.
//!
//! The schema executor only needs to run DDL text and optionally bracket it in
//! a transaction, so that is all [`Connection`] asks of a driver. Every call
//! blocks until the engine has finished.

use crate::error::Result;

/// A live, exclusively owned database connection.
pub trait Connection {
    /// Execute one SQL statement to completion, discarding any rows.
    fn execute(&self, sql: &str) -> Result<()>;

    /// Release the connection, reporting a failure to close.
    ///
    /// Dropping a connection also releases it, but silently.
    fn close(self) -> Result<()>
    where
        Self: Sized;

    /// Begin a transaction.
    fn begin(&self) -> Result<()> {
        self.execute("BEGIN")
    }

    /// Commit the current transaction.
    fn commit(&self) -> Result<()> {
        self.execute("COMMIT")
    }

    /// Roll back the current transaction.
    fn rollback(&self) -> Result<()> {
        self.execute("ROLLBACK")
    }
}
