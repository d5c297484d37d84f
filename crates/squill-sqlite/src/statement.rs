//! Prepared statement guard.
//!
//! A [`Statement`] owns one `sqlite3_stmt` and finalizes it when dropped, so
//! the handle is released on every exit path, error paths included.

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::borrow_as_ptr)]

use crate::ffi;
use squill_core::{Error, StatementError, StatementErrorKind};
use std::ffi::{CStr, CString, c_int};
use std::ptr;

/// A prepared statement on an open database handle, borrowing its SQL text.
///
/// Only created inside `SqliteConnection` methods, so it never outlives the
/// handle it was prepared on.
pub(crate) struct Statement<'sql> {
    stmt: *mut ffi::sqlite3_stmt,
    db: *mut ffi::sqlite3,
    sql: &'sql str,
}

impl<'sql> Statement<'sql> {
    /// Compile `sql` against `db`.
    ///
    /// Blank SQL compiles to a statement with no work to do.
    pub(crate) fn prepare(db: *mut ffi::sqlite3, sql: &'sql str) -> Result<Self, Error> {
        let c_sql = CString::new(sql).map_err(|_| {
            Error::Statement(StatementError {
                kind: StatementErrorKind::InvalidSql,
                sql: sql.to_string(),
                message: "SQL contains null byte".to_string(),
                code: None,
            })
        })?;

        let mut stmt: *mut ffi::sqlite3_stmt = ptr::null_mut();

        // SAFETY: db is an open handle owned by the caller; all pointers are valid
        let rc = unsafe {
            ffi::sqlite3_prepare_v2(
                db,
                c_sql.as_ptr(),
                c_sql.as_bytes().len() as c_int,
                &mut stmt,
                ptr::null_mut(),
            )
        };

        // Constructed before the rc check so a partially produced handle is
        // still finalized by Drop.
        let statement = Self { stmt, db, sql };

        if rc != ffi::SQLITE_OK {
            return Err(statement.error(StatementErrorKind::Prepare));
        }

        tracing::trace!(sql = %sql, "Prepared statement");
        Ok(statement)
    }

    /// Bind a text parameter (1-based index).
    pub(crate) fn bind_text(&mut self, index: usize, value: &str) -> Result<(), Error> {
        if self.stmt.is_null() {
            return Ok(());
        }

        // SAFETY: stmt is valid; SQLITE_TRANSIENT makes the engine copy the bytes
        let rc = unsafe {
            ffi::sqlite3_bind_text(
                self.stmt,
                index as c_int,
                value.as_ptr().cast(),
                value.len() as c_int,
                ffi::SQLITE_TRANSIENT(),
            )
        };

        if rc != ffi::SQLITE_OK {
            return Err(self.error(StatementErrorKind::Bind));
        }
        Ok(())
    }

    /// Advance the statement. Returns `true` while a row is available.
    pub(crate) fn step(&mut self) -> Result<bool, Error> {
        if self.stmt.is_null() {
            return Ok(false);
        }

        // SAFETY: stmt is valid
        let rc = unsafe { ffi::sqlite3_step(self.stmt) };
        match rc {
            ffi::SQLITE_ROW => Ok(true),
            ffi::SQLITE_DONE => Ok(false),
            _ => Err(self.error(StatementErrorKind::Execute)),
        }
    }

    /// Run the statement to completion, discarding rows.
    pub(crate) fn run(&mut self) -> Result<(), Error> {
        while self.step()? {}
        Ok(())
    }

    pub(crate) fn column_count(&self) -> usize {
        if self.stmt.is_null() {
            return 0;
        }
        // SAFETY: stmt is valid
        let count = unsafe { ffi::sqlite3_column_count(self.stmt) };
        usize::try_from(count).unwrap_or(0)
    }

    /// Read a column of the current row as text. `None` for SQL NULL.
    pub(crate) fn column_text(&self, index: usize) -> Option<String> {
        if self.stmt.is_null() {
            return None;
        }
        // SAFETY: stmt is valid and positioned on a row; the pointer stays
        // valid until the next step, and we copy out immediately
        unsafe {
            let ptr = ffi::sqlite3_column_text(self.stmt, index as c_int);
            if ptr.is_null() {
                None
            } else {
                Some(CStr::from_ptr(ptr.cast()).to_string_lossy().into_owned())
            }
        }
    }

    fn error(&self, kind: StatementErrorKind) -> Error {
        // SAFETY: db outlives the statement
        let (message, code) = unsafe { ffi::last_error(self.db) };
        Error::Statement(StatementError {
            kind,
            sql: self.sql.to_string(),
            message,
            code: Some(code),
        })
    }
}

impl Drop for Statement<'_> {
    fn drop(&mut self) {
        if !self.stmt.is_null() {
            // SAFETY: stmt was produced by prepare_v2 and is finalized only here
            unsafe {
                ffi::sqlite3_finalize(self.stmt);
            }
            tracing::trace!(sql = %self.sql, "Finalized statement");
        }
    }
}
