//! SQLite connection lifecycle.
//!
//! [`SqliteConnection`] owns exactly one native database handle. The handle
//! is opened in [`SqliteConnection::open`] and released exactly once, either
//! by [`SqliteConnection::close`] or when the connection is dropped.

// Allow casts in FFI code where we need to match C types exactly
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::borrow_as_ptr)] // FFI requires raw pointers

use crate::ffi;
use crate::statement::Statement;
use serde::{Deserialize, Serialize};
use squill_core::{Connection, ConnectionError, ConnectionErrorKind, Error, Result};
use std::ffi::{CString, c_int};
use std::ptr;

/// Configuration for opening SQLite connections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SqliteConfig {
    /// Path to the database file, or ":memory:" for in-memory database.
    pub path: String,
    /// Open flags (read-only, read-write, create, etc.)
    pub flags: OpenFlags,
    /// Busy timeout in milliseconds. Zero leaves the engine default.
    pub busy_timeout_ms: u32,
}

/// Flags controlling how the database is opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenFlags {
    /// Open for reading only.
    pub read_only: bool,
    /// Open for reading and writing.
    pub read_write: bool,
    /// Create the database if it doesn't exist.
    pub create: bool,
}

impl OpenFlags {
    /// Create flags for read-only access.
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Default::default()
        }
    }

    /// Create flags for read-write access (database must exist).
    pub fn read_write() -> Self {
        Self {
            read_write: true,
            ..Default::default()
        }
    }

    /// Create flags for read-write access with creation if needed.
    pub fn create_read_write() -> Self {
        Self {
            read_write: true,
            create: true,
            ..Default::default()
        }
    }

    fn to_sqlite_flags(self) -> c_int {
        let mut flags = 0;

        if self.read_only {
            flags |= ffi::SQLITE_OPEN_READONLY;
        }
        if self.read_write {
            flags |= ffi::SQLITE_OPEN_READWRITE;
        }
        if self.create {
            flags |= ffi::SQLITE_OPEN_CREATE;
        }

        // No access mode given: create-if-missing, read-write
        if flags & (ffi::SQLITE_OPEN_READONLY | ffi::SQLITE_OPEN_READWRITE) == 0 {
            flags |= ffi::SQLITE_OPEN_READWRITE | ffi::SQLITE_OPEN_CREATE;
        }

        flags
    }
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: ":memory:".to_string(),
            flags: OpenFlags::create_read_write(),
            busy_timeout_ms: 5000,
        }
    }
}

impl SqliteConfig {
    /// Create a new config for a file-based database.
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Create a new config for an in-memory database.
    pub fn memory() -> Self {
        Self::default()
    }

    /// Set open flags.
    pub fn flags(mut self, flags: OpenFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set busy timeout.
    pub fn busy_timeout(mut self, ms: u32) -> Self {
        self.busy_timeout_ms = ms;
        self
    }
}

/// A connection to a SQLite database.
///
/// The connection is `Send` but not `Sync`: it may move to another thread,
/// but only one owner can use it at a time.
pub struct SqliteConnection {
    db: *mut ffi::sqlite3,
    path: String,
}

// SAFETY: the bundled engine is built threadsafe, and the handle is never
// shared: without Sync, all access goes through the single owner.
unsafe impl Send for SqliteConnection {}

impl SqliteConnection {
    /// Open a new SQLite connection with the given configuration.
    pub fn open(config: &SqliteConfig) -> Result<Self> {
        let c_path = CString::new(config.path.as_str()).map_err(|_| {
            Error::Connection(ConnectionError {
                kind: ConnectionErrorKind::InvalidPath,
                message: format!("Invalid path {:?}: contains null byte", config.path),
                code: None,
            })
        })?;

        let mut db: *mut ffi::sqlite3 = ptr::null_mut();
        let flags = config.flags.to_sqlite_flags();

        // SAFETY: We pass valid pointers and check the return value
        let rc = unsafe { ffi::sqlite3_open_v2(c_path.as_ptr(), &mut db, flags, ptr::null()) };

        if rc != ffi::SQLITE_OK {
            let msg = if db.is_null() {
                ffi::error_string(rc)
            } else {
                // SAFETY: open_v2 hands back a handle even on failure; it
                // must be closed here since no connection will own it
                unsafe {
                    let (msg, _) = ffi::last_error(db);
                    ffi::sqlite3_close(db);
                    msg
                }
            };

            tracing::debug!(path = %config.path, code = rc, error = %msg, "Open failed");
            return Err(Error::Connection(ConnectionError {
                kind: ConnectionErrorKind::Open,
                message: format!("Failed to open database '{}': {}", config.path, msg),
                code: Some(rc),
            }));
        }

        let conn = Self {
            db,
            path: config.path.clone(),
        };

        // The engine quietly downgrades to read-only when the file is not
        // writable; a read-write request must not succeed that way.
        if flags & ffi::SQLITE_OPEN_READWRITE != 0 && conn.is_read_only() {
            tracing::debug!(path = %config.path, "Opened read-only instead of read-write");
            return Err(Error::Connection(ConnectionError {
                kind: ConnectionErrorKind::Open,
                message: format!(
                    "Failed to open database '{}' for writing: {}",
                    config.path,
                    ffi::error_string(ffi::SQLITE_READONLY)
                ),
                code: Some(ffi::SQLITE_READONLY),
            }));
        }

        if config.busy_timeout_ms > 0 {
            // SAFETY: db is valid
            unsafe {
                ffi::sqlite3_busy_timeout(db, config.busy_timeout_ms.min(i32::MAX as u32) as c_int);
            }
        }

        tracing::info!(path = %config.path, "Opened SQLite database");
        Ok(conn)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        Self::open(&SqliteConfig::memory())
    }

    /// Open a file-based database, creating it if missing.
    pub fn open_file(path: impl Into<String>) -> Result<Self> {
        Self::open(&SqliteConfig::file(path))
    }

    /// Get the database path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether the main database was opened without write access.
    pub fn is_read_only(&self) -> bool {
        // SAFETY: db is valid; the schema name is a NUL-terminated literal
        unsafe { ffi::sqlite3_db_readonly(self.db, c"main".as_ptr()) == 1 }
    }

    /// Prepare, run to completion, and finalize one statement.
    pub fn execute_raw(&self, sql: &str) -> Result<()> {
        let mut stmt = Statement::prepare(self.db, sql)?;
        stmt.run()
    }

    /// Run a query with text parameters and collect every row as text.
    ///
    /// Parameters bind to `?1`, `?2`, ... in order. SQL NULL reads as `None`.
    pub fn query_text(&self, sql: &str, params: &[&str]) -> Result<Vec<Vec<Option<String>>>> {
        let mut stmt = Statement::prepare(self.db, sql)?;
        for (i, param) in params.iter().enumerate() {
            stmt.bind_text(i + 1, param)?;
        }

        let columns = stmt.column_count();
        let mut rows = Vec::new();
        while stmt.step()? {
            rows.push((0..columns).map(|i| stmt.column_text(i)).collect());
        }
        Ok(rows)
    }

    /// Names of the user tables, in creation order.
    pub fn table_names(&self) -> Result<Vec<String>> {
        let rows = self.query_text(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
             ORDER BY rowid",
            &[],
        )?;
        Ok(rows
            .into_iter()
            .filter_map(|row| row.into_iter().next().flatten())
            .collect())
    }

    /// The stored `CREATE TABLE` text of a table, if it exists.
    pub fn table_sql(&self, table: &str) -> Result<Option<String>> {
        let rows = self.query_text(
            "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = ?1",
            &[table],
        )?;
        Ok(rows
            .into_iter()
            .next()
            .and_then(|row| row.into_iter().next().flatten()))
    }

    /// Close the connection, reporting a failure to do so.
    ///
    /// On failure the handle stays owned and `Drop` makes the final attempt.
    pub fn close(mut self) -> Result<()> {
        // SAFETY: db is valid; on success it is nulled so Drop skips it
        let rc = unsafe { ffi::sqlite3_close(self.db) };
        if rc == ffi::SQLITE_OK {
            self.db = ptr::null_mut();
        } else {
            let message = ffi::error_string(rc);
            return Err(Error::Connection(ConnectionError {
                kind: ConnectionErrorKind::Close,
                message: format!("Failed to close database '{}': {}", self.path, message),
                code: Some(rc),
            }));
        }
        tracing::info!(path = %self.path, "Closed SQLite database");
        Ok(())
    }
}

impl Connection for SqliteConnection {
    fn execute(&self, sql: &str) -> Result<()> {
        self.execute_raw(sql)
    }

    fn close(self) -> Result<()> {
        SqliteConnection::close(self)
    }
}

impl Drop for SqliteConnection {
    fn drop(&mut self) {
        if !self.db.is_null() {
            // SAFETY: db is valid and has not been closed; every Statement
            // is finalized before the method that prepared it returns
            unsafe {
                ffi::sqlite3_close(self.db);
            }
            self.db = ptr::null_mut();
            tracing::debug!(path = %self.path, "Released SQLite handle on drop");
        }
    }
}

impl std::fmt::Debug for SqliteConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteConnection")
            .field("path", &self.path)
            .field("open", &!self.db.is_null())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use squill_core::{ConnectionErrorKind, StatementErrorKind};

    #[test]
    fn test_open_memory() {
        let conn = SqliteConnection::open_memory().unwrap();
        assert_eq!(conn.path(), ":memory:");
    }

    #[test]
    fn test_execute_raw() {
        let conn = SqliteConnection::open_memory().unwrap();
        conn.execute_raw("CREATE TABLE test (id INTEGER PRIMARY KEY, name TEXT)")
            .unwrap();
        conn.execute_raw("INSERT INTO test (name) VALUES ('Alice')")
            .unwrap();

        let rows = conn.query_text("SELECT name FROM test", &[]).unwrap();
        assert_eq!(rows, vec![vec![Some("Alice".to_string())]]);
    }

    #[test]
    fn test_blank_sql_is_a_no_op() {
        let conn = SqliteConnection::open_memory().unwrap();
        conn.execute_raw("   ").unwrap();
        conn.execute_raw("").unwrap();
    }

    #[test]
    fn test_prepare_error_carries_engine_message() {
        let conn = SqliteConnection::open_memory().unwrap();
        let err = conn
            .execute_raw("CREATE TABLE IF NOT EXISTS empty();")
            .unwrap_err();
        match err {
            Error::Statement(e) => {
                assert_eq!(e.kind, StatementErrorKind::Prepare);
                assert!(e.message.contains("syntax error"), "{}", e.message);
                assert_eq!(e.sql, "CREATE TABLE IF NOT EXISTS empty();");
                assert_eq!(e.code, Some(libsqlite3_sys::SQLITE_ERROR));
            }
            other => panic!("expected statement error, got {other:?}"),
        }

        // The connection stays usable after a failed prepare.
        conn.execute_raw("CREATE TABLE ok (id INT)").unwrap();
    }

    #[test]
    fn test_step_error() {
        let conn = SqliteConnection::open_memory().unwrap();
        conn.execute_raw("CREATE TABLE t (id INTEGER PRIMARY KEY)")
            .unwrap();
        conn.execute_raw("INSERT INTO t (id) VALUES (1)").unwrap();
        let err = conn.execute_raw("INSERT INTO t (id) VALUES (1)").unwrap_err();
        match err {
            Error::Statement(e) => {
                assert_eq!(e.kind, StatementErrorKind::Execute);
                assert!(e.message.contains("UNIQUE"), "{}", e.message);
            }
            other => panic!("expected statement error, got {other:?}"),
        }
    }

    #[test]
    fn test_null_byte_in_sql() {
        let conn = SqliteConnection::open_memory().unwrap();
        let err = conn.execute_raw("SELECT 1\0").unwrap_err();
        match err {
            Error::Statement(e) => assert_eq!(e.kind, StatementErrorKind::InvalidSql),
            other => panic!("expected statement error, got {other:?}"),
        }
    }

    #[test]
    fn test_null_byte_in_path() {
        let err = SqliteConnection::open_file("bad\0path.db").unwrap_err();
        match err {
            Error::Connection(e) => assert_eq!(e.kind, ConnectionErrorKind::InvalidPath),
            other => panic!("expected connection error, got {other:?}"),
        }
    }

    #[test]
    fn test_open_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no/such/dir/test.db");
        let err = SqliteConnection::open_file(path.to_string_lossy()).unwrap_err();
        match err {
            Error::Connection(e) => {
                assert_eq!(e.kind, ConnectionErrorKind::Open);
                assert_eq!(e.code, Some(libsqlite3_sys::SQLITE_CANTOPEN));
            }
            other => panic!("expected connection error, got {other:?}"),
        }
    }

    #[test]
    fn test_open_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flags.db").to_string_lossy().into_owned();

        // read-write without create requires the file to exist
        let config = SqliteConfig::file(path.clone()).flags(OpenFlags::read_write());
        assert!(SqliteConnection::open(&config).is_err());

        let conn = SqliteConnection::open_file(path.clone()).unwrap();
        conn.execute_raw("CREATE TABLE t (id INT)").unwrap();
        conn.close().unwrap();

        let ro = SqliteConnection::open(&SqliteConfig::file(path).flags(OpenFlags::read_only()))
            .unwrap();
        assert_eq!(ro.table_names().unwrap(), vec!["t".to_string()]);
        assert!(ro.execute_raw("CREATE TABLE u (id INT)").is_err());
    }

    #[test]
    fn test_read_only_handle_reports_read_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ro.db").to_string_lossy().into_owned();
        SqliteConnection::open_file(path.clone()).unwrap().close().unwrap();

        let rw = SqliteConnection::open_file(path.clone()).unwrap();
        assert!(!rw.is_read_only());
        drop(rw);

        let ro = SqliteConnection::open(&SqliteConfig::file(path).flags(OpenFlags::read_only()))
            .unwrap();
        assert!(ro.is_read_only());
    }

    #[test]
    fn test_write_protected_file_fails_read_write_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locked.db");
        let path_str = path.to_string_lossy().into_owned();

        let conn = SqliteConnection::open_file(path_str.clone()).unwrap();
        conn.execute_raw("CREATE TABLE t (id INT)").unwrap();
        conn.close().unwrap();

        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_readonly(true);
        std::fs::set_permissions(&path, perms).unwrap();

        // Privileged users write through file permissions
        if std::fs::OpenOptions::new().write(true).open(&path).is_ok() {
            return;
        }

        for flags in [OpenFlags::create_read_write(), OpenFlags::read_write()] {
            let err = SqliteConnection::open(&SqliteConfig::file(path_str.clone()).flags(flags))
                .unwrap_err();
            assert!(err.is_connection_error(), "{err}");
            match err {
                Error::Connection(e) => {
                    assert_eq!(e.kind, ConnectionErrorKind::Open);
                    assert_eq!(e.code, Some(libsqlite3_sys::SQLITE_READONLY));
                }
                other => panic!("expected connection error, got {other:?}"),
            }
        }

        // Asking for read-only access still works
        let ro =
            SqliteConnection::open(&SqliteConfig::file(path_str).flags(OpenFlags::read_only()))
                .unwrap();
        assert_eq!(ro.table_names().unwrap(), vec!["t".to_string()]);
    }

    #[test]
    fn test_busy_timeout_waits_then_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("busy.db").to_string_lossy().into_owned();

        let holder = SqliteConnection::open_file(path.clone()).unwrap();
        holder.execute_raw("CREATE TABLE t (id INT)").unwrap();
        holder.execute_raw("BEGIN EXCLUSIVE").unwrap();

        let waiter = SqliteConnection::open(&SqliteConfig::file(path).busy_timeout(100)).unwrap();
        let started = std::time::Instant::now();
        let err = waiter.execute_raw("CREATE TABLE u (id INT)").unwrap_err();
        let waited = started.elapsed();

        match err {
            Error::Statement(e) => {
                assert_eq!(e.code, Some(libsqlite3_sys::SQLITE_BUSY));
                assert!(e.message.contains("locked"), "{}", e.message);
            }
            other => panic!("expected statement error, got {other:?}"),
        }
        assert!(
            waited >= std::time::Duration::from_millis(50),
            "gave up after {waited:?}"
        );

        holder.execute_raw("COMMIT").unwrap();
        waiter.execute_raw("CREATE TABLE u (id INT)").unwrap();
    }

    #[test]
    fn test_to_sqlite_flags_defaults_to_create_read_write() {
        let flags = OpenFlags::default().to_sqlite_flags();
        assert_eq!(
            flags,
            ffi::SQLITE_OPEN_READWRITE | ffi::SQLITE_OPEN_CREATE
        );
        assert_eq!(
            OpenFlags::read_only().to_sqlite_flags(),
            ffi::SQLITE_OPEN_READONLY
        );
    }

    #[test]
    fn test_table_introspection() {
        let conn = SqliteConnection::open_memory().unwrap();
        conn.execute_raw("CREATE TABLE b (id INT)").unwrap();
        conn.execute_raw("CREATE TABLE a (id INT)").unwrap();

        assert_eq!(
            conn.table_names().unwrap(),
            vec!["b".to_string(), "a".to_string()]
        );
        assert_eq!(
            conn.table_sql("a").unwrap().as_deref(),
            Some("CREATE TABLE a (id INT)")
        );
        assert_eq!(conn.table_sql("missing").unwrap(), None);
    }

    #[test]
    fn test_connection_trait_transaction() {
        let conn = SqliteConnection::open_memory().unwrap();
        conn.begin().unwrap();
        conn.execute("CREATE TABLE t (id INT)").unwrap();
        conn.rollback().unwrap();
        assert!(conn.table_names().unwrap().is_empty());
    }

    #[test]
    fn test_explicit_close() {
        let conn = SqliteConnection::open_memory().unwrap();
        conn.execute_raw("CREATE TABLE t (id INT)").unwrap();
        Connection::close(conn).unwrap();
    }

    #[test]
    fn test_config_deserialize() {
        let config: SqliteConfig =
            serde_json::from_str(r#"{"path": "app.db", "busy_timeout_ms": 250}"#).unwrap();
        assert_eq!(config.path, "app.db");
        assert_eq!(config.busy_timeout_ms, 250);
        assert_eq!(config.flags, OpenFlags::create_read_write());

        let empty: SqliteConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, SqliteConfig::memory());
    }
}
