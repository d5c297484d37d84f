//! Low-level FFI surface over libsqlite3.
//!
//! Only the handful of entry points the connection wrapper needs are
//! re-exported from `libsqlite3-sys`, together with small helpers that turn
//! engine-owned C strings into Rust strings.

use std::ffi::{CStr, c_int};

pub use libsqlite3_sys::{
    SQLITE_DONE, SQLITE_OK, SQLITE_OPEN_CREATE, SQLITE_OPEN_READONLY, SQLITE_OPEN_READWRITE,
    SQLITE_READONLY, SQLITE_ROW, SQLITE_TRANSIENT, sqlite3, sqlite3_bind_text,
    sqlite3_busy_timeout, sqlite3_close, sqlite3_column_count, sqlite3_column_text,
    sqlite3_db_readonly, sqlite3_errcode, sqlite3_errmsg, sqlite3_errstr, sqlite3_finalize,
    sqlite3_libversion, sqlite3_libversion_number, sqlite3_open_v2, sqlite3_prepare_v2,
    sqlite3_step, sqlite3_stmt,
};

/// Get the SQLite library version as a string.
pub fn version() -> &'static str {
    // SAFETY: sqlite3_libversion returns a static string
    unsafe {
        let ptr = sqlite3_libversion();
        CStr::from_ptr(ptr).to_str().unwrap_or("unknown")
    }
}

/// Get the SQLite library version as a number.
pub fn version_number() -> i32 {
    // SAFETY: sqlite3_libversion_number is always safe to call
    unsafe { sqlite3_libversion_number() }
}

/// Convert an SQLite result code to a human-readable string.
pub fn error_string(code: c_int) -> String {
    // SAFETY: sqlite3_errstr returns a static string for every code
    unsafe {
        let ptr = sqlite3_errstr(code);
        if ptr.is_null() {
            return "unknown error".to_string();
        }
        CStr::from_ptr(ptr).to_string_lossy().into_owned()
    }
}

/// The most recent error message and result code recorded on a handle.
///
/// # Safety
///
/// `db` must be a valid, open handle.
pub unsafe fn last_error(db: *mut sqlite3) -> (String, c_int) {
    // SAFETY: the caller guarantees db is valid; errmsg never returns a
    // dangling pointer for a valid handle
    unsafe {
        let code = sqlite3_errcode(db);
        let ptr = sqlite3_errmsg(db);
        let msg = if ptr.is_null() {
            error_string(code)
        } else {
            CStr::from_ptr(ptr).to_string_lossy().into_owned()
        };
        (msg, code)
    }
}
