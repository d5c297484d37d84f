//! SQL type definitions and mapping.
//!
//! The mapping is a pure lookup from a Rust type to the SQLite type keyword
//! used in a column declaration. Unsigned integers map exactly like signed
//! ones; SQLite stores both in the same 64-bit integer class.

use serde::{Serialize, Serializer};

/// SQL column types understood by the DDL generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    /// `INT`, the keyword produced for Rust integer types.
    Int,
    /// `INTEGER`. Needed for `INTEGER PRIMARY KEY AUTOINCREMENT` rowid aliases.
    Integer,
    Real,
    Text,
    Blob,
    Numeric,
    /// Verbatim type keyword.
    Custom(&'static str),
    /// No known SQL type. Renders as the empty string.
    Unmapped,
}

impl SqlType {
    /// The SQL mapping for a Rust type.
    pub const fn of<T: TypeInfo + ?Sized>() -> SqlType {
        T::SQL_TYPE
    }

    /// Get the SQL type keyword for this type.
    pub const fn sql_name(&self) -> &'static str {
        match self {
            SqlType::Int => "INT",
            SqlType::Integer => "INTEGER",
            SqlType::Real => "REAL",
            SqlType::Text => "TEXT",
            SqlType::Blob => "BLOB",
            SqlType::Numeric => "NUMERIC",
            SqlType::Custom(name) => *name,
            SqlType::Unmapped => "",
        }
    }

    /// Whether this type renders a non-blank keyword.
    pub const fn is_mapped(&self) -> bool {
        !self.sql_name().trim_ascii().is_empty()
    }

    /// Check if this type is numeric.
    pub const fn is_numeric(&self) -> bool {
        matches!(
            self,
            SqlType::Int | SqlType::Integer | SqlType::Real | SqlType::Numeric
        )
    }

    /// Check if this type is text-based.
    pub const fn is_text(&self) -> bool {
        matches!(self, SqlType::Text)
    }
}

impl std::fmt::Display for SqlType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.sql_name())
    }
}

impl Serialize for SqlType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.sql_name())
    }
}

/// Trait for Rust types that have a corresponding SQL column type.
///
/// Binding a column to a type without an impl is a compile error, which is
/// how typed declarations avoid the empty-keyword gap.
pub trait TypeInfo {
    /// The SQL type for this Rust type.
    const SQL_TYPE: SqlType;
}

macro_rules! impl_type_info {
    ($sql:expr => $($ty:ty),+ $(,)?) => {
        $(
            impl TypeInfo for $ty {
                const SQL_TYPE: SqlType = $sql;
            }
        )+
    };
}

impl_type_info!(SqlType::Int => i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, bool);
impl_type_info!(SqlType::Real => f32, f64);
impl_type_info!(SqlType::Text => String, str, char);
impl_type_info!(SqlType::Blob => Vec<u8>, [u8]);

impl<T: TypeInfo + ?Sized> TypeInfo for &T {
    const SQL_TYPE: SqlType = T::SQL_TYPE;
}

impl<T: TypeInfo> TypeInfo for Option<T> {
    const SQL_TYPE: SqlType = T::SQL_TYPE;
}
