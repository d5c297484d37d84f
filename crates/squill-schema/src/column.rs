//! Column descriptors.

use squill_core::{Constraint, SqlType, TypeInfo, render_constraints};
use std::sync::Arc;

/// One column of a table: a name, the SQL type inferred from a Rust type (or
/// given explicitly), and constraint tags in declaration order.
///
/// Names are not validated; they must be non-empty and unique within their
/// table.
#[derive(Debug, Clone)]
pub struct Column {
    name: String,
    sql_type: SqlType,
    constraints: Vec<Arc<dyn Constraint>>,
}

impl Column {
    /// A column whose SQL type is mapped from the Rust type `T`.
    ///
    /// ```ignore
    /// let id = Column::of::<u32>("id").constraint(AutoIncrement);
    /// assert_eq!(id.render(), "id INT AUTOINCREMENT");
    /// ```
    pub fn of<T: TypeInfo + ?Sized>(name: impl Into<String>) -> Self {
        Self::new(name, T::SQL_TYPE)
    }

    /// A column with an explicit SQL type tag.
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            name: name.into(),
            sql_type,
            constraints: Vec::new(),
        }
    }

    /// Append a constraint tag.
    pub fn constraint(mut self, constraint: impl Constraint + 'static) -> Self {
        self.constraints.push(Arc::new(constraint));
        self
    }

    /// Append an already shared constraint tag.
    pub fn shared_constraint(mut self, constraint: Arc<dyn Constraint>) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sql_type(&self) -> SqlType {
        self.sql_type
    }

    pub fn constraints(&self) -> &[Arc<dyn Constraint>] {
        &self.constraints
    }

    /// Render the column definition: `<name> <TYPE>[ <constraints>]`.
    ///
    /// An unmapped type renders as an empty keyword, so such a column reads
    /// `name ` or `name  NOT NULL`.
    pub fn render(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.sql_type.sql_name());
        if !self.constraints.is_empty() {
            sql.push(' ');
            sql.push_str(&render_constraints(&self.constraints));
        }
        sql
    }
}
