//! Column constraint tags.
//!
//! A constraint is a marker whose only behavior is rendering its SQL clause.
//! Columns keep their constraints in declaration order and the clauses are
//! emitted in that order.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// A column constraint clause.
///
/// Implement this for application-specific clauses the built-in tags do not
/// cover.
pub trait Constraint: fmt::Debug + Send + Sync {
    /// The SQL text of this clause, e.g. `NOT NULL`.
    fn render(&self) -> Cow<'static, str>;
}

/// `AUTOINCREMENT`.
///
/// SQLite only accepts this after `PRIMARY KEY` on an `INTEGER` column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutoIncrement;

impl Constraint for AutoIncrement {
    fn render(&self) -> Cow<'static, str> {
        Cow::Borrowed("AUTOINCREMENT")
    }
}

/// `NOT NULL`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotNull;

impl Constraint for NotNull {
    fn render(&self) -> Cow<'static, str> {
        Cow::Borrowed("NOT NULL")
    }
}

/// `PRIMARY KEY`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrimaryKey;

impl Constraint for PrimaryKey {
    fn render(&self) -> Cow<'static, str> {
        Cow::Borrowed("PRIMARY KEY")
    }
}

/// `UNIQUE`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unique;

impl Constraint for Unique {
    fn render(&self) -> Cow<'static, str> {
        Cow::Borrowed("UNIQUE")
    }
}

/// `DEFAULT <expr>`. The expression is emitted verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultValue(pub Cow<'static, str>);

impl DefaultValue {
    pub fn new(expr: impl Into<Cow<'static, str>>) -> Self {
        Self(expr.into())
    }
}

impl Constraint for DefaultValue {
    fn render(&self) -> Cow<'static, str> {
        Cow::Owned(format!("DEFAULT {}", self.0))
    }
}

/// `CHECK (<expr>)`. The expression is emitted verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Check(pub Cow<'static, str>);

impl Check {
    pub fn new(expr: impl Into<Cow<'static, str>>) -> Self {
        Self(expr.into())
    }
}

impl Constraint for Check {
    fn render(&self) -> Cow<'static, str> {
        Cow::Owned(format!("CHECK ({})", self.0))
    }
}

/// Join constraint clauses with single spaces, in order.
///
/// Returns an empty string for an empty list; never a leading or trailing
/// space.
pub fn render_constraints(constraints: &[Arc<dyn Constraint>]) -> String {
    let mut sql = String::new();
    for (i, constraint) in constraints.iter().enumerate() {
        if i > 0 {
            sql.push(' ');
        }
        sql.push_str(&constraint.render());
    }
    sql
}
