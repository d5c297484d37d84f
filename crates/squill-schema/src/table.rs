//! Table descriptors and the CREATE TABLE statement builder.

use crate::column::Column;

/// A named, ordered list of columns.
///
/// A table needs at least one column to produce valid SQL. An empty table is
/// not rejected here; the engine reports the malformed statement when it is
/// executed.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Append a column.
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Append columns in iteration order.
    pub fn columns(mut self, columns: impl IntoIterator<Item = Column>) -> Self {
        self.columns.extend(columns);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_list(&self) -> &[Column] {
        &self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Render the column definitions joined by `,`.
    ///
    /// The table name is not part of the fragment.
    pub fn render(&self) -> String {
        self.columns
            .iter()
            .map(Column::render)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// `CREATE TABLE IF NOT EXISTS <name>(<columns>);`
    pub fn create_statement(&self) -> String {
        CreateTable::new(self).if_not_exists().build()
    }
}

/// Builder for CREATE TABLE statements.
#[derive(Debug)]
pub struct CreateTable<'a> {
    table: &'a Table,
    if_not_exists: bool,
}

impl<'a> CreateTable<'a> {
    /// Create a new CREATE TABLE builder.
    pub fn new(table: &'a Table) -> Self {
        Self {
            table,
            if_not_exists: false,
        }
    }

    /// Add IF NOT EXISTS clause.
    pub fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }

    /// Build the CREATE TABLE SQL.
    pub fn build(&self) -> String {
        let mut sql = String::from("CREATE TABLE ");

        if self.if_not_exists {
            sql.push_str("IF NOT EXISTS ");
        }

        sql.push_str(self.table.name());
        sql.push('(');
        sql.push_str(&self.table.render());
        sql.push_str(");");

        sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use squill_core::{AutoIncrement, NotNull, SqlType, Unique};

    fn users() -> Table {
        Table::new("users")
            .column(Column::of::<u32>("id").constraint(AutoIncrement))
            .column(Column::of::<String>("name"))
    }

    #[test]
    fn test_render_users_fragment() {
        assert_eq!(users().render(), "id INT AUTOINCREMENT,name TEXT");
    }

    #[test]
    fn test_single_column_fragment() {
        let table = Table::new("t").column(Column::of::<i32>("id"));
        assert_eq!(table.render(), "id INT");
    }

    #[test]
    fn test_comma_count_ignores_constraints() {
        for n in 1..6 {
            let table = Table::new("t").columns((0..n).map(|i| {
                Column::of::<String>(format!("c{i}"))
                    .constraint(NotNull)
                    .constraint(Unique)
            }));
            let sql = table.render();
            assert_eq!(sql.matches(',').count(), n - 1);
            assert!(!sql.starts_with(','));
            assert!(!sql.ends_with(','));
        }
    }

    #[test]
    fn test_column_order_preserved() {
        let table = Table::new("t")
            .column(Column::of::<i32>("b"))
            .column(Column::of::<i32>("a"))
            .column(Column::of::<i32>("c"));
        assert_eq!(table.render(), "b INT,a INT,c INT");
        let names: Vec<_> = table.column_list().iter().map(Column::name).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_empty_table_renders_empty_fragment() {
        let table = Table::new("empty");
        assert!(table.is_empty());
        assert_eq!(table.render(), "");
        assert_eq!(
            table.create_statement(),
            "CREATE TABLE IF NOT EXISTS empty();"
        );
    }

    #[test]
    fn test_create_table_basic() {
        let table = users();
        let sql = CreateTable::new(&table).build();
        assert_eq!(sql, "CREATE TABLE users(id INT AUTOINCREMENT,name TEXT);");
    }

    #[test]
    fn test_create_table_if_not_exists() {
        assert_eq!(
            users().create_statement(),
            "CREATE TABLE IF NOT EXISTS users(id INT AUTOINCREMENT,name TEXT);"
        );
    }

    #[test]
    fn test_create_table_explicit_types() {
        let table = Table::new("books").column(Column::new("isbn", SqlType::Custom("CHAR(13)")));
        assert_eq!(
            table.create_statement(),
            "CREATE TABLE IF NOT EXISTS books(isbn CHAR(13));"
        );
    }
}
