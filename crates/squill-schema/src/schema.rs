//! Schema batch planning and execution.
//!
//! A schema is built in two steps. [`SchemaBuilder::build`] validates the
//! declared tables and renders one `CREATE TABLE IF NOT EXISTS` statement per
//! table, touching no database. [`SchemaPlan::apply`] then runs the
//! statements in declaration order against a connection and, on success,
//! hands back a live [`Schema`] that owns the connection.

use crate::options::SchemaOptions;
use crate::table::Table;
use squill_core::{Connection, Result, SchemaError};

/// One rendered DDL statement and the table it creates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStatement {
    pub table: String,
    pub sql: String,
}

/// Collects table declarations for one schema.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    tables: Vec<Table>,
    options: SchemaOptions,
}

impl SchemaBuilder {
    /// Create a new schema builder.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(mut self, options: SchemaOptions) -> Self {
        self.options = options;
        self
    }

    /// Add a table. Tables are created in the order they are added.
    pub fn table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    pub fn tables(mut self, tables: impl IntoIterator<Item = Table>) -> Self {
        self.tables.extend(tables);
        self
    }

    /// Validate the declarations and render the statement batch.
    ///
    /// The table and column descriptors are consumed; only the rendered SQL
    /// is kept.
    pub fn build(self) -> Result<SchemaPlan> {
        let mut statements = Vec::with_capacity(self.tables.len());

        for table in &self.tables {
            for column in table.column_list() {
                if column.sql_type().is_mapped() {
                    continue;
                }
                if self.options.strict_types {
                    return Err(SchemaError::unmapped_type(table.name(), column.name()).into());
                }
                tracing::warn!(
                    table = %table.name(),
                    column = %column.name(),
                    "Column has no SQL type mapping; emitting an empty type"
                );
            }

            statements.push(TableStatement {
                table: table.name().to_string(),
                sql: table.create_statement(),
            });
        }

        Ok(SchemaPlan {
            statements,
            options: self.options,
        })
    }
}

/// A validated, rendered batch of `CREATE TABLE` statements.
#[derive(Debug, Clone)]
pub struct SchemaPlan {
    statements: Vec<TableStatement>,
    options: SchemaOptions,
}

impl SchemaPlan {
    pub fn statements(&self) -> &[TableStatement] {
        &self.statements
    }

    pub fn options(&self) -> SchemaOptions {
        self.options
    }

    /// Execute the batch against `conn`, in order, stopping at the first
    /// failure.
    ///
    /// Without [`SchemaOptions::transactional`], tables created before the
    /// failing statement are left in place. On any failure the connection is
    /// dropped, releasing its handle, and no `Schema` is produced.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn apply<C: Connection>(self, conn: C) -> Result<Schema<C>> {
        let transactional = self.options.transactional;
        tracing::info!(
            tables = self.statements.len(),
            transactional,
            "Creating schema"
        );

        if transactional {
            conn.begin()?;
        }

        for statement in &self.statements {
            tracing::debug!(table = %statement.table, sql = %statement.sql, "Executing DDL");
            if let Err(err) = conn.execute(&statement.sql) {
                tracing::debug!(table = %statement.table, error = %err, "DDL failed");
                if transactional {
                    rollback_quietly(&conn);
                }
                return Err(err);
            }
        }

        if transactional {
            if let Err(err) = conn.commit() {
                rollback_quietly(&conn);
                return Err(err);
            }
        }

        let tables = self
            .statements
            .into_iter()
            .map(|statement| statement.table)
            .collect::<Vec<_>>();
        tracing::info!(tables = tables.len(), "Schema ready");

        Ok(Schema { conn, tables })
    }
}

fn rollback_quietly<C: Connection>(conn: &C) {
    if let Err(err) = conn.rollback() {
        tracing::warn!(error = %err, "Rollback after failed schema batch also failed");
    }
}

/// A live schema: every declared table exists in the connected database.
///
/// The schema owns its connection for its whole lifetime. Dropping it
/// releases the connection; [`Schema::close`] does the same but reports a
/// failure to close.
#[derive(Debug)]
pub struct Schema<C: Connection> {
    conn: C,
    tables: Vec<String>,
}

impl<C: Connection> Schema<C> {
    /// Build and apply a schema in one step.
    pub fn create(
        conn: C,
        tables: impl IntoIterator<Item = Table>,
        options: SchemaOptions,
    ) -> Result<Self> {
        SchemaBuilder::new()
            .options(options)
            .tables(tables)
            .build()?
            .apply(conn)
    }

    pub fn connection(&self) -> &C {
        &self.conn
    }

    /// Declared table names, in creation order.
    pub fn table_names(&self) -> &[String] {
        &self.tables
    }

    /// Give up the schema and keep the connection.
    pub fn into_connection(self) -> C {
        self.conn
    }

    /// Release the connection.
    pub fn close(self) -> Result<()> {
        self.conn.close()
    }
}
