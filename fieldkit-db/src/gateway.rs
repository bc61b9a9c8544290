//! The storage gateway trait.

use crate::error::{DbError, DbResult};
use crate::sql::{Row, SqlFragment, SqlValue, escape_literal, quote_ident};

/// The narrow storage interface the field contract consumes.
///
/// Implementations execute fragments with their bound values; SQL text is
/// only ever produced from [`SqlFragment`]s. `update`, `delete` and `escape`
/// have default implementations built on `execute`, so a gateway only has to
/// supply statement execution, row fetching, inserts and table lookup.
pub trait StorageGateway: Send + Sync {
    /// Executes a statement, returning the number of affected rows.
    fn execute(&self, statement: &SqlFragment) -> DbResult<usize>;

    /// First column of the first row, or `None` when no row matches.
    fn fetch_scalar(&self, statement: &SqlFragment) -> DbResult<Option<SqlValue>>;

    /// First row, or `None` when no row matches.
    fn fetch_row(&self, statement: &SqlFragment) -> DbResult<Option<Row>>;

    /// Every row, in result order.
    fn fetch_all(&self, statement: &SqlFragment) -> DbResult<Vec<Row>>;

    /// Inserts a row and returns its assigned id.
    fn insert(&self, table: &str, fields: &Row) -> DbResult<i64>;

    /// Whether a table with this name exists.
    fn table_exists(&self, table: &str) -> DbResult<bool>;

    /// Updates rows matching `condition`.
    fn update(&self, table: &str, fields: &Row, condition: &SqlFragment) -> DbResult<usize> {
        if fields.is_empty() {
            return Err(DbError::EmptyRow(table.to_string()));
        }
        let mut statement = SqlFragment::sql(format!("UPDATE {} SET ", quote_ident(table)?));
        for (i, (column, value)) in fields.iter().enumerate() {
            if i > 0 {
                statement.push_str(", ");
            }
            statement.push_str(format!("{} = ", quote_ident(column)?));
            statement = statement.bind(value.clone());
        }
        statement.push_str(" WHERE ");
        statement.append(condition);
        self.execute(&statement)
    }

    /// Deletes rows matching `condition`.
    fn delete(&self, table: &str, condition: &SqlFragment) -> DbResult<usize> {
        let mut statement = SqlFragment::sql(format!("DELETE FROM {} WHERE ", quote_ident(table)?));
        statement.append(condition);
        self.execute(&statement)
    }

    /// Escapes a value for a single-quoted literal.
    fn escape(&self, value: &str) -> String {
        escape_literal(value)
    }

    /// Renders a fragment to literal SQL using this gateway's escaping.
    fn render(&self, fragment: &SqlFragment) -> String {
        fragment.render(&|value| self.escape(value))
    }
}
