//! SQLite implementation of the storage gateway.

use crate::error::{DbError, DbResult};
use crate::gateway::StorageGateway;
use crate::sql::{Row, SqlFragment, SqlValue, quote_ident};
use regex_lite::Regex;
use rusqlite::functions::FunctionFlags;
use rusqlite::types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::{Connection, ToSql, params_from_iter};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::debug;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::Borrowed(match self {
            Self::Null => ValueRef::Null,
            Self::Integer(n) => ValueRef::Integer(*n),
            Self::Real(n) => ValueRef::Real(*n),
            Self::Text(s) => ValueRef::Text(s.as_bytes()),
            Self::Blob(bytes) => ValueRef::Blob(bytes),
        }))
    }
}

impl FromSql for SqlValue {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        Ok(match value {
            ValueRef::Null => Self::Null,
            ValueRef::Integer(n) => Self::Integer(n),
            ValueRef::Real(n) => Self::Real(n),
            ValueRef::Text(bytes) => Self::Text(String::from_utf8_lossy(bytes).into_owned()),
            ValueRef::Blob(bytes) => Self::Blob(bytes.to_vec()),
        })
    }
}

/// Storage gateway backed by a single SQLite connection.
///
/// The connection registers a `regexp(pattern, value)` function so that
/// `value REGEXP 'pattern'` predicates work. `NULL` values never match.
pub struct SqliteGateway {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteGateway {
    /// Opens (or creates) a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Opens an in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> DbResult<Self> {
        conn.busy_timeout(Duration::from_secs(5))?;
        register_regexp(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DbError::Poisoned)
    }

    /// Runs several `;`-separated statements without bound values. Hosts use
    /// this for their own schema (the entries relation, for instance).
    pub fn execute_batch(&self, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql)?;
        Ok(())
    }

    fn query_rows(&self, statement: &SqlFragment, limit: Option<usize>) -> DbResult<Vec<Row>> {
        let (sql, params) = statement.to_parameterized();
        debug!("query: {} ({} params)", sql.trim(), params.len());
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let mut rows = stmt.query(params_from_iter(params.iter()))?;

        let mut result = Vec::new();
        while let Some(row) = rows.next()? {
            let mut out = Row::new();
            for (i, name) in names.iter().enumerate() {
                let value: SqlValue = row.get(i)?;
                out.set(name.clone(), value);
            }
            result.push(out);
            if limit.is_some_and(|max| result.len() >= max) {
                break;
            }
        }
        Ok(result)
    }
}

fn register_regexp(conn: &Connection) -> DbResult<()> {
    conn.create_scalar_function(
        "regexp",
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let regex: Arc<Regex> = ctx.get_or_create_aux(0, |vr| -> Result<Regex, BoxError> {
                Ok(Regex::new(vr.as_str()?)?)
            })?;
            let value: Option<String> = ctx.get(1)?;
            Ok(value.is_some_and(|v| regex.is_match(&v)))
        },
    )?;
    Ok(())
}

impl StorageGateway for SqliteGateway {
    fn execute(&self, statement: &SqlFragment) -> DbResult<usize> {
        let (sql, params) = statement.to_parameterized();
        debug!("execute: {} ({} params)", sql.trim(), params.len());
        let conn = self.lock()?;
        Ok(conn.execute(&sql, params_from_iter(params.iter()))?)
    }

    fn fetch_scalar(&self, statement: &SqlFragment) -> DbResult<Option<SqlValue>> {
        let row = self.fetch_row(statement)?;
        Ok(row.and_then(|r| r.iter().next().map(|(_, value)| value.clone())))
    }

    fn fetch_row(&self, statement: &SqlFragment) -> DbResult<Option<Row>> {
        Ok(self.query_rows(statement, Some(1))?.into_iter().next())
    }

    fn fetch_all(&self, statement: &SqlFragment) -> DbResult<Vec<Row>> {
        self.query_rows(statement, None)
    }

    fn insert(&self, table: &str, fields: &Row) -> DbResult<i64> {
        if fields.is_empty() {
            return Err(DbError::EmptyRow(table.to_string()));
        }
        let columns = fields
            .column_names()
            .map(quote_ident)
            .collect::<DbResult<Vec<_>>>()?
            .join(", ");
        let statement = SqlFragment::sql(format!(
            "INSERT INTO {} ({columns}) VALUES (",
            quote_ident(table)?
        ))
        .bind_list(fields.iter().map(|(_, value)| value.clone()))
        .push(")");

        let (sql, params) = statement.to_parameterized();
        debug!("insert: {} ({} params)", sql, params.len());
        let conn = self.lock()?;
        conn.execute(&sql, params_from_iter(params.iter()))?;
        Ok(conn.last_insert_rowid())
    }

    fn table_exists(&self, table: &str) -> DbResult<bool> {
        let statement =
            SqlFragment::sql("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ").bind(table);
        Ok(self.fetch_row(&statement)?.is_some())
    }
}
