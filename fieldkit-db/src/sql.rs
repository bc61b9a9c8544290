//! Parameterized SQL fragments.
//!
//! Field types compose joins and predicates as [`SqlFragment`]s: SQL text
//! interleaved with bound values. A fragment is either executed with
//! placeholders ([`SqlFragment::to_parameterized`]) or rendered to literal
//! text with escaping ([`SqlFragment::render`]) at the gateway boundary.
//! Values never reach SQL text unescaped.

use crate::error::{DbError, DbResult};
use fieldkit_types::{EntryId, FieldId, SectionId};
use std::fmt;

/// A value bound into a fragment or read back from a row.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl SqlValue {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Text form of the value; `Null` renders as an empty string.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Integer(n) => n.to_string(),
            Self::Real(n) => n.to_string(),
            Self::Text(s) => s.clone(),
            Self::Blob(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        }
    }

    fn render_literal(&self, escape: &dyn Fn(&str) -> String) -> String {
        match self {
            Self::Null => "NULL".to_string(),
            Self::Integer(n) => n.to_string(),
            Self::Real(n) => n.to_string(),
            Self::Text(s) => format!("'{}'", escape(s)),
            Self::Blob(bytes) => {
                let hex: String = bytes.iter().map(|b| format!("{b:02X}")).collect();
                format!("X'{hex}'")
            }
        }
    }
}

impl From<&str> for SqlValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&String> for SqlValue {
    fn from(s: &String) -> Self {
        Self::Text(s.clone())
    }
}

impl From<i64> for SqlValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for SqlValue {
    fn from(n: i32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<f64> for SqlValue {
    fn from(n: f64) -> Self {
        Self::Real(n)
    }
}

impl From<bool> for SqlValue {
    fn from(b: bool) -> Self {
        Self::Integer(i64::from(b))
    }
}

impl From<FieldId> for SqlValue {
    fn from(id: FieldId) -> Self {
        Self::Integer(id.get())
    }
}

impl From<SectionId> for SqlValue {
    fn from(id: SectionId) -> Self {
        Self::Integer(id.get())
    }
}

impl From<EntryId> for SqlValue {
    fn from(id: EntryId) -> Self {
        Self::Integer(id.get())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Escapes a string for use inside a single-quoted SQL literal.
#[must_use]
pub fn escape_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// Validates and double-quotes a table or column name.
pub fn quote_ident(name: &str) -> DbResult<String> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(DbError::InvalidIdentifier(name.to_string()));
    }
    Ok(format!("\"{name}\""))
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Sql(String),
    Param(SqlValue),
}

/// SQL text interleaved with bound values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlFragment {
    tokens: Vec<Token>,
}

impl SqlFragment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fragment with literal SQL text.
    #[must_use]
    pub fn sql(text: impl AsRef<str>) -> Self {
        let mut fragment = Self::new();
        fragment.push_str(text);
        fragment
    }

    /// Appends literal SQL text.
    #[must_use]
    pub fn push(mut self, text: impl AsRef<str>) -> Self {
        self.push_str(text);
        self
    }

    /// Appends a bound value.
    #[must_use]
    pub fn bind(mut self, value: impl Into<SqlValue>) -> Self {
        self.tokens.push(Token::Param(value.into()));
        self
    }

    /// Appends a comma separated list of bound values, as used by `IN (...)`.
    #[must_use]
    pub fn bind_list<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        for (i, value) in values.into_iter().enumerate() {
            if i > 0 {
                self.push_str(", ");
            }
            self.tokens.push(Token::Param(value.into()));
        }
        self
    }

    pub fn push_str(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if text.is_empty() {
            return;
        }
        match self.tokens.last_mut() {
            Some(Token::Sql(last)) => last.push_str(text),
            _ => self.tokens.push(Token::Sql(text.to_string())),
        }
    }

    /// Appends another fragment, keeping its bound values.
    pub fn append(&mut self, other: &Self) {
        for token in &other.tokens {
            match token {
                Token::Sql(text) => self.push_str(text),
                Token::Param(value) => self.tokens.push(Token::Param(value.clone())),
            }
        }
    }

    /// Joins fragments with a literal separator.
    #[must_use]
    pub fn join<'a, I>(fragments: I, separator: &str) -> Self
    where
        I: IntoIterator<Item = &'a Self>,
    {
        let mut joined = Self::new();
        for (i, fragment) in fragments.into_iter().enumerate() {
            if i > 0 {
                joined.push_str(separator);
            }
            joined.append(fragment);
        }
        joined
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The bound values, in order.
    pub fn params(&self) -> impl Iterator<Item = &SqlValue> {
        self.tokens.iter().filter_map(|t| match t {
            Token::Param(v) => Some(v),
            Token::Sql(_) => None,
        })
    }

    /// SQL text with `?` placeholders plus the values to bind.
    #[must_use]
    pub fn to_parameterized(&self) -> (String, Vec<SqlValue>) {
        let mut text = String::new();
        let mut params = Vec::new();
        for token in &self.tokens {
            match token {
                Token::Sql(sql) => text.push_str(sql),
                Token::Param(value) => {
                    text.push('?');
                    params.push(value.clone());
                }
            }
        }
        (text, params)
    }

    /// Renders to literal SQL, quoting text values with `escape`.
    #[must_use]
    pub fn render(&self, escape: &dyn Fn(&str) -> String) -> String {
        self.tokens
            .iter()
            .map(|token| match token {
                Token::Sql(sql) => sql.clone(),
                Token::Param(value) => value.render_literal(escape),
            })
            .collect()
    }
}

impl fmt::Display for SqlFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&escape_literal))
    }
}

/// An ordered set of named column values: the input of inserts and
/// updates, and the output of row fetches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, SqlValue)>,
}

impl Row {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Row::set`].
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.set(column, value);
        self
    }

    /// Sets a column, replacing any existing value for it.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<SqlValue>) {
        let column = column.into();
        let value = value.into();
        match self.columns.iter_mut().find(|(name, _)| *name == column) {
            Some((_, slot)) => *slot = value,
            None => self.columns.push((column, value)),
        }
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    #[must_use]
    pub fn get_i64(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(SqlValue::as_i64)
    }

    #[must_use]
    pub fn get_str(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(SqlValue::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.columns.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<K: Into<String>, V: Into<SqlValue>> FromIterator<(K, V)> for Row {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut row = Self::new();
        for (column, value) in iter {
            row.set(column, value);
        }
        row
    }
}
