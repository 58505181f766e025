//! Values, rows and statements exchanged with a [`Database`](crate::Database).
//!
//! Rows are positional records of [`SqlValue`] cells; callers map them into
//! their own typed records with the accessors on [`Row`].

use std::fmt;

/// A scalar SQL value, used both for bound parameters and result cells.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl SqlValue {
    /// Borrow the text content, if this is a text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Interpret the value as a boolean.
    ///
    /// Integers (non-zero is true) and the texts `true`/`false` are accepted
    /// because drivers differ in how they surface BOOLEAN columns.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SqlValue::Bool(b) => Some(*b),
            SqlValue::Int(i) => Some(*i != 0),
            SqlValue::Text(s) if s.eq_ignore_ascii_case("true") => Some(true),
            SqlValue::Text(s) if s.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
    }

    /// Interpret the value as an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Whether this is SQL NULL
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => f.write_str("null"),
            SqlValue::Bool(b) => write!(f, "{b}"),
            SqlValue::Int(i) => write!(f, "{i}"),
            SqlValue::Float(x) => write!(f, "{x}"),
            SqlValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for SqlValue {
    fn from(s: &str) -> Self {
        SqlValue::Text(s.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(s: String) -> Self {
        SqlValue::Text(s)
    }
}

impl From<bool> for SqlValue {
    fn from(b: bool) -> Self {
        SqlValue::Bool(b)
    }
}

impl From<i64> for SqlValue {
    fn from(i: i64) -> Self {
        SqlValue::Int(i)
    }
}

/// One result row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: Vec<SqlValue>,
}

impl Row {
    pub fn new(values: Vec<SqlValue>) -> Self {
        Self { values }
    }

    /// Cell at `idx`, if the row has that many columns
    pub fn get(&self, idx: usize) -> Option<&SqlValue> {
        self.values.get(idx)
    }

    /// Text cell at `idx`
    pub fn get_str(&self, idx: usize) -> Option<&str> {
        self.get(idx).and_then(SqlValue::as_str)
    }

    /// Boolean cell at `idx`
    pub fn get_bool(&self, idx: usize) -> Option<bool> {
        self.get(idx).and_then(SqlValue::as_bool)
    }

    /// Integer cell at `idx`
    pub fn get_i64(&self, idx: usize) -> Option<i64> {
        self.get(idx).and_then(SqlValue::as_i64)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }
}

/// A unit of work inside [`Database::execute_in_transaction`](crate::Database::execute_in_transaction).
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// One or more statements without parameters
    Batch(String),
    /// A single statement with positional parameters
    Single { sql: String, params: Vec<SqlValue> },
}

impl Statement {
    pub fn batch(sql: impl Into<String>) -> Self {
        Statement::Batch(sql.into())
    }

    pub fn single(sql: impl Into<String>, params: Vec<SqlValue>) -> Self {
        Statement::Single {
            sql: sql.into(),
            params,
        }
    }

    /// The SQL text of this statement
    pub fn sql(&self) -> &str {
        match self {
            Statement::Batch(sql) => sql,
            Statement::Single { sql, .. } => sql,
        }
    }
}
