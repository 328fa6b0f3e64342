use rusqlite::types::{ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params_from_iter, Connection};
use tracing::{debug, info};

use crate::error::{Result, SqliteError};
use crate::models::{NewDish, NewIngredient};

/// Core value types for SQLite operations
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
    /// Bound as `0`/`1`. Never produced when reading rows back.
    Boolean(bool),
}

impl Value {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            Value::Integer(0) => Some(false),
            Value::Integer(1) => Some(true),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(v: ValueRef<'_>) -> Self {
        match v {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(f) => Value::Real(f),
            ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Value::Blob(b.to_vec()),
        }
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Owned(rusqlite::types::Value::Null),
            Value::Integer(i) => ToSqlOutput::from(*i),
            Value::Real(f) => ToSqlOutput::from(*f),
            Value::Text(s) => ToSqlOutput::from(s.as_str()),
            Value::Blob(b) => ToSqlOutput::from(b.as_slice()),
            Value::Boolean(b) => ToSqlOutput::from(*b),
        })
    }
}

/// One row, values in table column order
pub type Row = Vec<Value>;

/// Ordered column/value pairs used as equality filters or as SET updates.
///
/// Iteration order is insertion order; setting a column a second time
/// replaces the value and keeps the original position.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Params {
    pub values: Vec<(String, Value)>,
}

impl Params {
    /// Create a new Params object
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named value
    pub fn with_value(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<Value>) {
        let value = value.into();
        match self.values.iter_mut().find(|(k, _)| k == name) {
            Some((_, slot)) => *slot = value,
            None => self.values.push((name.to_string(), value)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            let k: String = k.into();
            params.insert(&k, v);
        }
        params
    }
}

/// SQL statement with positional parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    pub statement: String,
    pub params: Vec<Value>,
}

impl SqlQuery {
    pub fn new(statement: &str) -> Self {
        Self {
            statement: statement.to_string(),
            params: Vec::new(),
        }
    }

    pub fn with_params(mut self, params: Vec<Value>) -> Self {
        self.params = params;
        self
    }

    pub fn select_all(table: &str) -> Result<Self> {
        let table = check_identifier(table)?;
        Ok(Self::new(&format!("SELECT * FROM {table}")))
    }

    pub fn select_where(table: &str, filters: &Params) -> Result<Self> {
        let table = check_identifier(table)?;
        let (clause, params) = build_clause(table, filters, "WHERE", " AND ")?;
        Ok(Self::new(&format!("SELECT * FROM {table} WHERE {clause}")).with_params(params))
    }

    /// `UPDATE .. SET .. WHERE id = ?`, with `id` bound after the updates
    pub fn update(table: &str, id: i64, updates: &Params) -> Result<Self> {
        let table = check_identifier(table)?;
        let (clause, mut params) = build_clause(table, updates, "SET", ", ")?;
        params.push(Value::Integer(id));
        Ok(Self::new(&format!("UPDATE {table} SET {clause} WHERE id = ?")).with_params(params))
    }

    pub fn delete_all(table: &str) -> Result<Self> {
        let table = check_identifier(table)?;
        Ok(Self::new(&format!("DELETE FROM {table}")))
    }

    pub fn delete_where(table: &str, filters: &Params) -> Result<Self> {
        let table = check_identifier(table)?;
        let (clause, params) = build_clause(table, filters, "WHERE", " AND ")?;
        Ok(Self::new(&format!("DELETE FROM {table} WHERE {clause}")).with_params(params))
    }
}

/// Accepts `[A-Za-z_][A-Za-z0-9_]*`. Names are interpolated, never bound.
pub fn check_identifier(name: &str) -> Result<&str> {
    let mut chars = name.chars();
    let head_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if head_ok && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(name)
    } else {
        Err(SqliteError::invalid_identifier(name))
    }
}

/// Builds `k1 = ?{sep}k2 = ?` and the matching parameter list.
fn build_clause(
    table: &str,
    fields: &Params,
    clause: &'static str,
    separator: &str,
) -> Result<(String, Vec<Value>)> {
    if fields.is_empty() {
        return Err(SqliteError::empty_clause(table, clause));
    }
    let mut fragments = Vec::with_capacity(fields.len());
    let mut values = Vec::with_capacity(fields.len() + 1);
    for (column, value) in fields.iter() {
        fragments.push(format!("{} = ?", check_identifier(column)?));
        values.push(value.clone());
    }
    Ok((fragments.join(separator), values))
}

fn execute(conn: &Connection, query: &SqlQuery) -> Result<usize> {
    debug!(statement = %query.statement, params = query.params.len(), "execute");
    let rows = conn.execute(&query.statement, params_from_iter(query.params.iter()))?;
    Ok(rows)
}

fn query_rows(conn: &Connection, query: &SqlQuery) -> Result<Vec<Row>> {
    debug!(statement = %query.statement, params = query.params.len(), "query");
    let mut stmt = conn.prepare(&query.statement)?;
    let columns = stmt.column_count();
    let rows = stmt.query_map(params_from_iter(query.params.iter()), |row| {
        (0..columns)
            .map(|i| row.get_ref(i).map(Value::from))
            .collect::<rusqlite::Result<Row>>()
    })?;
    let mut result = Vec::new();
    for row in rows {
        result.push(row?);
    }
    Ok(result)
}

/// Execute statements that take no parameters, such as schema setup.
pub fn run_statement(conn: &Connection, statement: &str) -> Result<()> {
    debug!(%statement, "run statement");
    conn.execute_batch(statement)?;
    Ok(())
}

/// Insert a dish and return its new id.
pub fn create_dish(conn: &Connection, dish: &NewDish) -> Result<i64> {
    let query = SqlQuery::new("INSERT INTO dishes (name, deadline) VALUES (?1, ?2)").with_params(
        vec![dish.name.as_str().into(), dish.deadline.as_deref().into()],
    );
    execute(conn, &query)?;
    let id = conn.last_insert_rowid();
    info!(table = "dishes", id, "created");
    Ok(id)
}

/// Insert an ingredient and return its new id.
pub fn create_ingredient(conn: &Connection, ingredient: &NewIngredient) -> Result<i64> {
    let query = SqlQuery::new(
        "INSERT INTO ingredients (dish_id, name, where_to_buy, amount, already_bought) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .with_params(vec![
        ingredient.dish_id.into(),
        ingredient.name.as_str().into(),
        ingredient.where_to_buy.as_str().into(),
        ingredient.amount.as_str().into(),
        ingredient.already_bought.into(),
    ]);
    execute(conn, &query)?;
    let id = conn.last_insert_rowid();
    info!(table = "ingredients", id, "created");
    Ok(id)
}

/// Every row of `table`. Row order is whatever the store returns.
pub fn list_all(conn: &Connection, table: &str) -> Result<Vec<Row>> {
    query_rows(conn, &SqlQuery::select_all(table)?)
}

/// Rows where every filter column equals its value.
pub fn find_where(conn: &Connection, table: &str, filters: &Params) -> Result<Vec<Row>> {
    query_rows(conn, &SqlQuery::select_where(table, filters)?)
}

/// Set `updates` on the row with `id`.
///
/// Returns the number of rows changed, `0` when no row has that id.
pub fn update_fields(conn: &Connection, table: &str, id: i64, updates: &Params) -> Result<usize> {
    let rows = execute(conn, &SqlQuery::update(table, id, updates)?)?;
    info!(table, id, rows, "updated");
    Ok(rows)
}

/// Remove every row of `table`. Returns the number of rows removed.
pub fn delete_all(conn: &Connection, table: &str) -> Result<usize> {
    let rows = execute(conn, &SqlQuery::delete_all(table)?)?;
    info!(table, rows, "all deleted");
    Ok(rows)
}

/// Remove the rows matching `filters`. Returns the number of rows removed.
pub fn delete_where(conn: &Connection, table: &str, filters: &Params) -> Result<usize> {
    let rows = execute(conn, &SqlQuery::delete_where(table, filters)?)?;
    info!(table, rows, "deleted");
    Ok(rows)
}
