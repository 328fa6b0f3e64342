use std::path::PathBuf;

use rusqlite::Connection;
use tracing::info;

use crate::error::Result;
use crate::schema::{initialize_schema, shopping_list_schema, Schema};

pub const DEFAULT_DB_PATH: &str = "my_christmas_shopping.db";

/// SQLite store configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SqliteConfig {
    /// Path to the SQLite database file
    pub db_path: PathBuf,
    /// Schema created on open
    pub schema: Schema,
}

impl SqliteConfig {
    /// Config for the shopping list schema at `db_path`
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self::with_schema(db_path, shopping_list_schema())
    }

    pub fn with_schema(db_path: impl Into<PathBuf>, schema: Schema) -> Self {
        Self {
            db_path: db_path.into(),
            schema,
        }
    }

    /// Open the database and create any missing tables.
    ///
    /// The caller owns the returned connection; dropping it closes the file.
    pub fn open(&self) -> Result<Connection> {
        info!(path = %self.db_path.display(), "opening sqlite store");
        let conn = Connection::open(&self.db_path)?;
        initialize_schema(&conn, &self.schema)?;
        Ok(conn)
    }
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DB_PATH)
    }
}
