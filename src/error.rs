/// Error types for the shopping list store.
///
/// Library calls return [`SqliteError`]; the `shopping-list` binary wraps
/// them in `anyhow` with call-site context.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SqliteError {
    /// The store rejected or failed a statement
    #[error("SQLite error: {source}")]
    Sqlite {
        #[from]
        source: rusqlite::Error,
    },

    /// A table or column name that cannot be interpolated into a statement
    #[error("Invalid identifier '{name}': expected ASCII letters, digits and underscores")]
    InvalidIdentifier { name: String },

    /// A WHERE or SET clause with no entries
    #[error("Empty {clause} clause for table '{table}'")]
    EmptyClause { table: String, clause: &'static str },

    /// A row whose shape does not match the record it is decoded into
    #[error("Cannot decode row from '{table}': {reason}")]
    RowDecode { table: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, SqliteError>;

impl SqliteError {
    pub fn invalid_identifier(name: impl Into<String>) -> Self {
        Self::InvalidIdentifier { name: name.into() }
    }

    pub fn empty_clause(table: impl Into<String>, clause: &'static str) -> Self {
        Self::EmptyClause {
            table: table.into(),
            clause,
        }
    }

    pub fn row_decode(table: &'static str, reason: impl Into<String>) -> Self {
        Self::RowDecode {
            table,
            reason: reason.into(),
        }
    }
}
