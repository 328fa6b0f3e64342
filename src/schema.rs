use rusqlite::Connection;
use tracing::info;

use crate::error::Result;
use crate::models::{DISHES, INGREDIENTS};
use crate::sqlite::run_statement;

/// Schema definition for the SQLite database
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    pub tables: Vec<TableDefinition>,
}

impl Schema {
    pub fn new() -> Self {
        Self { tables: Vec::new() }
    }
    pub fn add_table(mut self, table: TableDefinition) -> Self {
        self.tables.push(table);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableDefinition {
    pub name: String,
    pub columns: Vec<ColumnDefinition>,
    pub foreign_keys: Vec<ForeignKey>,
}

impl TableDefinition {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            columns: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    pub fn column(mut self, name: &str, data_type: DataType, constraints: &[ColumnConstraint]) -> Self {
        self.columns.push(ColumnDefinition {
            name: name.to_string(),
            data_type,
            constraints: constraints.to_vec(),
        });
        self
    }

    pub fn foreign_key(mut self, column: &str, foreign_table: &str, foreign_column: &str) -> Self {
        self.foreign_keys.push(ForeignKey {
            column: column.to_string(),
            foreign_table: foreign_table.to_string(),
            foreign_column: foreign_column.to_string(),
        });
        self
    }

    /// `CREATE TABLE IF NOT EXISTS` statement for this table
    pub fn to_sql(&self) -> String {
        let mut parts: Vec<String> = self.columns.iter().map(ColumnDefinition::to_sql).collect();
        parts.extend(self.foreign_keys.iter().map(|fk| {
            format!(
                "FOREIGN KEY ({}) REFERENCES {} ({})",
                fk.column, fk.foreign_table, fk.foreign_column
            )
        }));
        format!(
            "CREATE TABLE IF NOT EXISTS {} ({});",
            self.name,
            parts.join(", ")
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub name: String,
    pub data_type: DataType,
    pub constraints: Vec<ColumnConstraint>,
}

impl ColumnDefinition {
    fn to_sql(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.data_type.as_sql());
        for constraint in &self.constraints {
            sql.push(' ');
            sql.push_str(constraint.as_sql());
        }
        sql
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DataType {
    Integer,
    Text,
    Real,
    Blob,
    Boolean,
}

impl DataType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            DataType::Integer => "INTEGER",
            DataType::Text => "TEXT",
            DataType::Real => "REAL",
            DataType::Blob => "BLOB",
            DataType::Boolean => "BOOLEAN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnConstraint {
    PrimaryKey,
    NotNull,
}

impl ColumnConstraint {
    pub fn as_sql(&self) -> &'static str {
        match self {
            ColumnConstraint::PrimaryKey => "PRIMARY KEY",
            ColumnConstraint::NotNull => "NOT NULL",
        }
    }
}

/// Declared only. No ON DELETE action: removing a dish leaves its ingredients.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub column: String,
    pub foreign_table: String,
    pub foreign_column: String,
}

/// The `dishes` and `ingredients` tables.
pub fn shopping_list_schema() -> Schema {
    use ColumnConstraint::{NotNull, PrimaryKey};

    Schema::new()
        .add_table(
            TableDefinition::new(DISHES)
                .column("id", DataType::Integer, &[PrimaryKey])
                .column("name", DataType::Text, &[NotNull])
                .column("deadline", DataType::Text, &[]),
        )
        .add_table(
            TableDefinition::new(INGREDIENTS)
                .column("id", DataType::Integer, &[PrimaryKey])
                .column("dish_id", DataType::Integer, &[NotNull])
                .column("name", DataType::Text, &[NotNull])
                .column("where_to_buy", DataType::Text, &[NotNull])
                .column("amount", DataType::Text, &[NotNull])
                .column("already_bought", DataType::Boolean, &[])
                .foreign_key("dish_id", DISHES, "id"),
        )
}

/// Create every table of `schema` that does not exist yet.
pub fn initialize_schema(conn: &Connection, schema: &Schema) -> Result<()> {
    for table in &schema.tables {
        run_statement(conn, &table.to_sql())?;
    }
    info!(tables = schema.tables.len(), "schema ready");
    Ok(())
}
