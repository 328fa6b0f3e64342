//! SQLite persistence for a shopping list of dishes and their ingredients.
//!
//! # Intention
//!
//! - Provide create, read, update and delete calls over the `dishes` and
//!   `ingredients` tables, plus equality filters built from column/value pairs.
//! - Every call borrows a caller-owned [`rusqlite::Connection`]; nothing here
//!   opens or closes one except [`config::SqliteConfig::open`].
//!
//! # Architectural Boundaries
//!
//! - Only SQLite/database code belongs here.
//! - Table and column names are interpolated into statements after a shape
//!   check; values are always bound. Pass only names known at compile time.
//! - Each mutating call commits on its own. There are no multi-call
//!   transactions.

pub mod config;
pub mod error;
pub mod models;
pub mod schema;
pub mod sqlite;

pub use config::SqliteConfig;
pub use error::{Result, SqliteError};
pub use models::{Dish, Ingredient, NewDish, NewIngredient, DISHES, INGREDIENTS};
pub use sqlite::{
    create_dish, create_ingredient, delete_all, delete_where, find_where, list_all, run_statement,
    update_fields, Params, Row, SqlQuery, Value,
};
