//! Typed shopping list records.
//!
//! The façade in [`crate::sqlite`] deals in raw [`Row`]s; these types are
//! the caller-side interpretation of them.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SqliteError};
use crate::sqlite::{Row, Value};

pub const DISHES: &str = "dishes";
pub const INGREDIENTS: &str = "ingredients";

/// A dish to insert. The id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDish {
    pub name: String,
    pub deadline: Option<String>,
}

impl NewDish {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: impl Into<String>) -> Self {
        self.deadline = Some(deadline.into());
        self
    }
}

impl From<(&str, &str)> for NewDish {
    fn from((name, deadline): (&str, &str)) -> Self {
        NewDish::new(name).with_deadline(deadline)
    }
}

/// An ingredient to insert.
///
/// `already_bought` is `false` unless set with [`NewIngredient::bought`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewIngredient {
    pub dish_id: i64,
    pub name: String,
    pub where_to_buy: String,
    pub amount: String,
    #[serde(default)]
    pub already_bought: bool,
}

impl NewIngredient {
    pub fn new(
        dish_id: i64,
        name: impl Into<String>,
        where_to_buy: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            dish_id,
            name: name.into(),
            where_to_buy: where_to_buy.into(),
            amount: amount.into(),
            already_bought: false,
        }
    }

    pub fn bought(mut self, already_bought: bool) -> Self {
        self.already_bought = already_bought;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    pub id: i64,
    pub name: String,
    pub deadline: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: i64,
    pub dish_id: i64,
    pub name: String,
    pub where_to_buy: String,
    pub amount: String,
    pub already_bought: bool,
}

fn column<'a>(table: &'static str, row: &'a [Value], index: usize, name: &str) -> Result<&'a Value> {
    row.get(index)
        .ok_or_else(|| SqliteError::row_decode(table, format!("missing column '{name}'")))
}

fn integer(table: &'static str, row: &[Value], index: usize, name: &str) -> Result<i64> {
    column(table, row, index, name)?.as_i64().ok_or_else(|| {
        SqliteError::row_decode(table, format!("column '{name}' is not an integer"))
    })
}

fn text(table: &'static str, row: &[Value], index: usize, name: &str) -> Result<String> {
    column(table, row, index, name)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| SqliteError::row_decode(table, format!("column '{name}' is not text")))
}

fn expect_width(table: &'static str, row: &[Value], width: usize) -> Result<()> {
    if row.len() == width {
        Ok(())
    } else {
        Err(SqliteError::row_decode(
            table,
            format!("expected {width} columns, got {}", row.len()),
        ))
    }
}

impl<'a> TryFrom<&'a [Value]> for Dish {
    type Error = SqliteError;

    fn try_from(row: &'a [Value]) -> Result<Self> {
        expect_width(DISHES, row, 3)?;
        let deadline = match column(DISHES, row, 2, "deadline")? {
            Value::Null => None,
            _ => Some(text(DISHES, row, 2, "deadline")?),
        };
        Ok(Dish {
            id: integer(DISHES, row, 0, "id")?,
            name: text(DISHES, row, 1, "name")?,
            deadline,
        })
    }
}

impl<'a> TryFrom<&'a [Value]> for Ingredient {
    type Error = SqliteError;

    fn try_from(row: &'a [Value]) -> Result<Self> {
        expect_width(INGREDIENTS, row, 6)?;
        // NULL in the column means the flag was never set.
        let already_bought = match column(INGREDIENTS, row, 5, "already_bought")? {
            Value::Null => false,
            v => v.as_bool().ok_or_else(|| {
                SqliteError::row_decode(INGREDIENTS, "column 'already_bought' is not a boolean")
            })?,
        };
        Ok(Ingredient {
            id: integer(INGREDIENTS, row, 0, "id")?,
            dish_id: integer(INGREDIENTS, row, 1, "dish_id")?,
            name: text(INGREDIENTS, row, 2, "name")?,
            where_to_buy: text(INGREDIENTS, row, 3, "where_to_buy")?,
            amount: text(INGREDIENTS, row, 4, "amount")?,
            already_bought,
        })
    }
}

/// Decode every row, stopping at the first mismatch.
pub fn decode_rows<T>(rows: &[Row]) -> Result<Vec<T>>
where
    T: for<'a> TryFrom<&'a [Value], Error = SqliteError>,
{
    rows.iter().map(|row| T::try_from(row.as_slice())).collect()
}
