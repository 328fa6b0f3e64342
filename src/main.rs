//! `shopping-list`: command line front end for the shopping list store.
//!
//! Usage:
//!   shopping-list seed                       # schema plus the demo dishes
//!   shopping-list shopping-list              # what is left to buy
//!   shopping-list buy 2                      # mark ingredient 2 as bought
//!   RUST_LOG=shopping_sqlite=debug shopping-list dishes

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rusqlite::Connection;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use shopping_sqlite::config::DEFAULT_DB_PATH;
use shopping_sqlite::models::decode_rows;
use shopping_sqlite::{
    create_dish, create_ingredient, delete_all, delete_where, find_where, list_all, update_fields,
    Dish, Ingredient, NewDish, NewIngredient, Params, SqliteConfig, DISHES, INGREDIENTS,
};

#[derive(Parser, Debug)]
#[command(name = "shopping-list", version, about = "Christmas shopping list backed by SQLite")]
struct Cli {
    /// SQLite database file
    #[arg(long, env = "SHOPPING_LIST_DB", default_value = DEFAULT_DB_PATH, global = true)]
    db: PathBuf,

    /// Debug logging (unless RUST_LOG is set)
    #[arg(long, global = true)]
    debug: bool,

    /// Print records as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the tables
    Init,
    /// Create the tables and insert the demo dishes
    Seed,
    /// Add a dish and print its id
    AddDish {
        name: String,
        #[arg(long)]
        deadline: Option<String>,
    },
    /// Add an ingredient and print its id
    AddIngredient {
        dish_id: i64,
        name: String,
        where_to_buy: String,
        amount: String,
    },
    /// List dishes
    Dishes,
    /// List ingredients, optionally for one dish
    Ingredients {
        #[arg(long)]
        dish: Option<i64>,
    },
    /// Ingredients not bought yet
    ShoppingList,
    /// Mark an ingredient as bought
    Buy { id: i64 },
    /// Delete every row of a table
    Clear { table: Table },
    /// Delete ingredients already bought
    ClearBought,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Table {
    Dishes,
    Ingredients,
}

impl Table {
    fn name(self) -> &'static str {
        match self {
            Table::Dishes => DISHES,
            Table::Ingredients => INGREDIENTS,
        }
    }
}

fn init_tracing(debug: bool) -> Result<()> {
    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(debug)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

fn print_records<T: Serialize + std::fmt::Debug>(records: &[T], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(records)?);
    } else {
        for record in records {
            println!("{record:?}");
        }
    }
    Ok(())
}

fn seed(conn: &Connection) -> Result<()> {
    let uszka = create_dish(conn, &NewDish::new("uszka").with_deadline("23-12-2022"))?;
    let kompot = create_dish(conn, &NewDish::new("kompot z suszu").with_deadline("24-12-2022"))?;
    create_ingredient(conn, &NewIngredient::new(uszka, "pieczarki", "warzywniak", "0.5 kg"))?;
    create_ingredient(
        conn,
        &NewIngredient::new(kompot, "suszone owoce", "warzywniak", "1 opakowanie"),
    )?;
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = SqliteConfig::new(&cli.db);
    let conn = config
        .open()
        .with_context(|| format!("Failed to open {}", cli.db.display()))?;

    match cli.command {
        Command::Init => {}
        Command::Seed => seed(&conn).context("Failed to insert demo data")?,
        Command::AddDish { name, deadline } => {
            let dish = NewDish { name, deadline };
            println!("{}", create_dish(&conn, &dish)?);
        }
        Command::AddIngredient {
            dish_id,
            name,
            where_to_buy,
            amount,
        } => {
            let ingredient = NewIngredient::new(dish_id, name, where_to_buy, amount);
            println!("{}", create_ingredient(&conn, &ingredient)?);
        }
        Command::Dishes => {
            let dishes: Vec<Dish> = decode_rows(&list_all(&conn, DISHES)?)?;
            print_records(&dishes, cli.json)?;
        }
        Command::Ingredients { dish } => {
            let rows = match dish {
                Some(id) => find_where(&conn, INGREDIENTS, &Params::new().with_value("dish_id", id))?,
                None => list_all(&conn, INGREDIENTS)?,
            };
            let ingredients: Vec<Ingredient> = decode_rows(&rows)?;
            print_records(&ingredients, cli.json)?;
        }
        Command::ShoppingList => {
            let rows = find_where(
                &conn,
                INGREDIENTS,
                &Params::new().with_value("already_bought", false),
            )?;
            let ingredients: Vec<Ingredient> = decode_rows(&rows)?;
            print_records(&ingredients, cli.json)?;
        }
        Command::Buy { id } => {
            let rows = update_fields(
                &conn,
                INGREDIENTS,
                id,
                &Params::new().with_value("already_bought", true),
            )?;
            if rows == 0 {
                tracing::warn!(id, "no ingredient with this id");
            }
        }
        Command::Clear { table } => {
            delete_all(&conn, table.name())?;
        }
        Command::ClearBought => {
            delete_where(
                &conn,
                INGREDIENTS,
                &Params::new().with_value("already_bought", true),
            )?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug)?;
    run(cli)
}
