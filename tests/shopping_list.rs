use rusqlite::{Connection, Result};
use shopping_sqlite::models::decode_rows;
use shopping_sqlite::schema::{initialize_schema, shopping_list_schema};
use shopping_sqlite::{
    create_dish, create_ingredient, delete_all, delete_where, find_where, list_all, run_statement,
    update_fields, Ingredient, NewDish, NewIngredient, Params, SqliteConfig, SqliteError, Value,
    DISHES, INGREDIENTS,
};
use tempfile::NamedTempFile;

// Helper function to create an in-memory database for testing
fn create_test_db() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    initialize_schema(&conn, &shopping_list_schema()).unwrap();
    Ok(conn)
}

// Helper function to create a temporary file-based database
fn create_temp_db() -> (Connection, NamedTempFile) {
    let temp_file = NamedTempFile::new().unwrap();
    let conn = SqliteConfig::new(temp_file.path()).open().unwrap();
    (conn, temp_file)
}

fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}

#[test]
fn test_round_trip_uszka() {
    let conn = create_test_db().unwrap();

    let dish_id = create_dish(&conn, &NewDish::from(("uszka", "23-12-2022"))).unwrap();
    assert_eq!(dish_id, 1);

    let ingredient = NewIngredient::new(dish_id, "pieczarki", "warzywniak", "0.5 kg");
    let ingredient_id = create_ingredient(&conn, &ingredient).unwrap();
    assert_eq!(ingredient_id, 1);

    let rows = find_where(&conn, INGREDIENTS, &Params::new().with_value("dish_id", 1)).unwrap();
    assert_eq!(
        rows,
        vec![vec![
            Value::Integer(1),
            Value::Integer(1),
            text("pieczarki"),
            text("warzywniak"),
            text("0.5 kg"),
            Value::Integer(0),
        ]]
    );
}

#[test]
fn test_created_dish_is_found_by_id() {
    let conn = create_test_db().unwrap();

    for (name, deadline) in [("uszka", "23-12-2022"), ("kompot z suszu", "24-12-2022")] {
        let id = create_dish(&conn, &NewDish::from((name, deadline))).unwrap();
        let rows = find_where(&conn, DISHES, &Params::new().with_value("id", id)).unwrap();
        assert_eq!(rows, vec![vec![Value::Integer(id), text(name), text(deadline)]]);
    }

    let id = create_dish(&conn, &NewDish::new("barszcz")).unwrap();
    let rows = find_where(&conn, DISHES, &Params::new().with_value("id", id)).unwrap();
    assert_eq!(rows, vec![vec![Value::Integer(id), text("barszcz"), Value::Null]]);
}

#[test]
fn test_list_all_on_empty_table() {
    let conn = create_test_db().unwrap();
    assert!(list_all(&conn, DISHES).unwrap().is_empty());
    assert!(list_all(&conn, INGREDIENTS).unwrap().is_empty());
}

#[test]
fn test_delete_all_empties_table() {
    let conn = create_test_db().unwrap();
    let dish_id = create_dish(&conn, &NewDish::new("uszka")).unwrap();
    for name in ["pieczarki", "mąka", "cebula"] {
        create_ingredient(&conn, &NewIngredient::new(dish_id, name, "warzywniak", "1")).unwrap();
    }

    assert_eq!(delete_all(&conn, INGREDIENTS).unwrap(), 3);
    assert!(list_all(&conn, INGREDIENTS).unwrap().is_empty());
    assert_eq!(delete_all(&conn, INGREDIENTS).unwrap(), 0);

    // No cascade: the dish stays.
    assert_eq!(list_all(&conn, DISHES).unwrap().len(), 1);
}

#[test]
fn test_update_marks_ingredient_bought() {
    let conn = create_test_db().unwrap();
    let dish_id = create_dish(&conn, &NewDish::new("kompot z suszu")).unwrap();
    let id = create_ingredient(
        &conn,
        &NewIngredient::new(dish_id, "suszone owoce", "warzywniak", "1 opakowanie"),
    )
    .unwrap();

    let filter = Params::new().with_value("id", id);
    let before = find_where(&conn, INGREDIENTS, &filter).unwrap();

    let updated = update_fields(
        &conn,
        INGREDIENTS,
        id,
        &Params::new().with_value("already_bought", true),
    )
    .unwrap();
    assert_eq!(updated, 1);

    let after = find_where(&conn, INGREDIENTS, &filter).unwrap();
    assert_eq!(after.len(), 1);
    assert_eq!(after[0][5], Value::Integer(1));
    assert_eq!(after[0][..5], before[0][..5]);

    let ingredients: Vec<Ingredient> = decode_rows(&after).unwrap();
    assert!(ingredients[0].already_bought);
}

#[test]
fn test_update_unknown_id_changes_nothing() {
    let conn = create_test_db().unwrap();
    create_dish(&conn, &NewDish::new("uszka")).unwrap();
    let before = list_all(&conn, DISHES).unwrap();

    let updated =
        update_fields(&conn, DISHES, 42, &Params::new().with_value("name", "pierogi")).unwrap();
    assert_eq!(updated, 0);
    assert_eq!(list_all(&conn, DISHES).unwrap(), before);
}

#[test]
fn test_find_by_dish_id() {
    let conn = create_test_db().unwrap();
    let uszka = create_dish(&conn, &NewDish::new("uszka")).unwrap();
    let kompot = create_dish(&conn, &NewDish::new("kompot z suszu")).unwrap();
    create_ingredient(&conn, &NewIngredient::new(uszka, "pieczarki", "warzywniak", "0.5 kg"))
        .unwrap();
    create_ingredient(&conn, &NewIngredient::new(uszka, "mąka", "sklep", "1 kg")).unwrap();
    create_ingredient(&conn, &NewIngredient::new(kompot, "suszone owoce", "warzywniak", "1"))
        .unwrap();

    for (dish_id, expected) in [(uszka, 2), (kompot, 1), (999, 0)] {
        let rows =
            find_where(&conn, INGREDIENTS, &Params::new().with_value("dish_id", dish_id)).unwrap();
        assert_eq!(rows.len(), expected);
        assert!(rows.iter().all(|row| row[1] == Value::Integer(dish_id)));
    }
}

#[test]
fn test_find_and_delete_with_multiple_filters() {
    let conn = create_test_db().unwrap();
    let dish_id = create_dish(&conn, &NewDish::new("uszka")).unwrap();
    create_ingredient(&conn, &NewIngredient::new(dish_id, "pieczarki", "warzywniak", "0.5 kg"))
        .unwrap();
    create_ingredient(
        &conn,
        &NewIngredient::new(dish_id, "mąka", "warzywniak", "1 kg").bought(true),
    )
    .unwrap();
    create_ingredient(&conn, &NewIngredient::new(dish_id, "jajka", "sklep", "2").bought(true))
        .unwrap();

    let filters = Params::new()
        .with_value("where_to_buy", "warzywniak")
        .with_value("already_bought", true);
    let rows = find_where(&conn, INGREDIENTS, &filters).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][2], text("mąka"));

    assert_eq!(delete_where(&conn, INGREDIENTS, &filters).unwrap(), 1);
    let remaining = list_all(&conn, INGREDIENTS).unwrap();
    assert_eq!(remaining.len(), 2);
}

#[test]
fn test_filter_values_are_bound_not_interpolated() {
    let conn = create_test_db().unwrap();
    create_dish(&conn, &NewDish::new("uszka")).unwrap();

    let filters = Params::new().with_value("name", "x' OR '1'='1");
    assert!(find_where(&conn, DISHES, &filters).unwrap().is_empty());
    assert_eq!(delete_where(&conn, DISHES, &filters).unwrap(), 0);
    assert_eq!(list_all(&conn, DISHES).unwrap().len(), 1);
}

#[test]
fn test_empty_filters_are_rejected() {
    let conn = create_test_db().unwrap();
    create_dish(&conn, &NewDish::new("uszka")).unwrap();

    let err = delete_where(&conn, DISHES, &Params::new()).unwrap_err();
    assert!(matches!(err, SqliteError::EmptyClause { .. }));
    assert!(find_where(&conn, DISHES, &Params::new()).is_err());
    assert_eq!(list_all(&conn, DISHES).unwrap().len(), 1);
}

#[test]
fn test_store_errors_are_returned() {
    let conn = create_test_db().unwrap();

    let err = list_all(&conn, "recipes").unwrap_err();
    assert!(matches!(err, SqliteError::Sqlite { .. }));

    let err = update_fields(&conn, DISHES, 1, &Params::new().with_value("colour", "red"))
        .unwrap_err();
    assert!(matches!(err, SqliteError::Sqlite { .. }));

    assert!(run_statement(&conn, "CREATE TABLE dishes (id INTEGER)").is_err());
    assert!(matches!(
        list_all(&conn, "dishes; DROP TABLE dishes"),
        Err(SqliteError::InvalidIdentifier { .. })
    ));
}

#[test]
fn test_run_statement_accepts_commented_script() {
    let conn = Connection::open_in_memory().unwrap();
    run_statement(
        &conn,
        r#"
        -- dishes table
        CREATE TABLE IF NOT EXISTS dishes (
            id integer PRIMARY KEY,
            name text NOT NULL,
            deadline text
        );
        "#,
    )
    .unwrap();
    assert!(list_all(&conn, DISHES).unwrap().is_empty());
}

#[test]
fn test_file_database_persists_across_connections() {
    let (conn, temp_file) = create_temp_db();
    let id = create_dish(&conn, &NewDish::new("uszka").with_deadline("23-12-2022")).unwrap();
    drop(conn);

    let conn = SqliteConfig::new(temp_file.path()).open().unwrap();
    let rows = find_where(&conn, DISHES, &Params::new().with_value("id", id)).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][1], text("uszka"));
}
