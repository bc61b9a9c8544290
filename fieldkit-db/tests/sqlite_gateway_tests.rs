use fieldkit_db::{DbError, Row, SqlFragment, SqlValue, SqliteGateway, StorageGateway};
use pretty_assertions::assert_eq;

fn gateway_with_table() -> SqliteGateway {
    let gw = SqliteGateway::open_in_memory().unwrap();
    gw.execute_batch(
        "CREATE TABLE items (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT, qty INTEGER);",
    )
    .unwrap();
    gw
}

#[test]
fn insert_returns_assigned_ids() {
    let gw = gateway_with_table();
    let first = gw.insert("items", &Row::new().with("name", "a").with("qty", 1_i64)).unwrap();
    let second = gw.insert("items", &Row::new().with("name", "b").with("qty", 2_i64)).unwrap();
    assert_eq!(first, 1);
    assert_eq!(second, 2);
}

#[test]
fn insert_rejects_empty_row() {
    let gw = gateway_with_table();
    assert!(matches!(gw.insert("items", &Row::new()), Err(DbError::EmptyRow(_))));
}

#[test]
fn insert_rejects_bad_identifiers() {
    let gw = gateway_with_table();
    let row = Row::new().with("name; --", "x");
    assert!(matches!(gw.insert("items", &row), Err(DbError::InvalidIdentifier(_))));
}

#[test]
fn fetch_row_and_scalar() {
    let gw = gateway_with_table();
    gw.insert("items", &Row::new().with("name", "widget").with("qty", 7_i64)).unwrap();

    let row = gw
        .fetch_row(&SqlFragment::sql("SELECT name, qty FROM items WHERE name = ").bind("widget"))
        .unwrap()
        .unwrap();
    assert_eq!(row.get_str("name"), Some("widget"));
    assert_eq!(row.get_i64("qty"), Some(7));

    let qty = gw
        .fetch_scalar(&SqlFragment::sql("SELECT qty FROM items WHERE id = ").bind(1_i64))
        .unwrap();
    assert_eq!(qty, Some(SqlValue::Integer(7)));
}

#[test]
fn fetch_row_none_when_no_match() {
    let gw = gateway_with_table();
    let row = gw
        .fetch_row(&SqlFragment::sql("SELECT * FROM items WHERE id = ").bind(99_i64))
        .unwrap();
    assert!(row.is_none());
    let scalar = gw
        .fetch_scalar(&SqlFragment::sql("SELECT qty FROM items WHERE id = ").bind(99_i64))
        .unwrap();
    assert!(scalar.is_none());
}

#[test]
fn fetch_all_preserves_order() {
    let gw = gateway_with_table();
    for name in ["c", "a", "b"] {
        gw.insert("items", &Row::new().with("name", name)).unwrap();
    }
    let rows = gw
        .fetch_all(&SqlFragment::sql("SELECT name FROM items ORDER BY name"))
        .unwrap();
    let names: Vec<_> = rows.iter().filter_map(|r| r.get_str("name")).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn update_and_delete_by_condition() {
    let gw = gateway_with_table();
    let id = gw.insert("items", &Row::new().with("name", "a").with("qty", 1_i64)).unwrap();

    let changed = gw
        .update(
            "items",
            &Row::new().with("qty", 5_i64),
            &SqlFragment::sql("id = ").bind(id),
        )
        .unwrap();
    assert_eq!(changed, 1);
    let qty = gw
        .fetch_scalar(&SqlFragment::sql("SELECT qty FROM items WHERE id = ").bind(id))
        .unwrap();
    assert_eq!(qty, Some(SqlValue::Integer(5)));

    let removed = gw.delete("items", &SqlFragment::sql("id = ").bind(id)).unwrap();
    assert_eq!(removed, 1);
    assert_eq!(gw.delete("items", &SqlFragment::sql("id = ").bind(id)).unwrap(), 0);
}

#[test]
fn table_exists_reflects_schema() {
    let gw = gateway_with_table();
    assert!(gw.table_exists("items").unwrap());
    assert!(!gw.table_exists("entries_data_1").unwrap());
}

#[test]
fn escape_and_render() {
    let gw = gateway_with_table();
    assert_eq!(gw.escape("it's"), "it''s");
    let fragment = SqlFragment::sql("name = ").bind("it's");
    assert_eq!(gw.render(&fragment), "name = 'it''s'");
}

#[test]
fn regexp_predicate_matches() {
    let gw = gateway_with_table();
    for name in ["Apple", "avocado", "Banana"] {
        gw.insert("items", &Row::new().with("name", name)).unwrap();
    }
    gw.insert("items", &Row::new().with("qty", 1_i64)).unwrap();

    let rows = gw
        .fetch_all(&SqlFragment::sql("SELECT name FROM items WHERE name REGEXP ").bind("^A"))
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get_str("name"), Some("Apple"));
}

#[test]
fn invalid_regexp_is_a_database_error() {
    let gw = gateway_with_table();
    gw.insert("items", &Row::new().with("name", "x")).unwrap();
    let result = gw.fetch_all(&SqlFragment::sql("SELECT name FROM items WHERE name REGEXP ").bind("("));
    assert!(matches!(result, Err(DbError::Database(_))));
}

#[test]
fn on_disk_database_is_shared_between_gateways() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fields.db");

    let first = SqliteGateway::open(&path).unwrap();
    first
        .execute(&SqlFragment::sql("CREATE TABLE IF NOT EXISTS t (id INTEGER PRIMARY KEY)"))
        .unwrap();

    let second = SqliteGateway::open(&path).unwrap();
    assert!(second.table_exists("t").unwrap());
    second
        .execute(&SqlFragment::sql("CREATE TABLE IF NOT EXISTS t (id INTEGER PRIMARY KEY)"))
        .unwrap();
}
