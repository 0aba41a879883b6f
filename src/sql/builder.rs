//! Builds parameterized DDL, INSERT, SELECT, UPDATE, DELETE from the table catalogue.
//! Identifiers only ever come from the catalogue; values are always `?` parameters.

use crate::model::{ColumnDef, Dependent, PrimaryKey, TableDef, ID_COLUMN};

/// Quote identifier for SQLite (safe: only from the catalogue).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

/// `"id", "col1", "col2"` for serial tables, declared columns only otherwise.
fn select_column_list(table: &TableDef) -> String {
    let mut cols = Vec::with_capacity(table.columns.len() + 1);
    if table.is_serial() {
        cols.push(quoted(ID_COLUMN));
    }
    cols.extend(table.columns.iter().map(|c| quoted(c.name)));
    cols.join(", ")
}

fn insert_column_list(table: &TableDef) -> String {
    table
        .columns
        .iter()
        .map(|c| quoted(c.name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn column_definition(c: &ColumnDef) -> String {
    let mut def = format!("{} {}", quoted(c.name), c.ty.sql());
    if !c.nullable {
        def.push_str(" NOT NULL");
    }
    if c.unique {
        def.push_str(" UNIQUE");
    }
    def
}

/// CREATE TABLE IF NOT EXISTS with primary key, NOT NULL, UNIQUE and foreign keys.
pub fn create_table(table: &TableDef) -> String {
    let mut defs: Vec<String> = Vec::new();
    if table.is_serial() {
        defs.push(format!("{} INTEGER PRIMARY KEY AUTOINCREMENT", quoted(ID_COLUMN)));
    }
    defs.extend(table.columns.iter().map(column_definition));
    if let PrimaryKey::Composite(cols) = &table.primary_key {
        let cols: Vec<String> = cols.iter().map(|c| quoted(c)).collect();
        defs.push(format!("PRIMARY KEY ({})", cols.join(", ")));
    }
    for c in table.columns {
        if let Some(referenced) = c.references {
            defs.push(format!(
                "FOREIGN KEY ({}) REFERENCES {} ({})",
                quoted(c.name),
                quoted(referenced),
                quoted(ID_COLUMN)
            ));
        }
    }
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n  {}\n)",
        quoted(table.name),
        defs.join(",\n  ")
    )
}

/// ALTER TABLE ADD COLUMN for a column missing from an existing table.
/// SQLite needs a default to add a NOT NULL column, so the type's zero value is used.
pub fn add_column(table: &TableDef, c: &ColumnDef) -> String {
    let mut def = format!("{} {}", quoted(c.name), c.ty.sql());
    if !c.nullable {
        def.push_str(&format!(" NOT NULL DEFAULT {}", c.ty.zero_literal()));
    }
    if let Some(referenced) = c.references {
        def.push_str(&format!(" REFERENCES {} ({})", quoted(referenced), quoted(ID_COLUMN)));
    }
    format!("ALTER TABLE {} ADD COLUMN {}", quoted(table.name), def)
}

/// SQLite cannot add a UNIQUE column; added unique columns get an index instead.
pub fn create_unique_index(table: &TableDef, c: &ColumnDef) -> String {
    format!(
        "CREATE UNIQUE INDEX IF NOT EXISTS {} ON {} ({})",
        quoted(&format!("{}_{}_key", table.name, c.name)),
        quoted(table.name),
        quoted(c.name)
    )
}

/// Column names currently present on a table.
pub fn table_info(table: &TableDef) -> String {
    format!("SELECT name FROM pragma_table_info('{}')", table.name.replace('\'', "''"))
}

pub fn select_all(table: &TableDef) -> String {
    format!(
        "SELECT {} FROM {} ORDER BY {}",
        select_column_list(table),
        quoted(table.name),
        quoted(ID_COLUMN)
    )
}

/// SELECT by primary key. Caller binds id as the sole param.
pub fn select_by_id(table: &TableDef) -> String {
    format!(
        "SELECT {} FROM {} WHERE {} = ?",
        select_column_list(table),
        quoted(table.name),
        quoted(ID_COLUMN)
    )
}

/// `SELECT 1` for an id, without loading the row. Caller binds id as the sole param.
pub fn select_exists(table: &TableDef) -> String {
    format!("SELECT 1 FROM {} WHERE {} = ?", quoted(table.name), quoted(ID_COLUMN))
}

/// SELECT rows whose `column` equals the sole param.
pub fn select_by_column(table: &TableDef, column: &str) -> String {
    format!(
        "SELECT {} FROM {} WHERE {} = ? ORDER BY {}",
        select_column_list(table),
        quoted(table.name),
        quoted(column),
        quoted(ID_COLUMN)
    )
}

/// INSERT every declared column, returning the stored row (with its new id).
pub fn insert(table: &TableDef) -> String {
    format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(table.name),
        insert_column_list(table),
        placeholders(table.columns.len()),
        select_column_list(table)
    )
}

/// Insert-if-absent on a natural key: one statement, no separate existence check.
/// Params: every declared column, then the natural key value again.
pub fn insert_if_absent(table: &TableDef, natural_key: &str) -> String {
    format!(
        "INSERT INTO {table} ({cols}) SELECT {ph} WHERE NOT EXISTS (SELECT 1 FROM {table} WHERE {key} = ?)",
        table = quoted(table.name),
        cols = insert_column_list(table),
        ph = placeholders(table.columns.len()),
        key = quoted(natural_key),
    )
}

/// INSERT OR IGNORE into a join table (composite primary key absorbs duplicates).
pub fn insert_link(table: &TableDef) -> String {
    format!(
        "INSERT OR IGNORE INTO {} ({}) VALUES ({})",
        quoted(table.name),
        insert_column_list(table),
        placeholders(table.columns.len())
    )
}

/// Link a shop item to a category, both looked up by title. Params: item title, category title.
pub fn insert_link_by_titles(join: &TableDef, items: &TableDef, categories: &TableDef) -> String {
    format!(
        "INSERT OR IGNORE INTO {join} ({cols}) SELECT i.{id}, c.{id} FROM {items} i, {categories} c WHERE i.\"title\" = ? AND c.\"title\" = ?",
        join = quoted(join.name),
        cols = insert_column_list(join),
        id = quoted(ID_COLUMN),
        items = quoted(items.name),
        categories = quoted(categories.name),
    )
}

/// Full replace of the declared columns. Params: every declared column, then id.
pub fn update(table: &TableDef) -> String {
    let sets: Vec<String> = table
        .columns
        .iter()
        .map(|c| format!("{} = ?", quoted(c.name)))
        .collect();
    format!(
        "UPDATE {} SET {} WHERE {} = ? RETURNING {}",
        quoted(table.name),
        sets.join(", "),
        quoted(ID_COLUMN),
        select_column_list(table)
    )
}

pub fn delete_by_id(table: &TableDef) -> String {
    format!("DELETE FROM {} WHERE {} = ?", quoted(table.name), quoted(ID_COLUMN))
}

/// DELETE rows matching every listed column. Params: one per column, in order.
pub fn delete_where(table: &TableDef, columns: &[&str]) -> String {
    let conds: Vec<String> = columns.iter().map(|c| format!("{} = ?", quoted(c))).collect();
    format!("DELETE FROM {} WHERE {}", quoted(table.name), conds.join(" AND "))
}

pub fn delete_dependents(dep: &Dependent) -> String {
    format!("DELETE FROM {} WHERE {} = ?", quoted(dep.table), quoted(dep.column))
}

/// Categories linked to any of `n` shop items, tagged with the item id.
/// Params: the `n` item ids.
pub fn select_categories_for_items(join: &TableDef, categories: &TableDef, n: usize) -> String {
    let cols: Vec<String> = std::iter::once(ID_COLUMN)
        .chain(categories.columns.iter().map(|c| c.name))
        .map(|c| format!("c.{q} AS {q}", q = quoted(c)))
        .collect();
    format!(
        "SELECT j.\"shop_item_id\" AS \"shop_item_id\", {} FROM {} j JOIN {} c ON c.{} = j.\"category_id\" WHERE j.\"shop_item_id\" IN ({}) ORDER BY j.\"shop_item_id\", c.{}",
        cols.join(", "),
        quoted(join.name),
        quoted(categories.name),
        quoted(ID_COLUMN),
        placeholders(n),
        quoted(ID_COLUMN)
    )
}
