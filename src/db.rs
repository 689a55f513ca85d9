//! Database schema and operations

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, params};

use crate::models::{RawAmount, RawRecipe};
use crate::recipes::RecipeTable;

/// Open (creating if needed) the database at `path` with the schema in place
pub fn open(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

/// Load the recipe table from a JSON file when given, else from the database.
///
/// The database is only opened in the second case.
pub fn load_table(database: &Path, recipes: Option<&Path>) -> Result<RecipeTable> {
    match recipes {
        Some(path) => RecipeTable::from_json_file(path)
            .with_context(|| format!("Failed to load recipes from {}", path.display())),
        None => {
            let conn = open(database)?;
            let raw = load_raw_recipes(&conn)?;
            RecipeTable::from_raw(&raw).context("Stored recipes are invalid; re-import them")
        }
    }
}

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- One row per declared recipe, in import order
        CREATE TABLE IF NOT EXISTS recipes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            source TEXT
        );

        -- What a recipe consumes per run
        CREATE TABLE IF NOT EXISTS recipe_inputs (
            recipe_id INTEGER NOT NULL,
            position INTEGER NOT NULL,
            resource_id TEXT NOT NULL,
            amount REAL NOT NULL,
            PRIMARY KEY (recipe_id, position)
        );

        -- What a recipe produces per run
        CREATE TABLE IF NOT EXISTS recipe_outputs (
            recipe_id INTEGER NOT NULL,
            position INTEGER NOT NULL,
            resource_id TEXT NOT NULL,
            amount REAL NOT NULL,
            PRIMARY KEY (recipe_id, position)
        );

        CREATE INDEX IF NOT EXISTS idx_recipe_outputs_resource ON recipe_outputs(resource_id);
        "#,
    )?;
    Ok(())
}

/// Insert the recipes of one source in a single transaction.
///
/// Either every recipe is stored or none is.
pub fn insert_recipes(conn: &Connection, recipes: &[RawRecipe], source: Option<&str>) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    for recipe in recipes {
        insert_recipe(&tx, recipe, source)?;
    }
    tx.commit()?;
    Ok(recipes.len())
}

fn insert_recipe(conn: &Connection, recipe: &RawRecipe, source: Option<&str>) -> Result<i64> {
    conn.execute("INSERT INTO recipes (source) VALUES (?1)", params![source])?;
    let recipe_id = conn.last_insert_rowid();

    for (position, input) in recipe.inputs.iter().enumerate() {
        conn.execute(
            "INSERT INTO recipe_inputs (recipe_id, position, resource_id, amount)
             VALUES (?1, ?2, ?3, ?4)",
            params![recipe_id, position as i64, input.name, input.amount],
        )?;
    }

    for (position, output) in recipe.outputs.iter().enumerate() {
        conn.execute(
            "INSERT INTO recipe_outputs (recipe_id, position, resource_id, amount)
             VALUES (?1, ?2, ?3, ?4)",
            params![recipe_id, position as i64, output.name, output.amount],
        )?;
    }

    Ok(recipe_id)
}

/// Clear all imported recipes (for re-import)
pub fn clear_recipes(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        DELETE FROM recipe_outputs;
        DELETE FROM recipe_inputs;
        DELETE FROM recipes;
        "#,
    )?;
    Ok(())
}

/// Load every stored recipe in import order
pub fn load_raw_recipes(conn: &Connection) -> Result<Vec<RawRecipe>> {
    let mut stmt = conn.prepare("SELECT id FROM recipes ORDER BY id")?;
    let ids = stmt
        .query_map([], |row| row.get::<_, i64>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut recipes = Vec::with_capacity(ids.len());
    for id in ids {
        recipes.push(RawRecipe {
            outputs: load_amounts(conn, "recipe_outputs", id)?,
            inputs: load_amounts(conn, "recipe_inputs", id)?,
        });
    }
    Ok(recipes)
}

fn load_amounts(conn: &Connection, table: &str, recipe_id: i64) -> Result<Vec<RawAmount>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT resource_id, amount FROM {table} WHERE recipe_id = ?1 ORDER BY position"
    ))?;

    let rows = stmt.query_map([recipe_id], |row| {
        Ok(RawAmount {
            name: row.get(0)?,
            amount: row.get(1)?,
        })
    })?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row.with_context(|| format!("bad row in {table} for recipe {recipe_id}"))?);
    }
    Ok(results)
}

/// Number of stored recipes
pub fn count_recipes(conn: &Connection) -> Result<usize> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM recipes", [], |row| row.get(0))?;
    Ok(count as usize)
}
