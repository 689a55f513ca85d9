//! Importing recipe JSON files into the database
//!
//! A source is either a single JSON file or a directory tree; every `*.json`
//! file found in it is validated on its own and stored only if all of its
//! recipes normalize cleanly.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::db;
use crate::models::{RawAmount, RawRecipe, RecipeSource};
use crate::recipes::RecipeTable;
use crate::resource::Resource;

/// Find recipe files under `source`, sorted by path
pub fn find_recipe_files(source: &Path) -> Result<Vec<PathBuf>> {
    if source.is_file() {
        return Ok(vec![source.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(source).follow_links(true).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {}", source.display()))?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

/// Parse and validate one recipe file, returning its recipes with canonical names
fn parse_recipe_file(path: &Path) -> Result<(Vec<RawRecipe>, usize)> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let source: RecipeSource = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    let table = RecipeTable::from_raw(&source.recipes)
        .with_context(|| format!("Invalid recipe in {}", path.display()))?;

    let recipes = source.recipes.iter().map(canonicalize).collect();
    Ok((recipes, table.len()))
}

fn canonicalize(recipe: &RawRecipe) -> RawRecipe {
    let canon = |amounts: &[RawAmount]| -> Vec<RawAmount> {
        amounts
            .iter()
            .map(|a| match Resource::from_name(&a.name) {
                Some(r) => RawAmount::new(r.name(), a.amount),
                None => a.clone(),
            })
            .collect()
    };
    RawRecipe {
        outputs: canon(&recipe.outputs),
        inputs: canon(&recipe.inputs),
    }
}

/// Import every recipe file under `source` into the database
pub fn import_to_database(conn: &Connection, source: &Path) -> Result<ImportStats> {
    let mut stats = ImportStats::default();

    let files = find_recipe_files(source)?;
    info!(source = %source.display(), files = files.len(), "importing recipes");

    for path in &files {
        match parse_recipe_file(path) {
            Ok((recipes, mono)) => {
                let label = path.display().to_string();
                db::insert_recipes(conn, &recipes, Some(&label))?;

                stats.files += 1;
                stats.recipes += recipes.len();
                stats.mono_recipes += mono;

                info!(file = %label, recipes = recipes.len(), mono, "imported");
            }
            Err(e) => {
                warn!(file = %path.display(), "skipped: {:#}", e);
                stats.errors += 1;
            }
        }
    }

    Ok(stats)
}

#[derive(Debug, Default, PartialEq)]
pub struct ImportStats {
    pub files: usize,
    pub recipes: usize,
    pub mono_recipes: usize,
    pub errors: usize,
}

impl std::fmt::Display for ImportStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Imported {} recipes ({} mono-recipes) from {} files. Errors: {}",
            self.recipes, self.mono_recipes, self.files, self.errors
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const FACILITY: &str = r#"{"recipes": [
        {"outputs": [{"name": "pcon", "amount": 1}],
         "inputs": [{"name": "cmat", "amount": 3}, {"name": "comp", "amount": 20}]}
    ]}"#;

    const REFINERY: &str = r#"{"recipes": [
        {"outputs": [{"name": "PETROL", "amount": 2}, {"name": "WATER", "amount": 1}],
         "inputs": [{"name": "OIL", "amount": 4}]}
    ]}"#;

    const BROKEN: &str = r#"{"recipes": [
        {"outputs": [{"name": "BMAT", "amount": 1}], "inputs": []}
    ]}"#;

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        db::init_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn test_find_recipe_files_sorted() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.json"), REFINERY).unwrap();
        fs::write(dir.path().join("nested/a.json"), FACILITY).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();

        let files = find_recipe_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();

        assert_eq!(names, vec![PathBuf::from("b.json"), PathBuf::from("nested/a.json")]);
    }

    #[test]
    fn test_import_directory_skips_invalid_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("1_facility.json"), FACILITY).unwrap();
        fs::write(dir.path().join("2_broken.json"), BROKEN).unwrap();
        fs::write(dir.path().join("3_refinery.json"), REFINERY).unwrap();
        let conn = memory_db();

        let stats = import_to_database(&conn, dir.path()).unwrap();

        assert_eq!(
            stats,
            ImportStats {
                files: 2,
                recipes: 2,
                mono_recipes: 3,
                errors: 1,
            }
        );

        let stored = db::load_raw_recipes(&conn).unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].outputs, vec![RawAmount::new("PCON", 1.0)]);
        assert_eq!(stored[0].inputs[1], RawAmount::new("COMP", 20.0));

        let table = RecipeTable::from_raw(&stored).unwrap();
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_import_single_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("recipes.json");
        fs::write(&path, REFINERY).unwrap();
        let conn = memory_db();

        let stats = import_to_database(&conn, &path).unwrap();

        assert_eq!(stats.files, 1);
        assert_eq!(stats.mono_recipes, 2);
        assert_eq!(
            stats.to_string(),
            "Imported 1 recipes (2 mono-recipes) from 1 files. Errors: 0"
        );
    }
}
