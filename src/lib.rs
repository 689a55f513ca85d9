//! Foxhole Production Calculator
//!
//! Works out the raw materials and byproducts needed to produce a list of
//! items from a table of recipes, asking which recipe to use whenever more
//! than one can make something.

pub mod calculator;
pub mod db;
pub mod error;
pub mod extract;
pub mod logging;
pub mod models;
pub mod prompt;
pub mod recipes;
pub mod report;
pub mod resource;

pub use calculator::{Calculator, Ledger, RecipeChooser, ScriptedChooser, chooser_fn};
pub use error::{ConfigError, ResolveError, ValidationError};
pub use models::{MonoRecipe, RawAmount, RawRecipe, ResourceAmount};
pub use recipes::RecipeTable;
pub use resource::Resource;
