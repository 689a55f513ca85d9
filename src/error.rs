//! Error types for recipe loading, user input and resolution

use std::io;

use thiserror::Error;

use crate::resource::Resource;

/// Problems with the recipe source. Fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown resource name \"{0}\" in recipe source")]
    UnknownResource(String),

    #[error("recipe output {resource} has invalid amount {amount}")]
    InvalidOutputAmount { resource: Resource, amount: f64 },

    #[error("recipe for {resource} consumes its own output")]
    SelfInput { resource: Resource },

    #[error("recipe #{index} declares no outputs")]
    NoOutputs { index: usize },

    #[error("failed to parse recipe source: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read recipe source: {0}")]
    Io(#[from] io::Error),
}

/// Malformed user input. Shown to the user and re-prompted, never fatal.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Not enough input.")]
    NotEnoughInput,

    #[error("First value not a number.")]
    NotANumber,

    #[error("Amount must not be negative.")]
    NegativeAmount,

    #[error("Material \"{0}\" not found.")]
    UnknownMaterial(String),

    #[error("\"{0}\" is not a whole number.")]
    NotAnInteger(String),

    #[error("Choice {choice} is out of range (0-{max}).")]
    ChoiceOutOfRange { choice: usize, max: usize },
}

/// Failures while expanding a demand list into a ledger
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("cyclic recipe chain: {}", format_path(.path))]
    Cycle { path: Vec<Resource> },

    #[error("chooser picked recipe {index} for {resource}, but only {count} exist")]
    InvalidChoice {
        resource: Resource,
        index: usize,
        count: usize,
    },

    #[error("recipe chooser failed: {0}")]
    Chooser(#[from] io::Error),
}

fn format_path(path: &[Resource]) -> String {
    path.iter()
        .map(|r| r.name())
        .collect::<Vec<_>>()
        .join(" -> ")
}
