//! Data models for recipes and resource amounts

use std::fmt;

use serde::Deserialize;

use crate::report::format_amount;
use crate::resource::Resource;

/// A resource with a signed amount. Used for demand lines and ledger entries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceAmount {
    pub resource: Resource,
    pub amount: f64,
}

impl ResourceAmount {
    pub fn new(resource: Resource, amount: f64) -> Self {
        Self { resource, amount }
    }
}

impl fmt::Display for ResourceAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", format_amount(self.amount), self.resource)
    }
}

/// A recipe normalized to produce exactly one unit of `output`.
///
/// Input and side output amounts are per unit of output. The output never
/// appears among its own inputs or side outputs.
#[derive(Debug, Clone, PartialEq)]
pub struct MonoRecipe {
    pub output: Resource,
    pub inputs: Vec<ResourceAmount>,
    pub side_outputs: Vec<ResourceAmount>,
}

impl fmt::Display for MonoRecipe {
    /// `3 CMAT + 20 COMP -> 1 PCON + 1 MBEAM`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, input) in self.inputs.iter().enumerate() {
            if i > 0 {
                f.write_str(" + ")?;
            }
            write!(f, "{} ", input)?;
        }

        write!(f, "-> 1 {}", self.output)?;

        for side in &self.side_outputs {
            write!(f, " + {}", side)?;
        }

        Ok(())
    }
}

/// One `{name, amount}` line as it appears in the recipe source
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawAmount {
    pub name: String,
    pub amount: f64,
}

impl RawAmount {
    pub fn new(name: impl Into<String>, amount: f64) -> Self {
        Self {
            name: name.into(),
            amount,
        }
    }
}

/// A recipe as declared in the source: any number of outputs and inputs,
/// amounts counted per run of the whole recipe.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRecipe {
    pub outputs: Vec<RawAmount>,
    #[serde(default)]
    pub inputs: Vec<RawAmount>,
}

/// Top level of a recipe JSON file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeSource {
    pub recipes: Vec<RawRecipe>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_display() {
        let recipe = MonoRecipe {
            output: Resource::Pcon,
            inputs: vec![
                ResourceAmount::new(Resource::Cmat, 3.0),
                ResourceAmount::new(Resource::Comp, 20.0),
            ],
            side_outputs: vec![ResourceAmount::new(Resource::Mbeam, 1.0)],
        };
        assert_eq!(recipe.to_string(), "3 CMAT + 20 COMP -> 1 PCON + 1 MBEAM");
    }

    #[test]
    fn test_recipe_display_fractional_amounts() {
        let recipe = MonoRecipe {
            output: Resource::Petrol,
            inputs: vec![ResourceAmount::new(Resource::Oil, 1.0 / 3.0)],
            side_outputs: vec![ResourceAmount::new(Resource::Water, 2.5)],
        };
        assert_eq!(recipe.to_string(), "0.33 OIL -> 1 PETROL + 2.5 WATER");
    }

    #[test]
    fn test_recipe_display_without_inputs() {
        let recipe = MonoRecipe {
            output: Resource::Water,
            inputs: Vec::new(),
            side_outputs: Vec::new(),
        };
        assert_eq!(recipe.to_string(), "-> 1 WATER");
    }

    #[test]
    fn test_raw_recipe_inputs_default_to_empty() {
        let raw: RawRecipe =
            serde_json::from_str(r#"{"outputs": [{"name": "water", "amount": 50}]}"#).unwrap();
        assert!(raw.inputs.is_empty());
        assert_eq!(raw.outputs, vec![RawAmount::new("water", 50.0)]);
    }
}
