//! The recipe table: normalized mono-recipes queried by output

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::ConfigError;
use crate::models::{MonoRecipe, RawAmount, RawRecipe, RecipeSource, ResourceAmount};
use crate::resource::Resource;

/// Immutable collection of mono-recipes in insertion order.
///
/// Several recipes may share an output; they are competing production
/// methods and are offered to the user in the order they were loaded.
#[derive(Debug, Clone, Default)]
pub struct RecipeTable {
    recipes: Vec<MonoRecipe>,
}

impl RecipeTable {
    /// Normalize raw recipes into one mono-recipe per declared output
    pub fn from_raw(raw: &[RawRecipe]) -> Result<Self, ConfigError> {
        let mut recipes = Vec::new();
        for (index, recipe) in raw.iter().enumerate() {
            recipes.extend(normalize(index, recipe)?);
        }
        debug!(raw = raw.len(), mono = recipes.len(), "recipe table built");
        Ok(Self { recipes })
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let source: RecipeSource = serde_json::from_str(json)?;
        Self::from_raw(&source.recipes)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Every recipe producing `resource`, in table order. Empty means raw.
    pub fn find_recipes(&self, resource: Resource) -> Vec<&MonoRecipe> {
        self.recipes.iter().filter(|r| r.output == resource).collect()
    }

    pub fn recipes(&self) -> &[MonoRecipe] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

/// Split one raw recipe into a mono-recipe per output, scaling every other
/// amount by that output's declared quantity.
pub fn normalize(index: usize, raw: &RawRecipe) -> Result<Vec<MonoRecipe>, ConfigError> {
    if raw.outputs.is_empty() {
        return Err(ConfigError::NoOutputs { index });
    }

    let outputs = lookup_all(&raw.outputs)?;
    let inputs = lookup_all(&raw.inputs)?;

    let mut result = Vec::with_capacity(outputs.len());
    for (i, primary) in outputs.iter().enumerate() {
        let divisor = primary.amount;
        if !divisor.is_finite() || divisor <= 0.0 {
            return Err(ConfigError::InvalidOutputAmount {
                resource: primary.resource,
                amount: divisor,
            });
        }

        if inputs.iter().any(|input| input.resource == primary.resource) {
            return Err(ConfigError::SelfInput {
                resource: primary.resource,
            });
        }

        let side_outputs = outputs
            .iter()
            .enumerate()
            .filter(|(j, side)| *j != i && side.resource != primary.resource)
            .map(|(_, side)| ResourceAmount::new(side.resource, side.amount / divisor))
            .collect();

        let inputs = inputs
            .iter()
            .map(|input| ResourceAmount::new(input.resource, input.amount / divisor))
            .collect();

        result.push(MonoRecipe {
            output: primary.resource,
            inputs,
            side_outputs,
        });
    }

    Ok(result)
}

fn lookup_all(amounts: &[RawAmount]) -> Result<Vec<ResourceAmount>, ConfigError> {
    amounts
        .iter()
        .map(|a| {
            let resource: Resource = a.name.parse()?;
            Ok(ResourceAmount::new(resource, a.amount))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(outputs: &[(&str, f64)], inputs: &[(&str, f64)]) -> RawRecipe {
        RawRecipe {
            outputs: outputs.iter().map(|(n, a)| RawAmount::new(*n, *a)).collect(),
            inputs: inputs.iter().map(|(n, a)| RawAmount::new(*n, *a)).collect(),
        }
    }

    #[test]
    fn test_normalize_multi_output_recipe() {
        let recipes = normalize(0, &raw(&[("salvage", 2.0), ("comp", 4.0)], &[("coal", 10.0)]))
            .unwrap();

        assert_eq!(recipes.len(), 2);

        assert_eq!(recipes[0].output, Resource::Salvage);
        assert_eq!(recipes[0].inputs, vec![ResourceAmount::new(Resource::Coal, 5.0)]);
        assert_eq!(
            recipes[0].side_outputs,
            vec![ResourceAmount::new(Resource::Comp, 2.0)]
        );

        assert_eq!(recipes[1].output, Resource::Comp);
        assert_eq!(recipes[1].inputs, vec![ResourceAmount::new(Resource::Coal, 2.5)]);
        assert_eq!(
            recipes[1].side_outputs,
            vec![ResourceAmount::new(Resource::Salvage, 0.5)]
        );
    }

    #[test]
    fn test_unknown_name_is_config_error() {
        let err = normalize(0, &raw(&[("pcon", 1.0)], &[("bmat", 3.0)])).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownResource(ref n) if n == "bmat"));
    }

    #[test]
    fn test_zero_output_is_config_error() {
        let err = normalize(0, &raw(&[("pcon", 0.0)], &[("cmat", 3.0)])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidOutputAmount {
                resource: Resource::Pcon,
                ..
            }
        ));
    }

    #[test]
    fn test_output_among_inputs_is_config_error() {
        let err = normalize(0, &raw(&[("salvage", 2.0)], &[("salvage", 1.0)])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::SelfInput {
                resource: Resource::Salvage
            }
        ));

        // Caught even when the consumed output is not listed first
        let err = normalize(0, &raw(&[("petrol", 1.0), ("oil", 1.0)], &[("oil", 2.0)])).unwrap_err();
        assert!(matches!(err, ConfigError::SelfInput { resource: Resource::Oil }));
    }

    #[test]
    fn test_recipe_without_outputs_is_config_error() {
        let err = RecipeTable::from_raw(&[raw(&[("pcon", 1.0)], &[]), raw(&[], &[("cmat", 1.0)])])
            .unwrap_err();
        assert!(matches!(err, ConfigError::NoOutputs { index: 1 }));
    }

    #[test]
    fn test_find_recipes_keeps_insertion_order() {
        let table = RecipeTable::from_json_str(
            r#"{"recipes": [
                {"outputs": [{"name": "PETROL", "amount": 1}], "inputs": [{"name": "OIL", "amount": 2}]},
                {"outputs": [{"name": "PCON", "amount": 1}], "inputs": [{"name": "CMAT", "amount": 3}]},
                {"outputs": [{"name": "petrol", "amount": 2}], "inputs": [{"name": "hoil", "amount": 1}]}
            ]}"#,
        )
        .unwrap();

        assert_eq!(table.len(), 3);
        let petrol = table.find_recipes(Resource::Petrol);
        assert_eq!(petrol.len(), 2);
        assert_eq!(petrol[0].inputs[0].resource, Resource::Oil);
        assert_eq!(petrol[1].inputs[0], ResourceAmount::new(Resource::Hoil, 0.5));
        assert!(table.find_recipes(Resource::Cmat).is_empty());
    }

    #[test]
    fn test_bad_json_is_config_error() {
        let err = RecipeTable::from_json_str("{\"recipes\": 3}").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
