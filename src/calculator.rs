//! Production chain calculator logic
//!
//! Expands a list of requested products into the raw materials that must be
//! acquired and the byproducts left over. Whenever more than one recipe makes
//! a resource the decision is handed to a [`RecipeChooser`].

use std::collections::{BTreeMap, VecDeque};
use std::io;

use tracing::{debug, trace};

use crate::error::ResolveError;
use crate::models::{MonoRecipe, ResourceAmount};
use crate::recipes::RecipeTable;
use crate::resource::Resource;

/// Picks one of several recipes for a resource.
///
/// Returns the zero-based index into `candidates`, or `None` to leave the
/// shortage unresolved.
pub trait RecipeChooser {
    fn choose(&mut self, resource: Resource, candidates: &[&MonoRecipe]) -> io::Result<Option<usize>>;
}

/// Chooser backed by a plain function, see [`chooser_fn`]
pub struct FnChooser<F>(F);

/// Wrap a closure as a [`RecipeChooser`]
pub fn chooser_fn<F>(f: F) -> FnChooser<F>
where
    F: FnMut(Resource, &[&MonoRecipe]) -> Option<usize>,
{
    FnChooser(f)
}

impl<F> RecipeChooser for FnChooser<F>
where
    F: FnMut(Resource, &[&MonoRecipe]) -> Option<usize>,
{
    fn choose(&mut self, resource: Resource, candidates: &[&MonoRecipe]) -> io::Result<Option<usize>> {
        Ok((self.0)(resource, candidates))
    }
}

/// Replays a fixed list of menu selections: `0` declines, `n` picks the
/// n-th candidate. Used for batch runs and tests.
#[derive(Debug, Clone, Default)]
pub struct ScriptedChooser {
    selections: VecDeque<usize>,
    asked: Vec<Resource>,
}

impl ScriptedChooser {
    pub fn new(selections: impl IntoIterator<Item = usize>) -> Self {
        Self {
            selections: selections.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    /// Resources this chooser was asked about, in order
    pub fn asked(&self) -> &[Resource] {
        &self.asked
    }

    pub fn remaining(&self) -> usize {
        self.selections.len()
    }
}

impl RecipeChooser for ScriptedChooser {
    fn choose(&mut self, resource: Resource, _candidates: &[&MonoRecipe]) -> io::Result<Option<usize>> {
        self.asked.push(resource);
        match self.selections.pop_front() {
            Some(0) => Ok(None),
            Some(n) => Ok(Some(n - 1)),
            None => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("no scripted choice left for {}", resource),
            )),
        }
    }
}

/// Net balance per resource: negative = still needed, positive = surplus.
///
/// Entries are only ever added or updated, never removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    balances: BTreeMap<Resource, f64>,
}

impl Ledger {
    /// Start from the negated demand list, combining repeated resources
    pub fn from_demands(demands: &[ResourceAmount]) -> Self {
        let mut ledger = Self::default();
        for demand in demands {
            ledger.add(demand.resource, -demand.amount);
        }
        ledger
    }

    pub fn get(&self, resource: Resource) -> Option<f64> {
        self.balances.get(&resource).copied()
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ResourceAmount> + '_ {
        self.balances
            .iter()
            .map(|(resource, amount)| ResourceAmount::new(*resource, *amount))
    }

    /// Shortages as positive amounts, sorted by name
    pub fn materials(&self) -> Vec<ResourceAmount> {
        let mut list: Vec<_> = self
            .iter()
            .filter(|e| e.amount < 0.0)
            .map(|e| ResourceAmount::new(e.resource, -e.amount))
            .collect();
        sort_by_name(&mut list);
        list
    }

    /// Surpluses, sorted by name
    pub fn byproducts(&self) -> Vec<ResourceAmount> {
        let mut list: Vec<_> = self.iter().filter(|e| e.amount > 0.0).collect();
        sort_by_name(&mut list);
        list
    }

    fn add(&mut self, resource: Resource, delta: f64) {
        *self.balances.entry(resource).or_insert(0.0) += delta;
    }

    fn set(&mut self, resource: Resource, amount: f64) {
        self.balances.insert(resource, amount);
    }
}

fn sort_by_name(list: &mut [ResourceAmount]) {
    list.sort_by(|a, b| a.resource.name().cmp(b.resource.name()));
}

/// Resolves demand lists against a recipe table
#[derive(Debug, Clone, Copy)]
pub struct Calculator<'a> {
    table: &'a RecipeTable,
}

impl<'a> Calculator<'a> {
    pub fn new(table: &'a RecipeTable) -> Self {
        Self { table }
    }

    /// Calculate the materials and byproducts for a list of demands.
    ///
    /// Demands are satisfied in order, depth first. A resource shared by
    /// several branches is decided on with whatever balance the ledger holds
    /// at the moment it is reached, so a later occurrence covers the combined
    /// shortage of everything before it.
    pub fn resolve<C>(&self, demands: &[ResourceAmount], chooser: &mut C) -> Result<Ledger, ResolveError>
    where
        C: RecipeChooser + ?Sized,
    {
        let mut ledger = Ledger::from_demands(demands);
        let mut path = Vec::new();

        for demand in demands {
            self.satisfy(demand.resource, &mut ledger, chooser, &mut path)?;
        }

        Ok(ledger)
    }

    fn satisfy<C>(
        &self,
        resource: Resource,
        ledger: &mut Ledger,
        chooser: &mut C,
        path: &mut Vec<Resource>,
    ) -> Result<(), ResolveError>
    where
        C: RecipeChooser + ?Sized,
    {
        let balance = ledger.get(resource).unwrap_or(0.0);
        if balance >= 0.0 {
            trace!(%resource, balance, "already covered");
            return Ok(());
        }

        let needed = -balance;
        let candidates = self.table.find_recipes(resource);
        if candidates.is_empty() {
            debug!(%resource, needed, "raw material");
            return Ok(());
        }

        let Some(index) = chooser.choose(resource, &candidates)? else {
            debug!(%resource, needed, "recipe declined, left as material");
            return Ok(());
        };

        let recipe = candidates
            .get(index)
            .copied()
            .ok_or(ResolveError::InvalidChoice {
                resource,
                index,
                count: candidates.len(),
            })?;

        // A resource being expanded needs itself again
        if let Some(start) = path.iter().position(|r| *r == resource) {
            let mut cycle = path[start..].to_vec();
            cycle.push(resource);
            return Err(ResolveError::Cycle { path: cycle });
        }

        debug!(%resource, needed, %recipe, "recipe chosen");
        ledger.set(resource, 0.0);

        for side in &recipe.side_outputs {
            ledger.add(side.resource, side.amount * needed);
        }

        path.push(resource);
        for input in &recipe.inputs {
            ledger.add(input.resource, -input.amount * needed);
            self.satisfy(input.resource, ledger, chooser, path)?;
        }
        path.pop();

        Ok(())
    }
}
