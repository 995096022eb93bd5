use std::collections::HashMap;

use brewery_core::{DomainError, DomainResult, NameKey, Shortfall, ensure_quantity, names_match};

use crate::batch::Batch;
use crate::container::{Container, ContainerId, container_pool};
use crate::ingredient::Ingredient;
use crate::recipe::{Recipe, Requirement};

/// Containers in a freshly created inventory.
pub const DEFAULT_CONTAINER_COUNT: usize = 3;

/// Prefix for container ids (`C1`, `C2`, ...).
pub const DEFAULT_CONTAINER_PREFIX: &str = "C";

/// Owner of ingredient stock, the container pool and the finished-batch log.
///
/// All reads hand out owned snapshots; stock and container state change only
/// through the methods below.
#[derive(Debug, Clone)]
pub struct Inventory {
    ingredients: Vec<Ingredient>,
    index: HashMap<NameKey, usize>,
    containers: Vec<Container>,
    batches: Vec<Batch>,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

impl Inventory {
    /// Empty stock with the default pool of three clean containers.
    pub fn new() -> Self {
        Self::from_pool(container_pool(DEFAULT_CONTAINER_PREFIX, DEFAULT_CONTAINER_COUNT))
    }

    /// Empty stock with `count` clean containers named `{prefix}1..`.
    pub fn with_container_pool(prefix: &str, count: usize) -> DomainResult<Self> {
        if count == 0 {
            return Err(DomainError::validation("container pool cannot be empty"));
        }
        if prefix.trim().is_empty() {
            return Err(DomainError::validation("container prefix cannot be empty"));
        }
        Ok(Self::from_pool(container_pool(prefix, count)))
    }

    fn from_pool(containers: Vec<Container>) -> Self {
        Self {
            ingredients: Vec::new(),
            index: HashMap::new(),
            containers,
            batches: Vec::new(),
        }
    }

    // --- ingredients -------------------------------------------------------

    /// Add stock, creating the ingredient on first use. Names match ignoring case.
    pub fn add_ingredient(&mut self, name: &str, quantity: f64) -> DomainResult<()> {
        match self.index.get(&NameKey::new(name)).copied() {
            Some(i) => self.ingredients[i].add_quantity(quantity),
            None => {
                let ingredient = Ingredient::new(name, quantity)?;
                self.index.insert(NameKey::new(name), self.ingredients.len());
                self.ingredients.push(ingredient);
                Ok(())
            }
        }
    }

    /// Available stock; unknown ingredients count as zero.
    pub fn get_ingredient_quantity(&self, name: &str) -> f64 {
        self.ingredient_ref(name).map_or(0.0, Ingredient::quantity)
    }

    pub fn ingredient(&self, name: &str) -> Option<Ingredient> {
        self.ingredient_ref(name).cloned()
    }

    fn ingredient_ref(&self, name: &str) -> Option<&Ingredient> {
        self.index
            .get(&NameKey::new(name))
            .map(|&i| &self.ingredients[i])
    }

    /// Every requirement the current stock cannot cover.
    pub fn shortfalls(&self, requirements: &[Requirement]) -> Vec<Shortfall> {
        requirements
            .iter()
            .filter_map(|req| {
                let available = self.get_ingredient_quantity(&req.ingredient);
                (available < req.quantity)
                    .then(|| Shortfall::new(req.ingredient.clone(), req.quantity, available))
            })
            .collect()
    }

    /// Deduct stock for `batch_size` bottles of `recipe`, or nothing at all.
    pub fn use_ingredients(&mut self, recipe: &Recipe, batch_size: u32) -> DomainResult<()> {
        self.consume(&recipe.requirements(batch_size))
    }

    /// Two-phase deduction: verify every requirement, then deduct all of them.
    ///
    /// Any shortfall rejects the whole request and leaves stock untouched.
    pub fn consume(&mut self, requirements: &[Requirement]) -> DomainResult<()> {
        for req in requirements {
            ensure_quantity(req.quantity)?;
        }

        let shortfalls = self.shortfalls(requirements);
        if !shortfalls.is_empty() {
            return Err(DomainError::InsufficientIngredients(shortfalls));
        }

        for req in requirements {
            if let Some(i) = self.index.get(&NameKey::new(&req.ingredient)).copied() {
                let used = self.ingredients[i].use_quantity(req.quantity)?;
                debug_assert!(used, "stock for {} checked before deduction", req.ingredient);
            }
        }
        Ok(())
    }

    /// Snapshot of all ingredients in insertion order.
    pub fn ingredients(&self) -> Vec<Ingredient> {
        self.ingredients.clone()
    }

    // --- containers --------------------------------------------------------

    /// First clean container in pool order.
    pub fn get_clean_container(&self) -> Option<Container> {
        self.containers.iter().find(|c| c.is_clean()).cloned()
    }

    pub fn mark_container_as_dirty(&mut self, id: &ContainerId) -> DomainResult<()> {
        self.container_mut(id)?.mark_dirty();
        Ok(())
    }

    /// Clean the whole pool.
    pub fn mark_container_as_clean(&mut self) {
        for container in &mut self.containers {
            container.mark_clean();
        }
    }

    /// Clean a single container.
    pub fn clean_container_by_id(&mut self, id: &ContainerId) -> DomainResult<()> {
        self.container_mut(id)?.mark_clean();
        Ok(())
    }

    pub fn has_container(&self, id: &ContainerId) -> bool {
        self.containers
            .iter()
            .any(|c| names_match(c.id_typed().as_str(), id.as_str()))
    }

    fn container_mut(&mut self, id: &ContainerId) -> DomainResult<&mut Container> {
        self.containers
            .iter_mut()
            .find(|c| names_match(c.id_typed().as_str(), id.as_str()))
            .ok_or_else(|| DomainError::container_not_found(id.as_str()))
    }

    pub fn containers(&self) -> Vec<Container> {
        self.containers.clone()
    }

    pub fn clean_containers(&self) -> Vec<Container> {
        self.containers.iter().filter(|c| c.is_clean()).cloned().collect()
    }

    // --- batches -----------------------------------------------------------

    pub fn add_finished_batch(&mut self, batch: Batch) {
        self.batches.push(batch);
    }

    pub fn finished_batches(&self) -> Vec<Batch> {
        self.batches.clone()
    }
}
