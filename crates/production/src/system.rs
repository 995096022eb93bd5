//! Production orchestration.
//!
//! A production attempt walks `Requested → ContainerCheck → FeasibilityCheck →
//! Consuming → Recorded`. The first three steps run in [`Aggregate::handle`]
//! and only read state; consuming and recording happen in [`Aggregate::apply`]
//! once every check has passed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use brewery_core::{
    Aggregate, AggregateId, AggregateRoot, BatchId, DomainError, DomainResult, NameKey, Shortfall,
    ensure_quantity,
};
use brewery_events::{Event, execute};

use crate::batch::Batch;
use crate::container::ContainerId;
use crate::inventory::Inventory;
use crate::recipe::{Recipe, RecipeLibrary, Requirement};

/// Command: StockIngredient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockIngredient {
    pub name: String,
    pub quantity: f64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RegisterRecipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRecipe {
    pub recipe: Recipe,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ProduceBatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProduceBatch {
    pub batch_id: BatchId,
    pub recipe_name: String,
    pub batch_size: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Command: CleanContainers (the whole pool).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanContainers {
    pub occurred_at: DateTime<Utc>,
}

/// Command: CleanContainer (a single container).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanContainer {
    pub container_id: ContainerId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProductionCommand {
    StockIngredient(StockIngredient),
    RegisterRecipe(RegisterRecipe),
    ProduceBatch(ProduceBatch),
    CleanContainers(CleanContainers),
    CleanContainer(CleanContainer),
}

/// Event: IngredientStocked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientStocked {
    pub name: String,
    pub quantity: f64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: RecipeRegistered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeRegistered {
    pub recipe: Recipe,
    pub occurred_at: DateTime<Utc>,
}

/// Event: BatchProduced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchProduced {
    pub batch_id: BatchId,
    pub recipe_name: String,
    pub batch_size: u32,
    pub container_id: ContainerId,
    pub consumed: Vec<Requirement>,
    pub occurred_at: DateTime<Utc>,
}

impl BatchProduced {
    pub fn batch(&self) -> Batch {
        Batch::new(self.batch_id, self.recipe_name.clone(), self.batch_size, self.occurred_at)
    }
}

/// Event: ContainersCleaned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainersCleaned {
    pub occurred_at: DateTime<Utc>,
}

/// Event: ContainerCleaned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerCleaned {
    pub container_id: ContainerId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProductionEvent {
    IngredientStocked(IngredientStocked),
    RecipeRegistered(RecipeRegistered),
    BatchProduced(BatchProduced),
    ContainersCleaned(ContainersCleaned),
    ContainerCleaned(ContainerCleaned),
}

impl ProductionEvent {
    /// The finished batch, for `BatchProduced` events.
    pub fn produced_batch(&self) -> Option<Batch> {
        match self {
            ProductionEvent::BatchProduced(e) => Some(e.batch()),
            _ => None,
        }
    }
}

impl Event for ProductionEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ProductionEvent::IngredientStocked(_) => "production.ingredient.stocked",
            ProductionEvent::RecipeRegistered(_) => "production.recipe.registered",
            ProductionEvent::BatchProduced(_) => "production.batch.produced",
            ProductionEvent::ContainersCleaned(_) => "production.containers.cleaned",
            ProductionEvent::ContainerCleaned(_) => "production.container.cleaned",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            ProductionEvent::IngredientStocked(e) => e.occurred_at,
            ProductionEvent::RecipeRegistered(e) => e.occurred_at,
            ProductionEvent::BatchProduced(e) => e.occurred_at,
            ProductionEvent::ContainersCleaned(e) => e.occurred_at,
            ProductionEvent::ContainerCleaned(e) => e.occurred_at,
        }
    }
}

/// Aggregate root: one production site (inventory + recipe library).
#[derive(Debug, Clone)]
pub struct ProductionSystem {
    id: AggregateId,
    inventory: Inventory,
    recipes: RecipeLibrary,
    version: u64,
}

impl Default for ProductionSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductionSystem {
    /// Empty site with the default container pool.
    pub fn new() -> Self {
        Self::with_inventory(Inventory::new())
    }

    pub fn with_inventory(inventory: Inventory) -> Self {
        Self {
            id: AggregateId::new(),
            inventory,
            recipes: RecipeLibrary::new(),
            version: 0,
        }
    }

    pub fn id_typed(&self) -> AggregateId {
        self.id
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn recipe_library(&self) -> &RecipeLibrary {
        &self.recipes
    }

    pub fn get_recipe(&self, name: &str) -> Option<Recipe> {
        self.recipes.get_recipe(name).cloned()
    }

    pub fn recipes(&self) -> Vec<Recipe> {
        self.recipes.recipes()
    }

    pub fn stock_ingredient(&mut self, name: &str, quantity: f64) -> DomainResult<()> {
        let cmd = ProductionCommand::StockIngredient(StockIngredient {
            name: name.to_string(),
            quantity,
            occurred_at: Utc::now(),
        });
        execute(self, &cmd)?;
        Ok(())
    }

    pub fn add_recipe(&mut self, recipe: Recipe) -> DomainResult<()> {
        let cmd = ProductionCommand::RegisterRecipe(RegisterRecipe {
            recipe,
            occurred_at: Utc::now(),
        });
        execute(self, &cmd)?;
        Ok(())
    }

    /// Produce `batch_size` bottles of the named recipe.
    ///
    /// On success one ingredient deduction, one container marked dirty and one
    /// batch record happen together; on failure none of them do.
    pub fn produce_batch(&mut self, recipe_name: &str, batch_size: u32) -> DomainResult<Batch> {
        let cmd = ProductionCommand::ProduceBatch(ProduceBatch {
            batch_id: BatchId::new(),
            recipe_name: recipe_name.to_string(),
            batch_size,
            occurred_at: Utc::now(),
        });
        execute(self, &cmd)?
            .iter()
            .find_map(ProductionEvent::produced_batch)
            .ok_or_else(|| DomainError::validation("production emitted no batch"))
    }

    /// Read-only feasibility report for `batch_size` bottles of `recipe`.
    pub fn shortfalls(&self, recipe: &Recipe, batch_size: u32) -> Vec<Shortfall> {
        self.inventory.shortfalls(&recipe.requirements(batch_size))
    }

    /// Whether current stock covers `batch_size` bottles of `recipe`.
    pub fn can_produce_batch(&self, recipe: &Recipe, batch_size: u32) -> bool {
        self.shortfalls(recipe, batch_size).is_empty()
    }

    /// Clean every container in the pool.
    pub fn clean_containers(&mut self) -> DomainResult<()> {
        let cmd = ProductionCommand::CleanContainers(CleanContainers {
            occurred_at: Utc::now(),
        });
        execute(self, &cmd)?;
        Ok(())
    }

    pub fn clean_container(&mut self, container_id: &ContainerId) -> DomainResult<()> {
        let cmd = ProductionCommand::CleanContainer(CleanContainer {
            container_id: container_id.clone(),
            occurred_at: Utc::now(),
        });
        execute(self, &cmd)?;
        Ok(())
    }
}

impl AggregateRoot for ProductionSystem {
    type Id = AggregateId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl Aggregate for ProductionSystem {
    type Command = ProductionCommand;
    type Event = ProductionEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            ProductionEvent::IngredientStocked(e) => {
                let stocked = self.inventory.add_ingredient(&e.name, e.quantity);
                debug_assert!(stocked.is_ok(), "quantity validated in handle");
            }
            ProductionEvent::RecipeRegistered(e) => {
                self.recipes.replace_recipe(e.recipe.clone());
            }
            ProductionEvent::BatchProduced(e) => {
                let consumed = self.inventory.consume(&e.consumed);
                let marked = self.inventory.mark_container_as_dirty(&e.container_id);
                debug_assert!(consumed.is_ok(), "stock checked in handle");
                debug_assert!(marked.is_ok(), "container picked in handle");
                self.inventory.add_finished_batch(e.batch());
            }
            ProductionEvent::ContainersCleaned(_) => {
                self.inventory.mark_container_as_clean();
            }
            ProductionEvent::ContainerCleaned(e) => {
                let cleaned = self.inventory.clean_container_by_id(&e.container_id);
                debug_assert!(cleaned.is_ok(), "container checked in handle");
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            ProductionCommand::StockIngredient(cmd) => self.handle_stock(cmd),
            ProductionCommand::RegisterRecipe(cmd) => self.handle_register(cmd),
            ProductionCommand::ProduceBatch(cmd) => self.handle_produce(cmd),
            ProductionCommand::CleanContainers(cmd) => {
                Ok(vec![ProductionEvent::ContainersCleaned(ContainersCleaned {
                    occurred_at: cmd.occurred_at,
                })])
            }
            ProductionCommand::CleanContainer(cmd) => self.handle_clean_one(cmd),
        }
    }
}

impl ProductionSystem {
    fn handle_stock(&self, cmd: &StockIngredient) -> DomainResult<Vec<ProductionEvent>> {
        if NameKey::new(&cmd.name).is_empty() {
            return Err(DomainError::validation("ingredient name cannot be empty"));
        }
        let quantity = ensure_quantity(cmd.quantity)?;
        ensure_quantity(self.inventory.get_ingredient_quantity(&cmd.name) + quantity)?;

        Ok(vec![ProductionEvent::IngredientStocked(IngredientStocked {
            name: cmd.name.clone(),
            quantity,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_register(&self, cmd: &RegisterRecipe) -> DomainResult<Vec<ProductionEvent>> {
        cmd.recipe.validate()?;
        if self.recipes.contains(cmd.recipe.name()) {
            return Err(DomainError::duplicate_recipe(cmd.recipe.name()));
        }

        Ok(vec![ProductionEvent::RecipeRegistered(RecipeRegistered {
            recipe: cmd.recipe.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_produce(&self, cmd: &ProduceBatch) -> DomainResult<Vec<ProductionEvent>> {
        if cmd.batch_size == 0 {
            return Err(DomainError::validation("batch size must be positive"));
        }

        let recipe = self
            .recipes
            .get_recipe(&cmd.recipe_name)
            .ok_or_else(|| DomainError::recipe_not_found(&cmd.recipe_name))?;

        let container = self
            .inventory
            .get_clean_container()
            .ok_or(DomainError::NoCleanContainer)?;

        let requirements = recipe.requirements(cmd.batch_size);
        for req in &requirements {
            ensure_quantity(req.quantity)?;
        }
        let shortfalls = self.inventory.shortfalls(&requirements);
        if !shortfalls.is_empty() {
            return Err(DomainError::InsufficientIngredients(shortfalls));
        }

        Ok(vec![ProductionEvent::BatchProduced(BatchProduced {
            batch_id: cmd.batch_id,
            recipe_name: recipe.name().to_string(),
            batch_size: cmd.batch_size,
            container_id: container.id_typed().clone(),
            consumed: requirements,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_clean_one(&self, cmd: &CleanContainer) -> DomainResult<Vec<ProductionEvent>> {
        if !self.inventory.has_container(&cmd.container_id) {
            return Err(DomainError::container_not_found(cmd.container_id.as_str()));
        }

        Ok(vec![ProductionEvent::ContainerCleaned(ContainerCleaned {
            container_id: cmd.container_id.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }
}
