//! Thread-safe production service.
//!
//! Every command runs under one exclusive lock around the whole production
//! site: container selection, feasibility check, consumption, dirty-marking and
//! batch append for a `produce_batch` call happen with no other caller in
//! between. Accepted events are appended to an in-memory journal.

use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use tracing::{debug, info, warn};

use brewery_core::{AggregateRoot, BatchId, DomainError, Shortfall};
use brewery_events::{Event, execute};
use brewery_production::{
    Batch, CleanContainer, CleanContainers, Container, ContainerId, Ingredient, Inventory,
    ProduceBatch, ProductionCommand, ProductionEvent, ProductionSystem, Recipe, RegisterRecipe,
    StockIngredient,
};

use crate::config::RuntimeConfig;
use crate::error::{ServiceError, ServiceResult};

#[derive(Debug)]
struct SiteState {
    system: ProductionSystem,
    journal: Vec<ProductionEvent>,
}

/// Shared handle to one production site.
#[derive(Debug)]
pub struct ProductionService {
    state: Mutex<SiteState>,
}

impl Default for ProductionService {
    fn default() -> Self {
        Self::from_system(ProductionSystem::new())
    }
}

impl ProductionService {
    pub fn new(config: &RuntimeConfig) -> ServiceResult<Self> {
        let inventory =
            Inventory::with_container_pool(&config.container_prefix, config.container_count)?;
        info!(
            containers = config.container_count,
            prefix = %config.container_prefix,
            "production site initialized"
        );
        Ok(Self::from_system(ProductionSystem::with_inventory(inventory)))
    }

    pub fn from_system(system: ProductionSystem) -> Self {
        Self {
            state: Mutex::new(SiteState {
                system,
                journal: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> ServiceResult<MutexGuard<'_, SiteState>> {
        self.state.lock().map_err(|_| ServiceError::Poisoned)
    }

    /// Run one command under the lock and journal the resulting events.
    fn dispatch(&self, command: ProductionCommand) -> ServiceResult<Vec<ProductionEvent>> {
        let mut state = self.lock()?;
        let events = execute(&mut state.system, &command)?;
        for event in &events {
            debug!(
                event_type = event.event_type(),
                version = state.system.version(),
                "event applied"
            );
        }
        state.journal.extend(events.iter().cloned());
        Ok(events)
    }

    pub fn stock_ingredient(&self, name: &str, quantity: f64) -> ServiceResult<()> {
        let result = self.dispatch(ProductionCommand::StockIngredient(StockIngredient {
            name: name.to_string(),
            quantity,
            occurred_at: Utc::now(),
        }));
        match &result {
            Ok(_) => info!(ingredient = name, quantity, "ingredient stocked"),
            Err(err) => warn!(ingredient = name, quantity, error = %err, "stock rejected"),
        }
        result.map(|_| ())
    }

    pub fn add_recipe(&self, recipe: Recipe) -> ServiceResult<()> {
        let name = recipe.name().to_string();
        let result = self.dispatch(ProductionCommand::RegisterRecipe(RegisterRecipe {
            recipe,
            occurred_at: Utc::now(),
        }));
        match &result {
            Ok(_) => info!(recipe = %name, "recipe registered"),
            Err(err) => warn!(recipe = %name, error = %err, "recipe rejected"),
        }
        result.map(|_| ())
    }

    /// Produce `batch_size` bottles of the named recipe.
    pub fn produce_batch(&self, recipe_name: &str, batch_size: u32) -> ServiceResult<Batch> {
        let result = self.dispatch(ProductionCommand::ProduceBatch(ProduceBatch {
            batch_id: BatchId::new(),
            recipe_name: recipe_name.to_string(),
            batch_size,
            occurred_at: Utc::now(),
        }));

        let events = match result {
            Ok(events) => events,
            Err(err) => {
                log_production_failure(recipe_name, batch_size, &err);
                return Err(err);
            }
        };

        let produced = events.iter().find_map(|event| match event {
            ProductionEvent::BatchProduced(e) => Some(e),
            _ => None,
        });
        match produced {
            Some(e) => {
                info!(
                    recipe = %e.recipe_name,
                    batch_size = e.batch_size,
                    batch_id = %e.batch_id,
                    container = %e.container_id,
                    "batch produced; container is now dirty"
                );
                Ok(e.batch())
            }
            None => Err(DomainError::validation("production emitted no batch").into()),
        }
    }

    /// Read-only feasibility report for a registered recipe.
    pub fn shortfalls(&self, recipe_name: &str, batch_size: u32) -> ServiceResult<Vec<Shortfall>> {
        let state = self.lock()?;
        let recipe = state
            .system
            .recipe_library()
            .get_recipe(recipe_name)
            .ok_or_else(|| DomainError::recipe_not_found(recipe_name))?;
        Ok(state.system.shortfalls(recipe, batch_size))
    }

    pub fn can_produce_batch(&self, recipe_name: &str, batch_size: u32) -> ServiceResult<bool> {
        Ok(self.shortfalls(recipe_name, batch_size)?.is_empty())
    }

    /// Clean every container in the pool.
    pub fn clean_containers(&self) -> ServiceResult<()> {
        self.dispatch(ProductionCommand::CleanContainers(CleanContainers {
            occurred_at: Utc::now(),
        }))?;
        info!("all containers cleaned");
        Ok(())
    }

    pub fn clean_container(&self, container_id: &ContainerId) -> ServiceResult<()> {
        let result = self.dispatch(ProductionCommand::CleanContainer(CleanContainer {
            container_id: container_id.clone(),
            occurred_at: Utc::now(),
        }));
        match &result {
            Ok(_) => info!(container = %container_id, "container cleaned"),
            Err(err) => warn!(container = %container_id, error = %err, "clean rejected"),
        }
        result.map(|_| ())
    }

    // --- queries (owned snapshots) -----------------------------------------

    pub fn ingredients(&self) -> ServiceResult<Vec<Ingredient>> {
        Ok(self.lock()?.system.inventory().ingredients())
    }

    pub fn ingredient_quantity(&self, name: &str) -> ServiceResult<f64> {
        Ok(self.lock()?.system.inventory().get_ingredient_quantity(name))
    }

    pub fn finished_batches(&self) -> ServiceResult<Vec<Batch>> {
        Ok(self.lock()?.system.inventory().finished_batches())
    }

    pub fn containers(&self) -> ServiceResult<Vec<Container>> {
        Ok(self.lock()?.system.inventory().containers())
    }

    pub fn clean_container_list(&self) -> ServiceResult<Vec<Container>> {
        Ok(self.lock()?.system.inventory().clean_containers())
    }

    pub fn recipes(&self) -> ServiceResult<Vec<Recipe>> {
        Ok(self.lock()?.system.recipes())
    }

    pub fn recipe(&self, name: &str) -> ServiceResult<Option<Recipe>> {
        Ok(self.lock()?.system.get_recipe(name))
    }

    /// Every accepted event, oldest first.
    pub fn journal(&self) -> ServiceResult<Vec<ProductionEvent>> {
        Ok(self.lock()?.journal.clone())
    }

    pub fn version(&self) -> ServiceResult<u64> {
        Ok(self.lock()?.system.version())
    }
}

fn log_production_failure(recipe_name: &str, batch_size: u32, err: &ServiceError) {
    match err {
        ServiceError::Domain(DomainError::InsufficientIngredients(shortfalls)) => {
            for s in shortfalls {
                warn!(
                    recipe = recipe_name,
                    batch_size,
                    ingredient = %s.ingredient,
                    required = s.required,
                    available = s.available,
                    "insufficient ingredient"
                );
            }
        }
        _ => warn!(recipe = recipe_name, batch_size, error = %err, "batch production failed"),
    }
}
