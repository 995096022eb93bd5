//! Production domain module.
//!
//! Ingredient stock, recipes, the container pool and finished batches, plus the
//! rules deciding whether a batch can be produced. Pure deterministic domain
//! logic (no IO, no locking, no storage).

pub mod batch;
pub mod container;
pub mod ingredient;
pub mod inventory;
pub mod recipe;
pub mod system;

pub use batch::Batch;
pub use container::{Container, ContainerId, ContainerState, container_pool};
pub use ingredient::Ingredient;
pub use inventory::{DEFAULT_CONTAINER_COUNT, DEFAULT_CONTAINER_PREFIX, Inventory};
pub use recipe::{Recipe, RecipeLibrary, RecipeLine, Requirement};
pub use system::{
    BatchProduced, CleanContainer, CleanContainers, ContainerCleaned, ContainersCleaned,
    IngredientStocked, ProduceBatch, ProductionCommand, ProductionEvent, ProductionSystem,
    RecipeRegistered, RegisterRecipe, StockIngredient,
};
