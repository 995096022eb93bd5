//! Domain error model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value_object::ValueObject;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// One ingredient that cannot cover a requested batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shortfall {
    pub ingredient: String,
    pub required: f64,
    pub available: f64,
}

impl Shortfall {
    pub fn new(ingredient: impl Into<String>, required: f64, available: f64) -> Self {
        Self {
            ingredient: ingredient.into(),
            required,
            available,
        }
    }

    /// Amount still missing to cover the requirement.
    pub fn missing(&self) -> f64 {
        self.required - self.available
    }
}

impl ValueObject for Shortfall {}

impl core::fmt::Display for Shortfall {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} (required: {}, available: {})",
            self.ingredient, self.required, self.available
        )
    }
}

/// Domain-level error.
///
/// Every variant is an expected, recoverable condition. Callers fix the request
/// (restock, clean, pick another recipe) and try again.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// A value failed validation (e.g. empty name, zero batch size).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A negative or non-finite quantity reached a stock operation.
    #[error("invalid quantity: {0} (must be a non-negative number)")]
    InvalidQuantity(f64),

    /// No recipe is registered under the requested name.
    #[error("recipe '{0}' not found")]
    RecipeNotFound(String),

    /// A recipe with the same (case-insensitive) name already exists.
    #[error("recipe '{0}' already exists")]
    DuplicateRecipe(String),

    /// Every container in the pool is dirty.
    #[error("no clean containers available")]
    NoCleanContainer,

    /// The container id is not part of the pool.
    #[error("container '{0}' not found")]
    ContainerNotFound(String),

    /// One or more ingredients cannot cover the requested batch.
    #[error("insufficient ingredients: {}", format_shortfalls(.0))]
    InsufficientIngredients(Vec<Shortfall>),
}

fn format_shortfalls(shortfalls: &[Shortfall]) -> String {
    shortfalls
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn recipe_not_found(name: impl Into<String>) -> Self {
        Self::RecipeNotFound(name.into())
    }

    pub fn duplicate_recipe(name: impl Into<String>) -> Self {
        Self::DuplicateRecipe(name.into())
    }

    pub fn container_not_found(id: impl Into<String>) -> Self {
        Self::ContainerNotFound(id.into())
    }
}

/// Reject negative and non-finite quantities at the boundary.
pub fn ensure_quantity(quantity: f64) -> DomainResult<f64> {
    if quantity.is_finite() && quantity >= 0.0 {
        Ok(quantity)
    } else {
        Err(DomainError::InvalidQuantity(quantity))
    }
}
