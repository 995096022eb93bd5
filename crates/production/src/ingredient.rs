use serde::{Deserialize, Serialize};

use brewery_core::{DomainError, DomainResult, Entity, NameKey, ensure_quantity};

/// Named stock quantity. The quantity is never negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    key: NameKey,
    name: String,
    quantity: f64,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, quantity: f64) -> DomainResult<Self> {
        let name = name.into();
        let key = NameKey::new(&name);
        if key.is_empty() {
            return Err(DomainError::validation("ingredient name cannot be empty"));
        }
        Ok(Self {
            key,
            name,
            quantity: ensure_quantity(quantity)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn set_quantity(&mut self, quantity: f64) -> DomainResult<()> {
        self.quantity = ensure_quantity(quantity)?;
        Ok(())
    }

    pub fn add_quantity(&mut self, amount: f64) -> DomainResult<()> {
        let amount = ensure_quantity(amount)?;
        self.quantity = ensure_quantity(self.quantity + amount)?;
        Ok(())
    }

    /// Deduct `amount` if enough stock exists.
    ///
    /// Returns `Ok(false)` without touching the stock when `amount` exceeds it;
    /// there is no partial deduction.
    pub fn use_quantity(&mut self, amount: f64) -> DomainResult<bool> {
        let amount = ensure_quantity(amount)?;
        if amount <= self.quantity {
            self.quantity -= amount;
            return Ok(true);
        }
        Ok(false)
    }
}

impl Entity for Ingredient {
    type Id = NameKey;

    fn id(&self) -> &Self::Id {
        &self.key
    }
}

impl core::fmt::Display for Ingredient {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.name, self.quantity)
    }
}
