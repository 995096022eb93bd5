use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use brewery_core::{DomainError, DomainResult, NameKey, ValueObject, ensure_quantity};

/// One recipe line: an ingredient and the quantity needed per bottle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeLine {
    pub ingredient: String,
    pub per_unit: f64,
}

impl ValueObject for RecipeLine {}

/// Total quantity of one ingredient needed for a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    pub ingredient: String,
    pub quantity: f64,
}

impl ValueObject for Requirement {}

/// Named formula scaled per bottle.
///
/// Lines keep insertion order. Repeated ingredient names are stored as separate
/// lines; [`Recipe::requirements`] sums them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    name: String,
    bottle_count: u32,
    lines: Vec<RecipeLine>,
}

impl Recipe {
    pub fn new(name: impl Into<String>, bottle_count: u32) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("recipe name cannot be empty"));
        }
        Ok(Self {
            name,
            bottle_count,
            lines: Vec::new(),
        })
    }

    /// Append a line.
    pub fn add_ingredient(&mut self, ingredient: impl Into<String>, per_unit: f64) -> DomainResult<()> {
        let ingredient = ingredient.into();
        if ingredient.trim().is_empty() {
            return Err(DomainError::validation("ingredient name cannot be empty"));
        }
        let per_unit = ensure_quantity(per_unit)?;
        self.lines.push(RecipeLine { ingredient, per_unit });
        Ok(())
    }

    /// Chaining form of [`Recipe::add_ingredient`].
    pub fn with_ingredient(mut self, ingredient: impl Into<String>, per_unit: f64) -> DomainResult<Self> {
        self.add_ingredient(ingredient, per_unit)?;
        Ok(self)
    }

    /// Re-check name and lines, for recipes that did not come through
    /// [`Recipe::new`] / [`Recipe::add_ingredient`] (e.g. deserialized ones).
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("recipe name cannot be empty"));
        }
        for line in &self.lines {
            if line.ingredient.trim().is_empty() {
                return Err(DomainError::validation("ingredient name cannot be empty"));
            }
            ensure_quantity(line.per_unit)?;
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> NameKey {
        NameKey::new(&self.name)
    }

    pub fn bottle_count(&self) -> u32 {
        self.bottle_count
    }

    pub fn lines(&self) -> &[RecipeLine] {
        &self.lines
    }

    /// Quantities needed for `batch_size` bottles, one entry per distinct
    /// ingredient in first-appearance order.
    pub fn requirements(&self, batch_size: u32) -> Vec<Requirement> {
        let scale = f64::from(batch_size);
        let mut out: Vec<Requirement> = Vec::with_capacity(self.lines.len());
        let mut index: HashMap<NameKey, usize> = HashMap::new();

        for line in &self.lines {
            let needed = line.per_unit * scale;
            let key = NameKey::new(&line.ingredient);
            match index.get(&key).copied() {
                Some(i) => out[i].quantity += needed,
                None => {
                    index.insert(key, out.len());
                    out.push(Requirement {
                        ingredient: line.ingredient.clone(),
                        quantity: needed,
                    });
                }
            }
        }

        out
    }
}

/// Case-insensitive, name-keyed recipe collection.
#[derive(Debug, Clone, Default)]
pub struct RecipeLibrary {
    recipes: Vec<Recipe>,
    index: HashMap<NameKey, usize>,
}

impl RecipeLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new recipe. Names are unique ignoring case.
    pub fn add_recipe(&mut self, recipe: Recipe) -> DomainResult<()> {
        let key = recipe.key();
        if self.index.contains_key(&key) {
            return Err(DomainError::duplicate_recipe(recipe.name()));
        }
        self.index.insert(key, self.recipes.len());
        self.recipes.push(recipe);
        Ok(())
    }

    /// Insert or overwrite a recipe, keeping its original position.
    ///
    /// Returns the replaced recipe, if any.
    pub fn replace_recipe(&mut self, recipe: Recipe) -> Option<Recipe> {
        let key = recipe.key();
        match self.index.get(&key).copied() {
            Some(i) => Some(std::mem::replace(&mut self.recipes[i], recipe)),
            None => {
                self.index.insert(key, self.recipes.len());
                self.recipes.push(recipe);
                None
            }
        }
    }

    pub fn get_recipe(&self, name: &str) -> Option<&Recipe> {
        self.index
            .get(&NameKey::new(name))
            .map(|&i| &self.recipes[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(&NameKey::new(name))
    }

    /// Snapshot of all recipes in insertion order.
    pub fn recipes(&self) -> Vec<Recipe> {
        self.recipes.clone()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lager() -> Recipe {
        Recipe::new("Lager", 8)
            .unwrap()
            .with_ingredient("Water", 5.0)
            .unwrap()
            .with_ingredient("Hops", 1.0)
            .unwrap()
    }

    #[test]
    fn recipe_rejects_empty_name() {
        match Recipe::new("  ", 4).unwrap_err() {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error for empty recipe name"),
        }
    }

    #[test]
    fn add_ingredient_rejects_negative_quantity() {
        let mut recipe = Recipe::new("Stout", 6).unwrap();
        assert_eq!(
            recipe.add_ingredient("Malt", -2.0).unwrap_err(),
            DomainError::InvalidQuantity(-2.0)
        );
        assert!(recipe.lines().is_empty());
    }

    #[test]
    fn validate_catches_lines_built_without_checks() {
        let recipe = Recipe {
            name: "Sour".to_string(),
            bottle_count: 2,
            lines: vec![RecipeLine { ingredient: "Malt".to_string(), per_unit: -1.0 }],
        };
        assert_eq!(recipe.validate().unwrap_err(), DomainError::InvalidQuantity(-1.0));

        let unnamed = Recipe { name: " ".to_string(), bottle_count: 1, lines: Vec::new() };
        match unnamed.validate().unwrap_err() {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error for empty recipe name"),
        }

        assert!(lager().validate().is_ok());
    }

    #[test]
    fn register_rejects_recipe_with_negative_line() {
        let mut site = crate::system::ProductionSystem::new();
        let recipe = Recipe {
            name: "Sour".to_string(),
            bottle_count: 2,
            lines: vec![RecipeLine { ingredient: "Malt".to_string(), per_unit: -1.0 }],
        };

        assert_eq!(site.add_recipe(recipe).unwrap_err(), DomainError::InvalidQuantity(-1.0));
        assert!(site.get_recipe("Sour").is_none());
    }

    #[test]
    fn requirements_scale_linearly() {
        let reqs = lager().requirements(8);
        assert_eq!(
            reqs,
            vec![
                Requirement { ingredient: "Water".to_string(), quantity: 40.0 },
                Requirement { ingredient: "Hops".to_string(), quantity: 8.0 },
            ]
        );
    }

    #[test]
    fn duplicate_lines_are_kept_but_summed_in_requirements() {
        let recipe = Recipe::new("Double Hop", 1)
            .unwrap()
            .with_ingredient("Hops", 1.0)
            .unwrap()
            .with_ingredient("Water", 2.0)
            .unwrap()
            .with_ingredient("hops", 0.5)
            .unwrap();

        assert_eq!(recipe.lines().len(), 3);

        let reqs = recipe.requirements(4);
        assert_eq!(reqs.len(), 2);
        assert_eq!(reqs[0].ingredient, "Hops");
        assert_eq!(reqs[0].quantity, 6.0);
        assert_eq!(reqs[1].quantity, 8.0);
    }

    #[test]
    fn get_recipe_is_case_insensitive() {
        let mut library = RecipeLibrary::new();
        library.add_recipe(lager()).unwrap();

        let found = library.get_recipe("lAgEr").unwrap();
        assert_eq!(found.name(), "Lager");
        assert_eq!(found.bottle_count(), 8);
    }

    #[test]
    fn get_recipe_unknown_returns_none() {
        let library = RecipeLibrary::new();
        assert!(library.get_recipe("nonexistent").is_none());
    }

    #[test]
    fn add_recipe_rejects_case_insensitive_duplicate() {
        let mut library = RecipeLibrary::new();
        library.add_recipe(lager()).unwrap();

        let err = library.add_recipe(Recipe::new("LAGER", 12).unwrap()).unwrap_err();
        assert_eq!(err, DomainError::DuplicateRecipe("LAGER".to_string()));
        assert_eq!(library.len(), 1);
        assert_eq!(library.get_recipe("lager").unwrap().bottle_count(), 8);
    }

    #[test]
    fn replace_recipe_overwrites_in_place() {
        let mut library = RecipeLibrary::new();
        library.add_recipe(lager()).unwrap();
        library.add_recipe(Recipe::new("Ale", 4).unwrap()).unwrap();

        let previous = library.replace_recipe(Recipe::new("lager", 20).unwrap());
        assert_eq!(previous.unwrap().bottle_count(), 8);

        let names: Vec<String> = library.recipes().iter().map(|r| r.name().to_string()).collect();
        assert_eq!(names, vec!["lager", "Ale"]);
        assert_eq!(library.get_recipe("LAGER").unwrap().bottle_count(), 20);
    }

    #[test]
    fn recipes_snapshot_is_detached() {
        let mut library = RecipeLibrary::new();
        library.add_recipe(lager()).unwrap();

        let mut snapshot = library.recipes();
        snapshot[0].add_ingredient("Yeast", 0.1).unwrap();

        assert_eq!(library.get_recipe("Lager").unwrap().lines().len(), 2);
    }
}
