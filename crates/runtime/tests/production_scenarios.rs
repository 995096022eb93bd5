//! End-to-end production scenarios against the shared service.

use std::sync::Arc;
use std::thread;

use brewery_core::{DomainError, Entity, Shortfall};
use brewery_production::Recipe;
use brewery_runtime::{ProductionService, RuntimeConfig, ServiceError};
use proptest::prelude::*;

fn lager() -> Recipe {
    Recipe::new("Lager", 8)
        .unwrap()
        .with_ingredient("Water", 5.0)
        .unwrap()
        .with_ingredient("Hops", 1.0)
        .unwrap()
}

/// Water=50, Hops=8, three clean containers, "Lager" registered.
fn lager_site() -> ProductionService {
    brewery_observability::init();

    let service = ProductionService::new(&RuntimeConfig::default()).unwrap();
    service.stock_ingredient("Water", 50.0).unwrap();
    service.stock_ingredient("Hops", 8.0).unwrap();
    service.add_recipe(lager()).unwrap();
    service
}

fn dirty_count(service: &ProductionService) -> usize {
    service
        .containers()
        .unwrap()
        .iter()
        .filter(|c| c.is_dirty())
        .count()
}

#[test]
fn lager_batch_of_eight_succeeds() {
    let service = lager_site();

    let batch = service.produce_batch("Lager", 8).unwrap();
    assert_eq!(batch.recipe_name(), "Lager");
    assert_eq!(batch.size(), 8);

    assert_eq!(service.ingredient_quantity("Water").unwrap(), 10.0);
    assert_eq!(service.ingredient_quantity("Hops").unwrap(), 0.0);
    assert_eq!(dirty_count(&service), 1);
    assert_eq!(service.finished_batches().unwrap(), vec![batch]);
}

#[test]
fn lager_batch_of_ten_is_short_on_hops() {
    let service = lager_site();
    let version = service.version().unwrap();

    let err = service.produce_batch("Lager", 10).unwrap_err();
    assert_eq!(
        err,
        ServiceError::Domain(DomainError::InsufficientIngredients(vec![Shortfall::new(
            "Hops", 10.0, 8.0
        )]))
    );

    assert_eq!(service.ingredient_quantity("Water").unwrap(), 50.0);
    assert_eq!(service.ingredient_quantity("Hops").unwrap(), 8.0);
    assert_eq!(dirty_count(&service), 0);
    assert!(service.finished_batches().unwrap().is_empty());
    assert_eq!(service.version().unwrap(), version);
}

#[test]
fn all_containers_dirty_blocks_production() {
    let service = lager_site();
    for _ in 0..3 {
        service.produce_batch("Lager", 1).unwrap();
    }
    assert!(service.clean_container_list().unwrap().is_empty());

    let err = service.produce_batch("Lager", 1).unwrap_err();
    assert_eq!(err, ServiceError::Domain(DomainError::NoCleanContainer));
    assert_eq!(service.ingredient_quantity("Water").unwrap(), 35.0);

    service.clean_containers().unwrap();
    assert_eq!(service.clean_container_list().unwrap().len(), 3);
    service.produce_batch("Lager", 1).unwrap();
}

#[test]
fn unknown_recipe_is_not_found() {
    let service = lager_site();
    assert!(service.recipe("nonexistent").unwrap().is_none());
    assert_eq!(
        service.produce_batch("nonexistent", 1).unwrap_err(),
        ServiceError::Domain(DomainError::RecipeNotFound("nonexistent".to_string()))
    );
}

#[test]
fn stock_additions_merge_case_insensitively() {
    let service = lager_site();
    service.stock_ingredient("water", 3.0).unwrap();

    let ingredients = service.ingredients().unwrap();
    assert_eq!(ingredients.len(), 2);
    assert_eq!(service.ingredient_quantity("WATER").unwrap(), 53.0);
}

#[test]
fn successful_production_dirties_exactly_one_clean_container() {
    let service = lager_site();
    service.produce_batch("Lager", 1).unwrap();

    let before = service.containers().unwrap();
    service.produce_batch("Lager", 1).unwrap();
    let after = service.containers().unwrap();

    let changed: Vec<_> = before
        .iter()
        .zip(&after)
        .filter(|(b, a)| b.state() != a.state())
        .collect();
    assert_eq!(changed.len(), 1);
    let (was, now) = changed[0];
    assert!(was.is_clean());
    assert!(now.is_dirty());
    assert_eq!(now.id().as_str(), "C2");
}

#[test]
fn concurrent_producers_never_double_spend() {
    let service = Arc::new(
        ProductionService::new(&RuntimeConfig {
            container_count: 64,
            ..RuntimeConfig::default()
        })
        .unwrap(),
    );
    service.stock_ingredient("Water", 50.0).unwrap();
    service.stock_ingredient("Hops", 8.0).unwrap();
    service.add_recipe(lager()).unwrap();

    // Hops covers exactly four batches of two.
    let handles: Vec<_> = (0..16)
        .map(|_| {
            let service = Arc::clone(&service);
            thread::spawn(move || service.produce_batch("Lager", 2).is_ok())
        })
        .collect();
    let produced = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();

    assert_eq!(produced, 4);
    assert_eq!(service.finished_batches().unwrap().len(), 4);
    assert_eq!(service.ingredient_quantity("Hops").unwrap(), 0.0);
    assert_eq!(service.ingredient_quantity("Water").unwrap(), 10.0);
    assert_eq!(dirty_count(&service), 4);
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        ..ProptestConfig::default()
    })]

    /// Property: across any mix of production requests, stock never goes
    /// negative and the batch log matches the number of dirty containers
    /// (no cleaning happens in between).
    #[test]
    fn production_sequence_preserves_invariants(
        sizes in prop::collection::vec(0u32..12, 1..10)
    ) {
        let service = ProductionService::new(&RuntimeConfig {
            container_count: 16,
            ..RuntimeConfig::default()
        }).unwrap();
        service.stock_ingredient("Water", 120.0).unwrap();
        service.stock_ingredient("Hops", 20.0).unwrap();
        service.add_recipe(lager()).unwrap();

        for size in sizes {
            let before = service.ingredients().unwrap();
            if service.produce_batch("Lager", size).is_err() {
                prop_assert_eq!(service.ingredients().unwrap(), before);
            }
            for ingredient in service.ingredients().unwrap() {
                prop_assert!(ingredient.quantity() >= 0.0);
            }
        }

        prop_assert_eq!(service.finished_batches().unwrap().len(), dirty_count(&service));
    }
}
