//! `brewery-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod id;
pub mod name;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot};
pub use entity::Entity;
pub use error::{DomainError, DomainResult, Shortfall, ensure_quantity};
pub use id::{AggregateId, BatchId};
pub use name::{NameKey, names_match};
pub use value_object::ValueObject;
