//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. Recipe
/// lines, per-ingredient requirements and shortfall reports are values: two
/// `Hops × 1.0` lines are interchangeable, while two containers with the same
/// state are still distinct containers (see [`crate::Entity`]).
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct Requirement {
///     ingredient: String,
///     quantity: f64,
/// }
///
/// impl ValueObject for Requirement {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
