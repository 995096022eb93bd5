//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Containers keep their id while flipping between clean and dirty; ingredients
/// keep their normalized name while stock moves.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
