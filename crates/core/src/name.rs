//! Case-insensitive names.
//!
//! Ingredients, recipes and containers are all looked up by name regardless of
//! case: `"Water"` and `"water"` are the same ingredient.

use serde::{Deserialize, Serialize};

/// Normalized (lower-cased) lookup key for a display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameKey(String);

impl NameKey {
    pub fn new(name: &str) -> Self {
        Self(name.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for NameKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl core::fmt::Display for NameKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Case-insensitive name equality.
pub fn names_match(a: &str, b: &str) -> bool {
    NameKey::new(a) == NameKey::new(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_ignore_case() {
        assert_eq!(NameKey::new("Water"), NameKey::new("wATER"));
        assert!(names_match("Lager", "LAGER"));
        assert!(!names_match("Lager", "Ale"));
    }

    #[test]
    fn keys_ignore_surrounding_whitespace() {
        assert_eq!(NameKey::new("  Hops "), NameKey::new("hops"));
        assert!(NameKey::new("   ").is_empty());
    }
}
