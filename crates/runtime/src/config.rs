//! Runtime configuration.

use serde::{Deserialize, Serialize};
use tracing::warn;

use brewery_production::{DEFAULT_CONTAINER_COUNT, DEFAULT_CONTAINER_PREFIX};

pub const CONTAINER_COUNT_VAR: &str = "BREWERY_CONTAINER_COUNT";
pub const CONTAINER_PREFIX_VAR: &str = "BREWERY_CONTAINER_PREFIX";

/// Settings for a production site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Size of the container pool (fixed for the life of the site).
    pub container_count: usize,
    /// Container ids are `{prefix}1..={prefix}{count}`.
    pub container_prefix: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            container_count: DEFAULT_CONTAINER_COUNT,
            container_prefix: DEFAULT_CONTAINER_PREFIX.to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Read `BREWERY_CONTAINER_COUNT` / `BREWERY_CONTAINER_PREFIX`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Missing keys use defaults; invalid values
    /// fall back to defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(CONTAINER_COUNT_VAR) {
            match raw.trim().parse::<usize>() {
                Ok(count) if count > 0 => config.container_count = count,
                _ => warn!(
                    var = CONTAINER_COUNT_VAR,
                    value = %raw,
                    default = config.container_count,
                    "invalid container count; using default"
                ),
            }
        }

        if let Some(raw) = lookup(CONTAINER_PREFIX_VAR) {
            if raw.trim().is_empty() {
                warn!(
                    var = CONTAINER_PREFIX_VAR,
                    default = %config.container_prefix,
                    "empty container prefix; using default"
                );
            } else {
                config.container_prefix = raw.trim().to_string();
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_reference_pool() {
        let config = RuntimeConfig::from_lookup(|_| None);
        assert_eq!(config.container_count, 3);
        assert_eq!(config.container_prefix, "C");
    }

    #[test]
    fn values_are_read_from_lookup() {
        let config = RuntimeConfig::from_lookup(lookup_from(&[
            (CONTAINER_COUNT_VAR, "5"),
            (CONTAINER_PREFIX_VAR, "Tank-"),
        ]));
        assert_eq!(config.container_count, 5);
        assert_eq!(config.container_prefix, "Tank-");
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = RuntimeConfig::from_lookup(lookup_from(&[
            (CONTAINER_COUNT_VAR, "zero"),
            (CONTAINER_PREFIX_VAR, "   "),
        ]));
        assert_eq!(config, RuntimeConfig::default());

        let config = RuntimeConfig::from_lookup(lookup_from(&[(CONTAINER_COUNT_VAR, "0")]));
        assert_eq!(config.container_count, 3);
    }
}
