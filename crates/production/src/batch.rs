use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use brewery_core::{BatchId, Entity};

/// Finished production output: a recipe name and a produced bottle count.
///
/// Only successful production creates batches; they are never edited or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    id: BatchId,
    recipe_name: String,
    size: u32,
    produced_at: DateTime<Utc>,
}

impl Batch {
    pub fn new(
        id: BatchId,
        recipe_name: impl Into<String>,
        size: u32,
        produced_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            recipe_name: recipe_name.into(),
            size,
            produced_at,
        }
    }

    pub fn id_typed(&self) -> BatchId {
        self.id
    }

    pub fn recipe_name(&self) -> &str {
        &self.recipe_name
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn produced_at(&self) -> DateTime<Utc> {
        self.produced_at
    }
}

impl Entity for Batch {
    type Id = BatchId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl core::fmt::Display for Batch {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {} bottles", self.recipe_name, self.size)
    }
}
