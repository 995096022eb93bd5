use serde::{Deserialize, Serialize};

use brewery_core::Entity;

/// Container identifier (`C1`, `C2`, ... in the default pool).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerId(String);

impl ContainerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ContainerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Container state lifecycle: clean → dirty (on use) → clean (on cleaning).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerState {
    Clean,
    Dirty,
}

/// Reusable vessel. Only clean containers take new production.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    id: ContainerId,
    state: ContainerState,
}

impl Container {
    /// New containers start clean.
    pub fn new(id: ContainerId) -> Self {
        Self {
            id,
            state: ContainerState::Clean,
        }
    }

    pub fn id_typed(&self) -> &ContainerId {
        &self.id
    }

    pub fn state(&self) -> ContainerState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.state == ContainerState::Dirty
    }

    pub fn is_clean(&self) -> bool {
        self.state == ContainerState::Clean
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.state = ContainerState::Dirty;
    }

    pub(crate) fn mark_clean(&mut self) {
        self.state = ContainerState::Clean;
    }
}

impl Entity for Container {
    type Id = ContainerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl core::fmt::Display for Container {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = if self.is_dirty() { "dirty" } else { "clean" };
        write!(f, "Container {} is {}", self.id, state)
    }
}

/// Build a pool of `count` containers named `{prefix}1..={prefix}{count}`.
pub fn container_pool(prefix: &str, count: usize) -> Vec<Container> {
    (1..=count)
        .map(|n| Container::new(ContainerId::new(format!("{prefix}{n}"))))
        .collect()
}
