//! Interactables and the registry that resolves them by name.

use serde::{Deserialize, Serialize};

use crate::NameMap;

/// Something an agent can interact with: a bed, an anvil, a well.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Interactable {
    pub name:          String,
    pub location:      String,
    /// Simulated minutes per effect cycle.  Non-positive values make any
    /// session on this target fail immediately.
    pub cycle_minutes: i64,
    #[serde(default = "default_active")]
    pub active:        bool,
}

fn default_active() -> bool {
    true
}

impl Interactable {
    pub fn new(name: impl Into<String>, location: impl Into<String>, cycle_minutes: i64) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            cycle_minutes,
            active: true,
        }
    }
}

/// Name lookup for interactables.  World registration lives outside the
/// core; the simulation only asks.
pub trait TargetRegistry {
    fn get(&self, name: &str) -> Option<&Interactable>;

    /// Active interactables at `location`, sorted by name.
    fn at_location(&self, location: &str) -> Vec<&Interactable>;

    /// `true` if `name` exists and is active.
    fn is_available(&self, name: &str) -> bool {
        self.get(name).is_some_and(|t| t.active)
    }
}

/// In-memory [`TargetRegistry`].
#[derive(Clone, Debug, Default)]
pub struct TargetTable {
    targets: NameMap<Interactable>,
}

impl TargetTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace by name.
    pub fn insert(&mut self, target: Interactable) {
        self.targets.insert(target.name.clone(), target);
    }

    pub fn remove(&mut self, name: &str) -> Option<Interactable> {
        self.targets.remove(name)
    }

    /// Returns `false` if there is no such target.
    pub fn set_active(&mut self, name: &str, active: bool) -> bool {
        match self.targets.get_mut(name) {
            Some(t) => {
                t.active = active;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl FromIterator<Interactable> for TargetTable {
    fn from_iter<I: IntoIterator<Item = Interactable>>(iter: I) -> Self {
        let mut table = TargetTable::new();
        for target in iter {
            table.insert(target);
        }
        table
    }
}

impl TargetRegistry for TargetTable {
    fn get(&self, name: &str) -> Option<&Interactable> {
        self.targets.get(name)
    }

    fn at_location(&self, location: &str) -> Vec<&Interactable> {
        // Map iteration order is unspecified; sort so RNG draws stay reproducible.
        let mut found: Vec<&Interactable> = self
            .targets
            .values()
            .filter(|t| t.active && t.location == location)
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        found
    }
}
