//! Bounded numeric agent state (hunger, energy, coin, …).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A value confined to `[min, max]`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundedStat {
    pub value: f64,
    pub min:   f64,
    pub max:   f64,
}

impl BoundedStat {
    /// `value` is clamped into range on construction.
    pub fn new(value: f64, min: f64, max: f64) -> Self {
        Self { value: value.clamp(min, max), min, max }
    }

    /// Add `delta`, clamp, and return the change actually applied.
    pub fn apply(&mut self, delta: f64) -> f64 {
        let before = self.value;
        self.value = (self.value + delta).clamp(self.min, self.max);
        self.value - before
    }
}

/// One agent's named stats.  Ordered by name so output is stable.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatBlock {
    stats: BTreeMap<String, BoundedStat>,
}

impl StatBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, stat: BoundedStat) -> Self {
        self.insert(name, stat);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, stat: BoundedStat) {
        self.stats.insert(name.into(), stat);
    }

    pub fn get(&self, name: &str) -> Option<&BoundedStat> {
        self.stats.get(name)
    }

    pub fn value(&self, name: &str) -> Option<f64> {
        self.stats.get(name).map(|s| s.value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.stats.contains_key(name)
    }

    /// Apply `delta` to `name`.  Returns the clamped change, or `None` if the
    /// stat does not exist.
    pub fn apply(&mut self, name: &str, delta: f64) -> Option<f64> {
        self.stats.get_mut(name).map(|s| s.apply(delta))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BoundedStat)> {
        self.stats.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}
