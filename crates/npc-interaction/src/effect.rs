//! Effect execution: what one interaction cycle does to an agent.
//!
//! Action semantics are entirely the executor's business.  The session only
//! learns whether a cycle succeeded and which deltas were applied.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{EffectError, EffectResult, Interactable, NameMap, StatBlock};

/// Applies one cycle of an action's effect.
pub trait EffectExecutor {
    /// Apply one cycle of `action` performed at `target` to `stats`.
    ///
    /// Returns the deltas actually applied (post-clamp), keyed by stat name.
    /// On error nothing may have been applied.
    fn apply_cycle(
        &mut self,
        action: &str,
        target: &Interactable,
        stats:  &mut StatBlock,
    ) -> EffectResult<BTreeMap<String, f64>>;
}

/// One stat change per cycle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatDelta {
    pub stat:  String,
    pub delta: f64,
}

impl StatDelta {
    pub fn new(stat: impl Into<String>, delta: f64) -> Self {
        Self { stat: stat.into(), delta }
    }
}

/// Table-driven [`EffectExecutor`]: action name → fixed per-cycle deltas.
#[derive(Clone, Debug, Default)]
pub struct EffectTable {
    actions: NameMap<Vec<StatDelta>>,
}

impl EffectTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, action: impl Into<String>, deltas: Vec<StatDelta>) -> Self {
        self.insert(action, deltas);
        self
    }

    pub fn insert(&mut self, action: impl Into<String>, deltas: Vec<StatDelta>) {
        self.actions.insert(action.into(), deltas);
    }

    pub fn get(&self, action: &str) -> Option<&[StatDelta]> {
        self.actions.get(action).map(Vec::as_slice)
    }
}

impl EffectExecutor for EffectTable {
    fn apply_cycle(
        &mut self,
        action: &str,
        _target: &Interactable,
        stats:  &mut StatBlock,
    ) -> EffectResult<BTreeMap<String, f64>> {
        let deltas = self
            .actions
            .get(action)
            .ok_or_else(|| EffectError::UnknownAction(action.to_owned()))?;

        // Validate first so a bad row never leaves a half-applied cycle.
        if let Some(missing) = deltas.iter().find(|d| !stats.contains(&d.stat)) {
            return Err(EffectError::UnknownStat {
                action: action.to_owned(),
                stat:   missing.stat.clone(),
            });
        }

        let mut applied = BTreeMap::new();
        for d in deltas {
            let change = stats.apply(&d.stat, d.delta).unwrap_or(0.0);
            *applied.entry(d.stat.clone()).or_insert(0.0) += change;
        }
        Ok(applied)
    }
}
