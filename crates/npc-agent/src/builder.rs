//! Fluent builder for `AgentArena` + `AgentRngs`.
//!
//! # Usage
//!
//! ```rust
//! use npc_agent::AgentArenaBuilder;
//! use npc_core::TimeOfDay;
//!
//! let (arena, rngs) = AgentArenaBuilder::new(42)
//!     .start_time(TimeOfDay::hm(6, 0))
//!     .agent("ada", "house")
//!     .agent("bo", "smithy")
//!     .build();
//!
//! assert_eq!(arena.count, 2);
//! assert_eq!(rngs.len(), 2);
//! ```

use serde::Deserialize;

use npc_core::TimeOfDay;
use npc_interaction::StatBlock;
use npc_schedule::schedule::DEFAULT_PUSH_BACK_GAP;

use crate::{AgentArena, AgentRngs};

/// One agent to spawn.  `stats` falls back to the builder's default block.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AgentSpec {
    pub name:     String,
    pub location: String,
    #[serde(default)]
    pub stats:    Option<StatBlock>,
}

impl AgentSpec {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self { name: name.into(), location: location.into(), stats: None }
    }
}

pub struct AgentArenaBuilder {
    seed:          u64,
    start_time:    TimeOfDay,
    push_back_gap: u64,
    default_stats: StatBlock,
    specs:         Vec<AgentSpec>,
}

impl AgentArenaBuilder {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            start_time:    TimeOfDay::ZERO,
            push_back_gap: DEFAULT_PUSH_BACK_GAP,
            default_stats: StatBlock::new(),
            specs:         Vec::new(),
        }
    }

    /// Spawn time: every machine starts `Waiting`, idle since this moment.
    pub fn start_time(mut self, start: TimeOfDay) -> Self {
        self.start_time = start;
        self
    }

    pub fn push_back_gap(mut self, minutes: u64) -> Self {
        self.push_back_gap = minutes;
        self
    }

    /// Stats given to agents whose spec carries none.
    pub fn default_stats(mut self, stats: StatBlock) -> Self {
        self.default_stats = stats;
        self
    }

    pub fn agent(self, name: impl Into<String>, location: impl Into<String>) -> Self {
        self.spec(AgentSpec::new(name, location))
    }

    pub fn spec(mut self, spec: AgentSpec) -> Self {
        self.specs.push(spec);
        self
    }

    pub fn specs(mut self, specs: impl IntoIterator<Item = AgentSpec>) -> Self {
        self.specs.extend(specs);
        self
    }

    /// Construct `AgentArena` and `AgentRngs`.  Agents receive ids in the
    /// order they were added.
    pub fn build(self) -> (AgentArena, AgentRngs) {
        let mut arena = AgentArena::empty();
        for spec in self.specs {
            let stats = spec.stats.unwrap_or_else(|| self.default_stats.clone());
            arena.push(spec.name, spec.location, stats, self.push_back_gap, self.start_time);
        }
        let rngs = AgentRngs::new(arena.count, self.seed);
        (arena, rngs)
    }
}
