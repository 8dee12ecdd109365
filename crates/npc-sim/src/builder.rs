//! Fluent builder for constructing a [`Sim`].

use std::collections::VecDeque;

use tracing::{info, warn};

use npc_agent::{AgentArena, AgentRngs};
use npc_behavior::{DecisionMaker, EventChannel};
use npc_core::SimConfig;
use npc_interaction::{EffectExecutor, TargetTable};
use npc_mobility::MovementExecutor;
use npc_schedule::Activity;

use crate::{Sim, SimError, SimResult};

/// Fluent builder for [`Sim<D, M, E>`].
///
/// # Required inputs
///
/// - [`SimConfig`] — start time, tick length, idle threshold, …
/// - [`AgentArena`] + [`AgentRngs`] — from [`npc_agent::AgentArenaBuilder`]
/// - `D: DecisionMaker` — answers perceptions (e.g. [`npc_behavior::NoopDecisionMaker`])
/// - `M: MovementExecutor` — moves agents (e.g. [`npc_mobility::TimedMovement`])
/// - `E: EffectExecutor` — applies interaction cycles (e.g. [`npc_interaction::EffectTable`])
///
/// # Optional inputs (have defaults)
///
/// | Method           | Default                                   |
/// |------------------|-------------------------------------------|
/// | `.targets(t)`    | Empty `TargetTable`                       |
/// | `.schedules(v)`  | Whatever the arena's schedules already hold |
///
/// # Example
///
/// ```rust,ignore
/// let (arena, rngs) = AgentArenaBuilder::new(seed).agent("ada", "house").build();
/// let mut sim = SimBuilder::new(config, arena, rngs, NoopDecisionMaker, movement, effects)
///     .targets(targets)
///     .schedules(load_activities_csv(path, 1)?)
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<D, M, E>
where
    D: DecisionMaker,
    M: MovementExecutor,
    E: EffectExecutor,
{
    config:    SimConfig,
    agents:    AgentArena,
    rngs:      AgentRngs,
    decision:  D,
    movement:  M,
    effects:   E,
    targets:   Option<TargetTable>,
    schedules: Option<Vec<Vec<Activity>>>,
}

impl<D, M, E> SimBuilder<D, M, E>
where
    D: DecisionMaker,
    M: MovementExecutor,
    E: EffectExecutor,
{
    /// Create a builder with all required inputs.
    pub fn new(
        config:   SimConfig,
        agents:   AgentArena,
        rngs:     AgentRngs,
        decision: D,
        movement: M,
        effects:  E,
    ) -> Self {
        Self {
            config,
            agents,
            rngs,
            decision,
            movement,
            effects,
            targets:   None,
            schedules: None,
        }
    }

    /// Supply the world's interactables.
    pub fn targets(mut self, targets: TargetTable) -> Self {
        self.targets = Some(targets);
        self
    }

    /// Supply initial per-agent activity lists (must be length
    /// `agent_count`).
    ///
    /// Each activity goes through `Schedule::add`, so conflicting rows are
    /// pushed back or rejected exactly as live additions would be.
    /// Rejections are logged, not fatal.
    pub fn schedules(mut self, schedules: Vec<Vec<Activity>>) -> Self {
        self.schedules = Some(schedules);
        self
    }

    /// Validate inputs, seed the schedules, and return a ready-to-run
    /// [`Sim`].
    pub fn build(mut self) -> SimResult<Sim<D, M, E>> {
        self.config.validate()?;

        let agent_count = self.agents.count;
        if self.rngs.len() != agent_count {
            return Err(SimError::AgentCountMismatch {
                expected: agent_count,
                got:      self.rngs.len(),
                what:     "agent rngs",
            });
        }

        if let Some(lists) = self.schedules {
            if lists.len() != agent_count {
                return Err(SimError::AgentCountMismatch {
                    expected: agent_count,
                    got:      lists.len(),
                    what:     "activity lists",
                });
            }
            for (schedule, list) in self.agents.schedules.iter_mut().zip(lists) {
                for activity in list {
                    let id = activity.id;
                    if let Err(e) = schedule.add(activity) {
                        warn!(%id, error = %e, "initial activity rejected");
                    }
                }
            }
        }

        let targets = self.targets.unwrap_or_default();
        info!(
            agents = agent_count,
            targets = targets.len(),
            start = %self.config.start_time,
            "simulation built"
        );

        Ok(Sim {
            clock:     self.config.make_clock(),
            config:    self.config,
            agents:    self.agents,
            rngs:      self.rngs,
            targets,
            decision:  self.decision,
            movement:  self.movement,
            effects:   self.effects,
            inbox:     VecDeque::new(),
            outbox:    EventChannel::new(),
            phase_log: Vec::new(),
            started:   0,
        })
    }
}
