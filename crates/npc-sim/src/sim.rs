//! The simulation struct and tick loop.

use std::collections::{BTreeMap, VecDeque};

use tracing::{debug, info, trace, warn};

use npc_agent::{AgentArena, AgentRngs, AgentView};
use npc_behavior::{
    BehaviorPhase, BehaviorResult, Blocked, DecisionCommand, DecisionContext, DecisionMaker,
    EventChannel, FeedbackRecord, Intent, MoveGoal, OutboundEvent, PerceptionEvent,
    PerceptionKind, Transition,
};
use npc_core::{ActivityId, AgentId, Clock, SimClock, SimConfig, TimeOfDay};
use npc_interaction::{
    EffectExecutor, InteractionSession, SessionAbort, SessionOutcome, SessionReport,
    TargetRegistry, TargetTable,
};
use npc_mobility::{MovementEvent, MovementExecutor};
use npc_schedule::{Activity, ScheduleSnapshot};

use crate::{PhaseChange, SimError, SimObserver, SimResult, TickSummary};

/// The top-level simulation.
///
/// Type parameters:
/// - `D`: the [`DecisionMaker`] answering perceptions.
/// - `M`: the [`MovementExecutor`] carrying out `MoveTo` intents.
/// - `E`: the [`EffectExecutor`] applying interaction cycles.
///
/// Construct via [`SimBuilder`](crate::SimBuilder).
pub struct Sim<D, M, E>
where
    D: DecisionMaker,
    M: MovementExecutor,
    E: EffectExecutor,
{
    /// Immutable run configuration.
    pub config: SimConfig,

    /// Current simulated time.
    pub clock: SimClock,

    /// All per-agent state.
    pub agents: AgentArena,

    /// Per-agent RNG (separate from `agents` for split borrows).
    pub rngs: AgentRngs,

    /// World interactables, looked up by name.
    pub targets: TargetTable,

    pub decision: D,

    pub movement: M,

    pub effects: E,

    /// Commands waiting for the next tick boundary.
    pub(crate) inbox: VecDeque<(AgentId, DecisionCommand)>,

    /// Events emitted during the current tick.
    pub(crate) outbox: EventChannel,

    /// Phase changes not yet reported to an observer.
    pub(crate) phase_log: Vec<PhaseChange>,

    /// Activities started since the last tick summary.
    pub(crate) started: usize,
}

impl<D, M, E> Sim<D, M, E>
where
    D: DecisionMaker,
    M: MovementExecutor,
    E: EffectExecutor,
{
    // ── Public run API ────────────────────────────────────────────────────

    /// Run until `config.total_ticks` ticks have elapsed, or until the clock
    /// is paused.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        info!(
            agents = self.agents.count,
            start = %self.clock.now(),
            ticks = self.config.total_ticks,
            "simulation started"
        );
        while self.clock.ticks_elapsed < self.config.total_ticks {
            if self.step(observer)?.is_none() {
                info!(now = %self.clock.now(), "simulation paused");
                break;
            }
        }
        observer.on_sim_end(self.clock.now());
        info!(now = %self.clock.now(), ticks = self.clock.ticks_elapsed, "simulation finished");
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores
    /// `total_ticks`).  Stops early if the clock is paused.
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            if self.step(observer)?.is_none() {
                break;
            }
        }
        Ok(())
    }

    /// Process one tick and advance the clock.
    ///
    /// Returns `None` without touching any state while the clock is paused.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<Option<TickSummary>> {
        if self.clock.is_paused() {
            trace!(now = %self.clock.now(), "clock paused, tick skipped");
            return Ok(None);
        }
        let now = self.clock.now();
        let tick = self.clock.ticks_elapsed;
        observer.on_tick_start(tick, now);

        let summary = self.process_tick(tick, now, observer)?;

        observer.on_tick_end(&summary);
        if self.config.output_interval_ticks > 0
            && tick.is_multiple_of(self.config.output_interval_ticks)
        {
            observer.on_snapshot(tick, now, &self.agents);
        }

        self.clock.advance();
        Ok(Some(summary))
    }

    // ── Clock control ─────────────────────────────────────────────────────

    #[inline]
    pub fn now(&self) -> TimeOfDay {
        self.clock.now()
    }

    pub fn pause(&mut self) {
        self.clock.pause();
    }

    pub fn resume(&mut self) {
        self.clock.resume();
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    // ── Inspection ────────────────────────────────────────────────────────

    pub fn view(&self, agent: AgentId) -> Option<AgentView> {
        self.agents.view(agent)
    }

    /// One view per agent, in id order.
    pub fn views(&self) -> Vec<AgentView> {
        self.agents
            .agent_ids()
            .filter_map(|agent| self.agents.view(agent))
            .collect()
    }

    /// Serializable copy of one agent's schedule.
    pub fn export_schedule(&self, agent: AgentId) -> SimResult<ScheduleSnapshot> {
        let i = self.index(agent)?;
        Ok(self.agents.schedules[i].snapshot())
    }

    // ── Schedule mutation (synchronous) ───────────────────────────────────

    /// Add an activity right away, subject to priority rejection and
    /// push-back.  Takes effect at the next selection.
    pub fn add_activity(&mut self, agent: AgentId, activity: Activity) -> SimResult<()> {
        let i = self.index(agent)?;
        self.agents.schedules[i].add(activity)?;
        Ok(())
    }

    /// Returns whether anything was removed.  Removing the activity in
    /// service preempts it at the next tick.
    pub fn remove_activity(&mut self, agent: AgentId, id: ActivityId) -> SimResult<bool> {
        let i = self.index(agent)?;
        Ok(self.agents.schedules[i].remove(id))
    }

    pub fn replace_schedule(&mut self, agent: AgentId, activities: Vec<Activity>) -> SimResult<()> {
        let i = self.index(agent)?;
        self.agents.schedules[i].replace_all(activities)?;
        Ok(())
    }

    /// Replace one agent's schedule with a previously exported snapshot.
    pub fn restore_schedule(&mut self, agent: AgentId, snapshot: ScheduleSnapshot) -> SimResult<()> {
        let i = self.index(agent)?;
        self.agents.schedules[i].restore(snapshot)?;
        Ok(())
    }

    // ── Decision channel ──────────────────────────────────────────────────

    /// Queue a command for the next tick boundary.
    pub fn submit(&mut self, agent: AgentId, command: DecisionCommand) {
        self.inbox.push_back((agent, command));
    }

    /// Answer a pending reactive decision now.
    ///
    /// With `accept` and an activity, the activity is added to the schedule
    /// and started if it is due; otherwise the agent returns to the phase it
    /// held before the decision.  Returns `false` (and does nothing) when the
    /// agent was not awaiting a decision.
    pub fn resolve_reactive(
        &mut self,
        agent:    AgentId,
        accept:   bool,
        activity: Option<Activity>,
    ) -> SimResult<bool> {
        self.index(agent)?;
        let now = self.clock.now();
        self.resolve_at(agent, accept, activity, now)
    }

    /// Preempt whatever `agent` is doing and run `activity`, regardless of
    /// priority.  Clears a pending decision lock.
    pub fn force_override(&mut self, agent: AgentId, activity: Activity) -> SimResult<()> {
        self.index(agent)?;
        let now = self.clock.now();
        self.override_at(agent, activity, now)
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn process_tick<O: SimObserver>(
        &mut self,
        tick:     u64,
        now:      TimeOfDay,
        observer: &mut O,
    ) -> SimResult<TickSummary> {
        // ── ① Inbound commands ────────────────────────────────────────────
        self.apply_commands(now)?;

        // ── ② Movement events ─────────────────────────────────────────────
        for event in self.movement.poll(now) {
            let agent = event.agent();
            if !self.agents.contains(agent) {
                warn!(%agent, "movement event for unknown agent dropped");
                continue;
            }
            match event {
                MovementEvent::Arrived { goal, .. } => self.on_arrived(agent, goal, now)?,
                MovementEvent::Blocked { goal, .. } => self.on_blocked(agent, goal, now)?,
            }
        }

        let count = self.agents.count as u32;

        // ── ③ Selection and preemption ────────────────────────────────────
        for raw in 0..count {
            self.select(AgentId(raw), now)?;
        }

        // ── ④ Interaction sessions ────────────────────────────────────────
        for raw in 0..count {
            self.tick_session(AgentId(raw), now)?;
        }

        // ── ⑤ Idle timeout ────────────────────────────────────────────────
        let threshold = self.config.idle_timeout_minutes;
        for raw in 0..count {
            let agent = AgentId(raw);
            let i = agent.index();
            if !self.agents.machines[i].idle_elapsed(now, threshold) {
                continue;
            }
            debug!(%agent, %now, "idle timeout");
            self.outbox.emit_perception(PerceptionEvent {
                agent,
                time:        now,
                kind:        PerceptionKind::IdleTimeout,
                location:    self.agents.locations[i].clone(),
                description: format!("nothing scheduled for {threshold} minutes"),
                activity:    None,
            });
            self.agents.machines[i].rearm_idle(now);
        }

        // ── ⑥ Dispatch ────────────────────────────────────────────────────
        let (feedback, perceptions) = self.dispatch(now, observer)?;

        let phase_changes = self.phase_log.len();
        for change in self.phase_log.drain(..) {
            observer.on_phase_change(&change);
        }

        Ok(TickSummary {
            tick,
            time: now,
            started: std::mem::take(&mut self.started),
            phase_changes,
            feedback,
            perceptions,
            interacting: self.agents.sessions.iter().filter(|s| s.is_some()).count(),
            locked: self.agents.machines.iter().filter(|m| m.is_locked()).count(),
        })
    }

    fn apply_commands(&mut self, now: TimeOfDay) -> SimResult<()> {
        let polled = self.decision.poll(now);
        self.inbox.extend(polled);

        while let Some((agent, command)) = self.inbox.pop_front() {
            if !self.agents.contains(agent) {
                warn!(%agent, "command for unknown agent dropped");
                continue;
            }
            let i = agent.index();
            match command {
                DecisionCommand::Add(activity) => {
                    let id = activity.id;
                    if let Err(e) = self.agents.schedules[i].add(activity) {
                        warn!(%agent, %id, error = %e, "planned activity rejected");
                    }
                }
                DecisionCommand::Remove(id) => {
                    if !self.agents.schedules[i].remove(id) {
                        debug!(%agent, %id, "remove ignored: no such activity");
                    }
                }
                DecisionCommand::ReplaceAll(activities) => {
                    if let Err(e) = self.agents.schedules[i].replace_all(activities) {
                        warn!(%agent, error = %e, "re-plan rejected");
                    }
                }
                DecisionCommand::Resolve { accept, activity } => {
                    self.resolve_at(agent, accept, activity, now)?;
                }
                DecisionCommand::Override(activity) => match self.override_at(agent, activity, now) {
                    Err(SimError::Schedule(e)) => warn!(%agent, error = %e, "override rejected"),
                    other => other?,
                },
            }
        }
        Ok(())
    }

    // ── Movement ──────────────────────────────────────────────────────────

    fn on_arrived(&mut self, agent: AgentId, goal: MoveGoal, now: TimeOfDay) -> SimResult<()> {
        let i = agent.index();
        if !self.is_current_goal(i, &goal) {
            debug!(%agent, ?goal, "stale arrival ignored");
            return Ok(());
        }
        let machine = &mut self.agents.machines[i];
        let result = match goal {
            MoveGoal::Location(location) => {
                self.agents.locations[i] = location;
                machine.arrived_at_location(now)
            }
            MoveGoal::Target { location, .. } => {
                self.agents.locations[i] = location;
                machine.arrived_at_target(now)
            }
        };
        self.apply(agent, result, now)
    }

    fn on_blocked(&mut self, agent: AgentId, goal: MoveGoal, now: TimeOfDay) -> SimResult<()> {
        let i = agent.index();
        if !self.is_current_goal(i, &goal) {
            debug!(%agent, ?goal, "stale blocked event ignored");
            return Ok(());
        }

        let alternate = match &goal {
            MoveGoal::Target { location, .. } => {
                let engagement = self.agents.machines[i].engagement();
                let untried: Vec<String> = self
                    .targets
                    .at_location(location)
                    .into_iter()
                    .filter(|t| !engagement.is_some_and(|e| e.has_tried(&t.name)))
                    .map(|t| t.name.clone())
                    .collect();
                self.rngs.get_mut(agent).choose(&untried).cloned()
            }
            MoveGoal::Location(_) => None,
        };

        match self.agents.machines[i].movement_blocked(alternate, now) {
            Ok(Blocked::Retry(transition)) => self.execute(agent, transition, now),
            Ok(Blocked::GaveUp { kind, transition }) => {
                if let Some(engagement) = &transition.released {
                    let description = match kind {
                        PerceptionKind::NoPathToLocation => {
                            format!("no path to {}", engagement.location_name)
                        }
                        _ => format!(
                            "no reachable {} at {}",
                            engagement.target_name, engagement.location_name
                        ),
                    };
                    warn!(%agent, activity = %engagement.activity, %kind, "movement gave up");
                    self.outbox.emit_feedback(FeedbackRecord::for_engagement(
                        agent,
                        now,
                        engagement,
                        false,
                        description.clone(),
                    ));
                    self.outbox.emit_perception(PerceptionEvent {
                        agent,
                        time: now,
                        kind,
                        location: self.agents.locations[i].clone(),
                        description,
                        activity: Some(engagement.activity),
                    });
                    self.complete_if_current(i, engagement.activity, now);
                }
                self.execute(agent, transition, now)
            }
            Err(e) => {
                debug!(%agent, error = %e, "blocked event ignored");
                Ok(())
            }
        }
    }

    /// `true` if `goal` is where the machine is currently headed.
    fn is_current_goal(&self, i: usize, goal: &MoveGoal) -> bool {
        let machine = &self.agents.machines[i];
        let Some(e) = machine.engagement() else {
            return false;
        };
        match (machine.phase(), goal) {
            (BehaviorPhase::MovingToLocation, MoveGoal::Location(location)) => {
                *location == e.location_name
            }
            (BehaviorPhase::MovingToInteractable, MoveGoal::Target { location, target }) => {
                *location == e.location_name && *target == e.target_name
            }
            _ => false,
        }
    }

    // ── Selection ─────────────────────────────────────────────────────────

    /// Reconcile the machine with the schedule's current activity.
    fn select(&mut self, agent: AgentId, now: TimeOfDay) -> SimResult<()> {
        let i = agent.index();
        if self.agents.machines[i].is_locked() {
            return Ok(());
        }

        self.agents.schedules[i].update(now);
        let desired = self.agents.schedules[i].current();
        if self.agents.machines[i].servicing() == desired {
            return Ok(());
        }

        // The schedule has already completed the old activity; release it
        // before the new one acquires anything.
        if self.agents.machines[i].servicing().is_some() {
            self.preempt(agent, now)?;
        }

        match self.agents.schedules[i].current() {
            Some(id) if self.agents.machines[i].servicing() != Some(id) => {
                self.begin_activity(agent, id, now)
            }
            _ => Ok(()),
        }
    }

    fn begin_activity(&mut self, agent: AgentId, id: ActivityId, now: TimeOfDay) -> SimResult<()> {
        let i = agent.index();
        let Some(activity) = self.agents.schedules[i].get(id) else {
            return Ok(());
        };
        let result = self.agents.machines[i].start(activity, &self.agents.locations[i], now);
        if result.is_ok() {
            self.started += 1;
            info!(%agent, %id, action = %activity.action_name, %now, "activity started");
        }
        self.apply(agent, result, now)
    }

    /// Stop servicing the engaged activity, emitting its feedback.
    ///
    /// A live session is first advanced to `now`; if that ends it on its
    /// own (window reached, target lost) the natural outcome is reported
    /// instead of `Preempted`.
    fn preempt(&mut self, agent: AgentId, now: TimeOfDay) -> SimResult<()> {
        let i = agent.index();
        let Some(engagement) = self.agents.machines[i].engagement().cloned() else {
            return Ok(());
        };

        if let Some(session) = self.agents.sessions[i].as_mut() {
            let report = session
                .tick(now, &self.targets, &mut self.effects, &mut self.agents.stats[i])
                .or_else(|| session.preempt());
            if let Some(report) = report {
                return self.conclude_session(agent, report, now);
            }
        }

        let description = if self.agents.schedules[i].current().is_some() {
            "preempted by another activity"
        } else {
            "activity ended before interaction began"
        };
        info!(%agent, activity = %engagement.activity, %now, description, "activity preempted");
        self.outbox.emit_feedback(FeedbackRecord::for_engagement(
            agent,
            now,
            &engagement,
            false,
            description,
        ));
        let result = self.agents.machines[i].abandon(now);
        self.apply(agent, result, now)
    }

    // ── Sessions ──────────────────────────────────────────────────────────

    fn open_session(&mut self, agent: AgentId, target: &str, now: TimeOfDay) -> SimResult<()> {
        let i = agent.index();
        let Some(engagement) = self.agents.machines[i].engagement() else {
            return Ok(());
        };
        // Movement events land before selection, so the activity may have
        // been removed or run out of window while the agent was walking.
        let schedule = &self.agents.schedules[i];
        let window_end = schedule
            .get(engagement.activity)
            .filter(|a| !a.is_completed() && schedule.current() == Some(a.id))
            .map(|a| a.end_time);

        let opened = match (window_end, self.targets.get(target).filter(|t| t.active)) {
            (None, _) => Err(SessionAbort::WindowElapsed),
            (Some(end), Some(interactable)) => {
                InteractionSession::begin(engagement.action_name.clone(), interactable, end, now)
            }
            (Some(_), None) => Err(SessionAbort::TargetLost(target.to_owned())),
        };

        match opened {
            Ok(session) => {
                self.agents.sessions[i] = Some(session);
                Ok(())
            }
            Err(abort) => {
                let report = SessionReport {
                    outcome: SessionOutcome::Aborted(abort),
                    cycles:  0,
                    deltas:  BTreeMap::new(),
                };
                self.conclude_session(agent, report, now)
            }
        }
    }

    fn tick_session(&mut self, agent: AgentId, now: TimeOfDay) -> SimResult<()> {
        let i = agent.index();
        let Some(session) = self.agents.sessions[i].as_mut() else {
            return Ok(());
        };
        match session.tick(now, &self.targets, &mut self.effects, &mut self.agents.stats[i]) {
            Some(report) => self.conclude_session(agent, report, now),
            None => Ok(()),
        }
    }

    /// Report a terminated session, return the machine to `Waiting`, and
    /// complete the activity in the schedule, in that order.
    fn conclude_session(
        &mut self,
        agent:  AgentId,
        report: SessionReport,
        now:    TimeOfDay,
    ) -> SimResult<()> {
        let i = agent.index();
        self.agents.sessions[i] = None;

        let Some(engagement) = self.agents.machines[i].engagement().cloned() else {
            warn!(%agent, "session ended with nothing in service");
            return Ok(());
        };
        let success = report.outcome.is_success();
        let description = report.outcome.describe();
        if success {
            info!(%agent, activity = %engagement.activity, cycles = report.cycles, %now, "activity completed");
        } else {
            warn!(%agent, activity = %engagement.activity, cycles = report.cycles, reason = %description, "activity failed");
        }
        self.outbox.emit_feedback(
            FeedbackRecord::for_engagement(agent, now, &engagement, success, description)
                .with_deltas(report.deltas),
        );

        let result = self.agents.machines[i].finish_interaction(now);
        self.apply(agent, result, now)?;
        self.complete_if_current(i, engagement.activity, now);
        Ok(())
    }

    /// Complete `activity` only if the schedule still holds it as current;
    /// a preempting selection may already have moved on.
    fn complete_if_current(&mut self, i: usize, activity: ActivityId, now: TimeOfDay) {
        if self.agents.schedules[i].current() == Some(activity) {
            self.agents.schedules[i].complete_current(now);
        }
    }

    // ── Decisions ─────────────────────────────────────────────────────────

    fn dispatch<O: SimObserver>(
        &mut self,
        now:      TimeOfDay,
        observer: &mut O,
    ) -> SimResult<(usize, usize)> {
        let events: Vec<OutboundEvent> = self.outbox.drain().collect();
        let mut feedback = 0;
        let mut perceptions = 0;

        for event in events {
            match event {
                OutboundEvent::Feedback(record) => {
                    feedback += 1;
                    self.decision.on_feedback(&record);
                    observer.on_feedback(&record);
                }
                OutboundEvent::Perception(event) => {
                    perceptions += 1;
                    let agent = event.agent;
                    let i = agent.index();
                    let ctx = DecisionContext::new(
                        now,
                        agent,
                        &self.agents.names[i],
                        self.agents.machines[i].phase(),
                        &self.agents.locations[i],
                        &self.agents.schedules[i],
                    );
                    let accepted = self.decision.on_perception(&event, &ctx);
                    observer.on_perception(&event);
                    if accepted {
                        self.lock_for_decision(agent, now)?;
                    }
                }
            }
        }
        Ok((feedback, perceptions))
    }

    /// Enter the decision phase.  Only a `Waiting` agent can lock; one that
    /// picked up an activity since the perception keeps going.
    fn lock_for_decision(&mut self, agent: AgentId, now: TimeOfDay) -> SimResult<()> {
        let i = agent.index();
        let machine = &mut self.agents.machines[i];
        if machine.phase() != BehaviorPhase::Waiting || machine.is_locked() {
            debug!(%agent, phase = %machine.phase(), "decision request dropped: agent busy");
            return Ok(());
        }
        let result = machine.await_decision(now);
        self.apply(agent, result, now)
    }

    fn resolve_at(
        &mut self,
        agent:    AgentId,
        accept:   bool,
        activity: Option<Activity>,
        now:      TimeOfDay,
    ) -> SimResult<bool> {
        let i = agent.index();
        if !self.agents.machines[i].is_locked() {
            debug!(%agent, accept, "resolve ignored: no pending decision");
            return Ok(false);
        }

        // Only an activity the schedule accepted and selected for `now` is
        // started from the decision phase.  A future one waits its turn.
        let chosen = match (accept, activity) {
            (true, Some(activity)) => {
                let id = activity.id;
                match self.agents.schedules[i].add(activity) {
                    Ok(()) => {
                        self.agents.schedules[i].update(now);
                        (self.agents.schedules[i].current() == Some(id)).then_some(id)
                    }
                    Err(e) => {
                        warn!(%agent, %id, error = %e, "reactive activity rejected");
                        None
                    }
                }
            }
            _ => None,
        };

        let schedule = &self.agents.schedules[i];
        let location = &self.agents.locations[i];
        let machine = &mut self.agents.machines[i];
        let transition = match chosen.and_then(|id| schedule.get(id)) {
            Some(activity) => machine.resolve(true, Some(activity), location, now),
            None => machine.resolve(false, None, location, now),
        };
        info!(%agent, accepted = chosen.is_some(), %now, "decision resolved");

        if let Some(transition) = transition {
            if chosen.is_some() {
                self.started += 1;
            }
            self.execute(agent, transition, now)?;
        }
        Ok(true)
    }

    fn override_at(&mut self, agent: AgentId, activity: Activity, now: TimeOfDay) -> SimResult<()> {
        let i = agent.index();
        let id = activity.id;
        let forced = self.agents.schedules[i].insert_override(activity, now)?;
        info!(%agent, %id, ?forced, %now, "override inserted");

        if self.agents.machines[i].is_locked() {
            let machine = &mut self.agents.machines[i];
            if let Some(transition) = machine.resolve(false, None, &self.agents.locations[i], now) {
                self.execute(agent, transition, now)?;
            }
        }
        self.select(agent, now)
    }

    // ── Intent execution ──────────────────────────────────────────────────

    fn apply(
        &mut self,
        agent:  AgentId,
        result: BehaviorResult<Transition>,
        now:    TimeOfDay,
    ) -> SimResult<()> {
        match result {
            Ok(transition) => self.execute(agent, transition, now),
            Err(e) => {
                debug!(%agent, error = %e, "trigger ignored");
                Ok(())
            }
        }
    }

    /// Record the phase change and carry out its intents in order.
    fn execute(&mut self, agent: AgentId, transition: Transition, now: TimeOfDay) -> SimResult<()> {
        let i = agent.index();
        let Transition { from, to, intents, .. } = transition;
        if from != to {
            trace!(%agent, %from, %to, "phase changed");
            self.phase_log.push(PhaseChange { agent, time: now, from, to });
        }

        for intent in intents {
            match intent {
                Intent::StopMovement => self.movement.stop(agent),
                Intent::MoveTo(goal) => {
                    self.movement.move_to(agent, &self.agents.locations[i], &goal, now)?;
                }
                Intent::OpenInteraction { target } => self.open_session(agent, &target, now)?,
                Intent::CloseInteraction => {
                    if self.agents.sessions[i].take().is_some_and(|s| !s.is_finished()) {
                        warn!(%agent, "live session closed without a report");
                    }
                }
            }
        }
        Ok(())
    }

    fn index(&self, agent: AgentId) -> SimResult<usize> {
        if self.agents.contains(agent) {
            Ok(agent.index())
        } else {
            Err(SimError::UnknownAgent(agent))
        }
    }
}
