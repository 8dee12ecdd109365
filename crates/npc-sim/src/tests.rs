//! Integration tests for npc-sim: full tick loop with the reference
//! movement and effect executors.

use npc_agent::AgentArenaBuilder;
use npc_behavior::{
    BehaviorPhase, DecisionCommand, DecisionContext, DecisionMaker, FeedbackRecord,
    NoopDecisionMaker, PerceptionEvent, PerceptionKind,
};
use npc_core::{ActivityId, AgentId, SimConfig, TimeOfDay};
use npc_interaction::{BoundedStat, EffectTable, Interactable, StatBlock, StatDelta, TargetTable};
use npc_mobility::{MovementConfig, TimedMovement};
use npc_schedule::Activity;

use crate::{NoopObserver, PhaseChange, Sim, SimBuilder, SimError, SimObserver, TickSummary};

// ── Helpers ───────────────────────────────────────────────────────────────────

const ADA: AgentId = AgentId(0);

fn t(h: u32, m: u32) -> TimeOfDay {
    TimeOfDay::hm(h, m)
}

fn config(start: TimeOfDay) -> SimConfig {
    SimConfig {
        start_time: start,
        total_ticks: 120,
        output_interval_ticks: 0,
        ..SimConfig::default()
    }
}

fn tavern() -> TargetTable {
    [
        Interactable::new("table", "tavern", 5),
        Interactable::new("bench", "tavern", 5),
    ]
    .into_iter()
    .collect()
}

fn effects() -> EffectTable {
    EffectTable::new()
        .with("eat", vec![StatDelta::new("hunger", -1.0)])
        .with("drink", vec![StatDelta::new("thirst", -2.0)])
}

fn stats() -> StatBlock {
    StatBlock::new()
        .with("hunger", BoundedStat::new(50.0, 0.0, 100.0))
        .with("thirst", BoundedStat::new(50.0, 0.0, 100.0))
}

fn movement() -> TimedMovement {
    let config = MovementConfig {
        default_travel_minutes: 3,
        approach_minutes: 1,
        ..MovementConfig::default()
    };
    TimedMovement::new(config, 1)
}

fn eat(id: u32, start: TimeOfDay, end: TimeOfDay) -> Activity {
    Activity::new(ActivityId(id), "eat", start, end, 3)
        .at("tavern", "table")
        .with_reference(format!("mem-{id}"))
}

type TestSim<D> = Sim<D, TimedMovement, EffectTable>;

fn build<D: DecisionMaker>(
    start:      TimeOfDay,
    location:   &str,
    decision:   D,
    activities: Vec<Activity>,
) -> TestSim<D> {
    let config = config(start);
    let (arena, rngs) = AgentArenaBuilder::new(config.seed)
        .start_time(start)
        .default_stats(stats())
        .agent("ada", location)
        .build();
    SimBuilder::new(config, arena, rngs, decision, movement(), effects())
        .targets(tavern())
        .schedules(vec![activities])
        .build()
        .unwrap()
}

fn phase<D: DecisionMaker>(sim: &TestSim<D>) -> BehaviorPhase {
    sim.agents.machines[0].phase()
}

#[derive(Default)]
struct Recorder {
    feedback:    Vec<FeedbackRecord>,
    perceptions: Vec<PerceptionEvent>,
    phases:      Vec<PhaseChange>,
    summaries:   Vec<TickSummary>,
    snapshots:   Vec<u64>,
    ended:       bool,
}

impl SimObserver for Recorder {
    fn on_phase_change(&mut self, change: &PhaseChange) {
        self.phases.push(change.clone());
    }

    fn on_feedback(&mut self, record: &FeedbackRecord) {
        self.feedback.push(record.clone());
    }

    fn on_perception(&mut self, event: &PerceptionEvent) {
        self.perceptions.push(event.clone());
    }

    fn on_tick_end(&mut self, summary: &TickSummary) {
        self.summaries.push(summary.clone());
    }

    fn on_snapshot(&mut self, tick: u64, _now: TimeOfDay, _agents: &npc_agent::AgentArena) {
        self.snapshots.push(tick);
    }

    fn on_sim_end(&mut self, _now: TimeOfDay) {
        self.ended = true;
    }
}

/// Decision-maker that answers every perception the same way and hands out
/// pre-loaded commands on the next poll.
#[derive(Default)]
struct Scripted {
    accept:      bool,
    perceptions: Vec<PerceptionEvent>,
    feedback:    Vec<FeedbackRecord>,
    phases_seen: Vec<BehaviorPhase>,
    queued:      Vec<(AgentId, DecisionCommand)>,
}

impl Scripted {
    fn accepting() -> Self {
        Self { accept: true, ..Self::default() }
    }
}

impl DecisionMaker for Scripted {
    fn on_perception(&mut self, event: &PerceptionEvent, ctx: &DecisionContext<'_>) -> bool {
        self.perceptions.push(event.clone());
        self.phases_seen.push(ctx.phase);
        self.accept
    }

    fn on_feedback(&mut self, record: &FeedbackRecord) {
        self.feedback.push(record.clone());
    }

    fn poll(&mut self, _now: TimeOfDay) -> Vec<(AgentId, DecisionCommand)> {
        std::mem::take(&mut self.queued)
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use super::*;

    #[test]
    fn mismatched_activity_lists_rejected() {
        let config = config(t(8, 0));
        let (arena, rngs) = AgentArenaBuilder::new(0).agent("ada", "house").build();
        let result = SimBuilder::new(config, arena, rngs, NoopDecisionMaker, movement(), effects())
            .schedules(vec![vec![], vec![]])
            .build();
        assert!(matches!(
            result,
            Err(SimError::AgentCountMismatch { expected: 1, got: 2, .. })
        ));
    }

    #[test]
    fn invalid_config_rejected() {
        let config = SimConfig { minutes_per_tick: 0, ..SimConfig::default() };
        let (arena, rngs) = AgentArenaBuilder::new(0).agent("ada", "house").build();
        let result =
            SimBuilder::new(config, arena, rngs, NoopDecisionMaker, movement(), effects()).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn initial_rows_go_through_push_back() {
        let minor = Activity::new(ActivityId(1), "read", t(8, 10), t(8, 20), 5).at("house", "chair");
        let major = Activity::new(ActivityId(2), "work", t(8, 0), t(8, 30), 1).at("smithy", "anvil");
        let sim = build(t(8, 0), "house", NoopDecisionMaker, vec![minor, major]);

        let schedule = &sim.agents.schedules[0];
        let minor = schedule.get(ActivityId(1)).unwrap();
        assert_eq!(minor.start_time, t(8, 31));
        assert_eq!(minor.end_time, t(8, 41));
    }

    #[test]
    fn clock_starts_at_config_start() {
        let sim = build(t(7, 30), "house", NoopDecisionMaker, vec![]);
        assert_eq!(sim.now(), t(7, 30));
        assert_eq!(sim.clock.ticks_elapsed, 0);
    }
}

// ── Idle timeout ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod idle {
    use super::*;

    #[test]
    fn fires_exactly_once_at_threshold() {
        let mut sim = build(t(8, 0), "house", Scripted::default(), vec![]);
        let mut rec = Recorder::default();
        // 08:00 through 08:19.
        sim.run_ticks(20, &mut rec).unwrap();

        assert_eq!(rec.perceptions.len(), 1);
        let event = &rec.perceptions[0];
        assert_eq!(event.kind, PerceptionKind::IdleTimeout);
        assert_eq!(event.time, t(8, 10));
        assert_eq!(event.location, "house");
        assert_eq!(sim.decision.perceptions.len(), 1);
        assert_eq!(sim.decision.phases_seen, vec![BehaviorPhase::Waiting]);
    }

    #[test]
    fn declined_perception_rearms_timer() {
        let mut sim = build(t(8, 0), "house", Scripted::default(), vec![]);
        let mut rec = Recorder::default();
        sim.run_ticks(21, &mut rec).unwrap();

        let times: Vec<TimeOfDay> = rec.perceptions.iter().map(|p| p.time).collect();
        assert_eq!(times, vec![t(8, 10), t(8, 20)]);
        assert_eq!(phase(&sim), BehaviorPhase::Waiting);
    }

    #[test]
    fn busy_agent_never_idles() {
        let mut sim = build(t(8, 0), "tavern", Scripted::default(), vec![eat(1, t(8, 0), t(9, 0))]);
        sim.run_ticks(30, &mut NoopObserver).unwrap();
        assert!(sim.decision.perceptions.is_empty());
        assert_eq!(phase(&sim), BehaviorPhase::Interacting);
    }
}

// ── Interaction ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod interaction {
    use super::*;

    #[test]
    fn twenty_five_minute_window_applies_five_cycles() {
        // One minute to reach the table, so the session spans 08:00..08:25.
        let mut sim = build(t(7, 59), "tavern", Scripted::default(), vec![eat(1, t(7, 59), t(8, 25))]);
        let mut rec = Recorder::default();
        sim.run_ticks(30, &mut rec).unwrap();

        assert_eq!(rec.feedback.len(), 1);
        let record = &rec.feedback[0];
        assert!(record.success);
        assert_eq!(record.time, t(8, 25));
        assert_eq!(record.action, "eat");
        assert_eq!(record.target, "table");
        assert_eq!(record.reference_id.as_deref(), Some("mem-1"));
        assert_eq!(record.deltas.get("hunger"), Some(&-5.0));
        assert_eq!(sim.agents.stats[0].value("hunger"), Some(45.0));

        assert_eq!(phase(&sim), BehaviorPhase::Waiting);
        assert!(sim.agents.sessions[0].is_none());
        assert!(sim.agents.schedules[0].get(ActivityId(1)).unwrap().is_completed());
        assert_eq!(sim.agents.schedules[0].current(), None);
        assert_eq!(sim.decision.feedback.len(), 1);
    }

    #[test]
    fn progress_is_visible_mid_cycle() {
        let mut sim = build(t(7, 59), "tavern", NoopDecisionMaker, vec![eat(1, t(7, 59), t(8, 25))]);
        // 07:59 .. 08:02: session opened at 08:00, two minutes in.
        sim.run_ticks(4, &mut NoopObserver).unwrap();

        let view = sim.view(ADA).unwrap();
        assert_eq!(view.phase, BehaviorPhase::Interacting);
        assert_eq!(view.activity, Some(ActivityId(1)));
        assert_eq!(view.progress, Some(0.4));
    }

    #[test]
    fn coarse_tick_past_window_end_still_completes() {
        let config = SimConfig { minutes_per_tick: 5, ..config(t(7, 55)) };
        let (arena, rngs) = AgentArenaBuilder::new(0)
            .start_time(t(7, 55))
            .default_stats(stats())
            .agent("ada", "tavern")
            .build();
        let mut sim = SimBuilder::new(config, arena, rngs, NoopDecisionMaker, movement(), effects())
            .targets(tavern())
            .schedules(vec![vec![eat(1, t(7, 55), t(8, 22))]])
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        // 07:55 start, 08:00 arrival, cycles at 08:05..08:20, 08:25 past the end.
        sim.run_ticks(7, &mut rec).unwrap();

        assert_eq!(rec.feedback.len(), 1);
        assert!(rec.feedback[0].success);
        assert_eq!(rec.feedback[0].deltas.get("hunger"), Some(&-4.0));
        assert_eq!(phase(&sim), BehaviorPhase::Waiting);
    }

    #[test]
    fn lost_target_aborts_session() {
        let mut sim = build(t(7, 59), "tavern", NoopDecisionMaker, vec![eat(1, t(7, 59), t(8, 25))]);
        let mut rec = Recorder::default();
        sim.run_ticks(3, &mut rec).unwrap();
        assert_eq!(phase(&sim), BehaviorPhase::Interacting);

        sim.targets.set_active("table", false);
        sim.step(&mut rec).unwrap();

        assert_eq!(rec.feedback.len(), 1);
        assert!(!rec.feedback[0].success);
        assert!(rec.feedback[0].description.contains("table"));
        assert_eq!(phase(&sim), BehaviorPhase::Waiting);
        assert!(sim.agents.schedules[0].get(ActivityId(1)).unwrap().is_completed());
    }

    #[test]
    fn effect_failure_aborts_session() {
        let juggle = Activity::new(ActivityId(1), "juggle", t(7, 59), t(8, 25), 3).at("tavern", "table");
        let mut sim = build(t(7, 59), "tavern", NoopDecisionMaker, vec![juggle]);
        let mut rec = Recorder::default();
        // First cycle due at 08:05.
        sim.run_ticks(7, &mut rec).unwrap();

        assert_eq!(rec.feedback.len(), 1);
        let record = &rec.feedback[0];
        assert!(!record.success);
        assert_eq!(record.time, t(8, 5));
        assert!(record.description.contains("juggle"));
        assert!(record.deltas.is_empty());
        assert_eq!(phase(&sim), BehaviorPhase::Waiting);
    }

    #[test]
    fn invalid_cycle_fails_on_arrival() {
        let mut sim = build(t(7, 59), "tavern", NoopDecisionMaker, vec![]);
        sim.targets.insert(Interactable::new("stool", "tavern", 0));
        sim.add_activity(
            ADA,
            Activity::new(ActivityId(1), "eat", t(7, 59), t(8, 25), 3).at("tavern", "stool"),
        )
        .unwrap();
        let mut rec = Recorder::default();
        sim.run_ticks(2, &mut rec).unwrap();

        assert_eq!(rec.feedback.len(), 1);
        assert!(!rec.feedback[0].success);
        assert_eq!(rec.feedback[0].time, t(8, 0));
        assert!(sim.agents.sessions[0].is_none());
        assert_eq!(phase(&sim), BehaviorPhase::Waiting);
        assert!(sim.agents.schedules[0].get(ActivityId(1)).unwrap().is_completed());
    }
}

// ── Movement ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod movement {
    use super::*;

    #[test]
    fn travels_to_location_then_target() {
        let mut sim = build(t(8, 0), "house", NoopDecisionMaker, vec![eat(1, t(8, 0), t(9, 0))]);
        let mut rec = Recorder::default();

        sim.step(&mut rec).unwrap();
        assert_eq!(phase(&sim), BehaviorPhase::MovingToLocation);
        assert_eq!(sim.agents.locations[0], "house");

        // Three minutes of travel, one to approach.
        sim.run_ticks(3, &mut rec).unwrap();
        assert_eq!(phase(&sim), BehaviorPhase::MovingToInteractable);
        assert_eq!(sim.agents.locations[0], "tavern");

        sim.step(&mut rec).unwrap();
        assert_eq!(phase(&sim), BehaviorPhase::Interacting);

        let path: Vec<BehaviorPhase> = rec.phases.iter().map(|c| c.to).collect();
        assert_eq!(
            path,
            vec![
                BehaviorPhase::MovingToLocation,
                BehaviorPhase::MovingToInteractable,
                BehaviorPhase::Interacting,
            ]
        );
    }

    #[test]
    fn blocked_target_retries_alternate() {
        let mut sim = build(t(8, 0), "tavern", NoopDecisionMaker, vec![eat(1, t(8, 0), t(9, 0))]);
        sim.movement.block_target("table");
        let mut rec = Recorder::default();
        sim.run_ticks(3, &mut rec).unwrap();

        assert!(rec.feedback.is_empty());
        assert!(rec.perceptions.is_empty());
        assert_eq!(phase(&sim), BehaviorPhase::Interacting);
        let engagement = sim.agents.machines[0].engagement().unwrap();
        assert_eq!(engagement.target_name, "bench");
        assert_eq!(engagement.tried_targets(), ["table".to_owned()]);
        assert_eq!(sim.agents.sessions[0].as_ref().unwrap().target(), "bench");
    }

    #[test]
    fn blocked_without_alternate_gives_up() {
        let mut sim = build(t(8, 0), "tavern", NoopDecisionMaker, vec![eat(1, t(8, 0), t(9, 0))]);
        sim.movement.block_target("table");
        sim.movement.block_target("bench");
        let mut rec = Recorder::default();
        sim.run_ticks(3, &mut rec).unwrap();

        assert_eq!(rec.feedback.len(), 1);
        assert!(!rec.feedback[0].success);
        assert_eq!(rec.perceptions.len(), 1);
        let event = &rec.perceptions[0];
        assert_eq!(event.kind, PerceptionKind::NoReachableInteractable);
        assert_eq!(event.activity, Some(ActivityId(1)));
        assert_eq!(event.location, "tavern");

        assert_eq!(phase(&sim), BehaviorPhase::Waiting);
        assert!(sim.agents.schedules[0].get(ActivityId(1)).unwrap().is_completed());
        assert_eq!(sim.agents.schedules[0].current(), None);
    }

    #[test]
    fn blocked_location_reports_no_path() {
        let mut sim = build(t(8, 0), "house", NoopDecisionMaker, vec![eat(1, t(8, 0), t(9, 0))]);
        sim.movement.block_location("tavern");
        let mut rec = Recorder::default();
        sim.run_ticks(2, &mut rec).unwrap();

        assert_eq!(rec.perceptions.len(), 1);
        assert_eq!(rec.perceptions[0].kind, PerceptionKind::NoPathToLocation);
        assert_eq!(rec.perceptions[0].location, "house");
        assert_eq!(rec.feedback.len(), 1);
        assert_eq!(phase(&sim), BehaviorPhase::Waiting);
    }

    #[test]
    fn window_elapsing_before_arrival_fails_activity() {
        let mut sim = build(t(8, 0), "house", NoopDecisionMaker, vec![eat(1, t(8, 0), t(8, 2))]);
        let mut rec = Recorder::default();
        sim.run_ticks(4, &mut rec).unwrap();

        assert_eq!(rec.feedback.len(), 1);
        assert!(!rec.feedback[0].success);
        assert_eq!(rec.feedback[0].time, t(8, 3));
        assert_eq!(phase(&sim), BehaviorPhase::Waiting);
        assert!(sim.movement.state(ADA).is_some_and(|s| s.goal.is_none()));
    }

    #[test]
    fn window_elapsing_during_approach_fails_activity() {
        // Already at the tavern; the one-minute approach lands on the window end.
        let mut sim = build(t(8, 0), "tavern", NoopDecisionMaker, vec![eat(1, t(8, 0), t(8, 1))]);
        let mut rec = Recorder::default();
        sim.run_ticks(4, &mut rec).unwrap();

        assert_eq!(rec.feedback.len(), 1);
        let record = &rec.feedback[0];
        assert!(!record.success);
        assert_eq!(record.time, t(8, 1));
        assert_eq!(record.description, "activity ended before interaction began");
        assert!(record.deltas.is_empty());
        assert_eq!(phase(&sim), BehaviorPhase::Waiting);
        assert!(sim.agents.sessions[0].is_none());
        assert!(sim.agents.schedules[0].get(ActivityId(1)).unwrap().is_completed());
    }
}

// ── Preemption ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod preemption {
    use super::*;

    fn drink(id: u32, start: TimeOfDay, end: TimeOfDay) -> Activity {
        Activity::new(ActivityId(id), "drink", start, end, 5).at("tavern", "bench")
    }

    #[test]
    fn override_releases_before_starting() {
        let mut sim = build(t(7, 59), "tavern", NoopDecisionMaker, vec![eat(1, t(7, 59), t(8, 30))]);
        let mut rec = Recorder::default();
        // 07:59 .. 08:05: one cycle applied.
        sim.run_ticks(7, &mut rec).unwrap();
        assert_eq!(phase(&sim), BehaviorPhase::Interacting);
        rec.phases.clear();

        sim.force_override(ADA, drink(2, t(8, 6), t(8, 20))).unwrap();
        sim.step(&mut rec).unwrap();

        assert_eq!(rec.feedback.len(), 1);
        let record = &rec.feedback[0];
        assert_eq!(record.activity, ActivityId(1));
        assert!(!record.success);
        assert_eq!(record.description, "preempted by another activity");
        assert_eq!(record.deltas.get("hunger"), Some(&-1.0));

        let path: Vec<(BehaviorPhase, BehaviorPhase)> =
            rec.phases.iter().map(|c| (c.from, c.to)).collect();
        assert_eq!(
            path,
            vec![
                (BehaviorPhase::Interacting, BehaviorPhase::Waiting),
                (BehaviorPhase::Waiting, BehaviorPhase::MovingToInteractable),
            ]
        );
        assert_eq!(sim.agents.machines[0].servicing(), Some(ActivityId(2)));
        assert!(sim.agents.schedules[0].get(ActivityId(1)).unwrap().is_completed());
    }

    #[test]
    fn more_important_activity_takes_over() {
        let urgent = Activity::new(ActivityId(2), "drink", t(8, 3), t(8, 20), 1).at("tavern", "bench");
        let mut sim = build(t(7, 59), "tavern", NoopDecisionMaker, vec![eat(1, t(7, 59), t(8, 30))]);
        let mut rec = Recorder::default();
        sim.run_ticks(2, &mut rec).unwrap();
        sim.add_activity(ADA, urgent).unwrap();

        // 08:01, 08:02 continue eating; 08:03 the drink window opens.
        sim.run_ticks(3, &mut rec).unwrap();

        assert_eq!(rec.feedback.len(), 1);
        assert_eq!(rec.feedback[0].activity, ActivityId(1));
        assert_eq!(rec.feedback[0].time, t(8, 3));
        assert_eq!(sim.agents.schedules[0].current(), Some(ActivityId(2)));
        assert_eq!(sim.agents.machines[0].servicing(), Some(ActivityId(2)));
    }

    #[test]
    fn removing_serviced_activity_stops_agent() {
        let mut sim = build(t(8, 0), "house", NoopDecisionMaker, vec![eat(1, t(8, 0), t(9, 0))]);
        sim.step(&mut NoopObserver).unwrap();
        assert_eq!(phase(&sim), BehaviorPhase::MovingToLocation);

        assert!(sim.remove_activity(ADA, ActivityId(1)).unwrap());
        let mut rec = Recorder::default();
        sim.step(&mut rec).unwrap();

        assert_eq!(phase(&sim), BehaviorPhase::Waiting);
        assert_eq!(rec.feedback.len(), 1);
        assert!(sim.movement.state(ADA).is_some_and(|s| s.goal.is_none()));
    }

    #[test]
    fn removing_activity_while_approaching_target_fails_it() {
        let mut sim = build(t(8, 0), "tavern", NoopDecisionMaker, vec![eat(1, t(8, 0), t(9, 0))]);
        sim.step(&mut NoopObserver).unwrap();
        assert_eq!(phase(&sim), BehaviorPhase::MovingToInteractable);

        assert!(sim.remove_activity(ADA, ActivityId(1)).unwrap());
        let mut rec = Recorder::default();
        sim.run_ticks(3, &mut rec).unwrap();

        assert_eq!(rec.feedback.len(), 1);
        assert_eq!(rec.feedback[0].activity, ActivityId(1));
        assert!(!rec.feedback[0].success);
        assert_eq!(rec.feedback[0].time, t(8, 1));
        assert_eq!(phase(&sim), BehaviorPhase::Waiting);
        assert!(sim.agents.sessions[0].is_none());
        assert_eq!(sim.agents.machines[0].servicing(), None);
    }
}

// ── Decisions ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod decisions {
    use super::*;

    fn locked_sim() -> TestSim<Scripted> {
        let mut sim = build(t(8, 0), "tavern", Scripted::accepting(), vec![]);
        sim.run_ticks(11, &mut NoopObserver).unwrap();
        assert_eq!(phase(&sim), BehaviorPhase::WaitingForExternalDecision);
        assert!(sim.agents.machines[0].is_locked());
        sim
    }

    #[test]
    fn lock_blocks_schedule_selection() {
        let mut sim = locked_sim();
        sim.add_activity(ADA, eat(1, t(8, 11), t(8, 40))).unwrap();
        let mut rec = Recorder::default();
        sim.run_ticks(5, &mut rec).unwrap();

        assert_eq!(phase(&sim), BehaviorPhase::WaitingForExternalDecision);
        assert!(rec.phases.is_empty());
        assert_eq!(sim.agents.machines[0].servicing(), None);
        assert!(rec.summaries.iter().all(|s| s.locked == 1));
    }

    #[test]
    fn decline_returns_to_waiting_and_schedule_resumes() {
        let mut sim = locked_sim();
        sim.add_activity(ADA, eat(1, t(8, 11), t(8, 40))).unwrap();

        assert!(sim.resolve_reactive(ADA, false, None).unwrap());
        assert_eq!(phase(&sim), BehaviorPhase::Waiting);
        assert!(!sim.agents.machines[0].is_locked());

        sim.step(&mut NoopObserver).unwrap();
        assert_eq!(phase(&sim), BehaviorPhase::MovingToInteractable);
    }

    #[test]
    fn accept_starts_supplied_activity() {
        let mut sim = locked_sim();
        assert_eq!(sim.now(), t(8, 11));

        assert!(sim.resolve_reactive(ADA, true, Some(eat(7, t(8, 11), t(8, 40)))).unwrap());
        assert_eq!(phase(&sim), BehaviorPhase::MovingToInteractable);
        assert_eq!(sim.agents.schedules[0].current(), Some(ActivityId(7)));
        assert_eq!(sim.agents.machines[0].servicing(), Some(ActivityId(7)));

        // The next selection agrees with the machine and leaves it alone.
        let mut rec = Recorder::default();
        sim.step(&mut rec).unwrap();
        assert!(rec.feedback.is_empty());
        assert_eq!(sim.agents.machines[0].servicing(), Some(ActivityId(7)));
    }

    #[test]
    fn accepted_future_activity_waits_for_window() {
        let mut sim = locked_sim();
        assert!(sim.resolve_reactive(ADA, true, Some(eat(7, t(8, 30), t(8, 40)))).unwrap());
        assert_eq!(phase(&sim), BehaviorPhase::Waiting);
        assert!(sim.agents.schedules[0].get(ActivityId(7)).is_some());
    }

    #[test]
    fn resolve_without_pending_decision_is_noop() {
        let mut sim = build(t(8, 0), "tavern", NoopDecisionMaker, vec![eat(1, t(8, 0), t(9, 0))]);
        sim.step(&mut NoopObserver).unwrap();
        let before = phase(&sim);

        assert!(!sim.resolve_reactive(ADA, true, Some(eat(7, t(8, 1), t(8, 40)))).unwrap());
        assert_eq!(phase(&sim), before);
        assert!(sim.agents.schedules[0].get(ActivityId(7)).is_none());
    }

    #[test]
    fn override_clears_lock() {
        let mut sim = locked_sim();
        sim.force_override(ADA, eat(9, t(8, 11), t(8, 40))).unwrap();

        assert!(!sim.agents.machines[0].is_locked());
        assert_eq!(phase(&sim), BehaviorPhase::MovingToInteractable);
        assert_eq!(sim.agents.machines[0].servicing(), Some(ActivityId(9)));
    }

    #[test]
    fn submitted_commands_wait_for_tick_boundary() {
        let mut sim = build(t(8, 0), "tavern", NoopDecisionMaker, vec![]);
        sim.submit(ADA, DecisionCommand::Add(eat(1, t(8, 0), t(9, 0))));
        assert!(sim.agents.schedules[0].is_empty());

        sim.step(&mut NoopObserver).unwrap();
        assert_eq!(sim.agents.schedules[0].current(), Some(ActivityId(1)));
        assert_eq!(phase(&sim), BehaviorPhase::MovingToInteractable);
    }

    #[test]
    fn polled_resolve_unlocks_next_tick() {
        let mut sim = locked_sim();
        sim.decision.queued.push((
            ADA,
            DecisionCommand::Resolve { accept: true, activity: Some(eat(3, t(8, 11), t(8, 30))) },
        ));
        sim.step(&mut NoopObserver).unwrap();

        assert!(!sim.agents.machines[0].is_locked());
        assert_eq!(sim.agents.machines[0].servicing(), Some(ActivityId(3)));
    }

    #[test]
    fn rejected_command_is_not_fatal() {
        let mut sim = build(t(8, 0), "tavern", NoopDecisionMaker, vec![eat(1, t(8, 0), t(9, 0))]);
        // Same id again.
        sim.submit(ADA, DecisionCommand::Add(eat(1, t(10, 0), t(11, 0))));
        sim.submit(AgentId(42), DecisionCommand::Remove(ActivityId(1)));
        sim.step(&mut NoopObserver).unwrap();

        assert_eq!(sim.agents.schedules[0].len(), 1);
        assert_eq!(sim.agents.schedules[0].current(), Some(ActivityId(1)));
    }
}

// ── Schedule API ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod schedule_api {
    use super::*;

    #[test]
    fn export_restore_round_trip() {
        let mut sim = build(
            t(8, 0),
            "house",
            NoopDecisionMaker,
            vec![eat(1, t(8, 0), t(9, 0)), eat(2, t(10, 0), t(11, 0))],
        );
        sim.step(&mut NoopObserver).unwrap();
        let snapshot = sim.export_schedule(ADA).unwrap();

        sim.remove_activity(ADA, ActivityId(2)).unwrap();
        assert_eq!(sim.agents.schedules[0].len(), 1);

        sim.restore_schedule(ADA, snapshot.clone()).unwrap();
        assert_eq!(sim.export_schedule(ADA).unwrap(), snapshot);
        assert_eq!(sim.agents.schedules[0].current(), Some(ActivityId(1)));
    }

    #[test]
    fn priority_rejection_reported_synchronously() {
        let mut sim = build(t(8, 0), "house", NoopDecisionMaker, vec![eat(1, t(8, 0), t(9, 0))]);
        let minor = Activity::new(ActivityId(2), "nap", t(8, 30), t(8, 45), 9).at("house", "bed");
        assert!(matches!(sim.add_activity(ADA, minor), Err(SimError::Schedule(_))));
        assert_eq!(sim.agents.schedules[0].len(), 1);
    }

    #[test]
    fn unknown_agent_is_an_error() {
        let mut sim = build(t(8, 0), "house", NoopDecisionMaker, vec![]);
        let ghost = AgentId(3);
        assert!(matches!(sim.export_schedule(ghost), Err(SimError::UnknownAgent(_))));
        assert!(matches!(
            sim.add_activity(ghost, eat(1, t(8, 0), t(9, 0))),
            Err(SimError::UnknownAgent(_))
        ));
        assert!(sim.view(ghost).is_none());
    }
}

// ── Clock and run control ─────────────────────────────────────────────────────

#[cfg(test)]
mod run_control {
    use super::*;

    #[test]
    fn paused_step_does_nothing() {
        let mut sim = build(t(8, 0), "tavern", NoopDecisionMaker, vec![eat(1, t(8, 0), t(9, 0))]);
        sim.pause();
        assert!(sim.step(&mut NoopObserver).unwrap().is_none());
        assert_eq!(sim.now(), t(8, 0));
        assert_eq!(phase(&sim), BehaviorPhase::Waiting);

        sim.resume();
        let summary = sim.step(&mut NoopObserver).unwrap().unwrap();
        assert_eq!(summary.time, t(8, 0));
        assert_eq!(summary.started, 1);
        assert_eq!(sim.now(), t(8, 1));
    }

    #[test]
    fn run_stops_at_total_ticks() {
        let mut sim = build(t(8, 0), "house", NoopDecisionMaker, vec![]);
        sim.config.total_ticks = 5;
        sim.config.output_interval_ticks = 2;
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();

        assert_eq!(sim.clock.ticks_elapsed, 5);
        assert_eq!(sim.now(), t(8, 5));
        assert_eq!(rec.summaries.len(), 5);
        assert_eq!(rec.snapshots, vec![0, 2, 4]);
        assert!(rec.ended);
    }

    #[test]
    fn run_returns_when_paused() {
        let mut sim = build(t(8, 0), "house", NoopDecisionMaker, vec![]);
        sim.pause();
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();
        assert!(rec.summaries.is_empty());
        assert!(rec.ended);
    }

    #[test]
    fn summaries_count_events() {
        let mut sim = build(t(8, 0), "house", Scripted::default(), vec![]);
        let mut rec = Recorder::default();
        sim.run_ticks(11, &mut rec).unwrap();

        let idle = &rec.summaries[10];
        assert_eq!(idle.time, t(8, 10));
        assert_eq!(idle.perceptions, 1);
        assert_eq!(idle.feedback, 0);
        assert_eq!(rec.summaries.iter().map(|s| s.perceptions).sum::<usize>(), 1);
    }
}
