//! Unit tests for npc-behavior.

use npc_core::{ActivityId, AgentId, TimeOfDay};
use npc_schedule::{Activity, Schedule};

use crate::{
    BehaviorError, BehaviorMachine, BehaviorPhase, Blocked, DecisionContext, DecisionMaker,
    EventChannel, FeedbackRecord, Intent, MoveGoal, NoopDecisionMaker, OutboundEvent,
    PerceptionEvent, PerceptionKind,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn t(h: u32, m: u32) -> TimeOfDay {
    TimeOfDay::hm(h, m)
}

fn eat() -> Activity {
    Activity::new(ActivityId(1), "eat", t(8, 0), t(8, 30), 2)
        .at("tavern", "table")
        .with_reference("mem-1")
}

/// A machine that has reached `Interacting` on `eat()` from the tavern.
fn interacting() -> BehaviorMachine {
    let mut m = BehaviorMachine::new(t(8, 0));
    m.start(&eat(), "tavern", t(8, 0)).unwrap();
    m.arrived_at_target(t(8, 2)).unwrap();
    m
}

fn locked() -> BehaviorMachine {
    let mut m = BehaviorMachine::new(t(8, 0));
    m.await_decision(t(8, 10)).unwrap();
    m
}

fn move_to_target(location: &str, target: &str) -> Intent {
    Intent::MoveTo(MoveGoal::Target { location: location.into(), target: target.into() })
}

// ── start ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod start {
    use super::*;

    #[test]
    fn spawns_waiting_and_idle() {
        let m = BehaviorMachine::new(t(6, 0));
        assert_eq!(m.phase(), BehaviorPhase::Waiting);
        assert_eq!(m.idle_since(), Some(t(6, 0)));
        assert!(!m.is_locked());
        assert!(m.servicing().is_none());
    }

    #[test]
    fn elsewhere_moves_to_location() {
        let mut m = BehaviorMachine::new(t(8, 0));
        let tr = m.start(&eat(), "house", t(8, 0)).unwrap();
        assert_eq!(tr.from, BehaviorPhase::Waiting);
        assert_eq!(tr.to, BehaviorPhase::MovingToLocation);
        assert_eq!(tr.intents, vec![Intent::MoveTo(MoveGoal::Location("tavern".into()))]);
        assert_eq!(m.servicing(), Some(ActivityId(1)));
        assert_eq!(m.idle_since(), None);
    }

    #[test]
    fn already_there_moves_to_interactable() {
        let mut m = BehaviorMachine::new(t(8, 0));
        let tr = m.start(&eat(), "tavern", t(8, 0)).unwrap();
        assert_eq!(tr.to, BehaviorPhase::MovingToInteractable);
        assert_eq!(tr.intents, vec![move_to_target("tavern", "table")]);
    }

    #[test]
    fn restart_runs_exit_before_entry() {
        let mut m = interacting();
        let work = Activity::new(ActivityId(2), "work", t(8, 10), t(9, 0), 1).at("smithy", "anvil");
        let tr = m.start(&work, "tavern", t(8, 10)).unwrap();
        assert_eq!(tr.from, BehaviorPhase::Interacting);
        assert_eq!(tr.to, BehaviorPhase::MovingToLocation);
        assert_eq!(
            tr.intents,
            vec![Intent::CloseInteraction, Intent::MoveTo(MoveGoal::Location("smithy".into()))]
        );
        assert_eq!(tr.released.map(|e| e.activity), Some(ActivityId(1)));
        assert_eq!(m.servicing(), Some(ActivityId(2)));
    }
}

// ── Movement ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod movement {
    use super::*;

    #[test]
    fn full_approach_sequence() {
        let mut m = BehaviorMachine::new(t(8, 0));
        m.start(&eat(), "house", t(8, 0)).unwrap();

        let tr = m.arrived_at_location(t(8, 5)).unwrap();
        assert_eq!(tr.to, BehaviorPhase::MovingToInteractable);
        assert_eq!(tr.intents, vec![Intent::StopMovement, move_to_target("tavern", "table")]);

        let tr = m.arrived_at_target(t(8, 6)).unwrap();
        assert_eq!(tr.to, BehaviorPhase::Interacting);
        assert_eq!(
            tr.intents,
            vec![Intent::StopMovement, Intent::OpenInteraction { target: "table".into() }]
        );
    }

    #[test]
    fn stale_arrival_is_illegal() {
        let mut m = BehaviorMachine::new(t(8, 0));
        let err = m.arrived_at_target(t(8, 0)).unwrap_err();
        assert_eq!(
            err,
            BehaviorError::IllegalTrigger { phase: BehaviorPhase::Waiting, trigger: "arrived_at_target" }
        );
        assert_eq!(m.phase(), BehaviorPhase::Waiting);
    }

    #[test]
    fn blocked_with_alternate_retries() {
        let mut m = BehaviorMachine::new(t(8, 0));
        m.start(&eat(), "tavern", t(8, 0)).unwrap();

        match m.movement_blocked(Some("bench".into()), t(8, 1)).unwrap() {
            Blocked::Retry(tr) => {
                assert_eq!(tr.from, BehaviorPhase::MovingToInteractable);
                assert_eq!(tr.to, BehaviorPhase::MovingToInteractable);
                assert_eq!(tr.intents, vec![move_to_target("tavern", "bench")]);
            }
            other => panic!("expected retry, got {other:?}"),
        }
        let e = m.engagement().unwrap();
        assert_eq!(e.target_name, "bench");
        assert_eq!(e.tried_targets(), ["table".to_string()]);
        assert!(e.has_tried("table"));
        assert!(e.has_tried("bench"));
        assert!(!e.has_tried("stool"));
    }

    #[test]
    fn blocked_without_alternate_gives_up() {
        let mut m = BehaviorMachine::new(t(8, 0));
        m.start(&eat(), "tavern", t(8, 0)).unwrap();

        match m.movement_blocked(None, t(8, 1)).unwrap() {
            Blocked::GaveUp { kind, transition } => {
                assert_eq!(kind, PerceptionKind::NoReachableInteractable);
                assert_eq!(transition.to, BehaviorPhase::Waiting);
                assert_eq!(transition.intents, vec![Intent::StopMovement]);
                assert_eq!(transition.released.map(|e| e.activity), Some(ActivityId(1)));
            }
            other => panic!("expected give-up, got {other:?}"),
        }
        assert_eq!(m.phase(), BehaviorPhase::Waiting);
        assert_eq!(m.idle_since(), Some(t(8, 1)));
    }

    #[test]
    fn blocked_on_way_to_location_reports_no_path() {
        let mut m = BehaviorMachine::new(t(8, 0));
        m.start(&eat(), "house", t(8, 0)).unwrap();
        match m.movement_blocked(Some("bench".into()), t(8, 1)).unwrap() {
            Blocked::GaveUp { kind, .. } => assert_eq!(kind, PerceptionKind::NoPathToLocation),
            other => panic!("expected give-up, got {other:?}"),
        }
    }

    #[test]
    fn blocked_while_waiting_is_illegal() {
        let mut m = BehaviorMachine::new(t(8, 0));
        assert!(matches!(
            m.movement_blocked(None, t(8, 0)),
            Err(BehaviorError::IllegalTrigger { .. })
        ));
    }
}

// ── Interaction / abandon ─────────────────────────────────────────────────────

#[cfg(test)]
mod finish {
    use super::*;

    #[test]
    fn finish_returns_to_waiting() {
        let mut m = interacting();
        let tr = m.finish_interaction(t(8, 30)).unwrap();
        assert_eq!(tr.to, BehaviorPhase::Waiting);
        assert_eq!(tr.intents, vec![Intent::CloseInteraction]);
        assert!(m.servicing().is_none());
        assert_eq!(m.idle_since(), Some(t(8, 30)));
    }

    #[test]
    fn finish_outside_interaction_is_illegal() {
        let mut m = BehaviorMachine::new(t(8, 0));
        assert!(m.finish_interaction(t(8, 0)).is_err());
    }

    #[test]
    fn abandon_from_waiting_is_noop() {
        let mut m = BehaviorMachine::new(t(8, 0));
        assert!(m.abandon(t(8, 5)).unwrap().is_noop());
        assert_eq!(m.idle_since(), Some(t(8, 0)));
    }

    #[test]
    fn abandon_releases_engagement() {
        let mut m = interacting();
        let tr = m.abandon(t(8, 10)).unwrap();
        assert_eq!(tr.intents, vec![Intent::CloseInteraction]);
        assert!(tr.released.is_some());
        assert_eq!(m.phase(), BehaviorPhase::Waiting);
    }
}

// ── Idle ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod idle {
    use super::*;

    #[test]
    fn elapses_at_threshold_not_before() {
        let m = BehaviorMachine::new(t(8, 0));
        assert!(!m.idle_elapsed(t(8, 9), 10));
        assert!(m.idle_elapsed(t(8, 10), 10));
    }

    #[test]
    fn rearm_restarts_timer() {
        let mut m = BehaviorMachine::new(t(8, 0));
        m.rearm_idle(t(8, 10));
        assert!(!m.idle_elapsed(t(8, 15), 10));
        assert!(m.idle_elapsed(t(8, 20), 10));
    }

    #[test]
    fn busy_agent_never_idle() {
        let m = interacting();
        assert!(!m.idle_elapsed(t(12, 0), 10));
    }
}

// ── Decision lock ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod lock {
    use super::*;

    #[test]
    fn await_decision_locks() {
        let m = locked();
        assert_eq!(m.phase(), BehaviorPhase::WaitingForExternalDecision);
        assert!(m.is_locked());
        assert!(!m.idle_elapsed(t(9, 0), 10));
    }

    #[test]
    fn every_other_trigger_rejected_while_locked() {
        let mut m = locked();
        let now = t(8, 11);

        assert!(matches!(m.start(&eat(), "tavern", now), Err(BehaviorError::Locked { .. })));
        assert!(matches!(m.arrived_at_location(now), Err(BehaviorError::Locked { .. })));
        assert!(matches!(m.arrived_at_target(now), Err(BehaviorError::Locked { .. })));
        assert!(matches!(m.movement_blocked(None, now), Err(BehaviorError::Locked { .. })));
        assert!(matches!(m.finish_interaction(now), Err(BehaviorError::Locked { .. })));
        assert!(matches!(m.abandon(now), Err(BehaviorError::Locked { .. })));
        assert!(matches!(m.await_decision(now), Err(BehaviorError::Locked { .. })));

        assert_eq!(m.phase(), BehaviorPhase::WaitingForExternalDecision);
        assert!(m.servicing().is_none());
    }

    #[test]
    fn declined_returns_to_previous_phase() {
        let mut m = locked();
        let tr = m.resolve(false, None, "house", t(8, 12)).unwrap();
        assert_eq!(tr.to, BehaviorPhase::Waiting);
        assert!(!m.is_locked());
        assert_eq!(m.idle_since(), Some(t(8, 12)));
    }

    #[test]
    fn accepted_activity_starts_directly() {
        let mut m = locked();
        let tr = m.resolve(true, Some(&eat()), "house", t(8, 12)).unwrap();
        assert_eq!(tr.from, BehaviorPhase::WaitingForExternalDecision);
        assert_eq!(tr.to, BehaviorPhase::MovingToLocation);
        assert_eq!(m.servicing(), Some(ActivityId(1)));
        assert!(!m.is_locked());
    }

    #[test]
    fn accept_without_activity_behaves_like_decline() {
        let mut m = locked();
        let tr = m.resolve(true, None, "house", t(8, 12)).unwrap();
        assert_eq!(tr.to, BehaviorPhase::Waiting);
    }

    #[test]
    fn resolve_when_unlocked_is_noop() {
        let mut m = interacting();
        assert!(m.resolve(true, Some(&eat()), "tavern", t(8, 12)).is_none());
        assert_eq!(m.phase(), BehaviorPhase::Interacting);
    }

    #[test]
    fn locking_mid_movement_resumes_movement() {
        let mut m = BehaviorMachine::new(t(8, 0));
        m.start(&eat(), "house", t(8, 0)).unwrap();
        let tr = m.await_decision(t(8, 1)).unwrap();
        assert_eq!(tr.intents, vec![Intent::StopMovement]);

        let tr = m.resolve(false, None, "house", t(8, 2)).unwrap();
        assert_eq!(tr.to, BehaviorPhase::MovingToLocation);
        assert_eq!(tr.intents, vec![Intent::MoveTo(MoveGoal::Location("tavern".into()))]);
        assert_eq!(m.servicing(), Some(ActivityId(1)));
    }
}

// ── Events & channel ──────────────────────────────────────────────────────────

#[cfg(test)]
mod events {
    use super::*;

    #[test]
    fn feedback_copies_engagement() {
        let m = interacting();
        let record = FeedbackRecord::for_engagement(
            AgentId(3),
            t(8, 30),
            m.engagement().unwrap(),
            true,
            "finished",
        );
        assert_eq!(record.agent, AgentId(3));
        assert_eq!(record.activity, ActivityId(1));
        assert_eq!(record.location, "tavern");
        assert_eq!(record.target, "table");
        assert_eq!(record.action, "eat");
        assert_eq!(record.reference_id.as_deref(), Some("mem-1"));
        assert!(record.deltas.is_empty());
    }

    #[test]
    fn channel_drains_in_order() {
        let mut channel = EventChannel::new();
        let m = interacting();
        channel.emit_perception(PerceptionEvent {
            agent:       AgentId(0),
            time:        t(8, 0),
            kind:        PerceptionKind::IdleTimeout,
            location:    "house".into(),
            description: "idle".into(),
            activity:    None,
        });
        channel.emit_feedback(FeedbackRecord::for_engagement(
            AgentId(0),
            t(8, 1),
            m.engagement().unwrap(),
            false,
            "blocked",
        ));
        assert_eq!(channel.len(), 2);

        let drained: Vec<_> = channel.drain().collect();
        assert!(matches!(drained[0], OutboundEvent::Perception(_)));
        assert!(matches!(drained[1], OutboundEvent::Feedback(_)));
        assert!(channel.is_empty());
    }

    #[test]
    fn kind_names() {
        assert_eq!(PerceptionKind::IdleTimeout.to_string(), "idle_timeout");
        assert_eq!(BehaviorPhase::WaitingForExternalDecision.to_string(), "waiting_for_decision");
    }

    #[test]
    fn noop_decision_maker_declines() {
        let schedule = Schedule::new();
        let ctx = DecisionContext::new(
            t(8, 0),
            AgentId(0),
            "ada",
            BehaviorPhase::Waiting,
            "house",
            &schedule,
        );
        let event = PerceptionEvent {
            agent:       AgentId(0),
            time:        t(8, 0),
            kind:        PerceptionKind::IdleTimeout,
            location:    "house".into(),
            description: String::new(),
            activity:    None,
        };
        let mut noop = NoopDecisionMaker;
        assert!(!noop.on_perception(&event, &ctx));
        assert!(noop.poll(t(8, 0)).is_empty());
    }
}
