//! The behavior state machine.
//!
//! # Transitions
//!
//! | From                   | Trigger                         | To                        |
//! |------------------------|---------------------------------|---------------------------|
//! | any (unlocked)         | `start`, location differs       | `MovingToLocation`        |
//! | any (unlocked)         | `start`, already at location    | `MovingToInteractable`    |
//! | `MovingToLocation`     | `arrived_at_location`           | `MovingToInteractable`    |
//! | `MovingToInteractable` | `arrived_at_target`             | `Interacting`             |
//! | `MovingToInteractable` | `movement_blocked(Some(alt))`   | `MovingToInteractable`    |
//! | `MovingToInteractable` | `movement_blocked(None)`        | `Waiting`                 |
//! | `MovingToLocation`     | `movement_blocked(_)`           | `Waiting`                 |
//! | `Interacting`          | `finish_interaction`            | `Waiting`                 |
//! | any (unlocked)         | `abandon`                       | `Waiting`                 |
//! | any (unlocked)         | `await_decision`                | `WaitingForExternalDecision` (locks) |
//! | locked                 | `resolve`                       | previous phase, or `start` the supplied activity |
//!
//! Requesting the phase the machine is already in is a no-op.  While locked
//! every trigger except `resolve` returns [`BehaviorError::Locked`] and
//! leaves the machine untouched.

use tracing::debug;

use npc_core::{ActivityId, TimeOfDay};
use npc_schedule::Activity;

use crate::{BehaviorError, BehaviorPhase, BehaviorResult, Intent, MoveGoal, PerceptionKind};

// ── Engagement ────────────────────────────────────────────────────────────────

/// The activity the machine is currently servicing, copied out of the
/// schedule so the machine never borrows it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Engagement {
    pub activity:      ActivityId,
    pub action_name:   String,
    pub location_name: String,
    /// The interactable currently being approached.  Changes when a blocked
    /// target is swapped for an alternate.
    pub target_name:   String,
    pub reference_id:  Option<String>,
    tried_targets:     Vec<String>,
}

impl Engagement {
    pub fn from_activity(activity: &Activity) -> Self {
        Self {
            activity:      activity.id,
            action_name:   activity.action_name.clone(),
            location_name: activity.location_name.clone(),
            target_name:   activity.target_name.clone(),
            reference_id:  activity.reference_id.clone(),
            tried_targets: Vec::new(),
        }
    }

    /// Targets already abandoned because movement to them was blocked.
    pub fn tried_targets(&self) -> &[String] {
        &self.tried_targets
    }

    /// `true` if `target` is the current target or was already tried.
    pub fn has_tried(&self, target: &str) -> bool {
        self.target_name == target || self.tried_targets.iter().any(|t| t == target)
    }

    fn retarget(&mut self, target: String) {
        let previous = std::mem::replace(&mut self.target_name, target);
        self.tried_targets.push(previous);
    }
}

// ── Transition ────────────────────────────────────────────────────────────────

/// The result of one trigger.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub from:     BehaviorPhase,
    pub to:       BehaviorPhase,
    /// Exit actions of `from`, then entry actions of `to`.
    pub intents:  Vec<Intent>,
    /// The engagement dropped by this transition, if any.
    pub released: Option<Engagement>,
}

impl Transition {
    fn stay(phase: BehaviorPhase) -> Self {
        Self { from: phase, to: phase, intents: Vec::new(), released: None }
    }

    /// `true` if nothing changed.
    pub fn is_noop(&self) -> bool {
        self.from == self.to && self.intents.is_empty() && self.released.is_none()
    }
}

/// Outcome of [`BehaviorMachine::movement_blocked`].
#[derive(Clone, Debug, PartialEq)]
pub enum Blocked {
    /// An alternate target was accepted; movement is re-issued.
    Retry(Transition),
    /// The agent gave up and is back in `Waiting`.
    GaveUp {
        kind:       PerceptionKind,
        transition: Transition,
    },
}

// ── BehaviorMachine ───────────────────────────────────────────────────────────

/// Per-agent phase sequencer.
#[derive(Clone, Debug)]
pub struct BehaviorMachine {
    phase:        BehaviorPhase,
    /// Phase to return to when a declined decision unlocks the machine.
    resume_phase: BehaviorPhase,
    locked:       bool,
    engagement:   Option<Engagement>,
    /// When the current `Waiting` stretch began (or was last re-armed).
    idle_since:   Option<TimeOfDay>,
}

impl BehaviorMachine {
    /// A machine in `Waiting`, idle since `now`.
    pub fn new(now: TimeOfDay) -> Self {
        Self {
            phase:        BehaviorPhase::Waiting,
            resume_phase: BehaviorPhase::Waiting,
            locked:       false,
            engagement:   None,
            idle_since:   Some(now),
        }
    }

    // ── Read access ───────────────────────────────────────────────────────

    #[inline]
    pub fn phase(&self) -> BehaviorPhase {
        self.phase
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn engagement(&self) -> Option<&Engagement> {
        self.engagement.as_ref()
    }

    /// Id of the activity in service, if any.
    pub fn servicing(&self) -> Option<ActivityId> {
        self.engagement.as_ref().map(|e| e.activity)
    }

    pub fn idle_since(&self) -> Option<TimeOfDay> {
        self.idle_since
    }

    // ── Triggers ──────────────────────────────────────────────────────────

    /// Begin servicing `activity`.
    ///
    /// Any previous engagement is released first, so its exit actions come
    /// before the new entry actions.
    pub fn start(
        &mut self,
        activity:       &Activity,
        agent_location: &str,
        now:            TimeOfDay,
    ) -> BehaviorResult<Transition> {
        self.ensure_unlocked("start")?;
        Ok(self.begin(activity, agent_location, now))
    }

    pub fn arrived_at_location(&mut self, now: TimeOfDay) -> BehaviorResult<Transition> {
        self.ensure_unlocked("arrived_at_location")?;
        self.ensure_phase(BehaviorPhase::MovingToLocation, "arrived_at_location")?;
        Ok(self.go(BehaviorPhase::MovingToInteractable, now))
    }

    pub fn arrived_at_target(&mut self, now: TimeOfDay) -> BehaviorResult<Transition> {
        self.ensure_unlocked("arrived_at_target")?;
        self.ensure_phase(BehaviorPhase::MovingToInteractable, "arrived_at_target")?;
        Ok(self.go(BehaviorPhase::Interacting, now))
    }

    /// Movement failed.  `alternate` is another interactable at the same
    /// location that has not been tried yet; the caller looks it up.
    ///
    /// Blocked on the way to the location there is nothing to swap, so the
    /// agent gives up regardless of `alternate`.
    pub fn movement_blocked(
        &mut self,
        alternate: Option<String>,
        now:       TimeOfDay,
    ) -> BehaviorResult<Blocked> {
        self.ensure_unlocked("movement_blocked")?;
        match self.phase {
            BehaviorPhase::MovingToInteractable => match alternate {
                Some(target) => {
                    let engagement = self
                        .engagement
                        .as_mut()
                        .ok_or(BehaviorError::NotServicing { trigger: "movement_blocked" })?;
                    debug!(
                        from = %engagement.target_name,
                        to = %target,
                        activity = %engagement.activity,
                        "target blocked, retrying alternate"
                    );
                    engagement.retarget(target);
                    let goal = MoveGoal::Target {
                        location: engagement.location_name.clone(),
                        target:   engagement.target_name.clone(),
                    };
                    Ok(Blocked::Retry(Transition {
                        from:     self.phase,
                        to:       self.phase,
                        intents:  vec![Intent::MoveTo(goal)],
                        released: None,
                    }))
                }
                None => Ok(Blocked::GaveUp {
                    kind:       PerceptionKind::NoReachableInteractable,
                    transition: self.go(BehaviorPhase::Waiting, now),
                }),
            },
            BehaviorPhase::MovingToLocation => Ok(Blocked::GaveUp {
                kind:       PerceptionKind::NoPathToLocation,
                transition: self.go(BehaviorPhase::Waiting, now),
            }),
            phase => Err(BehaviorError::IllegalTrigger { phase, trigger: "movement_blocked" }),
        }
    }

    /// The interaction session terminated (normally or not).
    pub fn finish_interaction(&mut self, now: TimeOfDay) -> BehaviorResult<Transition> {
        self.ensure_unlocked("finish_interaction")?;
        self.ensure_phase(BehaviorPhase::Interacting, "finish_interaction")?;
        Ok(self.go(BehaviorPhase::Waiting, now))
    }

    /// Drop whatever is in service and return to `Waiting`.  Used on
    /// preemption.
    pub fn abandon(&mut self, now: TimeOfDay) -> BehaviorResult<Transition> {
        self.ensure_unlocked("abandon")?;
        Ok(self.go(BehaviorPhase::Waiting, now))
    }

    /// Enter `WaitingForExternalDecision` and lock.
    pub fn await_decision(&mut self, now: TimeOfDay) -> BehaviorResult<Transition> {
        self.ensure_unlocked("await_decision")?;
        self.resume_phase = self.phase;
        let transition = self.go(BehaviorPhase::WaitingForExternalDecision, now);
        self.locked = true;
        Ok(transition)
    }

    /// Answer a pending decision and unlock.
    ///
    /// `accept` with an activity starts it straight from the decision
    /// phase; anything else returns to the phase held before locking.
    /// Returns `None` (and does nothing) when the machine is not locked, so
    /// a late or duplicated answer is harmless.
    pub fn resolve(
        &mut self,
        accept:         bool,
        activity:       Option<&Activity>,
        agent_location: &str,
        now:            TimeOfDay,
    ) -> Option<Transition> {
        if !self.locked {
            debug!(accept, "decision ignored: not awaiting one");
            return None;
        }
        self.locked = false;
        let transition = match (accept, activity) {
            (true, Some(activity)) => self.begin(activity, agent_location, now),
            _ => self.go(self.resume_phase, now),
        };
        Some(transition)
    }

    // ── Idle tracking ─────────────────────────────────────────────────────

    /// `true` once the agent has been `Waiting` (unlocked) for at least
    /// `threshold_minutes`.
    pub fn idle_elapsed(&self, now: TimeOfDay, threshold_minutes: u64) -> bool {
        self.phase == BehaviorPhase::Waiting
            && !self.locked
            && self.idle_since.is_some_and(|since| now.since(since) >= threshold_minutes)
    }

    /// Restart the idle timer at `now` after an idle perception was raised.
    pub fn rearm_idle(&mut self, now: TimeOfDay) {
        if self.phase == BehaviorPhase::Waiting {
            self.idle_since = Some(now);
        }
    }

    // ── Private helpers ───────────────────────────────────────────────────

    fn ensure_unlocked(&self, trigger: &'static str) -> BehaviorResult<()> {
        if self.locked {
            return Err(BehaviorError::Locked { trigger });
        }
        Ok(())
    }

    fn ensure_phase(&self, expected: BehaviorPhase, trigger: &'static str) -> BehaviorResult<()> {
        if self.phase != expected {
            return Err(BehaviorError::IllegalTrigger { phase: self.phase, trigger });
        }
        Ok(())
    }

    fn begin(&mut self, activity: &Activity, agent_location: &str, now: TimeOfDay) -> Transition {
        let from = self.phase;
        let released = self.engagement.take();
        let engagement = Engagement::from_activity(activity);
        let to = if activity.location_name == agent_location {
            BehaviorPhase::MovingToInteractable
        } else {
            BehaviorPhase::MovingToLocation
        };

        let mut intents = exit_actions(from);
        intents.extend(entry_actions(to, Some(&engagement)));
        self.engagement = Some(engagement);
        self.enter(to, now);
        debug!(%from, %to, activity = %activity.id, "activity started");
        Transition { from, to, intents, released }
    }

    fn go(&mut self, to: BehaviorPhase, now: TimeOfDay) -> Transition {
        let from = self.phase;
        if from == to {
            return Transition::stay(from);
        }
        let mut intents = exit_actions(from);
        intents.extend(entry_actions(to, self.engagement.as_ref()));
        let released = if to == BehaviorPhase::Waiting { self.engagement.take() } else { None };
        self.enter(to, now);
        debug!(%from, %to, "phase transition");
        Transition { from, to, intents, released }
    }

    fn enter(&mut self, to: BehaviorPhase, now: TimeOfDay) {
        self.phase = to;
        self.idle_since = (to == BehaviorPhase::Waiting).then_some(now);
    }
}

fn exit_actions(phase: BehaviorPhase) -> Vec<Intent> {
    match phase {
        BehaviorPhase::MovingToLocation | BehaviorPhase::MovingToInteractable => {
            vec![Intent::StopMovement]
        }
        BehaviorPhase::Interacting => vec![Intent::CloseInteraction],
        BehaviorPhase::Waiting | BehaviorPhase::WaitingForExternalDecision => vec![],
    }
}

fn entry_actions(phase: BehaviorPhase, engagement: Option<&Engagement>) -> Vec<Intent> {
    let Some(e) = engagement else {
        return vec![];
    };
    match phase {
        BehaviorPhase::MovingToLocation => {
            vec![Intent::MoveTo(MoveGoal::Location(e.location_name.clone()))]
        }
        BehaviorPhase::MovingToInteractable => vec![Intent::MoveTo(MoveGoal::Target {
            location: e.location_name.clone(),
            target:   e.target_name.clone(),
        })],
        BehaviorPhase::Interacting => vec![Intent::OpenInteraction { target: e.target_name.clone() }],
        BehaviorPhase::Waiting | BehaviorPhase::WaitingForExternalDecision => vec![],
    }
}
