//! `InteractionSession` — a resumable, tick-driven effect loop.
//!
//! # Lifecycle
//!
//! ```text
//! begin ──▶ tick ──▶ tick ──▶ … ──▶ terminal report (exactly once)
//!            │
//!            ├─ target gone/inactive      → Aborted(TargetLost)
//!            ├─ accumulated ≥ cycle       → apply one cycle (repeat while true)
//!            │    └─ executor error       → Aborted(EffectFailed)
//!            └─ now ≥ window end          → Completed
//! ```
//!
//! `begin` itself refuses a window that has already closed (`WindowElapsed`).
//!
//! All progress lives in plain fields, so suspension between ticks is just
//! returning to the caller.  Cycles are applied before the window-end check:
//! a 25-minute window with a 5-minute cycle applies exactly 5 cycles.  Time
//! past the window end is never accumulated, so a coarse final tick cannot
//! sneak in an extra cycle.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use npc_core::TimeOfDay;

use crate::{EffectExecutor, Interactable, SessionAbort, StatBlock, TargetRegistry};

/// How a session ended.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionOutcome {
    /// The window ended normally.
    Completed,
    Aborted(SessionAbort),
    /// The owning activity was force-completed by the schedule.
    Preempted,
}

impl SessionOutcome {
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, SessionOutcome::Completed)
    }

    pub fn describe(&self) -> String {
        match self {
            SessionOutcome::Completed => "completed".to_owned(),
            SessionOutcome::Aborted(abort) => abort.to_string(),
            SessionOutcome::Preempted => "preempted by another activity".to_owned(),
        }
    }
}

/// Terminal summary handed back exactly once per session.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionReport {
    pub outcome: SessionOutcome,
    pub cycles:  u32,
    /// Cumulative post-clamp deltas over every applied cycle.
    pub deltas:  BTreeMap<String, f64>,
}

/// Runtime state of one interaction.  Never persisted.
#[derive(Clone, Debug)]
pub struct InteractionSession {
    action:        String,
    target:        String,
    window_end:    TimeOfDay,
    cycle_minutes: u64,
    /// Minutes accumulated since the last cycle boundary.
    accumulated:   u64,
    last_tick:     TimeOfDay,
    cycles:        u32,
    applied:       BTreeMap<String, f64>,
    finished:      bool,
}

impl InteractionSession {
    /// Open a session on `target` at `now`.
    ///
    /// # Errors
    ///
    /// [`SessionAbort::InvalidCycleDuration`] if the target's cycle is not
    /// positive.  No session exists in that case; the caller reports the
    /// failure directly.
    pub fn begin(
        action:     impl Into<String>,
        target:     &Interactable,
        window_end: TimeOfDay,
        now:        TimeOfDay,
    ) -> Result<Self, SessionAbort> {
        if window_end <= now {
            return Err(SessionAbort::WindowElapsed);
        }
        let cycle_minutes = u64::try_from(target.cycle_minutes)
            .ok()
            .filter(|&c| c > 0)
            .ok_or(SessionAbort::InvalidCycleDuration(target.cycle_minutes))?;

        let action = action.into();
        debug!(%action, target = %target.name, %window_end, cycle_minutes, "interaction session opened");
        Ok(Self {
            action,
            target: target.name.clone(),
            window_end,
            cycle_minutes,
            accumulated: 0,
            last_tick: now,
            cycles: 0,
            applied: BTreeMap::new(),
            finished: false,
        })
    }

    // ── Read access ───────────────────────────────────────────────────────

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn window_end(&self) -> TimeOfDay {
        self.window_end
    }

    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Fraction of the current cycle completed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        (self.accumulated as f64 / self.cycle_minutes as f64).clamp(0.0, 1.0)
    }

    // ── Driving ───────────────────────────────────────────────────────────

    /// Advance to `now`.  Returns the terminal report on the tick the
    /// session ends, `None` otherwise (and always `None` once finished).
    pub fn tick<R, E>(
        &mut self,
        now:     TimeOfDay,
        targets: &R,
        effects: &mut E,
        stats:   &mut StatBlock,
    ) -> Option<SessionReport>
    where
        R: TargetRegistry + ?Sized,
        E: EffectExecutor + ?Sized,
    {
        if self.finished {
            return None;
        }

        let Some(target) = targets.get(&self.target).filter(|t| t.active) else {
            return self.end(SessionOutcome::Aborted(SessionAbort::TargetLost(self.target.clone())));
        };

        let until = now.min(self.window_end);
        self.accumulated += until.since(self.last_tick);
        self.last_tick = self.last_tick.max(until);

        while self.accumulated >= self.cycle_minutes {
            match effects.apply_cycle(&self.action, target, stats) {
                Ok(deltas) => {
                    for (stat, delta) in deltas {
                        *self.applied.entry(stat).or_insert(0.0) += delta;
                    }
                    self.accumulated -= self.cycle_minutes;
                    self.cycles += 1;
                    trace!(action = %self.action, cycle = self.cycles, "effect cycle applied");
                }
                Err(e) => return self.end(SessionOutcome::Aborted(e.into())),
            }
        }

        if now >= self.window_end {
            return self.end(SessionOutcome::Completed);
        }
        None
    }

    /// Cancel because the owning activity was force-completed.  Applied
    /// cycles are kept.
    pub fn preempt(&mut self) -> Option<SessionReport> {
        self.end(SessionOutcome::Preempted)
    }

    /// Terminate with `outcome`.  Only the first call yields a report.
    pub fn end(&mut self, outcome: SessionOutcome) -> Option<SessionReport> {
        if self.finished {
            return None;
        }
        self.finished = true;
        debug!(
            action = %self.action,
            target = %self.target,
            cycles = self.cycles,
            outcome = %outcome.describe(),
            "interaction session ended"
        );
        Some(SessionReport {
            outcome,
            cycles: self.cycles,
            deltas: std::mem::take(&mut self.applied),
        })
    }
}
