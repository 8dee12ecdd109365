//! `Schedule` — conflict resolution and "what runs now" selection.
//!
//! # Conflict resolution
//!
//! `add` looks at every non-completed activity whose window overlaps the new
//! one.  A single more-important conflict (lower `priority` value) rejects
//! the add outright and leaves the schedule untouched.  Otherwise every
//! conflict is pushed back so it starts `gap` minutes after the new activity
//! ends, keeping its duration.
//!
//! The push-back is a single pass: a pushed activity is not re-checked
//! against the activities that already sat at its new position, so a cascade
//! can leave two activities overlapping.  The schedule keeps that behavior
//! and logs any residual overlap it creates; [`Schedule::conflicts`] lists
//! them for callers that want to re-plan.
//!
//! # Ordering
//!
//! `activities` is re-sorted by `(start_time, priority)` after every
//! mutation, so iteration order is always chronological.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use npc_core::{ActivityId, TimeOfDay};

use crate::{Activity, ScheduleError, ScheduleResult, ScheduleSnapshot};

/// Default minutes between a displacing activity's end and the start of the
/// activity it pushed back.
pub const DEFAULT_PUSH_BACK_GAP: u64 = 1;

/// An ordered collection of time-boxed activities for one agent.
#[derive(Clone, Debug)]
pub struct Schedule {
    /// Sorted ascending by `(start_time, priority)`.
    activities: Vec<Activity>,
    /// The activity selected for execution, if any.
    current: Option<ActivityId>,
    /// Earliest activity starting after the last idle `update`.  Informational.
    upcoming: Option<ActivityId>,
    push_back_gap: u64,
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new()
    }
}

impl Schedule {
    /// An empty schedule with the default one-minute push-back gap.
    pub fn new() -> Self {
        Self::with_gap(DEFAULT_PUSH_BACK_GAP)
    }

    pub fn with_gap(push_back_gap: u64) -> Self {
        Self {
            activities: Vec::new(),
            current:    None,
            upcoming:   None,
            push_back_gap,
        }
    }

    // ── Read access ───────────────────────────────────────────────────────

    /// Read-only slice of all activities, sorted by `(start_time, priority)`.
    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    pub fn get(&self, id: ActivityId) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id == id)
    }

    pub fn current(&self) -> Option<ActivityId> {
        self.current
    }

    pub fn current_activity(&self) -> Option<&Activity> {
        self.current.and_then(|id| self.get(id))
    }

    pub fn upcoming(&self) -> Option<ActivityId> {
        self.upcoming
    }

    pub fn push_back_gap(&self) -> u64 {
        self.push_back_gap
    }

    /// Every pair of non-completed activities whose windows overlap.
    ///
    /// Empty unless a cascading push-back (or a restored snapshot) left
    /// residual overlaps behind.
    pub fn conflicts(&self) -> Vec<(ActivityId, ActivityId)> {
        let open: Vec<&Activity> = self.activities.iter().filter(|a| !a.is_completed).collect();
        let mut pairs = Vec::new();
        for (i, a) in open.iter().enumerate() {
            for b in &open[i + 1..] {
                // Sorted by start: once b starts after a ends, nothing later overlaps a.
                if b.start_time > a.end_time {
                    break;
                }
                if a.overlaps(b) {
                    pairs.push((a.id, b.id));
                }
            }
        }
        pairs
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Insert `activity`, resolving time conflicts by priority.
    ///
    /// # Errors
    ///
    /// - [`ScheduleError::InvalidWindow`] if `start_time >= end_time`.
    /// - [`ScheduleError::DuplicateId`] if the id is already scheduled.
    /// - [`ScheduleError::RejectedByPriority`] if any overlapping,
    ///   non-completed activity is more important.
    ///
    /// On error the schedule is unchanged.
    pub fn add(&mut self, activity: Activity) -> ScheduleResult<()> {
        self.check_insertable(&activity)?;

        let conflicts = self.conflicting_indices(&activity);

        let blocker = conflicts
            .iter()
            .map(|&i| &self.activities[i])
            .filter(|other| other.priority < activity.priority)
            .min_by_key(|other| other.priority);
        if let Some(blocker) = blocker {
            debug!(
                id = %activity.id,
                blocker = %blocker.id,
                "activity rejected by a more important conflict"
            );
            return Err(ScheduleError::RejectedByPriority {
                id:               activity.id,
                priority:         activity.priority,
                blocker:          blocker.id,
                blocker_priority: blocker.priority,
            });
        }

        self.push_back(&conflicts, activity.end_time);
        debug!(
            id = %activity.id,
            action = %activity.action_name,
            start = %activity.start_time,
            end = %activity.end_time,
            pushed = conflicts.len(),
            "activity scheduled"
        );
        self.activities.push(activity);
        self.sort();
        self.warn_residual_conflicts();
        Ok(())
    }

    /// Preemptive insert: complete the current activity at `now`, push back
    /// every overlapping activity regardless of priority, then insert.
    ///
    /// Returns the id of the activity that was force-completed, if any.
    pub fn insert_override(
        &mut self,
        activity: Activity,
        now:      TimeOfDay,
    ) -> ScheduleResult<Option<ActivityId>> {
        self.check_insertable(&activity)?;

        let completed = self.complete_current(now);
        let conflicts = self.conflicting_indices(&activity);
        self.push_back(&conflicts, activity.end_time);
        debug!(
            id = %activity.id,
            action = %activity.action_name,
            pushed = conflicts.len(),
            "override scheduled"
        );
        self.activities.push(activity);
        self.sort();
        self.warn_residual_conflicts();
        Ok(completed)
    }

    /// Delete the activity with `id`.  Clears `current` if it was current.
    ///
    /// Returns whether anything was removed.
    pub fn remove(&mut self, id: ActivityId) -> bool {
        let before = self.activities.len();
        self.activities.retain(|a| a.id != id);
        let removed = self.activities.len() != before;
        if removed {
            if self.current == Some(id) {
                self.current = None;
            }
            if self.upcoming == Some(id) {
                self.upcoming = None;
            }
            debug!(%id, "activity removed");
        }
        removed
    }

    /// Per-tick selection.  Returns the id of a *newly* selected current
    /// activity, or `None` if the current one continues or nothing is due.
    ///
    /// When a better candidate appears (or the current activity's window has
    /// passed) the current activity is force-completed before the new one is
    /// selected, so there is never more than one current activity.
    pub fn update(&mut self, now: TimeOfDay) -> Option<ActivityId> {
        if let Some(cur) = self.current {
            // Most important first; among equals the most recently started.
            let best = self
                .activities
                .iter()
                .filter(|a| !a.is_completed && a.contains(now))
                .min_by(|a, b| {
                    a.priority
                        .cmp(&b.priority)
                        .then_with(|| b.start_time.cmp(&a.start_time))
                })
                .map(|a| a.id);

            match best {
                Some(id) if id != cur => {
                    debug!(preempted = %cur, by = %id, %now, "current activity preempted");
                    self.complete_current(now);
                }
                None if self.get(cur).is_none_or(|a| now > a.end_time) => {
                    debug!(%cur, %now, "current activity window elapsed");
                    self.complete_current(now);
                }
                _ => return None,
            }
        }

        // Most important first; among equals the earliest start.  The vector
        // is sorted by (start, priority) so a stable min keeps the earliest.
        let pick = self
            .activities
            .iter()
            .filter(|a| !a.is_completed && a.contains(now))
            .min_by_key(|a| a.priority)
            .map(|a| a.id);

        self.upcoming = self
            .activities
            .iter()
            .find(|a| !a.is_completed && a.start_time > now)
            .map(|a| a.id);

        if let Some(id) = pick {
            self.current = Some(id);
            debug!(%id, %now, "activity selected");
        }
        pick
    }

    /// Mark the current activity completed at `now` and clear `current`.
    ///
    /// Idempotent: with no current activity this does nothing and returns
    /// `None`.
    pub fn complete_current(&mut self, now: TimeOfDay) -> Option<ActivityId> {
        let id = self.current.take()?;
        if let Some(a) = self.activities.iter_mut().find(|a| a.id == id) {
            a.end_time = now;
            a.is_completed = true;
        }
        debug!(%id, %now, "activity completed");
        Some(id)
    }

    /// Wholesale re-plan.
    ///
    /// Completion flags carry over for ids present in both the old and the
    /// new set, and the current activity stays current if its id survives
    /// (and it was not already completed).
    ///
    /// # Errors
    ///
    /// [`ScheduleError::InvalidWindow`] or [`ScheduleError::DuplicateId`] if
    /// the new set is malformed; the schedule is then unchanged.
    pub fn replace_all(&mut self, new_activities: Vec<Activity>) -> ScheduleResult<()> {
        let mut seen = HashSet::with_capacity(new_activities.len());
        for a in &new_activities {
            // A completed activity may have been cut short to a zero-length window.
            if !a.is_completed {
                check_window(a)?;
            }
            if !seen.insert(a.id) {
                return Err(ScheduleError::DuplicateId(a.id));
            }
        }

        let completed: HashMap<ActivityId, bool> = self
            .activities
            .iter()
            .map(|a| (a.id, a.is_completed))
            .collect();

        self.activities = new_activities;
        for a in &mut self.activities {
            if completed.get(&a.id).copied().unwrap_or(false) {
                a.is_completed = true;
            }
        }
        self.sort();

        self.current = self
            .current
            .filter(|id| self.get(*id).is_some_and(|a| !a.is_completed));
        self.upcoming = None;
        debug!(count = self.activities.len(), current = ?self.current, "schedule replaced");
        self.warn_residual_conflicts();
        Ok(())
    }

    // ── Persistence ───────────────────────────────────────────────────────

    /// Capture the activity list and current selection verbatim.
    pub fn snapshot(&self) -> ScheduleSnapshot {
        ScheduleSnapshot {
            activities: self.activities.clone(),
            current:    self.current,
        }
    }

    /// Rebuild from a snapshot taken by [`snapshot`](Self::snapshot).
    ///
    /// The push-back gap is kept from `self`.
    pub fn restore(&mut self, snapshot: ScheduleSnapshot) -> ScheduleResult<()> {
        let mut seen = HashSet::with_capacity(snapshot.activities.len());
        for a in &snapshot.activities {
            if !seen.insert(a.id) {
                return Err(ScheduleError::DuplicateId(a.id));
            }
            if !a.is_completed {
                check_window(a)?;
            }
        }
        self.activities = snapshot.activities;
        self.sort();
        self.current = snapshot
            .current
            .filter(|id| self.get(*id).is_some_and(|a| !a.is_completed));
        self.upcoming = None;
        Ok(())
    }

    // ── Private helpers ───────────────────────────────────────────────────

    fn check_insertable(&self, activity: &Activity) -> ScheduleResult<()> {
        check_window(activity)?;
        if self.get(activity.id).is_some() {
            return Err(ScheduleError::DuplicateId(activity.id));
        }
        Ok(())
    }

    /// Indices of non-completed activities overlapping `activity`.
    fn conflicting_indices(&self, activity: &Activity) -> Vec<usize> {
        self.activities
            .iter()
            .enumerate()
            .filter(|(_, other)| !other.is_completed && other.overlaps(activity))
            .map(|(i, _)| i)
            .collect()
    }

    fn push_back(&mut self, indices: &[usize], displaced_by_end: TimeOfDay) {
        let new_start = displaced_by_end + self.push_back_gap;
        for &i in indices {
            let a = &mut self.activities[i];
            debug!(id = %a.id, from = %a.start_time, to = %new_start, "activity pushed back");
            a.shift_to(new_start);
        }
    }

    fn sort(&mut self) {
        self.activities.sort_by_key(|a| (a.start_time, a.priority));
    }

    fn warn_residual_conflicts(&self) {
        let residual = self.conflicts();
        if !residual.is_empty() {
            warn!(?residual, "schedule holds overlapping activities after push-back");
        }
    }
}

fn check_window(activity: &Activity) -> ScheduleResult<()> {
    if activity.start_time >= activity.end_time {
        return Err(ScheduleError::InvalidWindow {
            id:    activity.id,
            start: activity.start_time,
            end:   activity.end_time,
        });
    }
    Ok(())
}
