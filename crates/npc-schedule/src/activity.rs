//! The scheduled unit of behavior.
//!
//! # Windows
//!
//! An activity occupies the **closed** interval `[start_time, end_time]`:
//! it is active at `now` iff `start_time <= now <= end_time`, and two
//! activities conflict if their closed intervals share any minute,
//! including the single minute where one ends and the next begins.  This is
//! why a pushed-back activity is placed `gap` minutes *after* the activity
//! that displaced it rather than exactly at its end.
//!
//! # Opaque fields
//!
//! `action_name`, `location_name`, and `target_name` are never interpreted
//! by the schedule; the movement and effect collaborators resolve them.
//! `payload` and `reference_id` are stored and handed back verbatim.

use serde::{Deserialize, Serialize};

use npc_core::{ActivityId, TimeOfDay};

// ── ActivityPayload ───────────────────────────────────────────────────────────

/// Passthrough data attached by the planner (action parameters, rationale).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityPayload {
    /// Free-form action parameters.
    #[serde(default)]
    pub parameters: serde_json::Value,

    /// Why the planner chose this activity.
    #[serde(default)]
    pub rationale: Option<String>,
}

// ── Activity ──────────────────────────────────────────────────────────────────

/// One time-boxed, prioritised unit of agent behavior.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,

    /// Symbolic verb, e.g. `"eat"`.  Dispatched by the effect executor.
    pub action_name: String,

    /// Where the agent must be.
    pub location_name: String,

    /// What the agent interacts with once there.
    pub target_name: String,

    pub start_time: TimeOfDay,
    pub end_time:   TimeOfDay,

    /// Lower value = more important.
    pub priority: i32,

    /// Reserved for planners; the schedule stores it and never consults it.
    #[serde(default)]
    pub is_flexible: bool,

    /// Set only by [`Schedule`](crate::Schedule); never reverts to `false`.
    #[serde(default)]
    pub(crate) is_completed: bool,

    #[serde(default)]
    pub payload: ActivityPayload,

    /// Correlates this activity with an external memory record for feedback.
    #[serde(default)]
    pub reference_id: Option<String>,
}

impl Activity {
    /// An activity with empty location/target and default payload.
    ///
    /// Chain [`at`](Self::at), [`flexible`](Self::flexible),
    /// [`with_reference`](Self::with_reference), … to fill in the rest.
    pub fn new(
        id:         ActivityId,
        action:     impl Into<String>,
        start_time: TimeOfDay,
        end_time:   TimeOfDay,
        priority:   i32,
    ) -> Self {
        Self {
            id,
            action_name:   action.into(),
            location_name: String::new(),
            target_name:   String::new(),
            start_time,
            end_time,
            priority,
            is_flexible:   false,
            is_completed:  false,
            payload:       ActivityPayload::default(),
            reference_id:  None,
        }
    }

    /// Set the destination and the object of interaction.
    pub fn at(mut self, location: impl Into<String>, target: impl Into<String>) -> Self {
        self.location_name = location.into();
        self.target_name = target.into();
        self
    }

    pub fn flexible(mut self, flexible: bool) -> Self {
        self.is_flexible = flexible;
        self
    }

    pub fn with_reference(mut self, reference_id: impl Into<String>) -> Self {
        self.reference_id = Some(reference_id.into());
        self
    }

    pub fn with_payload(mut self, payload: ActivityPayload) -> Self {
        self.payload = payload;
        self
    }

    #[inline]
    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    /// Planned length in minutes.
    #[inline]
    pub fn duration(&self) -> u64 {
        self.end_time - self.start_time
    }

    /// `true` if the closed window contains `now`.
    #[inline]
    pub fn contains(&self, now: TimeOfDay) -> bool {
        self.start_time <= now && now <= self.end_time
    }

    /// `true` if the two closed windows share at least one minute.
    #[inline]
    pub fn overlaps(&self, other: &Activity) -> bool {
        self.start_time <= other.end_time && other.start_time <= self.end_time
    }

    /// Move the window so it begins at `start`, keeping its duration.
    pub(crate) fn shift_to(&mut self, start: TimeOfDay) {
        let duration = self.duration();
        self.start_time = start;
        self.end_time = start + duration;
    }
}
