//! `npc-schedule` — one agent's timeline of time-boxed, prioritised activities.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`activity`]  | `Activity`, `ActivityPayload`                             |
//! | [`schedule`]  | `Schedule` — add / remove / update / complete / replace   |
//! | [`snapshot`]  | `ScheduleSnapshot` — persistence hook (JSON)              |
//! | [`loader`]    | `load_activities_csv`, `load_activities_reader`           |
//! | [`error`]     | `ScheduleError`, `ScheduleResult<T>`                      |
//!
//! # Selection model (summary)
//!
//! ```text
//! priority: lower value = more important
//! window:   closed interval [start_time, end_time]
//! add:      reject if a conflicting activity is more important,
//!           otherwise push every conflict back to new.end + gap
//! update:   the most important activity whose window contains `now`
//!           becomes current; a better candidate force-completes it
//! ```

pub mod activity;
pub mod error;
pub mod loader;
pub mod schedule;
pub mod snapshot;


pub use activity::{Activity, ActivityPayload};
pub use error::{ScheduleError, ScheduleResult};
pub use loader::{load_activities_csv, load_activities_reader};
pub use schedule::Schedule;
pub use snapshot::ScheduleSnapshot;
