//! `npc-mobility` — carrying out `MoveTo` intents.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                        |
//! |--------------|-----------------------------------------------------------------|
//! | [`executor`] | `MovementExecutor` trait, `MovementEvent`                       |
//! | [`state`]    | `MovementState` — per-agent travel state                        |
//! | [`timed`]    | `TimedMovement` — reference executor with table-driven times    |
//! | [`config`]   | `MovementConfig`, `RouteTime`                                   |
//! | [`error`]    | `MobilityError`, `MobilityResult<T>`                            |
//!
//! # Movement model (teleport-at-arrival)
//!
//! Pathfinding is not the core's concern.  The executor accepts a goal,
//! decides on its own when the agent gets there, and reports back through
//! [`MovementExecutor::poll`]:
//!
//! 1. `move_to` records the goal and an arrival time (`now + travel`).
//! 2. The agent logically stays where it was until the arrival time.
//! 3. `poll(now)` yields `Arrived` for every agent whose arrival time has
//!    passed and `Blocked` for every goal the executor refused.
//!
//! Events may surface on any later tick, or on the same tick the command was
//! issued; npc-sim tolerates both.
//!
//! # Feature flags
//!
//! | Feature   | Effect                                                  |
//! |-----------|---------------------------------------------------------|
//! | `fx-hash` | Blocked location/target sets use `FxHashSet`.           |

pub mod config;
pub mod error;
pub mod executor;
pub mod state;
pub mod timed;


pub use config::{MovementConfig, RouteTime};
pub use error::{MobilityError, MobilityResult};
pub use executor::{MovementEvent, MovementExecutor};
pub use state::MovementState;
pub use timed::TimedMovement;

// ── Set type ──────────────────────────────────────────────────────────────────

#[cfg(feature = "fx-hash")]
pub(crate) type NameSet = rustc_hash::FxHashSet<String>;

#[cfg(not(feature = "fx-hash"))]
pub(crate) type NameSet = std::collections::HashSet<String>;
