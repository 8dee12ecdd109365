//! `npc-core` — foundational types for the `rust_npc` behavior core.
//!
//! This crate is a dependency of every other `npc-*` crate.  It has no
//! `npc-*` dependencies of its own.
//!
//! # What lives here
//!
//! | Module      | Contents                                               |
//! |-------------|--------------------------------------------------------|
//! | [`ids`]     | `AgentId`, `ActivityId`                                |
//! | [`time`]    | `TimeOfDay`, `SimClock`, the `Clock` trait             |
//! | [`config`]  | `SimConfig` (TOML-loadable run configuration)          |
//! | [`rng`]     | `AgentRng` (per-agent deterministic RNG)               |
//! | [`error`]   | `CoreError`, `CoreResult`                              |

pub mod config;
pub mod error;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::SimConfig;
pub use error::{CoreError, CoreResult};
pub use ids::{ActivityId, AgentId};
pub use rng::AgentRng;
pub use time::{Clock, SimClock, TimeOfDay};
