//! `npc-agent` — the per-agent arena.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                     |
//! |-------------|--------------------------------------------------------------|
//! | [`arena`]   | `AgentArena` (parallel per-agent vectors), `AgentRngs`       |
//! | [`builder`] | `AgentArenaBuilder`, `AgentSpec`                             |
//! | [`view`]    | `AgentView` — read-only per-frame snapshot for UI / output   |
//!
//! # Why an arena?
//!
//! An agent's schedule, state machine, interaction session, and stats all
//! need to reach each other.  Instead of components holding references to
//! one another, every piece lives in its own `Vec` indexed by [`AgentId`],
//! and the simulation loop borrows exactly the slots it needs:
//!
//! ```ignore
//! let i = agent.index();
//! let selected = arena.schedules[i].update(now);
//! let transition = arena.machines[i].start(activity, &arena.locations[i], now)?;
//! ```
//!
//! [`AgentId`]: npc_core::AgentId

pub mod arena;
pub mod builder;
pub mod view;


pub use arena::{AgentArena, AgentRngs};
pub use builder::{AgentArenaBuilder, AgentSpec};
pub use view::AgentView;
