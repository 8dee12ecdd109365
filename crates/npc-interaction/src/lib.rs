//! `npc-interaction` — what happens once an agent reaches its target.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`session`] | `InteractionSession` — resumable, tick-driven effect cycles     |
//! | [`target`]  | `Interactable`, `TargetRegistry` trait, `TargetTable`           |
//! | [`stat`]    | `BoundedStat`, `StatBlock` — clamped numeric agent state        |
//! | [`effect`]  | `EffectExecutor` trait, `EffectTable`, `StatDelta`              |
//! | [`error`]   | `SessionAbort`, `EffectError`, `EffectResult<T>`                |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                         |
//! |-----------|----------------------------------------------------------------|
//! | `fx-hash` | `TargetTable` and `EffectTable` use `FxHashMap` instead of `HashMap`. |

pub mod effect;
pub mod error;
pub mod session;
pub mod stat;
pub mod target;


pub use effect::{EffectExecutor, EffectTable, StatDelta};
pub use error::{EffectError, EffectResult, SessionAbort};
pub use session::{InteractionSession, SessionOutcome, SessionReport};
pub use stat::{BoundedStat, StatBlock};
pub use target::{Interactable, TargetRegistry, TargetTable};

// ── Map type ──────────────────────────────────────────────────────────────────

#[cfg(feature = "fx-hash")]
pub(crate) type NameMap<V> = rustc_hash::FxHashMap<String, V>;

#[cfg(not(feature = "fx-hash"))]
pub(crate) type NameMap<V> = std::collections::HashMap<String, V>;
