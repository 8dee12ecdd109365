//! `npc-output` — simulation output writers for the rust_npc behavior core.
//!
//! Two backends are provided:
//!
//! | Feature   | Backend | Files created                                                              |
//! |-----------|---------|----------------------------------------------------------------------------|
//! | *(none)*  | CSV     | `feedback.csv`, `perceptions.csv`, `tick_summaries.csv`, `agent_snapshots.csv` |
//! | `sqlite`  | SQLite  | `output.db`                                                                |
//!
//! Either backend plugs into a run through [`SimOutputObserver`], the
//! `npc_sim::SimObserver` adapter that turns feedback, perceptions and
//! snapshots into rows.
//!
//! # Usage
//!
//! ```rust,ignore
//! use npc_output::{CsvWriter, SimOutputObserver};
//!
//! let mut obs = SimOutputObserver::new(CsvWriter::new(Path::new("./out"))?);
//! sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     tracing::warn!(error = %e, "output incomplete");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{AgentSnapshotRow, FeedbackRow, PerceptionRow, TickSummaryRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
