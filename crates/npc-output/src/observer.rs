//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use npc_agent::AgentArena;
use npc_behavior::{FeedbackRecord, PerceptionEvent};
use npc_core::TimeOfDay;
use npc_sim::{SimObserver, TickSummary};

use crate::row::{AgentSnapshotRow, FeedbackRow, PerceptionRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes feedback, perceptions, tick summaries, and
/// agent snapshots to any [`OutputWriter`] backend (CSV, SQLite, …).
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// The first write error seen during the run, or `None` on a clean run.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Hand back the backend, e.g. to read the files it produced.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            self.last_error.get_or_insert(e);
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_feedback(&mut self, record: &FeedbackRecord) {
        let result = FeedbackRow::from_record(record).and_then(|row| self.writer.write_feedback(&row));
        self.store_err(result);
    }

    fn on_perception(&mut self, event: &PerceptionEvent) {
        let result = self.writer.write_perception(&PerceptionRow::from(event));
        self.store_err(result);
    }

    fn on_tick_end(&mut self, summary: &TickSummary) {
        let result = self.writer.write_tick_summary(&TickSummaryRow::from(summary));
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: u64, now: TimeOfDay, agents: &AgentArena) {
        let rows: Vec<AgentSnapshotRow> = agents
            .agent_ids()
            .filter_map(|agent| agents.view(agent))
            .map(|view| AgentSnapshotRow::from_view(&view, tick, now))
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _now: TimeOfDay) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
