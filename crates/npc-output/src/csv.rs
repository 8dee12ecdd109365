//! CSV output backend.
//!
//! Creates four files in the configured output directory:
//! - `feedback.csv`
//! - `perceptions.csv`
//! - `tick_summaries.csv`
//! - `agent_snapshots.csv`
//!
//! Optional columns are written as empty fields.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::{AgentSnapshotRow, FeedbackRow, OutputResult, PerceptionRow, TickSummaryRow};
use crate::writer::OutputWriter;

/// Writes simulation output to four CSV files.
pub struct CsvWriter {
    feedback:    Writer<File>,
    perceptions: Writer<File>,
    summaries:   Writer<File>,
    snapshots:   Writer<File>,
    finished:    bool,
}

impl CsvWriter {
    /// Open (or create) the CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut feedback = Writer::from_path(dir.join("feedback.csv"))?;
        feedback.write_record([
            "agent_id", "activity_id", "time", "clock", "action", "location", "target",
            "success", "description", "deltas", "reference_id",
        ])?;

        let mut perceptions = Writer::from_path(dir.join("perceptions.csv"))?;
        perceptions.write_record([
            "agent_id", "time", "clock", "kind", "location", "description", "activity_id",
        ])?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record([
            "tick", "time", "started", "phase_changes", "feedback", "perceptions",
            "interacting", "locked",
        ])?;

        let mut snapshots = Writer::from_path(dir.join("agent_snapshots.csv"))?;
        snapshots.write_record([
            "agent_id", "tick", "time", "name", "location", "phase", "locked",
            "activity_id", "action", "progress",
        ])?;

        Ok(Self {
            feedback,
            perceptions,
            summaries,
            snapshots,
            finished: false,
        })
    }
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl OutputWriter for CsvWriter {
    fn write_feedback(&mut self, row: &FeedbackRow) -> OutputResult<()> {
        self.feedback.write_record(&[
            row.agent_id.to_string(),
            row.activity_id.to_string(),
            row.time.to_string(),
            row.clock.clone(),
            row.action.clone(),
            row.location.clone(),
            row.target.clone(),
            (row.success as u8).to_string(),
            row.description.clone(),
            row.deltas.clone(),
            row.reference_id.clone(),
        ])?;
        Ok(())
    }

    fn write_perception(&mut self, row: &PerceptionRow) -> OutputResult<()> {
        self.perceptions.write_record(&[
            row.agent_id.to_string(),
            row.time.to_string(),
            row.clock.clone(),
            row.kind.to_owned(),
            row.location.clone(),
            row.description.clone(),
            opt(row.activity_id),
        ])?;
        Ok(())
    }

    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.agent_id.to_string(),
                row.tick.to_string(),
                row.time.to_string(),
                row.name.clone(),
                row.location.clone(),
                row.phase.to_owned(),
                (row.locked as u8).to_string(),
                opt(row.activity_id),
                opt(row.action.as_deref()),
                opt(row.progress),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.time.to_string(),
            row.started.to_string(),
            row.phase_changes.to_string(),
            row.feedback.to_string(),
            row.perceptions.to_string(),
            row.interacting.to_string(),
            row.locked.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.feedback.flush()?;
        self.perceptions.flush()?;
        self.summaries.flush()?;
        self.snapshots.flush()?;
        Ok(())
    }
}
