//! The `OutputWriter` trait implemented by all backend writers.

use crate::{AgentSnapshotRow, FeedbackRow, OutputResult, PerceptionRow, TickSummaryRow};

/// Trait implemented by the CSV and SQLite writers.
///
/// All methods are infallible from the observer's perspective: errors are
/// stored internally and retrieved with
/// [`SimOutputObserver::take_error`](crate::SimOutputObserver::take_error).
pub trait OutputWriter {
    /// Write one activity outcome.
    fn write_feedback(&mut self, row: &FeedbackRow) -> OutputResult<()>;

    /// Write one perception event.
    fn write_perception(&mut self, row: &PerceptionRow) -> OutputResult<()>;

    /// Write a batch of agent snapshots.
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()>;

    /// Write one tick summary row.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
