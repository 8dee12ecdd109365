//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! four tables: `feedback`, `perceptions`, `tick_summaries`, and
//! `agent_snapshots`.

use std::path::Path;

use rusqlite::Connection;

use crate::{AgentSnapshotRow, FeedbackRow, OutputResult, PerceptionRow, TickSummaryRow};
use crate::writer::OutputWriter;

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS feedback (
                 agent_id     INTEGER NOT NULL,
                 activity_id  INTEGER NOT NULL,
                 time         INTEGER NOT NULL,
                 action       TEXT    NOT NULL,
                 location     TEXT    NOT NULL,
                 target       TEXT    NOT NULL,
                 success      INTEGER NOT NULL,
                 description  TEXT    NOT NULL,
                 deltas       TEXT    NOT NULL,
                 reference_id TEXT
             );
             CREATE TABLE IF NOT EXISTS perceptions (
                 agent_id    INTEGER NOT NULL,
                 time        INTEGER NOT NULL,
                 kind        TEXT    NOT NULL,
                 location    TEXT    NOT NULL,
                 description TEXT    NOT NULL,
                 activity_id INTEGER
             );
             CREATE TABLE IF NOT EXISTS tick_summaries (
                 tick          INTEGER PRIMARY KEY,
                 time          INTEGER NOT NULL,
                 started       INTEGER NOT NULL,
                 phase_changes INTEGER NOT NULL,
                 feedback      INTEGER NOT NULL,
                 perceptions   INTEGER NOT NULL,
                 interacting   INTEGER NOT NULL,
                 locked        INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS agent_snapshots (
                 agent_id    INTEGER NOT NULL,
                 tick        INTEGER NOT NULL,
                 time        INTEGER NOT NULL,
                 name        TEXT    NOT NULL,
                 location    TEXT    NOT NULL,
                 phase       TEXT    NOT NULL,
                 locked      INTEGER NOT NULL,
                 activity_id INTEGER,
                 action      TEXT,
                 progress    REAL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_feedback(&mut self, row: &FeedbackRow) -> OutputResult<()> {
        let reference = (!row.reference_id.is_empty()).then_some(row.reference_id.as_str());
        self.conn.execute(
            "INSERT INTO feedback \
             (agent_id, activity_id, time, action, location, target, success, description, deltas, reference_id) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            rusqlite::params![
                row.agent_id,
                row.activity_id,
                row.time,
                row.action,
                row.location,
                row.target,
                row.success as i64,
                row.description,
                row.deltas,
                reference,
            ],
        )?;
        Ok(())
    }

    fn write_perception(&mut self, row: &PerceptionRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO perceptions (agent_id, time, kind, location, description, activity_id) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                row.agent_id,
                row.time,
                row.kind,
                row.location,
                row.description,
                row.activity_id,
            ],
        )?;
        Ok(())
    }

    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO agent_snapshots \
                 (agent_id, tick, time, name, location, phase, locked, activity_id, action, progress) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.agent_id,
                    row.tick,
                    row.time,
                    row.name,
                    row.location,
                    row.phase,
                    row.locked as i64,
                    row.activity_id,
                    row.action,
                    row.progress,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO tick_summaries \
             (tick, time, started, phase_changes, feedback, perceptions, interacting, locked) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                row.tick,
                row.time,
                row.started,
                row.phase_changes,
                row.feedback,
                row.perceptions,
                row.interacting,
                row.locked,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn
            .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
