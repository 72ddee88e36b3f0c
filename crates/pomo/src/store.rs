//! Session history storage
//!
//! SQLite-backed store for completed intervals. The interactive timer
//! never touches the connection directly: it hands records to a
//! `RecordWriter` background thread over a channel, so a slow or failing
//! disk can never stall the tick cadence.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params_from_iter, Connection};
use std::collections::HashMap;
use std::path::Path;
use std::sync::mpsc;
use std::thread::JoinHandle;

use crate::phase::Phase;
use crate::session::SessionRecord;

/// Constrains which records `list` and `aggregate` consider.
#[derive(Debug, Clone, Default)]
pub struct SessionFilter {
    /// Exact label match
    pub label: Option<String>,
    /// Phase kind match
    pub phase: Option<Phase>,
    /// Lower bound on when the interval started
    pub from: Option<DateTime<Utc>>,
    /// Upper bound on when the interval completed
    pub to: Option<DateTime<Utc>>,
    /// Maximum number of rows returned by `list`
    pub limit: Option<u32>,
}

/// Aggregated history statistics.
#[derive(Debug, Clone, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub total_sessions: u32,
    pub total_seconds: i64,
    pub average_seconds: i64,
    pub by_phase: HashMap<String, u32>,
}

/// Store for completed session records
pub struct SessionStore {
    conn: Connection,
}

impl SessionStore {
    /// Open or create the history database at the given path.
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(dir) = db_path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;
        }

        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open history database: {}", db_path.display()))?;

        // Enable WAL mode for better concurrent access
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                id               INTEGER PRIMARY KEY AUTOINCREMENT,
                name             TEXT,
                phase            TEXT NOT NULL,
                duration_seconds INTEGER NOT NULL,
                started_at       INTEGER NOT NULL,
                completed_at     INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_sessions_started ON sessions(started_at DESC);
            "#,
        )?;

        Ok(Self { conn })
    }

    /// Open the database at the standard pomo data path.
    pub fn open_default() -> Result<Self> {
        let paths = pomo_core::Paths::new();
        Self::open(&paths.history_db())
    }

    /// Insert one completed interval.
    pub fn save(&self, record: &SessionRecord) -> Result<()> {
        self.conn
            .execute(
                r#"
                INSERT INTO sessions (name, phase, duration_seconds, started_at, completed_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                rusqlite::params![
                    record.label,
                    record.phase.as_str(),
                    record.duration_secs,
                    record.started_at.timestamp(),
                    record.completed_at.timestamp(),
                ],
            )
            .context("Failed to save session record")?;
        Ok(())
    }

    /// List records matching the filter, most recent first.
    pub fn list(&self, filter: &SessionFilter) -> Result<Vec<SessionRecord>> {
        let (where_clause, args) = build_where(filter);
        let mut sql = format!(
            "SELECT name, phase, duration_seconds, started_at, completed_at FROM sessions{} ORDER BY started_at DESC",
            where_clause
        );
        if let Some(limit) = filter.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(args.iter()), |row| {
            Ok((
                row.get::<_, Option<String>>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, i64>(4)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (label, phase, duration_secs, started, completed) = row?;
            // A row another tool wrote with a phase we don't know is
            // skipped rather than mislabeled.
            let Some(phase) = Phase::from_str(&phase) else {
                tracing::warn!("skipping session row with unknown phase {phase:?}");
                continue;
            };
            records.push(SessionRecord {
                label,
                phase,
                duration_secs,
                started_at: DateTime::from_timestamp(started, 0).unwrap_or_else(Utc::now),
                completed_at: DateTime::from_timestamp(completed, 0).unwrap_or_else(Utc::now),
            });
        }
        Ok(records)
    }

    /// Aggregate matching records: count, total/average duration, and a
    /// per-phase breakdown.
    pub fn aggregate(&self, filter: &SessionFilter) -> Result<SessionSummary> {
        let (where_clause, args) = build_where(filter);
        let sql = format!(
            "SELECT phase, COUNT(*), COALESCE(SUM(duration_seconds), 0) FROM sessions{} GROUP BY phase",
            where_clause
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(args.iter()), |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u32>(1)?,
                row.get::<_, i64>(2)?,
            ))
        })?;

        let mut summary = SessionSummary::default();
        for row in rows {
            let (phase, count, seconds) = row?;
            summary.by_phase.insert(phase, count);
            summary.total_sessions += count;
            summary.total_seconds += seconds;
        }
        if summary.total_sessions > 0 {
            summary.average_seconds = summary.total_seconds / summary.total_sessions as i64;
        }
        Ok(summary)
    }
}

/// Build the WHERE clause and its positional arguments for a filter.
///
/// `from` bounds the start time while `to` bounds the completion time,
/// so an interval straddling the upper bound is excluded.
fn build_where(filter: &SessionFilter) -> (String, Vec<rusqlite::types::Value>) {
    let mut clauses: Vec<String> = Vec::new();
    let mut args: Vec<rusqlite::types::Value> = Vec::new();

    if let Some(label) = &filter.label {
        args.push(label.clone().into());
        clauses.push(format!("name = ?{}", args.len()));
    }
    if let Some(phase) = filter.phase {
        args.push(phase.as_str().to_string().into());
        clauses.push(format!("phase = ?{}", args.len()));
    }
    if let Some(from) = filter.from {
        args.push(from.timestamp().into());
        clauses.push(format!("started_at >= ?{}", args.len()));
    }
    if let Some(to) = filter.to {
        args.push(to.timestamp().into());
        clauses.push(format!("completed_at <= ?{}", args.len()));
    }

    if clauses.is_empty() {
        (String::new(), args)
    } else {
        (format!(" WHERE {}", clauses.join(" AND ")), args)
    }
}

/// Fire-and-forget writer: owns the store on a background thread and
/// accepts records over a channel. A failed write loses one historical
/// record, never timer state.
pub struct RecordWriter {
    tx: mpsc::Sender<SessionRecord>,
    handle: JoinHandle<()>,
}

impl RecordWriter {
    /// Move the store onto a worker thread.
    pub fn spawn(store: SessionStore) -> Self {
        let (tx, rx) = mpsc::channel::<SessionRecord>();
        let handle = std::thread::spawn(move || {
            for record in rx {
                if let Err(err) = store.save(&record) {
                    tracing::warn!("failed to persist session record: {err:#}");
                }
            }
        });
        Self { tx, handle }
    }

    /// Queue a record for writing. Never blocks.
    pub fn submit(&self, record: SessionRecord) {
        if self.tx.send(record).is_err() {
            tracing::warn!("record writer is gone, dropping session record");
        }
    }

    /// Drop the sender and wait for queued writes to flush.
    pub fn finish(self) {
        drop(self.tx);
        let _ = self.handle.join();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use tempfile::TempDir;

    fn record(label: Option<&str>, phase: Phase, start_min: i64, dur_min: i64) -> SessionRecord {
        let base = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
        let started_at = base + Duration::minutes(start_min);
        SessionRecord {
            label: label.map(String::from),
            phase,
            duration_secs: dur_min * 60,
            started_at,
            completed_at: started_at + Duration::minutes(dur_min),
        }
    }

    fn open_store(dir: &TempDir) -> SessionStore {
        SessionStore::open(&dir.path().join("history.db")).unwrap()
    }

    #[test]
    fn test_save_and_list_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let rec = record(Some("thesis"), Phase::Focus, 0, 25);
        store.save(&rec).unwrap();

        let listed = store.list(&SessionFilter::default()).unwrap();
        assert_eq!(listed, vec![rec]);
    }

    #[test]
    fn test_list_orders_most_recent_first() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        store.save(&record(None, Phase::Focus, 0, 25)).unwrap();
        store.save(&record(None, Phase::Focus, 60, 25)).unwrap();
        store.save(&record(None, Phase::Focus, 30, 25)).unwrap();

        let listed = store.list(&SessionFilter::default()).unwrap();
        let starts: Vec<_> = listed.iter().map(|r| r.started_at).collect();
        let mut sorted = starts.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(starts, sorted);
    }

    #[test]
    fn test_filter_by_label_and_phase() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        store.save(&record(Some("a"), Phase::Focus, 0, 25)).unwrap();
        store.save(&record(Some("b"), Phase::Focus, 30, 25)).unwrap();
        store.save(&record(Some("a"), Phase::ShortBreak, 60, 5)).unwrap();

        let by_label = store
            .list(&SessionFilter {
                label: Some("a".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(by_label.len(), 2);

        let focused = store
            .list(&SessionFilter {
                label: Some("a".to_string()),
                phase: Some(Phase::Focus),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(focused.len(), 1);
    }

    #[test]
    fn test_filter_bounds_are_asymmetric() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        // 08:00-08:25, 09:00-09:25
        store.save(&record(None, Phase::Focus, 0, 25)).unwrap();
        store.save(&record(None, Phase::Focus, 60, 25)).unwrap();

        let base = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();

        // `from` compares the start time: 08:30 keeps only the later one.
        let later = store
            .list(&SessionFilter {
                from: Some(base + Duration::minutes(30)),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(later.len(), 1);

        // `to` compares the completion time: a bound at 09:10 excludes the
        // interval still running at that instant.
        let earlier = store
            .list(&SessionFilter {
                to: Some(base + Duration::minutes(70)),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(earlier.len(), 1);
        assert_eq!(earlier[0].started_at, base);
    }

    #[test]
    fn test_limit() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        for i in 0..5 {
            store.save(&record(None, Phase::Focus, i * 30, 25)).unwrap();
        }

        let listed = store
            .list(&SessionFilter {
                limit: Some(2),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(listed.len(), 2);
    }

    #[test]
    fn test_aggregate() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        store.save(&record(None, Phase::Focus, 0, 25)).unwrap();
        store.save(&record(None, Phase::Focus, 30, 25)).unwrap();
        store.save(&record(None, Phase::ShortBreak, 60, 5)).unwrap();

        let summary = store.aggregate(&SessionFilter::default()).unwrap();
        assert_eq!(summary.total_sessions, 3);
        assert_eq!(summary.total_seconds, (25 + 25 + 5) * 60);
        assert_eq!(summary.average_seconds, (25 + 25 + 5) * 60 / 3);
        assert_eq!(summary.by_phase.get("Focus Session"), Some(&2));
        assert_eq!(summary.by_phase.get("Short Break"), Some(&1));
    }

    #[test]
    fn test_aggregate_empty() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let summary = store.aggregate(&SessionFilter::default()).unwrap();
        assert_eq!(summary.total_sessions, 0);
        assert_eq!(summary.average_seconds, 0);
        assert!(summary.by_phase.is_empty());
    }

    #[test]
    fn test_list_skips_rows_with_unknown_phase() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        store.save(&record(Some("ok"), Phase::Focus, 0, 25)).unwrap();
        // Simulate a row written by a newer or foreign tool.
        store
            .conn
            .execute(
                "INSERT INTO sessions (name, phase, duration_seconds, started_at, completed_at)
                 VALUES ('odd', 'Deep Work', 1500, 0, 1500)",
                [],
            )
            .unwrap();

        let listed = store.list(&SessionFilter::default()).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].label.as_deref(), Some("ok"));
        assert_eq!(listed[0].phase, Phase::Focus);
    }

    #[test]
    fn test_record_writer_flushes_on_finish() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("history.db");

        let writer = RecordWriter::spawn(SessionStore::open(&db_path).unwrap());
        writer.submit(record(Some("bg"), Phase::Focus, 0, 25));
        writer.submit(record(Some("bg"), Phase::ShortBreak, 30, 5));
        writer.finish();

        let store = SessionStore::open(&db_path).unwrap();
        let listed = store.list(&SessionFilter::default()).unwrap();
        assert_eq!(listed.len(), 2);
    }
}
