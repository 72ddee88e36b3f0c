//! Application state and input handling
//!
//! Thin shell around the timer controller: translates key presses into
//! controller calls and dispatches the effects the controller returns.
//! All I/O (database writes, notifications) happens off this thread.

use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::session::RunSummary;
use crate::store::RecordWriter;
use crate::timer::{Effect, Session};

/// TUI application state
pub struct App {
    pub session: Session,
    pub show_help: bool,
    writer: RecordWriter,
}

impl App {
    pub fn new(session: Session, writer: RecordWriter) -> Self {
        Self {
            session,
            show_help: false,
            writer,
        }
    }

    /// Handle one key press. Returns true when the user quit.
    pub fn on_key(&mut self, key: KeyEvent, now: DateTime<Utc>) -> bool {
        if self.session.is_renaming() {
            // Modal label edit: no quit binding in this sub-mode.
            match key.code {
                KeyCode::Enter => self.session.commit_rename(now),
                KeyCode::Esc => self.session.cancel_rename(now),
                KeyCode::Backspace => self.session.rename_backspace(),
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.session.rename_push(c)
                }
                _ => {}
            }
            return false;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Char(' ') | KeyCode::Char('p') => self.session.toggle_pause(now),
            KeyCode::Char('r') => self.session.begin_rename(now),
            KeyCode::Char('?') => self.show_help = !self.show_help,
            _ => {}
        }
        false
    }

    /// Handle one timer tick: let the controller advance and dispatch
    /// whatever effects it emits.
    pub fn on_tick(&mut self, now: DateTime<Utc>) {
        for effect in self.session.on_tick(now) {
            match effect {
                Effect::Persist(record) => self.writer.submit(record),
                Effect::Notify { title, message } => pomo_notify::send_detached(title, message),
            }
        }
    }

    /// Flush pending writes and produce the exit summary.
    pub fn finish(self, now: DateTime<Utc>) -> RunSummary {
        let summary = self.session.summary(now);
        self.writer.finish();
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimerConfig;
    use crate::store::{SessionFilter, SessionStore};
    use chrono::{Duration, TimeZone};
    use tempfile::TempDir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
    }

    fn app(dir: &TempDir, n: u32) -> App {
        let cfg = TimerConfig {
            long_break_interval: n,
            ..TimerConfig::default()
        };
        let store = SessionStore::open(&dir.path().join("history.db")).unwrap();
        App::new(Session::new(cfg, t0()), RecordWriter::spawn(store))
    }

    #[test]
    fn test_quit_keys() {
        let dir = TempDir::new().unwrap();
        let mut a = app(&dir, 4);
        assert!(a.on_key(key(KeyCode::Char('q')), t0()));

        let mut a = app(&dir, 4);
        assert!(a.on_key(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            t0()
        ));
    }

    #[test]
    fn test_no_quit_while_renaming() {
        let dir = TempDir::new().unwrap();
        let mut a = app(&dir, 4);

        a.on_key(key(KeyCode::Char('r')), t0());
        assert!(a.session.is_renaming());

        // 'q' is just text while renaming.
        assert!(!a.on_key(key(KeyCode::Char('q')), t0()));
        assert_eq!(a.session.rename_buffer(), Some("q"));
    }

    #[test]
    fn test_expiry_reaches_the_store() {
        let dir = TempDir::new().unwrap();
        let mut a = app(&dir, 2);

        let mut now = t0();
        // Two focus phases and the short break between them.
        for _ in 0..3 {
            now = now + Duration::hours(1);
            a.on_tick(now);
        }
        a.finish(now);

        let store = SessionStore::open(&dir.path().join("history.db")).unwrap();
        let summary = store.aggregate(&SessionFilter::default()).unwrap();
        assert_eq!(summary.total_sessions, 3);
        assert_eq!(summary.by_phase.get("Focus Session"), Some(&2));
        assert_eq!(summary.by_phase.get("Short Break"), Some(&1));
    }

    #[test]
    fn test_quit_while_paused_persists_nothing() {
        let dir = TempDir::new().unwrap();
        let mut a = app(&dir, 4);

        a.on_key(key(KeyCode::Char('p')), t0() + Duration::minutes(1));
        a.on_tick(t0() + Duration::hours(5));
        let summary = a.finish(t0() + Duration::hours(5));
        assert_eq!(summary.completed_sessions, 0);

        let store = SessionStore::open(&dir.path().join("history.db")).unwrap();
        assert!(store.list(&SessionFilter::default()).unwrap().is_empty());
    }
}
