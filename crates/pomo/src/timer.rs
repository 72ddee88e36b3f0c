//! Interactive timer controller
//!
//! Owns the live session state and is the only place phase transitions
//! happen. Handlers take an explicit `now` so tests can drive the clock,
//! and return the side effects they want performed (persist a completed
//! interval, notify the user) instead of performing them; the event loop
//! dispatches those without blocking the tick cadence.
//!
//! Remaining time is always recomputed from the wall clock rather than
//! decremented, so a missed tick (suspended process, slow terminal) never
//! desynchronizes the display from real elapsed time.

use chrono::{DateTime, Duration, Utc};

use crate::config::TimerConfig;
use crate::phase::{advance, Phase};
use crate::session::{RunSummary, SessionRecord};

/// Notification title for all phase-transition messages.
pub const NOTIFY_TITLE: &str = "Pomodoro";

/// Interaction mode. Exactly one holds at any time; while `Paused` or
/// `Renaming` the deadline is frozen and ticks cannot expire the phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Running,
    Paused,
    /// Modal label edit; carries the pending buffer.
    Renaming { buffer: String },
}

/// A side effect requested by the controller, dispatched by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Hand a completed interval to persistence.
    Persist(SessionRecord),
    /// Tell the user a phase finished.
    Notify { title: String, message: String },
}

/// The live session: one active timer per process invocation.
#[derive(Debug, Clone)]
pub struct Session {
    cfg: TimerConfig,
    phase: Phase,
    /// Absolute end of the current phase; stale while suspended.
    deadline: DateTime<Utc>,
    /// Time left, captured at the moment Paused/Renaming began.
    remaining: Duration,
    phase_started_at: DateTime<Utc>,
    total_duration: Duration,
    completed_focus: u32,
    mode: Mode,
    /// Process start, for the exit summary only.
    started_at: DateTime<Utc>,
}

impl Session {
    /// Start a session: phase = Focus, deadline = now + focus duration.
    pub fn new(cfg: TimerConfig, now: DateTime<Utc>) -> Self {
        let total = cfg.focus;
        Self {
            cfg,
            phase: Phase::Focus,
            deadline: now + total,
            remaining: total,
            phase_started_at: now,
            total_duration: total,
            completed_focus: 0,
            mode: Mode::Running,
            started_at: now,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn label(&self) -> Option<&str> {
        self.cfg.label.as_deref()
    }

    pub fn completed_focus(&self) -> u32 {
        self.completed_focus
    }

    pub fn is_paused(&self) -> bool {
        self.mode == Mode::Paused
    }

    pub fn is_renaming(&self) -> bool {
        matches!(self.mode, Mode::Renaming { .. })
    }

    /// Time left in the current phase, floored at zero for display.
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        let left = match self.mode {
            Mode::Running => self.deadline - now,
            _ => self.remaining,
        };
        left.max(Duration::zero())
    }

    /// Progress through the current phase, clamped to [0, 1].
    pub fn progress(&self, now: DateTime<Utc>) -> f64 {
        let total = self.total_duration.num_milliseconds();
        if total <= 0 {
            return 1.0;
        }
        let left = match self.mode {
            Mode::Running => self.deadline - now,
            _ => self.remaining,
        };
        let fraction = 1.0 - left.num_milliseconds() as f64 / total as f64;
        fraction.clamp(0.0, 1.0)
    }

    /// Periodic tick. Advances the phase when the deadline has passed,
    /// emitting a persist intent for the finished interval and a
    /// notification for the next one. No-op while suspended.
    pub fn on_tick(&mut self, now: DateTime<Utc>) -> Vec<Effect> {
        if self.mode != Mode::Running || now < self.deadline {
            return Vec::new();
        }

        // Phases only end on expiry, so the interval's duration is the
        // configured length of the phase. Wall time from phase start can
        // be longer when the timer sat paused or renaming; that idle time
        // is not focus time and must not be persisted as such.
        let record = SessionRecord {
            label: self.cfg.label.clone(),
            phase: self.phase,
            duration_secs: self.total_duration.num_seconds(),
            started_at: self.phase_started_at,
            completed_at: now,
        };

        let (next, next_duration, completed) =
            advance(self.phase, self.completed_focus, &self.cfg);
        self.phase = next;
        self.total_duration = next_duration;
        self.completed_focus = completed;
        self.phase_started_at = now;
        self.deadline = now + next_duration;

        let message = match next {
            Phase::ShortBreak => "Focus session complete! Take a quick breather.",
            Phase::LongBreak => "Focus session complete! Time for a long break.",
            Phase::Focus => "Break is over. Time to get back to focus!",
        };

        vec![
            Effect::Persist(record),
            Effect::Notify {
                title: NOTIFY_TITLE.to_string(),
                message: message.to_string(),
            },
        ]
    }

    /// Pause or resume. Pausing captures the remaining time; resuming
    /// recomputes the deadline from it. Ignored while renaming.
    pub fn toggle_pause(&mut self, now: DateTime<Utc>) {
        match self.mode {
            Mode::Running => {
                self.remaining = self.deadline - now;
                self.mode = Mode::Paused;
            }
            Mode::Paused => {
                self.deadline = now + self.remaining;
                self.mode = Mode::Running;
            }
            Mode::Renaming { .. } => {}
        }
    }

    /// Enter the rename sub-mode, suspending the countdown. The buffer is
    /// prefilled with the current label.
    pub fn begin_rename(&mut self, now: DateTime<Utc>) {
        match self.mode {
            Mode::Running => {
                self.remaining = self.deadline - now;
            }
            Mode::Paused => {
                // remaining was already captured at pause time
            }
            Mode::Renaming { .. } => return,
        }
        self.mode = Mode::Renaming {
            buffer: self.cfg.label.clone().unwrap_or_default(),
        };
    }

    /// Append a character to the rename buffer.
    pub fn rename_push(&mut self, c: char) {
        if let Mode::Renaming { buffer } = &mut self.mode {
            buffer.push(c);
        }
    }

    /// Delete the last character of the rename buffer.
    pub fn rename_backspace(&mut self) {
        if let Mode::Renaming { buffer } = &mut self.mode {
            buffer.pop();
        }
    }

    /// Current rename buffer, if renaming.
    pub fn rename_buffer(&self) -> Option<&str> {
        match &self.mode {
            Mode::Renaming { buffer } => Some(buffer),
            _ => None,
        }
    }

    /// Commit the rename and resume. An empty buffer leaves the label
    /// untouched rather than clearing it.
    pub fn commit_rename(&mut self, now: DateTime<Utc>) {
        if let Mode::Renaming { buffer } = &self.mode {
            if !buffer.is_empty() {
                self.cfg.label = Some(buffer.clone());
            }
            self.resume(now);
        }
    }

    /// Abandon the rename and resume with the old label.
    pub fn cancel_rename(&mut self, now: DateTime<Utc>) {
        if self.is_renaming() {
            self.resume(now);
        }
    }

    fn resume(&mut self, now: DateTime<Utc>) {
        self.deadline = now + self.remaining;
        self.mode = Mode::Running;
    }

    /// Final stats for the surrounding CLI to print on quit.
    pub fn summary(&self, now: DateTime<Utc>) -> RunSummary {
        RunSummary {
            name: self.cfg.label.clone(),
            completed_sessions: self.completed_focus,
            start_time: self.started_at,
            end_time: now,
        }
    }
}
