//! Phase types and the pure phase sequencer
//!
//! A phase is a single countdown interval. The sequencer decides what
//! comes after a finished phase; it is a pure function so the rotation
//! logic can be tested without any timer state.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::config::TimerConfig;

/// One countdown interval kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Focus,
    ShortBreak,
    LongBreak,
}

impl Phase {
    /// Display string, matching what gets stored in history.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Focus => "Focus Session",
            Phase::ShortBreak => "Short Break",
            Phase::LongBreak => "Long Break",
        }
    }

    /// Parse the stored display string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Focus Session" => Some(Phase::Focus),
            "Short Break" => Some(Phase::ShortBreak),
            "Long Break" => Some(Phase::LongBreak),
            _ => None,
        }
    }

    /// Parse the CLI filter spelling (focus, short-break, long-break).
    pub fn from_cli(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "focus" => Some(Phase::Focus),
            "short-break" => Some(Phase::ShortBreak),
            "long-break" => Some(Phase::LongBreak),
            _ => None,
        }
    }
}

/// Compute the phase that follows `current`.
///
/// Finishing a focus interval increments the completed-focus count and
/// yields a long break every `long_break_interval`-th time, a short break
/// otherwise. Finishing either break always yields focus with the count
/// unchanged.
pub fn advance(current: Phase, completed_focus: u32, cfg: &TimerConfig) -> (Phase, Duration, u32) {
    match current {
        Phase::Focus => {
            let done = completed_focus + 1;
            if done % cfg.long_break_interval == 0 {
                (Phase::LongBreak, cfg.long_break, done)
            } else {
                (Phase::ShortBreak, cfg.short_break, done)
            }
        }
        Phase::ShortBreak | Phase::LongBreak => (Phase::Focus, cfg.focus, completed_focus),
    }
}
