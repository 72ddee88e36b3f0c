//! pomo - Terminal Pomodoro timer with persistent session history
//!
//! Alternating focus and break intervals, tracked interactively in a TUI,
//! with every completed interval recorded to SQLite for later reporting.
//!
//! Commands:
//! - start: Run the interactive timer
//! - history: List completed intervals
//! - summary: Aggregated statistics over the history

pub mod config;
pub mod phase;
pub mod session;
pub mod store;
pub mod timer;
pub mod tui;

pub use config::TimerConfig;
pub use phase::Phase;
pub use session::{RunSummary, SessionRecord};
pub use store::{SessionFilter, SessionStore, SessionSummary};
pub use timer::{Effect, Mode, Session};
