//! pomo-notify - Desktop notifications for pomo
//!
//! Unified cross-platform notification delivery for phase transitions.
//! Works on macOS (osascript/terminal-notifier), Linux (notify-send),
//! and WSL. Delivery is best-effort: a missed notification never affects
//! the running timer.

mod backend;

pub use backend::{Backend, Notification};

use anyhow::Result;

/// Send a notification with the detected backend, blocking until the
/// backend command finishes.
pub fn send(title: &str, message: &str) -> Result<()> {
    let backend = Backend::detect();
    backend.send(&Notification::new(title, message))
}

/// Fire-and-forget send on a detached thread. Delivery errors are logged
/// and otherwise ignored; the caller never waits.
pub fn send_detached(title: impl Into<String>, message: impl Into<String>) {
    let notification = Notification::new(title, message);
    std::thread::spawn(move || {
        let backend = Backend::detect();
        if let Err(err) = backend.send(&notification) {
            tracing::warn!(backend = backend.name(), "failed to send notification: {err:#}");
        }
    });
}
