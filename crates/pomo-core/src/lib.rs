//! pomo-core - Shared functionality for the pomo tools
//!
//! Standard on-disk locations and the small formatting helpers the CLI
//! and TUI both need.

pub mod format;
pub mod paths;

pub use paths::Paths;
