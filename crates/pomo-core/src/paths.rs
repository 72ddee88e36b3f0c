//! Standard paths used by pomo

use std::path::PathBuf;

/// Standard pomo paths
pub struct Paths {
    /// Data directory (~/.local/share/pomo)
    pub data: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

impl Paths {
    pub fn new() -> Self {
        let data = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("pomo");

        Self { data }
    }

    /// Path to the session history database.
    pub fn history_db(&self) -> PathBuf {
        self.data.join("history.db")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_db_lives_under_data_dir() {
        let paths = Paths::new();
        assert!(paths.history_db().starts_with(&paths.data));
        assert!(paths.history_db().ends_with("pomo/history.db"));
    }
}
