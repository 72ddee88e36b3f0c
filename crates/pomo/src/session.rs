//! Completed interval records and the process-exit summary
//!
//! A `SessionRecord` is produced exactly once per phase transition and
//! handed straight to the store; the timer keeps no reference to it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::phase::Phase;

/// An immutable log entry for one completed phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Session label at the moment the phase completed
    #[serde(rename = "name", default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Which kind of interval this was
    #[serde(rename = "sessionType", with = "phase_string")]
    pub phase: Phase,
    /// Actual elapsed duration in whole seconds
    #[serde(rename = "durationSeconds")]
    pub duration_secs: i64,
    /// When the phase began
    #[serde(rename = "startedAt")]
    pub started_at: DateTime<Utc>,
    /// When the phase completed
    #[serde(rename = "completedAt")]
    pub completed_at: DateTime<Utc>,
}

/// Serialize `Phase` as its display string ("Focus Session", ...), the
/// same spelling the database stores.
mod phase_string {
    use super::Phase;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(phase: &Phase, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(phase.as_str())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Phase, D::Error> {
        let s = String::deserialize(de)?;
        Phase::from_str(&s).ok_or_else(|| de::Error::custom(format!("unknown phase {s:?}")))
    }
}

/// Final stats for one `pomo start` invocation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub completed_sessions: u32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_record_json_field_names() {
        let record = SessionRecord {
            label: Some("deep work".to_string()),
            phase: Phase::Focus,
            duration_secs: 1500,
            started_at: Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap(),
            completed_at: Utc.with_ymd_and_hms(2025, 6, 1, 9, 25, 0).unwrap(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["name"], "deep work");
        assert_eq!(json["sessionType"], "Focus Session");
        assert_eq!(json["durationSeconds"], 1500);
        assert!(json["startedAt"].as_str().unwrap().starts_with("2025-06-01T09:00:00"));
    }

    #[test]
    fn test_record_omits_empty_label() {
        let record = SessionRecord {
            label: None,
            phase: Phase::ShortBreak,
            duration_secs: 300,
            started_at: Utc::now(),
            completed_at: Utc::now(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("name").is_none());
        assert_eq!(json["sessionType"], "Short Break");
    }

    #[test]
    fn test_summary_camel_case() {
        let summary = RunSummary {
            name: None,
            completed_sessions: 3,
            start_time: Utc::now(),
            end_time: Utc::now(),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["completedSessions"], 3);
        assert!(json.get("startTime").is_some());
        assert!(json.get("endTime").is_some());
        assert!(json.get("name").is_none());
    }
}
