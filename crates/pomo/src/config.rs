//! Timer configuration and duration parsing
//!
//! Everything here is validated before any timer state exists: a bad
//! duration string or a zero long-break interval fails the invocation
//! up front.

use chrono::Duration;
use thiserror::Error;

/// Configuration errors, all fatal at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid duration {input:?}: expected forms like \"25m\", \"90s\" or \"1h30m\"")]
    BadDuration { input: String },
    #[error("duration {input:?} must be positive")]
    NonPositiveDuration { input: String },
    #[error("long-break interval must be at least 1")]
    ZeroInterval,
}

/// Immutable timer configuration. Only the label changes after the
/// session starts (rename).
#[derive(Debug, Clone)]
pub struct TimerConfig {
    /// Optional free-text session label
    pub label: Option<String>,
    /// Focus interval length
    pub focus: Duration,
    /// Short break length
    pub short_break: Duration,
    /// Long break length
    pub long_break: Duration,
    /// Completed focus intervals between long breaks (>= 1)
    pub long_break_interval: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            label: None,
            focus: Duration::minutes(25),
            short_break: Duration::minutes(5),
            long_break: Duration::minutes(15),
            long_break_interval: 4,
        }
    }
}

impl TimerConfig {
    /// Build a config from raw CLI inputs, validating everything.
    pub fn from_args(
        label: Option<String>,
        focus: &str,
        short_break: &str,
        long_break: &str,
        long_break_interval: u32,
    ) -> Result<Self, ConfigError> {
        if long_break_interval == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(Self {
            label: label.filter(|l| !l.is_empty()),
            focus: parse_duration(focus)?,
            short_break: parse_duration(short_break)?,
            long_break: parse_duration(long_break)?,
            long_break_interval,
        })
    }
}

/// Parse a duration string: compounds of h/m/s ("25m", "90s", "1h30m15s"),
/// or a bare integer meaning minutes.
pub fn parse_duration(input: &str) -> Result<Duration, ConfigError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::BadDuration {
            input: input.to_string(),
        });
    }

    // Bare integer: minutes.
    if trimmed.chars().all(|c| c.is_ascii_digit()) {
        let mins: i64 = trimmed.parse().map_err(|_| ConfigError::BadDuration {
            input: input.to_string(),
        })?;
        return positive(Duration::minutes(mins), input);
    }

    let mut total = Duration::zero();
    let mut digits = String::new();
    for c in trimmed.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        if digits.is_empty() {
            return Err(ConfigError::BadDuration {
                input: input.to_string(),
            });
        }
        let value: i64 = digits.parse().map_err(|_| ConfigError::BadDuration {
            input: input.to_string(),
        })?;
        digits.clear();
        total = total
            + match c {
                'h' => Duration::hours(value),
                'm' => Duration::minutes(value),
                's' => Duration::seconds(value),
                _ => {
                    return Err(ConfigError::BadDuration {
                        input: input.to_string(),
                    })
                }
            };
    }

    // Trailing digits without a unit ("1h30") are malformed.
    if !digits.is_empty() {
        return Err(ConfigError::BadDuration {
            input: input.to_string(),
        });
    }

    positive(total, input)
}

fn positive(d: Duration, input: &str) -> Result<Duration, ConfigError> {
    if d <= Duration::zero() {
        Err(ConfigError::NonPositiveDuration {
            input: input.to_string(),
        })
    } else {
        Ok(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_units() {
        assert_eq!(parse_duration("25m").unwrap(), Duration::minutes(25));
        assert_eq!(parse_duration("90s").unwrap(), Duration::seconds(90));
        assert_eq!(parse_duration("1h").unwrap(), Duration::hours(1));
    }

    #[test]
    fn test_parse_compound() {
        assert_eq!(
            parse_duration("1h30m15s").unwrap(),
            Duration::hours(1) + Duration::minutes(30) + Duration::seconds(15)
        );
    }

    #[test]
    fn test_parse_bare_integer_is_minutes() {
        assert_eq!(parse_duration("25").unwrap(), Duration::minutes(25));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "m", "25x", "1h30", "h30m", "-5m"] {
            assert!(parse_duration(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_parse_rejects_zero() {
        assert_eq!(
            parse_duration("0m"),
            Err(ConfigError::NonPositiveDuration {
                input: "0m".to_string()
            })
        );
    }

    #[test]
    fn test_from_args_rejects_zero_interval() {
        let err = TimerConfig::from_args(None, "25m", "5m", "15m", 0).unwrap_err();
        assert_eq!(err, ConfigError::ZeroInterval);
    }

    #[test]
    fn test_from_args_drops_empty_label() {
        let cfg = TimerConfig::from_args(Some(String::new()), "25m", "5m", "15m", 4).unwrap();
        assert!(cfg.label.is_none());
    }
}
