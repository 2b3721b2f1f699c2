//! Time windows: relative (`last: "24h"`) and absolute (`start`/`end`).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{QueryError, Result};

// =============================================================================
// TimeRange — wire shape
// =============================================================================

/// The time window of a query, exactly one of two forms:
///
/// - **relative**: `last` holds a duration like `15m`, `1h`, `7d`;
/// - **absolute**: `start` and/or `end` hold timestamps.
///
/// The wire payload can carry any combination of the three fields, so this
/// stays a plain struct; [`TimeRange::form`] is the single place that
/// resolves which form is populated, and both the validator and the
/// translator go through it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
}

/// The resolved form of a [`TimeRange`].
#[derive(Debug, Clone, PartialEq)]
pub enum TimeForm {
    Relative(RelativeDuration),
    Absolute {
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    },
}

impl TimeRange {
    /// Convenience constructor for a relative window.
    pub fn last(duration: impl Into<String>) -> Self {
        TimeRange {
            last: Some(duration.into()),
            ..Default::default()
        }
    }

    /// Convenience constructor for an absolute window.
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        TimeRange {
            start: Some(start),
            end: Some(end),
            ..Default::default()
        }
    }

    /// Resolve which form is populated.
    ///
    /// Errors when both forms are set, neither is set, the relative duration
    /// does not match the grammar, or an absolute `start` is not strictly
    /// before `end`.
    pub fn form(&self) -> Result<TimeForm> {
        match &self.last {
            Some(last) => {
                if self.start.is_some() || self.end.is_some() {
                    return Err(QueryError::InvalidTimeRange(
                        "relative and absolute forms cannot both be set".to_string(),
                    ));
                }
                Ok(TimeForm::Relative(RelativeDuration::parse(last)?))
            }
            None => {
                if self.start.is_none() && self.end.is_none() {
                    return Err(QueryError::InvalidTimeRange(
                        "no time bounds set".to_string(),
                    ));
                }
                if let (Some(start), Some(end)) = (self.start, self.end) {
                    if start >= end {
                        return Err(QueryError::InvalidTimeRange(
                            "start must be before end".to_string(),
                        ));
                    }
                }
                Ok(TimeForm::Absolute {
                    start: self.start,
                    end: self.end,
                })
            }
        }
    }
}

// =============================================================================
// RelativeDuration — the `last` grammar
// =============================================================================

/// Unit of a [`RelativeDuration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DurationUnit {
    Minute,
    Hour,
    Day,
}

impl fmt::Display for DurationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            DurationUnit::Minute => "m",
            DurationUnit::Hour => "h",
            DurationUnit::Day => "d",
        };
        write!(f, "{c}")
    }
}

/// A parsed relative duration like `15m`, `1h`, `24h`, `7d`.
///
/// The grammar is a positive integer immediately followed by one unit
/// character. No sign, no whitespace, no bare number, no unknown unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelativeDuration {
    pub count: u64,
    pub unit: DurationUnit,
    /// Equivalent duration in seconds.
    pub seconds: u64,
    /// Original string representation.
    pub original: String,
}

impl RelativeDuration {
    /// Parse a duration string like `"15m"`, `"1h"`, `"7d"`.
    pub fn parse(s: &str) -> Result<Self> {
        if s.len() < 2 {
            return Err(QueryError::InvalidRelativeTime(s.to_string()));
        }
        let (count_str, unit_str) = s.split_at(s.len() - 1);

        // u64::from_str tolerates a leading '+'; the grammar does not.
        if !count_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(QueryError::InvalidRelativeTime(s.to_string()));
        }
        let count: u64 = count_str
            .parse()
            .map_err(|_| QueryError::InvalidRelativeTime(s.to_string()))?;
        if count == 0 {
            return Err(QueryError::InvalidRelativeTime(s.to_string()));
        }

        let (unit, multiplier) = match unit_str {
            "m" => (DurationUnit::Minute, 60u64),
            "h" => (DurationUnit::Hour, 3600),
            "d" => (DurationUnit::Day, 86400),
            _ => return Err(QueryError::InvalidRelativeTime(s.to_string())),
        };

        // astronomically large counts overflow the seconds conversion
        let seconds = count
            .checked_mul(multiplier)
            .ok_or_else(|| QueryError::InvalidRelativeTime(s.to_string()))?;

        Ok(RelativeDuration {
            count,
            unit,
            seconds,
            original: s.to_string(),
        })
    }
}

impl fmt::Display for RelativeDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_duration_parse() {
        let d = RelativeDuration::parse("15m").unwrap();
        assert_eq!(d.count, 15);
        assert_eq!(d.unit, DurationUnit::Minute);
        assert_eq!(d.seconds, 900);

        let d = RelativeDuration::parse("1h").unwrap();
        assert_eq!(d.seconds, 3600);

        let d = RelativeDuration::parse("90d").unwrap();
        assert_eq!(d.seconds, 90 * 86400);
    }

    #[test]
    fn test_duration_invalid() {
        for bad in [
            "",
            "m",
            "15",
            "15s",
            "15 m",
            " 15m",
            "-15m",
            "+15m",
            "0h",
            "1.5h",
            // u64::MAX minutes: digit-valid but overflows the seconds conversion
            "18446744073709551615m",
            // and one past u64::MAX, which already fails the integer parse
            "18446744073709551616m",
        ] {
            assert!(
                RelativeDuration::parse(bad).is_err(),
                "expected '{bad}' to be rejected"
            );
        }
    }

    #[test]
    fn test_form_relative() {
        let tr = TimeRange::last("24h");
        assert!(matches!(tr.form(), Ok(TimeForm::Relative(d)) if d.seconds == 86400));
    }

    #[test]
    fn test_form_both_set_rejected() {
        let tr = TimeRange {
            last: Some("1h".to_string()),
            start: Some(Utc.timestamp_opt(1_700_000_000, 0).unwrap()),
            end: None,
        };
        assert!(matches!(tr.form(), Err(QueryError::InvalidTimeRange(_))));
    }

    #[test]
    fn test_form_neither_set_rejected() {
        assert!(TimeRange::default().form().is_err());
    }

    #[test]
    fn test_form_absolute_ordering() {
        let start = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let end = Utc.timestamp_opt(1_700_003_600, 0).unwrap();
        assert!(TimeRange::between(start, end).form().is_ok());
        assert!(TimeRange::between(end, start).form().is_err());
        assert!(TimeRange::between(start, start).form().is_err());
    }

    #[test]
    fn test_form_start_only_is_absolute() {
        let tr = TimeRange {
            start: Some(Utc.timestamp_opt(1_700_000_000, 0).unwrap()),
            ..Default::default()
        };
        assert!(matches!(
            tr.form(),
            Ok(TimeForm::Absolute { start: Some(_), end: None })
        ));
    }
}
