//! Timetable variant and transport mode selectors.

use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown calendar or mode name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

/// Which published timetable variant to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarKind {
    Weekday,
    Holiday,
}

impl CalendarKind {
    /// The provider's calendar identifier.
    pub fn odpt_id(&self) -> &'static str {
        match self {
            CalendarKind::Weekday => "odpt.Calendar:Weekday",
            CalendarKind::Holiday => "odpt.Calendar:Holiday",
        }
    }

    /// Parse `weekday` or `holiday` (case-insensitive).
    pub fn parse(s: &str) -> Result<Self, UnknownVariant> {
        match s.to_ascii_lowercase().as_str() {
            "weekday" => Ok(CalendarKind::Weekday),
            "holiday" => Ok(CalendarKind::Holiday),
            _ => Err(UnknownVariant {
                kind: "calendar",
                value: s.to_string(),
            }),
        }
    }

    /// Calendar used on a given date: Saturday and Sunday run the holiday
    /// timetable. Public holidays are not known here and count as weekdays.
    pub fn for_date(date: NaiveDate) -> Self {
        match date.weekday() {
            Weekday::Sat | Weekday::Sun => CalendarKind::Holiday,
            _ => CalendarKind::Weekday,
        }
    }
}

impl fmt::Display for CalendarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarKind::Weekday => f.write_str("weekday"),
            CalendarKind::Holiday => f.write_str("holiday"),
        }
    }
}

/// Transport mode. Selects the provider endpoints and the field layout of
/// timetable records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitMode {
    Bus,
    Train,
}

impl TransitMode {
    pub const ALL: [TransitMode; 2] = [TransitMode::Bus, TransitMode::Train];

    /// Parse `bus`, `train` or `all` into a set of modes.
    pub fn parse_set(s: &str) -> Result<Vec<Self>, UnknownVariant> {
        match s.to_ascii_lowercase().as_str() {
            "bus" => Ok(vec![TransitMode::Bus]),
            "train" => Ok(vec![TransitMode::Train]),
            "all" => Ok(Self::ALL.to_vec()),
            _ => Err(UnknownVariant {
                kind: "mode",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for TransitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitMode::Bus => f.write_str("bus"),
            TransitMode::Train => f.write_str("train"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odpt_ids() {
        assert_eq!(CalendarKind::Weekday.odpt_id(), "odpt.Calendar:Weekday");
        assert_eq!(CalendarKind::Holiday.odpt_id(), "odpt.Calendar:Holiday");
    }

    #[test]
    fn parse_calendar() {
        assert_eq!(CalendarKind::parse("weekday"), Ok(CalendarKind::Weekday));
        assert_eq!(CalendarKind::parse("Holiday"), Ok(CalendarKind::Holiday));
        assert!(CalendarKind::parse("saturday").is_err());
    }

    #[test]
    fn calendar_for_date() {
        // 2024-03-15 is a Friday
        let fri = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let sat = NaiveDate::from_ymd_opt(2024, 3, 16).unwrap();
        let sun = NaiveDate::from_ymd_opt(2024, 3, 17).unwrap();
        assert_eq!(CalendarKind::for_date(fri), CalendarKind::Weekday);
        assert_eq!(CalendarKind::for_date(sat), CalendarKind::Holiday);
        assert_eq!(CalendarKind::for_date(sun), CalendarKind::Holiday);
    }

    #[test]
    fn parse_mode_set() {
        assert_eq!(TransitMode::parse_set("bus"), Ok(vec![TransitMode::Bus]));
        assert_eq!(TransitMode::parse_set("TRAIN"), Ok(vec![TransitMode::Train]));
        assert_eq!(
            TransitMode::parse_set("all"),
            Ok(vec![TransitMode::Bus, TransitMode::Train])
        );

        let err = TransitMode::parse_set("ferry").unwrap_err();
        assert_eq!(err.to_string(), "unknown mode: \"ferry\"");
    }
}
