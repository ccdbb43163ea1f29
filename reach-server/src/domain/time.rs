//! Transit time-of-day handling.
//!
//! Timetables publish times as "HH:MM" strings measured from the start of the
//! service day. Runs that continue past midnight keep counting upwards
//! ("24:10", "25:30"), so a time of day here is an unbounded offset in seconds
//! from local midnight and is never wrapped modulo one day.

use std::fmt;

/// Seconds in one day.
pub const SECS_PER_DAY: u32 = 24 * 60 * 60;

/// Error returned when a timetable time string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed time {input:?}: {reason}")]
pub struct TimeError {
    input: String,
    reason: &'static str,
}

impl TimeError {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }

    /// The text that failed to parse.
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// A time of day as seconds since local midnight of the service day.
///
/// Values of [`SECS_PER_DAY`] and above denote next-day continuation of a run
/// that started the previous evening.
///
/// # Examples
///
/// ```
/// use reach_server::domain::TimeOfDay;
///
/// let t = TimeOfDay::parse_hhmm("25:30").unwrap();
/// assert_eq!(t.as_secs(), 91_800);
/// assert_eq!(t.to_string(), "25:30");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimeOfDay(u32);

impl TimeOfDay {
    /// Local midnight.
    pub const MIDNIGHT: Self = Self(0);

    /// Create a time from seconds since midnight.
    pub const fn from_secs(secs: u32) -> Self {
        Self(secs)
    }

    /// Seconds since midnight.
    pub const fn as_secs(&self) -> u32 {
        self.0
    }

    /// Parse an `H+:MM` time string.
    ///
    /// Hours are one or more ASCII digits and may exceed 23. Minutes are
    /// exactly two digits in `00..=59`.
    ///
    /// # Examples
    ///
    /// ```
    /// use reach_server::domain::TimeOfDay;
    ///
    /// assert_eq!(TimeOfDay::parse_hhmm("12:00").unwrap().as_secs(), 43_200);
    /// assert_eq!(TimeOfDay::parse_hhmm("5:07").unwrap().as_secs(), 18_420);
    ///
    /// assert!(TimeOfDay::parse_hhmm("1230").is_err());
    /// assert!(TimeOfDay::parse_hhmm("12:3").is_err());
    /// assert!(TimeOfDay::parse_hhmm("12:60").is_err());
    /// assert!(TimeOfDay::parse_hhmm(":30").is_err());
    /// ```
    pub fn parse_hhmm(s: &str) -> Result<Self, TimeError> {
        let (hours, minutes) = s
            .split_once(':')
            .ok_or_else(|| TimeError::new(s, "expected H:MM format"))?;

        if hours.is_empty() || !hours.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TimeError::new(s, "invalid hour digits"));
        }
        if minutes.len() != 2 || !minutes.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TimeError::new(s, "invalid minute digits"));
        }

        let hour: u32 = hours
            .parse()
            .map_err(|_| TimeError::new(s, "hour out of range"))?;
        let minute: u32 = minutes
            .parse()
            .map_err(|_| TimeError::new(s, "invalid minute digits"))?;
        if minute > 59 {
            return Err(TimeError::new(s, "minute must be 0-59"));
        }

        hour.checked_mul(3600)
            .and_then(|h| h.checked_add(minute * 60))
            .map(Self)
            .ok_or_else(|| TimeError::new(s, "hour out of range"))
    }

    /// Whole hours since midnight (may be 24 or more).
    pub fn hour(&self) -> u32 {
        self.0 / 3600
    }

    /// Minute within the hour.
    pub fn minute(&self) -> u32 {
        (self.0 % 3600) / 60
    }

    /// Whether this time lies on the following calendar day.
    pub fn is_next_day(&self) -> bool {
        self.0 >= SECS_PER_DAY
    }

    /// Add a number of seconds, saturating at the maximum representable time.
    pub fn saturating_add_secs(&self, secs: u32) -> Self {
        Self(self.0.saturating_add(secs))
    }
}

impl fmt::Debug for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimeOfDay({}s {})", self.0, self)
    }
}

/// Formats as `HH:MM`, keeping hours of 24 and above.
impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}
