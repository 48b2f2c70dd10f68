//! Scheduling metadata.
//!
//! Dates, times and durations are opaque to resolution; they are only
//! validated so that nothing malformed gets into the model.

use crate::error::{CompetitionError, Result};
use chrono::{NaiveDate, NaiveTime};

/// Parse a strict `YYYY-MM-DD` calendar date.
///
/// Rejects non-existent dates such as `2024-02-30`.
///
/// # Examples
///
/// ```rust
/// use vbcomp::schedule::parse_date;
///
/// assert!(parse_date("2024-02-29").is_ok());
/// assert!(parse_date("2023-02-29").is_err());
/// assert!(parse_date("2024-2-9").is_err());
/// ```
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let b = s.as_bytes();
    let shaped = b.len() == 10
        && b[4] == b'-'
        && b[7] == b'-'
        && b.iter()
            .enumerate()
            .all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit());
    if !shaped {
        return Err(CompetitionError::InvalidDate(s.to_string()));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| CompetitionError::InvalidDate(s.to_string()))
}

/// Parse a strict `HH:MM` 24-hour time.
pub fn parse_time(s: &str) -> Result<NaiveTime> {
    let invalid = || CompetitionError::Validation(format!("Invalid time \"{}\": must be HH:MM", s));
    if s.len() != 5 {
        return Err(invalid());
    }
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|_| invalid())
}

/// Parse an `H:MM` duration into minutes.
pub fn parse_duration(s: &str) -> Result<u32> {
    let invalid = || CompetitionError::Validation(format!("Invalid duration \"{}\": must be H:MM", s));
    let (hours, minutes) = s.split_once(':').ok_or_else(invalid)?;
    if hours.is_empty() || minutes.len() != 2 {
        return Err(invalid());
    }
    let hours: u32 = hours.parse().map_err(|_| invalid())?;
    let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
    if minutes > 59 {
        return Err(invalid());
    }
    hours
        .checked_mul(60)
        .and_then(|m| m.checked_add(minutes))
        .ok_or_else(invalid)
}

/// When something happens: shared by matches and breaks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    date: Option<NaiveDate>,
    warmup: Option<NaiveTime>,
    start: Option<NaiveTime>,
    duration_minutes: Option<u32>,
}

impl Schedule {
    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn warmup(&self) -> Option<NaiveTime> {
        self.warmup
    }

    pub fn start(&self) -> Option<NaiveTime> {
        self.start
    }

    /// Planned length in minutes.
    pub fn duration_minutes(&self) -> Option<u32> {
        self.duration_minutes
    }

    /// Set the date. On error the previous date is kept.
    pub fn set_date(&mut self, date: &str) -> Result<()> {
        self.date = Some(parse_date(date)?);
        Ok(())
    }

    /// Set the warm-up time from `HH:MM`. An invalid time leaves the previous value.
    pub fn set_warmup(&mut self, time: &str) -> Result<()> {
        self.warmup = Some(parse_time(time)?);
        Ok(())
    }

    /// Set the start time from `HH:MM`. An invalid time leaves the previous value.
    pub fn set_start(&mut self, time: &str) -> Result<()> {
        self.start = Some(parse_time(time)?);
        Ok(())
    }

    /// Set the duration from `H:MM`. An invalid duration leaves the previous value.
    pub fn set_duration(&mut self, duration: &str) -> Result<()> {
        self.duration_minutes = Some(parse_duration(duration)?);
        Ok(())
    }
}

/// A non-playing entry in a group's match list, such as a lunch break.
///
/// Breaks never take part in completion or resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Break {
    pub name: Option<String>,
    pub schedule: Schedule,
}

impl Break {
    /// A break with no schedule yet.
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            schedule: Schedule::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        for bad in ["2024-02-30", "2024-13-01", "24-03-01", "2024/03/01", "2024-03-1x", ""] {
            assert!(
                matches!(parse_date(bad), Err(CompetitionError::InvalidDate(_))),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_parse_time_and_duration() {
        assert!(parse_time("09:30").is_ok());
        assert!(parse_time("9:30").is_err());
        assert!(parse_time("24:00").is_err());
        assert_eq!(parse_duration("1:30").unwrap(), 90);
        assert_eq!(parse_duration("0:45").unwrap(), 45);
        assert!(parse_duration("1:60").is_err());
        assert!(parse_duration("90").is_err());
    }

    #[test]
    fn test_duration_out_of_range() {
        assert_eq!(parse_duration("71582788:15").unwrap(), 4_294_967_295);
        let err = parse_duration("99999999:00").unwrap_err();
        assert_eq!(err.to_string(), "Invalid duration \"99999999:00\": must be H:MM");
        assert!(parse_duration("4294967296:00").is_err());
    }

    #[test]
    fn test_failed_set_keeps_previous_value() {
        let mut schedule = Schedule::default();
        schedule.set_date("2024-05-04").unwrap();
        assert!(schedule.set_date("2024-05-32").is_err());
        assert_eq!(schedule.date(), NaiveDate::from_ymd_opt(2024, 5, 4));
    }
}
