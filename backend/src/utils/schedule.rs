//! Course schedule text, e.g. `"Mon - Wed, 09:00 - 10:30"`.
//!
//! Every course carries its weekly timetable as a single string in this
//! format: two weekdays and a start/end time. Sessions, teacher check-ins,
//! and makeup planning all validate against the parsed form.

use chrono::{Datelike, NaiveDateTime, NaiveTime, Weekday};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("schedule must look like \"Mon - Wed, 09:00 - 10:30\"")]
    Format,
    #[error("unknown weekday abbreviation: {0}")]
    Weekday(String),
    #[error("invalid time of day: {0}")]
    Time(String),
    #[error("end time must be after start time")]
    EmptyWindow,
}

/// Parsed weekly timetable of a course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub days: (Weekday, Weekday),
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Schedule {
    pub fn parse(text: &str) -> Result<Self, ScheduleError> {
        let (days_part, hours_part) = text.split_once(',').ok_or(ScheduleError::Format)?;

        let (first_day, second_day) = split_range(days_part)?;
        let (start_text, end_text) = split_range(hours_part)?;

        let days = (parse_weekday(first_day)?, parse_weekday(second_day)?);
        let start = parse_time(start_text)?;
        let end = parse_time(end_text)?;
        if end <= start {
            return Err(ScheduleError::EmptyWindow);
        }

        Ok(Schedule { days, start, end })
    }

    pub fn includes_weekday(&self, weekday: Weekday) -> bool {
        self.days.0 == weekday || self.days.1 == weekday
    }

    /// Whether a proposed session timestamp falls on a scheduled weekday.
    pub fn matches_weekday(&self, at: &NaiveDateTime) -> bool {
        self.includes_weekday(at.weekday())
    }

    /// Whether a proposed session timestamp starts exactly at the scheduled
    /// start time.
    pub fn matches_start(&self, at: &NaiveDateTime) -> bool {
        at.time() == self.start
    }
}

impl FromStr for Schedule {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Schedule::parse(s)
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}, {} - {}",
            weekday_abbrev(self.days.0),
            weekday_abbrev(self.days.1),
            self.start.format("%H:%M"),
            self.end.format("%H:%M"),
        )
    }
}

fn split_range(part: &str) -> Result<(&str, &str), ScheduleError> {
    let (lhs, rhs) = part.trim().split_once('-').ok_or(ScheduleError::Format)?;
    let lhs = lhs.trim();
    let rhs = rhs.trim();
    if lhs.is_empty() || rhs.is_empty() {
        return Err(ScheduleError::Format);
    }
    Ok((lhs, rhs))
}

fn parse_weekday(token: &str) -> Result<Weekday, ScheduleError> {
    match token {
        "Mon" => Ok(Weekday::Mon),
        "Tue" => Ok(Weekday::Tue),
        "Wed" => Ok(Weekday::Wed),
        "Thu" => Ok(Weekday::Thu),
        "Fri" => Ok(Weekday::Fri),
        "Sat" => Ok(Weekday::Sat),
        "Sun" => Ok(Weekday::Sun),
        other => Err(ScheduleError::Weekday(other.to_string())),
    }
}

fn parse_time(token: &str) -> Result<NaiveTime, ScheduleError> {
    NaiveTime::parse_from_str(token, "%H:%M")
        .map_err(|_| ScheduleError::Time(token.to_string()))
}

fn weekday_abbrev(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn parses_canonical_format() {
        let schedule = Schedule::parse("Mon - Wed, 09:00 - 10:30").unwrap();
        assert_eq!(schedule.days, (Weekday::Mon, Weekday::Wed));
        assert_eq!(schedule.start, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(schedule.end, NaiveTime::from_hms_opt(10, 30, 0).unwrap());
    }

    #[test]
    fn display_round_trips() {
        let text = "Tue - Thu, 14:00 - 15:30";
        let schedule = Schedule::parse(text).unwrap();
        assert_eq!(schedule.to_string(), text);
    }

    #[test]
    fn rejects_missing_comma() {
        assert_eq!(
            Schedule::parse("Mon - Wed 09:00 - 10:30"),
            Err(ScheduleError::Format)
        );
    }

    #[test]
    fn rejects_unknown_weekday() {
        assert_eq!(
            Schedule::parse("Lun - Wed, 09:00 - 10:30"),
            Err(ScheduleError::Weekday("Lun".to_string()))
        );
    }

    #[test]
    fn rejects_out_of_range_hour() {
        assert!(matches!(
            Schedule::parse("Mon - Wed, 25:00 - 26:30"),
            Err(ScheduleError::Time(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_minute() {
        assert!(matches!(
            Schedule::parse("Mon - Wed, 09:61 - 10:30"),
            Err(ScheduleError::Time(_))
        ));
    }

    #[test]
    fn rejects_inverted_window() {
        assert_eq!(
            Schedule::parse("Mon - Wed, 10:30 - 09:00"),
            Err(ScheduleError::EmptyWindow)
        );
    }

    #[test]
    fn session_on_scheduled_weekday_and_start_matches() {
        let schedule = Schedule::parse("Mon - Wed, 09:00 - 10:30").unwrap();
        // 2025-06-02 is a Monday.
        let session = at(2025, 6, 2, 9, 0);
        assert!(schedule.matches_weekday(&session));
        assert!(schedule.matches_start(&session));
    }

    #[test]
    fn session_on_other_weekday_is_rejected() {
        let schedule = Schedule::parse("Mon - Wed, 09:00 - 10:30").unwrap();
        // 2025-06-03 is a Tuesday.
        let session = at(2025, 6, 3, 9, 0);
        assert!(!schedule.matches_weekday(&session));
    }

    #[test]
    fn session_with_wrong_start_hour_is_rejected() {
        let schedule = Schedule::parse("Mon - Wed, 09:00 - 10:30").unwrap();
        let session = at(2025, 6, 2, 10, 0);
        assert!(schedule.matches_weekday(&session));
        assert!(!schedule.matches_start(&session));
    }
}
