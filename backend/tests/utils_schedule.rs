use chrono::{NaiveDate, Weekday};
use tutorhub_backend::utils::schedule::{Schedule, ScheduleError};

#[test]
fn canonical_schedule_parses() {
    let schedule: Schedule = "Mon - Wed, 09:00 - 10:30".parse().unwrap();
    assert_eq!(schedule.days, (Weekday::Mon, Weekday::Wed));
    assert!(schedule.includes_weekday(Weekday::Mon));
    assert!(schedule.includes_weekday(Weekday::Wed));
    assert!(!schedule.includes_weekday(Weekday::Fri));
}

#[test]
fn weekend_schedules_parse_too() {
    let schedule = Schedule::parse("Sat - Sun, 14:00 - 16:00").unwrap();
    assert!(schedule.includes_weekday(Weekday::Sat));
    assert!(schedule.includes_weekday(Weekday::Sun));
}

#[test]
fn malformed_inputs_are_rejected() {
    for text in [
        "",
        "Mon - Wed",
        "Monday - Wednesday, 09:00 - 10:30",
        "Mon - Wed, 9am - 10am",
        "Mon - Wed, 24:00 - 25:00",
        "Mon Wed, 09:00 - 10:30",
    ] {
        assert!(Schedule::parse(text).is_err(), "accepted: {text:?}");
    }
}

#[test]
fn inverted_time_window_is_rejected() {
    assert_eq!(
        Schedule::parse("Mon - Wed, 11:00 - 10:00"),
        Err(ScheduleError::EmptyWindow)
    );
}

#[test]
fn session_matching_checks_weekday_and_start() {
    let schedule = Schedule::parse("Tue - Thu, 18:00 - 19:30").unwrap();
    // 2025-06-05 is a Thursday.
    let on_time = NaiveDate::from_ymd_opt(2025, 6, 5)
        .unwrap()
        .and_hms_opt(18, 0, 0)
        .unwrap();
    assert!(schedule.matches_weekday(&on_time));
    assert!(schedule.matches_start(&on_time));

    let wrong_day = NaiveDate::from_ymd_opt(2025, 6, 6)
        .unwrap()
        .and_hms_opt(18, 0, 0)
        .unwrap();
    assert!(!schedule.matches_weekday(&wrong_day));

    let wrong_hour = NaiveDate::from_ymd_opt(2025, 6, 5)
        .unwrap()
        .and_hms_opt(18, 30, 0)
        .unwrap();
    assert!(!schedule.matches_start(&wrong_hour));
}
