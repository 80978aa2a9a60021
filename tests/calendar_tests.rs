use chrono::Weekday;
use team_forecast::{CalendarConfigError, Day, WorkCalendar, WorkCalendarConfig};

// 05/01/1970 is a Monday
const MONDAY: Day = Day::new(4);

const ALL_WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

#[test]
fn default_calendar_weekends_closed() {
    let cal = WorkCalendar::default();
    assert!(cal.is_open(MONDAY));
    assert!(!cal.is_open(MONDAY + 5));
    assert!(!cal.is_open(MONDAY + 6));
    assert!(cal.is_weekend(MONDAY + 5));
    assert!(!cal.is_bounded());
    assert_eq!(cal.last_open_day(), None);
}

#[test]
fn holidays_close_weekdays() {
    let mut cal = WorkCalendar::with_holidays([MONDAY + 1]);
    cal.add_holidays(&[MONDAY + 2]);
    assert!(!cal.is_open(MONDAY + 1));
    assert!(!cal.is_open(MONDAY + 2));
    assert!(cal.is_open(MONDAY + 3));
    assert!(!cal.is_weekend(MONDAY + 1));
}

#[test]
fn open_days_allow_list_only_opens_listed_weekdays() {
    let cal = WorkCalendar::with_open_days([MONDAY, MONDAY + 2, MONDAY + 5]);
    assert!(cal.is_open(MONDAY));
    assert!(!cal.is_open(MONDAY + 1));
    assert!(cal.is_open(MONDAY + 2));
    // listed, but a Saturday
    assert!(!cal.is_open(MONDAY + 5));
    assert!(cal.is_bounded());
    assert_eq!(cal.last_open_day(), Some(MONDAY + 2));
}

#[test]
fn adding_a_holiday_to_an_allow_list_removes_it() {
    let mut cal = WorkCalendar::with_open_days([MONDAY, MONDAY + 1]);
    cal.add_holiday(MONDAY + 1);
    assert!(!cal.is_open(MONDAY + 1));
    assert_eq!(cal.last_open_day(), Some(MONDAY));
}

#[test]
fn empty_allow_list_has_no_last_open_day() {
    let cal = WorkCalendar::with_open_days([]);
    assert!(cal.is_bounded());
    assert_eq!(cal.last_open_day(), None);
}

#[test]
fn set_working_days_includes_weekend() {
    let mut cal = WorkCalendar::default();
    cal.set_working_days(ALL_WEEK.to_vec()).unwrap();
    assert!(cal.is_open(MONDAY + 5));
    assert!(cal.is_open(MONDAY + 6));
}

#[test]
fn set_working_days_rejects_empty_week() {
    let mut cal = WorkCalendar::default();
    assert_eq!(
        cal.set_working_days(Vec::new()),
        Err(CalendarConfigError::NoWorkingDays)
    );
}

#[test]
fn open_days_in_range_and_count_match() {
    let cal = WorkCalendar::with_holidays([MONDAY + 2]);
    let days = cal.open_days_in_range(MONDAY, MONDAY + 6);
    assert_eq!(days, vec![MONDAY, MONDAY + 1, MONDAY + 3, MONDAY + 4]);
    assert_eq!(cal.count_open_days(MONDAY, MONDAY + 6), 4);
    assert_eq!(cal.count_open_days(MONDAY + 6, MONDAY), 0);
}

#[test]
fn config_round_trips_both_representations() {
    let mut holidays = WorkCalendar::with_holidays([MONDAY + 3, MONDAY + 1]);
    holidays
        .set_working_days(vec![Weekday::Sat, Weekday::Mon, Weekday::Mon])
        .unwrap();
    let config = holidays.to_config();
    assert_eq!(config.working_days(), &[Weekday::Mon, Weekday::Sat]);
    assert_eq!(config.holidays(), &[MONDAY + 1, MONDAY + 3]);
    assert_eq!(config.open_days(), None);
    assert_eq!(WorkCalendar::from_config(&config).unwrap(), holidays);

    let allow_list = WorkCalendar::with_open_days([MONDAY + 1, MONDAY]);
    let config = allow_list.to_config();
    assert_eq!(config.open_days(), Some(&[MONDAY, MONDAY + 1][..]));
    assert!(config.holidays().is_empty());
    assert_eq!(WorkCalendar::from_config(&config).unwrap(), allow_list);
}

#[test]
fn config_without_working_days_is_rejected() {
    let config = WorkCalendarConfig::new([], [MONDAY]);
    assert_eq!(
        WorkCalendar::from_config(&config),
        Err(CalendarConfigError::NoWorkingDays)
    );
}

#[test]
fn default_config_is_monday_to_friday() {
    let config = WorkCalendarConfig::default();
    assert_eq!(config.working_days(), &ALL_WEEK[..5]);
    assert!(config.holidays().is_empty());
}
