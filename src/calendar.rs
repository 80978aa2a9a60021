use crate::day::Day;
use chrono::Weekday;
use std::collections::{BTreeSet, HashSet};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarConfigError {
    #[error("calendar requires at least one working day")]
    NoWorkingDays,
    #[error("calendar cannot list both holidays and open days")]
    ConflictingRules,
}

/// Which days the whole team may work on, before weekday rules apply.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ClosedDays {
    /// Every day is open except these.
    Holidays(HashSet<Day>),
    /// Only these days are open.
    OpenDays(BTreeSet<Day>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkCalendar {
    closed: ClosedDays,
    non_working_days: HashSet<Weekday>,
}

/// Normalized, sorted form of a calendar, as stored in planning documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkCalendarConfig {
    working_days: Vec<Weekday>,
    holidays: Vec<Day>,
    open_days: Option<Vec<Day>>,
}

impl Default for WorkCalendar {
    fn default() -> Self {
        Self::with_holidays([])
    }
}

impl WorkCalendar {
    const ALL_WEEKDAYS: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    /// Mon-Fri calendar closed on the given holidays.
    pub fn with_holidays<I>(holidays: I) -> Self
    where
        I: IntoIterator<Item = Day>,
    {
        Self {
            closed: ClosedDays::Holidays(holidays.into_iter().collect()),
            non_working_days: HashSet::from([Weekday::Sat, Weekday::Sun]),
        }
    }

    /// Mon-Fri calendar open only on the listed days.
    pub fn with_open_days<I>(open_days: I) -> Self
    where
        I: IntoIterator<Item = Day>,
    {
        Self {
            closed: ClosedDays::OpenDays(open_days.into_iter().collect()),
            non_working_days: HashSet::from([Weekday::Sat, Weekday::Sun]),
        }
    }

    pub fn from_config(config: &WorkCalendarConfig) -> Result<Self, CalendarConfigError> {
        if config.open_days.is_some() && !config.holidays.is_empty() {
            return Err(CalendarConfigError::ConflictingRules);
        }
        let mut calendar = match &config.open_days {
            Some(open_days) => Self::with_open_days(open_days.iter().copied()),
            None => Self::with_holidays(config.holidays.iter().copied()),
        };
        calendar.set_working_days(config.working_days.clone())?;
        Ok(calendar)
    }

    pub fn to_config(&self) -> WorkCalendarConfig {
        WorkCalendarConfig::from(self)
    }

    /// Add a single holiday. On an allow-list calendar this removes the day
    /// from the list.
    pub fn add_holiday(&mut self, day: Day) {
        match &mut self.closed {
            ClosedDays::Holidays(holidays) => {
                holidays.insert(day);
            }
            ClosedDays::OpenDays(open_days) => {
                open_days.remove(&day);
            }
        }
    }

    pub fn add_holidays(&mut self, days: &[Day]) {
        for day in days {
            self.add_holiday(*day);
        }
    }

    /// Set custom working days (e.g., all seven days for a round-the-clock team)
    pub fn set_working_days(&mut self, days: Vec<Weekday>) -> Result<(), CalendarConfigError> {
        if days.is_empty() {
            return Err(CalendarConfigError::NoWorkingDays);
        }
        self.non_working_days.clear();
        for day in Self::ALL_WEEKDAYS {
            if !days.contains(&day) {
                self.non_working_days.insert(day);
            }
        }
        Ok(())
    }

    /// True when the day falls on a non-working weekday.
    pub fn is_weekend(&self, day: Day) -> bool {
        self.non_working_days.contains(&day.weekday())
    }

    /// Check if the whole team may work on a day
    pub fn is_open(&self, day: Day) -> bool {
        if self.is_weekend(day) {
            return false;
        }
        match &self.closed {
            ClosedDays::Holidays(holidays) => !holidays.contains(&day),
            ClosedDays::OpenDays(open_days) => open_days.contains(&day),
        }
    }

    /// True for an allow-list calendar, which has a last open day.
    pub fn is_bounded(&self) -> bool {
        matches!(self.closed, ClosedDays::OpenDays(_))
    }

    /// Beyond this day nothing is open. `None` when the calendar is unbounded
    /// or has no open day at all.
    pub fn last_open_day(&self) -> Option<Day> {
        match &self.closed {
            ClosedDays::Holidays(_) => None,
            ClosedDays::OpenDays(open_days) => open_days
                .iter()
                .rev()
                .copied()
                .find(|day| !self.is_weekend(*day)),
        }
    }

    /// Get all open days in a range
    pub fn open_days_in_range(&self, start: Day, end: Day) -> Vec<Day> {
        Day::range_inclusive(start, end)
            .filter(|day| self.is_open(*day))
            .collect()
    }

    /// Count open days in a range
    pub fn count_open_days(&self, start: Day, end: Day) -> i64 {
        Day::range_inclusive(start, end)
            .filter(|day| self.is_open(*day))
            .count() as i64
    }
}

impl WorkCalendarConfig {
    pub fn new<I, J>(working_days: I, holidays: J) -> Self
    where
        I: IntoIterator<Item = Weekday>,
        J: IntoIterator<Item = Day>,
    {
        let mut holidays: Vec<Day> = holidays.into_iter().collect();
        holidays.sort();
        holidays.dedup();

        Self {
            working_days: normalize_weekdays(working_days),
            holidays,
            open_days: None,
        }
    }

    pub fn with_open_days<I, J>(working_days: I, open_days: J) -> Self
    where
        I: IntoIterator<Item = Weekday>,
        J: IntoIterator<Item = Day>,
    {
        let mut open: Vec<Day> = open_days.into_iter().collect();
        open.sort();
        open.dedup();

        Self {
            working_days: normalize_weekdays(working_days),
            holidays: Vec::new(),
            open_days: Some(open),
        }
    }

    pub fn working_days(&self) -> &[Weekday] {
        &self.working_days
    }

    pub fn holidays(&self) -> &[Day] {
        &self.holidays
    }

    pub fn open_days(&self) -> Option<&[Day]> {
        self.open_days.as_deref()
    }
}

fn normalize_weekdays<I>(days: I) -> Vec<Weekday>
where
    I: IntoIterator<Item = Weekday>,
{
    let mut working: Vec<Weekday> = days.into_iter().collect();
    working.sort_by_key(|wd| wd.num_days_from_monday());
    working.dedup_by(|a, b| a.num_days_from_monday() == b.num_days_from_monday());
    working
}

impl Default for WorkCalendarConfig {
    fn default() -> Self {
        WorkCalendarConfig::from(&WorkCalendar::default())
    }
}

impl From<&WorkCalendar> for WorkCalendarConfig {
    fn from(calendar: &WorkCalendar) -> Self {
        let working = WorkCalendar::ALL_WEEKDAYS
            .into_iter()
            .filter(|day| !calendar.non_working_days.contains(day));

        match &calendar.closed {
            ClosedDays::Holidays(holidays) => Self::new(working, holidays.iter().copied()),
            ClosedDays::OpenDays(open_days) => {
                Self::with_open_days(working, open_days.iter().copied())
            }
        }
    }
}
