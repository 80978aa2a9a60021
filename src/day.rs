use chrono::{Duration, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;
use thiserror::Error;

/// Textual form of a day in planning documents, e.g. `25/05/1983`.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

// Day 0 (1970-01-01) was a Thursday.
const WEEKDAYS_FROM_EPOCH: [Weekday; 7] = [
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("error parsing date {input:?}, should be in the format 25/05/1983")]
pub struct DayParseError {
    pub input: String,
}

/// A calendar day, counted from 1970-01-01 (day 0).
///
/// All scheduling arithmetic happens on `Day`; conversion to and from
/// `chrono::NaiveDate` only happens at the document boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Day(i32);

impl Day {
    pub const fn new(index: i32) -> Self {
        Self(index)
    }

    pub const fn index(self) -> i32 {
        self.0
    }

    fn epoch() -> NaiveDate {
        // NaiveDate's default is 1970-01-01
        NaiveDate::default()
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self((date - Self::epoch()).num_days() as i32)
    }

    /// Returns `None` only for indices outside chrono's supported range.
    pub fn to_date(self) -> Option<NaiveDate> {
        Self::epoch().checked_add_signed(Duration::days(i64::from(self.0)))
    }

    pub fn weekday(self) -> Weekday {
        WEEKDAYS_FROM_EPOCH[self.0.rem_euclid(7) as usize]
    }

    pub fn succ(self) -> Self {
        Self(self.0 + 1)
    }

    /// `None` past the last representable day.
    pub fn checked_succ(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }

    /// Every day of the closed range `[first, last]`; empty when `first > last`.
    pub fn range_inclusive(first: Day, last: Day) -> impl Iterator<Item = Day> {
        (first.0..=last.0).map(Day)
    }

    /// Parses a strict `dd/mm/yyyy` string. Inputs that chrono would accept but
    /// that do not format back to the same text (e.g. `2/1/1970`) are rejected.
    pub fn parse(input: &str) -> Result<Self, DayParseError> {
        let date = NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|_| DayParseError {
            input: input.to_string(),
        })?;
        if date.format(DATE_FORMAT).to_string() != input {
            return Err(DayParseError {
                input: input.to_string(),
            });
        }
        Ok(Self::from_date(date))
    }

    pub fn format(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_date() {
            Some(date) => write!(f, "{}", date.format(DATE_FORMAT)),
            None => write!(f, "day {}", self.0),
        }
    }
}

impl FromStr for Day {
    type Err = DayParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<NaiveDate> for Day {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}

impl Add<i32> for Day {
    type Output = Day;

    fn add(self, rhs: i32) -> Day {
        Day(self.0 + rhs)
    }
}

impl Sub<i32> for Day {
    type Output = Day;

    fn sub(self, rhs: i32) -> Day {
        Day(self.0 - rhs)
    }
}

impl Sub<Day> for Day {
    type Output = i32;

    fn sub(self, rhs: Day) -> i32 {
        self.0 - rhs.0
    }
}

impl Serialize for Day {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Day {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Day::parse(&raw).map_err(serde::de::Error::custom)
    }
}
