//! Per-developer unavailability, shared by the checker and the forecasting engine.
//!
//! A developer's unavailable days are their off days plus every day of their
//! support weeks. Team-wide closures (holidays or an allow-list) and the
//! weekend rule stay on the [`WorkCalendar`] and are consulted separately.

use crate::calendar::WorkCalendar;
use crate::day::Day;
use crate::model::{DeveloperId, Planning};
use std::collections::{HashMap, HashSet};

pub struct AvailabilityMap<'a> {
    calendar: &'a WorkCalendar,
    unavailable: HashMap<DeveloperId, HashSet<Day>>,
}

impl<'a> AvailabilityMap<'a> {
    pub fn for_planning(planning: &'a Planning) -> Self {
        let mut unavailable: HashMap<DeveloperId, HashSet<Day>> = planning
            .developers
            .iter()
            .map(|dev| (dev.id.clone(), dev.off_days.iter().copied().collect()))
            .collect();

        for week in &planning.support_weeks {
            unavailable
                .entry(week.dev_id.clone())
                .or_default()
                .extend(week.days());
        }

        Self {
            calendar: &planning.calendar,
            unavailable,
        }
    }

    pub fn calendar(&self) -> &WorkCalendar {
        self.calendar
    }

    /// Off days and support-week days of one developer.
    pub fn unavailable_days(&self, dev_id: &str) -> Option<&HashSet<Day>> {
        self.unavailable.get(dev_id)
    }

    pub fn is_workable(&self, dev_id: &str, day: Day) -> bool {
        if !self.calendar.is_open(day) {
            return false;
        }
        self.unavailable
            .get(dev_id)
            .is_none_or(|days| !days.contains(&day))
    }

    /// Workable days in the closed range `[first, last]`.
    pub fn count_workable(&self, dev_id: &str, first: Day, last: Day) -> i64 {
        Day::range_inclusive(first, last)
            .filter(|day| self.is_workable(dev_id, *day))
            .count() as i64
    }
}
