use crate::calendar::WorkCalendar;
use crate::day::Day;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Nominal effort units required from one developer on one task.
pub type EffortDays = u32;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeveloperId(String);

impl DeveloperId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeveloperId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeveloperId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for DeveloperId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for DeveloperId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Upper bound on the working days a single attribution may require.
pub const MAX_WORKING_DAYS: i64 = i32::MAX as i64;

fn default_utilization() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Developer {
    pub id: DeveloperId,
    /// Personal non-working days.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub off_days: BTreeSet<Day>,
    /// First day of employment. Overrides the planning start day for this developer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts: Option<Day>,
    /// Last day of employment. Recorded only; it does not block allocation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leaves: Option<Day>,
    /// Fraction of nominal effort delivered per working day. Must be positive.
    #[serde(default = "default_utilization")]
    pub utilization: f64,
}

impl Developer {
    pub fn new(id: impl Into<DeveloperId>) -> Self {
        Self {
            id: id.into(),
            off_days: BTreeSet::new(),
            starts: None,
            leaves: None,
            utilization: default_utilization(),
        }
    }

    /// Utilization must be positive, finite and large enough that one unit
    /// of effort fits in the range a `Day` cursor can walk.
    pub fn has_valid_utilization(&self) -> bool {
        self.required_working_days(1).is_some()
    }

    /// Day the developer's cursor starts from.
    pub fn first_workable_day(&self, planning_start: Day) -> Day {
        self.starts.unwrap_or(planning_start)
    }

    /// Working days that must elapse to deliver `effort` nominal units,
    /// i.e. `ceil(effort / utilization)`.
    ///
    /// `None` when utilization is not a positive finite number or the count
    /// exceeds [`MAX_WORKING_DAYS`].
    pub fn required_working_days(&self, effort: EffortDays) -> Option<i64> {
        if !(self.utilization.is_finite() && self.utilization > 0.0) {
            return None;
        }
        let days = (f64::from(effort) / self.utilization).ceil();
        (days <= MAX_WORKING_DAYS as f64).then_some(days as i64)
    }
}

/// A block of days during which a developer is on support duty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportWeek {
    pub first_day: Day,
    pub last_day: Day,
    pub dev_id: DeveloperId,
}

impl SupportWeek {
    pub fn new(first_day: Day, last_day: Day, dev_id: impl Into<DeveloperId>) -> Self {
        Self {
            first_day,
            last_day,
            dev_id: dev_id.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.first_day > self.last_day
    }

    pub fn days(&self) -> impl Iterator<Item = Day> {
        Day::range_inclusive(self.first_day, self.last_day)
    }
}

impl fmt::Display for SupportWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{} - {}]", self.dev_id, self.first_day, self.last_day)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribution {
    pub effort_days: EffortDays,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_day: Option<Day>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_day: Option<Day>,
}

impl Attribution {
    pub fn new(effort_days: EffortDays) -> Self {
        Self {
            effort_days,
            first_day: None,
            last_day: None,
        }
    }

    pub fn with_dates(effort_days: EffortDays, first_day: Day, last_day: Day) -> Self {
        Self {
            effort_days,
            first_day: Some(first_day),
            last_day: Some(last_day),
        }
    }

    pub fn clear_dates(&mut self) {
        self.first_day = None;
        self.last_day = None;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub name: String,
    #[serde(default)]
    pub attributions: BTreeMap<DeveloperId, Attribution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_day: Option<Day>,
}

impl Task {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributions: BTreeMap::new(),
            last_day: None,
        }
    }

    pub fn with_attribution(
        mut self,
        dev_id: impl Into<DeveloperId>,
        effort: EffortDays,
    ) -> Self {
        self.attributions
            .insert(dev_id.into(), Attribution::new(effort));
        self
    }

    pub fn attribution(&self, dev_id: &str) -> Option<&Attribution> {
        self.attributions.get(dev_id)
    }

    /// Latest `last_day` among the attributions that carry one.
    pub fn latest_attribution_day(&self) -> Option<Day> {
        self.attributions
            .values()
            .filter_map(|attribution| attribution.last_day)
            .max()
    }

    pub fn clear_forecast(&mut self) {
        self.last_day = None;
        for attribution in self.attributions.values_mut() {
            attribution.clear_dates();
        }
    }
}

/// Everything needed to forecast a team's task list.
///
/// `tasks` is in priority order, highest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Planning {
    pub start_day: Day,
    pub calendar: WorkCalendar,
    pub developers: Vec<Developer>,
    pub support_weeks: Vec<SupportWeek>,
    pub tasks: Vec<Task>,
}

impl Planning {
    pub fn new(start_day: Day, calendar: WorkCalendar) -> Self {
        Self {
            start_day,
            calendar,
            developers: Vec::new(),
            support_weeks: Vec::new(),
            tasks: Vec::new(),
        }
    }

    pub fn developer(&self, id: &str) -> Option<&Developer> {
        self.developers.iter().find(|dev| dev.id.as_str() == id)
    }

    pub fn task(&self, name: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.name == name)
    }

    /// Latest task completion, once forecast.
    pub fn completion_day(&self) -> Option<Day> {
        self.tasks.iter().filter_map(|task| task.last_day).max()
    }

    pub fn clear_forecast(&mut self) {
        for task in &mut self.tasks {
            task.clear_forecast();
        }
    }
}
