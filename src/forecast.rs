//! Greedy sequential forecasting.
//!
//! Tasks are walked in priority order. Each developer owns a cursor that only
//! moves forward: an attribution consumes the developer's next workable days
//! until `ceil(effort / utilization)` of them are used, and the next task for
//! that developer starts where the previous one stopped.

use crate::availability::AvailabilityMap;
use crate::day::Day;
use crate::model::{Developer, DeveloperId, EffortDays, Planning};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastError {
    #[error(
        "developer {dev_id} has invalid utilization {utilization} \
         (must be greater than 0 and keep every allocation within the calendar range)"
    )]
    InvalidUtilization { dev_id: DeveloperId, utilization: f64 },

    #[error("developer {dev_id} mentioned in task {task:?} does not exist")]
    UnknownDeveloper { task: String, dev_id: DeveloperId },

    #[error("calendar has no open day left for {dev_id} on task {task:?} from {cursor} onwards")]
    CalendarExhausted {
        task: String,
        dev_id: DeveloperId,
        cursor: Day,
    },
}

/// Next unallocated day of every developer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeveloperCursors(BTreeMap<DeveloperId, Day>);

impl DeveloperCursors {
    pub fn for_planning(planning: &Planning) -> Self {
        Self(
            planning
                .developers
                .iter()
                .map(|dev| (dev.id.clone(), dev.first_workable_day(planning.start_day)))
                .collect(),
        )
    }

    pub fn position(&self, dev_id: &str) -> Option<Day> {
        self.0.get(dev_id).copied()
    }

    fn advance(&mut self, dev_id: &DeveloperId, day: Day) {
        self.0.insert(dev_id.clone(), day);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DeveloperId, Day)> {
        self.0.iter().map(|(id, day)| (id, *day))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributionForecast {
    /// `None` when the attribution needs no working day at all.
    pub first_day: Option<Day>,
    pub last_day: Day,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForecast {
    pub name: String,
    pub attributions: BTreeMap<DeveloperId, AttributionForecast>,
    pub last_day: Option<Day>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSummary {
    pub task_count: usize,
    pub attribution_count: usize,
    pub completion_day: Option<Day>,
    pub next_free_day: BTreeMap<DeveloperId, Day>,
}

impl ForecastSummary {
    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("tasks={}", self.task_count));
        parts.push(format!("attributions={}", self.attribution_count));
        if let Some(day) = self.completion_day {
            parts.push(format!("finish={}", day));
        }
        if !self.next_free_day.is_empty() {
            let free = self
                .next_free_day
                .iter()
                .map(|(id, day)| format!("{id}@{day}"))
                .collect::<Vec<_>>()
                .join(",");
            parts.push(format!("free={}", free));
        }
        parts.join(", ")
    }
}

pub struct ForecastEngine<'a> {
    planning: &'a Planning,
    availability: AvailabilityMap<'a>,
}

impl<'a> ForecastEngine<'a> {
    pub fn new(planning: &'a Planning) -> Self {
        Self {
            planning,
            availability: AvailabilityMap::for_planning(planning),
        }
    }

    /// Reject inputs the allocator cannot make progress on.
    fn validate(&self) -> Result<(), ForecastError> {
        for dev in &self.planning.developers {
            if !dev.has_valid_utilization() {
                return Err(invalid_utilization(dev));
            }
        }
        for task in &self.planning.tasks {
            for (dev_id, attribution) in &task.attributions {
                let Some(dev) = self.planning.developer(dev_id.as_str()) else {
                    return Err(ForecastError::UnknownDeveloper {
                        task: task.name.clone(),
                        dev_id: dev_id.clone(),
                    });
                };
                if dev.required_working_days(attribution.effort_days).is_none() {
                    return Err(invalid_utilization(dev));
                }
            }
        }
        Ok(())
    }

    /// Forecast every task without touching the planning.
    ///
    /// Results are in task order, alongside the cursors left after the last task.
    pub fn execute(&self) -> Result<(Vec<TaskForecast>, DeveloperCursors), ForecastError> {
        self.validate()?;

        let mut cursors = DeveloperCursors::for_planning(self.planning);
        let mut forecasts = Vec::with_capacity(self.planning.tasks.len());

        for task in &self.planning.tasks {
            let mut attributions = BTreeMap::new();
            for (dev_id, attribution) in &task.attributions {
                let dev = self.planning.developer(dev_id.as_str()).ok_or_else(|| {
                    ForecastError::UnknownDeveloper {
                        task: task.name.clone(),
                        dev_id: dev_id.clone(),
                    }
                })?;
                let start = cursors
                    .position(dev_id.as_str())
                    .unwrap_or_else(|| dev.first_workable_day(self.planning.start_day));

                let (forecast, next) =
                    self.allocate(&task.name, dev, attribution.effort_days, start)?;
                cursors.advance(dev_id, next);
                attributions.insert(dev_id.clone(), forecast);
            }

            let last_day = attributions.values().map(|a| a.last_day).max();
            forecasts.push(TaskForecast {
                name: task.name.clone(),
                attributions,
                last_day,
            });
        }

        Ok((forecasts, cursors))
    }

    /// Consume `effort` for one developer starting at `cursor`.
    ///
    /// Returns the allocated range and the cursor to resume from.
    fn allocate(
        &self,
        task_name: &str,
        dev: &Developer,
        effort: EffortDays,
        mut cursor: Day,
    ) -> Result<(AttributionForecast, Day), ForecastError> {
        let calendar = self.availability.calendar();
        let horizon = calendar.is_bounded().then(|| calendar.last_open_day());
        let required = dev
            .required_working_days(effort)
            .ok_or_else(|| invalid_utilization(dev))?;

        let exhausted = |cursor: Day| ForecastError::CalendarExhausted {
            task: task_name.to_string(),
            dev_id: dev.id.clone(),
            cursor,
        };

        let mut consumed = 0;
        let mut first_day = None;
        while consumed < required {
            if let Some(limit) = horizon {
                if limit.is_none_or(|last| cursor > last) {
                    return Err(exhausted(cursor));
                }
            }
            if self.availability.is_workable(dev.id.as_str(), cursor) {
                consumed += 1;
                first_day.get_or_insert(cursor);
            }
            cursor = cursor.checked_succ().ok_or_else(|| exhausted(cursor))?;
        }

        let last_day = cursor - 1;
        debug!(
            task = task_name,
            dev = %dev.id,
            effort,
            working_days = required,
            first_day = ?first_day,
            %last_day,
            "allocated attribution"
        );
        if let Some(leaves) = dev.leaves {
            if first_day.is_some() && last_day > leaves {
                warn!(
                    task = task_name,
                    dev = %dev.id,
                    %leaves,
                    %last_day,
                    "work is scheduled after the developer leaves"
                );
            }
        }

        Ok((AttributionForecast { first_day, last_day }, cursor))
    }
}

fn invalid_utilization(dev: &Developer) -> ForecastError {
    ForecastError::InvalidUtilization {
        dev_id: dev.id.clone(),
        utilization: dev.utilization,
    }
}

/// Clear and recompute every attribution's first/last day and every task's
/// last day.
///
/// On error the planning is left untouched.
pub fn forecast_completion(planning: &mut Planning) -> Result<ForecastSummary, ForecastError> {
    let (forecasts, cursors) = ForecastEngine::new(planning).execute()?;

    planning.clear_forecast();
    let mut attribution_count = 0;
    for (task, forecast) in planning.tasks.iter_mut().zip(forecasts) {
        for (dev_id, result) in forecast.attributions {
            if let Some(attribution) = task.attributions.get_mut(&dev_id) {
                attribution.first_day = result.first_day;
                attribution.last_day = Some(result.last_day);
                attribution_count += 1;
            }
        }
        task.last_day = forecast.last_day;
    }

    let summary = ForecastSummary {
        task_count: planning.tasks.len(),
        attribution_count,
        completion_day: planning.completion_day(),
        next_free_day: cursors
            .iter()
            .map(|(id, day)| (id.clone(), day))
            .collect(),
    };
    info!(
        tasks = summary.task_count,
        attributions = summary.attribution_count,
        finish = ?summary.completion_day.map(|day| day.to_string()),
        "forecast complete"
    );
    Ok(summary)
}
