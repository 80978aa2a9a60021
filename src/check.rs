use crate::availability::AvailabilityMap;
use crate::day::Day;
use crate::model::{DeveloperId, Planning, SupportWeek, Task};
use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

/// First invariant violation found in a planning.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckError {
    #[error("developer {0} is listed more than once")]
    DuplicateDeveloper(DeveloperId),

    #[error(
        "developer {dev_id} has invalid utilization {utilization} \
         (must be greater than 0 and keep every allocation within the calendar range)"
    )]
    InvalidUtilization { dev_id: DeveloperId, utilization: f64 },

    #[error("task {task:?} needs to have at least one attribution")]
    TaskWithoutAttributions { task: String },

    #[error("developer {dev_id} mentioned in task {task:?} does not exist")]
    UnknownDeveloper { task: String, dev_id: DeveloperId },

    #[error("attribution of {dev_id} on task {task:?} has a last day but no first day")]
    LastDayWithoutFirstDay { task: String, dev_id: DeveloperId },

    #[error(
        "attribution of {dev_id} on task {task:?} ends on {last_day} \
         before it starts on {first_day}"
    )]
    InvertedAttributionRange {
        task: String,
        dev_id: DeveloperId,
        first_day: Day,
        last_day: Day,
    },

    #[error(
        "attribution of {dev_id} on task {task:?} from {first_day} to {last_day} \
         covers {actual} working days, expected {expected}"
    )]
    EffortMismatch {
        task: String,
        dev_id: DeveloperId,
        first_day: Day,
        last_day: Day,
        expected: i64,
        actual: i64,
    },

    #[error("task {task:?} ends on {last_day} but none of its attributions has a last day")]
    TaskLastDayWithoutAttributionLastDay { task: String, last_day: Day },

    #[error("task {task:?} ends on {declared} but its attributions end on {computed}")]
    TaskLastDayMismatch {
        task: String,
        declared: Day,
        computed: Day,
    },

    #[error("developer {} mentioned in support week {week} does not exist", .week.dev_id)]
    UnknownSupportWeekDeveloper { week: SupportWeek },

    #[error("support week {week} is empty")]
    EmptySupportWeek { week: SupportWeek },

    #[error("day {day} is in more than one support week")]
    OverlappingSupportWeeks { day: Day },
}

/// Verify every planning invariant and return the first violation.
///
/// Developers are checked first, then tasks in priority order, then support weeks.
pub fn check_planning(planning: &Planning) -> Result<(), CheckError> {
    check_developers(planning)?;

    let availability = AvailabilityMap::for_planning(planning);
    for task in &planning.tasks {
        check_task(task, planning, &availability)?;
    }

    check_support_weeks(planning)?;

    debug!(
        tasks = planning.tasks.len(),
        developers = planning.developers.len(),
        support_weeks = planning.support_weeks.len(),
        "planning is consistent"
    );
    Ok(())
}

fn check_developers(planning: &Planning) -> Result<(), CheckError> {
    let mut seen = HashSet::with_capacity(planning.developers.len());
    for dev in &planning.developers {
        if !seen.insert(&dev.id) {
            return Err(CheckError::DuplicateDeveloper(dev.id.clone()));
        }
        if !dev.has_valid_utilization() {
            return Err(CheckError::InvalidUtilization {
                dev_id: dev.id.clone(),
                utilization: dev.utilization,
            });
        }
    }
    Ok(())
}

fn check_task(
    task: &Task,
    planning: &Planning,
    availability: &AvailabilityMap<'_>,
) -> Result<(), CheckError> {
    if task.attributions.is_empty() {
        return Err(CheckError::TaskWithoutAttributions {
            task: task.name.clone(),
        });
    }

    for (dev_id, attribution) in &task.attributions {
        let Some(dev) = planning.developer(dev_id.as_str()) else {
            return Err(CheckError::UnknownDeveloper {
                task: task.name.clone(),
                dev_id: dev_id.clone(),
            });
        };

        match (attribution.first_day, attribution.last_day) {
            // A zero-effort allocation legitimately ends without ever starting.
            (None, Some(_)) if attribution.effort_days > 0 => {
                return Err(CheckError::LastDayWithoutFirstDay {
                    task: task.name.clone(),
                    dev_id: dev_id.clone(),
                });
            }
            (Some(first_day), Some(last_day)) if first_day > last_day => {
                return Err(CheckError::InvertedAttributionRange {
                    task: task.name.clone(),
                    dev_id: dev_id.clone(),
                    first_day,
                    last_day,
                });
            }
            (Some(first_day), Some(last_day)) => {
                let Some(expected) = dev.required_working_days(attribution.effort_days) else {
                    return Err(CheckError::InvalidUtilization {
                        dev_id: dev_id.clone(),
                        utilization: dev.utilization,
                    });
                };
                let actual = availability.count_workable(dev_id.as_str(), first_day, last_day);
                if actual != expected {
                    return Err(CheckError::EffortMismatch {
                        task: task.name.clone(),
                        dev_id: dev_id.clone(),
                        first_day,
                        last_day,
                        expected,
                        actual,
                    });
                }
            }
            _ => {}
        }
    }

    let Some(declared) = task.last_day else {
        return Ok(());
    };
    let Some(computed) = task.latest_attribution_day() else {
        return Err(CheckError::TaskLastDayWithoutAttributionLastDay {
            task: task.name.clone(),
            last_day: declared,
        });
    };
    let all_dated = task
        .attributions
        .values()
        .all(|attribution| attribution.last_day.is_some());
    if all_dated && declared != computed {
        return Err(CheckError::TaskLastDayMismatch {
            task: task.name.clone(),
            declared,
            computed,
        });
    }
    Ok(())
}

fn check_support_weeks(planning: &Planning) -> Result<(), CheckError> {
    let weeks = &planning.support_weeks;
    for week in weeks {
        if planning.developer(week.dev_id.as_str()).is_none() {
            return Err(CheckError::UnknownSupportWeekDeveloper { week: week.clone() });
        }
        if week.is_empty() {
            return Err(CheckError::EmptySupportWeek { week: week.clone() });
        }
    }

    let (Some(min_day), Some(max_day)) = (
        weeks.iter().map(|week| week.first_day).min(),
        weeks.iter().map(|week| week.last_day).max(),
    ) else {
        return Ok(());
    };

    let mut occupied = vec![false; (max_day - min_day + 1) as usize];
    for week in weeks {
        for day in week.days() {
            let slot = &mut occupied[(day - min_day) as usize];
            if *slot {
                return Err(CheckError::OverlappingSupportWeeks { day });
            }
            *slot = true;
        }
    }
    Ok(())
}
