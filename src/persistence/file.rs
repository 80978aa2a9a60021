use super::{PersistenceError, PersistenceResult, PlanningFormat};
use crate::{
    calendar::{CalendarConfigError, WorkCalendar, WorkCalendarConfig},
    day::Day,
    model::{Developer, Planning, SupportWeek, Task},
};
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

const DEFAULT_WORKING_DAYS: [Weekday; 5] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
];

/// On-disk shape of a planning. Dates are `dd/mm/yyyy` strings.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlanningDocument {
    start_day: Day,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    holidays: Vec<Day>,
    /// Allow-list of open days; mutually exclusive with `holidays`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    calendar: Option<Vec<Day>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    working_days: Option<Vec<Weekday>>,
    #[serde(default)]
    developers: Vec<Developer>,
    #[serde(default)]
    support_weeks: Vec<SupportWeek>,
    #[serde(default)]
    tasks: Vec<Task>,
}

impl PlanningDocument {
    fn from_planning(planning: &Planning) -> Self {
        let config = planning.calendar.to_config();
        let working_days = (config.working_days() != DEFAULT_WORKING_DAYS.as_slice())
            .then(|| config.working_days().to_vec());

        Self {
            start_day: planning.start_day,
            holidays: config.holidays().to_vec(),
            calendar: config.open_days().map(<[Day]>::to_vec),
            working_days,
            developers: planning.developers.clone(),
            support_weeks: planning.support_weeks.clone(),
            tasks: planning.tasks.clone(),
        }
    }

    fn into_planning(self) -> PersistenceResult<Planning> {
        let working_days = self
            .working_days
            .unwrap_or_else(|| DEFAULT_WORKING_DAYS.to_vec());
        let config = match self.calendar {
            Some(_) if !self.holidays.is_empty() => {
                return Err(CalendarConfigError::ConflictingRules.into());
            }
            Some(open_days) => WorkCalendarConfig::with_open_days(working_days, open_days),
            None => WorkCalendarConfig::new(working_days, self.holidays),
        };

        let mut planning = Planning::new(self.start_day, WorkCalendar::from_config(&config)?);
        planning.developers = self.developers;
        planning.support_weeks = self.support_weeks;
        planning.tasks = self.tasks;
        Ok(planning)
    }
}

pub fn planning_from_yaml_str(input: &str) -> PersistenceResult<Planning> {
    let document: PlanningDocument = serde_yaml::from_str(input)?;
    document.into_planning()
}

pub fn planning_from_json_str(input: &str) -> PersistenceResult<Planning> {
    let document: PlanningDocument = serde_json::from_str(input)?;
    document.into_planning()
}

pub fn planning_to_yaml_string(planning: &Planning) -> PersistenceResult<String> {
    Ok(serde_yaml::to_string(&PlanningDocument::from_planning(
        planning,
    ))?)
}

pub fn planning_to_json_string(planning: &Planning) -> PersistenceResult<String> {
    Ok(serde_json::to_string_pretty(
        &PlanningDocument::from_planning(planning),
    )?)
}

/// Load a planning, picking JSON or YAML from the file extension.
pub fn load_planning<P: AsRef<Path>>(path: P) -> PersistenceResult<Planning> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    match PlanningFormat::from_path(path) {
        PlanningFormat::Json => planning_from_json_str(&content),
        PlanningFormat::Yaml => planning_from_yaml_str(&content),
        PlanningFormat::Csv => Err(PersistenceError::InvalidData(format!(
            "{} is a csv export and cannot be loaded as a planning",
            path.display()
        ))),
    }
}

pub fn save_planning_to_yaml<P: AsRef<Path>>(
    planning: &Planning,
    path: P,
) -> PersistenceResult<()> {
    fs::write(path, planning_to_yaml_string(planning)?)?;
    Ok(())
}

pub fn save_planning_to_json<P: AsRef<Path>>(
    planning: &Planning,
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &PlanningDocument::from_planning(planning))?;
    Ok(())
}

pub fn save_planning<P: AsRef<Path>>(
    planning: &Planning,
    path: P,
    format: PlanningFormat,
) -> PersistenceResult<()> {
    match format {
        PlanningFormat::Yaml => save_planning_to_yaml(planning, path),
        PlanningFormat::Json => save_planning_to_json(planning, path),
        PlanningFormat::Csv => save_forecast_to_csv(planning, path),
    }
}

#[derive(Serialize)]
struct AttributionCsvRecord<'a> {
    priority: usize,
    task: &'a str,
    developer: &'a str,
    effort_days: u32,
    first_day: String,
    last_day: String,
    task_last_day: String,
}

/// One row per attribution, tasks in priority order (1 = highest).
pub fn write_forecast_csv<W: Write>(planning: &Planning, writer: W) -> PersistenceResult<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for (idx, task) in planning.tasks.iter().enumerate() {
        for (dev_id, attribution) in &task.attributions {
            writer.serialize(AttributionCsvRecord {
                priority: idx + 1,
                task: &task.name,
                developer: dev_id.as_str(),
                effort_days: attribution.effort_days,
                first_day: format_day(attribution.first_day),
                last_day: format_day(attribution.last_day),
                task_last_day: format_day(task.last_day),
            })?;
        }
    }
    writer.flush()?;
    Ok(())
}

pub fn save_forecast_to_csv<P: AsRef<Path>>(
    planning: &Planning,
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    write_forecast_csv(planning, file)
}

fn format_day(day: Option<Day>) -> String {
    day.map(|d| d.to_string()).unwrap_or_default()
}
