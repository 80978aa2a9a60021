pub mod availability;
pub mod calendar;
pub mod check;
pub mod day;
pub mod forecast;
pub mod model;
pub mod persistence;

pub use availability::AvailabilityMap;
pub use calendar::{CalendarConfigError, WorkCalendar, WorkCalendarConfig};
pub use check::{CheckError, check_planning};
pub use day::{Day, DayParseError};
pub use forecast::{
    DeveloperCursors, ForecastEngine, ForecastError, ForecastSummary, forecast_completion,
};
pub use model::{
    Attribution, Developer, DeveloperId, EffortDays, MAX_WORKING_DAYS, Planning, SupportWeek, Task,
};
pub use persistence::{
    PersistenceError, PlanningFormat, load_planning, planning_from_json_str,
    planning_from_yaml_str, planning_to_json_string, planning_to_yaml_string,
    save_forecast_to_csv, save_planning, save_planning_to_json, save_planning_to_yaml,
};
