use crate::calendar::CalendarConfigError;
use std::io;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid calendar: {0}")]
    Calendar(#[from] CalendarConfigError),
    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported format {0:?} (expected yaml, json or csv)")]
pub struct UnsupportedFormat(pub String);

/// Document format for planning input and forecast output.
///
/// CSV is export-only: it flattens attributions into rows and cannot be read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlanningFormat {
    #[default]
    Yaml,
    Json,
    Csv,
}

impl PlanningFormat {
    /// Guess from the file extension, falling back to YAML.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Yaml,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

impl FromStr for PlanningFormat {
    type Err = UnsupportedFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(UnsupportedFormat(other.to_string())),
        }
    }
}

pub mod file;

pub use file::{
    load_planning, planning_from_json_str, planning_from_yaml_str, planning_to_json_string,
    planning_to_yaml_string, save_forecast_to_csv, save_planning, save_planning_to_json,
    save_planning_to_yaml, write_forecast_csv,
};
