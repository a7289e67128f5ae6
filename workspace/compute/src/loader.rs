//! Loading of the historical and forecast measurement files.
//!
//! Both files are read with the polars CSV reader, given a `datetime`
//! column, tagged with their provenance and stacked into one time-sorted
//! combined table. Any failure on that path discards both files and the
//! synthetic dataset is used instead.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use common::{DateRange, Provenance};
use polars::prelude::*;
use tracing::{debug, error, info, instrument, trace, warn};

use crate::error::{ComputeError, Result};
use crate::frame::{self, DATE_COLUMN, DATETIME_COLUMN};
use crate::synthetic;

/// Default location of the recorded hourly measurements.
pub const DEFAULT_HISTORICAL_PATH: &str = "data/patient_180days_hourly.csv";
/// Default location of the forecast measurements.
pub const DEFAULT_PREDICTED_PATH: &str = "data/Prediction_with_StressIndex.csv";

/// Days of history assumed when a historical file carries no timestamps.
pub const HISTORY_DAYS: i64 = 180;

const TIMESTAMP_FORMATS: [&str; 7] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// The pair of input files. Also the key of the process-wide dataset cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatasetPaths {
    pub historical: PathBuf,
    pub predicted: PathBuf,
}

impl DatasetPaths {
    pub fn new(historical: impl Into<PathBuf>, predicted: impl Into<PathBuf>) -> Self {
        Self {
            historical: historical.into(),
            predicted: predicted.into(),
        }
    }
}

impl Default for DatasetPaths {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORICAL_PATH, DEFAULT_PREDICTED_PATH)
    }
}

/// Where the loaded rows actually came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Both input files were read successfully
    Files,
    /// The input files were unusable; `reason` is shown to the user
    Synthetic { reason: String },
}

impl DataSource {
    pub fn label(&self) -> &'static str {
        match self {
            DataSource::Files => "files",
            DataSource::Synthetic { .. } => "synthetic",
        }
    }
}

/// Historical, predicted and combined measurement tables of one session.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub historical: DataFrame,
    pub predicted: DataFrame,
    /// Both tables stacked and sorted by `datetime`
    pub combined: DataFrame,
    pub source: DataSource,
}

impl Dataset {
    /// Stacks the two tagged tables and sorts the result by time. Rows with
    /// equal timestamps keep their input order, historical first.
    pub fn from_parts(historical: DataFrame, predicted: DataFrame, source: DataSource) -> Result<Self> {
        let stacked = historical.vstack(&predicted)?;
        let combined = stacked.sort(
            [DATETIME_COLUMN],
            SortMultipleOptions::default().with_maintain_order(true),
        )?;
        debug!(
            historical_rows = historical.height(),
            predicted_rows = predicted.height(),
            combined_rows = combined.height(),
            "Combined dataset built"
        );

        Ok(Self {
            historical,
            predicted,
            combined,
            source,
        })
    }

    /// Numeric attributes selectable in the dashboard.
    pub fn attributes(&self) -> Vec<String> {
        frame::numeric_columns(&self.combined)
    }

    pub fn rows(&self) -> usize {
        self.combined.height()
    }

    /// First and last calendar day of the combined table.
    pub fn date_bounds(&self) -> Result<Option<DateRange>> {
        let timestamps = frame::timestamps(&self.combined)?;
        let first = timestamps.iter().min();
        let last = timestamps.iter().max();
        Ok(match (first, last) {
            (Some(first), Some(last)) => Some(DateRange::new(first.date(), last.date())),
            _ => None,
        })
    }
}

/// Loads the dataset, substituting synthetic data if the files cannot be
/// used.
///
/// The only error left is a failure to build the synthetic substitute itself.
#[instrument(skip(paths), fields(historical = %paths.historical.display(), predicted = %paths.predicted.display()))]
pub fn load_dataset(paths: &DatasetPaths, now: NaiveDateTime) -> Result<Dataset> {
    let now = now.with_nanosecond(0).unwrap_or(now);
    match load_from_files(paths, now) {
        Ok(dataset) => {
            info!(rows = dataset.rows(), "Loaded measurement files");
            Ok(dataset)
        }
        Err(e) => {
            error!(error = %e, "Error loading data, using synthetic data instead");
            synthetic::synthetic_dataset(now, e.to_string())
        }
    }
}

/// Reads both files. Any error discards both of them.
pub fn load_from_files(paths: &DatasetPaths, now: NaiveDateTime) -> Result<Dataset> {
    let historical_raw = read_csv(&paths.historical)?;
    let predicted_raw = read_csv(&paths.predicted)?;

    let attributes = shared_numeric_columns(&historical_raw, &predicted_raw)?;
    debug!(?attributes, "Numeric attributes shared by both files");

    let historical_times =
        derive_timestamps(&historical_raw, now - Duration::days(HISTORY_DAYS))?;
    // A forecast without timestamps continues one hour after the last
    // historical measurement.
    let predicted_start = historical_times
        .iter()
        .max()
        .map(|last| *last + Duration::hours(1))
        .unwrap_or(now);
    let predicted_times = derive_timestamps(&predicted_raw, predicted_start)?;

    let historical = tag(&historical_raw, &historical_times, &attributes, Provenance::Historical)?;
    let predicted = tag(&predicted_raw, &predicted_times, &attributes, Provenance::Predicted)?;

    Dataset::from_parts(historical, predicted, DataSource::Files)
}

fn read_csv(path: &Path) -> Result<DataFrame> {
    trace!(path = %path.display(), "Reading CSV");
    if !path.is_file() {
        return Err(ComputeError::MissingFile(path.to_path_buf()));
    }
    // Column types are inferred from every row, so a decimal after a long
    // run of integer readings still parses.
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    debug!(path = %path.display(), rows = df.height(), columns = df.width(), "CSV read");
    Ok(df)
}

fn shared_numeric_columns(historical: &DataFrame, predicted: &DataFrame) -> Result<Vec<String>> {
    let predicted_columns = frame::numeric_columns(predicted);
    let shared: Vec<String> = frame::numeric_columns(historical)
        .into_iter()
        .filter(|name| predicted_columns.contains(name))
        .collect();

    if shared.is_empty() {
        return Err(ComputeError::NoNumericColumns(
            "the historical and predicted files".to_string(),
        ));
    }
    Ok(shared)
}

/// Timestamp per row: the `datetime` column, else the `date` column, else
/// hourly steps starting at `synthesized_start`.
fn derive_timestamps(raw: &DataFrame, synthesized_start: NaiveDateTime) -> Result<Vec<NaiveDateTime>> {
    for name in [DATETIME_COLUMN, DATE_COLUMN] {
        if frame::has_column(raw, name) {
            trace!(column = name, "Parsing timestamp column");
            return parse_timestamp_column(raw, name);
        }
    }
    warn!(
        rows = raw.height(),
        start = %synthesized_start,
        "No timestamp column, synthesizing hourly timestamps"
    );
    Ok(hourly_range(synthesized_start, raw.height()))
}

fn parse_timestamp_column(raw: &DataFrame, name: &str) -> Result<Vec<NaiveDateTime>> {
    let text = raw
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::String)?;

    text.str()?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            let value = value.ok_or_else(|| {
                ComputeError::Timestamp(format!("empty {} value in row {}", name, row))
            })?;
            parse_timestamp(value).ok_or_else(|| {
                ComputeError::Timestamp(format!("cannot parse {} '{}' in row {}", name, value, row))
            })
        })
        .collect()
}

/// Parses the timestamp notations found in exported measurement files.
/// Plain dates are read as midnight.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.naive_utc());
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

/// `count` timestamps one hour apart, starting at `start`.
pub fn hourly_range(start: NaiveDateTime, count: usize) -> Vec<NaiveDateTime> {
    (0..count as i64).map(|hour| start + Duration::hours(hour)).collect()
}

fn tag(
    raw: &DataFrame,
    timestamps: &[NaiveDateTime],
    attributes: &[String],
    provenance: Provenance,
) -> Result<DataFrame> {
    let columns = attributes
        .iter()
        .map(|name| {
            Ok(raw
                .column(name)?
                .as_materialized_series()
                .cast(&DataType::Float64)?)
        })
        .collect::<Result<Vec<Series>>>()?;

    frame::assemble(timestamps, columns, provenance)
}
