//! Column conventions of the measurement tables and helpers to move data
//! between polars frames and plain Rust vectors.
//!
//! Every table produced by the loader has the same layout: a `datetime`
//! column (millisecond `Datetime`), one `Float64` column per attribute and a
//! `data_type` column holding the provenance label.

use chrono::{DateTime, NaiveDateTime};
use common::Provenance;
use polars::prelude::*;

use crate::error::{ComputeError, Result};

/// Timestamp column of every measurement table.
pub const DATETIME_COLUMN: &str = "datetime";
/// Alternative timestamp column accepted in input files.
pub const DATE_COLUMN: &str = "date";
/// Provenance label column.
pub const DATA_TYPE_COLUMN: &str = "data_type";

const RESERVED_COLUMNS: [&str; 3] = [DATETIME_COLUMN, DATE_COLUMN, DATA_TYPE_COLUMN];

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float64
            | DataType::Float32
            | DataType::Int64
            | DataType::Int32
            | DataType::UInt64
            | DataType::UInt32
    )
}

/// Names of the numeric attribute columns, in frame order.
pub fn numeric_columns(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|column| !RESERVED_COLUMNS.contains(&column.name().as_str()))
        .filter(|column| is_numeric(column.dtype()))
        .map(|column| column.name().to_string())
        .collect()
}

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_columns().iter().any(|column| column.name().as_str() == name)
}

/// Builds a measurement table from timestamps, attribute series and a
/// single provenance tag applied to every row.
pub fn assemble(
    timestamps: &[NaiveDateTime],
    attributes: Vec<Series>,
    provenance: Provenance,
) -> Result<DataFrame> {
    let millis: Vec<i64> = timestamps
        .iter()
        .map(|ts| ts.and_utc().timestamp_millis())
        .collect();
    let datetime = Series::new(DATETIME_COLUMN.into(), millis)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
    let labels = Series::new(
        DATA_TYPE_COLUMN.into(),
        vec![provenance.as_str(); timestamps.len()],
    );

    let mut columns: Vec<Column> = Vec::with_capacity(attributes.len() + 2);
    columns.push(datetime.into());
    columns.extend(attributes.into_iter().map(Column::from));
    columns.push(labels.into());

    Ok(DataFrame::new(columns)?)
}

/// Reads the `datetime` column back as chrono timestamps.
pub fn timestamps(df: &DataFrame) -> Result<Vec<NaiveDateTime>> {
    let millis = df
        .column(DATETIME_COLUMN)?
        .as_materialized_series()
        .cast(&DataType::Int64)?;

    millis
        .i64()?
        .into_iter()
        .map(|value| {
            value
                .and_then(DateTime::from_timestamp_millis)
                .map(|ts| ts.naive_utc())
                .ok_or_else(|| ComputeError::Timestamp("null or out of range timestamp".into()))
        })
        .collect()
}

/// Reads the `data_type` column as provenance tags.
pub fn provenance(df: &DataFrame) -> Result<Vec<Provenance>> {
    let labels = df.column(DATA_TYPE_COLUMN)?.as_materialized_series().str()?;

    labels
        .into_iter()
        .map(|label| {
            label
                .ok_or_else(|| ComputeError::DataFrame("row without data_type".into()))?
                .parse::<Provenance>()
                .map_err(ComputeError::DataFrame)
        })
        .collect()
}

/// Attribute column as nullable floats, one entry per row.
pub fn attribute_column(df: &DataFrame, attribute: &str) -> Result<Vec<Option<f64>>> {
    if !has_column(df, attribute) {
        return Err(ComputeError::UnknownAttribute(attribute.to_string()));
    }
    let values = df
        .column(attribute)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;

    Ok(values.f64()?.into_iter().collect())
}

/// Non-null attribute values in row order.
pub fn attribute_values(df: &DataFrame, attribute: &str) -> Result<Vec<f64>> {
    Ok(attribute_column(df, attribute)?.into_iter().flatten().collect())
}
