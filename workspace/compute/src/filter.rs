use chrono::{NaiveDate, NaiveTime};
use common::{DateRange, FilterQuery, ProvenanceFilter};
use polars::prelude::*;
use tracing::{debug, warn};

use crate::error::Result;
use crate::frame::{DATA_TYPE_COLUMN, DATETIME_COLUMN};
use crate::loader::Dataset;

/// Resolved dashboard selection for one interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    /// Selected numeric attribute, `None` when nothing is selectable
    pub attribute: Option<String>,
    pub provenance: ProvenanceFilter,
    /// Inclusive day range, `None` only for a dataset without rows
    pub date_range: Option<DateRange>,
}

impl FilterState {
    /// Fills the gaps of a raw query from the dataset: first attribute,
    /// both provenances and the full date span. Requested dates are clamped
    /// to the span of the data.
    pub fn resolve(query: &FilterQuery, dataset: &Dataset) -> Result<Self> {
        let attributes = dataset.attributes();
        let attribute = match &query.attribute {
            Some(name) if attributes.contains(name) => Some(name.clone()),
            Some(name) => {
                warn!(attribute = %name, "Requested attribute is not a numeric column");
                None
            }
            None => attributes.first().cloned(),
        };

        let date_range = dataset
            .date_bounds()?
            .map(|bounds| requested_range(query, &bounds));

        let state = Self {
            attribute,
            provenance: query.provenance.unwrap_or_default(),
            date_range,
        };
        debug!(?state, "Resolved filter state");
        Ok(state)
    }

    /// Rows of `combined` inside the date range and matching the provenance
    /// filter, in their original order.
    pub fn apply(&self, combined: &DataFrame) -> Result<DataFrame> {
        let mut predicate: Option<Expr> = None;

        if let Some(range) = self.date_range {
            let (start, end) = day_bounds_millis(&range);
            let millis = col(DATETIME_COLUMN).cast(DataType::Int64);
            predicate = Some(millis.clone().gt_eq(lit(start)).and(millis.lt(lit(end))));
        }

        if let Some(provenance) = self.provenance.only() {
            let by_type = col(DATA_TYPE_COLUMN).eq(lit(provenance.as_str()));
            predicate = Some(match predicate {
                Some(expr) => expr.and(by_type),
                None => by_type,
            });
        }

        let filtered = match predicate {
            Some(expr) => combined.clone().lazy().filter(expr).collect()?,
            None => combined.clone(),
        };
        debug!(rows = filtered.height(), "Filtered view");
        Ok(filtered)
    }
}

/// Day range of a query within `bounds`. A one-sided request lying beyond
/// the data stays outside it, so it selects nothing.
fn requested_range(query: &FilterQuery, bounds: &DateRange) -> DateRange {
    match (query.start_date, query.end_date) {
        (Some(start), None) if start > bounds.end => DateRange::new(start, start),
        (None, Some(end)) if end < bounds.start => DateRange::new(end, end),
        (start, end) => DateRange::new(
            start.unwrap_or(bounds.start),
            end.unwrap_or(bounds.end),
        )
        .clamp_to(bounds),
    }
}

/// Half-open millisecond window `[start 00:00, day after end 00:00)`.
fn day_bounds_millis(range: &DateRange) -> (i64, i64) {
    let start = midnight_millis(range.start);
    let end = range.end.succ_opt().map(midnight_millis).unwrap_or(i64::MAX);
    (start, end)
}

fn midnight_millis(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame;
    use crate::loader::DataSource;
    use chrono::NaiveDateTime;
    use common::Provenance;

    fn ts(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn dataset() -> Dataset {
        let historical = frame::assemble(
            &[ts(1, 0), ts(1, 23), ts(2, 12)],
            vec![Series::new("HeartRate".into(), &[70.0, 71.0, 72.0])],
            Provenance::Historical,
        )
        .unwrap();
        let predicted = frame::assemble(
            &[ts(3, 0), ts(3, 12), ts(4, 6)],
            vec![Series::new("HeartRate".into(), &[80.0, 81.0, 82.0])],
            Provenance::Predicted,
        )
        .unwrap();
        Dataset::from_parts(historical, predicted, DataSource::Files).unwrap()
    }

    #[test]
    fn test_resolve_defaults() {
        let dataset = dataset();
        let state = FilterState::resolve(&FilterQuery::default(), &dataset).unwrap();

        assert_eq!(state.attribute.as_deref(), Some("HeartRate"));
        assert_eq!(state.provenance, ProvenanceFilter::Both);
        assert_eq!(state.date_range, Some(DateRange::new(date(1), date(4))));
        assert_eq!(state.apply(&dataset.combined).unwrap().height(), 6);
    }

    #[test]
    fn test_unknown_attribute_is_unselectable() {
        let query = FilterQuery {
            attribute: Some("BloodSugar".into()),
            ..Default::default()
        };
        let state = FilterState::resolve(&query, &dataset()).unwrap();
        assert_eq!(state.attribute, None);
    }

    #[test]
    fn test_date_range_is_inclusive_of_whole_days() {
        let dataset = dataset();
        let query = FilterQuery {
            start_date: Some(date(1)),
            end_date: Some(date(1)),
            ..Default::default()
        };
        let state = FilterState::resolve(&query, &dataset).unwrap();
        let view = state.apply(&dataset.combined).unwrap();
        assert_eq!(frame::attribute_values(&view, "HeartRate").unwrap(), vec![70.0, 71.0]);
    }

    #[test]
    fn test_provenance_and_dates_combine() {
        let dataset = dataset();
        let query = FilterQuery {
            provenance: Some(ProvenanceFilter::Predicted),
            start_date: Some(date(2)),
            end_date: Some(date(3)),
            ..Default::default()
        };
        let state = FilterState::resolve(&query, &dataset).unwrap();
        let view = state.apply(&dataset.combined).unwrap();
        assert_eq!(frame::attribute_values(&view, "HeartRate").unwrap(), vec![80.0, 81.0]);
    }

    #[test]
    fn test_range_outside_data_selects_nothing() {
        let dataset = dataset();
        let query = FilterQuery {
            start_date: Some(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()),
            end_date: Some(NaiveDate::from_ymd_opt(2030, 1, 31).unwrap()),
            ..Default::default()
        };
        let state = FilterState::resolve(&query, &dataset).unwrap();
        assert_eq!(state.apply(&dataset.combined).unwrap().height(), 0);
    }

    #[test]
    fn test_start_after_data_selects_nothing() {
        let dataset = dataset();
        let query = FilterQuery {
            start_date: Some(date(10)),
            ..Default::default()
        };
        let state = FilterState::resolve(&query, &dataset).unwrap();
        assert_eq!(state.date_range, Some(DateRange::new(date(10), date(10))));
        assert_eq!(state.apply(&dataset.combined).unwrap().height(), 0);
    }

    #[test]
    fn test_end_before_data_selects_nothing() {
        let dataset = dataset();
        let query = FilterQuery {
            end_date: Some(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()),
            ..Default::default()
        };
        let state = FilterState::resolve(&query, &dataset).unwrap();
        assert_eq!(state.apply(&dataset.combined).unwrap().height(), 0);
    }

    #[test]
    fn test_one_sided_range_inside_data_is_completed() {
        let dataset = dataset();
        let query = FilterQuery {
            start_date: Some(date(3)),
            ..Default::default()
        };
        let state = FilterState::resolve(&query, &dataset).unwrap();
        assert_eq!(state.date_range, Some(DateRange::new(date(3), date(4))));
        assert_eq!(state.apply(&dataset.combined).unwrap().height(), 3);
    }
}
