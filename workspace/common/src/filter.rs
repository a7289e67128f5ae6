use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};

use crate::ProvenanceFilter;

/// Raw filter selection as submitted by the dashboard controls.
///
/// Every field is optional; missing or blank values fall back to the
/// defaults derived from the loaded dataset. HTML forms submit empty inputs
/// as `field=`, so blank strings are read as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FilterQuery {
    /// Numeric attribute to analyze (e.g. StressIndex)
    #[serde(default, deserialize_with = "empty_as_none")]
    pub attribute: Option<String>,
    /// Data type filter: Both, Historical or Predicted
    #[serde(default, deserialize_with = "empty_as_none")]
    pub provenance: Option<ProvenanceFilter>,
    /// First day of the range, inclusive (YYYY-MM-DD)
    #[serde(default, deserialize_with = "empty_as_none")]
    pub start_date: Option<NaiveDate>,
    /// Last day of the range, inclusive (YYYY-MM-DD)
    #[serde(default, deserialize_with = "empty_as_none")]
    pub end_date: Option<NaiveDate>,
}

fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => T::from_str(value).map(Some).map_err(de::Error::custom),
    }
}

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Builds a range, swapping the bounds if they arrive reversed.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self { start: end, end: start }
        }
    }

    /// Restricts this range to `bounds`. A range lying entirely outside the
    /// bounds is kept as is, so it still selects nothing.
    pub fn clamp_to(&self, bounds: &DateRange) -> Self {
        if self.end < bounds.start || self.start > bounds.end {
            return *self;
        }
        Self {
            start: self.start.max(bounds.start),
            end: self.end.min(bounds.end),
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_blank_form_fields_are_absent() {
        let query: FilterQuery =
            serde_urlencoded::from_str("attribute=&provenance=&start_date=&end_date=").unwrap();
        assert_eq!(query, FilterQuery::default());
    }

    #[test]
    fn test_form_fields_are_parsed() {
        let query: FilterQuery = serde_urlencoded::from_str(
            "attribute=HeartRate&provenance=Predicted&start_date=2024-01-02&end_date=2024-01-05",
        )
        .unwrap();
        assert_eq!(query.attribute.as_deref(), Some("HeartRate"));
        assert_eq!(query.provenance, Some(ProvenanceFilter::Predicted));
        assert_eq!(query.start_date, Some(date(2024, 1, 2)));
        assert_eq!(query.end_date, Some(date(2024, 1, 5)));
    }

    #[test]
    fn test_invalid_provenance_is_rejected() {
        let result: Result<FilterQuery, _> = serde_urlencoded::from_str("provenance=Forecast");
        assert!(result.is_err());
    }

    #[test]
    fn test_date_range_swaps_reversed_bounds() {
        let range = DateRange::new(date(2024, 3, 1), date(2024, 1, 1));
        assert_eq!(range.start, date(2024, 1, 1));
        assert_eq!(range.end, date(2024, 3, 1));
    }

    #[test]
    fn test_clamp_keeps_disjoint_range() {
        let bounds = DateRange::new(date(2024, 1, 1), date(2024, 1, 31));
        let inside = DateRange::new(date(2023, 12, 1), date(2024, 1, 10)).clamp_to(&bounds);
        assert_eq!(inside, DateRange::new(date(2024, 1, 1), date(2024, 1, 10)));

        let outside = DateRange::new(date(2025, 1, 1), date(2025, 1, 2));
        assert_eq!(outside.clamp_to(&bounds), outside);
    }
}
