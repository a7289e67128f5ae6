//! Automated observations about the filtered view.
//!
//! Three rules run in a fixed order: the historical/predicted mean shift,
//! the linear trend and the variability class. A rule whose preconditions
//! are not met is skipped without an error.

use common::{Insight, InsightKind, Provenance, ProvenanceFilter, Severity};
use polars::prelude::DataFrame;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::frame;
use crate::stats;

/// Percentage change beyond which the mean shift is flagged.
pub const SHIFT_THRESHOLD_PCT: f64 = 10.0;
/// CV above which variability is high.
pub const HIGH_VARIABILITY_PCT: f64 = 20.0;
/// CV below which variability is low.
pub const LOW_VARIABILITY_PCT: f64 = 10.0;

/// Runs all rules over `view` for one attribute.
#[instrument(skip(view), fields(rows = view.height()))]
pub fn generate_insights(
    view: &DataFrame,
    attribute: &str,
    filter: ProvenanceFilter,
) -> Result<Vec<Insight>> {
    let values = frame::attribute_column(view, attribute)?;
    let tags = frame::provenance(view)?;

    let mut historical = Vec::new();
    let mut predicted = Vec::new();
    for (value, provenance) in values.iter().zip(&tags) {
        if let Some(value) = value {
            match provenance {
                Provenance::Historical => historical.push(*value),
                Provenance::Predicted => predicted.push(*value),
            }
        }
    }
    let all: Vec<f64> = values.into_iter().flatten().collect();

    let mut insights = Vec::with_capacity(3);
    if filter == ProvenanceFilter::Both {
        insights.extend(shift_insight(attribute, &historical, &predicted));
    }
    insights.extend(trend_insight(attribute, &all));
    insights.extend(variability_insight(attribute, &all));

    debug!(count = insights.len(), "Generated insights");
    Ok(insights)
}

/// Mean shift from historical to predicted values. Needs both subsets and
/// a non-zero historical mean.
pub fn shift_insight(attribute: &str, historical: &[f64], predicted: &[f64]) -> Option<Insight> {
    let historical_mean = stats::mean(historical)?;
    let predicted_mean = stats::mean(predicted)?;
    let change = stats::percent_change(historical_mean, predicted_mean)?;

    let insight = if change > SHIFT_THRESHOLD_PCT {
        Insight::new(
            InsightKind::Shift,
            Severity::Warning,
            format!(
                "{} is projected to increase by {:.1}%. Preventive measures recommended.",
                attribute, change
            ),
        )
    } else if change < -SHIFT_THRESHOLD_PCT {
        Insight::new(
            InsightKind::Shift,
            Severity::Positive,
            format!(
                "{} shows signs of improvement with a projected decrease of {:.1}%.",
                attribute,
                change.abs()
            ),
        )
    } else {
        Insight::new(
            InsightKind::Shift,
            Severity::Neutral,
            format!(
                "{} remains relatively stable with minor fluctuations ({:+.1}%).",
                attribute, change
            ),
        )
    };
    Some(insight)
}

/// Direction of the least-squares line through the values in row order.
pub fn trend_insight(attribute: &str, values: &[f64]) -> Option<Insight> {
    let slope = stats::ols_slope(values)?;
    let direction = if slope > 0.0 {
        "an upward"
    } else if slope < 0.0 {
        "a downward"
    } else {
        "a stable"
    };

    Some(Insight::new(
        InsightKind::Trend,
        Severity::Neutral,
        format!(
            "Trend Analysis: {} shows {} trend over the selected period.",
            attribute, direction
        ),
    ))
}

/// Variability class from the coefficient of variation.
pub fn variability_insight(attribute: &str, values: &[f64]) -> Option<Insight> {
    let cv = stats::coefficient_of_variation(values)?;

    let text = if cv > HIGH_VARIABILITY_PCT {
        format!(
            "Variability: High variability detected in {} (CV: {:.1}%). Consider monitoring more closely.",
            attribute, cv
        )
    } else if cv < LOW_VARIABILITY_PCT {
        format!(
            "Variability: Low variability in {} (CV: {:.1}%). Values are relatively consistent.",
            attribute, cv
        )
    } else {
        format!("Variability: Moderate variability in {} (CV: {:.1}%).", attribute, cv)
    };

    Some(Insight::new(InsightKind::Variability, Severity::Neutral, text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{DataSource, Dataset};
    use chrono::{NaiveDate, NaiveDateTime};
    use polars::prelude::*;

    fn hours(start_day: u32, count: usize) -> Vec<NaiveDateTime> {
        let start = NaiveDate::from_ymd_opt(2024, 5, start_day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        (0..count as i64)
            .map(|h| start + chrono::Duration::hours(h))
            .collect()
    }

    fn view(historical: &[f64], predicted: &[f64]) -> DataFrame {
        let h = frame::assemble(
            &hours(1, historical.len()),
            vec![Series::new("StressIndex".into(), historical)],
            Provenance::Historical,
        )
        .unwrap();
        let p = frame::assemble(
            &hours(10, predicted.len()),
            vec![Series::new("StressIndex".into(), predicted)],
            Provenance::Predicted,
        )
        .unwrap();
        Dataset::from_parts(h, p, DataSource::Files).unwrap().combined
    }

    fn kinds(insights: &[Insight]) -> Vec<InsightKind> {
        insights.iter().map(|i| i.kind).collect()
    }

    #[test]
    fn test_shift_up_is_a_warning() {
        let insights =
            generate_insights(&view(&[50.0, 50.0], &[60.0, 60.0]), "StressIndex", ProvenanceFilter::Both)
                .unwrap();
        assert_eq!(
            kinds(&insights),
            vec![InsightKind::Shift, InsightKind::Trend, InsightKind::Variability]
        );
        assert_eq!(insights[0].severity, Severity::Warning);
        assert!(insights[0].text.contains("increase by 20.0%"));
    }

    #[test]
    fn test_shift_down_is_positive() {
        let insight = shift_insight("StressIndex", &[50.0, 50.0], &[40.0, 40.0]).unwrap();
        assert_eq!(insight.severity, Severity::Positive);
        assert!(insight.text.contains("decrease of 20.0%"));
    }

    #[test]
    fn test_small_shift_is_neutral() {
        let insight = shift_insight("StressIndex", &[50.0], &[52.5]).unwrap();
        assert_eq!(insight.severity, Severity::Neutral);
        assert!(insight.text.contains("(+5.0%)"));

        let slight_drop = shift_insight("StressIndex", &[50.0], &[46.0]).unwrap();
        assert_eq!(slight_drop.severity, Severity::Neutral);
        assert!(slight_drop.text.contains("(-8.0%)"));
    }

    #[test]
    fn test_shift_rule_needs_both_subsets_and_filter() {
        let only_predicted = view(&[], &[60.0, 61.0]);
        let insights =
            generate_insights(&only_predicted, "StressIndex", ProvenanceFilter::Both).unwrap();
        assert_eq!(kinds(&insights), vec![InsightKind::Trend, InsightKind::Variability]);

        let both = view(&[50.0], &[60.0]);
        let insights =
            generate_insights(&both, "StressIndex", ProvenanceFilter::Historical).unwrap();
        assert!(!kinds(&insights).contains(&InsightKind::Shift));
    }

    #[test]
    fn test_shift_rule_skips_zero_historical_mean() {
        assert_eq!(shift_insight("StressIndex", &[-1.0, 1.0], &[5.0]), None);
    }

    #[test]
    fn test_trend_directions() {
        let up = trend_insight("HeartRate", &[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert!(up.text.contains("upward"));
        let down = trend_insight("HeartRate", &[4.0, 3.0, 2.0, 1.0]).unwrap();
        assert!(down.text.contains("downward"));
        let flat = trend_insight("HeartRate", &[72.3, 72.3, 72.3]).unwrap();
        assert!(flat.text.contains("stable"));
        assert_eq!(trend_insight("HeartRate", &[72.0]), None);
    }

    #[test]
    fn test_variability_classes() {
        let high = variability_insight("HeartRate", &[10.0, 50.0, 90.0]).unwrap();
        assert!(high.text.contains("High variability"));
        let low = variability_insight("HeartRate", &[100.0, 101.0, 99.0]).unwrap();
        assert!(low.text.contains("Low variability"));
        // mean 100, sample std 15
        let moderate = variability_insight("HeartRate", &[85.0, 100.0, 115.0]).unwrap();
        assert!(moderate.text.contains("Moderate variability"));
    }

    #[test]
    fn test_zero_mean_reports_zero_cv() {
        let insight = variability_insight("Offset", &[-2.0, 0.0, 2.0]).unwrap();
        assert!(insight.text.contains("CV: 0.0%"));
        assert!(insight.text.contains("Low variability"));
    }

    #[test]
    fn test_empty_view_produces_no_insights() {
        let insights = generate_insights(&view(&[], &[]), "StressIndex", ProvenanceFilter::Both).unwrap();
        assert!(insights.is_empty());
    }
}
