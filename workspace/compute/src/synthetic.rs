//! Deterministic stand-in dataset used when the input files are unusable.

use chrono::{Duration, NaiveDateTime};
use common::Provenance;
use polars::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use tracing::{debug, instrument};

use crate::error::{ComputeError, Result};
use crate::frame;
use crate::loader::{hourly_range, DataSource, Dataset, HISTORY_DAYS};

/// Days of synthetic forecast.
pub const FORECAST_DAYS: i64 = 90;

const SEED: u64 = 42;

/// Normal distribution parameters of one synthetic metric.
struct MetricProfile {
    name: &'static str,
    historical: (f64, f64),
    predicted: (f64, f64),
    clip: (f64, f64),
}

const PROFILES: [MetricProfile; 4] = [
    MetricProfile {
        name: "StressIndex",
        historical: (50.0, 15.0),
        predicted: (55.0, 12.0),
        clip: (0.0, 100.0),
    },
    MetricProfile {
        name: "HeartRate",
        historical: (75.0, 10.0),
        predicted: (78.0, 8.0),
        clip: (50.0, 120.0),
    },
    MetricProfile {
        name: "SystolicBP",
        historical: (120.0, 15.0),
        predicted: (125.0, 12.0),
        clip: (90.0, 180.0),
    },
    MetricProfile {
        name: "DiastolicBP",
        historical: (80.0, 10.0),
        predicted: (82.0, 8.0),
        clip: (60.0, 120.0),
    },
];

/// 180 days of hourly history ending just before `now`, followed by 90
/// days of hourly forecast starting at `now`.
#[instrument(skip(reason))]
pub fn synthetic_dataset(now: NaiveDateTime, reason: String) -> Result<Dataset> {
    let mut rng = StdRng::seed_from_u64(SEED);

    let historical_times = hourly_range(now - Duration::days(HISTORY_DAYS), (HISTORY_DAYS * 24) as usize);
    let predicted_times = hourly_range(now, (FORECAST_DAYS * 24) as usize);

    let historical = generate(&mut rng, &historical_times, Provenance::Historical)?;
    let predicted = generate(&mut rng, &predicted_times, Provenance::Predicted)?;
    debug!(
        historical_rows = historical.height(),
        predicted_rows = predicted.height(),
        "Generated synthetic measurements"
    );

    Dataset::from_parts(historical, predicted, DataSource::Synthetic { reason })
}

fn generate(rng: &mut StdRng, timestamps: &[NaiveDateTime], provenance: Provenance) -> Result<DataFrame> {
    let columns = PROFILES
        .iter()
        .map(|profile| {
            let (mean, std_dev) = match provenance {
                Provenance::Historical => profile.historical,
                Provenance::Predicted => profile.predicted,
            };
            let normal = Normal::new(mean, std_dev)
                .map_err(|e| ComputeError::Synthetic(format!("{}: {}", profile.name, e)))?;
            let (low, high) = profile.clip;
            let values: Vec<f64> = (0..timestamps.len())
                .map(|_| normal.sample(rng).clamp(low, high))
                .collect();
            Ok(Series::new(profile.name.into(), values))
        })
        .collect::<Result<Vec<Series>>>()?;

    frame::assemble(timestamps, columns, provenance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_synthetic_shape_and_ranges() {
        let dataset = synthetic_dataset(now(), "test".into()).unwrap();

        assert_eq!(dataset.historical.height(), 4320);
        assert_eq!(dataset.predicted.height(), 2160);
        assert_eq!(dataset.rows(), 6480);
        assert_eq!(
            dataset.attributes(),
            vec!["StressIndex", "HeartRate", "SystolicBP", "DiastolicBP"]
        );

        for profile in &PROFILES {
            let values = frame::attribute_values(&dataset.combined, profile.name).unwrap();
            assert!(values.iter().all(|v| *v >= profile.clip.0 && *v <= profile.clip.1));
        }
    }

    #[test]
    fn test_history_ends_where_forecast_begins() {
        let dataset = synthetic_dataset(now(), "test".into()).unwrap();
        let historical = frame::timestamps(&dataset.historical).unwrap();
        let predicted = frame::timestamps(&dataset.predicted).unwrap();

        assert_eq!(*historical.last().unwrap() + Duration::hours(1), predicted[0]);
        assert_eq!(predicted[0], now());

        let combined = frame::timestamps(&dataset.combined).unwrap();
        assert!(combined.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn test_synthetic_data_is_deterministic() {
        let first = synthetic_dataset(now(), "a".into()).unwrap();
        let second = synthetic_dataset(now(), "b".into()).unwrap();
        assert_eq!(
            frame::attribute_values(&first.combined, "HeartRate").unwrap(),
            frame::attribute_values(&second.combined, "HeartRate").unwrap()
        );
    }
}
