//! Presentation model of the dashboard.
//!
//! `build_dashboard` is the pure step between a user interaction and the
//! rendered page: it takes the cached dataset and the raw filter query and
//! returns everything the renderer and the chart builders need.

use chrono::NaiveDateTime;
use common::{DateRange, FilterQuery, Insight, MetricCard, Provenance, SummaryRow};
use polars::prelude::DataFrame;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::filter::FilterState;
use crate::frame;
use crate::insights::generate_insights;
use crate::loader::{DataSource, Dataset};
use crate::stats;

/// The single message shown when there is nothing to analyze.
pub const NO_DATA_MESSAGE: &str =
    "No data available for the selected filters. Please adjust your selection.";

/// State of the sidebar controls.
#[derive(Debug, Clone, PartialEq)]
pub struct Controls {
    /// Choices of the attribute selector
    pub attributes: Vec<String>,
    /// Limits of the date pickers
    pub bounds: Option<DateRange>,
    pub filter: FilterState,
}

/// Attribute values of one provenance, in time order.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvenanceSeries {
    pub provenance: Provenance,
    pub timestamps: Vec<NaiveDateTime>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadyView {
    pub attribute: String,
    pub cards: Vec<MetricCard>,
    pub insights: Vec<Insight>,
    pub summary: Vec<SummaryRow>,
    /// Non-empty provenance subsets, historical first
    pub series: Vec<ProvenanceSeries>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardView {
    /// Nothing to show besides the warning message
    Empty { message: String },
    Ready(ReadyView),
}

/// Everything rendered for one interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub controls: Controls,
    pub source: DataSource,
    pub view: DashboardView,
}

/// Resolves the query against the dataset and derives the page content.
#[instrument(skip(dataset), fields(rows = dataset.rows()))]
pub fn build_dashboard(dataset: &Dataset, query: &FilterQuery) -> Result<Dashboard> {
    let filter = FilterState::resolve(query, dataset)?;
    let controls = Controls {
        attributes: dataset.attributes(),
        bounds: dataset.date_bounds()?,
        filter: filter.clone(),
    };

    let filtered = filter.apply(&dataset.combined)?;
    let view = match &filter.attribute {
        Some(attribute) if filtered.height() > 0 => {
            DashboardView::Ready(ready_view(&filtered, attribute, &filter)?)
        }
        _ => {
            debug!(rows = filtered.height(), attribute = ?filter.attribute, "Nothing to display");
            DashboardView::Empty {
                message: NO_DATA_MESSAGE.to_string(),
            }
        }
    };

    Ok(Dashboard {
        controls,
        source: dataset.source.clone(),
        view,
    })
}

fn ready_view(filtered: &DataFrame, attribute: &str, filter: &FilterState) -> Result<ReadyView> {
    let values = frame::attribute_column(filtered, attribute)?;
    let timestamps = frame::timestamps(filtered)?;
    let tags = frame::provenance(filtered)?;

    let series = Provenance::ALL
        .iter()
        .map(|provenance| provenance_series(*provenance, &timestamps, &values, &tags))
        .filter(|series| !series.values.is_empty())
        .collect::<Vec<_>>();

    let all: Vec<f64> = values.iter().flatten().copied().collect();
    let historical_rows = tags
        .iter()
        .filter(|tag| **tag == Provenance::Historical)
        .count();
    let data_types = Provenance::ALL
        .iter()
        .filter(|provenance| tags.contains(*provenance))
        .count();
    let span_days = match (timestamps.iter().min(), timestamps.iter().max()) {
        (Some(first), Some(last)) => (*last - *first).num_days(),
        _ => 0,
    };

    Ok(ReadyView {
        attribute: attribute.to_string(),
        cards: metric_cards(attribute, &all, filtered.height(), historical_rows, span_days, data_types),
        insights: generate_insights(filtered, attribute, filter.provenance)?,
        summary: series.iter().filter_map(summary_row).collect(),
        series,
    })
}

fn provenance_series(
    provenance: Provenance,
    timestamps: &[NaiveDateTime],
    values: &[Option<f64>],
    tags: &[Provenance],
) -> ProvenanceSeries {
    let (timestamps, values) = timestamps
        .iter()
        .zip(values)
        .zip(tags)
        .filter(|(_, tag)| **tag == provenance)
        .filter_map(|((ts, value), _)| value.map(|value| (*ts, value)))
        .unzip();

    ProvenanceSeries {
        provenance,
        timestamps,
        values,
    }
}

/// The four headline cards.
pub fn metric_cards(
    attribute: &str,
    values: &[f64],
    total_rows: usize,
    historical_rows: usize,
    span_days: i64,
    data_types: usize,
) -> Vec<MetricCard> {
    let decimal = |value: Option<f64>| value.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}", v));

    vec![
        MetricCard {
            label: format!("Average {}", attribute),
            value: decimal(stats::mean(values)),
            delta: format!("{} (std)", decimal(stats::sample_std(values))),
        },
        MetricCard {
            label: format!("Max {}", attribute),
            value: decimal(stats::max(values)),
            delta: format!("{} (min)", decimal(stats::min(values))),
        },
        MetricCard {
            label: "Total Records".to_string(),
            value: thousands(total_rows),
            delta: format!("{} historical", thousands(historical_rows)),
        },
        MetricCard {
            label: "Date Span".to_string(),
            value: format!("{} days", span_days),
            delta: format!("{} data types", data_types),
        },
    ]
}

/// Grouped statistics row, rounded to two decimals.
pub fn summary_row(series: &ProvenanceSeries) -> Option<SummaryRow> {
    let values = &series.values;
    Some(SummaryRow {
        provenance: series.provenance,
        count: values.len(),
        mean: stats::round2(stats::mean(values)?),
        std: stats::sample_std(values).map(stats::round2),
        min: stats::round2(stats::min(values)?),
        max: stats::round2(stats::max(values)?),
        median: stats::round2(stats::median(values)?),
    })
}

/// Formats a count with comma thousands separators.
pub fn thousands(value: usize) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    out
}
