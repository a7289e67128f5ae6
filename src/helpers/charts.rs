//! Plotly figures of the dashboard.
//!
//! Both builders take the per-provenance series of the filtered view and
//! never see an empty selection; the caller shows the warning instead.

use common::{Provenance, ProvenanceFilter};
use compute::ProvenanceSeries;
use plotly::{
    box_plot::BoxPoints,
    common::{DashType, Line, Marker, Mode, Title},
    layout::{themes::PLOTLY_WHITE, Axis, BarMode, GridPattern, HoverMode, Layout, LayoutGrid},
    BoxPlot, Histogram, Plot, Scatter,
};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const HISTOGRAM_BINS: usize = 30;

pub const TIME_CHART_HEIGHT: usize = 500;
pub const DISTRIBUTION_CHART_HEIGHT: usize = 400;

/// Trace color of a provenance, shared by both figures.
pub fn color(provenance: Provenance) -> &'static str {
    match provenance {
        Provenance::Historical => "#1f77b4",
        Provenance::Predicted => "#ff7f0e",
    }
}

/// Legend name of a provenance.
pub fn trace_name(provenance: Provenance) -> &'static str {
    match provenance {
        Provenance::Historical => "Historical Data",
        Provenance::Predicted => "Predicted Data",
    }
}

/// Line chart of the attribute over time, one trace per selected provenance.
pub fn time_chart(series: &[ProvenanceSeries], attribute: &str, filter: ProvenanceFilter) -> Plot {
    let mut plot = Plot::new();

    for series in series
        .iter()
        .filter(|series| filter.includes(series.provenance) && !series.values.is_empty())
    {
        let mut line = Line::new().color(color(series.provenance)).width(2.0);
        if series.provenance == Provenance::Predicted {
            line = line.dash(DashType::Dash);
        }

        let timestamps = series
            .timestamps
            .iter()
            .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
            .collect::<Vec<_>>();

        let trace = Scatter::new(timestamps, series.values.clone())
            .mode(Mode::Lines)
            .name(trace_name(series.provenance))
            .line(line)
            .hover_template(&format!(
                "<b>{}</b><br>Date: %{{x}}<br>{}: %{{y:.2f}}<extra></extra>",
                series.provenance, attribute
            ));
        plot.add_trace(trace);
    }

    let layout = Layout::new()
        .title(Title::with_text(&format!("{} Trend Analysis", attribute)))
        .x_axis(Axis::new().title(Title::with_text("Date/Time")))
        .y_axis(Axis::new().title(Title::with_text(attribute)))
        .hover_mode(HoverMode::XUnified)
        .template(&*PLOTLY_WHITE)
        .height(TIME_CHART_HEIGHT)
        .show_legend(true);
    plot.set_layout(layout);

    plot
}

/// Histogram and box plot side by side, one trace per present provenance in
/// each panel.
///
/// Panel titles are carried by the x axes of the two panels.
pub fn distribution_chart(series: &[ProvenanceSeries], attribute: &str) -> Plot {
    let mut plot = Plot::new();
    let present = series.iter().filter(|series| !series.values.is_empty());

    for series in present.clone() {
        let histogram = Histogram::new(series.values.clone())
            .name(series.provenance.as_str())
            .legend_group(series.provenance.as_str())
            .marker(Marker::new().color(color(series.provenance)))
            .n_bins_x(HISTOGRAM_BINS)
            .opacity(0.7)
            .x_axis("x")
            .y_axis("y");
        plot.add_trace(histogram);
    }

    for series in present {
        let box_plot = BoxPlot::<f64, f64>::new(series.values.clone())
            .name(series.provenance.as_str())
            .legend_group(series.provenance.as_str())
            .show_legend(false)
            .marker(Marker::new().color(color(series.provenance)))
            .box_points(BoxPoints::Outliers)
            .x_axis("x2")
            .y_axis("y2");
        plot.add_trace(box_plot);
    }

    let layout = Layout::new()
        .title(Title::with_text(&format!("{} Distribution Analysis", attribute)))
        .grid(
            LayoutGrid::new()
                .rows(1)
                .columns(2)
                .pattern(GridPattern::Independent),
        )
        .bar_mode(BarMode::Overlay)
        .x_axis(Axis::new().title(Title::with_text("Distribution Histogram")))
        .y_axis(Axis::new().title(Title::with_text("Count")))
        .x_axis2(Axis::new().title(Title::with_text("Box Plot Comparison")))
        .y_axis2(Axis::new().title(Title::with_text(attribute)))
        .template(&*PLOTLY_WHITE)
        .height(DISTRIBUTION_CHART_HEIGHT)
        .show_legend(true);
    plot.set_layout(layout);

    plot
}
