//! Server-rendered dashboard page.
//!
//! The page is a plain HTML document: a sidebar form whose every change
//! resubmits the selection, the header, the body for the current view and
//! the footer. Charts are embedded as plotly JSON and drawn by plotly.js.

use std::fmt::Write;

use common::{Insight, MetricCard, ProvenanceFilter, Severity, SummaryRow};
use compute::{Dashboard, DashboardView, DataSource, ReadyView};
use compute::dashboard::Controls;
use plotly::Plot;

use super::charts::{distribution_chart, time_chart};

pub const PAGE_TITLE: &str = "Patient Health Trend Analysis Dashboard";
pub const FOOTER_TEXT: &str =
    "This interactive dashboard analyzes patient health trends using historical and predicted data.";
const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.35.0.min.js";

const STYLE: &str = r#"
body{font-family:system-ui,-apple-system,sans-serif;margin:0;background:#fafafa;color:#262730}
.layout{display:flex;min-height:100vh}
aside{width:280px;flex-shrink:0;background:#f0f2f6;padding:1.5rem;box-sizing:border-box}
aside h2{font-size:1.2rem;margin-top:0}
aside label{display:block;font-weight:600;margin:1rem 0 .3rem}
aside select,aside input[type=date]{width:100%;padding:.3rem;box-sizing:border-box}
aside .radio{font-weight:normal;margin:.2rem 0}
aside button{margin-top:1.2rem;padding:.4rem 1rem}
main{flex:1;padding:1.5rem 2rem;max-width:1400px}
.main-header{font-size:2.5rem;font-weight:bold;color:#1f77b4;text-align:center;margin-bottom:2rem}
.metrics{display:grid;grid-template-columns:repeat(4,1fr);gap:1rem}
.metric-card{background-color:#f0f2f6;padding:1rem;border-radius:10px;border-left:5px solid #1f77b4}
.metric-card .label{font-size:.9rem}
.metric-card .value{font-size:1.8rem;font-weight:600}
.metric-card .delta{font-size:.85rem;color:#09ab3b}
.insight-box,.warning-box,.success-box,.error-box,.empty-box{padding:1.5rem;border-radius:10px;margin-top:1rem}
.insight-box{background-color:#e8f4fd;border:1px solid #1f77b4}
.warning-box{background-color:#fff3cd;border:1px solid #ffc107}
.success-box{background-color:#d4edda;border:1px solid #28a745}
.error-box{background-color:#f8d7da;border:1px solid #dc3545}
.empty-box{background-color:#fff3cd;border:1px solid #ffc107}
.plot{background:#fff;border-radius:8px;padding:10px;margin:20px 0;box-shadow:0 1px 3px rgba(0,0,0,.1)}
details{margin-top:1.5rem}
table{border-collapse:collapse;margin-top:.5rem}
th,td{padding:4px 12px;text-align:right;border-bottom:1px solid #ddd}
th:first-child,td:first-child{text-align:left}
footer{margin-top:2rem;border-top:1px solid #ddd;padding-top:1rem}
"#;

/// Renders the complete page for one interaction.
pub fn render_page(dashboard: &Dashboard) -> String {
    let banner = match &dashboard.source {
        DataSource::Files => String::new(),
        DataSource::Synthetic { reason } => format!(
            r#"<div class="error-box">Error loading data: {}</div>"#,
            escape_html(reason)
        ),
    };

    let body = match &dashboard.view {
        DashboardView::Empty { message } => {
            format!(r#"<div class="empty-box">{}</div>"#, escape_html(message))
        }
        DashboardView::Ready(view) => render_ready(view, dashboard.controls.filter.provenance),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en"><head><meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<script src="{plotly}"></script>
<style>{style}</style>
</head><body>
<div class="layout">
{controls}
<main>
<h1 class="main-header">{title}</h1>
{banner}
{body}
<footer><strong>Dashboard Info:</strong> {footer}</footer>
</main>
</div>
</body></html>
"#,
        title = PAGE_TITLE,
        plotly = PLOTLY_JS,
        style = STYLE,
        controls = render_controls(&dashboard.controls),
        banner = banner,
        body = body,
        footer = FOOTER_TEXT,
    )
}

fn render_controls(controls: &Controls) -> String {
    let filter = &controls.filter;
    let submit = r#"onchange="this.form.submit()""#;

    let mut attributes = String::new();
    for attribute in &controls.attributes {
        let selected = if filter.attribute.as_deref() == Some(attribute.as_str()) {
            " selected"
        } else {
            ""
        };
        let name = escape_html(attribute);
        let _ = write!(attributes, r#"<option value="{name}"{selected}>{name}</option>"#);
    }

    let mut radios = String::new();
    for option in ProvenanceFilter::OPTIONS {
        let checked = if option == filter.provenance { " checked" } else { "" };
        let _ = write!(
            radios,
            r#"<label class="radio"><input type="radio" name="provenance" value="{option}"{checked} {submit}> {option}</label>"#
        );
    }

    let (min, max) = controls
        .bounds
        .map(|b| (b.start.to_string(), b.end.to_string()))
        .unwrap_or_default();
    let (start, end) = filter
        .date_range
        .map(|r| (r.start.to_string(), r.end.to_string()))
        .unwrap_or_default();

    format!(
        r#"<aside>
<h2>Dashboard Controls</h2>
<form method="get" action="/">
<label for="attribute">Select Attribute</label>
<select id="attribute" name="attribute" {submit}>{attributes}</select>
<label>Data Type</label>
{radios}
<label for="start_date">Select Date Range</label>
<input type="date" id="start_date" name="start_date" value="{start}" min="{min}" max="{max}" {submit}>
<input type="date" id="end_date" name="end_date" value="{end}" min="{min}" max="{max}" {submit}>
<button type="submit">Apply</button>
</form>
</aside>"#
    )
}

fn render_ready(view: &ReadyView, filter: ProvenanceFilter) -> String {
    let attribute = escape_html(&view.attribute);
    let cards: String = view.cards.iter().map(render_card).collect();
    let insights: String = view.insights.iter().map(render_insight).collect();

    format!(
        r#"<section class="metrics">{cards}</section>
<h2>{attribute} Time Series Analysis</h2>
{time}
<h2>{attribute} Distribution Analysis</h2>
{distribution}
<h2>Automated Insights &amp; Recommendations</h2>
{insights}
<details><summary>Data Summary</summary>
{summary}
</details>"#,
        time = embed_chart("time-chart", &time_chart(&view.series, &view.attribute, filter)),
        distribution = embed_chart(
            "distribution-chart",
            &distribution_chart(&view.series, &view.attribute)
        ),
        summary = render_summary(&view.summary),
    )
}

fn render_card(card: &MetricCard) -> String {
    format!(
        r#"<div class="metric-card"><div class="label">{}</div><div class="value">{}</div><div class="delta">{}</div></div>"#,
        escape_html(&card.label),
        escape_html(&card.value),
        escape_html(&card.delta)
    )
}

/// Callout box class for a severity.
pub fn callout_class(severity: Severity) -> &'static str {
    match severity {
        Severity::Warning => "warning-box",
        Severity::Positive => "success-box",
        Severity::Neutral => "insight-box",
    }
}

fn render_insight(insight: &Insight) -> String {
    let icon = match insight.severity {
        Severity::Warning => "&#9888;&#65039; ",
        Severity::Positive => "&#9989; ",
        Severity::Neutral => "",
    };
    format!(
        r#"<div class="{}">{}{}</div>"#,
        callout_class(insight.severity),
        icon,
        escape_html(&insight.text)
    )
}

fn render_summary(rows: &[SummaryRow]) -> String {
    let mut table = String::from(
        "<table><thead><tr><th>data_type</th><th>count</th><th>mean</th><th>std</th><th>min</th><th>max</th><th>median</th></tr></thead><tbody>",
    );
    for row in rows {
        let std = row.std.map_or_else(|| "NaN".to_string(), |std| format!("{:.2}", std));
        let _ = write!(
            table,
            "<tr><td>{}</td><td>{}</td><td>{:.2}</td><td>{}</td><td>{:.2}</td><td>{:.2}</td><td>{:.2}</td></tr>",
            row.provenance, row.count, row.mean, std, row.min, row.max, row.median
        );
    }
    table.push_str("</tbody></table>");
    table
}

/// Places a figure on the page. The JSON lives in a data block so no
/// attribute text is ever interpreted as script.
fn embed_chart(id: &str, plot: &Plot) -> String {
    let json = plot.to_json().replace("</", "<\\/");
    format!(
        r#"<div class="plot"><div id="{id}"></div></div>
<script type="application/json" id="{id}-data">{json}</script>
<script>(function(){{var f=JSON.parse(document.getElementById("{id}-data").textContent);Plotly.newPlot("{id}",f.data,f.layout,{{responsive:true}});}})();</script>"#
    )
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
