use anyhow::Result;
use common::{FilterQuery, SummaryRow};
use compute::{build_dashboard, DataSource, DashboardView};
use tracing::instrument;

use crate::cli::DataArgs;
use crate::config::{initialize_app_state, AppConfig};

#[instrument(skip(data))]
pub async fn summary(query: FilterQuery, data: DataArgs) -> Result<()> {
    let config = AppConfig::load()?.with_overrides(None, data.historical_path, data.predicted_path);
    let state = initialize_app_state(&config);

    let dataset = state.dataset().await?;
    let dashboard = build_dashboard(&dataset, &query)?;

    if let DataSource::Synthetic { reason } = &dashboard.source {
        eprintln!("Error loading data: {}. Showing sample data instead.", reason);
    }

    let filter = &dashboard.controls.filter;
    if let Some(range) = filter.date_range {
        println!("Selection: {} ({}), {}", filter.attribute.as_deref().unwrap_or("-"), filter.provenance, range);
    }

    match &dashboard.view {
        DashboardView::Empty { message } => println!("{}", message),
        DashboardView::Ready(view) => {
            println!();
            for card in &view.cards {
                println!("{:<28} {:>12}   {}", card.label, card.value, card.delta);
            }

            println!("\nInsights");
            for insight in &view.insights {
                println!("  [{:?}] {}", insight.severity, insight.text);
            }

            println!("\nData Summary");
            println!(
                "  {:<12} {:>8} {:>10} {:>10} {:>10} {:>10} {:>10}",
                "data_type", "count", "mean", "std", "min", "max", "median"
            );
            for row in &view.summary {
                println!("  {}", summary_line(row));
            }
        }
    }

    Ok(())
}

fn summary_line(row: &SummaryRow) -> String {
    let std = row.std.map_or_else(|| "NaN".to_string(), |std| format!("{:.2}", std));
    format!(
        "{:<12} {:>8} {:>10.2} {:>10} {:>10.2} {:>10.2} {:>10.2}",
        row.provenance.as_str(),
        row.count,
        row.mean,
        std,
        row.min,
        row.max,
        row.median
    )
}
