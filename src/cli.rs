use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use common::{FilterQuery, ProvenanceFilter};
use std::path::PathBuf;

pub mod commands;

use commands::{render, serve, summary};

#[derive(Parser)]
#[command(name = "healthdash")]
#[command(about = "Patient health trend dashboard: web server and command-line reports")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Locations of the two input files. Unset values come from configuration.
#[derive(Args, Debug, Clone, Default)]
pub struct DataArgs {
    /// CSV file with the recorded hourly measurements
    #[arg(long, env = "HEALTHDASH_HISTORICAL_PATH")]
    pub historical_path: Option<PathBuf>,

    /// CSV file with the forecast measurements
    #[arg(long, env = "HEALTHDASH_PREDICTED_PATH")]
    pub predicted_path: Option<PathBuf>,
}

/// Same selection the dashboard controls offer.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Numeric attribute to analyze; defaults to the first one in the data
    #[arg(short, long)]
    pub attribute: Option<String>,

    /// Data type filter: Both, Historical or Predicted
    #[arg(short, long)]
    pub provenance: Option<ProvenanceFilter>,

    /// First day of the range, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Last day of the range, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub end_date: Option<NaiveDate>,
}

impl From<FilterArgs> for FilterQuery {
    fn from(args: FilterArgs) -> Self {
        FilterQuery {
            attribute: args.attribute,
            provenance: args.provenance,
            start_date: args.start_date,
            end_date: args.end_date,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Bind address for the web server
        ///
        /// Format: IP:PORT (e.g., 0.0.0.0:8501, 127.0.0.1:8080)
        #[arg(short, long, env = "HEALTHDASH_BIND_ADDRESS")]
        bind_address: Option<String>,

        #[command(flatten)]
        data: DataArgs,
    },
    /// Render the dashboard page once and write it to a file
    ///
    /// Useful for sharing a snapshot without running the server.
    Render {
        /// Output HTML file
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,

        #[command(flatten)]
        data: DataArgs,
    },
    /// Print insights and grouped summary statistics
    Summary {
        #[command(flatten)]
        filter: FilterArgs,

        #[command(flatten)]
        data: DataArgs,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Serve { bind_address, data } => {
                serve(bind_address, data).await?;
            }
            Commands::Render { output, filter, data } => {
                render(&output, filter.into(), data).await?;
            }
            Commands::Summary { filter, data } => {
                summary(filter.into(), data).await?;
            }
        }
        Ok(())
    }
}
