use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

mod aggregate;
mod canonical;
mod config;
mod dashboard;
mod error;
mod figures;
mod loader;
mod logging;
mod models;
mod pipeline;
mod report;
mod resolve;
mod schema;
mod server;

use config::Config;
use pipeline::DashboardContext;

#[derive(Parser)]
#[command(name = "student-mental-health-dashboard")]
#[command(about = "Narrative dashboard over the student mental health survey", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prepare the dataset and serve the dashboard over HTTP
    Serve {
        #[arg(long)]
        data: Option<PathBuf>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print cleaning diagnostics for the dataset
    Inspect {
        #[arg(long)]
        data: Option<PathBuf>,
    },
    /// Generate a markdown report of every aggregate
    Report {
        #[arg(long)]
        data: Option<PathBuf>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { data, port } => {
            let config = Config::from_env()?.with_overrides(data, port);
            let context = DashboardContext::init(&config.data_path).with_context(|| {
                format!("failed to prepare {}", config.data_path.display())
            })?;
            server::serve(Arc::new(context), config.bind_addr()).await?;
        }
        Commands::Inspect { data } => {
            let data_path = config::data_path_from_env(data);
            let prepared = pipeline::load(&data_path)
                .with_context(|| format!("failed to prepare {}", data_path.display()))?;
            let diagnostics = &prepared.diagnostics;

            println!(
                "Raw dimensions: {} rows x {} columns",
                diagnostics.raw_rows,
                diagnostics.columns.len()
            );
            println!("Columns:");
            for column in &diagnostics.columns {
                println!(
                    "- {} ({}, {} missing)",
                    column.name,
                    column.kind.as_str(),
                    column.missing
                );
            }
            println!("Duplicates found: {}", diagnostics.duplicates_removed);
            println!("Respondents after cleaning: {}", diagnostics.rows);
            println!("Final fields: {}", diagnostics.display_fields.join(", "));
        }
        Commands::Report { data, out } => {
            let data_path = config::data_path_from_env(data);
            let context = DashboardContext::init(&data_path)
                .with_context(|| format!("failed to prepare {}", data_path.display()))?;
            let report = report::build_report(
                &data_path.display().to_string(),
                &context.diagnostics,
                &context.aggregates,
            );
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
