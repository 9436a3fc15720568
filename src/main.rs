use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use serde_json::Value;

use cellrule_rs::grid::GridLoader;
use cellrule_rs::rules::expression::apply;
use cellrule_rs::rules::Row;

use std::fs;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate a single expression against a row
    Eval {
        /// Expression as JSON
        #[arg(short, long)]
        expr: String,

        /// Row data as a JSON object
        #[arg(short, long, default_value = "{}")]
        row: String,
    },
    /// Load and validate a grid definition
    Check {
        /// Path to the grid file (.yaml/.yml or .json)
        #[arg(short, long)]
        file: String,
    },
    /// Apply a grid's rules to rows and print what they decide
    Apply {
        /// Path to the grid file (.yaml/.yml or .json)
        #[arg(short, long)]
        file: String,

        /// Path to a JSON array of rows
        #[arg(short, long)]
        rows: String,

        /// Date for the grid's date-range filter
        #[arg(long)]
        filter_date: Option<String>,

        /// Sort rows by this column first
        #[arg(long)]
        sort_by: Option<String>,

        /// Sort descending
        #[arg(long, requires = "sort_by")]
        descending: bool,
    },
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Commands::Eval { expr, row } => {
            let expr: Value = serde_json::from_str(&expr).context("--expr is not valid JSON")?;
            let row: Value = serde_json::from_str(&row).context("--row is not valid JSON")?;

            let result = apply(&Row::from_json(row), &expr)?;
            println!("{}", serde_json::to_string(&result)?);
        }
        Commands::Check { file } => {
            let grid = GridLoader::new()
                .load(&file)
                .with_context(|| format!("Failed to load grid {}", file))?;

            let problems = grid.validate();
            if !problems.is_empty() {
                for problem in &problems {
                    eprintln!("{}", problem);
                }
                bail!("{} problem(s) in grid '{}'", problems.len(), grid.name);
            }

            log::info!("Grid '{}' is valid", grid.name);
            println!("{}: {} columns, ok", grid.name, grid.columns.len());
        }
        Commands::Apply {
            file,
            rows,
            filter_date,
            sort_by,
            descending,
        } => {
            let grid = GridLoader::new()
                .load(&file)
                .with_context(|| format!("Failed to load grid {}", file))?;

            let content = fs::read_to_string(&rows).with_context(|| format!("Failed to read {}", rows))?;
            let mut rows: Vec<Row> =
                serde_json::from_str(&content).context("Rows must be a JSON array of objects")?;

            if let Some(field) = sort_by {
                grid.sort_rows(&mut rows, &field, descending)?;
            }

            let filter = match (grid.date_filter(), filter_date) {
                (Some(mut filter), Some(date)) => {
                    filter.set_filter_date(Some(&date))?;
                    log::info!("Filtering '{}' on {}", filter.column(), date);
                    Some(filter)
                }
                (None, Some(_)) => {
                    log::warn!("Grid '{}' has no date-range filter, --filter-date ignored", grid.name);
                    None
                }
                (filter, None) => filter,
            };

            let reports: Vec<_> = rows
                .iter()
                .map(|row| grid.report(row, filter.as_ref()))
                .collect();
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
    }

    Ok(())
}
