//! `viewnav`: inspect view designs and page through exported entries

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::util::pretty::pretty_format_batches;
use clap::{Parser, Subcommand, ValueEnum};
use nv_core::{NavigationOutcome, PagerSnapshot, Paginator};
use nv_data::{window_to_record_batch, MemorySource, SchemaBuilder, ViewSchema};
use tracing::{info, warn};

mod config;
mod step;

use config::AppConfig;
use step::Step;

#[derive(Parser, Debug)]
#[command(name = "viewnav", version, about = "Hierarchical view navigation")]
struct Cli {
    /// Output format
    #[arg(short = 'o', long = "output", value_enum, global = true, default_value_t = Output::Human)]
    output: Output,

    /// JSON file with `schema` and `pager` settings
    #[arg(long, global = true, env = "VIEWNAV_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum Output {
    Human,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the columns of a design document
    Schema {
        /// Design document exported from the view
        design: PathBuf,
    },
    /// Page through an exported entry document
    Page {
        /// Design document exported from the view
        design: PathBuf,
        /// Entry document holding every entry of the view
        entries: PathBuf,
        /// Entries per page, overriding the config file
        #[arg(long = "page-size")]
        page_size: Option<usize>,
        /// Steps to run in order: first, next, prev, last, refresh, jump:KEY, sort:COL[:desc], unsort
        #[arg(default_value = "first")]
        steps: Vec<Step>,
    },
}

fn init_tracing() {
    let env = std::env::var("VIEWNAV_LOG").unwrap_or_else(|_| "info".to_string());
    let filter = tracing_subscriber::EnvFilter::from_str(&env)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn load_schema(path: &Path, config: &AppConfig) -> Result<ViewSchema> {
    let document = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading design {}", path.display()))?;
    let schema = SchemaBuilder::new(config.schema.clone())
        .build(&document)
        .with_context(|| format!("parsing design {}", path.display()))?;
    Ok(schema)
}

fn print_schema(schema: &ViewSchema, output: Output) -> Result<()> {
    match output {
        Output::Json => println!("{}", serde_json::to_string_pretty(schema)?),
        Output::Human => {
            println!(
                "{} ({} columns{})",
                schema.view_name().unwrap_or("<unnamed>"),
                schema.columns().len(),
                if schema.is_categorized() { ", categorized" } else { "" }
            );
            for column in schema.columns() {
                let sort = if column.sortable { " sortable" } else { "" };
                let category = if column.is_category_column { " category" } else { "" };
                println!(
                    "  {:>2}  {:<24} {:<24} {:>6.1}px{sort}{category}",
                    column.order, column.name, column.title, column.width
                );
            }
        }
    }
    Ok(())
}

fn print_page(schema: &ViewSchema, snapshot: &PagerSnapshot, output: Output) -> Result<()> {
    match output {
        Output::Json => println!("{}", serde_json::to_string_pretty(snapshot)?),
        Output::Human => {
            println!(
                "[{}] {} {}",
                snapshot.active_page, snapshot.display.current_range_label, snapshot.display.total_label
            );
            if let Some(window) = &snapshot.window {
                let batch = window_to_record_batch(schema, window)?;
                println!("{}", pretty_format_batches(&[batch])?);
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    match cli.command {
        Commands::Schema { design } => {
            let schema = load_schema(&design, &config).await?;
            print_schema(&schema, cli.output)?;
        }
        Commands::Page { design, entries, page_size, steps } => {
            let schema = Arc::new(load_schema(&design, &config).await?);
            let source = MemorySource::from_path(&entries, schema.clone())
                .await
                .with_context(|| format!("loading entries {}", entries.display()))?;
            info!(entries = source.entries().len(), source = %entries.display(), "entries loaded");

            let mut options = config.pager.clone();
            if let Some(page_size) = page_size {
                options.page_size = page_size;
            }
            let pager = Paginator::new(Arc::new(source), options);

            for step in &steps {
                match step.run(&pager).await? {
                    NavigationOutcome::Applied(snapshot) => print_page(&schema, &snapshot, cli.output)?,
                    NavigationOutcome::Superseded { request } => {
                        warn!(request, ?step, "step superseded by a later request")
                    }
                }
            }
        }
    }

    Ok(())
}
