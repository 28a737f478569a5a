//! @ai:module:intent CLI for the epidemic metrics pipeline
//! @ai:module:layer presentation

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use epitrack::{
    config::Config,
    metrics::{Analysis, MetricsEngine, MetricsEngineTrait},
    report::ReportGenerator,
    series::Aggregator,
    source::{CsvSourceLoader, Metric, SourceLoaderTrait},
    summary::{SummaryRow, SummaryTable},
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "epitrack")]
#[command(about = "Per-country epidemic metrics from time-series snapshots")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute every metric and write charts and reports
    Run {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory searched for the time-series CSV files
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// Output directory for charts and reports
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Smoothing factor for the averaged daily increase, in (0, 1)
        #[arg(long)]
        beta: Option<f64>,

        /// Days kept before day zero
        #[arg(long)]
        lookback: Option<usize>,

        /// Number of countries charted when no explicit list is given
        #[arg(long)]
        top_n: Option<usize>,

        /// Countries to chart (comma-separated)
        #[arg(long)]
        countries: Option<String>,

        /// Number of summary rows printed
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Print the latest-date summary table
    Summary {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory searched for the time-series CSV files
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// Number of rows printed
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Only show these countries (comma-separated)
        #[arg(long)]
        countries: Option<String>,
    },

    /// Initialize default configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = "epitrack.toml")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("epitrack=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            data_dir,
            output,
            beta,
            lookback,
            top_n,
            countries,
            limit,
        } => run(RunArgs {
            config,
            data_dir,
            output,
            beta,
            lookback,
            top_n,
            countries,
            limit,
        }),
        Commands::Summary {
            config,
            data_dir,
            limit,
            countries,
        } => show_summary(config, data_dir, limit, countries),
        Commands::Init { output } => init_config(output),
    }
}

struct RunArgs {
    config: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    output: Option<PathBuf>,
    beta: Option<f64>,
    lookback: Option<usize>,
    top_n: Option<usize>,
    countries: Option<String>,
    limit: usize,
}

/// @ai:intent Full pipeline: load, aggregate, compute, report
/// @ai:effects fs:read, fs:write
fn run(args: RunArgs) -> Result<()> {
    let mut config = load_or_default_config(args.config)?;

    if let Some(dir) = args.data_dir {
        config.paths.data_dir = dir;
    }
    if let Some(dir) = args.output {
        config.paths.output_dir = dir;
    }
    if let Some(beta) = args.beta {
        config.analysis.smoothing_beta = beta;
    }
    if let Some(lookback) = args.lookback {
        config.analysis.day_zero.lookback_days = lookback;
    }
    if let Some(top_n) = args.top_n {
        config.charts.selection.top_n = top_n;
    }
    if let Some(list) = args.countries {
        config.charts.selection.countries = Some(parse_list(&list));
    }

    let analysis = compute_analysis(&config)?;
    let summary = analysis.summary()?;

    let countries = analysis.select_countries(&config.charts.selection);
    if countries.is_empty() {
        tracing::warn!("No countries selected; charts will be empty");
    } else {
        tracing::info!("Charting {} countries: {}", countries.len(), countries.join(", "));
    }

    let generator = ReportGenerator::new(&config.charts);
    let files = generator.generate_all(&analysis, &summary, &countries, &config.paths.output_dir)?;

    print_summary(&summary, summary.head(args.limit));
    println!("Wrote {} files to {}", files.len(), config.paths.output_dir.display());
    Ok(())
}

/// @ai:intent Print the summary without writing any file
/// @ai:effects fs:read
fn show_summary(
    config_path: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    limit: usize,
    countries: Option<String>,
) -> Result<()> {
    let mut config = load_or_default_config(config_path)?;
    if let Some(dir) = data_dir {
        config.paths.data_dir = dir;
    }
    config.charts.selection.countries = countries.map(|list| parse_list(&list));

    let analysis = compute_analysis(&config)?;
    let summary = analysis.summary()?;

    let rows: Vec<SummaryRow> = summary
        .rows
        .iter()
        .filter(|row| config.charts.selection.matches(&row.country))
        .take(limit)
        .cloned()
        .collect();

    print_summary(&summary, &rows);
    Ok(())
}

/// @ai:intent Locate and read the sources, aggregate, and derive every metric
/// @ai:effects fs:read
fn compute_analysis(config: &Config) -> Result<Analysis> {
    let loader = CsvSourceLoader::new();

    let paths = match config.paths.explicit_sources() {
        Some(paths) => paths,
        None => {
            tracing::info!("Searching {} for time series", config.paths.data_dir.display());
            loader.discover(&config.paths.data_dir)?
        }
    };

    let raw = loader
        .load_all(&paths)
        .context("Failed to load time-series sources")?;
    let tables = Aggregator::from_config(&config.source).aggregate_all(&raw)?;

    for metric in Metric::ALL {
        tracing::info!(
            "{}: {} regions -> {} countries",
            metric,
            raw.get(metric).records.len(),
            tables.get(metric).len()
        );
    }

    let analysis = MetricsEngine::new(config.analysis.clone()).compute(tables)?;
    Ok(analysis)
}

/// @ai:intent Initialize default configuration file
/// @ai:effects fs:write
fn init_config(output: PathBuf) -> Result<()> {
    let config = Config::default();
    config.save(&output)?;
    println!("Configuration saved to {}", output.display());
    Ok(())
}

/// @ai:intent Load configuration or use defaults
/// @ai:effects fs:read
fn load_or_default_config(path: Option<PathBuf>) -> Result<Config> {
    match path {
        Some(p) => Config::load(&p),
        None => {
            let default_path = PathBuf::from("epitrack.toml");

            if default_path.exists() {
                Config::load(&default_path)
            } else {
                Ok(Config::default())
            }
        }
    }
}

/// @ai:intent Split a comma-separated CLI list
/// @ai:effects pure
fn parse_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// @ai:intent Print summary rows as an aligned terminal table
/// @ai:effects io:stdout
fn print_summary(summary: &SummaryTable, rows: &[SummaryRow]) {
    println!();
    match summary.as_of {
        Some(date) => println!("Summary as of {}", date),
        None => println!("Summary (no dates in snapshot)"),
    }
    println!("{}", "=".repeat(26));
    println!();

    print!("{:<32}", "Country");
    for column in &summary.columns {
        print!(" {:>26}", column);
    }
    println!();
    println!("{}", "-".repeat(32 + 27 * summary.columns.len()));

    for row in rows {
        print!("{:<32}", row.country);
        for value in &row.values {
            match value {
                Some(v) if v.fract() == 0.0 => print!(" {:>26.0}", v),
                Some(v) => print!(" {:>26.4}", v),
                None => print!(" {:>26}", "NaN"),
            }
        }
        println!();
    }
    println!();
}
