//! CLI entry point for the bike-rental analytics pipeline.
//!
//! Provides subcommands for building the dashboard report, exporting RFM
//! scores, writing the merged daily/hourly table, and summarising the data.

use anyhow::Result;
use bikeshare_analytics::analyzers::merge::merge_hourly_totals;
use bikeshare_analytics::analyzers::rfm::compute_rfm;
use bikeshare_analytics::analyzers::utility::{mean, stddev};
use bikeshare_analytics::categories::{Season, Weather};
use bikeshare_analytics::config::AppConfig;
use bikeshare_analytics::error::AnalyticsError;
use bikeshare_analytics::filter::{DateRange, RentalFilter};
use bikeshare_analytics::output::{print_json, print_pretty, write_json, write_merged, write_rfm};
use bikeshare_analytics::parser::{Dataset, load_dataset};
use bikeshare_analytics::report::{ReportOptions, build_report};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare_analytics")]
#[command(about = "Filter, aggregate and RFM-score bike rental data", long_about = None)]
struct Cli {
    /// JSON config file with data paths
    #[arg(long, global = true)]
    config: Option<String>,

    /// Daily table (overrides config)
    #[arg(long, global = true)]
    day: Option<PathBuf>,

    /// Hourly table (overrides config)
    #[arg(long, global = true)]
    hour: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct FilterArgs {
    /// First date to include (defaults to the earliest date in the data)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last date to include (defaults to the latest date in the data)
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Seasons to include, by name or code (defaults to all)
    #[arg(long, value_delimiter = ',')]
    season: Vec<Season>,

    /// Weather conditions to include, by name or code (defaults to all)
    #[arg(long, value_delimiter = ',')]
    weather: Vec<Weather>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the chart-ready dashboard report
    Report {
        #[command(flatten)]
        filter: FilterArgs,

        /// Use a linear count axis for the holiday chart
        #[arg(long, default_value_t = false)]
        linear: bool,

        /// Number of RFM rows to include in the table panel
        #[arg(long, default_value_t = 5)]
        head: usize,

        /// Write the report as JSON to this file instead of logging it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Score the filtered days by recency, frequency and monetary value
    Rfm {
        #[command(flatten)]
        filter: FilterArgs,

        /// CSV file to write the scored rows to
        #[arg(short, long, default_value = "rfm_scores.csv")]
        output: PathBuf,
    },
    /// Join daily rows with their hourly totals and write the result
    Merge {
        /// Output CSV (defaults to MAIN_DATA_PATH)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Gzip compress the output
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
    /// Show date bounds and category counts of the loaded tables
    Summary,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/bikeshare_analytics.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_analytics.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::from_env(),
    };
    if let Some(day) = cli.day {
        config.day_path = day;
    }
    if let Some(hour) = cli.hour {
        config.hour_path = hour;
    }

    let dataset = load_dataset(&config.day_path, &config.hour_path)?;

    match cli.command {
        Commands::Report {
            filter,
            linear,
            head,
            output,
        } => {
            let filter = resolve_filter(&dataset, filter);
            let options = ReportOptions {
                log_scale: !linear,
                head_rows: head,
            };
            let report = build_report(&dataset, &filter, options);

            for notice in &report.notices {
                warn!(message = %notice.message(), "Dashboard notice");
            }
            print_pretty(&report);

            match output {
                Some(path) => write_json(&path, &report)?,
                None => print_json(&report)?,
            }
        }
        Commands::Rfm { filter, output } => {
            let filter = resolve_filter(&dataset, filter);
            if let Some(notice) = filter.validate() {
                warn!(message = %notice.message(), "Invalid date range");
            }

            let filtered = filter.apply(&dataset.daily);
            match compute_rfm(&filtered) {
                Ok(report) => {
                    for notice in &report.notices {
                        warn!(message = %notice.message(), "RFM notice");
                    }
                    write_rfm(&output, &report.rows)?;
                    print_json(&report.head(5))?;
                }
                Err(AnalyticsError::NoData) => {
                    warn!("No rows match the selected filter; nothing to score");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Commands::Merge { output, gzip } => {
            let path = output.unwrap_or_else(|| config.main_data_path.clone());
            let merged = merge_hourly_totals(&dataset.daily, &dataset.hourly);
            let missing = merged.iter().filter(|m| m.hourly_cnt.is_none()).count();
            if missing > 0 {
                warn!(days = missing, "Days without hourly rows");
            }
            write_merged(&path, &merged, gzip)?;
        }
        Commands::Summary => summarise(&dataset),
    }

    Ok(())
}

/// Turns CLI filter arguments into a [`RentalFilter`] bounded by the data.
fn resolve_filter(dataset: &Dataset, args: FilterArgs) -> RentalFilter {
    let filter = RentalFilter::resolve(dataset, args.start, args.end, args.season, args.weather);
    info!(
        start = %filter.range.start,
        end = %filter.range.end,
        seasons = ?filter.seasons,
        weather = ?filter.weather,
        "Filter resolved"
    );
    filter
}

fn summarise(dataset: &Dataset) {
    if let Some(bounds) = DateRange::spanning(&dataset.daily) {
        info!(start = %bounds.start, end = %bounds.end, days = dataset.daily.len(), "Daily table");
    }
    if let Some(bounds) = DateRange::spanning(&dataset.hourly) {
        info!(start = %bounds.start, end = %bounds.end, hours = dataset.hourly.len(), "Hourly table");
    }

    let counts: Vec<f64> = dataset.daily.iter().map(|r| f64::from(r.count)).collect();
    let avg = mean(&counts);
    info!(mean = avg, stddev = stddev(&counts, avg), "Daily rentals");

    let mut seasons: BTreeMap<Season, usize> = BTreeMap::new();
    for record in &dataset.daily {
        *seasons.entry(record.season).or_default() += 1;
    }
    for (season, days) in seasons {
        info!(season = %season, days, "Season");
    }

    let mut weather: BTreeMap<Weather, usize> = BTreeMap::new();
    for record in &dataset.hourly {
        *weather.entry(record.weather).or_default() += 1;
    }
    for (weather, hours) in weather {
        info!(weather = %weather, hours, "Weather");
    }
}
