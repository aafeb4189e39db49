//! CLI entry point for the PMIS explorer.
//!
//! Loads a pavement survey table once, then answers a single query: unique
//! column values, a filtered report, cascading filter options, a CSV export,
//! or a JSON dump of the matching rows.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pmis_explorer::analyzers::types::Report;
use pmis_explorer::config::{Settings, load_criteria};
use pmis_explorer::fetch::{BasicClient, BearerToken, fetch_bytes, is_remote};
use pmis_explorer::output::{export_csv, print_json, print_pretty, records_json};
use pmis_explorer::{Column, Engine, FilterCriteria, Threshold};
use std::ffi::OsStr;
use std::path::Path;
use tracing::level_filters::LevelFilter;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "pmis_explorer")]
#[command(about = "Filter and aggregate PMIS pavement condition surveys", long_about = None)]
struct Cli {
    /// Path or URL of the PMIS CSV table (overrides PMIS_DATA_SOURCE)
    #[arg(short, long, global = true, value_name = "FILE_OR_URL")]
    source: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the distinct values of a column
    Values {
        /// Column header or short name (year, highway, begin_rm, end_rm, ...)
        column: Column,
    },
    /// Summary, insights, yearly scores and distress per mile for a selection
    Report {
        #[command(flatten)]
        filters: FilterArgs,

        /// Print the report as JSON on stdout
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Reference markers and length thresholds available for a selection
    Options {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Write the filtered rows to a CSV file
    Export {
        #[command(flatten)]
        filters: FilterArgs,

        /// CSV file to write
        #[arg(short, long, default_value = "filtered_data.csv")]
        output: String,

        /// Gzip compress the export
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
    /// Print the matching rows as a JSON array (the whole table by default)
    Dump {
        #[command(flatten)]
        filters: FilterArgs,
    },
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Survey year to keep (repeatable)
    #[arg(long = "year")]
    years: Vec<i32>,

    /// Highway roadbed id, e.g. "IH0040 L"; "all" selects every highway
    #[arg(long = "highway")]
    highways: Vec<String>,

    /// Begin reference marker (repeatable)
    #[arg(long = "begin-rm")]
    begin_rm: Vec<f64>,

    /// End reference marker (repeatable)
    #[arg(long = "end-rm")]
    end_rm: Vec<f64>,

    /// Minimum segment length in miles, or "all" (repeatable; smallest wins)
    #[arg(long = "min-length")]
    min_length: Vec<Threshold>,

    /// Maximum segment length in miles, or "all" (repeatable; largest wins)
    #[arg(long = "max-length")]
    max_length: Vec<Threshold>,

    /// JSON criteria preset; the flags above replace the dimensions they set
    #[arg(long, value_name = "FILE")]
    criteria: Option<String>,
}

impl FilterArgs {
    /// Merges the preset (if any) with the flags. `default_highway` applies
    /// only when neither names a highway.
    fn to_criteria(&self, default_highway: Option<&str>) -> Result<FilterCriteria> {
        let mut criteria = match &self.criteria {
            Some(path) => load_criteria(path)?,
            None => FilterCriteria::new(),
        };

        if !self.years.is_empty() {
            criteria = criteria.years(self.years.iter().copied());
        }
        if !self.highways.is_empty() {
            criteria = criteria.highways(self.highways.iter().cloned());
        } else if criteria.highways.is_none() {
            if let Some(highway) = default_highway {
                criteria = criteria.highway(highway);
            }
        }
        if !self.begin_rm.is_empty() {
            criteria = criteria.begin_markers(self.begin_rm.iter().copied());
        }
        if !self.end_rm.is_empty() {
            criteria = criteria.end_markers(self.end_rm.iter().copied());
        }
        if !self.min_length.is_empty() {
            criteria = criteria.min_length(self.min_length.iter().copied());
        }
        if !self.max_length.is_empty() {
            criteria = criteria.max_length(self.max_length.iter().copied());
        }

        Ok(criteria)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file
    let settings = Settings::from_env();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = Path::new(&settings.log_file_path);
    let log_dir = log_file_path.parent().unwrap_or(Path::new("logs"));
    let log_file_name = log_file_path
        .file_name()
        .unwrap_or(OsStr::new("pmis_explorer.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive(LevelFilter::INFO.into()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive(LevelFilter::DEBUG.into()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let source = cli
        .source
        .or_else(|| settings.data_source.clone())
        .context("no data source: pass --source or set PMIS_DATA_SOURCE")?;
    let engine = load_engine(&source, &settings).await?;
    let default_highway = Some(settings.default_highway.as_str());

    match cli.command {
        Commands::Values { column } => {
            let values = engine.unique_values(column);
            info!(column = %column, distinct = values.len(), "Unique values");
            for value in values {
                println!("{value}");
            }
        }
        Commands::Report { filters, json } => {
            let criteria = filters.to_criteria(default_highway)?;
            let report = engine.report(&criteria);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                log_report(&report);
            }
        }
        Commands::Options { filters } => {
            let criteria = filters.to_criteria(default_highway)?;
            let options = engine.filter_options(&criteria);
            print_pretty(&options);
            print_json(&options)?;
        }
        Commands::Export {
            filters,
            output,
            gzip,
        } => {
            let criteria = filters.to_criteria(default_highway)?;
            let view = engine.filter_data(&criteria);
            if view.is_empty() {
                warn!("No data available for selected filters");
            }
            export_csv(&output, engine.dataset().columns(), &view, gzip)?;
        }
        Commands::Dump { filters } => {
            let criteria = filters.to_criteria(None)?;
            let view = engine.filter_data(&criteria);
            println!("{}", records_json(&view)?);
        }
    }

    Ok(())
}

/// Loads the table from a local file or fetches it over HTTP.
#[tracing::instrument(skip(settings))]
async fn load_engine(source: &str, settings: &Settings) -> Result<Engine> {
    if !is_remote(source) {
        return Engine::load(source).with_context(|| format!("failed to load PMIS table '{source}'"));
    }

    let basic = BasicClient::with_timeout(settings.fetch_timeout)
        .context("failed to build HTTP client")?;
    let bytes = match &settings.api_token {
        Some(token) => {
            let client = BearerToken::new(basic, token)?;
            fetch_bytes(&client, source).await?
        }
        None => fetch_bytes(&basic, source).await?,
    };
    Engine::from_reader(bytes.as_slice())
        .with_context(|| format!("failed to load PMIS table from '{source}'"))
}

fn log_report(report: &Report) {
    info!(title = %report.title, "Selection");

    let Some(summary) = &report.summary else {
        warn!("No data available for selected filters");
        return;
    };

    info!(
        records = summary.total_records,
        miles = summary.total_length,
        condition_score = %format_args!("{:.2}", summary.condition_score),
        condition_class = %summary.condition_class,
        max_distress_score = ?summary.max_distress_score,
        max_condition_score = ?summary.max_condition_score,
        max_ride_score = ?summary.max_ride_score,
        "Summary"
    );

    for (i, insight) in report.insights.iter().enumerate() {
        info!("{}. {}", i + 1, insight);
    }

    for year in &report.time_series {
        info!(
            year = year.year,
            records = year.records,
            condition = ?year.condition_score,
            distress = ?year.distress_score,
            ride = ?year.ride_score,
            "Yearly scores"
        );
    }

    for year in &report.distress_per_mile {
        info!(
            year = year.year,
            miles = year.length,
            spalled_cracks = ?year.spalled_cracks_per_mile,
            pcc_patches = ?year.pcc_patches_per_mile,
            punchouts = ?year.punchouts_per_mile,
            acp_patches = ?year.acp_patches_per_mile,
            "Distress per mile"
        );
    }
}
