//! Hyperrisk - hypertension risk scoring from the command line
//!
//! Reads JSON (or CSV for batches) from a file or stdin and writes the JSON
//! response to stdout. Logs go to stderr.
//!
//! # Usage
//! ```sh
//! hyperrisk predict --input patient.json
//! hyperrisk batch --input patients.csv --format csv
//! hyperrisk info
//! hyperrisk health
//! ```
//!
//! # Environment Variables
//! - `MODEL_PATH` - Pipeline artifact (default: models/logistic_pipeline.json)
//! - `CONFIDENCE_LOW_BAND` / `CONFIDENCE_MEDIUM_BAND` - Confidence bands (default: 0.1 / 0.2)
//! - `DECISION_THRESHOLD` - Used when the pipeline does not label rows (default: 0.5)
//! - `METRICS_ENABLED` - Collect Prometheus metrics (default: true)

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use hyperrisk::application::system::PredictionRuntime;
use hyperrisk::config::Config;
use hyperrisk::domain::errors::PredictionError;
use hyperrisk::domain::validation::RawRecord;
use hyperrisk::infrastructure::tabular;
use serde::Serialize;
use serde_json::json;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Print Prometheus metrics to stderr after the command
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score one JSON record
    Predict {
        /// Input file, `-` for stdin
        #[arg(long, default_value = "-")]
        input: PathBuf,
    },
    /// Score up to 100 records
    Batch {
        /// Input file, `-` for stdin
        #[arg(long, default_value = "-")]
        input: PathBuf,

        #[arg(long, value_enum, default_value_t = InputFormat::Json)]
        format: InputFormat,
    },
    /// Describe the accepted features and the loaded pipeline
    Info,
    /// Report whether the model is loaded
    Health,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum InputFormat {
    Json,
    Csv,
}

fn open_input(path: &Path) -> Result<Box<dyn Read>> {
    if path == Path::new("-") {
        Ok(Box::new(io::stdin()))
    } else {
        let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
        Ok(Box::new(file))
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn error_body(error: &PredictionError) -> serde_json::Value {
    match error {
        PredictionError::Validation(e) => json!({
            "error": "validation",
            "field": e.field,
            "reason": e.reason.to_string(),
        }),
        PredictionError::ModelUnavailable(e) => json!({
            "error": "model_unavailable",
            "detail": e.to_string(),
        }),
    }
}

fn run(args: &Args, runtime: &PredictionRuntime) -> Result<ExitCode> {
    match &args.command {
        Command::Predict { input } => {
            let record: RawRecord = serde_json::from_reader(open_input(input)?)
                .context("Failed to parse JSON record")?;
            match runtime.single.predict_one(&record) {
                Ok(result) => {
                    print_json(&result)?;
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    print_json(&error_body(&e))?;
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Command::Batch { input, format } => {
            let reader = open_input(input)?;
            let records: Vec<RawRecord> = match format {
                InputFormat::Json => {
                    serde_json::from_reader(reader).context("Failed to parse JSON records")?
                }
                InputFormat::Csv => tabular::read_records(reader)?,
            };
            match runtime.batch.predict_batch(&records) {
                Ok(result) => {
                    print_json(&json!({
                        "total": result.len(),
                        "predicted": result.predicted_count(),
                        "failed": result.failed_count(),
                        "results": result.items(),
                    }))?;
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    print_json(&json!({
                        "error": "batch_size",
                        "limit": e.limit,
                        "received": e.received,
                    }))?;
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Command::Info => match runtime.model_info() {
            Ok(info) => {
                print_json(&info)?;
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                print_json(&error_body(&e.into()))?;
                Ok(ExitCode::FAILURE)
            }
        },
        Command::Health => {
            let health = runtime.health();
            print_json(&health)?;
            Ok(if health.is_healthy() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

fn main() -> Result<ExitCode> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Setup logging (stderr only, stdout carries the JSON response)
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stderr_layer)
        .init();

    let args = Args::parse();

    info!("Hyperrisk {} starting...", env!("CARGO_PKG_VERSION"));
    let config = Config::from_env()?;
    info!(
        "Configuration loaded: model={:?}, bands={:?}",
        config.model_path, config.confidence_policy
    );

    let runtime = PredictionRuntime::start(config)?;
    let code = run(&args, &runtime)?;

    if args.metrics
        && let Some(metrics) = &runtime.metrics
    {
        eprintln!("{}", metrics.render());
    }

    runtime.shutdown();
    Ok(code)
}
