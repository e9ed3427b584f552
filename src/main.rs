use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::info;
use ride_duration::config::{DEFAULT_INPUT_PATTERN, DEFAULT_MODEL_PATH, DEFAULT_OUTPUT_PATTERN};
use ride_duration::utils::logging::print_prediction_summary;
use ride_duration::{BatchConfig, Period, StorageOptions, load_model, run_batch};

#[derive(Debug, Parser)]
#[command(
    name = "ride-duration",
    version,
    about = "Score a month of taxi trips with a pre-fit duration model"
)]
struct Cli {
    /// Year of the trip data, e.g. 2023
    year: i32,
    /// Month of the trip data, 1-12
    month: u32,
    #[arg(long, env = "INPUT_FILE_PATTERN", default_value = DEFAULT_INPUT_PATTERN)]
    input_pattern: String,
    #[arg(long, env = "OUTPUT_FILE_PATTERN", default_value = DEFAULT_OUTPUT_PATTERN)]
    output_pattern: String,
    /// S3-compatible endpoint used for s3:// locations
    #[arg(long, env = "S3_ENDPOINT_URL")]
    s3_endpoint_url: Option<String>,
    /// Model artifact (JSON)
    #[arg(long = "model", env = "MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
    model_path: PathBuf,
    /// Log filter, overrides RUST_LOG
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let env = env_logger::Env::default().default_filter_or("info");
    let mut logger = env_logger::Builder::from_env(env);
    if let Some(level) = &cli.log_level {
        logger.parse_filters(level);
    }
    logger.init();

    let period = Period::new(cli.year, cli.month).context("Invalid year or month")?;
    let storage = StorageOptions {
        endpoint_url: cli.s3_endpoint_url,
    };
    let config = BatchConfig::new(&cli.input_pattern, &cli.output_pattern, storage, cli.model_path)
        .context("Invalid file pattern")?;

    let model = load_model(&config.model_path)
        .with_context(|| format!("Failed to load model from {}", config.model_path.display()))?;
    info!("Scoring {period}");

    let report = run_batch(&config, period, &model)
        .with_context(|| format!("Batch run for {period} failed"))?;
    print_prediction_summary(&report);

    Ok(())
}
